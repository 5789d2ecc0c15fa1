//! Generation options.
//!
//! [`RawConfig`] mirrors the JSON surface, where several options accept either
//! a flag or a per-kind object and mappers accept either a string or an
//! object. [`Config::from_raw`] normalizes all of that up front, so the fold
//! only ever branches on concrete fields.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CodegenError;
use crate::naming::BuiltinConvention;

// ————————————————————————————————————————————————————————————————————————————
// RAW (as written in JSON)
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawConfig {
    pub scalars: IndexMap<String, RawMapper>,
    pub default_scalar_type: Option<String>,
    pub enum_values: IndexMap<String, RawEnumMapper>,
    pub directive_argument_and_input_field_mappings: IndexMap<String, RawMapper>,

    pub immutable_types: bool,
    pub non_optional_typename: bool,
    pub skip_typename: bool,
    pub avoid_optionals: Option<RawAvoidOptionals>,
    pub wrap_field_definitions: bool,
    pub wrap_entire_field_definitions: bool,
    pub field_wrapper_value: Option<String>,
    pub entire_field_wrapper_value: Option<String>,

    pub enum_prefix: Option<bool>,
    pub enum_suffix: Option<bool>,
    pub types_prefix: String,
    pub types_suffix: String,
    pub naming_convention: Option<BuiltinConvention>,

    pub no_export: bool,
    pub only_enums: bool,
    pub only_operation_types: bool,
    pub future_proof_unions: bool,
    pub future_proof_enums: bool,
    pub enums_as_types: bool,
    pub maybe_value: Option<String>,
    pub input_maybe_value: Option<String>,
    pub add_underscore_to_args_type: bool,
    pub declaration_kind: Option<RawDeclarationKind>,
    pub use_type_imports: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawAvoidOptionals {
    All(bool),
    #[serde(rename_all = "camelCase")]
    PerKind {
        #[serde(default)]
        field: bool,
        #[serde(default)]
        input_value: bool,
        #[serde(default)]
        default_value: bool,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawDeclarationKind {
    All(DeclarationKind),
    PerKind {
        #[serde(default, rename = "type")]
        object: Option<DeclarationKind>,
        #[serde(default)]
        interface: Option<DeclarationKind>,
        #[serde(default)]
        input: Option<DeclarationKind>,
        #[serde(default)]
        arguments: Option<DeclarationKind>,
    },
}

/// `"Date"`, `"./scalars#DateTime"`, or `{ "type": …, "source": …, "default": … }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawMapper {
    Text(String),
    Structured {
        #[serde(rename = "type")]
        identifier: String,
        #[serde(default)]
        source: Option<String>,
        #[serde(default)]
        default: bool,
    },
}

/// An enum mapping: an external source string, or an object with mapped values.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawEnumMapper {
    Source(String),
    Values(IndexMap<String, String>),
}

// ————————————————————————————————————————————————————————————————————————————
// NORMALIZED
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclarationKind {
    #[default]
    Type,
    Interface,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeclarationKinds {
    pub object: DeclarationKind,
    pub interface: DeclarationKind,
    pub input: DeclarationKind,
    pub arguments: DeclarationKind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvoidOptionals {
    pub field: bool,
    pub input_value: bool,
    pub default_value: bool,
}

/// A parsed mapper: where an identifier comes from and how to import it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mapper {
    /// Identifier (or inline type expression) used at reference sites.
    pub identifier: String,
    pub source: Option<String>,
    /// Name exported by `source` when it differs from `identifier`.
    pub import_identifier: Option<String>,
    pub is_default: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub scalars: IndexMap<String, Mapper>,
    pub default_scalar_type: String,
    pub enum_sources: IndexMap<String, Mapper>,
    pub enum_mapped_values: IndexMap<String, IndexMap<String, String>>,
    pub directive_mappings: IndexMap<String, Mapper>,

    pub immutable_types: bool,
    pub non_optional_typename: bool,
    pub skip_typename: bool,
    pub avoid_optionals: AvoidOptionals,
    pub wrap_field_definitions: bool,
    pub wrap_entire_field_definitions: bool,
    pub field_wrapper_value: String,
    pub entire_field_wrapper_value: String,

    pub enum_prefix: bool,
    pub enum_suffix: bool,
    pub types_prefix: String,
    pub types_suffix: String,
    pub naming_convention: BuiltinConvention,

    pub no_export: bool,
    pub only_enums: bool,
    pub only_operation_types: bool,
    pub future_proof_unions: bool,
    pub future_proof_enums: bool,
    pub enums_as_types: bool,
    pub maybe_value: String,
    pub input_maybe_value: String,
    pub args_infix: String,
    pub declaration_kind: DeclarationKinds,
    pub use_type_imports: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scalars: IndexMap::new(),
            default_scalar_type: "any".to_string(),
            enum_sources: IndexMap::new(),
            enum_mapped_values: IndexMap::new(),
            directive_mappings: IndexMap::new(),
            immutable_types: false,
            non_optional_typename: false,
            skip_typename: false,
            avoid_optionals: AvoidOptionals::default(),
            wrap_field_definitions: false,
            wrap_entire_field_definitions: false,
            field_wrapper_value: "T".to_string(),
            entire_field_wrapper_value: "T".to_string(),
            enum_prefix: true,
            enum_suffix: true,
            types_prefix: String::new(),
            types_suffix: String::new(),
            naming_convention: BuiltinConvention::PascalCase,
            no_export: false,
            only_enums: false,
            only_operation_types: false,
            future_proof_unions: false,
            future_proof_enums: false,
            enums_as_types: false,
            maybe_value: "T | null".to_string(),
            input_maybe_value: "Maybe<T>".to_string(),
            args_infix: String::new(),
            declaration_kind: DeclarationKinds::default(),
            use_type_imports: false,
        }
    }
}

impl Config {
    pub fn from_raw(raw: RawConfig) -> Result<Self, CodegenError> {
        let defaults = Config::default();

        let scalars = raw
            .scalars
            .iter()
            .map(|(name, m)| Ok((name.clone(), Mapper::from_raw(name, m)?)))
            .collect::<Result<IndexMap<_, _>, CodegenError>>()?;
        let directive_mappings = raw
            .directive_argument_and_input_field_mappings
            .iter()
            .map(|(name, m)| Ok((name.clone(), Mapper::from_raw(name, m)?)))
            .collect::<Result<IndexMap<_, _>, CodegenError>>()?;

        let mut enum_sources = IndexMap::new();
        let mut enum_mapped_values = IndexMap::new();
        for (name, mapper) in raw.enum_values {
            match mapper {
                RawEnumMapper::Source(text) => {
                    let parsed = Mapper::parse(&name, &text)?;
                    if parsed.source.is_none() {
                        return Err(CodegenError::InvalidMapper {
                            name,
                            raw: text,
                            reason: "enum mappers must name a source module (`module#Identifier`)",
                        });
                    }
                    enum_sources.insert(name, parsed);
                }
                RawEnumMapper::Values(values) => {
                    enum_mapped_values.insert(name, values);
                }
            }
        }

        let avoid_optionals = match raw.avoid_optionals {
            None => AvoidOptionals::default(),
            Some(RawAvoidOptionals::All(flag)) => AvoidOptionals {
                field: flag,
                input_value: flag,
                default_value: flag,
            },
            Some(RawAvoidOptionals::PerKind { field, input_value, default_value }) => {
                AvoidOptionals { field, input_value, default_value }
            }
        };

        let declaration_kind = match raw.declaration_kind {
            None => DeclarationKinds::default(),
            Some(RawDeclarationKind::All(kind)) => DeclarationKinds {
                object: kind,
                interface: kind,
                input: kind,
                arguments: kind,
            },
            Some(RawDeclarationKind::PerKind { object, interface, input, arguments }) => {
                DeclarationKinds {
                    object: object.unwrap_or_default(),
                    interface: interface.unwrap_or_default(),
                    input: input.unwrap_or_default(),
                    arguments: arguments.unwrap_or_default(),
                }
            }
        };

        Ok(Config {
            scalars,
            default_scalar_type: raw.default_scalar_type.unwrap_or(defaults.default_scalar_type),
            enum_sources,
            enum_mapped_values,
            directive_mappings,
            immutable_types: raw.immutable_types,
            non_optional_typename: raw.non_optional_typename,
            skip_typename: raw.skip_typename,
            avoid_optionals,
            wrap_field_definitions: raw.wrap_field_definitions,
            wrap_entire_field_definitions: raw.wrap_entire_field_definitions,
            field_wrapper_value: raw.field_wrapper_value.unwrap_or(defaults.field_wrapper_value),
            entire_field_wrapper_value: raw
                .entire_field_wrapper_value
                .unwrap_or(defaults.entire_field_wrapper_value),
            enum_prefix: raw.enum_prefix.unwrap_or(true),
            enum_suffix: raw.enum_suffix.unwrap_or(true),
            types_prefix: raw.types_prefix,
            types_suffix: raw.types_suffix,
            naming_convention: raw.naming_convention.unwrap_or_default(),
            no_export: raw.no_export,
            only_enums: raw.only_enums,
            only_operation_types: raw.only_operation_types,
            future_proof_unions: raw.future_proof_unions,
            future_proof_enums: raw.future_proof_enums,
            enums_as_types: raw.enums_as_types,
            maybe_value: raw.maybe_value.unwrap_or(defaults.maybe_value),
            input_maybe_value: raw.input_maybe_value.unwrap_or(defaults.input_maybe_value),
            args_infix: if raw.add_underscore_to_args_type { "_".to_string() } else { String::new() },
            declaration_kind,
            use_type_imports: raw.use_type_imports,
        })
    }

    /// `"export "` unless `noExport` is set.
    pub fn export_prefix(&self) -> &'static str {
        if self.no_export { "" } else { "export " }
    }
}

impl Mapper {
    pub fn inline(identifier: impl Into<String>) -> Self {
        Self { identifier: identifier.into(), source: None, import_identifier: None, is_default: false }
    }

    fn from_raw(name: &str, raw: &RawMapper) -> Result<Self, CodegenError> {
        match raw {
            RawMapper::Text(text) => Self::parse(name, text),
            RawMapper::Structured { identifier, source, default } => Ok(Self {
                identifier: identifier.clone(),
                source: source.clone(),
                import_identifier: None,
                is_default: *default,
            }),
        }
    }

    /// Parse `Type`, `module#Ident`, `module#Ident as Alias` or `module#default`.
    pub fn parse(name: &str, text: &str) -> Result<Self, CodegenError> {
        let invalid = |reason| CodegenError::InvalidMapper {
            name: name.to_string(),
            raw: text.to_string(),
            reason,
        };
        let Some((source, target)) = text.split_once('#') else {
            return Ok(Self::inline(text.trim()));
        };
        let (source, target) = (source.trim(), target.trim());
        if source.is_empty() {
            return Err(invalid("empty source module before `#`"));
        }
        if target.is_empty() {
            return Err(invalid("empty identifier after `#`"));
        }
        if target == "default" {
            return Ok(Self {
                identifier: name.to_string(),
                source: Some(source.to_string()),
                import_identifier: None,
                is_default: true,
            });
        }
        match target.split_once(" as ") {
            Some((imported, alias)) => Ok(Self {
                identifier: alias.trim().to_string(),
                source: Some(source.to_string()),
                import_identifier: Some(imported.trim().to_string()),
                is_default: false,
            }),
            None => Ok(Self {
                identifier: target.to_string(),
                source: Some(source.to_string()),
                import_identifier: None,
                is_default: false,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: serde_json::Value) -> RawConfig {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn avoid_optionals_flag_expands_to_every_kind() {
        let config = Config::from_raw(raw(serde_json::json!({ "avoidOptionals": true }))).unwrap();
        assert_eq!(
            config.avoid_optionals,
            AvoidOptionals { field: true, input_value: true, default_value: true }
        );

        let config =
            Config::from_raw(raw(serde_json::json!({ "avoidOptionals": { "inputValue": true } })))
                .unwrap();
        assert!(config.avoid_optionals.input_value);
        assert!(!config.avoid_optionals.field);
    }

    #[test]
    fn declaration_kind_accepts_string_or_object() {
        let config = Config::from_raw(raw(serde_json::json!({ "declarationKind": "interface" }))).unwrap();
        assert_eq!(config.declaration_kind.input, DeclarationKind::Interface);

        let config = Config::from_raw(raw(serde_json::json!({
            "declarationKind": { "type": "interface" }
        })))
        .unwrap();
        assert_eq!(config.declaration_kind.object, DeclarationKind::Interface);
        assert_eq!(config.declaration_kind.input, DeclarationKind::Type);
    }

    #[test]
    fn mapper_strings_parse_every_form() {
        assert_eq!(Mapper::parse("Date", "Date").unwrap(), Mapper::inline("Date"));

        let named = Mapper::parse("DateTime", "./scalars#DateTime").unwrap();
        assert_eq!(named.source.as_deref(), Some("./scalars"));
        assert_eq!(named.identifier, "DateTime");

        let aliased = Mapper::parse("Json", "./json#JsonValue as Json").unwrap();
        assert_eq!(aliased.import_identifier.as_deref(), Some("JsonValue"));
        assert_eq!(aliased.identifier, "Json");

        let default = Mapper::parse("Upload", "graphql-upload#default").unwrap();
        assert!(default.is_default);
        assert_eq!(default.identifier, "Upload");

        assert!(Mapper::parse("X", "#X").is_err());
        assert!(Mapper::parse("X", "./x#").is_err());
    }

    #[test]
    fn enum_values_split_into_sources_and_mapped_values() {
        let config = Config::from_raw(raw(serde_json::json!({
            "enumValues": {
                "Color": "./enums#Color",
                "Role": { "ADMIN": "admin" }
            }
        })))
        .unwrap();
        assert_eq!(config.enum_sources["Color"].source.as_deref(), Some("./enums"));
        assert_eq!(config.enum_mapped_values["Role"]["ADMIN"], "admin");

        let err = Config::from_raw(raw(serde_json::json!({ "enumValues": { "Color": "Color" } })));
        assert!(err.is_err());
    }

    #[test]
    fn defaults_match_the_documented_surface() {
        let config = Config::from_raw(RawConfig::default()).unwrap();
        assert_eq!(config.maybe_value, "T | null");
        assert_eq!(config.input_maybe_value, "Maybe<T>");
        assert_eq!(config.default_scalar_type, "any");
        assert!(config.enum_prefix);
        assert_eq!(config.export_prefix(), "export ");
    }
}
