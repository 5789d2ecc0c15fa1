//! Symbol tables: precomputed lookups from schema names to target identifiers.
//!
//! Built once per run, read-only afterwards, and passed explicitly into the
//! fold. [`SymbolTables::build`] assembles them the way a configuration
//! loader would; callers with their own tables can construct the maps
//! directly.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::{trace, warn};

use crate::config::{Config, Mapper};
use crate::ir::{Definition, Document};
use crate::naming::{ConvertOptions, Namer};

pub const BUILTIN_SCALARS: [(&str, &str); 5] = [
    ("ID", "string"),
    ("String", "string"),
    ("Boolean", "boolean"),
    ("Int", "number"),
    ("Float", "number"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeKind {
    Object,
    Interface,
    Union,
    Enum,
    Scalar,
    InputObject,
}

/// Name → kind lookup used to classify references.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TypeRegistry {
    kinds: IndexMap<String, TypeKind>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalarMapping {
    pub mapper: Mapper,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumMapping {
    /// Identifier used at reference sites.
    pub type_identifier: String,
    pub source: Option<String>,
    pub import_identifier: Option<String>,
    pub is_default: bool,
    /// Imported through a namespace (`Ns.Color`) and re-exported by alias.
    pub namespaced: bool,
    pub mapped_values: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveMapping {
    pub mapper: Mapper,
    pub description: Option<String>,
}

pub type ScalarMap = IndexMap<String, ScalarMapping>;
pub type EnumValueMap = IndexMap<String, EnumMapping>;
pub type DirectiveMap = IndexMap<String, DirectiveMapping>;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolTables {
    pub scalars: ScalarMap,
    pub enum_values: EnumValueMap,
    pub directives: DirectiveMap,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl TypeRegistry {
    pub fn from_document(document: &Document) -> Self {
        let mut kinds: IndexMap<String, TypeKind> = BUILTIN_SCALARS
            .iter()
            .map(|(name, _)| (name.to_string(), TypeKind::Scalar))
            .collect();
        for def in &document.definitions {
            let kind = match def {
                Definition::Object(_) => TypeKind::Object,
                Definition::Interface(_) => TypeKind::Interface,
                Definition::Union(_) => TypeKind::Union,
                Definition::Enum(_) => TypeKind::Enum,
                Definition::Scalar(_) => TypeKind::Scalar,
                Definition::InputObject(_) => TypeKind::InputObject,
                Definition::Directive(_) | Definition::Schema(_) => continue,
            };
            if let Some(name) = def.name() {
                kinds.insert(name.to_string(), kind);
            }
        }
        Self { kinds }
    }

    pub fn kind_of(&self, name: &str) -> Option<TypeKind> {
        self.kinds.get(name).copied()
    }

    pub fn is_enum(&self, name: &str) -> bool {
        self.kind_of(name) == Some(TypeKind::Enum)
    }
}

impl SymbolTables {
    /// Built-in scalars, schema scalars (as `defaultScalarType`), then config
    /// overrides; enum mappings for every enum named in `enumValues`;
    /// directive mappings from `directiveArgumentAndInputFieldMappings`.
    pub fn build(document: &Document, config: &Config, namer: &Namer<'_>) -> Self {
        let registry = TypeRegistry::from_document(document);

        let mut scalars = ScalarMap::new();
        for (name, ty) in BUILTIN_SCALARS {
            scalars.insert(name.to_string(), ScalarMapping { mapper: Mapper::inline(ty), description: None });
        }
        for def in &document.definitions {
            if let Definition::Scalar(scalar) = def {
                let entry = scalars.entry(scalar.name.clone()).or_insert_with(|| ScalarMapping {
                    mapper: Mapper::inline(config.default_scalar_type.clone()),
                    description: None,
                });
                entry.description = scalar.description.clone();
            }
        }
        for (name, mapper) in &config.scalars {
            if registry.kind_of(name).is_none() {
                warn!(scalar = %name, "scalar mapping does not match any scalar in the schema");
            }
            let entry = scalars.entry(name.clone()).or_insert_with(|| ScalarMapping {
                mapper: mapper.clone(),
                description: None,
            });
            entry.mapper = mapper.clone();
        }

        let mut enum_values = EnumValueMap::new();
        let enum_names: IndexSet<&String> =
            config.enum_sources.keys().chain(config.enum_mapped_values.keys()).collect();
        for name in enum_names {
            if !registry.is_enum(name) {
                warn!(enum_name = %name, "enum mapping does not match any enum in the schema");
            }
            let mapped_values = config.enum_mapped_values.get(name).cloned().unwrap_or_default();
            let mapping = match config.enum_sources.get(name) {
                Some(mapper) => external_enum(name, mapper, mapped_values),
                None => EnumMapping {
                    type_identifier: namer.convert(
                        name,
                        ConvertOptions {
                            use_types_prefix: config.enum_prefix,
                            use_types_suffix: config.enum_suffix,
                            transform_underscore: false,
                        },
                    ),
                    source: None,
                    import_identifier: None,
                    is_default: false,
                    namespaced: false,
                    mapped_values,
                },
            };
            enum_values.insert(name.clone(), mapping);
        }

        let directive_descriptions: IndexMap<&str, Option<String>> = document
            .definitions
            .iter()
            .filter_map(|def| match def {
                Definition::Directive(d) => Some((d.name.as_str(), d.description.clone())),
                _ => None,
            })
            .collect();
        let directives = config
            .directive_mappings
            .iter()
            .map(|(name, mapper)| {
                let description = directive_descriptions.get(name.as_str()).cloned().flatten();
                (name.clone(), DirectiveMapping { mapper: mapper.clone(), description })
            })
            .collect::<DirectiveMap>();

        trace!(
            scalars = scalars.len(),
            enums = enum_values.len(),
            directives = directives.len(),
            "built symbol tables"
        );
        Self { scalars, enum_values, directives }
    }

    /// `import` statements for externally sourced enums.
    pub fn enum_imports(&self) -> Vec<String> {
        let mut out = IndexSet::new();
        for mapping in self.enum_values.values() {
            let Some(source) = &mapping.source else { continue };
            let statement = if mapping.is_default {
                format!("import {} from '{source}';", mapping.type_identifier)
            } else if mapping.namespaced {
                let namespace = mapping
                    .import_identifier
                    .as_deref()
                    .and_then(|path| path.split('.').next())
                    .unwrap_or(&mapping.type_identifier);
                format!("import {{ {namespace} }} from '{source}';")
            } else {
                format!("import {{ {} }} from '{source}';", import_specifier(&mapping.import_identifier, &mapping.type_identifier))
            };
            out.insert(statement);
        }
        out.into_iter().collect()
    }

    pub fn directive_imports(&self, use_type_imports: bool) -> Vec<String> {
        mapper_imports(self.directives.values().map(|d| &d.mapper), use_type_imports)
    }

    pub fn scalar_imports(&self, use_type_imports: bool) -> Vec<String> {
        mapper_imports(self.scalars.values().map(|s| &s.mapper), use_type_imports)
    }
}

fn external_enum(name: &str, mapper: &Mapper, mapped_values: IndexMap<String, String>) -> EnumMapping {
    // `./enums#Enums.Color` imports the namespace and aliases the member.
    let namespaced = mapper.identifier.contains('.') || mapper.import_identifier.as_deref().is_some_and(|i| i.contains('.'));
    if namespaced {
        let path = mapper.import_identifier.clone().unwrap_or_else(|| mapper.identifier.clone());
        let local = if mapper.import_identifier.is_some() {
            mapper.identifier.clone()
        } else {
            name.to_string()
        };
        return EnumMapping {
            type_identifier: local,
            source: mapper.source.clone(),
            import_identifier: Some(path),
            is_default: false,
            namespaced: true,
            mapped_values,
        };
    }
    EnumMapping {
        type_identifier: mapper.identifier.clone(),
        source: mapper.source.clone(),
        import_identifier: mapper.import_identifier.clone(),
        is_default: mapper.is_default,
        namespaced: false,
        mapped_values,
    }
}

fn import_specifier(import_identifier: &Option<String>, local: &str) -> String {
    match import_identifier {
        Some(imported) if imported != local => format!("{imported} as {local}"),
        _ => local.to_string(),
    }
}

fn mapper_imports<'a>(mappers: impl Iterator<Item = &'a Mapper>, use_type_imports: bool) -> Vec<String> {
    let keyword = if use_type_imports { "import type" } else { "import" };
    let mut out = IndexSet::new();
    for mapper in mappers {
        let Some(source) = &mapper.source else { continue };
        let statement = if mapper.is_default {
            format!("{keyword} {} from '{source}';", mapper.identifier)
        } else {
            format!(
                "{keyword} {{ {} }} from '{source}';",
                import_specifier(&mapper.import_identifier, &mapper.identifier)
            )
        };
        out.insert(statement);
    }
    out.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawConfig;
    use crate::naming::BuiltinConvention;

    fn document() -> Document {
        serde_json::from_value(serde_json::json!({
            "definitions": [
                { "kind": "scalar", "name": "DateTime", "description": "ISO-8601" },
                { "kind": "scalar", "name": "Json" },
                { "kind": "enum", "name": "Color", "values": [ { "name": "RED" } ] },
                { "kind": "enum", "name": "Role", "values": [ { "name": "ADMIN" } ] },
                { "kind": "directive", "name": "asNumber", "description": "numeric override" }
            ]
        }))
        .unwrap()
    }

    fn config(json: serde_json::Value) -> Config {
        Config::from_raw(serde_json::from_value::<RawConfig>(json).unwrap()).unwrap()
    }

    fn tables(config: &Config) -> SymbolTables {
        let conv = BuiltinConvention::PascalCase;
        let namer = Namer::new(&conv, &config.types_prefix, &config.types_suffix);
        SymbolTables::build(&document(), config, &namer)
    }

    #[test]
    fn builtins_then_schema_scalars_then_overrides() {
        let config = config(serde_json::json!({
            "scalars": { "DateTime": "./scalars#DateTime" }
        }));
        let tables = tables(&config);
        let names: Vec<&str> = tables.scalars.keys().map(String::as_str).collect();
        assert_eq!(names, ["ID", "String", "Boolean", "Int", "Float", "DateTime", "Json"]);
        assert_eq!(tables.scalars["Json"].mapper.identifier, "any");
        assert_eq!(tables.scalars["DateTime"].description.as_deref(), Some("ISO-8601"));
        assert_eq!(tables.scalar_imports(false), ["import { DateTime } from './scalars';"]);
        assert_eq!(tables.scalar_imports(true), ["import type { DateTime } from './scalars';"]);
    }

    #[test]
    fn enum_imports_cover_named_default_and_namespaced() {
        let config = config(serde_json::json!({
            "enumValues": {
                "Color": "./enums#Color",
                "Role": "./roles#Roles.Role"
            }
        }));
        let tables = tables(&config);
        assert_eq!(
            tables.enum_imports(),
            ["import { Color } from './enums';", "import { Roles } from './roles';"]
        );
        let role = &tables.enum_values["Role"];
        assert!(role.namespaced);
        assert_eq!(role.type_identifier, "Role");
        assert_eq!(role.import_identifier.as_deref(), Some("Roles.Role"));
    }

    #[test]
    fn mapped_value_only_enums_keep_converted_identifiers() {
        let config = config(serde_json::json!({
            "typesPrefix": "I",
            "enumPrefix": false,
            "enumValues": { "Role": { "ADMIN": "admin" } }
        }));
        let tables = tables(&config);
        let role = &tables.enum_values["Role"];
        assert_eq!(role.type_identifier, "Role");
        assert!(role.source.is_none());
        assert!(tables.enum_imports().is_empty());
    }

    #[test]
    fn directive_mappings_pick_up_descriptions() {
        let config = config(serde_json::json!({
            "directiveArgumentAndInputFieldMappings": { "asNumber": "./types#AsNumber" }
        }));
        let tables = tables(&config);
        assert_eq!(tables.directives["asNumber"].description.as_deref(), Some("numeric override"));
        assert_eq!(tables.directive_imports(false), ["import { AsNumber } from './types';"]);
    }

    #[test]
    fn registry_classifies_definitions() {
        let registry = TypeRegistry::from_document(&document());
        assert!(registry.is_enum("Color"));
        assert_eq!(registry.kind_of("Int"), Some(TypeKind::Scalar));
        assert_eq!(registry.kind_of("Missing"), None);
    }
}
