// Strongly-typed schema tree consumed by the fold. Validation happened upstream.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CodegenError;

/// A validated schema document: type definitions in source order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    pub definitions: Vec<Definition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Definition {
    Object(ObjectTypeDefinition),
    Interface(InterfaceTypeDefinition),
    Union(UnionTypeDefinition),
    Enum(EnumTypeDefinition),
    Scalar(ScalarTypeDefinition),
    InputObject(InputObjectTypeDefinition),
    Directive(DirectiveDefinition),
    Schema(SchemaDefinition),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectTypeDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub directives: Vec<Directive>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceTypeDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
    #[serde(default)]
    pub directives: Vec<Directive>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnionTypeDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumTypeDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub values: Vec<EnumValueDefinition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValueDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub directives: Vec<Directive>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalarTypeDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputObjectTypeDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<InputValueDefinition>,
    #[serde(default)]
    pub directives: Vec<Directive>,
    /// Set by loaders that surface `isOneOf` instead of the directive.
    #[serde(default)]
    pub one_of: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDefinition {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub arguments: Vec<InputValueDefinition>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub directives: Vec<Directive>,
}

/// An argument or an input-object field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputValueDefinition {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub default_value: Option<serde_json::Value>,
    #[serde(default)]
    pub directives: Vec<Directive>,
}

/// A directive application, e.g. `@deprecated(reason: "use id")`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Directive {
    pub name: String,
    #[serde(default)]
    pub arguments: IndexMap<String, serde_json::Value>,
}

/// `Named`, `[T]` or `T!`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Definition {
    pub fn name(&self) -> Option<&str> {
        match self {
            Definition::Object(def) => Some(&def.name),
            Definition::Interface(def) => Some(&def.name),
            Definition::Union(def) => Some(&def.name),
            Definition::Enum(def) => Some(&def.name),
            Definition::Scalar(def) => Some(&def.name),
            Definition::InputObject(def) => Some(&def.name),
            Definition::Directive(def) => Some(&def.name),
            Definition::Schema(_) => None,
        }
    }
}

impl InputObjectTypeDefinition {
    /// Exactly one field must be set.
    pub fn is_one_of(&self) -> bool {
        self.one_of || self.directives.iter().any(|d| d.name == "oneOf")
    }
}

pub(crate) fn find_directive<'a>(directives: &'a [Directive], name: &str) -> Option<&'a Directive> {
    directives.iter().find(|d| d.name == name)
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }
    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }
    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }
    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }
    /// Innermost named type.
    pub fn base_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.base_name(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => f.write_str(name),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

impl FromStr for TypeRef {
    type Err = CodegenError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let malformed = |reason| CodegenError::MalformedTypeRef {
            source_text: src.to_string(),
            reason,
        };
        let text = src.trim();
        let (body, non_null) = match text.strip_suffix('!') {
            Some(rest) => (rest.trim_end(), true),
            None => (text, false),
        };
        let inner = if let Some(rest) = body.strip_prefix('[') {
            let item = rest.strip_suffix(']').ok_or_else(|| malformed("unclosed list bracket"))?;
            TypeRef::list(item.parse().map_err(|_| malformed("invalid list item type"))?)
        } else {
            if body.is_empty() {
                return Err(malformed("empty type name"));
            }
            let valid = body.chars().enumerate().all(|(i, c)| {
                c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit())
            });
            if !valid {
                return Err(malformed("type names must match [_A-Za-z][_0-9A-Za-z]*"));
            }
            TypeRef::named(body)
        };
        Ok(if non_null { TypeRef::non_null(inner) } else { inner })
    }
}

impl Serialize for TypeRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_refs_parse_nested_modifiers() {
        let ty: TypeRef = "[User!]!".parse().unwrap();
        assert_eq!(
            ty,
            TypeRef::non_null(TypeRef::list(TypeRef::non_null(TypeRef::named("User"))))
        );
        assert_eq!(ty.base_name(), "User");
        assert_eq!(ty.to_string(), "[User!]!");
    }

    #[test]
    fn type_refs_reject_garbage() {
        assert!("[Int".parse::<TypeRef>().is_err());
        assert!("".parse::<TypeRef>().is_err());
        assert!("1Int".parse::<TypeRef>().is_err());
        assert!("Int!!".parse::<TypeRef>().is_err());
    }

    #[test]
    fn definitions_decode_from_tagged_json() {
        let doc: Document = serde_json::from_value(serde_json::json!({
            "definitions": [
                { "kind": "inputObject", "name": "Pick",
                  "fields": [ { "name": "a", "type": "Int", "defaultValue": 3 } ],
                  "directives": [ { "name": "oneOf" } ] },
                { "kind": "schema" }
            ]
        }))
        .unwrap();
        match &doc.definitions[0] {
            Definition::InputObject(input) => {
                assert!(input.is_one_of());
                assert_eq!(input.fields[0].default_value, Some(serde_json::json!(3)));
            }
            other => panic!("unexpected definition: {other:?}"),
        }
        assert_eq!(doc.definitions[1].name(), None);
    }
}
