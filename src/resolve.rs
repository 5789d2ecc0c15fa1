//! Named type reference → target identifier.

use crate::config::Config;
use crate::lower::TypeExpr;
use crate::naming::{ConvertOptions, Namer};
use crate::symbols::{SymbolTables, TypeRegistry};

pub struct TypeResolver<'a> {
    pub registry: &'a TypeRegistry,
    pub tables: &'a SymbolTables,
    pub namer: &'a Namer<'a>,
    pub config: &'a Config,
}

impl<'a> TypeResolver<'a> {
    /// Scalars go through the `Scalars` container, enums through the enum
    /// table or the enum prefix/suffix policy, everything else through the
    /// default type prefix/suffix. Unknown names are converted like object
    /// names; they are assumed to be declared elsewhere.
    pub fn resolve(&self, name: &str) -> TypeExpr {
        if self.tables.scalars.contains_key(name) {
            return TypeExpr::named(scalar_reference(name));
        }
        if self.registry.is_enum(name) {
            if let Some(mapping) = self.tables.enum_values.get(name) {
                return TypeExpr::named(mapping.type_identifier.clone());
            }
            return TypeExpr::named(self.enum_name(name));
        }
        TypeExpr::named(self.namer.type_name(name))
    }

    pub fn enum_name(&self, name: &str) -> String {
        self.namer.convert(
            name,
            ConvertOptions {
                use_types_prefix: self.config.enum_prefix,
                use_types_suffix: self.config.enum_suffix,
                transform_underscore: false,
            },
        )
    }
}

pub fn scalar_reference(name: &str) -> String {
    format!("Scalars['{name}']")
}

pub fn directive_reference(name: &str) -> String {
    format!("DirectiveArgumentAndInputFieldMappings['{name}']")
}
