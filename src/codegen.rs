//! Top-level assembly: prepend statements plus the assembled declaration body.

use indexmap::IndexSet;
use tracing::debug;

use crate::config::Config;
use crate::declaration::{BlockKind, DeclarationBlock, indent, transform_comment};
use crate::error::CodegenError;
use crate::fold::Folder;
use crate::ir::Document;
use crate::naming::{Namer, NamingConvention};
use crate::symbols::{SymbolTables, TypeRegistry};

const SCALARS_COMMENT: &str = "All built-in and custom scalars, mapped to their actual values";
const DIRECTIVES_COMMENT: &str = "Type overrides using directives";

/// One generated output unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedOutput {
    /// Imports, then helper type definitions. Deduplicated, order stable.
    pub prepend: Vec<String>,
    pub content: String,
}

impl GeneratedOutput {
    /// The whole unit as one source file.
    pub fn to_source(&self) -> String {
        if self.prepend.is_empty() {
            return self.content.clone();
        }
        format!("{}\n\n{}", self.prepend.join("\n"), self.content)
    }
}

pub struct Codegen<'a> {
    document: &'a Document,
    config: &'a Config,
    convention: Option<&'a dyn NamingConvention>,
    trailing: Vec<String>,
}

impl<'a> Codegen<'a> {
    pub fn new(document: &'a Document, config: &'a Config) -> Self {
        Self { document, config, convention: None, trailing: Vec::new() }
    }

    /// Replace the configured built-in naming convention.
    pub fn with_naming_convention(mut self, convention: &'a dyn NamingConvention) -> Self {
        self.convention = Some(convention);
        self
    }

    /// Definitions appended verbatim after the schema's own declarations.
    pub fn with_trailing_definitions<I, S>(mut self, definitions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trailing.extend(definitions.into_iter().map(Into::into));
        self
    }

    /// Build the registry and symbol tables from the document, then generate.
    pub fn generate(&self) -> Result<GeneratedOutput, CodegenError> {
        let namer = self.namer();
        let registry = TypeRegistry::from_document(self.document);
        let tables = SymbolTables::build(self.document, self.config, &namer);
        self.assemble(&namer, &registry, &tables)
    }

    /// Generate against externally constructed tables.
    pub fn generate_with(
        &self,
        registry: &TypeRegistry,
        tables: &SymbolTables,
    ) -> Result<GeneratedOutput, CodegenError> {
        let namer = self.namer();
        self.assemble(&namer, registry, tables)
    }

    fn namer(&self) -> Namer<'a> {
        let convention: &'a dyn NamingConvention = match self.convention {
            Some(convention) => convention,
            None => &self.config.naming_convention,
        };
        Namer::new(convention, &self.config.types_prefix, &self.config.types_suffix)
    }

    fn assemble(
        &self,
        namer: &Namer<'_>,
        registry: &TypeRegistry,
        tables: &SymbolTables,
    ) -> Result<GeneratedOutput, CodegenError> {
        let definitions = Folder::new(registry, tables, namer, self.config).fold_document(self.document)?;
        debug!(definitions = definitions.len(), trailing = self.trailing.len(), "assembling output");

        let mut content = Vec::new();
        if !self.config.only_enums {
            content.push(self.scalars_definition(tables));
            if let Some(directives) = self.directives_definition(tables) {
                content.push(directives);
            }
        }
        content.extend(definitions);
        content.extend(self.trailing.iter().cloned());

        Ok(GeneratedOutput { prepend: self.prepend(tables), content: content.join("\n") })
    }

    fn prepend(&self, tables: &SymbolTables) -> Vec<String> {
        let mut out: IndexSet<String> = tables.enum_imports().into_iter().collect();
        if !self.config.only_enums {
            out.extend(tables.directive_imports(self.config.use_type_imports));
            out.extend(tables.scalar_imports(self.config.use_type_imports));
            out.extend(self.helper_definitions());
        }
        out.into_iter().collect()
    }

    fn helper_definitions(&self) -> Vec<String> {
        let export = self.config.export_prefix();
        let mut out = vec![
            format!("{export}type Maybe<T> = {};", self.config.maybe_value),
            format!("{export}type InputMaybe<T> = {};", self.config.input_maybe_value),
            format!("{export}type Exact<T extends {{ [key: string]: unknown }}> = {{ [K in keyof T]: T[K] }};"),
            format!(
                "{export}type MakeOptional<T, K extends keyof T> = Omit<T, K> & {{ [SubKey in K]?: Maybe<T[SubKey]> }};"
            ),
            format!(
                "{export}type MakeMaybe<T, K extends keyof T> = Omit<T, K> & {{ [SubKey in K]: Maybe<T[SubKey]> }};"
            ),
        ];
        if self.config.wrap_field_definitions {
            out.push(format!("{export}type FieldWrapper<T> = {};", self.config.field_wrapper_value));
        }
        if self.config.wrap_entire_field_definitions {
            out.push(format!("{export}type EntireFieldWrapper<T> = {};", self.config.entire_field_wrapper_value));
        }
        out
    }

    fn scalars_definition(&self, tables: &SymbolTables) -> String {
        let lines: Vec<String> = tables
            .scalars
            .iter()
            .map(|(name, scalar)| {
                format!(
                    "{}{}",
                    transform_comment(scalar.description.as_deref().unwrap_or_default(), 1),
                    indent(&format!("{name}: {};", scalar.mapper.identifier), 1)
                )
            })
            .collect();
        DeclarationBlock::new(BlockKind::Type, "Scalars")
            .export(!self.config.no_export)
            .with_comment(Some(SCALARS_COMMENT))
            .with_block(lines.join("\n"))
            .render()
    }

    fn directives_definition(&self, tables: &SymbolTables) -> Option<String> {
        if tables.directives.is_empty() {
            return None;
        }
        let lines: Vec<String> = tables
            .directives
            .iter()
            .map(|(name, directive)| {
                format!(
                    "{}{}",
                    transform_comment(directive.description.as_deref().unwrap_or_default(), 1),
                    indent(&format!("{name}: {};", directive.mapper.identifier), 1)
                )
            })
            .collect();
        Some(
            DeclarationBlock::new(BlockKind::Type, "DirectiveArgumentAndInputFieldMappings")
                .export(!self.config.no_export)
                .with_comment(Some(DIRECTIVES_COMMENT))
                .with_block(lines.join("\n"))
                .render(),
        )
    }
}
