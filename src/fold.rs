//! Bottom-up fold of the schema tree into declarations.
//!
//! One depth-first, post-order pass. Every leave step sees only its folded
//! children (plus the raw facts they carry, such as "was this `T!`") and the
//! ancestor chain. Nothing is revisited, and type references are resolved by
//! name rather than followed, so reference cycles between types are harmless.
//!
//! Suppressed kinds (`onlyEnums`, `onlyOperationTypes`) are still walked and
//! fold to nothing. A structural violation aborts the whole pass, suppressed
//! or not.
pub mod args;
pub mod enums;
pub mod oneof;

use tracing::{debug, trace};

use crate::config::Config;
use crate::declaration::{BlockKind, DeclarationBlock, indent, member_comment};
use crate::error::CodegenError;
use crate::ir::{
    Definition, Directive, Document, FieldDefinition, InputObjectTypeDefinition,
    InputValueDefinition, InterfaceTypeDefinition, ObjectTypeDefinition, TypeRef,
    UnionTypeDefinition,
};
use crate::lower::{FoldedType, Position, TypeExpr, Wrapper};
use crate::naming::Namer;
use crate::resolve::{TypeResolver, directive_reference};
use crate::symbols::{SymbolTables, TypeRegistry};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// One entry of the ancestor chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame<'a> {
    Object(&'a str),
    Interface(&'a str),
    InputObject { name: &'a str, one_of: bool },
    Union(&'a str),
    Enum(&'a str),
    Field(&'a str),
    Argument(&'a str),
}

#[derive(Debug, Default)]
pub struct AncestorChain<'a> {
    frames: Vec<Frame<'a>>,
}

/// Output field after folding.
#[derive(Debug, Clone)]
pub struct FieldFragment {
    pub name: String,
    pub comment: String,
    pub ty: TypeExpr,
    pub non_null: bool,
    pub arguments: Vec<InputValueFragment>,
}

/// Argument or input-object field after folding.
#[derive(Debug, Clone)]
pub struct InputValueFragment {
    pub name: String,
    pub comment: String,
    pub ty: TypeExpr,
    pub non_null: bool,
    pub has_default: bool,
}

pub struct Folder<'a> {
    resolver: TypeResolver<'a>,
    config: &'a Config,
    namer: &'a Namer<'a>,
    tables: &'a SymbolTables,
    ancestors: AncestorChain<'a>,
}

// ————————————————————————————————————————————————————————————————————————————
// ANCESTORS
// ————————————————————————————————————————————————————————————————————————————

impl<'a> AncestorChain<'a> {
    pub fn push(&mut self, frame: Frame<'a>) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) -> Option<Frame<'a>> {
        self.frames.pop()
    }

    /// Any enclosing input-object definition.
    pub fn is_input_context(&self) -> bool {
        self.frames.iter().any(|f| matches!(f, Frame::InputObject { .. }))
    }

    /// Closest enclosing named-type definition.
    pub fn nearest_definition(&self) -> Option<Frame<'a>> {
        self.frames
            .iter()
            .rev()
            .find(|f| !matches!(f, Frame::Field(_) | Frame::Argument(_)))
            .copied()
    }

    pub fn position(&self) -> Position {
        if self.is_input_context() { Position::Input } else { Position::Output }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// FOLD
// ————————————————————————————————————————————————————————————————————————————

impl<'a> Folder<'a> {
    pub fn new(
        registry: &'a TypeRegistry,
        tables: &'a SymbolTables,
        namer: &'a Namer<'a>,
        config: &'a Config,
    ) -> Self {
        Self {
            resolver: TypeResolver { registry, tables, namer, config },
            config,
            namer,
            tables,
            ancestors: AncestorChain::default(),
        }
    }

    /// One rendered unit per definition that produces output, in source order.
    pub fn fold_document(&mut self, document: &'a Document) -> Result<Vec<String>, CodegenError> {
        let mut out = Vec::new();
        for def in &document.definitions {
            if let Some(rendered) = self.fold_definition(def)? {
                debug!(definition = def.name().unwrap_or_default(), "folded definition");
                out.push(rendered);
            }
        }
        Ok(out)
    }

    fn fold_definition(&mut self, def: &'a Definition) -> Result<Option<String>, CodegenError> {
        match def {
            Definition::Object(object) => self.fold_object(object),
            Definition::Interface(interface) => self.fold_interface(interface),
            Definition::Union(union) => Ok(self.fold_union(union)),
            Definition::Enum(def) => Ok(self.fold_enum(def)),
            Definition::InputObject(input) => self.fold_input_object(input),
            Definition::Scalar(_) | Definition::Directive(_) | Definition::Schema(_) => Ok(None),
        }
    }

    fn fold_object(&mut self, object: &'a ObjectTypeDefinition) -> Result<Option<String>, CodegenError> {
        self.ancestors.push(Frame::Object(&object.name));
        let fields = self.fold_fields(&object.fields);
        self.ancestors.pop();
        let fields = fields?;

        if self.config.only_enums || self.config.only_operation_types {
            return Ok(None);
        }

        let mut lines = Vec::with_capacity(fields.len() + 1);
        if !self.config.skip_typename {
            let optional = if self.config.non_optional_typename { "" } else { "?" };
            lines.push(indent(
                &format!("{}__typename{optional}: '{}';", self.readonly_prefix(), object.name),
                1,
            ));
        }
        lines.extend(fields.iter().map(|f| self.render_field(f)));

        let supertypes: Vec<String> = object.interfaces.iter().map(|i| self.namer.type_name(i)).collect();
        let block = DeclarationBlock::new(self.config.declaration_kind.object.into(), self.namer.type_name(&object.name))
            .export(!self.config.no_export)
            .with_comment(object.description.as_deref())
            .with_supertypes_and_fields(&supertypes, &lines);

        Ok(Some(self.with_argument_types(block.render(), &object.name, &fields)))
    }

    fn fold_interface(&mut self, interface: &'a InterfaceTypeDefinition) -> Result<Option<String>, CodegenError> {
        self.ancestors.push(Frame::Interface(&interface.name));
        let fields = self.fold_fields(&interface.fields);
        self.ancestors.pop();
        let fields = fields?;

        if self.config.only_enums || self.config.only_operation_types {
            return Ok(None);
        }

        let lines: Vec<String> = fields.iter().map(|f| self.render_field(f)).collect();
        let supertypes: Vec<String> = interface.interfaces.iter().map(|i| self.namer.type_name(i)).collect();
        let block = DeclarationBlock::new(
            self.config.declaration_kind.interface.into(),
            self.namer.type_name(&interface.name),
        )
        .export(!self.config.no_export)
        .with_comment(interface.description.as_deref())
        .with_supertypes_and_fields(&supertypes, &lines);

        Ok(Some(self.with_argument_types(block.render(), &interface.name, &fields)))
    }

    fn fold_union(&mut self, union: &'a UnionTypeDefinition) -> Option<String> {
        self.ancestors.push(Frame::Union(&union.name));
        let members: Vec<String> = union.types.iter().map(|t| self.resolver.resolve(t).to_string()).collect();
        self.ancestors.pop();

        if self.config.only_enums || self.config.only_operation_types {
            return None;
        }

        let mut content = members.join(" | ");
        if self.config.future_proof_unions {
            content.push_str(&format!(" | {{ {}__typename?: '%other' }}", self.readonly_prefix()));
        }
        let block = DeclarationBlock::new(BlockKind::Type, self.namer.type_name(&union.name))
            .export(!self.config.no_export)
            .with_comment(union.description.as_deref())
            .with_content(content);
        Some(block.render())
    }

    fn fold_input_object(&mut self, input: &'a InputObjectTypeDefinition) -> Result<Option<String>, CodegenError> {
        let one_of = input.is_one_of();
        self.ancestors.push(Frame::InputObject { name: &input.name, one_of });
        let fields: Result<Vec<_>, _> = input.fields.iter().map(|f| self.fold_input_value(f)).collect();
        self.ancestors.pop();
        let fields = fields?;

        if self.config.only_enums {
            return Ok(None);
        }

        let name = self.namer.type_name(&input.name);
        let block = if one_of {
            DeclarationBlock::new(BlockKind::Type, name).with_content(self.expand_one_of(&fields))
        } else {
            let lines: Vec<String> = fields.iter().map(|f| self.render_input_value(f)).collect();
            DeclarationBlock::new(self.config.declaration_kind.input.into(), name).with_block(lines.join("\n"))
        };
        Ok(Some(
            block
                .export(!self.config.no_export)
                .with_comment(input.description.as_deref())
                .render(),
        ))
    }

    fn fold_fields(&mut self, fields: &'a [FieldDefinition]) -> Result<Vec<FieldFragment>, CodegenError> {
        fields.iter().map(|f| self.fold_field(f)).collect()
    }

    fn fold_field(&mut self, field: &'a FieldDefinition) -> Result<FieldFragment, CodegenError> {
        self.ancestors.push(Frame::Field(&field.name));
        let arguments: Result<Vec<_>, _> = field.arguments.iter().map(|a| self.fold_argument(a)).collect();
        let folded = self.fold_type(&field.ty);
        self.ancestors.pop();

        let mut ty = self.directive_override(&field.directives).unwrap_or(folded.expr);
        if self.config.wrap_entire_field_definitions {
            ty = ty.wrap(Wrapper::EntireField);
        }
        Ok(FieldFragment {
            name: field.name.clone(),
            comment: member_comment(field.description.as_deref(), &field.directives, 1),
            ty,
            non_null: folded.non_null,
            arguments: arguments?,
        })
    }

    fn fold_argument(&mut self, argument: &'a InputValueDefinition) -> Result<InputValueFragment, CodegenError> {
        self.ancestors.push(Frame::Argument(&argument.name));
        let fragment = self.fold_input_value(argument);
        self.ancestors.pop();
        fragment
    }

    fn fold_input_value(&mut self, value: &'a InputValueDefinition) -> Result<InputValueFragment, CodegenError> {
        let folded = self.fold_type(&value.ty);
        // Checked here rather than at expansion so suppressed kinds still fail.
        if folded.non_null {
            if let Some(Frame::InputObject { name, one_of: true }) = self.ancestors.nearest_definition() {
                return Err(CodegenError::NonNullOneOfField {
                    type_name: name.to_string(),
                    field: value.name.clone(),
                });
            }
        }
        let ty = self.directive_override(&value.directives).unwrap_or(folded.expr);
        Ok(InputValueFragment {
            name: value.name.clone(),
            comment: member_comment(value.description.as_deref(), &value.directives, 1),
            ty,
            non_null: folded.non_null,
            has_default: value.default_value.is_some(),
        })
    }

    /// Post-order over `Named` / `[T]` / `T!`.
    fn fold_type(&self, ty: &TypeRef) -> FoldedType {
        let position = self.ancestors.position();
        match ty {
            TypeRef::Named(name) => {
                let mut resolved = self.resolver.resolve(name);
                if position == Position::Output && self.config.wrap_field_definitions {
                    resolved = resolved.wrap(Wrapper::Field);
                }
                FoldedType::named(resolved, position)
            }
            TypeRef::List(item) => {
                let item = self.fold_type(item);
                FoldedType::list(item, position, self.config.immutable_types)
            }
            TypeRef::NonNull(inner) => FoldedType::non_null(self.fold_type(inner)),
        }
    }

    /// The last directive with a mapping wins; no mapping means no override.
    fn directive_override(&self, directives: &[Directive]) -> Option<TypeExpr> {
        directives
            .iter()
            .rev()
            .find(|d| self.tables.directives.contains_key(&d.name))
            .map(|d| {
                trace!(owner = ?self.ancestors.nearest_definition(), directive = %d.name, "directive override");
                TypeExpr::named(directive_reference(&d.name))
            })
    }

    // ——— rendering helpers ———

    fn readonly_prefix(&self) -> &'static str {
        if self.config.immutable_types { "readonly " } else { "" }
    }

    fn render_field(&self, field: &FieldFragment) -> String {
        let optional = !self.config.avoid_optionals.field && !field.non_null;
        format!(
            "{}{}",
            field.comment,
            indent(
                &format!(
                    "{}{}{}: {};",
                    self.readonly_prefix(),
                    field.name,
                    if optional { "?" } else { "" },
                    field.ty
                ),
                1
            )
        )
    }

    fn input_value_is_optional(&self, value: &InputValueFragment) -> bool {
        let avoid = self.config.avoid_optionals;
        !avoid.input_value && (!value.non_null || (!avoid.default_value && value.has_default))
    }

    fn render_input_value(&self, value: &InputValueFragment) -> String {
        let optional = self.input_value_is_optional(value);
        format!(
            "{}{}",
            value.comment,
            indent(
                &format!(
                    "{}{}{}: {};",
                    self.readonly_prefix(),
                    value.name,
                    if optional { "?" } else { "" },
                    value.ty
                ),
                1
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ancestor_chain_answers_context_queries() {
        let mut chain = AncestorChain::default();
        assert_eq!(chain.position(), Position::Output);
        assert_eq!(chain.nearest_definition(), None);

        chain.push(Frame::InputObject { name: "Filter", one_of: true });
        chain.push(Frame::Field("where"));
        assert!(chain.is_input_context());
        assert_eq!(chain.position(), Position::Input);
        assert_eq!(
            chain.nearest_definition(),
            Some(Frame::InputObject { name: "Filter", one_of: true })
        );

        chain.pop();
        chain.pop();
        chain.push(Frame::Object("Query"));
        chain.push(Frame::Field("user"));
        chain.push(Frame::Argument("id"));
        assert!(!chain.is_input_context());
        assert_eq!(chain.nearest_definition(), Some(Frame::Object("Query")));
    }
}
