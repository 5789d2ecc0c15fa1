use super::{FieldFragment, Folder};
use crate::declaration::DeclarationBlock;

impl<'a> Folder<'a> {
    /// `<Type><infix><Field>Args` declarations for every field with arguments.
    pub(super) fn argument_types(&self, type_name: &str, fields: &[FieldFragment]) -> Vec<String> {
        if self.config.only_enums {
            return Vec::new();
        }
        fields
            .iter()
            .filter(|f| !f.arguments.is_empty())
            .map(|field| {
                let raw_name = format!(
                    "{type_name}{}{}Args",
                    self.config.args_infix,
                    self.namer.convert(&field.name, crate::naming::ConvertOptions::bare())
                );
                let lines: Vec<String> = field.arguments.iter().map(|a| self.render_input_value(a)).collect();
                DeclarationBlock::new(self.config.declaration_kind.arguments.into(), self.namer.type_name(&raw_name))
                    .export(!self.config.no_export)
                    .with_block(lines.join("\n"))
                    .render()
            })
            .collect()
    }

    /// A type's declaration followed by its argument declarations.
    pub(super) fn with_argument_types(&self, declaration: String, type_name: &str, fields: &[FieldFragment]) -> String {
        let mut parts = vec![declaration];
        parts.extend(self.argument_types(type_name, fields));
        parts.join("\n")
    }
}
