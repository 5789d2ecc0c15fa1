use super::{Folder, Frame};
use crate::declaration::{BlockKind, DeclarationBlock, indent, member_comment};
use crate::ir::EnumTypeDefinition;
use crate::naming::ConvertOptions;

struct EnumValueFragment {
    identifier: String,
    literal: String,
    comment: String,
}

impl<'a> Folder<'a> {
    pub(super) fn fold_enum(&mut self, def: &'a EnumTypeDefinition) -> Option<String> {
        self.ancestors.push(Frame::Enum(&def.name));
        let mapping = self.tables.enum_values.get(&def.name);
        let values: Vec<EnumValueFragment> = def
            .values
            .iter()
            .map(|value| {
                let literal = mapping
                    .and_then(|m| m.mapped_values.get(&value.name))
                    .cloned()
                    .unwrap_or_else(|| value.name.clone());
                EnumValueFragment {
                    identifier: self.enum_member_identifier(&value.name),
                    literal,
                    comment: member_comment(value.description.as_deref(), &value.directives, 1),
                }
            })
            .collect();
        self.ancestors.pop();

        if let Some(mapping) = mapping.filter(|m| m.source.is_some()) {
            let local = &mapping.type_identifier;
            return match (mapping.namespaced, self.config.no_export) {
                (true, false) => Some(format!(
                    "export import {local} = {};\n",
                    mapping.import_identifier.as_deref().unwrap_or(local)
                )),
                (true, true) => Some(format!(
                    "import {local} = {};\n",
                    mapping.import_identifier.as_deref().unwrap_or(local)
                )),
                (false, false) => Some(format!("export {{ {local} }};\n")),
                (false, true) => None,
            };
        }

        let name = self.resolver.enum_name(&def.name);
        let block = DeclarationBlock::new(if self.config.enums_as_types { BlockKind::Type } else { BlockKind::Enum }, name)
            .export(!self.config.no_export)
            .with_comment(def.description.as_deref());

        let block = if self.config.enums_as_types {
            let mut arms: Vec<String> = values
                .iter()
                .map(|v| format!("\n{}{}", v.comment, indent(&format!("| {}", quote(&v.literal)), 1)))
                .collect();
            if self.config.future_proof_enums {
                arms.push(format!("\n{}", indent("| '%future added value'", 1)));
            }
            block.with_content(arms.concat())
        } else {
            let lines: Vec<String> = values
                .iter()
                .map(|v| format!("{}{}", v.comment, indent(&format!("{} = {}", v.identifier, quote(&v.literal)), 1)))
                .collect();
            block.with_block(lines.join(",\n"))
        };
        Some(block.render())
    }

    fn enum_member_identifier(&self, name: &str) -> String {
        let converted = self.namer.convert(
            name,
            ConvertOptions { use_types_prefix: false, use_types_suffix: false, transform_underscore: true },
        );
        if converted.starts_with(|c: char| c.is_ascii_digit()) {
            quote(&converted)
        } else {
            converted
        }
    }
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "\\'"))
}
