use super::{Folder, InputValueFragment};

impl<'a> Folder<'a> {
    /// Union content for a `@oneOf` input object: one arm per declared field,
    /// in declaration order. The chosen field comes first, unwrapped and
    /// required; every other field is `?: never`. Non-null members were
    /// rejected while folding the fields.
    pub(super) fn expand_one_of(&self, fields: &[InputValueFragment]) -> String {
        let readonly = self.readonly_prefix();
        let mut content = String::new();
        for field in fields {
            let mut parts = vec![format!("{readonly}{}: {};", field.name, field.ty.clone().non_null())];
            parts.extend(
                fields
                    .iter()
                    .filter(|other| other.name != field.name)
                    .map(|other| format!("{readonly}{}?: never;", other.name)),
            );
            content.push('\n');
            content.push_str(&field.comment);
            content.push_str(&format!("  | {{ {} }}", parts.join(" ")));
        }
        content
    }
}

#[cfg(test)]
mod tests {
    use crate::codegen::Codegen;
    use crate::config::{Config, RawConfig};
    use crate::error::CodegenError;
    use crate::ir::Document;

    fn document(fields: serde_json::Value) -> Document {
        serde_json::from_value(serde_json::json!({
            "definitions": [
                { "kind": "inputObject", "name": "Pick", "fields": fields,
                  "directives": [ { "name": "oneOf" } ] }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn one_arm_per_field_in_declaration_order() {
        let doc = document(serde_json::json!([
            { "name": "a", "type": "Int" },
            { "name": "b", "type": "String" }
        ]));
        let output = Codegen::new(&doc, &Config::default()).generate().unwrap();
        assert!(
            output.content.contains(
                "export type Pick =\n  \
                 | { a: Scalars['Int']; b?: never; }\n  \
                 | { b: Scalars['String']; a?: never; };\n"
            ),
            "{}",
            output.content
        );
    }

    #[test]
    fn non_null_members_abort_the_pass() {
        let doc = document(serde_json::json!([
            { "name": "a", "type": "Int" },
            { "name": "b", "type": "String!" }
        ]));
        let err = Codegen::new(&doc, &Config::default()).generate().unwrap_err();
        match err {
            CodegenError::NonNullOneOfField { type_name, field } => {
                assert_eq!(type_name, "Pick");
                assert_eq!(field, "b");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_null_members_fail_even_when_inputs_are_suppressed() {
        let mut doc = document(serde_json::json!([ { "name": "a", "type": "Int!" } ]));
        doc.definitions.push(
            serde_json::from_value(serde_json::json!({
                "kind": "enum", "name": "E", "values": [ { "name": "A" } ]
            }))
            .unwrap(),
        );
        let config = Config::from_raw(
            serde_json::from_value::<RawConfig>(serde_json::json!({ "onlyEnums": true })).unwrap(),
        )
        .unwrap();
        let err = Codegen::new(&doc, &config).generate().unwrap_err();
        assert!(
            matches!(&err, CodegenError::NonNullOneOfField { type_name, field } if type_name == "Pick" && field == "a"),
            "{err}"
        );
    }

    #[test]
    fn list_members_keep_their_item_wrappers() {
        let doc = document(serde_json::json!([ { "name": "ids", "type": "[ID]" } ]));
        let output = Codegen::new(&doc, &Config::default()).generate().unwrap();
        assert!(
            output.content.contains("| { ids: Array<InputMaybe<Scalars['ID']>>; }"),
            "{}",
            output.content
        );
    }
}
