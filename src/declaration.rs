//! Declaration blocks: one named top-level `type`, `interface` or `enum`.

use crate::config::DeclarationKind;
use crate::ir::{Directive, find_directive};

pub const DEFAULT_DEPRECATION_REASON: &str = "Field no longer supported";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Type,
    Interface,
    Enum,
}

impl From<DeclarationKind> for BlockKind {
    fn from(kind: DeclarationKind) -> Self {
        match kind {
            DeclarationKind::Type => BlockKind::Type,
            DeclarationKind::Interface => BlockKind::Interface,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeclarationBlock {
    kind: BlockKind,
    name: String,
    export: bool,
    comment: Option<String>,
    content: String,
    block: Option<String>,
}

impl DeclarationBlock {
    pub fn new(kind: BlockKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            export: true,
            comment: None,
            content: String::new(),
            block: None,
        }
    }

    pub fn export(mut self, export: bool) -> Self {
        self.export = export;
        self
    }

    pub fn with_comment(mut self, comment: Option<&str>) -> Self {
        self.comment = comment.filter(|c| !c.is_empty()).map(str::to_string);
        self
    }

    /// Inline content placed before any block (e.g. `A & B & `).
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Body lines, already indented. Empty means no block.
    pub fn with_block(mut self, body: impl Into<String>) -> Self {
        let body = body.into();
        self.block = if body.is_empty() { None } else { Some(body) };
        self
    }

    /// Supertypes followed by the field block. For `type` kinds the
    /// supertypes are intersected and the trailing ` & ` appears only when
    /// fields follow; for `interface` kinds they become an `extends` clause.
    pub fn with_supertypes_and_fields(self, supertypes: &[String], fields: &[String]) -> Self {
        let body = fields.join("\n");
        if supertypes.is_empty() {
            return self.with_block(body);
        }
        let content = match self.kind {
            BlockKind::Interface => format!("extends {} ", supertypes.join(", ")),
            _ if fields.is_empty() => supertypes.join(" & "),
            _ => format!("{} & ", supertypes.join(" & ")),
        };
        self.with_content(content).with_block(body)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(comment) = &self.comment {
            out.push_str(&transform_comment(comment, 0));
        }
        if self.export {
            out.push_str("export ");
        }
        match self.kind {
            BlockKind::Type => {
                out.push_str("type ");
                out.push_str(&self.name);
                // content starting on its own line keeps `=` at the end of the line
                out.push_str(if self.content.starts_with('\n') { " =" } else { " = " });
            }
            BlockKind::Interface => {
                out.push_str("interface ");
                out.push_str(&self.name);
                out.push(' ');
            }
            BlockKind::Enum => {
                out.push_str("enum ");
                out.push_str(&self.name);
                out.push(' ');
            }
        }
        out.push_str(&self.content);
        match &self.block {
            Some(body) => {
                out.push_str("{\n");
                out.push_str(body);
                out.push_str("\n}");
            }
            None if self.content.is_empty() || self.kind == BlockKind::Interface => out.push_str("{}"),
            None => {}
        }
        if self.kind == BlockKind::Type {
            out.push(';');
        }
        out.push('\n');
        out
    }
}

/// Two spaces per level.
pub fn indent(text: &str, level: usize) -> String {
    format!("{}{text}", "  ".repeat(level))
}

/// JSDoc comment. Returns an empty string for empty input.
pub fn transform_comment(comment: &str, level: usize) -> String {
    if comment.is_empty() {
        return String::new();
    }
    let escaped = comment.replace("*/", "*\\/");
    let lines: Vec<&str> = escaped.split('\n').collect();
    if lines.len() == 1 {
        return format!("{}\n", indent(&format!("/** {} */", lines[0]), level));
    }
    let mut out = vec![indent("/**", level)];
    for line in lines {
        out.push(indent(&format!(" * {line}").trim_end(), level));
    }
    out.push(indent(" */", level));
    format!("{}\n", out.join("\n"))
}

/// The reason of a `@deprecated` directive: its literal string `reason`
/// argument, or the fixed default.
pub fn deprecation_reason(directive: &Directive) -> String {
    directive
        .arguments
        .get("reason")
        .and_then(|value| value.as_str())
        .unwrap_or(DEFAULT_DEPRECATION_REASON)
        .to_string()
}

/// Member comment: description, plus `@deprecated <reason>` when deprecated.
pub fn member_comment(description: Option<&str>, directives: &[Directive], level: usize) -> String {
    let mut text = description.unwrap_or_default().to_string();
    if let Some(deprecated) = find_directive(directives, "deprecated") {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str("@deprecated ");
        text.push_str(&deprecation_reason(deprecated));
    }
    transform_comment(&text, level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn deprecated(reason: Option<&str>) -> Directive {
        let mut arguments = IndexMap::new();
        if let Some(reason) = reason {
            arguments.insert("reason".to_string(), serde_json::json!(reason));
        }
        Directive { name: "deprecated".into(), arguments }
    }

    #[test]
    fn comments_single_and_multi_line() {
        assert_eq!(transform_comment("A user", 0), "/** A user */\n");
        assert_eq!(transform_comment("one\ntwo", 1), "  /**\n   * one\n   * two\n   */\n");
        assert_eq!(transform_comment("a */ b", 0), "/** a *\\/ b */\n");
        assert_eq!(transform_comment("", 0), "");
    }

    #[test]
    fn deprecation_defaults_and_explicit_reasons() {
        let comment = member_comment(None, &[deprecated(None)], 1);
        assert_eq!(comment, "  /** @deprecated Field no longer supported */\n");

        let comment = member_comment(Some("The name"), &[deprecated(Some("Use fullName"))], 1);
        assert_eq!(comment, "  /**\n   * The name\n   * @deprecated Use fullName\n   */\n");
    }

    #[test]
    fn non_string_reasons_fall_back_to_the_default() {
        let mut directive = deprecated(None);
        directive.arguments.insert("reason".into(), serde_json::json!(42));
        assert_eq!(deprecation_reason(&directive), DEFAULT_DEPRECATION_REASON);
    }

    #[test]
    fn type_with_supertypes_and_fields() {
        let block = DeclarationBlock::new(BlockKind::Type, "User")
            .with_comment(Some("A user"))
            .with_supertypes_and_fields(
                &["Node".into(), "Entity".into()],
                &["  __typename?: 'User';".into()],
            );
        assert_eq!(
            block.render(),
            "/** A user */\nexport type User = Node & Entity & {\n  __typename?: 'User';\n};\n"
        );
    }

    #[test]
    fn supertypes_without_fields_drop_the_trailing_combinator() {
        let block = DeclarationBlock::new(BlockKind::Type, "User")
            .with_supertypes_and_fields(&["Node".into(), "Entity".into()], &[]);
        assert_eq!(block.render(), "export type User = Node & Entity;\n");
    }

    #[test]
    fn interfaces_extend_and_skip_the_terminator() {
        let block = DeclarationBlock::new(BlockKind::Interface, "User")
            .export(false)
            .with_supertypes_and_fields(&["Node".into()], &["  id: string;".into()]);
        assert_eq!(block.render(), "interface User extends Node {\n  id: string;\n}\n");
    }

    #[test]
    fn empty_type_renders_empty_object() {
        let block = DeclarationBlock::new(BlockKind::Type, "Empty");
        assert_eq!(block.render(), "export type Empty = {};\n");
    }

    #[test]
    fn content_on_its_own_line() {
        let block = DeclarationBlock::new(BlockKind::Type, "Pick").with_content("\n  | { a: number; }");
        assert_eq!(block.render(), "export type Pick =\n  | { a: number; };\n");
    }
}
