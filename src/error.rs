//! Error taxonomy for the compiler.
//!
//! Only schema-construction violations abort a generation pass. Unknown type
//! names and missing override sources are not errors: they fall through to a
//! converted identifier.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    /// A `@oneOf` input object declares a non-null member.
    #[error(
        "input object `{type_name}` is marked @oneOf but field `{field}` is non-null; \
         oneOf members must be nullable (was the schema validated?)"
    )]
    NonNullOneOfField { type_name: String, field: String },

    /// A GraphQL type reference such as `[User!]!` failed to parse.
    #[error("malformed type reference `{source_text}`: {reason}")]
    MalformedTypeRef { source_text: String, reason: &'static str },

    /// A scalar/enum/directive mapper string could not be understood.
    #[error("invalid mapper `{raw}` for `{name}`: {reason}")]
    InvalidMapper {
        name: String,
        raw: String,
        reason: &'static str,
    },

    /// JSON input did not match the expected shape.
    #[error("at JSON path {path} → {message}")]
    Deserialize { path: String, message: String },
}

pub type Result<T, E = CodegenError> = std::result::Result<T, E>;
