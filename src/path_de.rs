use serde::de::DeserializeOwned;

use crate::error::CodegenError;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, CodegenError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_codegen_error)
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodegenError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_codegen_error)
}

fn into_codegen_error(err: serde_path_to_error::Error<serde_json::Error>) -> CodegenError {
    let path = err.path().to_string();
    CodegenError::Deserialize {
        path,
        message: err.into_inner().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Document;

    #[test]
    fn error_names_the_offending_path() {
        let src = r#"{ "definitions": [ { "kind": "object", "name": "User",
            "fields": [ { "name": "id", "type": "[ID" } ] } ] }"#;
        let err = from_str_with_path::<Document>(src).unwrap_err();
        match err {
            CodegenError::Deserialize { path, message } => {
                assert!(path.starts_with("definitions[0]"), "{path}");
                assert!(message.contains("[ID"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn slices_decode_like_strings() {
        let doc: Document = from_slice_with_path(br#"{ "definitions": [] }"#).unwrap();
        assert!(doc.definitions.is_empty());
    }
}
