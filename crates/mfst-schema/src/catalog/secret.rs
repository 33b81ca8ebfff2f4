//! Core `Secret`.

use mfst_core::{TypeMeta, Validator};

use super::common::metadata;
use crate::error::SchemaError;
use crate::field::{FieldSchema, ObjectSchema};
use crate::schema::DocumentSchema;

pub fn secret() -> Result<DocumentSchema, SchemaError> {
    DocumentSchema::new(
        TypeMeta::new("v1", "Secret"),
        ObjectSchema::new()
            .field("metadata", metadata(true))
            .field("type", FieldSchema::string().default_value("Opaque"))
            .field(
                "data",
                FieldSchema::map(FieldSchema::string().validate(Validator::Base64))
                    .omit_empty()
                    .describe("base64-encoded values"),
            )
            .field("string_data", FieldSchema::map(FieldSchema::string()).omit_empty())
            .field("immutable", FieldSchema::boolean()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::validate;
    use serde_json::json;

    #[test]
    fn data_values_must_be_base64() {
        let schema = secret().unwrap();
        let d = validate(
            &json!({
                "metadata": {"name": "creds"},
                "data": {"password": "cGFzcw==", "token": "not base64!"},
                "string_data": {"plain": "anything goes"}
            }),
            &schema,
        );
        assert_eq!(d.len(), 1);
        assert_eq!(d.as_slice()[0].path.to_string(), "data[\"token\"]");
    }
}
