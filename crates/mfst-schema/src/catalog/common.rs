//! Field sets shared by several document types.

use mfst_core::Validator;

use crate::field::{FieldSchema, ObjectSchema};

/// Bound for a secret key name.
const SECRET_KEY_MAX_LEN: usize = 253;

/// Standard object metadata.
///
/// Cluster-scoped types omit `namespace`.
pub fn metadata(namespaced: bool) -> FieldSchema {
    let mut object = ObjectSchema::new().field(
        "name",
        FieldSchema::string()
            .required()
            .validate(Validator::name())
            .describe("DNS-label name, unique per namespace"),
    );
    if namespaced {
        object = object.field("namespace", FieldSchema::string().validate(Validator::name()));
    }
    let object = object
        .field(
            "labels",
            FieldSchema::map(FieldSchema::string())
                .validate(Validator::Labels)
                .omit_empty(),
        )
        .field(
            "annotations",
            FieldSchema::map(FieldSchema::string())
                .validate(Validator::Annotations)
                .omit_empty(),
        )
        .field(
            "creation_timestamp",
            FieldSchema::string().validate(Validator::DateTime),
        );
    FieldSchema::object(object).required()
}

/// Reference to one key of a `Secret`.
pub fn secret_key_selector() -> FieldSchema {
    FieldSchema::object(
        ObjectSchema::new()
            .field("name", FieldSchema::string().required().validate(Validator::name()))
            .field(
                "key",
                FieldSchema::string().validate(Validator::MaxLength(SECRET_KEY_MAX_LEN)),
            )
            .field("namespace", FieldSchema::string().validate(Validator::name())),
    )
}

/// Reference to a `ServiceAccount`.
pub fn service_account_ref() -> FieldSchema {
    FieldSchema::object(
        ObjectSchema::new()
            .field("name", FieldSchema::string().required().validate(Validator::name()))
            .field("namespace", FieldSchema::string().validate(Validator::name()))
            .field(
                "audiences",
                FieldSchema::list(FieldSchema::string()).omit_empty(),
            ),
    )
}
