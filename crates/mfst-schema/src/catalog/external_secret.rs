//! `ExternalSecret`: which remote values to fetch and how to shape the
//! resulting `Secret`.

use mfst_core::{TypeMeta, Validator};

use super::common::metadata;
use super::EXTERNAL_SECRETS_GROUP;
use crate::error::SchemaError;
use crate::field::{FieldSchema, ObjectSchema};
use crate::schema::DocumentSchema;

pub fn external_secret() -> Result<DocumentSchema, SchemaError> {
    let spec = ObjectSchema::new()
        .field(
            "secret_store_ref",
            FieldSchema::object(
                ObjectSchema::new()
                    .field("name", FieldSchema::string().required().validate(Validator::name()))
                    .field(
                        "kind",
                        FieldSchema::string()
                            .validate(Validator::one_of(["SecretStore", "ClusterSecretStore"]))
                            .default_value("SecretStore"),
                    ),
            )
            .required(),
        )
        .field("refresh_interval", FieldSchema::string().default_value("1h"))
        .field("target", target())
        .field(
            "data",
            FieldSchema::list(FieldSchema::object(
                ObjectSchema::new()
                    .field("secret_key", FieldSchema::string().required())
                    .field("remote_ref", remote_ref().required()),
            ))
            .omit_empty(),
        )
        .field("data_from", FieldSchema::list(data_from_source()).omit_empty());

    DocumentSchema::new(
        TypeMeta::new(EXTERNAL_SECRETS_GROUP, "ExternalSecret"),
        ObjectSchema::new()
            .field("metadata", metadata(true))
            .field("spec", FieldSchema::object(spec).required()),
    )
}

fn target() -> FieldSchema {
    FieldSchema::object(
        ObjectSchema::new()
            .field("name", FieldSchema::string().validate(Validator::name()))
            .field(
                "creation_policy",
                FieldSchema::string()
                    .validate(Validator::one_of(["Owner", "Orphan", "Merge", "None"]))
                    .default_value("Owner"),
            )
            .field(
                "deletion_policy",
                FieldSchema::string()
                    .validate(Validator::one_of(["Delete", "Merge", "Retain"]))
                    .default_value("Retain"),
            )
            .field("immutable", FieldSchema::boolean())
            .field(
                "template",
                FieldSchema::object(
                    ObjectSchema::new()
                        .field("type", FieldSchema::string())
                        .field("data", FieldSchema::map(FieldSchema::string()).omit_empty()),
                ),
            ),
    )
}

fn remote_ref() -> FieldSchema {
    FieldSchema::object(
        ObjectSchema::new()
            .field("key", FieldSchema::string().required())
            .field("property", FieldSchema::string())
            .field("version", FieldSchema::string())
            .field(
                "decoding_strategy",
                FieldSchema::string()
                    .validate(Validator::one_of(["Auto", "Base64", "Base64URL", "None"]))
                    .default_value("None"),
            ),
    )
}

/// One `data_from` item: either extract one remote key or find many.
fn data_from_source() -> FieldSchema {
    FieldSchema::object(
        ObjectSchema::new()
            .field(
                "extract",
                FieldSchema::object(
                    ObjectSchema::new()
                        .field("key", FieldSchema::string().required())
                        .field("property", FieldSchema::string())
                        .field("version", FieldSchema::string()),
                ),
            )
            .field(
                "find",
                FieldSchema::object(
                    ObjectSchema::new()
                        .field("path", FieldSchema::string())
                        .field(
                            "name",
                            FieldSchema::object(
                                ObjectSchema::new().field("regexp", FieldSchema::string().required()),
                            ),
                        )
                        .field("tags", FieldSchema::map(FieldSchema::string()).omit_empty()),
                ),
            )
            .exactly_one_of("source", &["extract", "find"]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::validate;
    use serde_json::json;

    #[test]
    fn builds() {
        assert_eq!(external_secret().unwrap().kind(), "ExternalSecret");
    }

    #[test]
    fn each_data_from_item_has_exactly_one_source() {
        let schema = external_secret().unwrap();
        let d = validate(
            &json!({
                "metadata": {"name": "db-creds"},
                "spec": {
                    "secret_store_ref": {"name": "vault"},
                    "data_from": [
                        {"extract": {"key": "db"}},
                        {"extract": {"key": "db"}, "find": {"path": "x"}},
                        {}
                    ]
                }
            }),
            &schema,
        );
        let paths: Vec<String> = d.iter().map(|x| x.path.to_string()).collect();
        assert_eq!(paths, ["spec.data_from[1]", "spec.data_from[2]"]);
    }

    #[test]
    fn policy_enums_cite_allowed_values() {
        let schema = external_secret().unwrap();
        let d = validate(
            &json!({
                "metadata": {"name": "db-creds"},
                "spec": {
                    "secret_store_ref": {"name": "vault", "kind": "Vault"},
                    "target": {"creation_policy": "Always"}
                }
            }),
            &schema,
        );
        assert_eq!(d.len(), 2);
        assert!(d.as_slice()[0].message.contains("[SecretStore, ClusterSecretStore]"));
        assert!(d.as_slice()[1].message.contains("[Owner, Orphan, Merge, None]"));
    }
}
