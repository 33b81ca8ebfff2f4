//! `SecretStore` and `ClusterSecretStore`.
//!
//! A store names exactly one provider backend under `spec.provider`. Most
//! providers in turn accept exactly one authentication method.

use mfst_core::{TypeMeta, Validator};

use super::common::{metadata, secret_key_selector, service_account_ref};
use super::EXTERNAL_SECRETS_GROUP;
use crate::error::SchemaError;
use crate::field::{FieldSchema, ObjectSchema};
use crate::schema::DocumentSchema;

/// Provider backends, in declaration order.
pub const PROVIDERS: &[&str] = &["aws", "vault", "gcpsm", "azurekv", "kubernetes", "fake"];

pub fn secret_store() -> Result<DocumentSchema, SchemaError> {
    store("SecretStore", true)
}

pub fn cluster_secret_store() -> Result<DocumentSchema, SchemaError> {
    store("ClusterSecretStore", false)
}

fn store(kind: &str, namespaced: bool) -> Result<DocumentSchema, SchemaError> {
    let mut spec = ObjectSchema::new()
        .field("controller", FieldSchema::string().omit_empty())
        .field("provider", FieldSchema::object(provider()).required())
        .field(
            "retry_settings",
            FieldSchema::object(
                ObjectSchema::new()
                    .field("max_retries", FieldSchema::integer())
                    .field("retry_interval", FieldSchema::string()),
            ),
        )
        .field("refresh_interval", FieldSchema::integer());
    if !namespaced {
        spec = spec.field(
            "conditions",
            FieldSchema::list(FieldSchema::object(
                ObjectSchema::new()
                    .field(
                        "namespaces",
                        FieldSchema::list(FieldSchema::string().validate(Validator::name())),
                    )
                    .field(
                        "namespace_selector",
                        FieldSchema::object(ObjectSchema::new().field(
                            "match_labels",
                            FieldSchema::map(FieldSchema::string()).validate(Validator::Labels),
                        )),
                    ),
            ))
            .omit_empty(),
        );
    }
    DocumentSchema::new(
        TypeMeta::new(EXTERNAL_SECRETS_GROUP, kind),
        ObjectSchema::new()
            .field("metadata", metadata(namespaced))
            .field("spec", FieldSchema::object(spec).required()),
    )
}

fn provider() -> ObjectSchema {
    ObjectSchema::new()
        .field("aws", aws())
        .field("vault", vault())
        .field("gcpsm", gcpsm())
        .field("azurekv", azurekv())
        .field("kubernetes", kubernetes())
        .field("fake", fake())
        .exactly_one_of("provider", PROVIDERS)
}

fn aws() -> FieldSchema {
    let auth = ObjectSchema::new()
        .field(
            "secret_ref",
            FieldSchema::object(
                ObjectSchema::new()
                    .field("access_key_id_secret_ref", secret_key_selector())
                    .field("secret_access_key_secret_ref", secret_key_selector())
                    .field("session_token_secret_ref", secret_key_selector()),
            ),
        )
        .field(
            "jwt",
            FieldSchema::object(
                ObjectSchema::new().field("service_account_ref", service_account_ref()),
            ),
        )
        .exactly_one_of("aws_auth", &["secret_ref", "jwt"]);
    FieldSchema::object(
        ObjectSchema::new()
            .field(
                "service",
                FieldSchema::string()
                    .required()
                    .validate(Validator::one_of(["SecretsManager", "ParameterStore"])),
            )
            .field("region", FieldSchema::string().required().validate(Validator::MaxLength(64)))
            .field("role", FieldSchema::string())
            .field("auth", FieldSchema::object(auth)),
    )
}

fn vault() -> FieldSchema {
    let path_default = |path: &str| FieldSchema::string().default_value(path);
    let auth = ObjectSchema::new()
        .field("token_secret_ref", secret_key_selector())
        .field(
            "app_role",
            FieldSchema::object(
                ObjectSchema::new()
                    .field("path", path_default("approle"))
                    .field("role_id", FieldSchema::string().required())
                    .field("secret_ref", secret_key_selector().required()),
            ),
        )
        .field(
            "kubernetes",
            FieldSchema::object(
                ObjectSchema::new()
                    .field("mount_path", path_default("kubernetes"))
                    .field("role", FieldSchema::string().required())
                    .field("service_account_ref", service_account_ref())
                    .field("secret_ref", secret_key_selector()),
            ),
        )
        .field(
            "ldap",
            FieldSchema::object(
                ObjectSchema::new()
                    .field("path", path_default("ldap"))
                    .field("username", FieldSchema::string().required())
                    .field("secret_ref", secret_key_selector().required()),
            ),
        )
        .field(
            "jwt",
            FieldSchema::object(
                ObjectSchema::new()
                    .field("path", path_default("jwt"))
                    .field("role", FieldSchema::string())
                    .field("secret_ref", secret_key_selector()),
            ),
        )
        .field(
            "cert",
            FieldSchema::object(
                ObjectSchema::new()
                    .field("client_cert", secret_key_selector())
                    .field("secret_ref", secret_key_selector()),
            ),
        )
        .exactly_one_of(
            "vault_auth",
            &["token_secret_ref", "app_role", "kubernetes", "ldap", "jwt", "cert"],
        );
    FieldSchema::object(
        ObjectSchema::new()
            .field("server", FieldSchema::string().required().describe("Vault address"))
            .field("path", FieldSchema::string())
            .field(
                "version",
                FieldSchema::string()
                    .validate(Validator::one_of(["v1", "v2"]))
                    .default_value("v2"),
            )
            .field("namespace", FieldSchema::string())
            .field("ca_bundle", FieldSchema::string().validate(Validator::Base64))
            .field("auth", FieldSchema::object(auth).required()),
    )
}

fn gcpsm() -> FieldSchema {
    FieldSchema::object(
        ObjectSchema::new()
            .field("project_id", FieldSchema::string().required().rename("projectID"))
            .field(
                "auth",
                FieldSchema::object(
                    ObjectSchema::new()
                        .field(
                            "secret_ref",
                            FieldSchema::object(ObjectSchema::new().field(
                                "secret_access_key_secret_ref",
                                secret_key_selector().required(),
                            )),
                        )
                        .field(
                            "workload_identity",
                            FieldSchema::object(
                                ObjectSchema::new()
                                    .field("service_account_ref", service_account_ref().required())
                                    .field("cluster_location", FieldSchema::string().required())
                                    .field("cluster_name", FieldSchema::string().required()),
                            ),
                        )
                        .exactly_one_of("gcpsm_auth", &["secret_ref", "workload_identity"]),
                ),
            ),
    )
}

fn azurekv() -> FieldSchema {
    FieldSchema::object(
        ObjectSchema::new()
            .field("vault_url", FieldSchema::string().required())
            .field("tenant_id", FieldSchema::string())
            .field(
                "auth_type",
                FieldSchema::string()
                    .validate(Validator::one_of([
                        "ServicePrincipal",
                        "ManagedIdentity",
                        "WorkloadIdentity",
                    ]))
                    .default_value("ServicePrincipal"),
            )
            .field("identity_id", FieldSchema::string())
            .field(
                "auth_secret_ref",
                FieldSchema::object(
                    ObjectSchema::new()
                        .field("client_id", secret_key_selector())
                        .field("client_secret", secret_key_selector()),
                ),
            )
            .field("service_account_ref", service_account_ref()),
    )
}

fn kubernetes() -> FieldSchema {
    let auth = ObjectSchema::new()
        .field(
            "token",
            FieldSchema::object(ObjectSchema::new().field("bearer_token", secret_key_selector().required())),
        )
        .field("service_account", service_account_ref())
        .field(
            "cert",
            FieldSchema::object(
                ObjectSchema::new()
                    .field("client_cert", secret_key_selector().required())
                    .field("client_key", secret_key_selector().required()),
            ),
        )
        .exactly_one_of("kubernetes_auth", &["token", "service_account", "cert"]);
    FieldSchema::object(
        ObjectSchema::new()
            .field(
                "remote_namespace",
                FieldSchema::string()
                    .validate(Validator::name())
                    .default_value("default"),
            )
            .field(
                "server",
                FieldSchema::object(
                    ObjectSchema::new()
                        .field("url", FieldSchema::string())
                        .field("ca_bundle", FieldSchema::string().validate(Validator::Base64)),
                ),
            )
            .field("auth", FieldSchema::object(auth).required()),
    )
}

fn fake() -> FieldSchema {
    FieldSchema::object(ObjectSchema::new().field(
        "data",
        FieldSchema::list(FieldSchema::object(
            ObjectSchema::new()
                .field("key", FieldSchema::string().required())
                .field("value", FieldSchema::string())
                .field("version", FieldSchema::string())
                .field("value_map", FieldSchema::map(FieldSchema::string()).omit_empty()),
        ))
        .required(),
    ))
}
