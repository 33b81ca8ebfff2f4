//! # Catalog of Document Types
//!
//! Document types are data: each is a [`DocumentSchema`] built from the
//! field-schema builder, and a [`Catalog`] maps type-names to schemas.
//! Adding a type means adding a schema function here, not a new code
//! path through the engine.
//!
//! [`Catalog::builtin`] registers:
//!
//! | Kind                 | apiVersion                    |
//! |----------------------|-------------------------------|
//! | `SecretStore`        | `external-secrets.io/v1beta1` |
//! | `ClusterSecretStore` | `external-secrets.io/v1beta1` |
//! | `ExternalSecret`     | `external-secrets.io/v1beta1` |
//! | `Secret`             | `v1`                          |
//!
//! The catalog is built once at startup. A [`SchemaError`] from
//! `builtin` is a programming error and should abort the process.

pub mod common;
pub mod external_secret;
pub mod secret;
pub mod secret_store;

use std::collections::BTreeMap;

use crate::error::SchemaError;
use crate::schema::DocumentSchema;

/// Type-group shared by the external-secrets document types.
pub const EXTERNAL_SECRETS_GROUP: &str = "external-secrets.io/v1beta1";

/// Registry of document schemas keyed by type-name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    schemas: BTreeMap<String, DocumentSchema>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in document types.
    ///
    /// # Errors
    ///
    /// Any [`SchemaError`] raised while constructing a built-in schema.
    pub fn builtin() -> Result<Self, SchemaError> {
        let mut catalog = Self::new();
        catalog.register(secret_store::secret_store()?)?;
        catalog.register(secret_store::cluster_secret_store()?)?;
        catalog.register(external_secret::external_secret()?)?;
        catalog.register(secret::secret()?)?;
        tracing::debug!(types = catalog.len(), "built document catalog");
        Ok(catalog)
    }

    /// Add a schema.
    ///
    /// # Errors
    ///
    /// [`SchemaError::DuplicateDocumentType`] if the type-name is taken.
    pub fn register(&mut self, schema: DocumentSchema) -> Result<(), SchemaError> {
        let kind = schema.kind().to_string();
        if self.schemas.contains_key(&kind) {
            return Err(SchemaError::DuplicateDocumentType { kind });
        }
        self.schemas.insert(kind, schema);
        Ok(())
    }

    /// Look up a schema by type-name.
    pub fn get(&self, kind: &str) -> Option<&DocumentSchema> {
        self.schemas.get(kind)
    }

    /// Registered type-names, sorted.
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    /// Registered schemas, sorted by type-name.
    pub fn iter(&self) -> impl Iterator<Item = &DocumentSchema> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
