//! # Document Identity
//!
//! Every rendered document carries three computed fields that the caller
//! can never set: a fresh [`DocumentId`] and the two discriminators in
//! [`TypeMeta`] (type-group and type-name, rendered as `apiVersion` and
//! `kind`).

use serde::{Deserialize, Serialize};

use crate::error::MfstError;

/// Identifier assigned to a document at render time.
///
/// The value is a nanosecond timestamp from an [`IdSource`](crate::IdSource),
/// made unique by the source's tie-breaker. It serializes as a decimal string
/// so hosts with 53-bit number types do not lose precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct DocumentId(u64);

impl DocumentId {
    /// Wrap a raw identifier value.
    pub fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// The raw identifier value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DocumentId {
    type Err = MfstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|e| MfstError::InvalidDocumentId {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for DocumentId {
    type Error = MfstError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// The two fixed discriminators of a document type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeMeta {
    /// Type-group, rendered under [`TypeMeta::GROUP_KEY`].
    pub api_version: String,
    /// Type-name, rendered under [`TypeMeta::NAME_KEY`].
    pub kind: String,
}

impl TypeMeta {
    /// Canonical key of the type-group discriminator.
    pub const GROUP_KEY: &'static str = "apiVersion";
    /// Canonical key of the type-name discriminator.
    pub const NAME_KEY: &'static str = "kind";

    /// Create a type descriptor.
    pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
        }
    }
}

impl std::fmt::Display for TypeMeta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.api_version, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_parses_decimal() {
        let id: DocumentId = "1760601600000000000".parse().unwrap();
        assert_eq!(id.as_u64(), 1_760_601_600_000_000_000);
        assert_eq!(id.to_string(), "1760601600000000000");
    }

    #[test]
    fn document_id_rejects_garbage() {
        assert!("".parse::<DocumentId>().is_err());
        assert!("-1".parse::<DocumentId>().is_err());
        assert!("12ab".parse::<DocumentId>().is_err());
    }

    #[test]
    fn document_id_serializes_as_string() {
        let id = DocumentId::from_raw(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42\"");
        let back: DocumentId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn document_ids_order_numerically() {
        assert!(DocumentId::from_raw(9) < DocumentId::from_raw(10));
    }

    #[test]
    fn type_meta_display() {
        let tm = TypeMeta::new("external-secrets.io/v1beta1", "SecretStore");
        assert_eq!(tm.to_string(), "external-secrets.io/v1beta1/SecretStore");
    }
}
