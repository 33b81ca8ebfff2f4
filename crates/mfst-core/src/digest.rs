//! # Shape Digest
//!
//! A [`ShapeDigest`] fingerprints the *shape* of a rendered document: its
//! body without the per-render identifier. Two renders of an unchanged tree
//! carry the same digest, so a host that persists the digest alongside the
//! identifier can tell whether a re-render actually changed anything.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// SHA-256 digest of a canonicalized document body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ShapeDigest([u8; 32]);

impl ShapeDigest {
    const PREFIX: &'static str = "sha256:";

    /// Access the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ShapeDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.to_hex())
    }
}

impl From<ShapeDigest> for String {
    fn from(d: ShapeDigest) -> Self {
        d.to_string()
    }
}

impl TryFrom<String> for ShapeDigest {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let hex = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| format!("digest must start with {:?}: {s:?}", Self::PREFIX))?;
        if hex.len() != 64 || !hex.is_ascii() {
            return Err(format!("digest must have 64 hex characters, got {}", hex.len()));
        }
        let mut bytes = [0u8; 32];
        for (i, byte) in bytes.iter_mut().enumerate() {
            let pair = &hex[i * 2..i * 2 + 2];
            *byte = u8::from_str_radix(pair, 16)
                .map_err(|_| format!("invalid hex in digest: {pair:?}"))?;
        }
        Ok(Self(bytes))
    }
}

/// Compute the shape digest of canonical bytes.
///
/// Accepts only `&CanonicalBytes` so that every digest in the system is
/// taken over the JCS form, never over a presentation format.
pub fn shape_digest(data: &CanonicalBytes) -> ShapeDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ShapeDigest(bytes)
}
