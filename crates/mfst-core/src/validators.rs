//! # Validator Set
//!
//! Reusable predicate checks applied to field values at validation time.
//! A [`Validator`] is a descriptor stored in a field schema; applying it is
//! a pure, total function returning an [`Outcome`]. Nothing here panics on
//! any input, and nothing has side effects.
//!
//! | Validator     | Applies to        | Accepts |
//! |---------------|-------------------|---------|
//! | `Name`        | string            | DNS label: `[a-z0-9]([-a-z0-9]*[a-z0-9])?`, bounded length |
//! | `Labels`      | map of strings    | qualified keys, short label values |
//! | `Annotations` | map of strings    | qualified keys, bounded total size |
//! | `Base64`      | string            | standard alphabet, canonical padding |
//! | `DateTime`    | string            | RFC 3339 with optional fraction |
//! | `Enum`        | string            | member of a fixed set |
//! | `MaxLength`   | string            | at most `n` characters |
//!
//! The exactly-one-of rule is not a per-value validator. It is evaluated
//! once per mutual-exclusion group by the engine through [`exactly_one_of`].

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::temporal::parse_datetime;
use crate::value::{Scalar, ScalarType};

/// Result of applying a validator: accept, or reject with a reason.
pub type Outcome = Result<(), String>;

/// Default bound for DNS-label names.
pub const NAME_MAX_LEN: usize = 63;
/// Bound for a DNS subdomain (label/annotation key prefix).
pub const SUBDOMAIN_MAX_LEN: usize = 253;
/// Bound for the name segment of a qualified key.
pub const QUALIFIED_NAME_MAX_LEN: usize = 63;
/// Bound for a label value.
pub const LABEL_VALUE_MAX_LEN: usize = 63;
/// Bound for the combined size of all annotation keys and values.
pub const ANNOTATIONS_MAX_BYTES: usize = 256 * 1024;

/// What kind of node a validator can check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A scalar of the given type.
    Scalar(ScalarType),
    /// A map whose values are strings; keys and values are checked per entry.
    StringMap,
}

/// A reusable check attached to a field schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    /// DNS-label identifier of at most `max_len` characters.
    Name {
        /// Upper length bound.
        max_len: usize,
    },
    /// Label map: qualified keys, values of at most 63 characters.
    Labels,
    /// Annotation map: qualified keys, bounded total size.
    Annotations,
    /// Standard base64 payload.
    Base64,
    /// RFC 3339 timestamp.
    DateTime,
    /// Member of a fixed set of strings.
    Enum(Vec<String>),
    /// String of at most `n` characters.
    MaxLength(usize),
}

impl Validator {
    /// A DNS-label name validator with the default bound.
    pub fn name() -> Self {
        Self::Name {
            max_len: NAME_MAX_LEN,
        }
    }

    /// An enumeration validator over `allowed`.
    pub fn one_of<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(allowed.into_iter().map(Into::into).collect())
    }

    /// Short tag used in diagnostics and schema descriptions.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Name { .. } => "name",
            Self::Labels => "labels",
            Self::Annotations => "annotations",
            Self::Base64 => "base64",
            Self::DateTime => "datetime",
            Self::Enum(_) => "enum",
            Self::MaxLength(_) => "max_length",
        }
    }

    /// The kind of node this validator checks.
    pub fn target(&self) -> Target {
        match self {
            Self::Labels | Self::Annotations => Target::StringMap,
            Self::Name { .. }
            | Self::Base64
            | Self::DateTime
            | Self::Enum(_)
            | Self::MaxLength(_) => Target::Scalar(ScalarType::String),
        }
    }

    /// Check a scalar value.
    ///
    /// Map validators reject every scalar; schema construction prevents
    /// that pairing, so the rejection only surfaces for hand-built schemas.
    pub fn check(&self, value: &Scalar) -> Outcome {
        let Some(s) = value.as_str() else {
            return Err(format!(
                "expected a string for `{}` check, found {}",
                self.tag(),
                value.scalar_type()
            ));
        };
        match self {
            Self::Name { max_len } => validate_dns_label(s, *max_len),
            Self::Base64 => validate_base64(s),
            Self::DateTime => parse_datetime(s).map(|_| ()),
            Self::Enum(allowed) => validate_enum(s, allowed),
            Self::MaxLength(n) => validate_max_length(s, *n),
            Self::Labels | Self::Annotations => Err(format!(
                "`{}` validates map entries, not single values",
                self.tag()
            )),
        }
    }

    /// Check one map key. Scalar validators accept every key.
    pub fn check_key(&self, key: &str) -> Outcome {
        match self {
            Self::Labels | Self::Annotations => validate_qualified_key(key),
            _ => Ok(()),
        }
    }

    /// Check one map value. Only label values are constrained per entry.
    pub fn check_entry_value(&self, value: &str) -> Outcome {
        match self {
            Self::Labels => validate_label_value(value),
            _ => Ok(()),
        }
    }

    /// Check map-wide constraints over all entries.
    pub fn check_map<'a, I>(&self, entries: I) -> Outcome
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        match self {
            Self::Annotations => {
                let total: usize = entries.into_iter().map(|(k, v)| k.len() + v.len()).sum();
                if total > ANNOTATIONS_MAX_BYTES {
                    Err(format!(
                        "annotations total {total} bytes, must be at most {ANNOTATIONS_MAX_BYTES}"
                    ))
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name { max_len } => write!(f, "name(max {max_len})"),
            Self::Enum(allowed) => write!(f, "enum[{}]", allowed.join(", ")),
            Self::MaxLength(n) => write!(f, "max_length({n})"),
            other => f.write_str(other.tag()),
        }
    }
}

// ---------------------------------------------------------------------------
// Predicate functions
// ---------------------------------------------------------------------------

/// DNS label: lowercase alphanumerics and `-`, no leading/trailing `-`,
/// between 1 and `max_len` characters.
pub fn validate_dns_label(s: &str, max_len: usize) -> Outcome {
    if s.is_empty() {
        return Err("must not be empty".to_string());
    }
    if s.len() > max_len {
        return Err(format!("must be at most {max_len} characters, got {}", s.len()));
    }
    if let Some(bad) = s
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(format!(
            "{s:?} contains {bad:?}; only lowercase alphanumerics and '-' are allowed"
        ));
    }
    if s.starts_with('-') || s.ends_with('-') {
        return Err(format!("{s:?} must start and end with an alphanumeric character"));
    }
    Ok(())
}

/// DNS subdomain: dot-separated DNS labels, at most 253 characters.
pub fn validate_dns_subdomain(s: &str) -> Outcome {
    if s.len() > SUBDOMAIN_MAX_LEN {
        return Err(format!(
            "must be at most {SUBDOMAIN_MAX_LEN} characters, got {}",
            s.len()
        ));
    }
    s.split('.')
        .try_for_each(|label| validate_dns_label(label, NAME_MAX_LEN))
        .map_err(|e| format!("invalid DNS subdomain {s:?}: {e}"))
}

fn is_qualified_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

fn validate_qualified_name(name: &str) -> Outcome {
    if name.is_empty() {
        return Err("name segment must not be empty".to_string());
    }
    if name.len() > QUALIFIED_NAME_MAX_LEN {
        return Err(format!(
            "name segment must be at most {QUALIFIED_NAME_MAX_LEN} characters, got {}",
            name.len()
        ));
    }
    if !name.chars().all(is_qualified_char) {
        return Err(format!(
            "name segment {name:?} may contain only alphanumerics, '-', '_' and '.'"
        ));
    }
    let starts_ok = name.chars().next().is_some_and(|c| c.is_ascii_alphanumeric());
    let ends_ok = name.chars().last().is_some_and(|c| c.is_ascii_alphanumeric());
    if !(starts_ok && ends_ok) {
        return Err(format!(
            "name segment {name:?} must start and end with an alphanumeric character"
        ));
    }
    Ok(())
}

/// Qualified key `[prefix/]name`, as used by labels and annotations.
pub fn validate_qualified_key(key: &str) -> Outcome {
    match key.split_once('/') {
        None => validate_qualified_name(key),
        Some((prefix, name)) => {
            if prefix.is_empty() {
                return Err(format!("key {key:?} has an empty prefix"));
            }
            if name.contains('/') {
                return Err(format!("key {key:?} may contain at most one '/'"));
            }
            validate_dns_subdomain(prefix).map_err(|e| format!("key prefix: {e}"))?;
            validate_qualified_name(name)
        }
    }
}

/// Label value: empty, or a qualified name of at most 63 characters.
pub fn validate_label_value(value: &str) -> Outcome {
    if value.is_empty() {
        return Ok(());
    }
    if value.len() > LABEL_VALUE_MAX_LEN {
        return Err(format!(
            "label value must be at most {LABEL_VALUE_MAX_LEN} characters, got {}",
            value.len()
        ));
    }
    validate_qualified_name(value).map_err(|e| e.replace("name segment", "label value"))
}

/// Standard base64 with canonical padding.
pub fn validate_base64(s: &str) -> Outcome {
    STANDARD
        .decode(s)
        .map(|_| ())
        .map_err(|e| format!("not valid base64: {e}"))
}

/// Member of `allowed`.
pub fn validate_enum(s: &str, allowed: &[String]) -> Outcome {
    if allowed.iter().any(|a| a == s) {
        Ok(())
    } else {
        Err(format!("{s:?} is not one of [{}]", allowed.join(", ")))
    }
}

/// At most `max` characters.
pub fn validate_max_length(s: &str, max: usize) -> Outcome {
    let len = s.chars().count();
    if len > max {
        Err(format!("must be at most {max} characters, got {len}"))
    } else {
        Ok(())
    }
}

/// Exactly one of a group's members is present.
///
/// `members` lists the whole group in declaration order; `present` the
/// members found in the document.
pub fn exactly_one_of(members: &[&str], present: &[&str]) -> Outcome {
    match present.len() {
        1 => Ok(()),
        0 => Err(format!(
            "exactly one of [{}] must be set, found none",
            members.join(", ")
        )),
        n => Err(format!(
            "exactly one of [{}] must be set, found {n} ({})",
            members.join(", "),
            present.join(", ")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_accepts_dns_labels() {
        let v = Validator::name();
        for ok in ["a", "valid-name", "x1", "0abc", &"a".repeat(63)] {
            assert!(v.check(&Scalar::from(ok)).is_ok(), "{ok} should pass");
        }
    }

    #[test]
    fn name_rejects_bad_syntax() {
        let v = Validator::name();
        for bad in ["", "Invalid_Name!", "-lead", "trail-", "UPPER", "dot.ted", &"a".repeat(64)] {
            assert!(v.check(&Scalar::from(bad)).is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn name_respects_custom_bound() {
        let v = Validator::Name { max_len: 5 };
        assert!(v.check(&Scalar::from("abcde")).is_ok());
        let err = v.check(&Scalar::from("abcdef")).unwrap_err();
        assert!(err.contains("at most 5"));
    }

    #[test]
    fn scalar_validators_reject_non_strings() {
        let err = Validator::Base64.check(&Scalar::from(3)).unwrap_err();
        assert!(err.contains("expected a string"));
    }

    #[test]
    fn qualified_keys() {
        for ok in ["app", "app.kubernetes.io/name", "example.com/My_Key", "a-b.c_d"] {
            assert!(validate_qualified_key(ok).is_ok(), "{ok} should pass");
        }
        for bad in ["", "/name", "Example.com/x", "a/b/c", "-app", "app-", "ex ample", "x.io/"] {
            assert!(validate_qualified_key(bad).is_err(), "{bad:?} should fail");
        }
        let long_prefix = format!("{}/name", "a".repeat(254));
        assert!(validate_qualified_key(&long_prefix).is_err());
        let long_name = "n".repeat(64);
        assert!(validate_qualified_key(&long_name).is_err());
    }

    #[test]
    fn label_values() {
        assert!(validate_label_value("").is_ok());
        assert!(validate_label_value("v1.2_beta-3").is_ok());
        assert!(validate_label_value("has space").is_err());
        assert!(validate_label_value(&"v".repeat(64)).is_err());
        let err = validate_label_value("-x").unwrap_err();
        assert!(err.starts_with("label value"));
    }

    #[test]
    fn labels_validator_checks_keys_and_values() {
        let v = Validator::Labels;
        assert_eq!(v.target(), Target::StringMap);
        assert!(v.check_key("app").is_ok());
        assert!(v.check_key("bad key").is_err());
        assert!(v.check_entry_value("web").is_ok());
        assert!(v.check_entry_value("not valid!").is_err());
        assert!(v.check_map([("app", "web")]).is_ok());
    }

    #[test]
    fn annotations_bound_total_size_not_values() {
        let v = Validator::Annotations;
        let big = "x".repeat(1024);
        assert!(v.check_entry_value(&big).is_ok());
        assert!(v.check_map([("note", big.as_str())]).is_ok());

        let huge = "y".repeat(ANNOTATIONS_MAX_BYTES);
        let err = v.check_map([("note", huge.as_str())]).unwrap_err();
        assert!(err.contains("at most"));
    }

    #[test]
    fn base64_padding_and_alphabet() {
        assert!(validate_base64("").is_ok());
        assert!(validate_base64("aGVsbG8=").is_ok());
        assert!(validate_base64("aGVsbG8").is_err());
        assert!(validate_base64("aGVs*G8=").is_err());
        assert!(validate_base64("aGVsbG8===").is_err());
    }

    #[test]
    fn datetime_validator() {
        let v = Validator::DateTime;
        assert!(v.check(&Scalar::from("2026-10-16T08:30:00Z")).is_ok());
        assert!(v.check(&Scalar::from("2026-10-16T08:30:00.5-07:00")).is_ok());
        assert!(v.check(&Scalar::from("yesterday")).is_err());
    }

    #[test]
    fn enum_reason_cites_allowed_set() {
        let v = Validator::one_of(["SecretsManager", "ParameterStore"]);
        assert!(v.check(&Scalar::from("ParameterStore")).is_ok());
        let err = v.check(&Scalar::from("S3")).unwrap_err();
        assert!(err.contains("[SecretsManager, ParameterStore]"));
    }

    #[test]
    fn max_length_counts_chars() {
        assert!(validate_max_length("caf\u{00e9}", 4).is_ok());
        assert!(validate_max_length("abcde", 4).is_err());
    }

    #[test]
    fn exactly_one_of_counts() {
        let members = ["aws", "vault", "fake"];
        assert!(exactly_one_of(&members, &["vault"]).is_ok());
        let none = exactly_one_of(&members, &[]).unwrap_err();
        assert!(none.contains("found none"));
        let two = exactly_one_of(&members, &["aws", "vault"]).unwrap_err();
        assert!(two.contains("found 2 (aws, vault)"));
    }

    #[test]
    fn display_and_tags() {
        assert_eq!(Validator::name().to_string(), "name(max 63)");
        assert_eq!(Validator::one_of(["a", "b"]).to_string(), "enum[a, b]");
        assert_eq!(Validator::Base64.tag(), "base64");
        assert_eq!(
            Validator::DateTime.target(),
            Target::Scalar(ScalarType::String)
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn validators_are_total(s in "\\PC{0,80}") {
            let value = Scalar::from(s.as_str());
            for v in [
                Validator::name(),
                Validator::Base64,
                Validator::DateTime,
                Validator::one_of(["x"]),
                Validator::MaxLength(10),
                Validator::Labels,
            ] {
                let _ = v.check(&value);
                let _ = v.check_key(&s);
                let _ = v.check_entry_value(&s);
            }
        }

        #[test]
        fn generated_dns_labels_pass(s in "[a-z0-9]([-a-z0-9]{0,61}[a-z0-9])?") {
            prop_assert!(validate_dns_label(&s, NAME_MAX_LEN).is_ok());
        }

        #[test]
        fn base64_encoded_bytes_pass(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            let encoded = STANDARD.encode(&bytes);
            prop_assert!(validate_base64(&encoded).is_ok());
        }
    }
}
