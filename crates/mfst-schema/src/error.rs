//! # Schema and Render Errors
//!
//! Two failure families live here, and neither is a per-request user error:
//!
//! - [`SchemaError`]: a document type was declared inconsistently. Raised
//!   once by [`DocumentSchema::new`](crate::DocumentSchema::new) at process
//!   start and treated as fatal.
//! - [`RenderError`]: the serializer met a tree that does not match its
//!   schema, or an encoder failed. Only reachable when a caller renders an
//!   unvalidated or foreign document.
//!
//! User-facing problems are [`Diagnostics`], surfaced through
//! [`RenderFailure::Invalid`].

use mfst_core::{CanonicalizationError, Diagnostics, FieldPath};
use thiserror::Error;

/// Inconsistent schema declaration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A document type has a blank type-group or type-name.
    #[error("document type must have a non-empty apiVersion and kind")]
    EmptyTypeMeta,

    /// A field name that cannot appear in a path.
    #[error("{path}: invalid field name {name:?} (expected lowercase snake_case)")]
    InvalidFieldName {
        /// Object declaring the field.
        path: FieldPath,
        /// The offending name.
        name: String,
    },

    /// Two fields of one object share a caller-facing name.
    #[error("{path}: field `{name}` declared twice")]
    DuplicateField {
        /// Object declaring the fields.
        path: FieldPath,
        /// The repeated name.
        name: String,
    },

    /// Two fields of one object render under the same canonical key.
    #[error("{path}: canonical key `{key}` used by more than one field")]
    DuplicateKey {
        /// Object declaring the fields.
        path: FieldPath,
        /// The repeated key.
        key: String,
    },

    /// The root object declares a computed field.
    #[error("root field `{name}` is computed at render time and cannot be declared")]
    ReservedField {
        /// The reserved name or key.
        name: String,
    },

    /// A group names a field its object does not declare.
    #[error("{path}: group `{group}` names unknown field `{member}`")]
    UnknownGroupMember {
        /// Object declaring the group.
        path: FieldPath,
        /// Group name.
        group: String,
        /// The missing member.
        member: String,
    },

    /// A group member is required, so the group can never admit a sibling.
    #[error("{path}: group `{group}` member `{member}` is required; group members must be optional")]
    RequiredGroupMember {
        /// Object declaring the group.
        path: FieldPath,
        /// Group name.
        group: String,
        /// The required member.
        member: String,
    },

    /// A group with fewer than two members.
    #[error("{path}: group `{group}` has {size} member(s); at least two are needed")]
    GroupTooSmall {
        /// Object declaring the group.
        path: FieldPath,
        /// Group name.
        group: String,
        /// Number of distinct members.
        size: usize,
    },

    /// A group lists the same field more than once.
    #[error("{path}: group `{group}` lists `{member}` more than once")]
    DuplicateGroupMember {
        /// Object declaring the group.
        path: FieldPath,
        /// Group name.
        group: String,
        /// The repeated member.
        member: String,
    },

    /// Two groups of one object share a name.
    #[error("{path}: group `{group}` declared twice")]
    DuplicateGroup {
        /// Object declaring the groups.
        path: FieldPath,
        /// The repeated name.
        group: String,
    },

    /// One field belongs to two groups of the same object.
    #[error("{path}: field `{field}` belongs to both `{first}` and `{second}`")]
    OverlappingGroups {
        /// Object declaring the groups.
        path: FieldPath,
        /// The shared field.
        field: String,
        /// First group containing it.
        first: String,
        /// Second group containing it.
        second: String,
    },

    /// A validator attached to a node it cannot check.
    #[error("{path}: validator `{validator}` cannot check a {kind} field")]
    IncompatibleValidator {
        /// The field.
        path: FieldPath,
        /// Validator tag.
        validator: String,
        /// Field kind description.
        kind: String,
    },

    /// A required field also declares a default.
    #[error("{path}: a required field cannot declare a default")]
    RequiredWithDefault {
        /// The field.
        path: FieldPath,
    },

    /// A default whose type differs from the field's.
    #[error("{path}: default of type {found} does not match field type {expected}")]
    DefaultTypeMismatch {
        /// The field.
        path: FieldPath,
        /// Declared field kind.
        expected: String,
        /// Type of the default.
        found: String,
    },

    /// A default that the field's own validators reject.
    #[error("{path}: default rejected by `{validator}`: {reason}")]
    DefaultRejected {
        /// The field.
        path: FieldPath,
        /// Validator tag.
        validator: String,
        /// Rejection reason.
        reason: String,
    },

    /// A catalog already holds a schema for this type-name.
    #[error("document type `{kind}` registered twice")]
    DuplicateDocumentType {
        /// The repeated type-name.
        kind: String,
    },
}

/// Serializer invariant violation.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The document tree does not have the shape its schema declares.
    #[error("{path}: document node does not match schema (expected {expected})")]
    ShapeMismatch {
        /// Where the mismatch was found.
        path: FieldPath,
        /// What the schema declares there.
        expected: String,
    },

    /// The rendered body could not be canonicalized for digesting.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A text encoder failed.
    #[error("{format} encoding failed: {reason}")]
    Encode {
        /// Output format name.
        format: String,
        /// Encoder message.
        reason: String,
    },
}

/// Why `render` produced no document.
#[derive(Error, Debug)]
pub enum RenderFailure {
    /// The input has structural or constraint problems. User-facing.
    #[error("document is invalid ({count} problem(s)):\n{0}", count = .0.len())]
    Invalid(Diagnostics),

    /// The serializer hit an invariant violation. A defect, not user error.
    #[error("internal render error: {0}")]
    Internal(#[from] RenderError),
}

impl RenderFailure {
    /// The diagnostics, if this is a validation failure.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            Self::Invalid(d) => Some(d),
            Self::Internal(_) => None,
        }
    }
}
