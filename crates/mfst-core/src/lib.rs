//! # mfst-core: Foundational Types for the Manifest Engine
//!
//! Leaf crate of the `mfst` workspace. It defines the primitives that the
//! schema engine and the CLI build on; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Errors are data on the request path.** Structural and constraint
//!    problems are [`Diagnostic`]s collected into [`Diagnostics`], never
//!    early returns. A single request reports every problem at once.
//!
//! 2. **Validators are pure descriptors.** [`Validator`] values describe a
//!    check; applying one is a total function returning an [`Outcome`].
//!    No validator panics, allocates global state, or performs I/O.
//!
//! 3. **Identifiers come from an injected source.** The only process-wide
//!    mutable state is the [`IdSource`] clock. Production uses
//!    [`MonotonicIdSource`]; tests use [`SequenceIdSource`].
//!
//! 4. **Shape digests flow through `CanonicalBytes`.** Rendered bodies are
//!    hashed only after JCS canonicalization, so two renders of the same
//!    tree always produce the same [`ShapeDigest`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mfst-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod diagnostic;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;
pub mod validators;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use diagnostic::{Category, Diagnostic, DiagnosticKind, Diagnostics, FieldPath, PathSegment};
pub use digest::{shape_digest, ShapeDigest};
pub use error::{CanonicalizationError, MfstError};
pub use identity::{DocumentId, TypeMeta};
pub use temporal::{IdSource, MonotonicIdSource, SequenceIdSource};
pub use validators::{Outcome, Target, Validator};
pub use value::{Scalar, ScalarType};
