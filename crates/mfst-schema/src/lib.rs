//! # mfst-schema: Schema-Driven Validation & Rendering
//!
//! One engine, parameterized by schema data, validates and renders every
//! document type. A type is declared once as a [`DocumentSchema`]; the
//! [`Catalog`] holds the built-in types.
//!
//! ## Flow
//!
//! ```text
//! caller input (serde_json::Value)
//!   └─ Document::from_value ── structural diagnostics ─┐
//!        └─ validate_document ── constraint diagnostics ┤
//!             └─ Renderer::render ── RenderedDocument   └─ RenderFailure::Invalid
//! ```
//!
//! [`validate`] and [`render`] wrap this flow for hosts.
//!
//! ## Crate Policy
//!
//! - Depends only on `mfst-core` internally.
//! - No I/O. Input arrives as a value tree; output leaves as text.
//! - Per-request problems are data ([`mfst_core::Diagnostics`]); only
//!   schema construction and serializer invariants use error types.

pub mod catalog;
pub mod engine;
pub mod error;
pub mod field;
pub mod group;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod schema;

pub use catalog::Catalog;
pub use engine::validate_document;
pub use error::{RenderError, RenderFailure, SchemaError};
pub use field::{Field, FieldKind, FieldSchema, ObjectSchema};
pub use group::MutualExclusionGroup;
pub use model::{Document, Node, ObjectNode, PriorState};
pub use pipeline::{render, validate};
pub use render::{DocumentState, OutputFormat, RenderedDocument, Renderer};
pub use schema::{DocumentSchema, COMPUTED_FIELDS};
