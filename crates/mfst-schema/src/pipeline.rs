//! # Validate / Render Pipeline
//!
//! The two operations a host calls. Both take caller input as a
//! `serde_json::Value` tree; converting from a transport format is the
//! host's job.
//!
//! - [`validate`] builds the document model and runs the engine. It returns
//!   every structural diagnostic, or else every constraint diagnostic.
//! - [`render`] does the same and, only when there are no diagnostics at
//!   all, serializes. It never returns a document alongside diagnostics.

use mfst_core::{Diagnostics, IdSource};
use serde_json::Value;

use crate::engine::validate_document;
use crate::error::RenderFailure;
use crate::model::Document;
use crate::render::{RenderedDocument, Renderer};
use crate::schema::DocumentSchema;

/// Collect all diagnostics for `input` under `schema`.
pub fn validate(input: &Value, schema: &DocumentSchema) -> Diagnostics {
    let diagnostics = match Document::from_value(schema, input) {
        Ok(document) => validate_document(schema, &document),
        Err(structural) => structural,
    };
    tracing::debug!(
        kind = %schema.kind(),
        diagnostics = diagnostics.len(),
        "validated document"
    );
    diagnostics
}

/// Validate `input` and render it if valid.
///
/// # Errors
///
/// [`RenderFailure::Invalid`] with the complete diagnostic set when the
/// input is invalid; [`RenderFailure::Internal`] if the serializer hits an
/// invariant violation.
pub fn render<S: IdSource>(
    input: &Value,
    schema: &DocumentSchema,
    renderer: &Renderer<S>,
) -> Result<RenderedDocument, RenderFailure> {
    let document = Document::from_value(schema, input).map_err(|d| reject(schema, d))?;
    let diagnostics = validate_document(schema, &document);
    if !diagnostics.is_empty() {
        return Err(reject(schema, diagnostics));
    }

    let rendered = renderer.render(schema, &document).map_err(|e| {
        tracing::error!(kind = %schema.kind(), error = %e, "render invariant violated");
        RenderFailure::Internal(e)
    })?;
    tracing::debug!(
        kind = %schema.kind(),
        id = %rendered.id(),
        digest = %rendered.digest(),
        "rendered document"
    );
    Ok(rendered)
}

fn reject(schema: &DocumentSchema, diagnostics: Diagnostics) -> RenderFailure {
    tracing::info!(
        kind = %schema.kind(),
        diagnostics = diagnostics.len(),
        structural = diagnostics.has_structural(),
        "document rejected"
    );
    RenderFailure::Invalid(diagnostics)
}
