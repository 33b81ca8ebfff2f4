//! # Serializer
//!
//! Renders a validated [`Document`] into canonical text.
//!
//! ## Rendering Rules
//!
//! 1. The body starts with the two discriminators, `apiVersion` and `kind`,
//!    taken from the schema. Caller-supplied values never reach the body.
//! 2. Present fields follow under their canonical keys, in declared order.
//!    Absent optional fields leave no trace.
//! 3. Map entries are emitted in sorted key order; list items in input
//!    order.
//! 4. Text is YAML or pretty JSON, always newline-terminated.
//!
//! ## Identity
//!
//! Every render draws a fresh [`DocumentId`] from the injected
//! [`IdSource`]. The identifier travels beside the text (on
//! [`RenderedDocument`] and in [`DocumentState`]) instead of inside it, so
//! two renders of an unchanged tree produce byte-identical text and the
//! same [`ShapeDigest`], and differ only in their identifiers.
//!
//! The serializer does not re-validate. A tree whose shape disagrees with
//! the schema is an invariant violation and yields [`RenderError`].

use mfst_core::{
    shape_digest, CanonicalBytes, DocumentId, FieldPath, IdSource, MonotonicIdSource,
    ShapeDigest, TypeMeta,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RenderError;
use crate::field::{FieldKind, FieldSchema, ObjectSchema};
use crate::model::{Document, Node, ObjectNode};
use crate::schema::DocumentSchema;

/// Text encoding of a rendered document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format {other:?} (expected yaml or json)")),
        }
    }
}

/// Persisted-state record for a rendered document.
///
/// A host stores this next to the manifest and re-supplies its fields as
/// root keys of the next input; they are read into
/// [`PriorState`](crate::PriorState) and compared against the new render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentState {
    pub id: DocumentId,
    pub api_version: String,
    pub kind: String,
    pub digest: ShapeDigest,
}

/// Output of a successful render.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    text: String,
    format: OutputFormat,
    body: Value,
    id: DocumentId,
    type_meta: TypeMeta,
    digest: ShapeDigest,
    previous_id: Option<DocumentId>,
    previous_digest: Option<ShapeDigest>,
}

impl RenderedDocument {
    /// Canonical text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// The ordered body the text was encoded from.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Freshly generated identifier.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn type_meta(&self) -> &TypeMeta {
        &self.type_meta
    }

    pub fn digest(&self) -> ShapeDigest {
        self.digest
    }

    /// Identifier from the re-supplied prior state, if any.
    pub fn previous_id(&self) -> Option<DocumentId> {
        self.previous_id
    }

    /// Whether the shape changed since the prior render, when its digest
    /// was re-supplied.
    pub fn changed(&self) -> Option<bool> {
        self.previous_digest.map(|prev| prev != self.digest)
    }

    /// Record to persist for the next update.
    pub fn state(&self) -> DocumentState {
        DocumentState {
            id: self.id,
            api_version: self.type_meta.api_version.clone(),
            kind: self.type_meta.kind.clone(),
            digest: self.digest,
        }
    }
}

/// Serializer bound to an identifier source.
#[derive(Debug)]
pub struct Renderer<S = MonotonicIdSource> {
    ids: S,
    format: OutputFormat,
}

impl Default for Renderer<MonotonicIdSource> {
    fn default() -> Self {
        Self::new(MonotonicIdSource::new())
    }
}

impl<S: IdSource> Renderer<S> {
    pub fn new(ids: S) -> Self {
        Self {
            ids,
            format: OutputFormat::default(),
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render `document` under `schema`.
    ///
    /// # Errors
    ///
    /// [`RenderError::ShapeMismatch`] if the tree was not built from this
    /// schema; canonicalization or encoder failures otherwise.
    pub fn render(
        &self,
        schema: &DocumentSchema,
        document: &Document,
    ) -> Result<RenderedDocument, RenderError> {
        let type_meta = schema.type_meta().clone();
        let mut body = Map::new();
        body.insert(
            TypeMeta::GROUP_KEY.to_string(),
            Value::String(type_meta.api_version.clone()),
        );
        body.insert(
            TypeMeta::NAME_KEY.to_string(),
            Value::String(type_meta.kind.clone()),
        );
        render_object(schema.root(), document.root(), &FieldPath::root(), &mut body)?;
        let body = Value::Object(body);

        let digest = shape_digest(&CanonicalBytes::new(&body)?);
        let text = encode(&body, self.format)?;
        let id = self.ids.next_id();

        Ok(RenderedDocument {
            text,
            format: self.format,
            body,
            id,
            type_meta,
            digest,
            previous_id: document.prior().id,
            previous_digest: document.prior().digest,
        })
    }
}

fn render_object(
    schema: &ObjectSchema,
    node: &ObjectNode,
    path: &FieldPath,
    out: &mut Map<String, Value>,
) -> Result<(), RenderError> {
    if node.slots().len() != schema.fields().len() {
        return Err(RenderError::ShapeMismatch {
            path: path.clone(),
            expected: format!("object with {} fields", schema.fields().len()),
        });
    }
    for (field, slot) in schema.fields().iter().zip(node.slots()) {
        if let Some(child) = slot {
            let value = render_node(field.schema(), child, &path.field(field.name()))?;
            out.insert(field.key().to_string(), value);
        }
    }
    Ok(())
}

fn render_node(schema: &FieldSchema, node: &Node, path: &FieldPath) -> Result<Value, RenderError> {
    match (schema.kind(), node) {
        (FieldKind::Scalar(t), Node::Scalar(value)) if value.scalar_type() == *t => {
            Ok(value.to_json())
        }
        (FieldKind::List(item), Node::List(items)) => items
            .iter()
            .enumerate()
            .map(|(i, child)| render_node(item, child, &path.index(i)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        (FieldKind::Map(item), Node::Map(entries)) => {
            let mut map = Map::new();
            for (key, child) in entries {
                map.insert(key.clone(), render_node(item, child, &path.key(key))?);
            }
            Ok(Value::Object(map))
        }
        (FieldKind::Object(object), Node::Object(child)) => {
            let mut map = Map::new();
            render_object(object, child, path, &mut map)?;
            Ok(Value::Object(map))
        }
        (kind, _) => Err(RenderError::ShapeMismatch {
            path: path.clone(),
            expected: kind.describe(),
        }),
    }
}

fn encode(body: &Value, format: OutputFormat) -> Result<String, RenderError> {
    let mut text = match format {
        OutputFormat::Yaml => serde_yaml::to_string(body).map_err(|e| RenderError::Encode {
            format: format.to_string(),
            reason: e.to_string(),
        })?,
        OutputFormat::Json => serde_json::to_string_pretty(body).map_err(|e| RenderError::Encode {
            format: format.to_string(),
            reason: e.to_string(),
        })?,
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}
