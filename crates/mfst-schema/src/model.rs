//! # Document Model
//!
//! The per-request tree of caller-supplied values, shaped by a
//! [`DocumentSchema`]. Built from a `serde_json::Value` by
//! [`Document::from_value`], validated by the engine, rendered by the
//! serializer, then dropped.
//!
//! ## Construction Rules
//!
//! - Every input key must name a declared field. Unknown keys are
//!   structural diagnostics at every depth, never silently dropped.
//! - `null` means absent. Fields marked `omit_empty` also treat `""`,
//!   `[]` and `{}` as absent.
//! - Absent fields with a default take the default.
//! - A value of the wrong kind is a structural diagnostic at its path.
//! - At the root, the computed fields listed in
//!   [`COMPUTED_FIELDS`](crate::schema::COMPUTED_FIELDS) are accepted as
//!   persisted state re-supplied by the host. They land in [`PriorState`]
//!   and never reach the rendered body. The rendered discriminator key
//!   `apiVersion` is accepted as a spelling of `api_version`.
//!
//! Construction always runs to completion: every structural problem in
//! the input is reported at once.

use std::collections::BTreeMap;

use mfst_core::value::json_type_name;
use mfst_core::{Diagnostic, Diagnostics, DocumentId, FieldPath, Scalar, ShapeDigest, TypeMeta};
use serde_json::{Map, Value};

use crate::field::{FieldKind, FieldSchema, ObjectSchema};
use crate::schema::DocumentSchema;

/// A present value in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    List(Vec<Node>),
    /// Map entries, kept sorted by key.
    Map(BTreeMap<String, Node>),
    Object(ObjectNode),
}

impl Node {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }
}

/// An object's field values, one slot per declared field in schema order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectNode {
    slots: Vec<Option<Node>>,
}

impl ObjectNode {
    /// Build from explicit slots. The caller is responsible for matching
    /// the slot count to the schema; the serializer reports a mismatch.
    pub fn from_slots(slots: Vec<Option<Node>>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[Option<Node>] {
        &self.slots
    }

    /// The value in slot `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Node> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// The value of the field named `name` under `schema`, if present.
    pub fn field(&self, schema: &ObjectSchema, name: &str) -> Option<&Node> {
        schema.index_of(name).and_then(|i| self.get(i))
    }
}

/// Computed fields re-supplied from a previously persisted state record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorState {
    pub id: Option<DocumentId>,
    pub api_version: Option<String>,
    pub kind: Option<String>,
    pub digest: Option<ShapeDigest>,
}

impl PriorState {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One document instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: ObjectNode,
    prior: PriorState,
}

impl Document {
    /// Build a document from caller input.
    ///
    /// # Errors
    ///
    /// Returns every structural diagnostic found (unknown keys, wrong
    /// kinds). A document is only returned when there are none.
    pub fn from_value(schema: &DocumentSchema, input: &Value) -> Result<Self, Diagnostics> {
        let mut builder = Builder::default();
        let root = FieldPath::root();
        let Value::Object(map) = input else {
            builder.mismatch(&root, "object", input);
            return Err(builder.diagnostics);
        };

        let mut fields = Map::new();
        let mut prior = PriorState::default();
        for (key, value) in map {
            if schema.root().get(key).is_none() && builder.computed(key, value, &mut prior) {
                continue;
            }
            fields.insert(key.clone(), value.clone());
        }

        let root_node = builder.object(schema.root(), &fields, &root);
        if builder.diagnostics.is_empty() {
            Ok(Self {
                root: root_node,
                prior,
            })
        } else {
            Err(builder.diagnostics)
        }
    }

    /// Assemble a document from an already-built tree.
    pub fn from_parts(root: ObjectNode, prior: PriorState) -> Self {
        Self { root, prior }
    }

    pub fn root(&self) -> &ObjectNode {
        &self.root
    }

    pub fn prior(&self) -> &PriorState {
        &self.prior
    }

    /// Look up a node by a dotted path of field names, e.g.
    /// `spec.provider.vault`. Lists and maps are not traversed.
    pub fn lookup(&self, schema: &DocumentSchema, dotted: &str) -> Option<&Node> {
        let mut object_schema = schema.root();
        let mut object = &self.root;
        let mut parts = dotted.split('.').peekable();
        while let Some(name) = parts.next() {
            let node = object.field(object_schema, name)?;
            if parts.peek().is_none() {
                return Some(node);
            }
            let FieldKind::Object(next_schema) = object_schema.get(name)?.schema().kind() else {
                return None;
            };
            object_schema = next_schema;
            object = node.as_object()?;
        }
        None
    }
}

#[derive(Default)]
struct Builder {
    diagnostics: Diagnostics,
}

impl Builder {
    fn mismatch(&mut self, path: &FieldPath, expected: &str, found: &Value) {
        self.diagnostics
            .push(Diagnostic::type_mismatch(path.clone(), expected, json_type_name(found)));
    }

    /// Absorb a root-level computed field. Returns false if `key` is not one.
    fn computed(&mut self, key: &str, value: &Value, prior: &mut PriorState) -> bool {
        let path = FieldPath::root().field(key);
        match key {
            "id" => {
                prior.id = match value {
                    Value::Null => None,
                    Value::String(s) => s.parse().ok().or_else(|| {
                        self.mismatch(&path, "document id", value);
                        None
                    }),
                    Value::Number(n) => n.as_u64().map(DocumentId::from_raw).or_else(|| {
                        self.mismatch(&path, "document id", value);
                        None
                    }),
                    other => {
                        self.mismatch(&path, "document id", other);
                        None
                    }
                };
            }
            "api_version" | TypeMeta::GROUP_KEY => {
                prior.api_version = self.computed_string(&path, value);
            }
            "kind" => prior.kind = self.computed_string(&path, value),
            "digest" => {
                prior.digest = match value {
                    Value::Null => None,
                    Value::String(s) => ShapeDigest::try_from(s.clone()).ok().or_else(|| {
                        self.mismatch(&path, "shape digest", value);
                        None
                    }),
                    other => {
                        self.mismatch(&path, "shape digest", other);
                        None
                    }
                };
            }
            _ => return false,
        }
        true
    }

    fn computed_string(&mut self, path: &FieldPath, value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => {
                self.mismatch(path, "string", other);
                None
            }
        }
    }

    fn object(&mut self, schema: &ObjectSchema, input: &Map<String, Value>, path: &FieldPath) -> ObjectNode {
        let mut slots: Vec<Option<Node>> = vec![None; schema.fields().len()];
        for (key, value) in input {
            match schema.index_of(key) {
                Some(index) => {
                    let field = &schema.fields()[index];
                    slots[index] = self.field(field.schema(), value, &path.field(field.name()));
                }
                None => self.unknown(schema, key, path),
            }
        }
        for (slot, field) in slots.iter_mut().zip(schema.fields()) {
            if slot.is_none() {
                *slot = field.schema().default_scalar().cloned().map(Node::Scalar);
            }
        }
        ObjectNode { slots }
    }

    fn unknown(&mut self, schema: &ObjectSchema, key: &str, path: &FieldPath) {
        let message = match schema.get_by_key(key) {
            Some(field) => format!("unknown field `{key}`; did you mean `{}`?", field.name()),
            None => format!("unknown field `{key}`"),
        };
        self.diagnostics
            .push(Diagnostic::unknown_field(path.field(key), message));
    }

    /// A named field's value: absent for null or, under `omit_empty`, empty.
    fn field(&mut self, schema: &FieldSchema, value: &Value, path: &FieldPath) -> Option<Node> {
        if value.is_null() || (schema.omits_empty() && is_empty(value)) {
            return None;
        }
        self.node(schema, value, path)
    }

    /// A list item or map value: never absent, so null is a mismatch.
    fn node(&mut self, schema: &FieldSchema, value: &Value, path: &FieldPath) -> Option<Node> {
        match (schema.kind(), value) {
            (FieldKind::Scalar(t), _) => match Scalar::from_json(value, *t) {
                Some(scalar) => Some(Node::Scalar(scalar)),
                None => {
                    self.mismatch(path, t.as_str(), value);
                    None
                }
            },
            (FieldKind::List(item), Value::Array(items)) => {
                let nodes = items
                    .iter()
                    .enumerate()
                    .filter_map(|(i, v)| self.node(item, v, &path.index(i)))
                    .collect();
                Some(Node::List(nodes))
            }
            (FieldKind::Map(item), Value::Object(entries)) => {
                let nodes = entries
                    .iter()
                    .filter_map(|(k, v)| Some((k.clone(), self.node(item, v, &path.key(k))?)))
                    .collect();
                Some(Node::Map(nodes))
            }
            (FieldKind::Object(object), Value::Object(entries)) => {
                Some(Node::Object(self.object(object, entries, path)))
            }
            (kind, _) => {
                self.mismatch(path, kind.expected_input(), value);
                None
            }
        }
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfst_core::{DiagnosticKind, Validator};
    use serde_json::json;

    fn schema() -> DocumentSchema {
        let metadata = ObjectSchema::new()
            .field("name", FieldSchema::string().required().validate(Validator::name()))
            .field("labels", FieldSchema::map(FieldSchema::string()).omit_empty());
        let spec = ObjectSchema::new()
            .field("replicas", FieldSchema::integer().default_value(1))
            .field("ca_bundle", FieldSchema::string())
            .field("ports", FieldSchema::list(FieldSchema::integer()))
            .field("note", FieldSchema::string().omit_empty());
        DocumentSchema::new(
            TypeMeta::new("example.io/v1", "Widget"),
            ObjectSchema::new()
                .field("metadata", FieldSchema::object(metadata).required())
                .field("spec", FieldSchema::object(spec)),
        )
        .unwrap()
    }

    fn build(input: Value) -> Result<Document, Diagnostics> {
        Document::from_value(&schema(), &input)
    }

    #[test]
    fn builds_tree_in_schema_order() {
        let schema = schema();
        let doc = Document::from_value(
            &schema,
            &json!({"spec": {"ports": [80, 443]}, "metadata": {"name": "web"}}),
        )
        .unwrap();
        assert_eq!(
            doc.lookup(&schema, "metadata.name"),
            Some(&Node::Scalar(Scalar::from("web")))
        );
        assert_eq!(
            doc.lookup(&schema, "spec.ports"),
            Some(&Node::List(vec![
                Node::Scalar(Scalar::Int(80)),
                Node::Scalar(Scalar::Int(443))
            ]))
        );
        assert_eq!(doc.root().slots().len(), 2);
        assert!(doc.prior().is_empty());
    }

    #[test]
    fn defaults_fill_absent_fields() {
        let schema = schema();
        let doc = Document::from_value(&schema, &json!({"metadata": {"name": "a"}, "spec": {}})).unwrap();
        assert_eq!(
            doc.lookup(&schema, "spec.replicas"),
            Some(&Node::Scalar(Scalar::Int(1)))
        );
        assert!(doc.lookup(&schema, "spec.ca_bundle").is_none());
    }

    #[test]
    fn null_and_empty_mean_absent() {
        let schema = schema();
        let doc = Document::from_value(
            &schema,
            &json!({"metadata": {"name": "a", "labels": {}}, "spec": {"note": "", "ca_bundle": null}}),
        )
        .unwrap();
        assert!(doc.lookup(&schema, "metadata.labels").is_none());
        assert!(doc.lookup(&schema, "spec.note").is_none());
        assert!(doc.lookup(&schema, "spec.ca_bundle").is_none());
    }

    #[test]
    fn unknown_keys_reported_at_every_depth() {
        let diagnostics = build(json!({
            "metadata": {"name": "a", "nmae": "typo"},
            "spec": {"caBundle": "x"},
            "status": {}
        }))
        .unwrap_err();
        assert_eq!(diagnostics.len(), 3);
        assert!(diagnostics.iter().all(|d| d.kind == DiagnosticKind::UnknownField));
        let paths: Vec<String> = diagnostics.iter().map(|d| d.path.to_string()).collect();
        assert_eq!(paths, ["metadata.nmae", "spec.caBundle", "status"]);
        let hint = &diagnostics.as_slice()[1].message;
        assert_eq!(hint, "unknown field `caBundle`; did you mean `ca_bundle`?");
    }

    #[test]
    fn type_mismatches_collected_not_fatal() {
        let diagnostics = build(json!({
            "metadata": "web",
            "spec": {"replicas": "three", "ports": [80, "http", null]}
        }))
        .unwrap_err();
        let rendered: Vec<String> = diagnostics.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            [
                "  metadata: expected object, found string",
                "  spec.replicas: expected integer, found string",
                "  spec.ports[1]: expected integer, found string",
                "  spec.ports[2]: expected integer, found null",
            ]
        );
    }

    #[test]
    fn floats_are_not_integers() {
        let diagnostics = build(json!({"metadata": {"name": "a"}, "spec": {"replicas": 1.5}})).unwrap_err();
        assert_eq!(diagnostics.as_slice()[0].message, "expected integer, found float");
    }

    #[test]
    fn oversized_integers_are_named_as_such() {
        let diagnostics =
            build(json!({"metadata": {"name": "a"}, "spec": {"replicas": u64::MAX}})).unwrap_err();
        assert_eq!(diagnostics.as_slice()[0].path.to_string(), "spec.replicas");
        assert_eq!(
            diagnostics.as_slice()[0].message,
            "expected integer, found integer out of range"
        );
    }

    #[test]
    fn root_must_be_object() {
        let diagnostics = build(json!(["not", "a", "document"])).unwrap_err();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.to_string(), "  (root): expected object, found list");
    }

    #[test]
    fn computed_fields_become_prior_state() {
        let doc = build(json!({
            "id": "1760601600000000000",
            "api_version": "wrong/v9",
            "kind": "Gadget",
            "metadata": {"name": "a"}
        }))
        .unwrap();
        let prior = doc.prior();
        assert_eq!(prior.id, Some(DocumentId::from_raw(1_760_601_600_000_000_000)));
        assert_eq!(prior.api_version.as_deref(), Some("wrong/v9"));
        assert_eq!(prior.kind.as_deref(), Some("Gadget"));
        assert!(prior.digest.is_none());
    }

    #[test]
    fn rendered_group_key_is_prior_state() {
        let doc = build(json!({"apiVersion": "wrong/v9", "metadata": {"name": "a"}})).unwrap();
        assert_eq!(doc.prior().api_version.as_deref(), Some("wrong/v9"));
        let diagnostics = build(json!({"apiVersion": 3, "metadata": {"name": "a"}})).unwrap_err();
        assert_eq!(diagnostics.as_slice()[0].path.to_string(), "apiVersion");
    }

    #[test]
    fn numeric_id_accepted() {
        let doc = build(json!({"id": 42, "metadata": {"name": "a"}})).unwrap();
        assert_eq!(doc.prior().id, Some(DocumentId::from_raw(42)));
    }

    #[test]
    fn malformed_computed_fields_are_mismatches() {
        let diagnostics = build(json!({
            "id": "soon",
            "kind": 7,
            "digest": "md5:abc",
            "metadata": {"name": "a"}
        }))
        .unwrap_err();
        let paths: Vec<String> = diagnostics.iter().map(|d| d.path.to_string()).collect();
        assert_eq!(paths, ["id", "kind", "digest"]);
    }

    #[test]
    fn computed_names_are_unknown_below_root() {
        let diagnostics = build(json!({"metadata": {"name": "a", "kind": "x"}})).unwrap_err();
        assert_eq!(diagnostics.as_slice()[0].path.to_string(), "metadata.kind");
        assert_eq!(diagnostics.as_slice()[0].kind, DiagnosticKind::UnknownField);
    }
}
