//! # Validation Engine
//!
//! Walks a [`Document`] against its [`DocumentSchema`] depth-first, in
//! declared field order, and collects every constraint violation:
//!
//! - a required field that is absent yields one diagnostic and is not
//!   descended into;
//! - every validator on a present scalar runs, and each rejection is its
//!   own diagnostic;
//! - map validators check each entry (diagnostic at the entry's path) and
//!   then map-wide limits (diagnostic at the map's path);
//! - every mutual-exclusion group of a present object is counted once,
//!   after the object's fields, and reported at the object's path.
//!
//! The walk never stops early. The same (schema, document) pair always
//! yields the same diagnostics in the same order.

use mfst_core::{Diagnostic, Diagnostics, FieldPath, Scalar, Target};

use crate::field::{FieldKind, FieldSchema, ObjectSchema};
use crate::model::{Document, Node, ObjectNode};
use crate::schema::DocumentSchema;

/// Check a document against its schema's constraints.
pub fn validate_document(schema: &DocumentSchema, document: &Document) -> Diagnostics {
    let mut out = Diagnostics::new();
    walk_object(schema.root(), document.root(), &FieldPath::root(), &mut out);
    out
}

fn walk_object(schema: &ObjectSchema, node: &ObjectNode, path: &FieldPath, out: &mut Diagnostics) {
    for (index, field) in schema.fields().iter().enumerate() {
        let field_path = path.field(field.name());
        match node.get(index) {
            Some(child) => walk_node(field.schema(), child, &field_path, out),
            None if field.schema().is_required() => {
                out.push(Diagnostic::missing_required(field_path))
            }
            None => {}
        }
    }

    for group in schema.groups() {
        let present = group.present_members(|member| node.field(schema, member).is_some());
        if let Err(reason) = group.check(&present) {
            out.push(Diagnostic::mutual_exclusion(
                path.clone(),
                group.name(),
                present.len(),
                reason,
            ));
        }
    }
}

fn walk_node(schema: &FieldSchema, node: &Node, path: &FieldPath, out: &mut Diagnostics) {
    match (schema.kind(), node) {
        (FieldKind::Scalar(_), Node::Scalar(value)) => check_scalar(schema, value, path, out),
        (FieldKind::List(item), Node::List(items)) => {
            for (i, child) in items.iter().enumerate() {
                walk_node(item, child, &path.index(i), out);
            }
        }
        (FieldKind::Map(item), Node::Map(entries)) => {
            check_map(schema, node, path, out);
            for (key, child) in entries {
                walk_node(item, child, &path.key(key), out);
            }
        }
        (FieldKind::Object(object), Node::Object(child)) => walk_object(object, child, path, out),
        // Shape mismatches cannot come out of `Document::from_value`; the
        // serializer reports them for hand-built trees.
        _ => {}
    }
}

fn check_scalar(schema: &FieldSchema, value: &Scalar, path: &FieldPath, out: &mut Diagnostics) {
    for validator in schema.validators() {
        if let Err(reason) = validator.check(value) {
            out.push(Diagnostic::rejected(path.clone(), validator.tag(), reason));
        }
    }
}

fn check_map(schema: &FieldSchema, node: &Node, path: &FieldPath, out: &mut Diagnostics) {
    let Node::Map(entries) = node else {
        return;
    };
    let strings: Vec<(&str, &str)> = entries
        .iter()
        .filter_map(|(k, v)| Some((k.as_str(), v.as_scalar()?.as_str()?)))
        .collect();

    for validator in schema.validators() {
        if validator.target() != Target::StringMap {
            continue;
        }
        for (key, value) in &strings {
            let entry_path = path.key(key);
            if let Err(reason) = validator.check_key(key) {
                out.push(Diagnostic::rejected(entry_path.clone(), validator.tag(), reason));
            }
            if let Err(reason) = validator.check_entry_value(value) {
                out.push(Diagnostic::rejected(entry_path, validator.tag(), reason));
            }
        }
        if let Err(reason) = validator.check_map(strings.iter().copied()) {
            out.push(Diagnostic::rejected(path.clone(), validator.tag(), reason));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mfst_core::{DiagnosticKind, TypeMeta, Validator};
    use serde_json::{json, Value};

    fn schema() -> DocumentSchema {
        let metadata = ObjectSchema::new()
            .field("name", FieldSchema::string().required().validate(Validator::name()))
            .field("namespace", FieldSchema::string().validate(Validator::name()))
            .field(
                "labels",
                FieldSchema::map(FieldSchema::string()).validate(Validator::Labels),
            );
        let provider = ObjectSchema::new()
            .field("aws", FieldSchema::object(ObjectSchema::new().field("region", FieldSchema::string().required())))
            .field("vault", FieldSchema::object(ObjectSchema::new().field("server", FieldSchema::string().required())))
            .field("fake", FieldSchema::object(ObjectSchema::new()))
            .exactly_one_of("provider", &["aws", "vault", "fake"]);
        let spec = ObjectSchema::new()
            .field("provider", FieldSchema::object(provider).required())
            .field("tag", FieldSchema::string().validate(Validator::name()).validate(Validator::MaxLength(3)))
            .field("data", FieldSchema::map(FieldSchema::string().validate(Validator::Base64)))
            .field("keys", FieldSchema::list(FieldSchema::string().validate(Validator::name())));
        DocumentSchema::new(
            TypeMeta::new("example.io/v1", "Store"),
            ObjectSchema::new()
                .field("metadata", FieldSchema::object(metadata).required())
                .field("spec", FieldSchema::object(spec).required()),
        )
        .unwrap()
    }

    fn run(input: Value) -> Diagnostics {
        let schema = schema();
        let document = Document::from_value(&schema, &input).expect("structurally valid");
        validate_document(&schema, &document)
    }

    fn paths(diagnostics: &Diagnostics) -> Vec<String> {
        diagnostics.iter().map(|d| d.path.to_string()).collect()
    }

    #[test]
    fn valid_document_has_no_diagnostics() {
        let d = run(json!({
            "metadata": {"name": "store", "labels": {"app.kubernetes.io/name": "store"}},
            "spec": {"provider": {"vault": {"server": "https://vault:8200"}}}
        }));
        assert!(d.is_empty(), "{d}");
    }

    #[test]
    fn missing_required_does_not_descend() {
        let d = run(json!({"metadata": {"name": "a"}}));
        assert_eq!(paths(&d), ["spec"]);
        assert_eq!(d.as_slice()[0].kind, DiagnosticKind::MissingRequired);
    }

    #[test]
    fn two_missing_and_one_group_yield_three() {
        let d = run(json!({
            "metadata": {},
            "spec": {"provider": {"aws": {}, "vault": {"server": "s"}}}
        }));
        assert_eq!(d.len(), 3, "{d}");
        assert_eq!(paths(&d), ["metadata.name", "spec.provider.aws.region", "spec.provider"]);
    }

    #[test]
    fn every_rejection_is_kept() {
        let d = run(json!({
            "metadata": {"name": "a"},
            "spec": {"provider": {"fake": {}}, "tag": "Bad_Tag"}
        }));
        let tags: Vec<_> = d
            .iter()
            .map(|x| match &x.kind {
                DiagnosticKind::Rejected { validator } => validator.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(tags, ["name", "max_length"]);
        assert_eq!(paths(&d), ["spec.tag", "spec.tag"]);
    }

    #[test]
    fn group_with_no_members_present() {
        let d = run(json!({"metadata": {"name": "a"}, "spec": {"provider": {}}}));
        assert_eq!(d.len(), 1);
        assert_eq!(
            d.as_slice()[0].kind,
            DiagnosticKind::MutualExclusion {
                group: "provider".into(),
                present: 0
            }
        );
        assert_eq!(d.as_slice()[0].path.to_string(), "spec.provider");
    }

    #[test]
    fn group_with_all_members_present() {
        let d = run(json!({
            "metadata": {"name": "a"},
            "spec": {"provider": {"aws": {"region": "r"}, "vault": {"server": "s"}, "fake": {}}}
        }));
        assert_eq!(d.len(), 1);
        assert!(d.as_slice()[0].message.contains("found 3"));
    }

    #[test]
    fn map_entries_checked_at_entry_paths() {
        let d = run(json!({
            "metadata": {"name": "a", "labels": {"ok": "fine", "bad key": "fine", "app": "bad value!"}},
            "spec": {"provider": {"fake": {}}, "data": {"good": "aGk=", "broken": "***"}}
        }));
        assert_eq!(
            paths(&d),
            [
                "metadata.labels[\"app\"]",
                "metadata.labels[\"bad key\"]",
                "spec.data[\"broken\"]",
            ]
        );
    }

    #[test]
    fn list_items_checked_at_indices() {
        let d = run(json!({
            "metadata": {"name": "a"},
            "spec": {"provider": {"fake": {}}, "keys": ["ok", "NOT-OK", "fine"]}
        }));
        assert_eq!(paths(&d), ["spec.keys[1]"]);
    }

    #[test]
    fn engine_is_deterministic() {
        let input = json!({
            "metadata": {"name": "Invalid_Name!", "namespace": "-x"},
            "spec": {"provider": {"aws": {}, "vault": {}}}
        });
        let first = run(input.clone());
        let second = run(input);
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use mfst_core::{TypeMeta, Validator};
    use proptest::prelude::*;
    use serde_json::{json, Map, Value};

    fn schema() -> DocumentSchema {
        let members = ["alpha", "beta", "gamma"];
        let mut options = ObjectSchema::new();
        for m in members {
            options = options.field(m, FieldSchema::string());
        }
        let options = options.exactly_one_of("choice", &members);
        DocumentSchema::new(
            TypeMeta::new("example.io/v1", "Choice"),
            ObjectSchema::new()
                .field("name", FieldSchema::string().required().validate(Validator::name()))
                .field("options", FieldSchema::object(options).required()),
        )
        .unwrap()
    }

    proptest! {
        #[test]
        fn group_passes_only_with_exactly_one(mask in 0u8..8) {
            let mut options = Map::new();
            for (bit, name) in ["alpha", "beta", "gamma"].iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    options.insert(name.to_string(), json!("x"));
                }
            }
            let input = json!({"name": "ok", "options": Value::Object(options)});
            let schema = schema();
            let document = Document::from_value(&schema, &input).unwrap();
            let diagnostics = validate_document(&schema, &document);
            prop_assert_eq!(diagnostics.is_empty(), mask.count_ones() == 1);
        }

        #[test]
        fn independent_violations_are_all_reported(bad_name in any::<bool>(), missing in any::<bool>(), many in any::<bool>()) {
            let mut input = Map::new();
            input.insert("name".into(), json!(if bad_name { "Not Valid" } else { "valid" }));
            if !missing {
                let options = if many {
                    json!({"alpha": "a", "beta": "b"})
                } else {
                    json!({"alpha": "a"})
                };
                input.insert("options".into(), options);
            }
            let expected = usize::from(bad_name) + usize::from(missing) + usize::from(many && !missing);
            let schema = schema();
            let document = Document::from_value(&schema, &Value::Object(input)).unwrap();
            prop_assert_eq!(validate_document(&schema, &document).len(), expected);
        }
    }
}
