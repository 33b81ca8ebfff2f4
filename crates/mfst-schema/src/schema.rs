//! # Document Schema
//!
//! A [`DocumentSchema`] pairs a document type's fixed discriminators
//! ([`TypeMeta`]) with the root [`ObjectSchema`] describing its fields.
//!
//! ## Construction Checks
//!
//! [`DocumentSchema::new`] walks the whole declaration once and rejects
//! inconsistencies that would otherwise surface as confusing per-request
//! behavior: groups naming missing or required fields, overlapping groups,
//! duplicate names or canonical keys, validators attached to nodes they
//! cannot check, and defaults that are mistyped or rejected. A schema that
//! constructs successfully is immutable and `Send + Sync`; the engine and
//! serializer trust its shape.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use mfst_core::{FieldPath, ScalarType, Target, TypeMeta, Validator};

use crate::error::SchemaError;
use crate::field::{FieldKind, FieldSchema, ObjectSchema};

/// Root field names that carry computed values and may never be declared.
///
/// These are also the root keys under which a host re-supplies persisted
/// state; see [`PriorState`](crate::PriorState).
pub const COMPUTED_FIELDS: &[&str] = &["id", "api_version", "kind", "digest"];

/// Immutable, validated description of one document type.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSchema {
    type_meta: TypeMeta,
    root: ObjectSchema,
}

impl DocumentSchema {
    /// Build a schema, checking the declaration for consistency.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found, in declaration order.
    pub fn new(type_meta: TypeMeta, root: ObjectSchema) -> Result<Self, SchemaError> {
        if type_meta.api_version.trim().is_empty() || type_meta.kind.trim().is_empty() {
            return Err(SchemaError::EmptyTypeMeta);
        }
        for field in root.fields() {
            let reserved_name = COMPUTED_FIELDS.contains(&field.name());
            let reserved_key = [TypeMeta::GROUP_KEY, TypeMeta::NAME_KEY].contains(&field.key());
            if reserved_name || reserved_key {
                return Err(SchemaError::ReservedField {
                    name: field.name().to_string(),
                });
            }
        }
        check_object(&root, &FieldPath::root())?;
        Ok(Self { type_meta, root })
    }

    pub fn type_meta(&self) -> &TypeMeta {
        &self.type_meta
    }

    /// Type-name shortcut, e.g. `SecretStore`.
    pub fn kind(&self) -> &str {
        &self.type_meta.kind
    }

    pub fn root(&self) -> &ObjectSchema {
        &self.root
    }

    /// Human-readable outline of the schema.
    ///
    /// One line per field, indented by depth, with the field's type,
    /// requiredness, default, validators and canonical key where it
    /// differs from the lowerCamelCase default. Groups follow the fields
    /// of their object.
    pub fn describe(&self) -> String {
        let mut out = format!("{} ({})\n", self.type_meta.kind, self.type_meta.api_version);
        describe_object(&self.root, 1, &mut out);
        out
    }
}

fn is_valid_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn check_object(object: &ObjectSchema, path: &FieldPath) -> Result<(), SchemaError> {
    let mut names = HashSet::new();
    let mut keys = HashSet::new();
    for field in object.fields() {
        if !is_valid_field_name(field.name()) {
            return Err(SchemaError::InvalidFieldName {
                path: path.clone(),
                name: field.name().to_string(),
            });
        }
        if !names.insert(field.name()) {
            return Err(SchemaError::DuplicateField {
                path: path.clone(),
                name: field.name().to_string(),
            });
        }
        if !keys.insert(field.key()) {
            return Err(SchemaError::DuplicateKey {
                path: path.clone(),
                key: field.key().to_string(),
            });
        }
        check_field(field.schema(), &path.field(field.name()))?;
    }
    check_groups(object, path)
}

fn check_groups(object: &ObjectSchema, path: &FieldPath) -> Result<(), SchemaError> {
    let mut group_names = HashSet::new();
    let mut owner: HashMap<&str, &str> = HashMap::new();
    for group in object.groups() {
        if !group_names.insert(group.name()) {
            return Err(SchemaError::DuplicateGroup {
                path: path.clone(),
                group: group.name().to_string(),
            });
        }
        let distinct: HashSet<&str> = group.members().iter().map(String::as_str).collect();
        if distinct.len() < 2 {
            return Err(SchemaError::GroupTooSmall {
                path: path.clone(),
                group: group.name().to_string(),
                size: distinct.len(),
            });
        }
        let mut seen = HashSet::new();
        for member in group.members() {
            if !seen.insert(member.as_str()) {
                return Err(SchemaError::DuplicateGroupMember {
                    path: path.clone(),
                    group: group.name().to_string(),
                    member: member.clone(),
                });
            }
            let Some(field) = object.get(member) else {
                return Err(SchemaError::UnknownGroupMember {
                    path: path.clone(),
                    group: group.name().to_string(),
                    member: member.clone(),
                });
            };
            if field.schema().is_required() || field.schema().default_scalar().is_some() {
                return Err(SchemaError::RequiredGroupMember {
                    path: path.clone(),
                    group: group.name().to_string(),
                    member: member.clone(),
                });
            }
            if let Some(first) = owner.insert(member.as_str(), group.name()) {
                if first != group.name() {
                    return Err(SchemaError::OverlappingGroups {
                        path: path.clone(),
                        field: member.clone(),
                        first: first.to_string(),
                        second: group.name().to_string(),
                    });
                }
            }
        }
    }
    Ok(())
}

fn check_field(schema: &FieldSchema, path: &FieldPath) -> Result<(), SchemaError> {
    for validator in schema.validators() {
        if !accepts(validator, schema.kind()) {
            return Err(SchemaError::IncompatibleValidator {
                path: path.clone(),
                validator: validator.tag().to_string(),
                kind: schema.kind().describe(),
            });
        }
    }
    if let Some(default) = schema.default_scalar() {
        if schema.is_required() {
            return Err(SchemaError::RequiredWithDefault { path: path.clone() });
        }
        match schema.kind() {
            FieldKind::Scalar(t) if *t == default.scalar_type() => {}
            other => {
                return Err(SchemaError::DefaultTypeMismatch {
                    path: path.clone(),
                    expected: other.describe(),
                    found: default.scalar_type().to_string(),
                })
            }
        }
        for validator in schema.validators() {
            if let Err(reason) = validator.check(default) {
                return Err(SchemaError::DefaultRejected {
                    path: path.clone(),
                    validator: validator.tag().to_string(),
                    reason,
                });
            }
        }
    }
    match schema.kind() {
        FieldKind::Scalar(_) => Ok(()),
        FieldKind::List(item) => check_item(item, &path.index(0)),
        FieldKind::Map(value) => check_item(value, &path.key("*")),
        FieldKind::Object(object) => check_object(object, path),
    }
}

/// List items and map values are never absent, so requiredness and
/// defaults have no meaning on them.
fn check_item(schema: &FieldSchema, path: &FieldPath) -> Result<(), SchemaError> {
    if schema.default_scalar().is_some() {
        return Err(SchemaError::DefaultTypeMismatch {
            path: path.clone(),
            expected: format!("{} item without default", schema.kind().describe()),
            found: "default".to_string(),
        });
    }
    check_field(schema, path)
}

fn accepts(validator: &Validator, kind: &FieldKind) -> bool {
    match (validator.target(), kind) {
        (Target::Scalar(expected), FieldKind::Scalar(actual)) => expected == *actual,
        (Target::StringMap, FieldKind::Map(value)) => {
            matches!(value.kind(), FieldKind::Scalar(ScalarType::String))
        }
        _ => false,
    }
}

fn describe_object(object: &ObjectSchema, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for field in object.fields() {
        let schema = field.schema();
        let _ = write!(out, "{indent}{}: {}", field.name(), schema.kind().describe());
        if schema.is_required() {
            out.push_str(" (required)");
        }
        if let Some(default) = schema.default_scalar() {
            let _ = write!(out, " = {default}");
        }
        let validators = collect_validators(schema);
        if !validators.is_empty() {
            let _ = write!(out, " [{}]", validators.join(", "));
        }
        if schema.key_override().is_some() {
            let _ = write!(out, " as `{}`", field.key());
        }
        if let Some(text) = schema.description() {
            let _ = write!(out, "  # {text}");
        }
        out.push('\n');
        if let Some(nested) = nested_object(schema) {
            describe_object(nested, depth + 1, out);
        }
    }
    for group in object.groups() {
        let _ = writeln!(
            out,
            "{indent}exactly one of `{}`: {}",
            group.name(),
            group.members().join(" | ")
        );
    }
}

/// Validators on the field and, for lists and maps, on its items.
fn collect_validators(schema: &FieldSchema) -> Vec<String> {
    let mut out: Vec<String> = schema.validators().iter().map(ToString::to_string).collect();
    if let FieldKind::List(item) | FieldKind::Map(item) = schema.kind() {
        out.extend(item.validators().iter().map(|v| format!("each {v}")));
    }
    out
}

fn nested_object(schema: &FieldSchema) -> Option<&ObjectSchema> {
    match schema.kind() {
        FieldKind::Object(object) => Some(object),
        FieldKind::List(item) | FieldKind::Map(item) => match item.kind() {
            FieldKind::Object(object) => Some(object),
            _ => None,
        },
        FieldKind::Scalar(_) => None,
    }
}
