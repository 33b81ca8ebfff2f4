//! # Field Schema
//!
//! Declarative description of one node of a document type: its kind
//! (scalar, list, map, nested object), whether it is required, the
//! validators that check it, and how it renders.
//!
//! Schemas are written with a small builder:
//!
//! ```
//! use mfst_core::Validator;
//! use mfst_schema::{FieldSchema, ObjectSchema};
//!
//! let provider = ObjectSchema::new()
//!     .field("aws", FieldSchema::object(ObjectSchema::new()
//!         .field("region", FieldSchema::string().required())))
//!     .field("vault", FieldSchema::object(ObjectSchema::new()
//!         .field("server", FieldSchema::string().required())))
//!     .exactly_one_of("provider", &["aws", "vault"]);
//!
//! let metadata = ObjectSchema::new()
//!     .field("name", FieldSchema::string().required().validate(Validator::name()));
//! # let _ = (provider, metadata);
//! ```
//!
//! Field names are the caller-facing snake_case names used in input and
//! diagnostics. Each field also has a canonical key used in rendered
//! output, derived as lowerCamelCase unless overridden with
//! [`FieldSchema::rename`].

use heck::ToLowerCamelCase;
use mfst_core::{Scalar, ScalarType, Validator};

use crate::group::MutualExclusionGroup;

/// The shape of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// A single scalar of the given type.
    Scalar(ScalarType),
    /// An ordered list; every item follows the item schema.
    List(Box<FieldSchema>),
    /// A string-keyed map; every value follows the value schema.
    Map(Box<FieldSchema>),
    /// A nested object with its own fields and groups.
    Object(ObjectSchema),
}

impl FieldKind {
    /// Short type description, e.g. `string`, `list<object>`, `map<string>`.
    pub fn describe(&self) -> String {
        match self {
            Self::Scalar(t) => t.to_string(),
            Self::List(item) => format!("list<{}>", item.kind().describe()),
            Self::Map(value) => format!("map<{}>", value.kind().describe()),
            Self::Object(_) => "object".to_string(),
        }
    }

    /// The JSON type name the input must have for this kind.
    pub fn expected_input(&self) -> &'static str {
        match self {
            Self::Scalar(t) => t.as_str(),
            Self::List(_) => "list",
            Self::Map(_) | Self::Object(_) => "object",
        }
    }
}

/// Description of one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    kind: FieldKind,
    required: bool,
    validators: Vec<Validator>,
    default: Option<Scalar>,
    omit_empty: bool,
    key: Option<String>,
    description: Option<String>,
}

impl FieldSchema {
    fn of(kind: FieldKind) -> Self {
        Self {
            kind,
            required: false,
            validators: Vec::new(),
            default: None,
            omit_empty: false,
            key: None,
            description: None,
        }
    }

    /// A string scalar.
    pub fn string() -> Self {
        Self::of(FieldKind::Scalar(ScalarType::String))
    }

    /// An integer scalar.
    pub fn integer() -> Self {
        Self::of(FieldKind::Scalar(ScalarType::Integer))
    }

    /// A boolean scalar.
    pub fn boolean() -> Self {
        Self::of(FieldKind::Scalar(ScalarType::Boolean))
    }

    /// A list of `item`.
    pub fn list(item: FieldSchema) -> Self {
        Self::of(FieldKind::List(Box::new(item)))
    }

    /// A map from string keys to `value`.
    pub fn map(value: FieldSchema) -> Self {
        Self::of(FieldKind::Map(Box::new(value)))
    }

    /// A nested object.
    pub fn object(schema: ObjectSchema) -> Self {
        Self::of(FieldKind::Object(schema))
    }

    /// Mark the field required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach a validator. Validators run in attachment order.
    pub fn validate(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Value used when the field is absent from the input.
    pub fn default_value(mut self, value: impl Into<Scalar>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Treat an empty string, list or map in the input as absent.
    pub fn omit_empty(mut self) -> Self {
        self.omit_empty = true;
        self
    }

    /// Override the canonical key used in rendered output.
    pub fn rename(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Human-readable description shown by `describe`.
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn default_scalar(&self) -> Option<&Scalar> {
        self.default.as_ref()
    }

    pub fn omits_empty(&self) -> bool {
        self.omit_empty
    }

    pub fn key_override(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A named field of an object.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    key: String,
    schema: FieldSchema,
}

impl Field {
    /// Caller-facing name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical key in rendered output.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The field's schema.
    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }
}

/// Ordered fields of an object plus its mutual-exclusion groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    fields: Vec<Field>,
    groups: Vec<MutualExclusionGroup>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field. Declaration order is render order.
    pub fn field(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        let name = name.into();
        let key = schema
            .key_override()
            .map(str::to_string)
            .unwrap_or_else(|| name.to_lower_camel_case());
        self.fields.push(Field { name, key, schema });
        self
    }

    /// Declare that exactly one of `members` must be present.
    pub fn exactly_one_of(mut self, group: impl Into<String>, members: &[&str]) -> Self {
        self.groups.push(MutualExclusionGroup::new(group, members));
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn groups(&self) -> &[MutualExclusionGroup] {
        &self.groups
    }

    /// Position of the field with caller-facing `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// The field with caller-facing `name`.
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The field rendered under canonical `key`.
    pub fn get_by_key(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }
}
