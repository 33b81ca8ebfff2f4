//! # Diagnostics
//!
//! A [`Diagnostic`] is one reported problem with a document: where it is
//! (a [`FieldPath`]) and what is wrong with it. A validation run produces
//! an ordered [`Diagnostics`] collection; an empty collection means the
//! document is valid.
//!
//! Diagnostics come in two categories:
//!
//! - **Structural**: the input does not have the shape the schema
//!   describes (unknown key, wrong kind of value). Detected while the
//!   document tree is built.
//! - **Constraint**: the shape is right but a rule is broken (missing
//!   required field, rejected validator, mutual-exclusion count).
//!   Detected by the validation engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
    /// A named object field (caller-facing name).
    Field(String),
    /// A list position.
    Index(usize),
    /// A map key.
    Key(String),
}

/// Location of a node inside a document, expressed with caller-facing names.
///
/// Displays as `metadata.name`, `spec.data[0].secret_key`, or
/// `metadata.labels["app.kubernetes.io/name"]`. The empty path is `(root)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The document root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a dotted path of field names, e.g. `spec.provider.aws`.
    ///
    /// Only field segments are supported; this is for tests and for
    /// addressing schema locations, not for arbitrary document paths.
    pub fn parse(dotted: &str) -> Self {
        Self(
            dotted
                .split('.')
                .filter(|s| !s.is_empty())
                .map(|s| PathSegment::Field(s.to_string()))
                .collect(),
        )
    }

    /// Extend with a field name.
    pub fn field(&self, name: &str) -> Self {
        self.with(PathSegment::Field(name.to_string()))
    }

    /// Extend with a list index.
    pub fn index(&self, index: usize) -> Self {
        self.with(PathSegment::Index(index))
    }

    /// Extend with a map key.
    pub fn key(&self, key: &str) -> Self {
        self.with(PathSegment::Key(key.to_string()))
    }

    fn with(&self, segment: PathSegment) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment);
        Self(segments)
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The path segments, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Number of segments.
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(name)?;
                }
                PathSegment::Index(idx) => write!(f, "[{idx}]")?,
                PathSegment::Key(key) => write!(f, "[{key:?}]")?,
            }
        }
        Ok(())
    }
}

/// Broad class of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// The input does not match the schema's shape.
    Structural,
    /// The shape matches but a rule is violated.
    Constraint,
}

/// What kind of problem a diagnostic reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum DiagnosticKind {
    /// Input key not declared by the schema.
    UnknownField,
    /// Input value has the wrong kind for its slot.
    TypeMismatch,
    /// A required field is absent.
    MissingRequired,
    /// A validator rejected a present value.
    Rejected {
        /// The validator's tag, e.g. `name` or `base64`.
        validator: String,
    },
    /// A mutual-exclusion group did not have exactly one present member.
    MutualExclusion {
        /// The group's name.
        group: String,
        /// How many members were present.
        present: usize,
    },
}

impl DiagnosticKind {
    /// The category this kind belongs to.
    pub fn category(&self) -> Category {
        match self {
            Self::UnknownField | Self::TypeMismatch => Category::Structural,
            Self::MissingRequired | Self::Rejected { .. } | Self::MutualExclusion { .. } => {
                Category::Constraint
            }
        }
    }
}

/// A single reported violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Where the problem is.
    pub path: FieldPath,
    /// What kind of problem it is.
    pub kind: DiagnosticKind,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// An input key the schema does not declare.
    pub fn unknown_field(path: FieldPath, message: impl Into<String>) -> Self {
        Self {
            path,
            kind: DiagnosticKind::UnknownField,
            message: message.into(),
        }
    }

    /// A value of the wrong kind.
    pub fn type_mismatch(path: FieldPath, expected: &str, found: &str) -> Self {
        Self {
            path,
            kind: DiagnosticKind::TypeMismatch,
            message: format!("expected {expected}, found {found}"),
        }
    }

    /// A required field that is absent.
    pub fn missing_required(path: FieldPath) -> Self {
        Self {
            path,
            kind: DiagnosticKind::MissingRequired,
            message: "required field is missing".to_string(),
        }
    }

    /// A validator rejection.
    pub fn rejected(path: FieldPath, validator: &str, reason: impl Into<String>) -> Self {
        Self {
            path,
            kind: DiagnosticKind::Rejected {
                validator: validator.to_string(),
            },
            message: reason.into(),
        }
    }

    /// A mutual-exclusion violation at the group's parent object.
    pub fn mutual_exclusion(
        path: FieldPath,
        group: &str,
        present: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            path,
            kind: DiagnosticKind::MutualExclusion {
                group: group.to_string(),
                present,
            },
            message: reason.into(),
        }
    }

    /// The category of this diagnostic.
    pub fn category(&self) -> Category {
        self.kind.category()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}: {}", self.path, self.message)
    }
}

/// Ordered collection of diagnostics from one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Append every diagnostic from another collection, preserving order.
    pub fn append(&mut self, other: Diagnostics) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Returns the number of diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns true if there are no diagnostics (the document is valid).
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Returns a slice of all diagnostics.
    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Iterate in report order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    /// Diagnostics reported at exactly `path`.
    pub fn at<'a>(&'a self, path: &'a FieldPath) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics.iter().filter(move |d| &d.path == path)
    }

    /// Whether any diagnostic is structural.
    pub fn has_structural(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.category() == Category::Structural)
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{d}")?;
        }
        Ok(())
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        self.diagnostics.extend(iter);
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}
