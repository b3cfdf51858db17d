//! Structured diagnostics attached to every report
//!
//! Parameter corrections are collected here instead of being fired into a
//! global warning channel. Each one is also logged at `warn` level.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single correction or notice produced while validating input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    parameter: String,
    message: String,
}

impl Diagnostic {
    /// Create a diagnostic for `parameter`.
    #[must_use]
    pub fn new(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Name of the parameter the diagnostic refers to.
    #[must_use]
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// Human-readable description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.parameter, self.message)
    }
}

/// Ordered collection of diagnostics for one call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a diagnostic and log it.
    pub fn push(&mut self, parameter: &str, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(parameter, message);
        tracing::warn!(parameter, detail = diagnostic.message(), "input corrected");
        self.0.push(diagnostic);
    }

    /// Append every diagnostic from `other`, keeping order.
    pub fn extend(&mut self, other: Self) {
        self.0.extend(other.0);
    }

    /// True when nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the recorded diagnostics.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    /// True if any diagnostic refers to `parameter`.
    #[must_use]
    pub fn mentions(&self, parameter: &str) -> bool {
        self.0.iter().any(|d| d.parameter == parameter)
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
