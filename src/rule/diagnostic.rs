//! Diagnostics produced by the rule.

use serde::{Deserialize, Serialize};

use super::{RuleDescriptor, Span};

/// Severity levels for diagnostics. The rule only reports errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single finding emitted by the rule for one construction site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub rule_id: String,
    pub severity: Severity,
    pub message: String,
    /// Span of the whole construction expression.
    pub span: Span,
}

impl Diagnostic {
    /// Build a diagnostic for `descriptor`, interpolating `type_name` into its message.
    pub fn new(descriptor: &RuleDescriptor, span: Span, type_name: &str) -> Self {
        Self {
            rule_id: descriptor.id.to_string(),
            severity: descriptor.severity,
            message: descriptor.format_message(type_name),
            span,
        }
    }
}
