//! The rule descriptor: identity, message template and default severity.

use super::Severity;

/// Static metadata describing a rule.
///
/// Descriptors are process-wide constants; nothing mutates them at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDescriptor {
    /// Stable identifier reported with every diagnostic.
    pub id: &'static str,
    /// Short human-readable title.
    pub title: &'static str,
    /// Message template. `{0}` is replaced by the type's display name.
    pub message_format: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub enabled_by_default: bool,
    pub description: &'static str,
}

impl RuleDescriptor {
    /// Render the message template for the given type name.
    pub fn format_message(&self, type_name: &str) -> String {
        self.message_format.replace("{0}", type_name)
    }
}

/// Avoid default constructor on value types that declare other constructors.
pub const AFEVT: RuleDescriptor = RuleDescriptor {
    id: "Afevt",
    title: "Avoid default constructor",
    message_format: "Default constructor is prohibited, because {0} has others constructors",
    category: "Struct",
    severity: Severity::Error,
    enabled_by_default: true,
    description: "Default constructor is prohibited",
};
