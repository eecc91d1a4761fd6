//! Construction sites: the syntax occurrences the rule evaluates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source location span with byte offsets and line/column positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (0-indexed).
    pub start_byte: usize,
    /// End byte offset (0-indexed, exclusive).
    pub end_byte: usize,
    /// Start line (1-indexed).
    pub start_line: usize,
    /// Start column (1-indexed).
    pub start_col: usize,
    /// End line (1-indexed).
    pub end_line: usize,
    /// End column (1-indexed).
    pub end_col: usize,
}

impl Span {
    pub fn new(
        start_byte: usize,
        end_byte: usize,
        start_line: usize,
        start_col: usize,
        end_line: usize,
        end_col: usize,
    ) -> Self {
        Self {
            start_byte,
            end_byte,
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Check that positions are 1-indexed and the span does not run backwards.
    pub fn is_well_formed(&self) -> bool {
        self.start_line >= 1
            && self.start_col >= 1
            && self.end_byte >= self.start_byte
            && (self.end_line, self.end_col) >= (self.start_line, self.start_col)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

/// The raw spelling of a type reference, as written at the site.
///
/// Resolvers use it as the lookup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(spelling: impl Into<String>) -> Self {
        Self(spelling.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last dotted segment, e.g. `ValueTypeA` for `System.Joe.ValueTypeA`.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Kind of construction expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SiteKind {
    ObjectCreation,
    DefaultValue,
}

impl SiteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteKind::ObjectCreation => "object_creation",
            SiteKind::DefaultValue => "default_value",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "object_creation" => Some(SiteKind::ObjectCreation),
            "default_value" => Some(SiteKind::DefaultValue),
            _ => None,
        }
    }
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `new T(...)`, `new T { ... }` or `new T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectCreationSite {
    pub span: Span,
    pub type_ref: TypeRef,
    /// `None` when the argument list is absent, otherwise its argument count.
    pub arguments: Option<usize>,
    /// Whether an object/collection initializer follows. Never affects the rule.
    pub has_initializer: bool,
}

/// `default(T)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultValueSite {
    pub span: Span,
    pub type_ref: TypeRef,
}

/// A construction expression handed to the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructionSite {
    ObjectCreation(ObjectCreationSite),
    DefaultValue(DefaultValueSite),
}

impl ConstructionSite {
    /// Shorthand for an object creation site.
    pub fn object_creation(span: Span, type_ref: impl Into<TypeRef>, arguments: Option<usize>) -> Self {
        ConstructionSite::ObjectCreation(ObjectCreationSite {
            span,
            type_ref: type_ref.into(),
            arguments,
            has_initializer: false,
        })
    }

    /// Shorthand for a default-value site.
    pub fn default_value(span: Span, type_ref: impl Into<TypeRef>) -> Self {
        ConstructionSite::DefaultValue(DefaultValueSite {
            span,
            type_ref: type_ref.into(),
        })
    }

    pub fn span(&self) -> &Span {
        match self {
            ConstructionSite::ObjectCreation(site) => &site.span,
            ConstructionSite::DefaultValue(site) => &site.span,
        }
    }

    pub fn type_ref(&self) -> &TypeRef {
        match self {
            ConstructionSite::ObjectCreation(site) => &site.type_ref,
            ConstructionSite::DefaultValue(site) => &site.type_ref,
        }
    }

    /// Whether the construction supplies zero constructor arguments.
    ///
    /// An initializer block does not count as arguments.
    pub fn is_parameterless(&self) -> bool {
        match self {
            ConstructionSite::ObjectCreation(site) => site.arguments.unwrap_or(0) == 0,
            ConstructionSite::DefaultValue(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::new(0, 16, 1, 1, 1, 17)
    }

    #[test]
    fn test_parameterless_object_creation() {
        assert!(ConstructionSite::object_creation(span(), "A", None).is_parameterless());
        assert!(ConstructionSite::object_creation(span(), "A", Some(0)).is_parameterless());
        assert!(!ConstructionSite::object_creation(span(), "A", Some(1)).is_parameterless());
        assert!(!ConstructionSite::object_creation(span(), "A", Some(3)).is_parameterless());
    }

    #[test]
    fn test_initializer_does_not_count_as_arguments() {
        let site = ConstructionSite::ObjectCreation(ObjectCreationSite {
            span: span(),
            type_ref: TypeRef::new("A"),
            arguments: None,
            has_initializer: true,
        });
        assert!(site.is_parameterless());
    }

    #[test]
    fn test_default_value_is_always_parameterless() {
        let site = ConstructionSite::default_value(span(), "A");
        assert!(site.is_parameterless());
    }

    #[test]
    fn test_site_kind_parse() {
        assert_eq!(SiteKind::parse("object_creation"), Some(SiteKind::ObjectCreation));
        assert_eq!(SiteKind::parse("default_value"), Some(SiteKind::DefaultValue));
        assert_eq!(SiteKind::parse("invocation"), None);
    }

    #[test]
    fn test_span_well_formed() {
        assert!(span().is_well_formed());
        assert!(!Span::new(10, 5, 1, 1, 1, 2).is_well_formed());
        assert!(!Span::new(0, 5, 0, 1, 1, 2).is_well_formed());
        assert!(!Span::new(0, 5, 3, 1, 2, 9).is_well_formed());
    }

    #[test]
    fn test_type_ref_simple_name() {
        assert_eq!(TypeRef::new("System.Joe.Indien.ValueTypeA").simple_name(), "ValueTypeA");
        assert_eq!(TypeRef::new("ValueTypeA").simple_name(), "ValueTypeA");
    }
}
