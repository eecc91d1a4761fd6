//! Resolved type symbols and the resolver capability.

use std::collections::HashMap;

use super::TypeRef;

/// Semantic kind of a resolved type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Value type.
    Struct,
    /// Reference type.
    Class,
    Other,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeKind::Struct => "struct",
            TypeKind::Class => "class",
            TypeKind::Other => "other",
        }
    }

    /// Parse a kind name. Anything unrecognised is `Other`.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "struct" => TypeKind::Struct,
            "class" => TypeKind::Class,
            _ => TypeKind::Other,
        }
    }
}

impl std::fmt::Display for TypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Semantic information about the type referenced at a construction site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub kind: TypeKind,
    /// Fully qualified containing namespace, dot-separated. Empty for the global namespace.
    pub namespace: String,
    /// Display name, e.g. `ValueTypeA`.
    pub name: String,
    /// Declared constructors, including the implicit parameterless one.
    pub constructors: usize,
}

impl ResolvedType {
    pub fn new(
        kind: TypeKind,
        namespace: impl Into<String>,
        name: impl Into<String>,
        constructors: usize,
    ) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            name: name.into(),
            constructors,
        }
    }
}

/// Resolves the type referenced at a construction site.
///
/// Implementations must be shareable across worker threads; the host may
/// evaluate sites of the same source unit in parallel.
pub trait TypeResolver: Send + Sync {
    /// Returns `None` when the reference cannot be resolved.
    fn resolve(&self, type_ref: &TypeRef) -> Option<ResolvedType>;
}

impl TypeResolver for HashMap<TypeRef, ResolvedType> {
    fn resolve(&self, type_ref: &TypeRef) -> Option<ResolvedType> {
        self.get(type_ref).cloned()
    }
}

impl<F> TypeResolver for F
where
    F: Fn(&TypeRef) -> Option<ResolvedType> + Send + Sync,
{
    fn resolve(&self, type_ref: &TypeRef) -> Option<ResolvedType> {
        self(type_ref)
    }
}
