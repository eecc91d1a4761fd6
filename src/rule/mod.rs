//! The default-constructor rule for value types.
//!
//! The rule flags parameterless construction (`new T()`, `new T { .. }`,
//! `default(T)`) of a struct that declares at least one constructor of its
//! own. Everything in this module is pure: callers hand in a
//! [`ConstructionSite`] and the [`ResolvedType`] behind it and get back at
//! most one [`Diagnostic`]. Delivering the diagnostic is the caller's job.

mod descriptor;
mod diagnostic;
mod evaluator;
mod site;
mod symbol;

pub use descriptor::{RuleDescriptor, AFEVT};
pub use diagnostic::{Diagnostic, Severity};
pub use evaluator::{evaluate, evaluate_with, is_framework_namespace, FRAMEWORK_NAMESPACE_PREFIXES};
pub use site::{ConstructionSite, DefaultValueSite, ObjectCreationSite, SiteKind, Span, TypeRef};
pub use symbol::{ResolvedType, TypeKind, TypeResolver};
