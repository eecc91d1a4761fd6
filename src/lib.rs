//! afevt - avoid default construction of value types.
//!
//! afevt flags parameterless construction (`new T()`, `new T { .. }`,
//! `default(T)`) of a struct that declares at least one constructor of its
//! own, since such construction skips whatever initialization those
//! constructors enforce. Types in namespaces starting with `System` or
//! `Microsoft` are left alone.
//!
//! # Architecture
//!
//! - `rule`: The rule itself. Pure, stateless, no I/O.
//! - `facts`: Reads the facts files an external frontend writes per source unit
//! - `runner`: Evaluates every site of every unit, in parallel
//! - `suppress`: Inline `// afevt:ignore` comments
//! - `config`: YAML configuration
//! - `report`: Output formatting (pretty, JSON, SARIF)
//!
//! Parsing and type resolution are not done here. Embedders that already
//! have a syntax tree and a semantic model can skip the facts files and call
//! [`rule::evaluate`] or [`rule::evaluate_with`] directly.

#[macro_use]
pub mod debug;

pub mod cli;
pub mod config;
pub mod facts;
pub mod report;
pub mod result;
pub mod rule;
pub mod runner;
pub mod suppress;

pub use config::Config;
pub use facts::{FactsDocument, SourceUnit, TypeTable};
pub use result::{Finding, LintResult};
pub use rule::{
    evaluate, evaluate_with, ConstructionSite, Diagnostic, ResolvedType, Severity, TypeKind,
    TypeRef, TypeResolver, AFEVT,
};
pub use runner::Runner;
