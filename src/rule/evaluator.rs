//! The rule itself: decide whether a construction site gets a diagnostic.

use super::{ConstructionSite, Diagnostic, ResolvedType, TypeKind, TypeResolver, AFEVT};

/// Namespace prefixes owned by the framework.
///
/// Matching is a plain string prefix test on the containing namespace, so
/// `Systematic.Foo` is excluded just like `System.Foo`.
pub const FRAMEWORK_NAMESPACE_PREFIXES: &[&str] = &["System", "Microsoft"];

/// Evaluate one construction site against its resolved type.
///
/// A diagnostic is returned only when all of the following hold:
/// - the construction passes no constructor arguments,
/// - the type resolved and is a struct,
/// - its namespace does not start with a framework prefix,
/// - it declares more than the implicit parameterless constructor.
pub fn evaluate(site: &ConstructionSite, resolved: Option<&ResolvedType>) -> Option<Diagnostic> {
    if !site.is_parameterless() {
        return None;
    }

    let ty = resolved?;
    if ty.kind != TypeKind::Struct {
        return None;
    }
    if is_framework_namespace(&ty.namespace) {
        return None;
    }
    if ty.constructors <= 1 {
        return None;
    }

    Some(Diagnostic::new(&AFEVT, site.span().clone(), &ty.name))
}

/// Resolve the site's type through `resolver`, then evaluate.
///
/// Sites that pass arguments are rejected before the resolver is consulted.
pub fn evaluate_with<R>(resolver: &R, site: &ConstructionSite) -> Option<Diagnostic>
where
    R: TypeResolver + ?Sized,
{
    if !site.is_parameterless() {
        return None;
    }
    let resolved = resolver.resolve(site.type_ref());
    evaluate(site, resolved.as_ref())
}

/// Whether `namespace` starts with one of [`FRAMEWORK_NAMESPACE_PREFIXES`].
pub fn is_framework_namespace(namespace: &str) -> bool {
    FRAMEWORK_NAMESPACE_PREFIXES
        .iter()
        .any(|prefix| namespace.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{ObjectCreationSite, Severity, Span, TypeRef};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn span() -> Span {
        Span::new(300, 316, 15, 25, 15, 41)
    }

    fn new_site(type_name: &str, arguments: Option<usize>) -> ConstructionSite {
        ConstructionSite::object_creation(span(), type_name, arguments)
    }

    fn value_type(namespace: &str, name: &str, constructors: usize) -> ResolvedType {
        ResolvedType::new(TypeKind::Struct, namespace, name, constructors)
    }

    #[test]
    fn test_flags_parameterless_new_of_struct_with_ctor() {
        let ty = value_type("ConsoleApplication1", "ValueTypeA", 2);
        let diag = evaluate(&new_site("ValueTypeA", Some(0)), Some(&ty)).expect("diagnostic");

        assert_eq!(diag.rule_id, "Afevt");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(
            diag.message,
            "Default constructor is prohibited, because ValueTypeA has others constructors"
        );
        assert_eq!(diag.span, span());
    }

    #[test]
    fn test_flags_default_value_expression() {
        let ty = value_type("App", "Money", 3);
        let site = ConstructionSite::default_value(span(), "Money");
        let diag = evaluate(&site, Some(&ty)).expect("diagnostic");
        assert!(diag.message.contains("Money has others constructors"));
    }

    #[test]
    fn test_flags_initializer_without_arguments() {
        let ty = value_type("App", "Money", 2);
        let site = ConstructionSite::ObjectCreation(ObjectCreationSite {
            span: span(),
            type_ref: TypeRef::new("Money"),
            arguments: None,
            has_initializer: true,
        });
        assert!(evaluate(&site, Some(&ty)).is_some());
    }

    #[test]
    fn test_ignores_construction_with_arguments() {
        let ty = value_type("ConsoleApplication1", "ValueTypeA", 2);
        for n in 1..4 {
            assert!(evaluate(&new_site("ValueTypeA", Some(n)), Some(&ty)).is_none());
        }
        let many = value_type("ConsoleApplication1", "ValueTypeA", 10);
        assert!(evaluate(&new_site("ValueTypeA", Some(2)), Some(&many)).is_none());
    }

    #[test]
    fn test_ignores_struct_with_only_implicit_ctor() {
        let ty = value_type("ConsoleApplication1", "ValueTypeA", 1);
        assert!(evaluate(&new_site("ValueTypeA", None), Some(&ty)).is_none());
        assert!(evaluate(&ConstructionSite::default_value(span(), "ValueTypeA"), Some(&ty)).is_none());
    }

    #[test]
    fn test_zero_constructors_is_treated_as_implicit_only() {
        let ty = value_type("ConsoleApplication1", "ValueTypeA", 0);
        assert!(evaluate(&new_site("ValueTypeA", Some(0)), Some(&ty)).is_none());
        assert!(evaluate(&ConstructionSite::default_value(span(), "ValueTypeA"), Some(&ty)).is_none());
    }

    #[test]
    fn test_ignores_classes_and_other_kinds() {
        for kind in [TypeKind::Class, TypeKind::Other] {
            let ty = ResolvedType::new(kind, "ConsoleApplication1", "ValueTypeA", 2);
            assert!(evaluate(&new_site("ValueTypeA", Some(0)), Some(&ty)).is_none());
        }
    }

    #[test]
    fn test_ignores_unresolved_type() {
        assert!(evaluate(&new_site("Missing", Some(0)), None).is_none());
    }

    #[test]
    fn test_framework_namespaces_are_prefix_matched() {
        for ns in [
            "System",
            "System.Joe.Indien",
            "Microsoft.Joe.Indien",
            "Systematic.Foo",
            "MicrosoftFans",
        ] {
            let ty = value_type(ns, "ValueTypeA", 2);
            assert!(
                evaluate(&new_site("ValueTypeA", Some(0)), Some(&ty)).is_none(),
                "namespace {ns} should be excluded"
            );
        }

        for ns in ["", "MySystem", "Company.System", "system.lowercase"] {
            let ty = value_type(ns, "ValueTypeA", 2);
            assert!(
                evaluate(&new_site("ValueTypeA", Some(0)), Some(&ty)).is_some(),
                "namespace {ns:?} should not be excluded"
            );
        }
    }

    #[test]
    fn test_evaluate_with_resolver() {
        let mut table = HashMap::new();
        table.insert(TypeRef::new("ValueTypeA"), value_type("App", "ValueTypeA", 2));

        assert!(evaluate_with(&table, &new_site("ValueTypeA", None)).is_some());
        assert!(evaluate_with(&table, &new_site("Other", None)).is_none());
    }

    #[test]
    fn test_evaluate_with_skips_resolver_when_arguments_present() {
        let calls = AtomicUsize::new(0);
        let resolver = |_: &TypeRef| {
            calls.fetch_add(1, Ordering::Relaxed);
            Some(value_type("App", "ValueTypeA", 2))
        };

        assert!(evaluate_with(&resolver, &new_site("ValueTypeA", Some(1))).is_none());
        assert_eq!(calls.load(Ordering::Relaxed), 0);

        assert!(evaluate_with(&resolver, &new_site("ValueTypeA", Some(0))).is_some());
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_display_name_is_embedded_verbatim() {
        for name in ["Point", "Money", "Vector3", "Pair`2"] {
            let ty = value_type("App.Model", name, 2);
            let diag = evaluate(&new_site(name, None), Some(&ty)).expect("diagnostic");
            assert!(diag.message.contains(&format!("because {name} has")));
        }
    }
}
