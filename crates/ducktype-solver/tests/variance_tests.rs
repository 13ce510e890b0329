use super::*;
use crate::hierarchy::InheritanceGraph;

fn ty(text: &str) -> TypeRef {
    text.parse().unwrap()
}

fn graph() -> InheritanceGraph {
    let graph = InheritanceGraph::new();
    graph.add_inheritance("Derived", &["Base".to_string()]);
    graph.add_inheritance("Base", &["Root".to_string()]);
    graph.add_inheritance("Sibling", &["Root".to_string()]);
    graph
}

// =============================================================================
// Parameters (contravariant)
// =============================================================================

#[test]
fn test_parameter_identical_types() {
    let g = graph();
    assert!(accepts_as_parameter(&ty("string"), &ty("string"), &g));
    assert!(accepts_as_parameter(&ty("Base"), &ty("Base"), &g));
}

#[test]
fn test_parameter_supertype_accepted() {
    let g = graph();
    // Candidate accepts Base where the contract only requires Derived.
    assert!(accepts_as_parameter(&ty("Derived"), &ty("Base"), &g));
    assert!(accepts_as_parameter(&ty("Derived"), &ty("Root"), &g));
}

#[test]
fn test_parameter_subtype_rejected() {
    let g = graph();
    assert!(!accepts_as_parameter(&ty("Base"), &ty("Derived"), &g));
    assert!(!accepts_as_parameter(&ty("Base"), &ty("Sibling"), &g));
}

#[test]
fn test_parameter_scalars_relate_by_equality_only() {
    let g = graph();
    assert!(!accepts_as_parameter(&ty("int"), &ty("float"), &g));
    assert!(!accepts_as_parameter(&ty("string"), &ty("object"), &g));
    assert!(!accepts_as_parameter(&ty("Base"), &ty("object"), &g));
}

#[test]
fn test_parameter_nullability() {
    let g = graph();
    // Nullable candidate parameter where the contract never passes null.
    assert!(!accepts_as_parameter(&ty("string"), &ty("?string"), &g));
    // Only a nullable candidate against a non-nullable contract fails.
    assert!(accepts_as_parameter(&ty("?string"), &ty("string"), &g));
    assert!(accepts_as_parameter(&ty("?string"), &ty("?string"), &g));
}

#[test]
fn test_parameter_any_expected_accepts_everything() {
    let g = graph();
    assert!(accepts_as_parameter(&ty("any"), &ty("int"), &g));
    assert!(accepts_as_parameter(&ty("mixed"), &ty("Base"), &g));
}

#[test]
fn test_parameter_any_expected_accepts_nullable_candidates() {
    let g = graph();
    // `any` and `mixed` admit null, so a candidate that also takes null fits.
    assert!(accepts_as_parameter(&ty("any"), &ty("?string"), &g));
    assert!(accepts_as_parameter(&ty("mixed"), &ty("?Base"), &g));
    assert!(accepts_as_parameter(&ty("any"), &ty("null"), &g));
    assert!(accepts_as_parameter(&ty("mixed"), &ty("null"), &g));
    assert!(accepts_as_parameter(&ty("mixed"), &ty("null|int|string"), &g));
    assert!(accepts_as_parameter(&ty("mixed"), &ty("any"), &g));
}

#[test]
fn test_parameter_any_candidate_rejected_by_default() {
    let g = graph();
    assert!(!accepts_as_parameter(&ty("int"), &ty("any"), &g));
    assert!(!accepts_as_parameter(&ty("?int"), &ty("mixed"), &g));
    assert!(!accepts_as_parameter(&ty("Base|null"), &ty("any"), &g));
    assert!(accepts_as_parameter(&ty("any"), &ty("any"), &g));
}

#[test]
fn test_parameter_any_candidate_widened_by_policy() {
    let g = graph();
    let evaluator =
        VarianceEvaluator::new(&g).with_policy(CheckPolicy::new().with_widen_any_parameters(true));
    assert!(evaluator.policy().widen_any_parameters);

    assert!(evaluator.accepts_as_parameter(&ty("int"), &ty("any")));
    assert!(evaluator.accepts_as_parameter(&ty("int|string"), &ty("any")));
    // `?any` is `any`; the widened candidate takes null contracts too.
    assert!(evaluator.accepts_as_parameter(&ty("int"), &ty("?any")));
    assert!(evaluator.accepts_as_parameter(&ty("?Base"), &ty("mixed")));
    assert!(evaluator.accepts_as_parameter(&ty("int|null"), &ty("any")));
}

#[test]
fn test_default_evaluator_uses_strict_policy() {
    let g = graph();
    let evaluator = VarianceEvaluator::new(&g);
    assert_eq!(evaluator.policy(), CheckPolicy::default());
    assert!(!evaluator.accepts_as_parameter(&ty("?int"), &ty("any")));
}

#[test]
fn test_parameter_expected_union_needs_every_member() {
    let g = graph();
    assert!(!accepts_as_parameter(&ty("int|string"), &ty("int"), &g));
    assert!(accepts_as_parameter(&ty("int|string"), &ty("int|string"), &g));
    assert!(accepts_as_parameter(
        &ty("int|string"),
        &ty("int|string|float"),
        &g
    ));
    assert!(!accepts_as_parameter(&ty("int|string|float"), &ty("int|string"), &g));
}

#[test]
fn test_parameter_expected_union_against_any() {
    let g = graph();
    assert!(accepts_as_parameter(&ty("any"), &ty("int|string"), &g));
}

#[test]
fn test_parameter_actual_union_needs_one_member() {
    let g = graph();
    assert!(accepts_as_parameter(&ty("int"), &ty("int|string"), &g));
    assert!(accepts_as_parameter(&ty("Derived"), &ty("Base|string"), &g));
    assert!(!accepts_as_parameter(&ty("float"), &ty("int|string"), &g));
}

#[test]
fn test_parameter_union_members_use_nominal_rules() {
    let g = graph();
    assert!(accepts_as_parameter(&ty("Derived|int"), &ty("Base|int"), &g));
    assert!(!accepts_as_parameter(&ty("Base|int"), &ty("Derived|int"), &g));
}

#[test]
fn test_parameter_nullable_unions() {
    let g = graph();
    assert!(accepts_as_parameter(&ty("int|string|null"), &ty("int|string|null"), &g));
    // A candidate union that also admits null is wider, which is fine.
    assert!(accepts_as_parameter(&ty("int|string"), &ty("int|string|null"), &g));
    // A contract that may pass null needs a candidate that takes it.
    assert!(!accepts_as_parameter(&ty("int|string|null"), &ty("int|string"), &g));
}

// =============================================================================
// Return types (covariant)
// =============================================================================

#[test]
fn test_return_identical_types() {
    let g = graph();
    assert!(accepts_as_return(&ty("string"), &ty("string"), &g));
    assert!(accepts_as_return(&ty("void"), &ty("void"), &g));
}

#[test]
fn test_return_subtype_accepted() {
    let g = graph();
    assert!(accepts_as_return(&ty("Base"), &ty("Derived"), &g));
    assert!(accepts_as_return(&ty("Root"), &ty("Derived"), &g));
}

#[test]
fn test_return_supertype_rejected() {
    let g = graph();
    assert!(!accepts_as_return(&ty("Derived"), &ty("Base"), &g));
    assert!(!accepts_as_return(&ty("string"), &ty("int"), &g));
}

#[test]
fn test_return_nullability_is_invariant() {
    let g = graph();
    assert!(!accepts_as_return(&ty("string"), &ty("?string"), &g));
    assert!(!accepts_as_return(&ty("?string"), &ty("string"), &g));
    assert!(accepts_as_return(&ty("?Base"), &ty("?Derived"), &g));
}

#[test]
fn test_return_any_is_not_special() {
    let g = graph();
    assert!(!accepts_as_return(&ty("any"), &ty("string"), &g));
    assert!(accepts_as_return(&ty("any"), &ty("any"), &g));
    assert!(accepts_as_return(&ty("mixed"), &ty("mixed"), &g));
    // Both sides admit null, so only the name decides.
    assert!(!accepts_as_return(&ty("any"), &ty("?string"), &g));
    assert!(!accepts_as_return(&ty("?string"), &ty("mixed"), &g));
}

#[test]
fn test_return_unions() {
    let g = graph();
    // Every expected member matched by some actual member.
    assert!(accepts_as_return(&ty("int|string"), &ty("int|string"), &g));
    assert!(accepts_as_return(&ty("Base|int"), &ty("Derived|int"), &g));
    assert!(!accepts_as_return(&ty("int|string"), &ty("int|float"), &g));

    // A single narrower return satisfies an expected union.
    assert!(accepts_as_return(&ty("int|string"), &ty("int"), &g));
    assert!(!accepts_as_return(&ty("int|string"), &ty("float"), &g));

    // Expected single type, actual union: one matching member suffices.
    assert!(accepts_as_return(&ty("int"), &ty("int|string"), &g));
    assert!(!accepts_as_return(&ty("bool"), &ty("int|string"), &g));
}

// =============================================================================
// Properties (invariant)
// =============================================================================

#[test]
fn test_invariant_match() {
    assert!(is_invariant_match(&ty("string"), &ty("string")));
    assert!(!is_invariant_match(&ty("string"), &ty("?string")));
    assert!(!is_invariant_match(&ty("Base"), &ty("Derived")));
    assert!(is_invariant_match(&ty("int|string"), &ty("string|int")));
    assert!(!is_invariant_match(&ty("int|string"), &ty("int|string|null")));
    assert!(is_invariant_match(&ty("any"), &ty("?any")));
    assert!(!is_invariant_match(&ty("any"), &ty("mixed")));
}
