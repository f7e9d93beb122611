#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;
use ssr_ir::TreeBuilder;

use crate::handler::TextSubstitution;

// Helpers

/// `$a$.foo($b$)` with the two name identifiers.
fn call_tree() -> (SyntaxTree, NodeId, NodeId, NodeId) {
    let mut b = TreeBuilder::new();
    let q = b.name_ref("a");
    let arg = b.name_ref("b");
    let call = b.method_call(Some(q), "foo", &[arg]);
    let tree = b.finish();
    let a = tree.child(q, ssr_ir::Role::Name).unwrap();
    let b_name = tree.child(arg, ssr_ir::Role::Name).unwrap();
    (tree, call, a, b_name)
}

// Tests

#[test]
fn builds_handler_table_and_variables() {
    let (tree, call, a, b) = call_tree();
    let pattern = CompiledPattern::builder(tree, call)
        .variable(a, SubstitutionHandler::new("a"))
        .variable(b, SubstitutionHandler::new("b").occurs(0, 1))
        .build()
        .unwrap();

    assert_eq!(pattern.root(), call);
    assert!(pattern.is_typed_var(a));
    assert!(!pattern.is_typed_var(call));
    assert!(pattern.allows_absence(b));
    assert!(!pattern.allows_absence(a));
    assert_eq!(pattern.variable_node("b"), Some(b));
    assert_eq!(pattern.variable("a").map(|h| h.min_occurs()), Some(1));
    let mut names: Vec<_> = pattern.variable_names().map(|n| n.to_string()).collect();
    names.sort();
    assert_eq!(names, vec!["a".to_owned(), "b".to_owned()]);
}

#[test]
fn matching_handlers_are_not_variables() {
    let (tree, call, _, _) = call_tree();
    let pattern = CompiledPattern::builder(tree, call)
        .handler(call, MatchingHandler::Skipping)
        .build()
        .unwrap();
    assert!(pattern.matching(call).is_some());
    assert!(pattern.substitution(call).is_none());
    assert!(!pattern.is_typed_var(call));
}

#[test]
fn super_member_requests_are_recorded() {
    let (tree, call, _, _) = call_tree();
    let pattern = CompiledPattern::builder(tree, call)
        .requests_super_fields(true)
        .requests_super_methods(true)
        .build()
        .unwrap();
    assert!(pattern.requests_super_fields());
    assert!(pattern.requests_super_methods());
    assert!(!pattern.requests_super_inners());
}

#[test]
fn unknown_root_is_rejected() {
    let (tree, _, _, _) = call_tree();
    let ghost = NodeId::new(999);
    let err = CompiledPattern::builder(tree, ghost).build().unwrap_err();
    assert!(matches!(err, PatternError::UnknownNode(n) if n == ghost));
}

#[test]
fn handler_outside_tree_is_rejected() {
    let (tree, call, _, _) = call_tree();
    let err = CompiledPattern::builder(tree, call)
        .variable(NodeId::new(500), SubstitutionHandler::new("x"))
        .build()
        .unwrap_err();
    assert!(matches!(err, PatternError::UnknownNode(_)));
}

#[test]
fn duplicate_handler_is_rejected() {
    let (tree, call, a, _) = call_tree();
    let err = CompiledPattern::builder(tree, call)
        .variable(a, SubstitutionHandler::new("a"))
        .handler(a, MatchingHandler::Structural)
        .build()
        .unwrap_err();
    assert!(matches!(err, PatternError::DuplicateHandler(n) if n == a));
}

#[test]
fn min_above_max_is_rejected() {
    let (tree, call, a, _) = call_tree();
    let err = CompiledPattern::builder(tree, call)
        .variable(a, SubstitutionHandler::new("a").occurs(3, 1))
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        PatternError::InvalidOccurrences { min: 3, max: 1, .. }
    ));
}

#[test]
fn inconsistent_redeclaration_is_rejected() {
    let (tree, call, a, b) = call_tree();
    let err = CompiledPattern::builder(tree, call)
        .variable(a, SubstitutionHandler::new("x"))
        .variable(b, SubstitutionHandler::new("x").occurs(0, 1))
        .build()
        .unwrap_err();
    assert!(matches!(err, PatternError::InconsistentVariable(ref name) if name == "x"));
}

#[test]
fn consistent_redeclaration_keeps_first_node() {
    let (tree, call, a, b) = call_tree();
    let pattern = CompiledPattern::builder(tree, call)
        .variable(a, SubstitutionHandler::new("x"))
        .variable(b, SubstitutionHandler::new("x"))
        .build()
        .unwrap();
    assert_eq!(pattern.variable_node("x"), Some(a));
    assert!(pattern.is_typed_var(b));
}

#[test]
fn pin_must_name_a_declared_variable() {
    let (tree, call, a, _) = call_tree();
    let err = CompiledPattern::builder(tree, call)
        .variable(a, SubstitutionHandler::new("a").pinned_to("missing"))
        .build()
        .unwrap_err();
    assert!(matches!(err, PatternError::UnknownVariable(ref name) if name == "missing"));
}

#[test]
fn pin_to_self_is_rejected() {
    let (tree, call, a, _) = call_tree();
    let err = CompiledPattern::builder(tree, call)
        .variable(a, SubstitutionHandler::new("a").pinned_to("a"))
        .build()
        .unwrap_err();
    assert!(matches!(err, PatternError::PinnedToSelf(_)));
}

#[test]
fn text_substitution_variables_must_exist() {
    let (tree, call, a, _) = call_tree();
    let text = TextSubstitution::new(r"(\w+)", &["word"], true).unwrap();
    let err = CompiledPattern::builder(tree, call)
        .variable(a, SubstitutionHandler::new("a"))
        .handler(call, MatchingHandler::CommentText(text))
        .build()
        .unwrap_err();
    assert!(matches!(err, PatternError::UnknownVariable(ref name) if name == "word"));
}

#[test]
fn class_content_needs_a_substitution() {
    let (tree, call, a, b) = call_tree();
    let err = CompiledPattern::builder(tree.clone(), call)
        .handler(b, MatchingHandler::Structural)
        .class_content(b)
        .build()
        .unwrap_err();
    assert!(matches!(err, PatternError::InvalidClassContent(n) if n == b));

    let pattern = CompiledPattern::builder(tree, call)
        .variable(a, SubstitutionHandler::new("rest").occurs(0, u32::MAX))
        .class_content(a)
        .build()
        .unwrap();
    assert_eq!(pattern.class_content(), Some(a));
}

#[test]
fn errors_render_variable_names() {
    let (tree, call, a, _) = call_tree();
    let err = CompiledPattern::builder(tree, call)
        .variable(a, SubstitutionHandler::new("x").occurs(2, 1))
        .build()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "variable `x` has min occurrences 2 above max 1"
    );
}
