#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;
use ssr_ir::{NoSemantics, TreeBuilder};

use crate::handler::SubstitutionHandler;
use crate::text::ArrayDimensionsText;

// Helpers

fn trivial_pattern() -> CompiledPattern {
    let mut b = TreeBuilder::new();
    let root = b.name_ref("x");
    CompiledPattern::builder(b.finish(), root).build().unwrap()
}

fn names(captures: &[Capture]) -> Vec<&str> {
    captures.iter().map(|c| &*c.name).collect()
}

// Tests

#[test]
fn push_and_pop_isolate_scopes() {
    let mut b = TreeBuilder::new();
    let x = b.name_ref("x");
    let y = b.name_ref("y");
    let tree = b.finish();
    let pattern = trivial_pattern();
    let mut ctx = MatchContext::new(&pattern, &tree, &NoSemantics, MatchOptions::default());

    assert!(SubstitutionHandler::new("outer").handle(Some(x), &mut ctx));
    ctx.push_result();
    assert!(!ctx.has_result());
    assert!(SubstitutionHandler::new("inner").handle(Some(y), &mut ctx));
    assert_eq!(names(ctx.result()), vec!["inner"]);

    let popped = ctx.pop_result();
    assert_eq!(names(&popped), vec!["inner"]);
    assert_eq!(names(ctx.result()), vec!["outer"]);

    ctx.append_captures(popped);
    assert_eq!(names(ctx.result()), vec!["outer", "inner"]);
}

#[test]
#[should_panic(expected = "pop_result without matching push_result")]
fn pop_of_root_scope_panics() {
    let tree = TreeBuilder::new().finish();
    let pattern = trivial_pattern();
    let mut ctx = MatchContext::new(&pattern, &tree, &NoSemantics, MatchOptions::default());
    ctx.pop_result();
}

#[test]
fn rollback_drops_later_captures() {
    let mut b = TreeBuilder::new();
    let x = b.name_ref("x");
    let y = b.name_ref("y");
    let owner = b.name_ref("owner");
    let tree = b.finish();
    let pattern = trivial_pattern();
    let mut ctx = MatchContext::new(&pattern, &tree, &NoSemantics, MatchOptions::default());

    assert!(SubstitutionHandler::new("a").handle(Some(x), &mut ctx));
    let checkpoint = ctx.checkpoint();
    assert!(SubstitutionHandler::new("b").handle(Some(y), &mut ctx));
    ctx.record_unmatched(owner, vec![y]);

    ctx.rollback(checkpoint);
    assert_eq!(names(ctx.result()), vec!["a"]);
    let (captures, unmatched) = ctx.finish();
    assert_eq!(captures.len(), 1);
    assert!(unmatched.is_empty());
}

#[test]
fn bindings_see_outer_and_nested_captures() {
    let mut b = TreeBuilder::new();
    let x = b.name_ref("x");
    let y = b.name_ref("y");
    let tree = b.finish();
    let pattern = trivial_pattern();
    let mut ctx = MatchContext::new(&pattern, &tree, &NoSemantics, MatchOptions::default());

    ctx.push_result();
    assert!(SubstitutionHandler::new("v").handle(Some(y), &mut ctx));
    let nested = ctx.pop_result();
    assert!(SubstitutionHandler::new("decl").handle_nested(x, nested, &mut ctx));
    ctx.push_result();

    let found: Vec<_> = ctx.bindings("v").map(Capture::text).collect();
    assert_eq!(found, vec!["y"]);
    assert_eq!(ctx.bindings("missing").count(), 0);
}

#[test]
fn empty_unmatched_lists_are_not_recorded() {
    let mut b = TreeBuilder::new();
    let owner = b.name_ref("owner");
    let extra = b.name_ref("extra");
    let tree = b.finish();
    let pattern = trivial_pattern();
    let mut ctx = MatchContext::new(&pattern, &tree, &NoSemantics, MatchOptions::default());

    ctx.record_unmatched(owner, Vec::new());
    ctx.record_unmatched(owner, vec![extra]);
    let (_, unmatched) = ctx.finish();
    assert_eq!(unmatched, vec![(owner, vec![extra])]);
}

#[test]
fn listener_swaps_back() {
    let mut b = TreeBuilder::new();
    let x = b.name_ref("x");
    let tree = b.finish();
    let pattern = trivial_pattern();
    let mut ctx = MatchContext::new(&pattern, &tree, &NoSemantics, MatchOptions::default());

    assert!(ctx.set_listener(Some(ElementsListener::default())).is_none());
    if let Some(listener) = ctx.listener_mut() {
        listener.matched_elements(&[x]);
    }
    assert_eq!(ctx.listener().map(ElementsListener::matched), Some(&[x][..]));

    let previous = ctx.set_listener(None).unwrap();
    assert_eq!(previous.matched(), &[x]);
    assert!(previous.unmatched().is_empty());
    assert!(ctx.listener().is_none());
}

#[test]
fn text_generator_guard_restores_previous() {
    let mut b = TreeBuilder::new();
    let r = b.reference_element("String");
    let tree = b.finish();
    let pattern = trivial_pattern();
    let mut ctx = MatchContext::new(&pattern, &tree, &NoSemantics, MatchOptions::default());

    assert_eq!(ctx.predicate_text(r), "String");
    {
        let guard = ctx.install_text_generator(Box::new(ArrayDimensionsText { dims: 1 }));
        assert!(guard.has_text_generator());
        assert_eq!(guard.predicate_text(r), "String[]");
    }
    assert!(!ctx.has_text_generator());
    assert_eq!(ctx.predicate_text(r), "String");
}

#[test]
fn nested_text_generators_unwind_in_order() {
    let mut b = TreeBuilder::new();
    let r = b.reference_element("Object");
    let tree = b.finish();
    let pattern = trivial_pattern();
    let mut ctx = MatchContext::new(&pattern, &tree, &NoSemantics, MatchOptions::default());

    let mut outer = ctx.install_text_generator(Box::new(ArrayDimensionsText { dims: 1 }));
    {
        let inner = outer.install_text_generator(Box::new(ArrayDimensionsText { dims: 2 }));
        assert_eq!(inner.predicate_text(r), "Object[][]");
    }
    assert_eq!(outer.predicate_text(r), "Object[]");
}

#[test]
fn texts_equal_honors_case_option() {
    let tree = TreeBuilder::new().finish();
    let pattern = trivial_pattern();
    let sensitive = MatchContext::new(&pattern, &tree, &NoSemantics, MatchOptions::default());
    let insensitive = MatchContext::new(
        &pattern,
        &tree,
        &NoSemantics,
        MatchOptions::default().with_case_sensitive(false),
    );
    assert!(!sensitive.texts_equal("Foo", "foo"));
    assert!(insensitive.texts_equal("Foo", "foo"));
}
