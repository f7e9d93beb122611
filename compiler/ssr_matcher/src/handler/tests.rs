#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;
use ssr_ir::{NoSemantics, TreeBuilder};

use crate::{CompiledPattern, MatchOptions};

// Helpers

fn trivial_pattern() -> CompiledPattern {
    let mut b = TreeBuilder::new();
    let root = b.name_ref("x");
    CompiledPattern::builder(b.finish(), root).build().unwrap()
}

fn texts(ctx: &MatchContext<'_>) -> Vec<String> {
    ctx.result().iter().map(|c| c.text().to_owned()).collect()
}

// Tests

#[test]
fn binds_node_text() {
    let mut b = TreeBuilder::new();
    let foo = b.name_ref("foo");
    let tree = b.finish();
    let pattern = trivial_pattern();
    let mut ctx = MatchContext::new(&pattern, &tree, &NoSemantics, MatchOptions::default());

    assert!(SubstitutionHandler::new("a").handle(Some(foo), &mut ctx));
    assert_eq!(texts(&ctx), vec!["foo".to_owned()]);
    assert_eq!(ctx.result()[0].node(), Some(foo));
}

#[test]
fn quoted_literal_is_captured_unquoted() {
    let mut b = TreeBuilder::new();
    let lit = b.literal("\"hi\"");
    let tree = b.finish();
    let pattern = trivial_pattern();
    let mut ctx = MatchContext::new(&pattern, &tree, &NoSemantics, MatchOptions::default());

    assert!(SubstitutionHandler::new("s").handle(Some(lit), &mut ctx));
    assert_eq!(texts(&ctx), vec!["hi".to_owned()]);
    assert_eq!(ctx.result()[0].range(), Some(TextRange::new(1, 2)));
}

#[test]
fn absence_needs_zero_min_occurs() {
    let tree = TreeBuilder::new().finish();
    let pattern = trivial_pattern();
    let mut ctx = MatchContext::new(&pattern, &tree, &NoSemantics, MatchOptions::default());

    assert!(!SubstitutionHandler::new("a").handle(None, &mut ctx));
    assert!(!ctx.has_result());

    let optional = SubstitutionHandler::new("a").occurs(0, 1);
    assert!(optional.allows_absence());
    assert!(optional.handle(None, &mut ctx));
    assert!(ctx.result()[0].is_absent());
}

#[test]
fn single_occurrence_must_repeat_its_text() {
    let mut b = TreeBuilder::new();
    let first = b.name_ref("foo");
    let again = b.name_ref("foo");
    let other = b.name_ref("bar");
    let tree = b.finish();
    let pattern = trivial_pattern();
    let mut ctx = MatchContext::new(&pattern, &tree, &NoSemantics, MatchOptions::default());
    let handler = SubstitutionHandler::new("a");

    assert!(handler.handle(Some(first), &mut ctx));
    assert!(handler.handle(Some(again), &mut ctx));
    assert!(!handler.handle(Some(other), &mut ctx));
    assert_eq!(ctx.bindings("a").count(), 2);
}

#[test]
fn repeated_text_honors_case_sensitivity() {
    let mut b = TreeBuilder::new();
    let upper = b.name_ref("Foo");
    let lower = b.name_ref("foo");
    let tree = b.finish();
    let pattern = trivial_pattern();
    let options = MatchOptions::default().with_case_sensitive(false);
    let mut ctx = MatchContext::new(&pattern, &tree, &NoSemantics, options);
    let handler = SubstitutionHandler::new("a");

    assert!(handler.handle(Some(upper), &mut ctx));
    assert!(handler.handle(Some(lower), &mut ctx));
}

#[test]
fn variadic_stops_at_max_occurs() {
    let mut b = TreeBuilder::new();
    let ids: Vec<_> = ["a", "b", "c"].iter().map(|n| b.name_ref(n)).collect();
    let tree = b.finish();
    let pattern = trivial_pattern();
    let mut ctx = MatchContext::new(&pattern, &tree, &NoSemantics, MatchOptions::default());
    let handler = SubstitutionHandler::new("args").occurs(0, 2);

    assert!(handler.handle(Some(ids[0]), &mut ctx));
    assert!(handler.handle(Some(ids[1]), &mut ctx));
    assert!(!handler.handle(Some(ids[2]), &mut ctx));
}

#[test]
fn zero_max_occurs_never_binds() {
    let mut b = TreeBuilder::new();
    let x = b.name_ref("x");
    let tree = b.finish();
    let pattern = trivial_pattern();
    let mut ctx = MatchContext::new(&pattern, &tree, &NoSemantics, MatchOptions::default());
    let handler = SubstitutionHandler::new("none").occurs(0, 0);

    assert!(!handler.handle(Some(x), &mut ctx));
    assert!(handler.handle(None, &mut ctx));
}

#[test]
fn predicate_gates_binding() {
    let mut b = TreeBuilder::new();
    let foo = b.name_ref("foo");
    let bar = b.name_ref("bar");
    let tree = b.finish();
    let pattern = trivial_pattern();
    let mut ctx = MatchContext::new(&pattern, &tree, &NoSemantics, MatchOptions::default());
    let handler = SubstitutionHandler::new("a")
        .occurs(1, 5)
        .with_predicate(Predicate::regexp("f.*", true).unwrap());

    assert!(!handler.handle(Some(bar), &mut ctx));
    assert!(handler.handle(Some(foo), &mut ctx));
    assert_eq!(texts(&ctx), vec!["foo".to_owned()]);
    assert_eq!(handler.find_regexp().map(RegexPredicate::pattern), Some("f.*"));
}

#[test]
fn handle_range_captures_a_window() {
    let mut b = TreeBuilder::new();
    let comment = b.comment("// TODO later");
    let tree = b.finish();
    let pattern = trivial_pattern();
    let mut ctx = MatchContext::new(&pattern, &tree, &NoSemantics, MatchOptions::default());

    assert!(SubstitutionHandler::new("w").handle_range(comment, TextRange::new(3, 4), &mut ctx));
    assert_eq!(texts(&ctx), vec!["TODO".to_owned()]);
}

#[test]
fn handle_nested_keeps_inner_captures() {
    let mut b = TreeBuilder::new();
    let outer_node = b.identifier("x");
    let inner_node = b.literal("1");
    let tree = b.finish();
    let pattern = trivial_pattern();
    let mut ctx = MatchContext::new(&pattern, &tree, &NoSemantics, MatchOptions::default());

    ctx.push_result();
    assert!(SubstitutionHandler::new("init").handle(Some(inner_node), &mut ctx));
    let nested = ctx.pop_result();
    assert!(SubstitutionHandler::new("name").handle_nested(outer_node, nested, &mut ctx));

    let capture = &ctx.result()[0];
    assert_eq!(capture.text(), "x");
    assert_eq!(capture.sons().len(), 1);
    assert_eq!(capture.sons()[0].text(), "1");
    assert_eq!(ctx.bindings("init").count(), 1);
}

#[test]
fn text_substitution_reports_groups() {
    let text = TextSubstitution::new(r"(\w+) = (\d+)?", &["key", "value"], true).unwrap();
    assert_eq!(text.variables().len(), 2);
    assert_eq!(text.groups("x = 12"), Some(vec![Some((0, 1)), Some((4, 2))]));
    assert_eq!(text.groups("x = "), Some(vec![Some((0, 1)), None]));
    assert_eq!(text.groups("nope!"), None);
}

#[test]
fn text_substitution_rejects_bad_regex() {
    assert!(matches!(
        TextSubstitution::new("(", &[], true),
        Err(PatternError::InvalidRegex { .. })
    ));
}

#[test]
fn only_optional_substitutions_allow_absence() {
    let optional = Handler::from(SubstitutionHandler::new("a").occurs(0, 1));
    let required = Handler::from(SubstitutionHandler::new("a"));
    let matching = Handler::from(MatchingHandler::Skipping);
    assert!(optional.allows_absence());
    assert!(!required.allows_absence());
    assert!(!matching.allows_absence());
    assert!(matching.as_substitution().is_none());
}

#[test]
fn builder_methods_set_flags() {
    let handler = SubstitutionHandler::new("T")
        .within_hierarchy()
        .strictly_within_hierarchy()
        .pinned_to("U");
    assert!(handler.is_subtype());
    assert!(handler.is_strict_subtype());
    assert_eq!(handler.pin().map(|p| &**p), Some("U"));
    assert_eq!(&**handler.name(), "T");
    assert!(handler.predicate().is_none());
}
