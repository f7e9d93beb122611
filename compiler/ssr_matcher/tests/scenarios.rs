//! End-to-end matching scenarios through the public API.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use ssr_ir::{NoSemantics, NodeId, Role, SemanticModel, SyntaxTree, TreeBuilder, TypeInfo};
use ssr_matcher::{
    match_candidates, match_tree, CompiledPattern, ElementsListener, MatchContext, MatchOptions,
    MatchResult, Matcher, Predicate, SubstitutionHandler,
};

// -- Helpers --

fn name(b: &TreeBuilder, id: NodeId) -> NodeId {
    b.tree().child(id, Role::Name).unwrap()
}

fn run(pattern: &CompiledPattern, tree: &SyntaxTree, candidate: NodeId) -> Option<MatchResult> {
    match_tree(pattern, tree, candidate, &NoSemantics, &MatchOptions::default())
}

fn is_absent(result: &MatchResult, var: &str) -> bool {
    result.binding(var).is_some_and(MatchResult::is_absent)
}

/// ```text
/// void run(int n) {
///     for (int i = 0; i < n; i++) {
///         if (i == 0) log.info("start"); else total += i;
///     }
///     return;
/// }
/// ```
fn sample_method(b: &mut TreeBuilder) -> NodeId {
    let int = b.simple_type("int");
    let zero = b.literal("0");
    let i = b.local_variable(int, "i", Some(zero));
    let init = b.declaration_statement(&[i]);
    let i = b.name_ref("i");
    let n = b.name_ref("n");
    let cond = b.binary("<", &[i, n]);
    let i = b.name_ref("i");
    let update = b.postfix(i, "++");

    let i = b.name_ref("i");
    let zero = b.literal("0");
    let is_first = b.binary("==", &[i, zero]);
    let log = b.name_ref("log");
    let start = b.literal("\"start\"");
    let info = b.method_call(Some(log), "info", &[start]);
    let then = b.expression_statement(info);
    let total = b.name_ref("total");
    let i = b.name_ref("i");
    let add = b.assignment(total, "+=", i);
    let els = b.expression_statement(add);
    let branch = b.if_statement(is_first, then, Some(els));
    let loop_block = b.code_block(&[branch]);
    let loop_body = b.block_statement(loop_block);
    let for_loop = b.for_statement(Some(init), Some(cond), Some(update), loop_body);
    let ret = b.return_statement(None);
    let body = b.code_block(&[for_loop, ret]);

    let mods = b.modifier_list(&[], &[]);
    let void = b.simple_type("void");
    let int = b.simple_type("int");
    let n = b.parameter(int, "n");
    b.method(mods, Some(void), "run", &[n], &[], Some(body))
}

// -- Idempotence --

#[test]
fn literal_pattern_matches_itself_without_captures() {
    let mut p = TreeBuilder::new();
    let root = sample_method(&mut p);
    let pattern = CompiledPattern::builder(p.finish(), root).build().unwrap();

    let mut c = TreeBuilder::new();
    let candidate = sample_method(&mut c);
    let tree = c.finish();

    let strict = MatchOptions::default().with_loose_matching(false);
    let result = match_tree(&pattern, &tree, candidate, &NoSemantics, &strict).unwrap();
    assert!(result.sons().is_empty());
    assert!(result.all_unmatched().is_empty());
    assert_eq!(result.node(), Some(candidate));

    let again = match_tree(&pattern, &tree, candidate, &NoSemantics, &strict).unwrap();
    assert_eq!(result, again);
}

#[test]
fn repeated_matching_yields_equal_results() {
    let mut p = TreeBuilder::new();
    let x = p.name_ref("x");
    let root = p.method_call(None, "f", &[x]);
    let x_name = name(&p, x);
    let pattern = CompiledPattern::builder(p.finish(), root)
        .variable(x_name, SubstitutionHandler::new("x"))
        .build()
        .unwrap();

    let mut c = TreeBuilder::new();
    let arg = c.literal("42");
    let first = c.method_call(None, "f", &[arg]);
    let arg = c.literal("7");
    let second = c.method_call(None, "f", &[arg]);
    let arg = c.literal("1");
    let other = c.method_call(None, "g", &[arg]);
    let tree = c.finish();

    let one = run(&pattern, &tree, first).unwrap();
    let two = run(&pattern, &tree, first).unwrap();
    assert_eq!(one, two);
    assert_eq!(one.texts("x"), vec!["42"]);

    let all = match_candidates(
        &pattern,
        &tree,
        &[first, other, second],
        &NoSemantics,
        &MatchOptions::default(),
    );
    let roots: Vec<_> = all.iter().map(|(root, _)| *root).collect();
    assert_eq!(roots, vec![first, second]);
    assert_eq!(all[1].1.texts("x"), vec!["7"]);
}

// -- Optionality --

#[test]
fn optional_slots_bind_absent() {
    let mut p = TreeBuilder::new();
    // int x = $init$;
    let int = p.simple_type("int");
    let init = p.name_ref("init");
    let var = p.local_variable(int, "x", Some(init));
    let decl = p.declaration_statement(&[var]);
    // if (c) a(); else $els$;
    let cond = p.name_ref("c");
    let a = p.method_call(None, "a", &[]);
    let then = p.expression_statement(a);
    let els = p.name_ref("els");
    let els_statement = p.expression_statement(els);
    let branch = p.if_statement(cond, then, Some(els_statement));
    // $q$.close();
    let q = p.name_ref("q");
    let close = p.method_call(Some(q), "close", &[]);
    let close = p.expression_statement(close);
    // int[] arr = new int[$dim$];
    let ty = p.array_type("int", 1);
    let int = p.keyword("int");
    let dim = p.name_ref("dim");
    let alloc = p.new_array(int, &[dim], None);
    let arr = p.local_variable(ty, "arr", Some(alloc));
    let arr = p.declaration_statement(&[arr]);
    let root = p.code_block(&[decl, branch, close, arr]);

    let vars = [("init", init), ("els", els), ("q", q), ("dim", dim)];
    let vars: Vec<_> = vars.iter().map(|&(n, id)| (n, name(&p, id))).collect();
    let pattern = vars
        .iter()
        .fold(CompiledPattern::builder(p.finish(), root), |b, &(n, id)| {
            b.variable(id, SubstitutionHandler::new(n).occurs(0, 1))
        })
        .build()
        .unwrap();

    let mut c = TreeBuilder::new();
    let int = c.simple_type("int");
    let var = c.local_variable(int, "x", None);
    let decl = c.declaration_statement(&[var]);
    let cond = c.name_ref("c");
    let a = c.method_call(None, "a", &[]);
    let then = c.expression_statement(a);
    let branch = c.if_statement(cond, then, None);
    let close = c.method_call(None, "close", &[]);
    let close = c.expression_statement(close);
    let ty = c.array_type("int", 1);
    let int = c.keyword("int");
    let one = c.literal("1");
    let values = c.array_initializer(&[one]);
    let alloc = c.new_array(int, &[], Some(values));
    let arr = c.local_variable(ty, "arr", Some(alloc));
    let arr = c.declaration_statement(&[arr]);
    let candidate = c.code_block(&[decl, branch, close, arr]);
    let tree = c.finish();

    let result = run(&pattern, &tree, candidate).unwrap();
    for var in ["init", "els", "q", "dim"] {
        assert!(is_absent(&result, var), "{var} should be absent");
        assert!(result.texts(var).is_empty());
    }
}

// -- Negation inversion --

/// Classes `p.A`, `p.B extends A`, `p.C extends B` and an unrelated `p.D`,
/// with one `<T> x;` local per class.
fn hierarchy_fixture() -> (SyntaxTree, SemanticModel, [NodeId; 4]) {
    let mut model = SemanticModel::new();
    let a = model.add_classifier("p.A", false, &[]);
    let b = model.add_classifier("p.B", false, &[a]);
    let c = model.add_classifier("p.C", false, &[b]);
    let d = model.add_classifier("p.D", false, &[]);

    let mut t = TreeBuilder::new();
    let mut locals = [NodeId::INVALID; 4];
    for (slot, (simple, classifier)) in locals
        .iter_mut()
        .zip([("A", a), ("B", b), ("C", c), ("D", d)])
    {
        let ty = t.simple_type(simple);
        let reference = t.tree().child(ty, Role::Element).unwrap();
        model.set_denotes(reference, classifier);
        *slot = t.local_variable(ty, "x", None);
    }
    (t.finish(), model, locals)
}

fn hierarchy_pattern(handler: SubstitutionHandler) -> CompiledPattern {
    let mut p = TreeBuilder::new();
    let ty = p.simple_type("T");
    let reference = p.tree().child(ty, Role::Element).unwrap();
    let t_name = name(&p, reference);
    let root = p.local_variable(ty, "x", None);
    CompiledPattern::builder(p.finish(), root)
        .variable(t_name, handler)
        .build()
        .unwrap()
}

fn matches(pattern: &CompiledPattern, tree: &SyntaxTree, model: &SemanticModel, c: NodeId) -> bool {
    match_tree(pattern, tree, c, model, &MatchOptions::default()).is_some()
}

#[test]
fn subtype_search_accepts_when_some_ancestor_passes() {
    let (tree, model, [a, b, c, d]) = hierarchy_fixture();
    let pattern = hierarchy_pattern(
        SubstitutionHandler::new("T")
            .within_hierarchy()
            .with_predicate(Predicate::regexp("A", true).unwrap()),
    );

    assert!(matches(&pattern, &tree, &model, a));
    assert!(matches(&pattern, &tree, &model, b));
    assert!(matches(&pattern, &tree, &model, c));
    assert!(!matches(&pattern, &tree, &model, d));

    // The candidate itself is bound, not the accepting ancestor.
    let result = match_tree(&pattern, &tree, c, &model, &MatchOptions::default()).unwrap();
    assert_eq!(result.texts("T"), vec!["C"]);
}

#[test]
fn negated_subtype_search_rejects_when_any_ancestor_fails() {
    let (tree, model, [a, b, c, d]) = hierarchy_fixture();
    let pattern = hierarchy_pattern(
        SubstitutionHandler::new("T")
            .within_hierarchy()
            .with_predicate(Predicate::not(Predicate::regexp("A", true).unwrap())),
    );

    assert!(!matches(&pattern, &tree, &model, a));
    assert!(!matches(&pattern, &tree, &model, b));
    assert!(!matches(&pattern, &tree, &model, c));
    assert!(matches(&pattern, &tree, &model, d));
}

#[test]
fn strict_subtype_search_skips_the_candidate_itself() {
    let (tree, model, [a, b, c, _]) = hierarchy_fixture();
    let pattern = hierarchy_pattern(
        SubstitutionHandler::new("T")
            .strictly_within_hierarchy()
            .with_predicate(Predicate::regexp("B", true).unwrap()),
    );

    assert!(!matches(&pattern, &tree, &model, a));
    assert!(!matches(&pattern, &tree, &model, b));
    assert!(matches(&pattern, &tree, &model, c));
}

// -- Any-order completeness --

#[test]
fn any_order_is_greedy_in_pool_order() {
    let mut p = TreeBuilder::new();
    let p1 = p.reference_element("b");
    let p2 = p.reference_element("V");
    let v = name(&p, p2);
    let pattern = CompiledPattern::builder(p.finish(), p1)
        .variable(
            v,
            SubstitutionHandler::new("V").with_predicate(Predicate::regexp("a|c", true).unwrap()),
        )
        .build()
        .unwrap();

    let mut t = TreeBuilder::new();
    let a = t.reference_element("a");
    let b = t.reference_element("b");
    let c = t.reference_element("c");
    let tree = t.finish();

    let ctx = MatchContext::new(&pattern, &tree, &NoSemantics, MatchOptions::default());
    let mut matcher = Matcher::new(ctx);
    matcher
        .context_mut()
        .set_listener(Some(ElementsListener::default()));

    assert!(matcher.match_in_any_order(&[p1, p2], &[a, b, c]));
    let bound: Vec<_> = matcher.context().bindings("V").filter_map(|c| c.node()).collect();
    assert_eq!(bound, vec![a]);

    let listener = matcher.context_mut().set_listener(None).unwrap();
    assert_eq!(listener.matched(), &[b, a]);
    assert_eq!(listener.unmatched(), &[c]);
}

#[test]
fn any_order_does_not_backtrack_a_greedy_choice() {
    // p1 = $V$ (a or b), p2 = a: p1 takes `a` first, leaving p2 nothing.
    let mut p = TreeBuilder::new();
    let p1 = p.reference_element("V");
    let p2 = p.reference_element("a");
    let v = name(&p, p1);
    let pattern = CompiledPattern::builder(p.finish(), p1)
        .variable(
            v,
            SubstitutionHandler::new("V").with_predicate(Predicate::regexp("a|b", true).unwrap()),
        )
        .build()
        .unwrap();

    let mut t = TreeBuilder::new();
    let a = t.reference_element("a");
    let b = t.reference_element("b");
    let tree = t.finish();

    let ctx = MatchContext::new(&pattern, &tree, &NoSemantics, MatchOptions::default());
    assert!(!Matcher::new(ctx).match_in_any_order(&[p1, p2], &[a, b]));
}

// -- Variadic sequential capture --

#[test]
fn variadic_run_between_fixed_neighbours() {
    let mut p = TreeBuilder::new();
    let x = p.name_ref("x");
    let args = p.name_ref("args");
    let y = p.name_ref("y");
    let root = p.method_call(None, "f", &[x, args, y]);
    let args_name = name(&p, args);
    let pattern = CompiledPattern::builder(p.finish(), root)
        .variable(args_name, SubstitutionHandler::new("args").occurs(0, u32::MAX))
        .build()
        .unwrap();

    let mut t = TreeBuilder::new();
    let mut call = |spelled: &[&str]| {
        let args: Vec<_> = spelled
            .iter()
            .map(|s| {
                if s.chars().all(|ch| ch.is_ascii_digit()) {
                    t.literal(s)
                } else {
                    t.name_ref(s)
                }
            })
            .collect();
        t.method_call(None, "f", &args)
    };
    let three = call(&["x", "1", "2", "3", "y"]);
    let none = call(&["x", "y"]);
    let misplaced = call(&["x", "1", "y", "2"]);
    let tree = t.finish();

    let result = run(&pattern, &tree, three).unwrap();
    assert_eq!(result.texts("args"), vec!["1", "2", "3"]);

    let result = run(&pattern, &tree, none).unwrap();
    assert!(is_absent(&result, "args"));
    assert!(result.texts("args").is_empty());

    assert!(run(&pattern, &tree, misplaced).is_none());
}

// -- End to end --

#[test]
fn call_with_typed_argument() {
    let mut p = TreeBuilder::new();
    let q = p.name_ref("q");
    let a = p.name_ref("a");
    let root = p.method_call(Some(q), "foo", &[a]);
    let (q_name, a_name) = (name(&p, q), name(&p, a));
    let pattern = CompiledPattern::builder(p.finish(), root)
        .variable(q_name, SubstitutionHandler::new("q"))
        .variable(
            a_name,
            SubstitutionHandler::new("a")
                .with_predicate(Predicate::expr_type("String", false, true).unwrap()),
        )
        .build()
        .unwrap();

    let mut t = TreeBuilder::new();
    let obj = t.name_ref("obj");
    let hi = t.literal("\"hi\"");
    let with_string = t.method_call(Some(obj), "foo", &[hi]);
    let obj = t.name_ref("obj");
    let five = t.literal("5");
    let with_int = t.method_call(Some(obj), "foo", &[five]);
    let tree = t.finish();

    let mut model = SemanticModel::new();
    model.set_type(hi, TypeInfo::new("String"));
    model.set_type(five, TypeInfo::new("int"));

    let options = MatchOptions::default();
    let result = match_tree(&pattern, &tree, with_string, &model, &options).unwrap();
    assert_eq!(result.texts("q"), vec!["obj"]);
    assert_eq!(result.texts("a"), vec!["hi"]);
    assert_eq!(result.nodes("a"), vec![hi]);

    assert!(match_tree(&pattern, &tree, with_int, &model, &options).is_none());
}
