use super::*;
use pretty_assertions::assert_eq;

#[test]
fn method_call_text() {
    let mut b = TreeBuilder::new();
    let obj = b.name_ref("obj");
    let hi = b.literal("\"hi\"");
    let call = b.method_call(Some(obj), "foo", &[hi]);
    let tree = b.finish();
    assert_eq!(tree.text(call), "obj.foo(\"hi\")");
    assert_eq!(tree.child(call, Role::Qualifier), Some(obj));
    assert_eq!(tree.list_in(call, Role::Arguments).as_slice(), &[hi]);
}

#[test]
fn qualified_reference_nests() {
    let mut b = TreeBuilder::new();
    let r = b.reference_element("java.util.List");
    let tree = b.finish();
    assert_eq!(tree.text(r), "java.util.List");
    let q = tree.child(r, Role::Qualifier);
    assert_eq!(q.map(|q| tree.text(q)), Some("java.util"));
    let name = tree.child(r, Role::Name);
    assert_eq!(name.map(|n| tree.text(n)), Some("List"));
}

#[test]
fn generic_reference_keeps_arguments() {
    let mut b = TreeBuilder::new();
    let s = b.simple_type("String");
    let r = b.generic_reference("List", &[s]);
    let tree = b.finish();
    assert_eq!(tree.text(r), "List<String>");
    assert_eq!(tree.list_in(r, Role::TypeArguments).as_slice(), &[s]);
}

#[test]
fn primitive_types_are_keywords() {
    let mut b = TreeBuilder::new();
    let t = b.array_type("int", 1);
    let tree = b.finish();
    let component = tree.child(t, Role::Element);
    assert_eq!(component.map(|c| tree.kind(c)), Some(NodeKind::Keyword));
    assert_eq!(tree.text(t), "int[]");
}

#[test]
fn binary_is_polyadic() {
    let mut b = TreeBuilder::new();
    let ops: Vec<_> = ["a", "b", "c"].iter().map(|n| b.name_ref(n)).collect();
    let sum = b.binary("+", &ops);
    let tree = b.finish();
    assert_eq!(tree.text(sum), "a + b + c");
    assert_eq!(tree.children_with_role(sum, Role::Operand).count(), 3);
}

#[test]
fn if_without_else() {
    let mut b = TreeBuilder::new();
    let c = b.name_ref("ok");
    let r = b.return_statement(None);
    let stmt = b.if_statement(c, r, None);
    let tree = b.finish();
    assert_eq!(tree.child(stmt, Role::Else), None);
    assert_eq!(tree.text(stmt), "if (ok) return;");
}
