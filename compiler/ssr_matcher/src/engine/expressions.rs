//! Expressions: references, calls, implicit qualifiers, literals and operators.

use ssr_ir::{NodeId, NodeKind, Role, SymbolKind, SyntaxTree};

use super::Matcher;
use crate::predicate::Target;

impl Matcher<'_> {
    /// Outermost non-parenthesized expression inside `c`.
    fn skip_parentheses(&self, mut c: NodeId) -> NodeId {
        let ct = self.ct();
        while ct.kind(c) == NodeKind::Parenthesized {
            match ct.child(c, Role::Expression) {
                Some(inner) => c = inner,
                None => break,
            }
        }
        c
    }

    /// Compare a reference expression.
    ///
    /// An unqualified typed name is a wildcard for any expression. A
    /// qualified pattern reference matches an unqualified candidate when the
    /// pattern qualifier accepts the implicit receiver.
    pub(super) fn match_reference(&mut self, p: NodeId, c: NodeId) -> bool {
        let (pt, ct) = (self.pt(), self.ct());
        let c = if self.loose() { self.skip_parentheses(c) } else { c };
        let Some(pn) = pt.child(p, Role::Name) else {
            return false;
        };
        let name_handler = self.pattern().substitution(pn);
        let p_qualifier = pt.child(p, Role::Qualifier);

        if let (Some(handler), None) = (name_handler, p_qualifier) {
            return self.handle_typed(handler, c);
        }
        if ct.kind(c) != NodeKind::ReferenceExpression {
            return false;
        }
        let Some(cn) = ct.child(c, Role::Name) else {
            return false;
        };
        let c_qualifier = ct.child(c, Role::Qualifier);

        let Some(pq) = p_qualifier else {
            return match c_qualifier {
                None => self.match_text(pn, cn),
                Some(_) => self.match_text(pn, cn) && self.match_short_class_name(p, pn, c),
            };
        };
        let named = match name_handler {
            Some(handler) => handler.handle(Some(cn), &mut self.ctx),
            None => self.match_text(pn, cn),
        };
        if !named {
            return false;
        }
        match c_qualifier {
            Some(cq) => self.match_node(pq, cq),
            None if pt.kind(pq) == NodeKind::This => self
                .ctx
                .semantics()
                .resolve(ct, c)
                .is_some_and(|symbol| symbol.kind == SymbolKind::Field && !symbol.is_static),
            None => self.match_implicit_qualifier(pq, c),
        }
    }

    /// A short class name against a qualified candidate reference, so
    /// `Collections` matches `java.util.Collections`.
    ///
    /// The candidate must resolve to a classifier with that simple name.
    /// Without semantic facts, a pattern reference used as a qualifier
    /// accepts a dotted name path ending in the same name.
    fn match_short_class_name(&self, p: NodeId, pn: NodeId, c: NodeId) -> bool {
        let (pt, ct) = (self.pt(), self.ct());
        let short = pt.text(pn);
        let semantics = self.ctx.semantics();
        if let Some(info) = semantics
            .classifier_of(ct, c)
            .and_then(|id| semantics.classifier(id))
        {
            return self.same_type_name(short, &info.qualified_name);
        }
        pt.role(p) == Role::Qualifier && is_name_path(ct, c) && self.same_type_name(short, ct.text(c))
    }

    /// Compare a method call: name, qualifier, arguments, type arguments.
    ///
    /// A typed method name is bound last so it sees a fully matched call.
    pub(super) fn match_method_call(&mut self, p: NodeId, c: NodeId) -> bool {
        if !self.same_kind(p, c) {
            return false;
        }
        let (pt, ct) = (self.pt(), self.ct());
        let (Some(pn), Some(cn)) = (pt.child(p, Role::Name), ct.child(c, Role::Name)) else {
            return false;
        };
        let name_handler = self.pattern().substitution(pn);
        if name_handler.is_none() && !self.match_text(pn, cn) {
            return false;
        }

        let qualified = match (pt.child(p, Role::Qualifier), ct.child(c, Role::Qualifier)) {
            (Some(pq), Some(cq)) => self.match_node(pq, cq),
            (Some(pq), None) if pt.kind(pq) == NodeKind::This => self
                .ctx
                .semantics()
                .resolve(ct, c)
                .is_some_and(|symbol| !symbol.is_static),
            (Some(pq), None) => self.match_implicit_qualifier(pq, c),
            (None, _) => true,
        };

        qualified
            && self.match_list_in(p, c, Role::Arguments)
            && self.match_slot(p, c, Role::TypeArguments)
            && name_handler.map_or(true, |handler| handler.handle(Some(cn), &mut self.ctx))
    }

    /// Match a pattern qualifier against the receiver an unqualified member
    /// access implies: the declaring class for static members, `this`
    /// otherwise.
    ///
    /// Only an optional variable can stand for an implicit qualifier; it is
    /// bound as absent.
    fn match_implicit_qualifier(&mut self, pq: NodeId, c: NodeId) -> bool {
        let Some(handler) = self.typed_var(pq).filter(|h| h.allows_absence()) else {
            return false;
        };
        if handler.predicate().is_some() {
            let semantics = self.ctx.semantics();
            let ct = self.ct();
            let Some(symbol) = semantics.resolve(ct, c) else {
                return false;
            };
            let target = if symbol.is_static {
                match symbol.declaring {
                    Some(declaring) => Target::Classifier(declaring),
                    None => return false,
                }
            } else {
                Target::ImplicitThis(semantics.enclosing_classifier(ct, c).or(symbol.declaring))
            };
            if !handler.validate(target, &self.ctx) {
                return false;
            }
        }
        handler.handle(None, &mut self.ctx)
    }

    /// Literals compare by exact source text unless typed.
    pub(super) fn match_literal(&mut self, p: NodeId, c: NodeId) -> bool {
        if self.ct().kind(c) != NodeKind::Literal {
            return false;
        }
        match self.pattern().substitution(p) {
            Some(handler) => handler.handle(Some(c), &mut self.ctx),
            None => self.pt().text(p) == self.ct().text(c),
        }
    }

    /// Object or array creation.
    pub(super) fn match_new(&mut self, p: NodeId, c: NodeId) -> bool {
        if !self.same_kind(p, c) || !self.match_required_slot(p, c, Role::Type) {
            return false;
        }
        let (pt, ct) = (self.pt(), self.ct());

        let p_dims: Vec<_> = pt.children_with_role(p, Role::Dimension).collect();
        let c_dims: Vec<_> = ct.children_with_role(c, Role::Dimension).collect();
        for i in 0..p_dims.len().max(c_dims.len()) {
            if !self.match_optional(p_dims.get(i).copied(), c_dims.get(i).copied()) {
                return false;
            }
        }

        let anonymous = match (pt.child(p, Role::AnonymousBody), ct.child(c, Role::AnonymousBody)) {
            (None, _) => true,
            (Some(pb), cb) => self.match_optional(Some(pb), cb),
        };
        anonymous
            && self.match_slot(p, c, Role::ArrayInitializer)
            && self.match_list_in(p, c, Role::Arguments)
    }

    pub(super) fn match_array_access(&mut self, p: NodeId, c: NodeId) -> bool {
        self.same_kind(p, c)
            && self.match_required_slot(p, c, Role::Array)
            && self.match_required_slot(p, c, Role::Index)
    }

    /// Same operator, operands in order.
    pub(super) fn match_binary(&mut self, p: NodeId, c: NodeId) -> bool {
        if !self.same_kind(p, c) || !self.match_required_slot(p, c, Role::Operator) {
            return false;
        }
        let ps: Vec<_> = self.pt().children_with_role(p, Role::Operand).collect();
        let cs: Vec<_> = self.ct().children_with_role(c, Role::Operand).collect();
        self.match_sequentially(&ps, &cs)
    }

    pub(super) fn match_assignment(&mut self, p: NodeId, c: NodeId) -> bool {
        self.same_kind(p, c)
            && self.match_required_slot(p, c, Role::Operator)
            && self.match_required_slot(p, c, Role::Left)
            && self.match_required_slot(p, c, Role::Right)
    }

    pub(super) fn match_unary(&mut self, p: NodeId, c: NodeId) -> bool {
        self.same_kind(p, c)
            && self.match_required_slot(p, c, Role::Operator)
            && self.match_required_slot(p, c, Role::Operand)
    }

    pub(super) fn match_conditional(&mut self, p: NodeId, c: NodeId) -> bool {
        self.same_kind(p, c)
            && self.match_required_slot(p, c, Role::Condition)
            && self.match_required_slot(p, c, Role::Then)
            && self.match_required_slot(p, c, Role::Else)
    }

    /// Under loose matching parentheses on either side are transparent.
    pub(super) fn match_parenthesized(&mut self, p: NodeId, c: NodeId) -> bool {
        if self.loose() {
            let pt = self.pt();
            let mut inner = p;
            while pt.kind(inner) == NodeKind::Parenthesized {
                match pt.child(inner, Role::Expression) {
                    Some(next) => inner = next,
                    None => return false,
                }
            }
            let c = self.skip_parentheses(c);
            return self.match_node(inner, c);
        }
        self.same_kind(p, c) && self.match_required_slot(p, c, Role::Expression)
    }

    pub(super) fn match_type_cast(&mut self, p: NodeId, c: NodeId) -> bool {
        self.same_kind(p, c)
            && self.match_required_slot(p, c, Role::Type)
            && self.match_required_slot(p, c, Role::Expression)
    }

    pub(super) fn match_instance_of(&mut self, p: NodeId, c: NodeId) -> bool {
        self.same_kind(p, c)
            && self.match_required_slot(p, c, Role::Expression)
            && self.match_required_slot(p, c, Role::Type)
    }

    pub(super) fn match_this_or_super(&mut self, p: NodeId, c: NodeId) -> bool {
        self.same_kind(p, c) && self.match_slot(p, c, Role::Qualifier)
    }

    pub(super) fn match_class_object_access(&mut self, p: NodeId, c: NodeId) -> bool {
        self.same_kind(p, c) && self.match_required_slot(p, c, Role::Type)
    }

    /// Parameters are compared only when the pattern spells them out. An
    /// expression body matches a block body that just returns it.
    pub(super) fn match_lambda(&mut self, p: NodeId, c: NodeId) -> bool {
        if !self.same_kind(p, c) {
            return false;
        }
        if self.pt().child(p, Role::Parameters).is_some()
            && !self.match_required_slot(p, c, Role::Parameters)
        {
            return false;
        }
        let (Some(pb), Some(cb)) = (self.pt().child(p, Role::Body), self.ct().child(c, Role::Body))
        else {
            return false;
        };
        let pb = returned_expression(self.pt(), pb).unwrap_or(pb);
        let cb = returned_expression(self.ct(), cb).unwrap_or(cb);
        self.match_node(pb, cb)
    }

    /// A wrapper pattern node compared with a bare candidate compares its
    /// inner expression instead.
    pub(super) fn match_skipping(&mut self, p: NodeId, c: NodeId) -> bool {
        match self.pt().child(p, Role::Expression) {
            Some(inner) => self.match_node(inner, c),
            None => false,
        }
    }

    /// A single-variable declaration statement pattern compared with a bare
    /// variable.
    pub(super) fn match_declaration_statement_to_single(&mut self, p: NodeId, c: NodeId) -> bool {
        match self.pt().elements(p).as_slice() {
            [single] => self.match_node(*single, c),
            _ => false,
        }
    }
}

/// Expression returned by a block holding only `return expr;`.
fn returned_expression(tree: &SyntaxTree, body: NodeId) -> Option<NodeId> {
    if tree.kind(body) != NodeKind::CodeBlock {
        return None;
    }
    match tree.elements(body).as_slice() {
        [statement] if tree.kind(*statement) == NodeKind::Return => {
            tree.child(*statement, Role::Expression)
        }
        _ => None,
    }
}

/// `a.b.c`: references all the way down.
fn is_name_path(tree: &SyntaxTree, mut id: NodeId) -> bool {
    loop {
        if tree.kind(id) != NodeKind::ReferenceExpression {
            return false;
        }
        match tree.child(id, Role::Qualifier) {
            Some(qualifier) => id = qualifier,
            None => return true,
        }
    }
}
