//! Statements: blocks, control flow and `try`.

use smallvec::{smallvec, SmallVec};
use ssr_ir::{NodeId, NodeKind, Role, SyntaxTree};

use super::Matcher;

impl Matcher<'_> {
    pub(super) fn match_block_statement(&mut self, p: NodeId, c: NodeId) -> bool {
        if self.loose() {
            return self.match_body(p, c);
        }
        self.same_kind(p, c) && self.match_required_slot(p, c, Role::Body)
    }

    pub(super) fn match_expression_statement(&mut self, p: NodeId, c: NodeId) -> bool {
        self.same_kind(p, c) && self.match_required_slot(p, c, Role::Expression)
    }

    /// Compare two statement positions. Under loose matching a braced block
    /// on either side stands for the statements it contains.
    fn match_body(&mut self, p: NodeId, c: NodeId) -> bool {
        if !self.loose() {
            return self.match_node(p, c);
        }
        let ps = block_contents(self.pt(), p);
        let cs = block_contents(self.ct(), c);
        self.match_sequentially(&ps, &cs)
    }

    /// Optional statement slot compared with [`match_body`](Self::match_body).
    fn match_body_slot(&mut self, p: NodeId, c: NodeId, role: Role) -> bool {
        match (self.pt().child(p, role), self.ct().child(c, role)) {
            (Some(ps), Some(cs)) => self.match_body(ps, cs),
            (ps, cs) => self.match_optional(ps, cs),
        }
    }

    pub(super) fn match_if(&mut self, p: NodeId, c: NodeId) -> bool {
        self.same_kind(p, c)
            && self.match_required_slot(p, c, Role::Condition)
            && self.match_body_slot(p, c, Role::Then)
            && self.match_body_slot(p, c, Role::Else)
    }

    pub(super) fn match_loop(&mut self, p: NodeId, c: NodeId) -> bool {
        self.same_kind(p, c)
            && self.match_required_slot(p, c, Role::Condition)
            && self.match_body_slot(p, c, Role::Body)
    }

    pub(super) fn match_for(&mut self, p: NodeId, c: NodeId) -> bool {
        self.same_kind(p, c)
            && self.match_slot(p, c, Role::Init)
            && self.match_slot(p, c, Role::Condition)
            && self.match_slot(p, c, Role::Update)
            && self.match_body_slot(p, c, Role::Body)
    }

    pub(super) fn match_foreach(&mut self, p: NodeId, c: NodeId) -> bool {
        self.same_kind(p, c)
            && self.match_required_slot(p, c, Role::Parameter)
            && self.match_required_slot(p, c, Role::IteratedValue)
            && self.match_body_slot(p, c, Role::Body)
    }

    /// `return` and `throw`; an optional variable matches a missing value.
    pub(super) fn match_exit(&mut self, p: NodeId, c: NodeId) -> bool {
        self.same_kind(p, c) && self.match_slot(p, c, Role::Expression)
    }

    /// Compare a `try` statement.
    ///
    /// Resources and catch sections match in any order. Under strict
    /// matching the candidate may not carry catches, a `finally` block or
    /// resources the pattern does not account for; under loose matching
    /// they are recorded as unmatched.
    pub(super) fn match_try(&mut self, p: NodeId, c: NodeId) -> bool {
        if !self.same_kind(p, c) {
            return false;
        }
        let (pt, ct) = (self.pt(), self.ct());

        let p_resources = pt.list_in(p, Role::Resources);
        let c_resources = ct.list_in(c, Role::Resources);
        let Some(mut unmatched) = self.match_in_any_order_tracked(&p_resources, &c_resources)
        else {
            return false;
        };

        if !self.match_required_slot(p, c, Role::Body) {
            return false;
        }

        let p_catches: Vec<_> = pt.children_with_role(p, Role::Catch).collect();
        let c_catches: Vec<_> = ct.children_with_role(c, Role::Catch).collect();
        let Some(extra_catches) = self.match_in_any_order_tracked(&p_catches, &c_catches) else {
            return false;
        };
        unmatched.extend(extra_catches);

        match (pt.child(p, Role::Finally), ct.child(c, Role::Finally)) {
            (Some(pf), Some(cf)) => {
                if !self.match_node(pf, cf) {
                    return false;
                }
            }
            (Some(pf), None) => {
                if !self.match_optional(Some(pf), None) {
                    return false;
                }
            }
            (None, Some(cf)) => unmatched.push(cf),
            (None, None) => {}
        }

        if !self.loose() && !unmatched.is_empty() {
            return false;
        }
        self.ctx.record_unmatched(c, unmatched);
        true
    }

    /// Structural comparison first, then the whole section binds to its
    /// variable if it has one.
    pub(super) fn match_catch_section(&mut self, p: NodeId, c: NodeId) -> bool {
        if !self.same_kind(p, c)
            || !self.match_required_slot(p, c, Role::Parameter)
            || !self.match_required_slot(p, c, Role::Body)
        {
            return false;
        }
        match self.pattern().substitution(p) {
            Some(handler) => handler.handle(Some(c), &mut self.ctx),
            None => true,
        }
    }
}

/// Statements a statement position stands for: the contents of a braced
/// block, or the statement itself.
fn block_contents(tree: &SyntaxTree, id: NodeId) -> SmallVec<[NodeId; 4]> {
    if tree.kind(id) == NodeKind::BlockStatement {
        if let Some(block) = tree.child(id, Role::Body) {
            return tree.elements(block);
        }
    }
    smallvec![id]
}
