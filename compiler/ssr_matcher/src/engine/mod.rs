//! Kind-dispatching structural comparator.
//!
//! [`Matcher::match_node`] compares one pattern node with one candidate
//! node. It first consults the handler table: a typed variable binds the
//! candidate outright, a matching handler swaps in its own strategy.
//! Otherwise the pattern node's kind selects a comparison rule. Rules
//! compare required sub-slots in order and stop at the first failure.
//!
//! Every call is transactional: captures recorded by a failed comparison are
//! rolled back before `match_node` returns.
//!
//! # Rules
//!
//! - `declarations`: classes, methods, variables, modifiers, annotations
//! - `types`: type elements, generics, array dimensions, hierarchy search
//! - `expressions`: references, calls, implicit qualifiers, literals
//! - `statements`: blocks, control flow, `try`
//! - `comments`: comments and doc tags
//! - `lists`: sequential and any-order list matching

mod comments;
mod declarations;
mod expressions;
mod lists;
mod statements;
mod types;

use ssr_ir::{NodeId, NodeKind, Role, SyntaxTree};

use crate::handler::{Handler, MatchingHandler, SubstitutionHandler};
use crate::stack::ensure_sufficient_stack;
use crate::{CompiledPattern, MatchContext};

/// Recursive comparator over one [`MatchContext`].
pub struct Matcher<'a> {
    ctx: MatchContext<'a>,
    /// Candidate class whose content is being compared.
    current_class: Option<NodeId>,
}

impl<'a> Matcher<'a> {
    pub fn new(ctx: MatchContext<'a>) -> Self {
        Matcher {
            ctx,
            current_class: None,
        }
    }

    #[inline]
    pub fn context(&self) -> &MatchContext<'a> {
        &self.ctx
    }

    #[inline]
    pub fn context_mut(&mut self) -> &mut MatchContext<'a> {
        &mut self.ctx
    }

    pub fn into_context(self) -> MatchContext<'a> {
        self.ctx
    }

    /// Pattern tree.
    #[inline]
    fn pt(&self) -> &'a SyntaxTree {
        self.ctx.pattern_tree()
    }

    /// Candidate tree.
    #[inline]
    fn ct(&self) -> &'a SyntaxTree {
        self.ctx.tree()
    }

    #[inline]
    fn pattern(&self) -> &'a CompiledPattern {
        self.ctx.pattern()
    }

    #[inline]
    fn loose(&self) -> bool {
        self.ctx.options().loose_matching
    }

    /// Compare pattern node `p` with candidate node `c`.
    pub fn match_node(&mut self, p: NodeId, c: NodeId) -> bool {
        ensure_sufficient_stack(|| {
            let checkpoint = self.ctx.checkpoint();
            let matched = self.dispatch(p, c);
            if !matched {
                self.ctx.rollback(checkpoint);
            }
            matched
        })
    }

    /// Compare two optional slots.
    ///
    /// A slot the pattern omits matches anything under loose matching and
    /// only another omitted slot otherwise. A slot the candidate omits
    /// matches a pattern variable that allows absence, which is then bound
    /// as absent.
    pub fn match_optional(&mut self, p: Option<NodeId>, c: Option<NodeId>) -> bool {
        match (p, c) {
            (None, None) => true,
            (None, Some(_)) => self.loose(),
            (Some(p), None) => self.bind_absent(p),
            (Some(p), Some(c)) => self.match_node(p, c),
        }
    }

    /// Compare the children of two nodes of the same kind in order.
    pub fn match_sons(&mut self, p: NodeId, c: NodeId) -> bool {
        if !self.same_kind(p, c) {
            return false;
        }
        let ps: Vec<_> = self.pt().children(p).to_vec();
        let cs: Vec<_> = self.ct().children(c).to_vec();
        self.match_sequentially(&ps, &cs)
    }

    /// Variable governing pattern node `p`.
    ///
    /// Declarations carry their variable on the name, unqualified references
    /// and type elements on the innermost name. A statement consisting of a
    /// typed reference stands for a whole statement.
    fn typed_var(&self, p: NodeId) -> Option<&'a SubstitutionHandler> {
        let pattern = self.pattern();
        if let Some(handler) = pattern.substitution(p) {
            return Some(handler);
        }
        let pt = self.pt();
        let name = match pt.kind(p) {
            NodeKind::ReferenceExpression | NodeKind::ReferenceElement => {
                if pt.child(p, Role::Qualifier).is_some() {
                    return None;
                }
                pt.child(p, Role::Name)
            }
            NodeKind::TypeElement => {
                return pt.child(p, Role::Element).and_then(|el| self.typed_var(el));
            }
            NodeKind::ExpressionStatement => {
                return pt
                    .child(p, Role::Expression)
                    .filter(|&e| pt.kind(e) == NodeKind::ReferenceExpression)
                    .and_then(|e| self.typed_var(e));
            }
            kind if kind.is_variable() => pt.child(p, Role::Name),
            NodeKind::Method | NodeKind::Class | NodeKind::TypeParameter => {
                pt.child(p, Role::Name)
            }
            _ => None,
        };
        name.and_then(|n| pattern.substitution(n))
    }

    fn bind_absent(&mut self, p: NodeId) -> bool {
        match self.typed_var(p) {
            Some(handler) if handler.allows_absence() => handler.handle(None, &mut self.ctx),
            _ => false,
        }
    }

    #[inline]
    fn same_kind(&self, p: NodeId, c: NodeId) -> bool {
        self.pt().kind(p) == self.ct().kind(c)
    }

    /// Compare two leaf texts.
    fn match_text(&self, p: NodeId, c: NodeId) -> bool {
        self.ctx.texts_equal(self.pt().text(p), self.ct().text(c))
    }

    /// Bind `c` to a typed variable, searching the hierarchy when asked to.
    fn handle_typed(&mut self, handler: &'a SubstitutionHandler, c: NodeId) -> bool {
        types::bind_typed(&mut self.ctx, handler, c)
    }

    fn dispatch(&mut self, p: NodeId, c: NodeId) -> bool {
        let pk = self.pt().kind(p);
        let ck = self.ct().kind(c);

        match self.pattern().handler(p) {
            Some(Handler::Substitution(handler)) if binds_whole_node(pk) => {
                return self.handle_typed(handler, c);
            }
            Some(Handler::Matching(handler)) => match handler {
                MatchingHandler::Structural => {}
                MatchingHandler::Skipping => {
                    if pk != ck {
                        return self.match_skipping(p, c);
                    }
                }
                MatchingHandler::DeclarationStatement => {
                    if ck != NodeKind::DeclarationStatement {
                        return self.match_declaration_statement_to_single(p, c);
                    }
                }
                MatchingHandler::CommentText(text) => return self.match_comment_text(text, c),
                MatchingHandler::LiteralWithSubstitution(text) => {
                    return self.match_literal_text(text, c);
                }
            },
            None if pk == NodeKind::ExpressionStatement => {
                if let Some(handler) = self.typed_var(p) {
                    return self.handle_typed(handler, c);
                }
            }
            _ => {}
        }

        tracing::trace!(?pk, ?ck, "compare");
        match pk {
            NodeKind::Class => self.match_class(p, c),
            NodeKind::AnonymousClass => self.match_anonymous_class(p, c),
            NodeKind::Method => self.match_method(p, c),
            NodeKind::Field | NodeKind::LocalVariable | NodeKind::Parameter => {
                self.match_variable(p, c)
            }
            NodeKind::ClassInitializer => self.match_class_initializer(p, c),
            NodeKind::ModifierList => self.match_modifier_list(p, c),
            NodeKind::Annotation => self.match_annotation(p, c),
            NodeKind::NameValuePair => self.match_name_value_pair(p, c),
            NodeKind::TypeParameter => self.match_type_parameter(p, c),
            NodeKind::ParameterList
            | NodeKind::TypeParameterList
            | NodeKind::TypeArgumentList
            | NodeKind::ArgumentList
            | NodeKind::ExpressionList
            | NodeKind::ArrayInitializer
            | NodeKind::AnnotationArrayInitializer
            | NodeKind::CodeBlock => self.match_list_node(p, c),
            NodeKind::ReferenceList | NodeKind::ResourceList | NodeKind::DeclarationStatement => {
                self.match_set_node(p, c)
            }

            NodeKind::TypeElement | NodeKind::ReferenceElement => self.match_type(p, c),

            NodeKind::Identifier | NodeKind::Keyword | NodeKind::Token => {
                self.same_kind(p, c) && self.match_text(p, c)
            }
            NodeKind::Literal => self.match_literal(p, c),
            NodeKind::LineComment | NodeKind::BlockComment | NodeKind::DocComment => {
                self.match_comment(p, c)
            }
            NodeKind::DocTag => self.match_doc_tag(p, c),

            NodeKind::BlockStatement => self.match_block_statement(p, c),
            NodeKind::ExpressionStatement => self.match_expression_statement(p, c),
            NodeKind::If => self.match_if(p, c),
            NodeKind::While | NodeKind::DoWhile => self.match_loop(p, c),
            NodeKind::For => self.match_for(p, c),
            NodeKind::Foreach => self.match_foreach(p, c),
            NodeKind::Return | NodeKind::Throw => self.match_exit(p, c),
            NodeKind::Break | NodeKind::Continue => {
                self.same_kind(p, c) && self.match_slot(p, c, Role::Label)
            }
            NodeKind::Assert | NodeKind::Synchronized | NodeKind::Switch | NodeKind::SwitchLabel => {
                self.match_sons(p, c)
            }
            NodeKind::Try => self.match_try(p, c),
            NodeKind::CatchSection => self.match_catch_section(p, c),
            NodeKind::EmptyStatement => self.same_kind(p, c),

            NodeKind::ReferenceExpression => self.match_reference(p, c),
            NodeKind::MethodCall => self.match_method_call(p, c),
            NodeKind::New => self.match_new(p, c),
            NodeKind::ArrayAccess => self.match_array_access(p, c),
            NodeKind::Binary => self.match_binary(p, c),
            NodeKind::Assignment => self.match_assignment(p, c),
            NodeKind::Prefix | NodeKind::Postfix => self.match_unary(p, c),
            NodeKind::Conditional => self.match_conditional(p, c),
            NodeKind::Parenthesized => self.match_parenthesized(p, c),
            NodeKind::TypeCast => self.match_type_cast(p, c),
            NodeKind::InstanceOf => self.match_instance_of(p, c),
            NodeKind::This | NodeKind::Super => self.match_this_or_super(p, c),
            NodeKind::ClassObjectAccess => self.match_class_object_access(p, c),
            NodeKind::Lambda => self.match_lambda(p, c),
        }
    }

    /// Homogeneous ordered list.
    fn match_list_node(&mut self, p: NodeId, c: NodeId) -> bool {
        if !self.same_kind(p, c) {
            return false;
        }
        let ps = self.pt().elements(p);
        let cs = self.ct().elements(c);
        self.match_sequentially(&ps, &cs)
    }

    /// Homogeneous unordered list.
    fn match_set_node(&mut self, p: NodeId, c: NodeId) -> bool {
        if !self.same_kind(p, c) {
            return false;
        }
        let ps = self.pt().elements(p);
        let cs = self.ct().elements(c);
        self.match_in_any_order(&ps, &cs)
    }

    /// Compare the lists in slot `role` of `p` and `c` in order.
    fn match_list_in(&mut self, p: NodeId, c: NodeId, role: Role) -> bool {
        let ps = self.pt().list_in(p, role);
        let cs = self.ct().list_in(c, role);
        self.match_sequentially(&ps, &cs)
    }

    /// Compare slot `role` of `p` and `c` as optional slots.
    fn match_slot(&mut self, p: NodeId, c: NodeId, role: Role) -> bool {
        let ps = self.pt().child(p, role);
        let cs = self.ct().child(c, role);
        self.match_optional(ps, cs)
    }

    /// Compare slot `role`, which both sides must have when the pattern has it.
    fn match_required_slot(&mut self, p: NodeId, c: NodeId, role: Role) -> bool {
        match (self.pt().child(p, role), self.ct().child(c, role)) {
            (Some(ps), Some(cs)) => self.match_node(ps, cs),
            (None, None) => true,
            _ => false,
        }
    }

    /// Close a scope opened for a composite declaration match.
    ///
    /// On success with a typed name, the scope's captures nest under the
    /// name's binding; on plain success they merge into the parent scope.
    fn save_or_drop_result(
        &mut self,
        matched: bool,
        name_handler: Option<&'a SubstitutionHandler>,
        decl: NodeId,
    ) -> bool {
        let nested = self.ctx.pop_result();
        if !matched {
            return false;
        }
        let Some(handler) = name_handler else {
            self.ctx.append_captures(nested);
            return true;
        };
        let Some(name) = self.ct().child(decl, Role::Name) else {
            return false;
        };
        let hierarchical = handler.is_subtype() || handler.is_strict_subtype();
        if hierarchical && self.ct().kind(decl) == NodeKind::Class {
            if !types::hierarchy_accepts(&self.ctx, decl, handler) {
                return false;
            }
            handler.add_result(Some(name), None, nested, &mut self.ctx);
            true
        } else {
            handler.handle_nested(name, nested, &mut self.ctx)
        }
    }

    /// Compare declaration names, leaving typed names to
    /// [`save_or_drop_result`](Self::save_or_drop_result).
    fn match_declared_name(&self, p: NodeId, c: NodeId, typed: bool) -> bool {
        match (self.pt().child(p, Role::Name), self.ct().child(c, Role::Name)) {
            (Some(_), Some(_)) if typed => true,
            (Some(pn), Some(cn)) => self.match_text(pn, cn),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Pattern kinds whose typed variable binds the whole candidate node.
///
/// Declarations carry their variable on the name, types go through type
/// comparison, literals and comments capture partial text, and catch
/// sections are compared structurally before binding.
fn binds_whole_node(kind: NodeKind) -> bool {
    !matches!(
        kind,
        NodeKind::Class
            | NodeKind::Method
            | NodeKind::Field
            | NodeKind::LocalVariable
            | NodeKind::Parameter
            | NodeKind::TypeParameter
            | NodeKind::TypeElement
            | NodeKind::ReferenceElement
            | NodeKind::Literal
            | NodeKind::LineComment
            | NodeKind::BlockComment
            | NodeKind::DocComment
            | NodeKind::CatchSection
    )
}
