//! Declarations: classes, members, variables, modifiers and annotations.

use ssr_ir::{ClassFlavor, Modifiers, NodeId, NodeKind, Role, SyntaxTree};

use super::Matcher;
use crate::context::ElementsListener;
use crate::handler::SubstitutionHandler;

/// Member kinds compared one group at a time.
const MEMBER_KINDS: [NodeKind; 4] = [
    NodeKind::Field,
    NodeKind::Method,
    NodeKind::Class,
    NodeKind::ClassInitializer,
];

impl<'a> Matcher<'a> {
    /// Variable on the name of declaration `p`.
    fn name_var(&self, p: NodeId) -> Option<&'a SubstitutionHandler> {
        self.pt()
            .child(p, Role::Name)
            .and_then(|name| self.pattern().substitution(name))
    }

    /// Whether a member found in the candidate class being compared may be
    /// bound to `handler`. Inherited members need a hierarchy-aware variable.
    fn check_hierarchy(&self, member: NodeId, handler: &SubstitutionHandler) -> bool {
        if handler.is_subtype() {
            return true;
        }
        let containing = self.ct().enclosing_class(member);
        if handler.is_strict_subtype() {
            containing != self.current_class
        } else {
            self.current_class.is_none() || containing == self.current_class
        }
    }

    pub(super) fn match_class(&mut self, p: NodeId, c: NodeId) -> bool {
        if !self.same_kind(p, c) {
            return false;
        }
        if !flavors_match(self.pt().class_flavor(p), self.ct().class_flavor(c)) {
            return false;
        }
        let name_handler = self.name_var(p);

        self.ctx.push_result();
        let matched = self.match_declared_name(p, c, name_handler.is_some())
            && self.match_modifiers_slot(p, c)
            && self.match_slot(p, c, Role::TypeParameters)
            && self.match_slot(p, c, Role::Extends)
            && self.match_implements(p, c)
            && self.match_class_body(p, c);
        self.save_or_drop_result(matched, name_handler, c)
    }

    /// Implements list; interfaces the candidate inherits through its
    /// supertypes count as implemented.
    fn match_implements(&mut self, p: NodeId, c: NodeId) -> bool {
        self.match_slot(p, c, Role::Implements) || self.match_inherited_implements(p, c)
    }

    pub(super) fn match_anonymous_class(&mut self, p: NodeId, c: NodeId) -> bool {
        self.same_kind(p, c) && self.match_class_body(p, c)
    }

    /// Compare members group by group in any order, then account for the
    /// candidate members nothing consumed.
    fn match_class_body(&mut self, p: NodeId, c: NodeId) -> bool {
        let previous_class = self.current_class.replace(c);
        let previous_listener = self.ctx.set_listener(Some(ElementsListener::default()));

        let matched = self.match_members(p, c);

        let listener = self.ctx.set_listener(previous_listener).unwrap_or_default();
        self.current_class = previous_class;
        if !matched {
            return false;
        }

        let unmatched: Vec<NodeId> = self
            .ct()
            .children_with_role(c, Role::Member)
            .filter(|member| !listener.matched().contains(member))
            .collect();
        let content = self
            .pattern()
            .class_content()
            .and_then(|node| self.pattern().substitution(node));
        match content {
            Some(handler) if unmatched.is_empty() => handler.handle(None, &mut self.ctx),
            Some(handler) => {
                unmatched.len() >= handler.min_occurs() as usize
                    && unmatched
                        .into_iter()
                        .all(|member| handler.handle(Some(member), &mut self.ctx))
            }
            None => {
                self.ctx.record_unmatched(c, unmatched);
                true
            }
        }
    }

    /// Only member kinds the pattern declares are compared.
    fn match_members(&mut self, p: NodeId, c: NodeId) -> bool {
        let pattern = self.pattern();
        let semantics = self.ctx.semantics();
        let (pt, ct) = (self.pt(), self.ct());
        MEMBER_KINDS.iter().all(|&kind| {
            let patterns = pt.members(p, kind);
            if patterns.is_empty() {
                return true;
            }
            let with_inherited = match kind {
                NodeKind::Field => pattern.requests_super_fields(),
                NodeKind::Method => pattern.requests_super_methods(),
                NodeKind::Class => pattern.requests_super_inners(),
                _ => false,
            };
            let candidates = if with_inherited {
                semantics.all_members(ct, c, kind)
            } else {
                ct.members(c, kind)
            };
            self.match_in_any_order(&patterns, &candidates)
        })
    }

    pub(super) fn match_method(&mut self, p: NodeId, c: NodeId) -> bool {
        if !self.same_kind(p, c) {
            return false;
        }
        let (pt, ct) = (self.pt(), self.ct());
        // Constructors have no return type.
        if pt.child(p, Role::Type).is_some() != ct.child(c, Role::Type).is_some() {
            return false;
        }
        let name_handler = self.name_var(p);
        if name_handler.is_some_and(|h| !self.check_hierarchy(c, h)) {
            return false;
        }

        self.ctx.push_result();
        let matched = self.match_declared_name(p, c, name_handler.is_some())
            && self.match_modifiers_slot(p, c)
            && self.match_slot(p, c, Role::TypeParameters)
            && self.match_list_in(p, c, Role::Parameters)
            && self.match_slot(p, c, Role::Type)
            && self.match_throws(p, c)
            && self.match_method_body(p, c);
        self.save_or_drop_result(matched, name_handler, c)
    }

    fn match_throws(&mut self, p: NodeId, c: NodeId) -> bool {
        let ps = self.pt().list_in(p, Role::Throws);
        let cs = self.ct().list_in(c, Role::Throws);
        self.match_in_any_order(&ps, &cs)
    }

    /// A pattern body requires a candidate body; no pattern body accepts any.
    fn match_method_body(&mut self, p: NodeId, c: NodeId) -> bool {
        match (self.pt().child(p, Role::Body), self.ct().child(c, Role::Body)) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(pb), Some(cb)) => self.match_node(pb, cb),
        }
    }

    /// Fields, locals and parameters.
    pub(super) fn match_variable(&mut self, p: NodeId, c: NodeId) -> bool {
        if !self.ct().kind(c).is_variable() {
            return false;
        }
        let name_handler = self.name_var(p);
        if self.ct().kind(c) == NodeKind::Field
            && name_handler.is_some_and(|h| !self.check_hierarchy(c, h))
        {
            return false;
        }

        self.ctx.push_result();
        let matched = self.match_declared_name(p, c, name_handler.is_some())
            && self.match_modifiers_slot(p, c)
            && self.match_required_slot(p, c, Role::Type)
            && self.match_slot(p, c, Role::Initializer);
        self.save_or_drop_result(matched, name_handler, c)
    }

    pub(super) fn match_class_initializer(&mut self, p: NodeId, c: NodeId) -> bool {
        if !self.same_kind(p, c) {
            return false;
        }
        let is_static = |tree: &SyntaxTree, id| tree.declaration_modifiers(id).contains(Modifiers::STATIC);
        is_static(self.pt(), p) == is_static(self.ct(), c)
            && self.match_required_slot(p, c, Role::Body)
    }

    /// A pattern without modifiers accepts any; an empty candidate list is
    /// the same as none.
    fn match_modifiers_slot(&mut self, p: NodeId, c: NodeId) -> bool {
        let pt = self.pt();
        match (pt.child(p, Role::Modifiers), self.ct().child(c, Role::Modifiers)) {
            (None, _) => true,
            (Some(pm), Some(cm)) => self.match_node(pm, cm),
            (Some(pm), None) => pt.modifiers(pm).is_empty() && pt.annotations(pm).is_empty(),
        }
    }

    /// Pattern modifiers must be a subset of the candidate's.
    ///
    /// `@Modifier("...")` annotations in the pattern constrain the candidate
    /// instead of matching an annotation: any one listed value must hold.
    /// Other annotations match candidate annotations in any order.
    pub(super) fn match_modifier_list(&mut self, p: NodeId, c: NodeId) -> bool {
        if !self.same_kind(p, c) {
            return false;
        }
        let (pt, ct) = (self.pt(), self.ct());
        if !ct.modifiers(c).contains(pt.modifiers(p)) {
            return false;
        }

        let mut annotations = Vec::new();
        for annotation in pt.annotations(p) {
            if self.is_modifier_annotation(annotation) {
                let values = self.modifier_values(annotation);
                if !values.iter().any(|v| self.modifier_holds(v, c)) {
                    return false;
                }
            } else {
                annotations.push(annotation);
            }
        }
        if annotations.is_empty() {
            return true;
        }
        let candidates = ct.annotations(c);
        self.match_in_any_order(&annotations, &candidates)
    }

    fn is_modifier_annotation(&self, annotation: NodeId) -> bool {
        let pt = self.pt();
        pt.child(annotation, Role::Name)
            .is_some_and(|name| matches!(pt.text(name), "Modifier" | "org.jetbrains.annotations.Modifier"))
    }

    /// Unquoted string values of a `@Modifier` annotation, single or array.
    fn modifier_values(&self, annotation: NodeId) -> Vec<String> {
        let pt = self.pt();
        let unquote = |id: NodeId| pt.text(id).trim_matches('"').to_owned();
        pt.list_in(annotation, Role::Arguments)
            .into_iter()
            .filter_map(|pair| pt.child(pair, Role::Value))
            .flat_map(|value| {
                if pt.kind(value) == NodeKind::AnnotationArrayInitializer {
                    pt.elements(value).into_iter().map(unquote).collect::<Vec<_>>()
                } else {
                    vec![unquote(value)]
                }
            })
            .collect()
    }

    /// Whether modifier constraint `value` holds for the candidate modifier
    /// list `c`.
    fn modifier_holds(&self, value: &str, c: NodeId) -> bool {
        let ct = self.ct();
        let flags = ct.modifiers(c);
        let on_member = ct.parent(c).is_some_and(|owner| ct.kind(owner).is_member());
        match value {
            "Instance" => {
                on_member && !flags.intersects(Modifiers::STATIC | Modifiers::ABSTRACT)
            }
            "packageLocal" => on_member && !flags.intersects(Modifiers::ACCESS),
            keyword => Modifiers::from_keyword(keyword).is_some_and(|m| flags.contains(m)),
        }
    }

    pub(super) fn match_annotation(&mut self, p: NodeId, c: NodeId) -> bool {
        if !self.same_kind(p, c) || !self.match_required_slot(p, c, Role::Name) {
            return false;
        }
        let ps = self.pt().list_in(p, Role::Arguments);
        let cs = self.ct().list_in(c, Role::Arguments);
        self.match_in_any_order(&ps, &cs)
    }

    /// Annotation attribute; a missing name is the implicit `value`.
    pub(super) fn match_name_value_pair(&mut self, p: NodeId, c: NodeId) -> bool {
        if !self.same_kind(p, c) {
            return false;
        }
        let (pt, ct) = (self.pt(), self.ct());
        let named = match pt.child(p, Role::Name).and_then(|n| self.pattern().substitution(n)) {
            Some(handler) => match ct.child(c, Role::Name) {
                Some(cn) => handler.handle(Some(cn), &mut self.ctx),
                None => handler.allows_absence() && handler.handle(None, &mut self.ctx),
            },
            None => self.ctx.texts_equal(attribute_name(pt, p), attribute_name(ct, c)),
        };
        named && self.match_required_slot(p, c, Role::Value)
    }
}

/// Interfaces (annotation types included) only match interfaces; enum and
/// annotation type patterns need the same flavor.
fn flavors_match(pattern: ClassFlavor, candidate: ClassFlavor) -> bool {
    let is_interface = |flavor| matches!(flavor, ClassFlavor::Interface | ClassFlavor::Annotation);
    is_interface(pattern) == is_interface(candidate)
        && match pattern {
            ClassFlavor::Enum | ClassFlavor::Annotation => candidate == pattern,
            ClassFlavor::Class | ClassFlavor::Interface => true,
        }
}

fn attribute_name(tree: &SyntaxTree, pair: NodeId) -> &str {
    tree.child(pair, Role::Name).map_or("value", |name| tree.text(name))
}
