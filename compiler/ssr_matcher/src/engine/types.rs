//! Type positions and supertype hierarchy search.

use ssr_ir::{ClassifierId, NodeId, NodeKind, Role, SyntaxTree};

use super::Matcher;
use crate::handler::SubstitutionHandler;
use crate::hierarchy::HierarchyIterator;
use crate::predicate::{Predicate, Target};
use crate::text::{meaningful_text, ArrayDimensionsText};
use crate::MatchContext;

impl<'a> Matcher<'a> {
    /// Compare a type element or reference element.
    ///
    /// Array dimensions count both brackets on the type and C-style brackets
    /// after the declared name. A typed variable binds the innermost
    /// component; its regex sees the dimensions appended when the pattern
    /// does not spell them out.
    pub(super) fn match_type(&mut self, p: NodeId, c: NodeId) -> bool {
        let pt = self.pt();
        let ct = self.ct();
        if !matches!(ct.kind(c), NodeKind::TypeElement | NodeKind::ReferenceElement) {
            return false;
        }
        let p_el = innermost(pt, p);
        let c_el = innermost(ct, c);

        if let Some(p_args) = pt.child(p_el, Role::TypeArguments) {
            let Some(c_args) = ct.child(c_el, Role::TypeArguments) else {
                return false;
            };
            if !self.match_node(p_args, c_args) {
                return false;
            }
        }

        let p_dims = type_dims(pt, p);
        let c_dims = type_dims(ct, c);

        if let Some(handler) = self.type_var(p, p_el) {
            if p_dims != 0 {
                if p_dims != c_dims {
                    return false;
                }
            } else if c_dims != 0 && handler.find_regexp().is_some() {
                let mut guard = self
                    .ctx
                    .install_text_generator(Box::new(ArrayDimensionsText { dims: c_dims }));
                return bind_typed(&mut guard, handler, c_el);
            }
            return bind_typed(&mut self.ctx, handler, c_el);
        }

        if p_dims != c_dims {
            return false;
        }
        let p_text = meaningful_text(pt.text(p_el));
        if self.same_type_name(p_text, meaningful_text(ct.text(c_el))) {
            return true;
        }
        // A qualified pattern type still matches a short candidate spelling
        // that resolves to it.
        ct.kind(c_el) == NodeKind::ReferenceElement
            && self
                .ctx
                .semantics()
                .classifier_of(ct, c_el)
                .and_then(|id| self.ctx.semantics().classifier(id))
                .is_some_and(|info| self.ctx.texts_equal(&info.qualified_name, p_text))
    }

    /// Typed variable of a type position: on the type element, its
    /// component, or the component's name.
    fn type_var(&self, p: NodeId, p_el: NodeId) -> Option<&'a SubstitutionHandler> {
        let pattern = self.pattern();
        pattern
            .substitution(p)
            .or_else(|| pattern.substitution(p_el))
            .or_else(|| {
                let pt = self.pt();
                (pt.kind(p_el) == NodeKind::ReferenceElement)
                    .then(|| pt.child(p_el, Role::Name))
                    .flatten()
                    .and_then(|name| pattern.substitution(name))
            })
    }

    /// Match the pattern's `implements` references against the interfaces a
    /// candidate class reaches through its direct supertypes, in any order.
    ///
    /// Only tried for a candidate with an `extends` list. A typed reference
    /// binds the direct supertype reference the interface is reached through.
    pub(super) fn match_inherited_implements(&mut self, p: NodeId, c: NodeId) -> bool {
        let (pt, ct) = (self.pt(), self.ct());
        let patterns = pt.list_in(p, Role::Implements);
        let extends = ct.list_in(c, Role::Extends);
        if patterns.is_empty() || extends.is_empty() {
            return false;
        }

        let semantics = self.ctx.semantics();
        let mut pool: Vec<(ClassifierId, NodeId)> = Vec::new();
        for via in extends.into_iter().chain(ct.list_in(c, Role::Implements)) {
            let Some(start) = semantics.classifier_of(ct, via) else {
                continue;
            };
            for id in HierarchyIterator::new(semantics, start, false, true, true) {
                if pool.iter().all(|&(seen, _)| seen != id) {
                    pool.push((id, via));
                }
            }
        }

        for &reference in &patterns {
            let Some(index) = pool
                .iter()
                .position(|&(id, via)| self.match_supertype(reference, id, via))
            else {
                tracing::trace!(?reference, "no inherited interface");
                return false;
            };
            pool.remove(index);
        }
        true
    }

    fn match_supertype(&mut self, reference: NodeId, id: ClassifierId, via: NodeId) -> bool {
        let pt = self.pt();
        let p_el = innermost(pt, reference);
        if let Some(handler) = self.type_var(reference, p_el) {
            if !handler.validate(Target::Classifier(id), &self.ctx) {
                return false;
            }
            handler.add_result(Some(via), None, Vec::new(), &mut self.ctx);
            return true;
        }
        let p_text = meaningful_text(pt.text(p_el));
        self.ctx
            .semantics()
            .classifier(id)
            .is_some_and(|info| self.same_type_name(p_text, &info.qualified_name))
    }

    /// `List` matches `java.util.List`, but not `MyList`.
    pub(super) fn same_type_name(&self, pattern: &str, candidate: &str) -> bool {
        let (pattern, candidate) = if self.ctx.options().case_sensitive {
            (pattern.to_owned(), candidate.to_owned())
        } else {
            (pattern.to_lowercase(), candidate.to_lowercase())
        };
        if !candidate.ends_with(&pattern) {
            return false;
        }
        let prefix = candidate.len() - pattern.len();
        prefix == 0 || candidate.as_bytes()[prefix - 1] == b'.'
    }

    pub(super) fn match_type_parameter(&mut self, p: NodeId, c: NodeId) -> bool {
        if !self.same_kind(p, c) {
            return false;
        }
        let (pt, ct) = (self.pt(), self.ct());
        let (Some(pn), Some(cn)) = (pt.child(p, Role::Name), ct.child(c, Role::Name)) else {
            return false;
        };
        let named = match self.pattern().substitution(pn) {
            Some(handler) => handler.handle(Some(cn), &mut self.ctx),
            None => self.match_text(pn, cn),
        };
        named && self.match_slot(p, c, Role::Extends)
    }
}

/// Component type under any number of type element wrappers.
fn innermost(tree: &SyntaxTree, mut id: NodeId) -> NodeId {
    while tree.kind(id) == NodeKind::TypeElement {
        match tree.child(id, Role::Element) {
            Some(inner) => id = inner,
            None => break,
        }
    }
    id
}

/// Array dimensions of a type position, including C-style brackets on the
/// variable it declares.
fn type_dims(tree: &SyntaxTree, id: NodeId) -> u32 {
    let own = tree.dims(id);
    let declared = tree
        .parent(id)
        .filter(|&parent| tree.kind(parent).is_variable() && tree.role(id) == Role::Type)
        .map_or(0, |parent| tree.dims(parent));
    own + declared
}

/// Bind `c` to `handler`, through the supertype hierarchy when the variable
/// asks for it.
pub(super) fn bind_typed(
    ctx: &mut MatchContext<'_>,
    handler: &SubstitutionHandler,
    c: NodeId,
) -> bool {
    if !(handler.is_subtype() || handler.is_strict_subtype()) {
        return handler.handle(Some(c), ctx);
    }
    if !hierarchy_accepts(ctx, c, handler) {
        return false;
    }
    handler.add_result(Some(c), None, Vec::new(), ctx);
    true
}

/// Whether the hierarchy of `c`'s classifier satisfies `handler`.
///
/// A positive predicate needs one accepting classifier. A negated predicate
/// needs every classifier to pass, so `!Foo` within the hierarchy means "no
/// supertype is `Foo`". An unresolved or empty hierarchy never matches.
pub(super) fn hierarchy_accepts(
    ctx: &MatchContext<'_>,
    c: NodeId,
    handler: &SubstitutionHandler,
) -> bool {
    let Some(start) = classifier_of(ctx, c) else {
        tracing::trace!(?c, "no classifier for hierarchy search");
        return false;
    };
    let (include_classes, include_interfaces) = hierarchy_filter(ctx.tree(), c);
    let mut classifiers = HierarchyIterator::new(
        ctx.semantics(),
        start,
        include_classes,
        include_interfaces,
        !handler.is_strict_subtype(),
    );

    if handler.predicate().is_some_and(Predicate::is_negation) {
        let mut seen = false;
        let all = classifiers.all(|id| {
            seen = true;
            handler.validate(Target::Classifier(id), ctx)
        });
        all && seen
    } else {
        classifiers.any(|id| handler.validate(Target::Classifier(id), ctx))
    }
}

fn classifier_of(ctx: &MatchContext<'_>, c: NodeId) -> Option<ClassifierId> {
    let semantics = ctx.semantics();
    semantics
        .classifier_of(ctx.tree(), c)
        .or_else(|| semantics.expr_type(ctx.tree(), c).and_then(|ty| ty.classifier))
}

/// Which classifier flavors a reference in an `extends` or `implements`
/// list may stand for: (classes, interfaces).
fn hierarchy_filter(tree: &SyntaxTree, c: NodeId) -> (bool, bool) {
    let Some(list) = tree.parent(c).filter(|&l| tree.kind(l) == NodeKind::ReferenceList) else {
        return (true, true);
    };
    let owner_is_interface = tree
        .parent(list)
        .filter(|&owner| tree.kind(owner) == NodeKind::Class)
        .is_some_and(|owner| tree.class_flavor(owner) == ssr_ir::ClassFlavor::Interface);
    match tree.role(list) {
        Role::Extends if tree.parent(list).is_some_and(|o| tree.kind(o) == NodeKind::Class) => {
            (true, owner_is_interface)
        }
        Role::Implements => (false, true),
        _ => (true, true),
    }
}
