//! Flat syntax tree arena.
//!
//! A [`SyntaxTree`] owns every node; nodes refer to each other by
//! [`NodeId`]. Children are ordered and tagged with the [`Role`] they play in
//! their parent, which is how the matcher finds "the initializer of this
//! variable" or "the qualifier of this call".

use smallvec::SmallVec;

use crate::{Modifiers, NodeId, NodeKind, Role};

/// One syntax node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub role: Role,
    /// Source text covered by this node.
    pub text: Box<str>,
    /// `NodeId::INVALID` for roots.
    pub parent: NodeId,
    pub children: SmallVec<[NodeId; 4]>,
}

/// Flavor of a class declaration, read from its class keyword.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ClassFlavor {
    Class,
    Interface,
    Enum,
    Annotation,
}

/// Arena of syntax nodes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        SyntaxTree { nodes: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `id` refers to a node of this tree.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.is_valid() && id.index() < self.nodes.len()
    }

    /// Get a node by ID.
    ///
    /// # Panics
    /// Panics if `id` was not allocated by this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    #[inline]
    pub fn role(&self, id: NodeId) -> Role {
        self.node(id).role
    }

    #[inline]
    pub fn text(&self, id: NodeId) -> &str {
        &self.node(id).text
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.node(id).parent;
        parent.is_valid().then_some(parent)
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// First child occupying `role`.
    pub fn child(&self, id: NodeId, role: Role) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| self.role(c) == role)
    }

    /// All children occupying `role`, in order.
    pub fn children_with_role(&self, id: NodeId, role: Role) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&c| self.role(c) == role)
    }

    /// Elements of a list node (`Role::Element` children).
    pub fn elements(&self, id: NodeId) -> SmallVec<[NodeId; 4]> {
        self.children_with_role(id, Role::Element).collect()
    }

    /// Elements of the list found in slot `role` of `id`, empty if the slot is absent.
    pub fn list_in(&self, id: NodeId, role: Role) -> SmallVec<[NodeId; 4]> {
        self.child(id, role)
            .map(|list| self.elements(list))
            .unwrap_or_default()
    }

    /// Children that are not comments.
    pub fn significant_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| !self.kind(c).is_comment())
    }

    /// Keyword modifiers of a `ModifierList` node.
    pub fn modifiers(&self, list: NodeId) -> Modifiers {
        self.children(list)
            .iter()
            .filter(|&&c| self.kind(c) == NodeKind::Keyword)
            .filter_map(|&c| Modifiers::from_keyword(self.text(c)))
            .fold(Modifiers::empty(), |acc, m| acc | m)
    }

    /// Keyword modifiers of a declaration, empty when it has no modifier list.
    pub fn declaration_modifiers(&self, decl: NodeId) -> Modifiers {
        self.child(decl, Role::Modifiers)
            .map_or(Modifiers::empty(), |list| self.modifiers(list))
    }

    /// Annotations of a `ModifierList` node.
    pub fn annotations(&self, list: NodeId) -> Vec<NodeId> {
        self.children(list)
            .iter()
            .copied()
            .filter(|&c| self.kind(c) == NodeKind::Annotation)
            .collect()
    }

    /// Nearest strict ancestor satisfying `pred`.
    pub fn enclosing(&self, id: NodeId, pred: impl Fn(NodeKind) -> bool) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if pred(self.kind(node)) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Nearest enclosing class or anonymous class body.
    pub fn enclosing_class(&self, id: NodeId) -> Option<NodeId> {
        self.enclosing(id, |k| matches!(k, NodeKind::Class | NodeKind::AnonymousClass))
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Number of `[]` pairs in the `Dims` slot of `id`.
    ///
    /// For a type element this is the type-level dimension count; for a
    /// variable it is the C-style brackets following its name.
    pub fn dims(&self, id: NodeId) -> u32 {
        self.child(id, Role::Dims).map_or(0, |dims| {
            let count = self.text(dims).matches("[]").count();
            u32::try_from(count).unwrap_or(u32::MAX)
        })
    }

    /// Flavor of a class declaration; plain class when no keyword is recorded.
    pub fn class_flavor(&self, class: NodeId) -> ClassFlavor {
        match self.child(class, Role::ClassKeyword).map(|k| self.text(k)) {
            Some("interface") => ClassFlavor::Interface,
            Some("enum") => ClassFlavor::Enum,
            Some("@interface") => ClassFlavor::Annotation,
            _ => ClassFlavor::Class,
        }
    }

    /// Members of `kind` declared directly in `class`.
    pub fn members(&self, class: NodeId, kind: NodeKind) -> Vec<NodeId> {
        self.children_with_role(class, Role::Member)
            .filter(|&m| self.kind(m) == kind)
            .collect()
    }

    /// Pre-order traversal starting at `root`.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// Allocate a node and link its children to it.
    pub(crate) fn alloc(
        &mut self,
        kind: NodeKind,
        text: Box<str>,
        children: &[(Role, NodeId)],
    ) -> NodeId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "node count never exceeds u32::MAX in practice"
        )]
        let id = NodeId::new(self.nodes.len() as u32);
        for &(role, child) in children {
            let node = &mut self.nodes[child.index()];
            debug_assert!(!node.parent.is_valid(), "node {child:?} attached twice");
            node.parent = id;
            node.role = role;
        }
        self.nodes.push(Node {
            kind,
            role: Role::Element,
            text,
            parent: NodeId::INVALID,
            children: children.iter().map(|&(_, c)| c).collect(),
        });
        id
    }

    pub(crate) fn set_text(&mut self, id: NodeId, text: &str) {
        self.nodes[id.index()].text = text.into();
    }

    /// Append `child` to `parent` in slot `role`.
    pub(crate) fn attach(&mut self, parent: NodeId, role: Role, child: NodeId) {
        let node = &mut self.nodes[child.index()];
        debug_assert!(!node.parent.is_valid(), "node {child:?} attached twice");
        node.parent = parent;
        node.role = role;
        self.nodes[parent.index()].children.push(child);
    }
}
