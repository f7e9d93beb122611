//! Semantic oracle consumed by the matcher.
//!
//! Type computation, symbol resolution, and usage classification belong to
//! the language frontend. The matcher only asks questions through
//! [`Semantics`]; [`SemanticModel`] answers them from explicit tables.

use rustc_hash::FxHashMap;

use crate::{NodeId, NodeKind, SyntaxTree};

/// Identifies a classifier (class or interface) known to the oracle.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ClassifierId(u32);

impl ClassifierId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ClassifierId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A classifier's names and direct supertypes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClassifierInfo {
    /// Simple name, `String`.
    pub name: String,
    /// Fully-qualified name, `java.lang.String`.
    pub qualified_name: String,
    pub is_interface: bool,
    /// Direct supertypes in declaration order (superclass first).
    pub supertypes: Vec<ClassifierId>,
}

/// Static type of an expression or declaration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeInfo {
    /// Presentable type text without array brackets, `List<String>`.
    pub text: String,
    /// Classifier of the component type, if it is a class type.
    pub classifier: Option<ClassifierId>,
    pub dims: u32,
}

impl TypeInfo {
    pub fn new(text: impl Into<String>) -> Self {
        TypeInfo {
            text: text.into(),
            classifier: None,
            dims: 0,
        }
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: ClassifierId) -> Self {
        self.classifier = Some(classifier);
        self
    }

    #[must_use]
    pub fn with_dims(mut self, dims: u32) -> Self {
        self.dims = dims;
        self
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SymbolKind {
    Field,
    Method,
    LocalVariable,
    Parameter,
    Class,
}

/// Declaration a reference resolves to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub is_static: bool,
    /// Classifier declaring the member; `None` for locals.
    pub declaring: Option<ClassifierId>,
    /// Classifier the symbol denotes when it is a class.
    pub classifier: Option<ClassifierId>,
}

/// How a reference is used at its position.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub enum Access {
    #[default]
    None,
    Read,
    Write,
    ReadWrite,
}

impl Access {
    #[inline]
    pub const fn is_read(self) -> bool {
        matches!(self, Access::Read | Access::ReadWrite)
    }

    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Access::Write | Access::ReadWrite)
    }
}

/// Questions the matcher asks about candidate code.
///
/// Every query may answer `None`; the matcher then falls back to textual
/// comparison or treats the constraint as unsatisfied.
pub trait Semantics: Sync {
    /// Static type of an expression node.
    fn expr_type(&self, tree: &SyntaxTree, node: NodeId) -> Option<TypeInfo>;

    /// Declared type of the formal parameter an argument expression is passed to.
    fn formal_parameter_type(&self, tree: &SyntaxTree, node: NodeId) -> Option<TypeInfo>;

    /// Classifier a class declaration or type reference denotes.
    fn classifier_of(&self, tree: &SyntaxTree, node: NodeId) -> Option<ClassifierId>;

    fn classifier(&self, id: ClassifierId) -> Option<&ClassifierInfo>;

    fn resolve(&self, tree: &SyntaxTree, node: NodeId) -> Option<Symbol>;

    fn access(&self, tree: &SyntaxTree, node: NodeId) -> Access;

    /// Direct supertypes of a classifier.
    fn supertypes(&self, id: ClassifierId) -> &[ClassifierId] {
        self.classifier(id).map_or(&[], |info| info.supertypes.as_slice())
    }

    /// Members of `kind` visible in `class`, inherited ones included.
    ///
    /// The default only knows about members declared in the tree.
    fn all_members(&self, tree: &SyntaxTree, class: NodeId, kind: NodeKind) -> Vec<NodeId> {
        tree.members(class, kind)
    }

    /// Classifier declaring the code at `node`.
    fn enclosing_classifier(&self, tree: &SyntaxTree, node: NodeId) -> Option<ClassifierId> {
        tree.enclosing_class(node)
            .and_then(|class| self.classifier_of(tree, class))
    }
}

/// Oracle that knows nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoSemantics;

impl Semantics for NoSemantics {
    fn expr_type(&self, _: &SyntaxTree, _: NodeId) -> Option<TypeInfo> {
        None
    }

    fn formal_parameter_type(&self, _: &SyntaxTree, _: NodeId) -> Option<TypeInfo> {
        None
    }

    fn classifier_of(&self, _: &SyntaxTree, _: NodeId) -> Option<ClassifierId> {
        None
    }

    fn classifier(&self, _: ClassifierId) -> Option<&ClassifierInfo> {
        None
    }

    fn resolve(&self, _: &SyntaxTree, _: NodeId) -> Option<Symbol> {
        None
    }

    fn access(&self, _: &SyntaxTree, _: NodeId) -> Access {
        Access::None
    }
}

/// Table-driven [`Semantics`].
///
/// Facts are attached to node IDs of one candidate tree.
#[derive(Clone, Debug, Default)]
pub struct SemanticModel {
    classifiers: Vec<ClassifierInfo>,
    by_name: FxHashMap<String, ClassifierId>,
    types: FxHashMap<NodeId, TypeInfo>,
    formal_types: FxHashMap<NodeId, TypeInfo>,
    denotes: FxHashMap<NodeId, ClassifierId>,
    symbols: FxHashMap<NodeId, Symbol>,
    accesses: FxHashMap<NodeId, Access>,
    inherited: FxHashMap<(NodeId, NodeKind), Vec<NodeId>>,
}

impl SemanticModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a classifier; `qualified_name` decides the simple name.
    pub fn add_classifier(
        &mut self,
        qualified_name: &str,
        is_interface: bool,
        supertypes: &[ClassifierId],
    ) -> ClassifierId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "classifier count never exceeds u32::MAX in practice"
        )]
        let id = ClassifierId::new(self.classifiers.len() as u32);
        let name = qualified_name
            .rsplit_once('.')
            .map_or(qualified_name, |(_, simple)| simple);
        self.classifiers.push(ClassifierInfo {
            name: name.to_owned(),
            qualified_name: qualified_name.to_owned(),
            is_interface,
            supertypes: supertypes.to_vec(),
        });
        self.by_name.insert(qualified_name.to_owned(), id);
        id
    }

    /// Look up a classifier by qualified name.
    pub fn classifier_named(&self, qualified_name: &str) -> Option<ClassifierId> {
        self.by_name.get(qualified_name).copied()
    }

    /// Record the static type of an expression.
    pub fn set_type(&mut self, node: NodeId, ty: TypeInfo) {
        self.types.insert(node, ty);
    }

    /// Record the type of an expression whose type is a registered classifier.
    pub fn set_classifier_type(&mut self, node: NodeId, classifier: ClassifierId) {
        let text = self.classifiers[classifier.index()].name.clone();
        self.types
            .insert(node, TypeInfo::new(text).with_classifier(classifier));
    }

    pub fn set_formal_type(&mut self, argument: NodeId, ty: TypeInfo) {
        self.formal_types.insert(argument, ty);
    }

    /// Record that a class declaration or type reference denotes `classifier`.
    pub fn set_denotes(&mut self, node: NodeId, classifier: ClassifierId) {
        self.denotes.insert(node, classifier);
    }

    pub fn set_symbol(&mut self, reference: NodeId, symbol: Symbol) {
        self.symbols.insert(reference, symbol);
    }

    pub fn set_access(&mut self, reference: NodeId, access: Access) {
        self.accesses.insert(reference, access);
    }

    /// Record members of `kind` visible in `class` beyond its own declarations.
    pub fn set_inherited_members(&mut self, class: NodeId, kind: NodeKind, members: Vec<NodeId>) {
        self.inherited.insert((class, kind), members);
    }
}

impl Semantics for SemanticModel {
    fn expr_type(&self, _: &SyntaxTree, node: NodeId) -> Option<TypeInfo> {
        self.types.get(&node).cloned()
    }

    fn formal_parameter_type(&self, _: &SyntaxTree, node: NodeId) -> Option<TypeInfo> {
        self.formal_types.get(&node).cloned()
    }

    fn classifier_of(&self, tree: &SyntaxTree, node: NodeId) -> Option<ClassifierId> {
        if let Some(&id) = self.denotes.get(&node) {
            return Some(id);
        }
        // Type elements and their name identifiers denote what their reference denotes.
        match tree.kind(node) {
            NodeKind::TypeElement => tree
                .child(node, crate::Role::Element)
                .and_then(|c| self.classifier_of(tree, c)),
            NodeKind::Identifier => tree
                .parent(node)
                .filter(|&p| {
                    matches!(tree.kind(p), NodeKind::ReferenceElement | NodeKind::Class)
                })
                .and_then(|p| self.denotes.get(&p).copied()),
            _ => None,
        }
    }

    fn classifier(&self, id: ClassifierId) -> Option<&ClassifierInfo> {
        self.classifiers.get(id.index())
    }

    fn resolve(&self, _: &SyntaxTree, node: NodeId) -> Option<Symbol> {
        self.symbols.get(&node).copied()
    }

    fn access(&self, _: &SyntaxTree, node: NodeId) -> Access {
        self.accesses.get(&node).copied().unwrap_or_default()
    }

    fn all_members(&self, tree: &SyntaxTree, class: NodeId, kind: NodeKind) -> Vec<NodeId> {
        let mut members = tree.members(class, kind);
        if let Some(extra) = self.inherited.get(&(class, kind)) {
            members.extend(extra.iter().copied());
        }
        members
    }
}
