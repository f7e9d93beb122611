//! Compiled patterns.
//!
//! A [`CompiledPattern`] is the pattern syntax tree plus a table from
//! pattern node to [`Handler`]. It is built once per query, validated by
//! [`CompiledPatternBuilder::build`], and shared immutably by every match.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use ssr_ir::{NodeId, SyntaxTree};

use crate::handler::{Handler, MatchingHandler, SubstitutionHandler};
use crate::PatternError;

/// Immutable compiled query.
#[derive(Clone, Debug)]
pub struct CompiledPattern {
    tree: SyntaxTree,
    root: NodeId,
    handlers: FxHashMap<NodeId, Handler>,
    variables: FxHashMap<Arc<str>, NodeId>,
    requests_super_fields: bool,
    requests_super_methods: bool,
    requests_super_inners: bool,
    class_content: Option<NodeId>,
}

impl CompiledPattern {
    /// Start compiling a pattern rooted at `root` of `tree`.
    pub fn builder(tree: SyntaxTree, root: NodeId) -> CompiledPatternBuilder {
        CompiledPatternBuilder {
            tree,
            root,
            handlers: Vec::new(),
            requests_super_fields: false,
            requests_super_methods: false,
            requests_super_inners: false,
            class_content: None,
        }
    }

    #[inline]
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn handler(&self, node: NodeId) -> Option<&Handler> {
        self.handlers.get(&node)
    }

    #[inline]
    pub fn substitution(&self, node: NodeId) -> Option<&SubstitutionHandler> {
        self.handler(node).and_then(Handler::as_substitution)
    }

    pub fn matching(&self, node: NodeId) -> Option<&MatchingHandler> {
        match self.handler(node)? {
            Handler::Matching(h) => Some(h),
            Handler::Substitution(_) => None,
        }
    }

    /// Whether `node` is a typed variable.
    #[inline]
    pub fn is_typed_var(&self, node: NodeId) -> bool {
        self.substitution(node).is_some()
    }

    /// Whether the candidate may omit the slot `node` stands for.
    #[inline]
    pub fn allows_absence(&self, node: NodeId) -> bool {
        self.handler(node).is_some_and(Handler::allows_absence)
    }

    /// First pattern node declaring `name`.
    pub fn variable_node(&self, name: &str) -> Option<NodeId> {
        self.variables.get(name).copied()
    }

    /// Handler of the variable `name`.
    pub fn variable(&self, name: &str) -> Option<&SubstitutionHandler> {
        self.variable_node(name).and_then(|n| self.substitution(n))
    }

    pub fn variable_names(&self) -> impl Iterator<Item = &Arc<str>> {
        self.variables.keys()
    }

    #[inline]
    pub fn requests_super_fields(&self) -> bool {
        self.requests_super_fields
    }

    #[inline]
    pub fn requests_super_methods(&self) -> bool {
        self.requests_super_methods
    }

    #[inline]
    pub fn requests_super_inners(&self) -> bool {
        self.requests_super_inners
    }

    /// Node whose handler receives class members no pattern member matched.
    #[inline]
    pub fn class_content(&self) -> Option<NodeId> {
        self.class_content
    }
}

/// Builder validating a [`CompiledPattern`].
#[derive(Debug)]
pub struct CompiledPatternBuilder {
    tree: SyntaxTree,
    root: NodeId,
    handlers: Vec<(NodeId, Handler)>,
    requests_super_fields: bool,
    requests_super_methods: bool,
    requests_super_inners: bool,
    class_content: Option<NodeId>,
}

impl CompiledPatternBuilder {
    /// Make `node` a typed variable.
    #[must_use]
    pub fn variable(mut self, node: NodeId, handler: SubstitutionHandler) -> Self {
        self.handlers.push((node, Handler::Substitution(handler)));
        self
    }

    /// Attach a non-binding strategy to `node`.
    #[must_use]
    pub fn handler(mut self, node: NodeId, handler: MatchingHandler) -> Self {
        self.handlers.push((node, Handler::Matching(handler)));
        self
    }

    #[must_use]
    pub fn requests_super_fields(mut self, value: bool) -> Self {
        self.requests_super_fields = value;
        self
    }

    #[must_use]
    pub fn requests_super_methods(mut self, value: bool) -> Self {
        self.requests_super_methods = value;
        self
    }

    #[must_use]
    pub fn requests_super_inners(mut self, value: bool) -> Self {
        self.requests_super_inners = value;
        self
    }

    /// Bind unmatched class members to the variable declared on `node`.
    ///
    /// `node` must carry a substitution handler and should not be attached
    /// as a class member itself.
    #[must_use]
    pub fn class_content(mut self, node: NodeId) -> Self {
        self.class_content = Some(node);
        self
    }

    pub fn build(self) -> Result<CompiledPattern, PatternError> {
        if !self.tree.contains(self.root) {
            return Err(PatternError::UnknownNode(self.root));
        }

        let mut handlers = FxHashMap::default();
        let mut variables: FxHashMap<Arc<str>, NodeId> = FxHashMap::default();
        for (node, handler) in self.handlers {
            if !self.tree.contains(node) {
                return Err(PatternError::UnknownNode(node));
            }
            if let Handler::Substitution(sub) = &handler {
                check_variable(sub, &handlers, &variables)?;
                variables.entry(Arc::clone(sub.name())).or_insert(node);
            }
            if handlers.insert(node, handler).is_some() {
                return Err(PatternError::DuplicateHandler(node));
            }
        }

        for handler in handlers.values() {
            check_references(handler, &variables)?;
        }

        if let Some(node) = self.class_content {
            if !matches!(handlers.get(&node), Some(Handler::Substitution(_))) {
                return Err(PatternError::InvalidClassContent(node));
            }
        }

        tracing::debug!(
            handlers = handlers.len(),
            variables = variables.len(),
            "compiled pattern"
        );

        Ok(CompiledPattern {
            tree: self.tree,
            root: self.root,
            handlers,
            variables,
            requests_super_fields: self.requests_super_fields,
            requests_super_methods: self.requests_super_methods,
            requests_super_inners: self.requests_super_inners,
            class_content: self.class_content,
        })
    }
}

/// Bounds are sane and repeated declarations of one name agree.
fn check_variable(
    sub: &SubstitutionHandler,
    handlers: &FxHashMap<NodeId, Handler>,
    variables: &FxHashMap<Arc<str>, NodeId>,
) -> Result<(), PatternError> {
    if sub.min_occurs() > sub.max_occurs() {
        return Err(PatternError::InvalidOccurrences {
            name: sub.name().to_string(),
            min: sub.min_occurs(),
            max: sub.max_occurs(),
        });
    }
    let previous = variables
        .get(sub.name())
        .and_then(|n| handlers.get(n))
        .and_then(Handler::as_substitution);
    if let Some(prev) = previous {
        let consistent = prev.min_occurs() == sub.min_occurs()
            && prev.max_occurs() == sub.max_occurs()
            && prev.is_subtype() == sub.is_subtype()
            && prev.is_strict_subtype() == sub.is_strict_subtype();
        if !consistent {
            return Err(PatternError::InconsistentVariable(sub.name().to_string()));
        }
    }
    Ok(())
}

/// Pins and text substitutions name declared variables.
fn check_references(
    handler: &Handler,
    variables: &FxHashMap<Arc<str>, NodeId>,
) -> Result<(), PatternError> {
    let known = |name: &Arc<str>| {
        if variables.contains_key(name) {
            Ok(())
        } else {
            Err(PatternError::UnknownVariable(name.to_string()))
        }
    };
    match handler {
        Handler::Substitution(sub) => {
            if let Some(pin) = sub.pin() {
                if pin == sub.name() {
                    return Err(PatternError::PinnedToSelf(pin.to_string()));
                }
                known(pin)?;
            }
        }
        Handler::Matching(
            MatchingHandler::CommentText(text) | MatchingHandler::LiteralWithSubstitution(text),
        ) => {
            for name in text.variables() {
                known(name)?;
            }
        }
        Handler::Matching(_) => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests;
