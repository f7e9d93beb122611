//! Per-match mutable state.
//!
//! # Design
//!
//! Captures live in a stack of scopes owned by the context, never in the
//! handlers. A composite comparison pushes a scope, matches its parts, and
//! pops the scope: on success the popped captures are merged into the parent
//! (or nested under a variable), on failure they are dropped. Alternatives
//! inside one scope are tried between a [`Checkpoint`] and a rollback, so a
//! failed attempt never leaves captures behind.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use ssr_ir::{NodeId, Semantics, SyntaxTree};

use crate::predicate::Target;
use crate::text::{NodeTextGenerator, TextRange};
use crate::{CompiledPattern, MatchOptions};

/// One recorded binding of a variable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Capture {
    pub(crate) name: Arc<str>,
    pub(crate) node: Option<NodeId>,
    pub(crate) range: Option<TextRange>,
    pub(crate) text: String,
    pub(crate) sons: Vec<Capture>,
}

impl Capture {
    pub(crate) fn new(
        name: Arc<str>,
        node: Option<NodeId>,
        range: Option<TextRange>,
        sons: Vec<Capture>,
        ctx: &MatchContext<'_>,
    ) -> Self {
        let text = match (node, range) {
            (Some(n), Some(r)) => r.slice(ctx.tree().text(n)).to_owned(),
            (Some(n), None) => ctx.tree().text(n).to_owned(),
            (None, _) => String::new(),
        };
        Capture {
            name,
            node,
            range,
            text,
            sons,
        }
    }

    #[inline]
    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    #[inline]
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    #[inline]
    pub fn range(&self) -> Option<TextRange> {
        self.range
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Captures made while matching the composite this binding anchors.
    #[inline]
    pub fn sons(&self) -> &[Capture] {
        &self.sons
    }

    /// Bound to "no occurrence".
    #[inline]
    pub fn is_absent(&self) -> bool {
        self.node.is_none()
    }
}

/// Collects the candidate elements consumed and left over by any-order
/// list matching.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ElementsListener {
    matched: Vec<NodeId>,
    unmatched: Vec<NodeId>,
}

impl ElementsListener {
    pub fn matched_elements(&mut self, elements: &[NodeId]) {
        self.matched.extend_from_slice(elements);
    }

    pub fn unmatched_elements(&mut self, elements: &[NodeId]) {
        self.unmatched.extend_from_slice(elements);
    }

    pub fn matched(&self) -> &[NodeId] {
        &self.matched
    }

    pub fn unmatched(&self) -> &[NodeId] {
        &self.unmatched
    }
}

/// Position in the capture stack to roll back to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Checkpoint {
    depth: usize,
    captures: usize,
    unmatched: usize,
}

/// State of one top-level match attempt against one candidate root.
pub struct MatchContext<'a> {
    pattern: &'a CompiledPattern,
    tree: &'a SyntaxTree,
    semantics: &'a dyn Semantics,
    options: MatchOptions,
    scopes: Vec<Vec<Capture>>,
    unmatched: Vec<(NodeId, Vec<NodeId>)>,
    listener: Option<ElementsListener>,
    text_generator: Option<Box<dyn NodeTextGenerator>>,
}

impl<'a> MatchContext<'a> {
    pub fn new(
        pattern: &'a CompiledPattern,
        tree: &'a SyntaxTree,
        semantics: &'a dyn Semantics,
        options: MatchOptions,
    ) -> Self {
        MatchContext {
            pattern,
            tree,
            semantics,
            options,
            scopes: vec![Vec::new()],
            unmatched: Vec::new(),
            listener: None,
            text_generator: None,
        }
    }

    #[inline]
    pub fn pattern(&self) -> &'a CompiledPattern {
        self.pattern
    }

    #[inline]
    pub fn pattern_tree(&self) -> &'a SyntaxTree {
        self.pattern.tree()
    }

    /// The candidate tree.
    #[inline]
    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    #[inline]
    pub fn semantics(&self) -> &'a dyn Semantics {
        self.semantics
    }

    #[inline]
    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Compare two texts honoring case sensitivity.
    pub fn texts_equal(&self, a: &str, b: &str) -> bool {
        if self.options.case_sensitive {
            a == b
        } else {
            a.to_lowercase() == b.to_lowercase()
        }
    }

    // Capture scopes

    /// Open a nested capture scope.
    pub fn push_result(&mut self) {
        self.scopes.push(Vec::new());
    }

    /// Close the innermost scope and hand back its captures.
    ///
    /// # Panics
    /// Panics when only the root scope is open; push and pop must pair.
    pub fn pop_result(&mut self) -> Vec<Capture> {
        assert!(self.scopes.len() > 1, "pop_result without matching push_result");
        self.scopes.pop().unwrap_or_default()
    }

    /// Captures of the innermost scope.
    pub fn result(&self) -> &[Capture] {
        self.scopes.last().map_or(&[], Vec::as_slice)
    }

    pub fn has_result(&self) -> bool {
        !self.result().is_empty()
    }

    pub fn add_capture(&mut self, capture: Capture) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.push(capture);
        }
    }

    /// Merge captures popped from a nested scope into the current one.
    pub fn append_captures(&mut self, captures: Vec<Capture>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.extend(captures);
        }
    }

    /// Bindings of `name` visible from the innermost scope, outermost first.
    pub fn bindings<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s Capture> + 's {
        self.scopes
            .iter()
            .flatten()
            .flat_map(Capture::flatten)
            .filter(move |c| &*c.name == name)
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            depth: self.scopes.len(),
            captures: self.result().len(),
            unmatched: self.unmatched.len(),
        }
    }

    /// Drop everything recorded in the current scope since `checkpoint`.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        debug_assert_eq!(
            self.scopes.len(),
            checkpoint.depth,
            "rollback across unbalanced capture scopes"
        );
        self.scopes.truncate(checkpoint.depth);
        if let Some(scope) = self.scopes.last_mut() {
            scope.truncate(checkpoint.captures);
        }
        self.unmatched.truncate(checkpoint.unmatched);
    }

    // Unmatched elements

    /// Record candidate children of `owner` that no pattern element consumed.
    pub fn record_unmatched(&mut self, owner: NodeId, elements: Vec<NodeId>) {
        if !elements.is_empty() {
            tracing::debug!(?owner, count = elements.len(), "unmatched elements");
            self.unmatched.push((owner, elements));
        }
    }

    // Listener

    /// Install a listener, returning the previous one.
    pub fn set_listener(&mut self, listener: Option<ElementsListener>) -> Option<ElementsListener> {
        std::mem::replace(&mut self.listener, listener)
    }

    pub fn listener(&self) -> Option<&ElementsListener> {
        self.listener.as_ref()
    }

    pub fn listener_mut(&mut self) -> Option<&mut ElementsListener> {
        self.listener.as_mut()
    }

    // Text generation

    /// Install `generator` until the returned guard drops.
    ///
    /// The guard dereferences to the context, so matching continues through
    /// it; the previous generator is restored on every exit path.
    pub fn install_text_generator(
        &mut self,
        generator: Box<dyn NodeTextGenerator>,
    ) -> TextGeneratorGuard<'_, 'a> {
        let previous = self.text_generator.replace(generator);
        TextGeneratorGuard {
            ctx: self,
            previous,
        }
    }

    pub fn has_text_generator(&self) -> bool {
        self.text_generator.is_some()
    }

    /// Text a regex predicate sees for `node`.
    pub fn predicate_text(&self, node: NodeId) -> String {
        match &self.text_generator {
            Some(generator) => generator.text(self.tree, node),
            None => self.tree.text(node).to_owned(),
        }
    }

    /// Text a binding of `target` would capture.
    pub(crate) fn target_text(&self, target: Target) -> String {
        match target {
            Target::Node(node, Some(range)) => range.slice(self.tree.text(node)).to_owned(),
            Target::Node(node, None) => self.tree.text(node).to_owned(),
            Target::Classifier(id) => self
                .semantics
                .classifier(id)
                .map(|info| info.name.clone())
                .unwrap_or_default(),
            Target::ImplicitThis(_) => "this".to_owned(),
        }
    }

    /// Consume the context after a successful match.
    pub(crate) fn finish(mut self) -> (Vec<Capture>, Vec<(NodeId, Vec<NodeId>)>) {
        self.scopes.truncate(1);
        (self.scopes.pop().unwrap_or_default(), self.unmatched)
    }
}

impl Capture {
    /// This capture and every nested one, depth first.
    fn flatten(&self) -> Box<dyn Iterator<Item = &Capture> + '_> {
        Box::new(std::iter::once(self).chain(self.sons.iter().flat_map(Capture::flatten)))
    }
}

/// Keeps a [`NodeTextGenerator`] installed on a context.
pub struct TextGeneratorGuard<'c, 'a> {
    ctx: &'c mut MatchContext<'a>,
    previous: Option<Box<dyn NodeTextGenerator>>,
}

impl<'a> Deref for TextGeneratorGuard<'_, 'a> {
    type Target = MatchContext<'a>;

    fn deref(&self) -> &MatchContext<'a> {
        self.ctx
    }
}

impl<'a> DerefMut for TextGeneratorGuard<'_, 'a> {
    fn deref_mut(&mut self) -> &mut MatchContext<'a> {
        self.ctx
    }
}

impl Drop for TextGeneratorGuard<'_, '_> {
    fn drop(&mut self) {
        self.ctx.text_generator = self.previous.take();
    }
}

#[cfg(test)]
mod tests;
