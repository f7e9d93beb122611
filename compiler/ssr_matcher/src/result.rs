//! Committed match results.
//!
//! A [`MatchResult`] is built only after the outermost comparison succeeds.
//! The root stands for the matched candidate; its sons are the variables,
//! one per name in first-binding order. A variable bound more than once
//! becomes a multi-match node whose sons are the individual bindings.

use std::sync::Arc;

use ssr_ir::NodeId;

use crate::context::Capture;
use crate::text::TextRange;

/// Capture tree of one successful match.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchResult {
    name: Option<Arc<str>>,
    node: Option<NodeId>,
    range: Option<TextRange>,
    text: String,
    scope_match: bool,
    multiple: bool,
    sons: Vec<MatchResult>,
    unmatched: Vec<(NodeId, Vec<NodeId>)>,
}

impl MatchResult {
    pub(crate) fn root(
        node: NodeId,
        text: &str,
        captures: Vec<Capture>,
        unmatched: Vec<(NodeId, Vec<NodeId>)>,
    ) -> Self {
        MatchResult {
            name: None,
            node: Some(node),
            range: None,
            text: text.to_owned(),
            scope_match: false,
            multiple: false,
            sons: group(captures),
            unmatched,
        }
    }

    fn from_capture(capture: Capture) -> Self {
        let scope_match = !capture.sons.is_empty();
        MatchResult {
            name: Some(capture.name),
            node: capture.node,
            range: capture.range,
            text: capture.text,
            scope_match,
            multiple: false,
            sons: group(capture.sons),
            unmatched: Vec::new(),
        }
    }

    /// Variable name; `None` for the root.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Bound node; `None` for an absent binding or a multi-match.
    #[inline]
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Window of the node's text when only part of it was captured.
    #[inline]
    pub fn range(&self) -> Option<TextRange> {
        self.range
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The binding spans several sibling candidates, or anchors nested captures.
    #[inline]
    pub fn is_scope_match(&self) -> bool {
        self.scope_match
    }

    /// The variable was bound more than once; see [`sons`](Self::sons).
    #[inline]
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Bound to "no occurrence".
    pub fn is_absent(&self) -> bool {
        self.node.is_none() && !self.multiple
    }

    #[inline]
    pub fn sons(&self) -> &[MatchResult] {
        &self.sons
    }

    /// First binding of `name` anywhere below this node, depth first.
    pub fn binding(&self, name: &str) -> Option<&MatchResult> {
        self.sons.iter().find_map(|son| {
            if son.name() == Some(name) {
                Some(son)
            } else {
                son.binding(name)
            }
        })
    }

    /// Texts bound to `name`: one per occurrence, none when absent.
    pub fn texts(&self, name: &str) -> Vec<&str> {
        self.occurrences(name).map(MatchResult::text).collect()
    }

    /// Nodes bound to `name`, one per present occurrence.
    pub fn nodes(&self, name: &str) -> Vec<NodeId> {
        self.occurrences(name).filter_map(MatchResult::node).collect()
    }

    fn occurrences(&self, name: &str) -> impl Iterator<Item = &MatchResult> {
        let binding = self.binding(name);
        let (single, many) = match binding {
            Some(b) if b.multiple => (None, b.sons.as_slice()),
            Some(b) if b.is_absent() => (None, &[][..]),
            other => (other, &[][..]),
        };
        single
            .into_iter()
            .chain(many.iter().filter(|son| !son.is_absent()))
    }

    /// Children of `owner` that the pattern did not account for.
    pub fn unmatched_elements(&self, owner: NodeId) -> &[NodeId] {
        self.unmatched
            .iter()
            .find(|(o, _)| *o == owner)
            .map_or(&[], |(_, elements)| elements.as_slice())
    }

    /// Every owner with unmatched elements.
    pub fn all_unmatched(&self) -> &[(NodeId, Vec<NodeId>)] {
        &self.unmatched
    }
}

/// Fold captures into one result per variable name, first binding first.
fn group(captures: Vec<Capture>) -> Vec<MatchResult> {
    let mut groups: Vec<(Arc<str>, Vec<Capture>)> = Vec::new();
    for capture in captures {
        match groups.iter_mut().find(|(name, _)| *name == capture.name) {
            Some((_, members)) => members.push(capture),
            None => groups.push((Arc::clone(&capture.name), vec![capture])),
        }
    }
    groups
        .into_iter()
        .map(|(name, mut members)| {
            let present = members.iter().filter(|c| !c.is_absent()).count();
            if members.len() == 1 || present <= 1 {
                // An absent marker next to one real binding is just that binding.
                let index = members.iter().position(|c| !c.is_absent()).unwrap_or(0);
                MatchResult::from_capture(members.swap_remove(index))
            } else {
                let sons: Vec<_> = members
                    .into_iter()
                    .filter(|c| !c.is_absent())
                    .map(MatchResult::from_capture)
                    .collect();
                let text = sons
                    .iter()
                    .map(MatchResult::text)
                    .collect::<Vec<_>>()
                    .join(" ");
                MatchResult {
                    name: Some(name),
                    node: None,
                    range: None,
                    text,
                    scope_match: true,
                    multiple: true,
                    sons,
                    unmatched: Vec::new(),
                }
            }
        })
        .collect()
}
