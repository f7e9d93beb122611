//! Handlers attached to pattern nodes.
//!
//! Every pattern node is compared by the default structural rule unless the
//! compiled pattern attaches a [`Handler`] to it. A [`SubstitutionHandler`]
//! turns the node into a typed variable; a [`MatchingHandler`] swaps in a
//! different comparison strategy.
//!
//! Handlers are immutable once the pattern is compiled. Everything that
//! varies per attempt (captures, nested results, installed text generators)
//! lives in the [`MatchContext`], so one handler can be re-entered by a
//! nested use of the same variable.

use std::sync::Arc;

use regex::{Regex, RegexBuilder};
use ssr_ir::{NodeId, NodeKind};

use crate::context::Capture;
use crate::predicate::{Predicate, RegexPredicate, Target};
use crate::text::{unquoted_range, TextRange};
use crate::{MatchContext, PatternError};

/// Strategy attached to one pattern node.
#[derive(Clone, Debug)]
pub enum Handler {
    Matching(MatchingHandler),
    Substitution(SubstitutionHandler),
}

impl Handler {
    #[inline]
    pub fn as_substitution(&self) -> Option<&SubstitutionHandler> {
        match self {
            Handler::Substitution(h) => Some(h),
            Handler::Matching(_) => None,
        }
    }

    /// Whether the candidate may omit the slot this handler governs.
    #[inline]
    pub fn allows_absence(&self) -> bool {
        self.as_substitution()
            .is_some_and(SubstitutionHandler::allows_absence)
    }
}

impl From<SubstitutionHandler> for Handler {
    fn from(handler: SubstitutionHandler) -> Self {
        Handler::Substitution(handler)
    }
}

impl From<MatchingHandler> for Handler {
    fn from(handler: MatchingHandler) -> Self {
        Handler::Matching(handler)
    }
}

/// Non-binding comparison strategies.
#[derive(Clone, Debug)]
pub enum MatchingHandler {
    /// Default kind-dispatched comparison.
    Structural,
    /// The pattern node is a wrapper (expression statement, parentheses)
    /// that also matches its bare inner expression.
    Skipping,
    /// A declaration statement that also matches a single field or local
    /// variable declaration, as in a `for` initializer.
    DeclarationStatement,
    /// Comment body matched by a regex whose groups bind variables.
    CommentText(TextSubstitution),
    /// String literal body matched by a regex whose groups bind variables.
    LiteralWithSubstitution(TextSubstitution),
}

/// Regex over a text body whose capture groups bind variables, in order.
#[derive(Clone, Debug)]
pub struct TextSubstitution {
    regex: Regex,
    variables: Vec<Arc<str>>,
}

impl TextSubstitution {
    /// `variables[i]` is bound to capture group `i + 1`.
    pub fn new(
        pattern: &str,
        variables: &[&str],
        case_sensitive: bool,
    ) -> Result<Self, PatternError> {
        let regex = RegexBuilder::new(&format!("^(?:{pattern})$"))
            .case_insensitive(!case_sensitive)
            .dot_matches_new_line(true)
            .build()
            .map_err(|source| PatternError::InvalidRegex {
                pattern: pattern.to_owned(),
                source,
            })?;
        Ok(TextSubstitution {
            regex,
            variables: variables.iter().map(|&v| Arc::from(v)).collect(),
        })
    }

    pub fn variables(&self) -> &[Arc<str>] {
        &self.variables
    }

    /// Byte windows of each variable's group within `body`; `None` when the
    /// body does not match or a group did not participate.
    pub(crate) fn groups(&self, body: &str) -> Option<Vec<Option<(usize, usize)>>> {
        let caps = self.regex.captures(body)?;
        Some(
            (1..=self.variables.len())
                .map(|i| caps.get(i).map(|m| (m.start(), m.len())))
                .collect(),
        )
    }
}

/// One named typed variable.
///
/// Occurrence bounds: `min_occurs == 0` makes the variable optional,
/// `max_occurs > 1` lets it capture a run of siblings.
#[derive(Clone, Debug)]
pub struct SubstitutionHandler {
    name: Arc<str>,
    min_occurs: u32,
    max_occurs: u32,
    predicate: Option<Predicate>,
    subtype: bool,
    strict_subtype: bool,
    pin: Option<Arc<str>>,
}

impl SubstitutionHandler {
    /// Variable that must occur exactly once.
    pub fn new(name: &str) -> Self {
        SubstitutionHandler {
            name: Arc::from(name),
            min_occurs: 1,
            max_occurs: 1,
            predicate: None,
            subtype: false,
            strict_subtype: false,
            pin: None,
        }
    }

    #[must_use]
    pub fn occurs(mut self, min: u32, max: u32) -> Self {
        self.min_occurs = min;
        self.max_occurs = max;
        self
    }

    #[must_use]
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Accept a candidate whose classifier or any supertype satisfies the predicate.
    #[must_use]
    pub fn within_hierarchy(mut self) -> Self {
        self.subtype = true;
        self
    }

    /// Like [`within_hierarchy`](Self::within_hierarchy), excluding the
    /// candidate's own classifier.
    #[must_use]
    pub fn strictly_within_hierarchy(mut self) -> Self {
        self.strict_subtype = true;
        self
    }

    /// In an any-order list, test only the candidate holding `variable`'s
    /// existing binding.
    #[must_use]
    pub fn pinned_to(mut self, variable: &str) -> Self {
        self.pin = Some(Arc::from(variable));
        self
    }

    #[inline]
    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    #[inline]
    pub fn min_occurs(&self) -> u32 {
        self.min_occurs
    }

    #[inline]
    pub fn max_occurs(&self) -> u32 {
        self.max_occurs
    }

    #[inline]
    pub fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    #[inline]
    pub fn is_subtype(&self) -> bool {
        self.subtype
    }

    #[inline]
    pub fn is_strict_subtype(&self) -> bool {
        self.strict_subtype
    }

    #[inline]
    pub fn pin(&self) -> Option<&Arc<str>> {
        self.pin.as_ref()
    }

    #[inline]
    pub fn allows_absence(&self) -> bool {
        self.min_occurs == 0
    }

    pub fn find_regexp(&self) -> Option<&RegexPredicate> {
        self.predicate.as_ref().and_then(Predicate::find_regexp)
    }

    /// Check whether `target` may be bound to this variable.
    ///
    /// Applies the predicate, then consistency with existing bindings: a
    /// single-occurrence variable must repeat the text it already captured,
    /// a variadic one must not exceed `max_occurs`.
    pub fn validate(&self, target: Target, ctx: &MatchContext<'_>) -> bool {
        if let Some(predicate) = &self.predicate {
            if !predicate.evaluate(target, ctx) {
                return false;
            }
        }
        if self.max_occurs == 0 {
            return false;
        }
        let mut bound = ctx.bindings(&self.name).filter(|c| !c.is_absent());
        if self.min_occurs == 1 && self.max_occurs == 1 {
            if let Some(previous) = bound.next() {
                return ctx.texts_equal(previous.text(), &ctx.target_text(target));
            }
        } else if self.max_occurs > 1 && bound.count() >= self.max_occurs as usize {
            return false;
        }
        true
    }

    /// Bind a candidate node, or record an absent occurrence for `None`.
    ///
    /// Quoted literals are captured without their quotes.
    pub fn handle(&self, candidate: Option<NodeId>, ctx: &mut MatchContext<'_>) -> bool {
        let Some(node) = candidate else {
            if self.allows_absence() {
                self.add_result(None, None, Vec::new(), ctx);
                return true;
            }
            return false;
        };
        if ctx.tree().kind(node) == NodeKind::Literal {
            if let Some(range) = unquoted_range(ctx.tree().text(node)) {
                return self.handle_range(node, range, ctx);
            }
        }
        if !self.validate(Target::Node(node, None), ctx) {
            return false;
        }
        self.add_result(Some(node), None, Vec::new(), ctx);
        true
    }

    /// Bind a window of a candidate node's text.
    pub fn handle_range(&self, node: NodeId, range: TextRange, ctx: &mut MatchContext<'_>) -> bool {
        if !self.validate(Target::Node(node, Some(range)), ctx) {
            return false;
        }
        self.add_result(Some(node), Some(range), Vec::new(), ctx);
        true
    }

    /// Bind a candidate node together with the captures of the composite
    /// match it anchors, such as a declaration's name with its initializer.
    pub fn handle_nested(
        &self,
        node: NodeId,
        nested: Vec<Capture>,
        ctx: &mut MatchContext<'_>,
    ) -> bool {
        if !self.validate(Target::Node(node, None), ctx) {
            return false;
        }
        self.add_result(Some(node), None, nested, ctx);
        true
    }

    /// Record a binding without validating it.
    pub(crate) fn add_result(
        &self,
        node: Option<NodeId>,
        range: Option<TextRange>,
        nested: Vec<Capture>,
        ctx: &mut MatchContext<'_>,
    ) {
        let capture = Capture::new(Arc::clone(&self.name), node, range, nested, ctx);
        tracing::trace!(name = %self.name, text = capture.text(), "bound variable");
        ctx.add_capture(capture);
    }
}

#[cfg(test)]
mod tests;
