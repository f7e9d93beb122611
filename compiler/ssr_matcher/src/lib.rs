//! Structural pattern matcher.
//!
//! Decides whether a candidate syntax subtree matches a compiled search
//! pattern and, if so, records what each pattern variable bound to.
//!
//! # Design
//!
//! - [`CompiledPattern`]: pattern tree plus a handler table, immutable and
//!   shared by every match
//! - [`MatchContext`]: all per-attempt state (capture scopes, listener,
//!   text generator); one per candidate root
//! - [`Matcher`]: kind-dispatched recursive comparison, with sequential and
//!   any-order list matching
//! - [`MatchResult`]: capture tree committed only after the outermost
//!   comparison succeeds
//!
//! Semantic questions (types, resolution, hierarchy) go through
//! [`ssr_ir::Semantics`]; a matcher without semantic facts degrades to
//! textual comparison.

mod context;
mod engine;
mod error;
mod handler;
mod hierarchy;
mod options;
mod pattern;
mod predicate;
mod result;
mod stack;
mod text;

use std::sync::Once;

use rayon::prelude::*;
use ssr_ir::{NodeId, Semantics, SyntaxTree};

pub use context::{Capture, Checkpoint, ElementsListener, MatchContext, TextGeneratorGuard};
pub use engine::Matcher;
pub use error::PatternError;
pub use handler::{Handler, MatchingHandler, SubstitutionHandler, TextSubstitution};
pub use hierarchy::HierarchyIterator;
pub use options::MatchOptions;
pub use pattern::{CompiledPattern, CompiledPatternBuilder};
pub use predicate::{Predicate, RegexPredicate, Target, TypePredicate};
pub use result::MatchResult;
pub use stack::ensure_sufficient_stack;
pub use text::{ArrayDimensionsText, NodeTextGenerator, TextRange};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=ssr_matcher=debug` or
/// `RUST_LOG=ssr_matcher=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Match `pattern` against the subtree of `tree` rooted at `candidate`.
///
/// Returns the committed capture tree on success. Nothing is recorded for a
/// failed match.
#[tracing::instrument(level = "debug", skip_all, fields(candidate = ?candidate))]
pub fn match_tree(
    pattern: &CompiledPattern,
    tree: &SyntaxTree,
    candidate: NodeId,
    semantics: &dyn Semantics,
    options: &MatchOptions,
) -> Option<MatchResult> {
    let ctx = MatchContext::new(pattern, tree, semantics, *options);
    let mut matcher = Matcher::new(ctx);
    if !matcher.match_node(pattern.root(), candidate) {
        return None;
    }
    let (captures, unmatched) = matcher.into_context().finish();
    tracing::debug!(captures = captures.len(), "matched");
    Some(MatchResult::root(
        candidate,
        tree.text(candidate),
        captures,
        unmatched,
    ))
}

/// Match `pattern` against many independent candidate roots in parallel.
///
/// Each root gets its own context; results keep the order of `roots`.
#[tracing::instrument(level = "debug", skip_all, fields(roots = roots.len()))]
pub fn match_candidates(
    pattern: &CompiledPattern,
    tree: &SyntaxTree,
    roots: &[NodeId],
    semantics: &dyn Semantics,
    options: &MatchOptions,
) -> Vec<(NodeId, MatchResult)> {
    roots
        .par_iter()
        .filter_map(|&root| {
            match_tree(pattern, tree, root, semantics, options).map(|result| (root, result))
        })
        .collect()
}
