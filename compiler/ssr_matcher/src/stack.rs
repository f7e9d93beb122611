//! Recursion guard for the comparator.
//!
//! `else if` chains, nested parentheses and long binary chains recurse once
//! per level in [`Matcher::match_node`](crate::Matcher::match_node) and in
//! sequential list matching. Both enter through [`ensure_sufficient_stack`],
//! which moves to a fresh segment once the current one runs low. On
//! `wasm32` the closure runs in place.

/// Free stack below which a new segment is allocated.
const MIN_REMAINING: usize = 128 * 1024;

/// Size of each new segment.
const SEGMENT: usize = 2 * 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(MIN_REMAINING, SEGMENT, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use ssr_ir::{NoSemantics, TreeBuilder};

    use super::*;
    use crate::{match_tree, CompiledPattern, MatchOptions};

    fn nested_parentheses(b: &mut TreeBuilder, depth: usize) -> ssr_ir::NodeId {
        let mut expr = b.name_ref("x");
        for _ in 0..depth {
            expr = b.parenthesized(expr);
        }
        expr
    }

    #[test]
    fn deeply_nested_candidate_matches_without_overflow() {
        let depth = 4_000;
        let mut p = TreeBuilder::new();
        let root = nested_parentheses(&mut p, depth);
        let pattern = CompiledPattern::builder(p.finish(), root).build().unwrap();

        let mut c = TreeBuilder::new();
        let candidate = nested_parentheses(&mut c, depth);
        let tree = c.finish();

        let options = MatchOptions::default().with_loose_matching(false);
        assert!(match_tree(&pattern, &tree, candidate, &NoSemantics, &options).is_some());
    }

    #[test]
    fn closure_value_passes_through() {
        let counted: Vec<u8> = ensure_sufficient_stack(|| vec![1, 2, 3]);
        assert_eq!(counted.len(), 3);
    }
}
