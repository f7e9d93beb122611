//! Sequential and any-order list matching.

use smallvec::SmallVec;
use ssr_ir::NodeId;

use super::Matcher;
use crate::context::ElementsListener;
use crate::handler::SubstitutionHandler;
use crate::stack::ensure_sufficient_stack;

impl<'a> Matcher<'a> {
    /// Match an ordered pattern list against an ordered candidate list.
    ///
    /// A typed variable in the pattern list consumes a run of candidates
    /// between its occurrence bounds, shortest run first; the remainder must
    /// match the rest of the pattern. Candidate comments are ignored unless
    /// the pattern list itself contains a comment.
    pub fn match_sequentially(&mut self, patterns: &[NodeId], candidates: &[NodeId]) -> bool {
        let pt = self.pt();
        let ct = self.ct();
        if patterns.iter().any(|&p| pt.kind(p).is_comment()) {
            return self.match_run(patterns, candidates);
        }
        let significant: SmallVec<[NodeId; 8]> = candidates
            .iter()
            .copied()
            .filter(|&c| !ct.kind(c).is_comment())
            .collect();
        self.match_run(patterns, &significant)
    }

    fn match_run(&mut self, patterns: &[NodeId], candidates: &[NodeId]) -> bool {
        let Some((&first, rest)) = patterns.split_first() else {
            return candidates.is_empty();
        };

        ensure_sufficient_stack(|| {
            let Some(handler) = self.typed_var(first) else {
                let Some((&c, remaining)) = candidates.split_first() else {
                    return false;
                };
                return self.match_node(first, c) && self.match_run(rest, remaining);
            };

            let min = handler.min_occurs() as usize;
            let max = (handler.max_occurs() as usize).min(candidates.len());
            for count in min..=max {
                let checkpoint = self.ctx.checkpoint();
                if self.bind_run(first, handler, &candidates[..count])
                    && self.match_run(rest, &candidates[count..])
                {
                    return true;
                }
                self.ctx.rollback(checkpoint);
            }
            false
        })
    }

    /// Bind every candidate of `run` to the variable at `p`; an empty run
    /// records an absent occurrence.
    fn bind_run(&mut self, p: NodeId, handler: &'a SubstitutionHandler, run: &[NodeId]) -> bool {
        if run.is_empty() {
            return handler.handle(None, &mut self.ctx);
        }
        run.iter().all(|&c| self.match_node(p, c))
    }

    /// Match pattern elements against candidates regardless of order.
    ///
    /// Greedy: each pattern element takes the first still-unused candidates
    /// it matches, up to its maximum occurrences, and never gives them back.
    /// An element pinned to another variable only tries the candidate that
    /// contains that variable's binding. On success the installed
    /// [`ElementsListener`](crate::ElementsListener) learns which candidates
    /// were consumed and which were left over.
    pub fn match_in_any_order(&mut self, patterns: &[NodeId], candidates: &[NodeId]) -> bool {
        if patterns.is_empty() {
            return candidates.is_empty() || self.loose();
        }

        let mut pool: Vec<NodeId> = candidates.to_vec();
        let mut matched: Vec<NodeId> = Vec::with_capacity(patterns.len());

        for &p in patterns {
            let handler = self.typed_var(p);

            if let Some(pinned) = handler.and_then(|h| self.pinned_node(h)) {
                let ct = self.ct();
                let Some(index) = pool.iter().position(|&c| ct.is_ancestor_or_self(c, pinned))
                else {
                    if candidates.iter().any(|&c| ct.is_ancestor_or_self(c, pinned)) {
                        // Already consumed by an earlier pattern element.
                        return false;
                    }
                    tracing::error!(?p, ?pinned, "pinned binding outside the candidate list");
                    panic!("pinned binding {pinned:?} is not among the candidates of {p:?}");
                };
                if !self.match_node(p, pool[index]) {
                    return false;
                }
                matched.push(pool.remove(index));
                continue;
            }

            let (min, max) = handler.map_or((1, 1), |h| {
                (h.min_occurs() as usize, h.max_occurs() as usize)
            });
            let mut taken = 0;
            let mut i = 0;
            while i < pool.len() && taken < max {
                if self.match_node(p, pool[i]) {
                    matched.push(pool.remove(i));
                    taken += 1;
                } else {
                    i += 1;
                }
            }
            if taken < min {
                return false;
            }
            if taken == 0 {
                if let Some(handler) = handler {
                    if !handler.handle(None, &mut self.ctx) {
                        return false;
                    }
                }
            }
        }

        tracing::trace!(matched = matched.len(), unmatched = pool.len(), "any-order list");
        if let Some(listener) = self.ctx.listener_mut() {
            listener.matched_elements(&matched);
            listener.unmatched_elements(&pool);
        }
        true
    }

    /// [`match_in_any_order`](Self::match_in_any_order) under a fresh
    /// listener; on success, the candidates left over.
    pub(super) fn match_in_any_order_tracked(
        &mut self,
        patterns: &[NodeId],
        candidates: &[NodeId],
    ) -> Option<Vec<NodeId>> {
        let previous = self.ctx.set_listener(Some(ElementsListener::default()));
        let matched = self.match_in_any_order(patterns, candidates);
        let listener = self.ctx.set_listener(previous).unwrap_or_default();
        matched.then(|| {
            candidates
                .iter()
                .copied()
                .filter(|c| !listener.matched().contains(c))
                .collect()
        })
    }

    /// Candidate node already bound to the variable `handler` is pinned to.
    fn pinned_node(&self, handler: &SubstitutionHandler) -> Option<NodeId> {
        let pin = handler.pin()?;
        self.ctx.bindings(pin).find_map(|capture| capture.node())
    }
}
