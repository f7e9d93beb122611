//! Lazy walk over a classifier's supertype hierarchy.
//!
//! Used for subtype-constrained variables: the candidate's classifier and its
//! ancestors are offered one at a time until a handler's predicate accepts
//! one. Breadth-first, each classifier at most once, so diamonds in an
//! interface hierarchy are harmless. The oracle must keep the hierarchy
//! acyclic; the visited set keeps a cycle from looping anyway.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use ssr_ir::{ClassifierId, Semantics};

/// Restartable iterator over a classifier and its supertypes.
///
/// Classes and interfaces can be filtered out independently. Filtered
/// classifiers are still walked through, so an interface reachable only via
/// a class is found when classes are excluded.
pub struct HierarchyIterator<'s> {
    semantics: &'s dyn Semantics,
    start: ClassifierId,
    include_classes: bool,
    include_interfaces: bool,
    include_self: bool,
    queue: VecDeque<ClassifierId>,
    visited: FxHashSet<ClassifierId>,
    current: Option<ClassifierId>,
}

impl<'s> HierarchyIterator<'s> {
    pub fn new(
        semantics: &'s dyn Semantics,
        start: ClassifierId,
        include_classes: bool,
        include_interfaces: bool,
        include_self: bool,
    ) -> Self {
        let mut iter = HierarchyIterator {
            semantics,
            start,
            include_classes,
            include_interfaces,
            include_self,
            queue: VecDeque::new(),
            visited: FxHashSet::default(),
            current: None,
        };
        iter.reset();
        iter
    }

    /// Classifier the iterator is positioned on.
    #[inline]
    pub fn current(&self) -> Option<ClassifierId> {
        self.current
    }

    #[inline]
    pub fn has_next(&self) -> bool {
        self.current.is_some()
    }

    /// Step past the current classifier.
    pub fn advance(&mut self) {
        self.current = self.fill();
    }

    /// Restart from the start classifier.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.visited.clear();
        self.visited.insert(self.start);
        self.queue.push_back(self.start);
        self.current = self.fill();
    }

    fn accepts(&self, id: ClassifierId) -> bool {
        if id == self.start && !self.include_self {
            return false;
        }
        match self.semantics.classifier(id) {
            Some(info) if info.is_interface => self.include_interfaces,
            Some(_) => self.include_classes,
            None => false,
        }
    }

    fn fill(&mut self) -> Option<ClassifierId> {
        while let Some(next) = self.queue.pop_front() {
            for &sup in self.semantics.supertypes(next) {
                if self.visited.insert(sup) {
                    self.queue.push_back(sup);
                }
            }
            if self.accepts(next) {
                return Some(next);
            }
        }
        None
    }
}

impl Iterator for HierarchyIterator<'_> {
    type Item = ClassifierId;

    fn next(&mut self) -> Option<ClassifierId> {
        let current = self.current?;
        self.advance();
        Some(current)
    }
}
