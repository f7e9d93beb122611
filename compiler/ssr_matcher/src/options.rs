//! Match options.

/// Options for one matching session.
///
/// Plain value type; copy it into every [`MatchContext`](crate::MatchContext).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchOptions {
    /// Compare names and texts case-sensitively.
    pub case_sensitive: bool,
    /// Relax shape equivalences: slots the pattern omits match anything,
    /// braces around a single statement are transparent, parentheses are
    /// skipped, and `try` statements may carry extra catches or `finally`.
    pub loose_matching: bool,
}

impl MatchOptions {
    pub const fn new() -> Self {
        MatchOptions {
            case_sensitive: true,
            loose_matching: true,
        }
    }

    #[must_use]
    pub const fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    #[must_use]
    pub const fn with_loose_matching(mut self, loose_matching: bool) -> Self {
        self.loose_matching = loose_matching;
        self
    }
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self::new()
    }
}
