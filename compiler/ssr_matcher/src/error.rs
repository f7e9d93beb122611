//! Compiled pattern construction errors.

use ssr_ir::NodeId;

/// A compiled pattern that cannot be matched.
///
/// Matching itself never fails with an error; an unsatisfied pattern is a
/// plain no-match. These errors reject malformed patterns up front.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    /// A handler is attached to a node outside the pattern tree.
    #[error("handler attached to {0:?}, which is not part of the pattern tree")]
    UnknownNode(NodeId),

    /// A pattern node carries two handlers.
    #[error("pattern node {0:?} has more than one handler")]
    DuplicateHandler(NodeId),

    /// Occurrence bounds with `min > max`.
    #[error("variable `{name}` has min occurrences {min} above max {max}")]
    InvalidOccurrences { name: String, min: u32, max: u32 },

    /// The same variable declared with different bounds or predicates.
    #[error("variable `{0}` is declared inconsistently")]
    InconsistentVariable(String),

    /// A reference to a variable no handler declares.
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    /// A variable pinned to its own binding.
    #[error("variable `{0}` is pinned to itself")]
    PinnedToSelf(String),

    /// The class content handler is not a substitution handler.
    #[error("class content node {0:?} has no substitution handler")]
    InvalidClassContent(NodeId),

    /// A predicate or text handler regular expression failed to compile.
    #[error("invalid regular expression `{pattern}`: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
