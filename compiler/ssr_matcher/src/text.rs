//! Text windows and synthesized node text.

use ssr_ir::{NodeId, SyntaxTree};

/// Window into a node's text, used for partial captures such as the body of
/// a string literal without its quotes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TextRange {
    pub start: u32,
    pub len: u32,
}

impl TextRange {
    pub const fn new(start: u32, len: u32) -> Self {
        TextRange { start, len }
    }

    /// Slice `text` to this window; empty when the window does not fit.
    pub fn slice<'t>(&self, text: &'t str) -> &'t str {
        let start = self.start as usize;
        let end = start + self.len as usize;
        text.get(start..end).unwrap_or("")
    }
}

/// Computes the text a regular-expression predicate sees for a node.
///
/// Installed on a [`MatchContext`](crate::MatchContext) for the duration of
/// one handler call when the effective text must be synthesized.
pub trait NodeTextGenerator {
    fn text(&self, tree: &SyntaxTree, node: NodeId) -> String;
}

/// Appends `[]` once per array dimension to the node's text.
///
/// Lets a type variable's regex see `String[]` while the capture itself
/// binds the component type `String`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ArrayDimensionsText {
    pub dims: u32,
}

impl NodeTextGenerator for ArrayDimensionsText {
    fn text(&self, tree: &SyntaxTree, node: NodeId) -> String {
        let mut text = meaningful_text(tree.text(node)).to_owned();
        for _ in 0..self.dims {
            text.push_str("[]");
        }
        text
    }
}

/// Node text with type arguments removed, `List<String>` becomes `List`.
pub(crate) fn meaningful_text(text: &str) -> &str {
    text.find('<').map_or(text, |i| &text[..i])
}

/// Offset and length of a literal's body without its quotes, if quoted.
pub(crate) fn unquoted_range(text: &str) -> Option<TextRange> {
    let quoted = text.len() >= 2
        && ((text.starts_with('"') && text.ends_with('"'))
            || (text.starts_with('\'') && text.ends_with('\'')));
    if !quoted {
        return None;
    }
    let len = u32::try_from(text.len() - 2).ok()?;
    Some(TextRange::new(1, len))
}
