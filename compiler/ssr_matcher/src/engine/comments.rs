//! Comments, doc tags and regex-driven text captures.

use ssr_ir::{NodeId, NodeKind, Role};

use super::Matcher;
use crate::handler::TextSubstitution;
use crate::text::{unquoted_range, TextRange};

impl Matcher<'_> {
    /// Compare comments.
    ///
    /// A typed comment binds the comment body without its delimiters. A doc
    /// comment pattern with tags compares the tags in any order. Otherwise
    /// the trimmed bodies must be equal.
    pub(super) fn match_comment(&mut self, p: NodeId, c: NodeId) -> bool {
        let (pt, ct) = (self.pt(), self.ct());
        if !ct.kind(c).is_comment() {
            return false;
        }
        if let Some(handler) = self.pattern().substitution(p) {
            let text = ct.text(c);
            let (offset, body) = comment_body(text);
            return match (u32::try_from(offset), u32::try_from(body.len())) {
                (Ok(start), Ok(len)) => {
                    handler.handle_range(c, TextRange::new(start, len), &mut self.ctx)
                }
                _ => false,
            };
        }

        let tags = pt.elements(p);
        if pt.kind(p) == NodeKind::DocComment && !tags.is_empty() {
            if ct.kind(c) != NodeKind::DocComment {
                return false;
            }
            let candidates = ct.elements(c);
            return self.match_in_any_order(&tags, &candidates);
        }

        let (_, p_body) = comment_body(pt.text(p));
        let (_, c_body) = comment_body(ct.text(c));
        self.ctx.texts_equal(p_body.trim(), c_body.trim())
    }

    /// Comment body matched by a regex whose groups bind variables.
    pub(super) fn match_comment_text(&mut self, text: &TextSubstitution, c: NodeId) -> bool {
        let ct = self.ct();
        if !ct.kind(c).is_comment() {
            return false;
        }
        let (offset, body) = comment_body(ct.text(c));
        self.bind_text_groups(text, c, offset, body)
    }

    /// String literal body matched by a regex whose groups bind variables.
    pub(super) fn match_literal_text(&mut self, text: &TextSubstitution, c: NodeId) -> bool {
        let ct = self.ct();
        if ct.kind(c) != NodeKind::Literal {
            return false;
        }
        let whole = ct.text(c);
        match unquoted_range(whole) {
            Some(range) => self.bind_text_groups(text, c, range.start as usize, range.slice(whole)),
            None => self.bind_text_groups(text, c, 0, whole),
        }
    }

    /// Bind each regex group of `body` to its variable as a window of
    /// `node`'s text; `offset` is where `body` starts in that text.
    fn bind_text_groups(
        &mut self,
        text: &TextSubstitution,
        node: NodeId,
        offset: usize,
        body: &str,
    ) -> bool {
        let Some(groups) = text.groups(body) else {
            return false;
        };
        let pattern = self.pattern();
        for (name, group) in text.variables().iter().zip(groups) {
            let Some(handler) = pattern.variable(name) else {
                return false;
            };
            let bound = match group {
                Some((start, len)) => {
                    match (u32::try_from(offset + start), u32::try_from(len)) {
                        (Ok(start), Ok(len)) => {
                            handler.handle_range(node, TextRange::new(start, len), &mut self.ctx)
                        }
                        _ => false,
                    }
                }
                None => handler.handle(None, &mut self.ctx),
            };
            if !bound {
                return false;
            }
        }
        true
    }

    /// Doc tag: name, then value; a missing candidate value matches an
    /// optional variable.
    pub(super) fn match_doc_tag(&mut self, p: NodeId, c: NodeId) -> bool {
        if !self.same_kind(p, c) {
            return false;
        }
        let (pt, ct) = (self.pt(), self.ct());
        let (Some(pn), Some(cn)) = (pt.child(p, Role::Name), ct.child(c, Role::Name)) else {
            return false;
        };
        let named = match self.pattern().substitution(pn) {
            Some(handler) => handler.handle(Some(cn), &mut self.ctx),
            None => self.match_text(pn, cn),
        };
        named && self.match_slot(p, c, Role::Value)
    }
}

/// Offset and text of a comment without its delimiters.
fn comment_body(text: &str) -> (usize, &str) {
    let len = text.len();
    if text.starts_with("/**") && text.ends_with("*/") && len >= 5 {
        (3, &text[3..len - 2])
    } else if text.starts_with("/*") && text.ends_with("*/") && len >= 4 {
        (2, &text[2..len - 2])
    } else if let Some(body) = text.strip_prefix("//") {
        (2, body)
    } else {
        (0, text)
    }
}

#[cfg(test)]
mod tests {
    use super::comment_body;

    #[test]
    fn delimiters_are_stripped() {
        assert_eq!(comment_body("// hi"), (2, " hi"));
        assert_eq!(comment_body("/* hi */"), (2, " hi "));
        assert_eq!(comment_body("/** doc */"), (3, " doc "));
        assert_eq!(comment_body("/**/"), (2, ""));
        assert_eq!(comment_body("plain"), (0, "plain"));
    }
}
