//! Constraints a substitution handler checks before binding a candidate.
//!
//! # Design
//!
//! A closed enum rather than an open trait: the set of constraint kinds is
//! fixed, and `Not` needs to be recognizable by the hierarchy search.
//! Predicates are pure. They read the candidate tree and the semantic oracle
//! through the [`MatchContext`] and never touch the capture stack.

use regex::{Regex, RegexBuilder};
use ssr_ir::{ClassifierId, NodeId, TypeInfo};

use crate::hierarchy::HierarchyIterator;
use crate::text::TextRange;
use crate::{MatchContext, PatternError};

/// What a predicate is asked about.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Target {
    /// A candidate node, optionally restricted to a window of its text.
    Node(NodeId, Option<TextRange>),
    /// A classifier offered by a hierarchy search.
    Classifier(ClassifierId),
    /// The implicit `this` receiver of an unqualified instance member access,
    /// typed as the enclosing classifier when known.
    ImplicitThis(Option<ClassifierId>),
}

/// A boolean constraint over a candidate.
#[derive(Clone, Debug)]
pub enum Predicate {
    /// The candidate reference is read.
    Read,
    /// The candidate reference is written.
    Write,
    /// The candidate expression's static type matches.
    ExprType(TypePredicate),
    /// The type of the formal parameter the candidate is passed to matches.
    FormalArgType(TypePredicate),
    /// The candidate's text matches.
    RegExp(RegexPredicate),
    /// Inverts the wrapped predicate.
    Not(Box<Predicate>),
}

impl Predicate {
    /// Wrap `inner` in a negation.
    pub fn not(inner: Predicate) -> Self {
        Predicate::Not(Box::new(inner))
    }

    /// Regex predicate over the candidate text.
    pub fn regexp(pattern: &str, case_sensitive: bool) -> Result<Self, PatternError> {
        RegexPredicate::new(pattern, case_sensitive).map(Predicate::RegExp)
    }

    /// Expression type predicate.
    pub fn expr_type(
        pattern: &str,
        within_hierarchy: bool,
        case_sensitive: bool,
    ) -> Result<Self, PatternError> {
        TypePredicate::new(pattern, within_hierarchy, case_sensitive).map(Predicate::ExprType)
    }

    /// Formal argument type predicate.
    pub fn formal_arg_type(
        pattern: &str,
        within_hierarchy: bool,
        case_sensitive: bool,
    ) -> Result<Self, PatternError> {
        TypePredicate::new(pattern, within_hierarchy, case_sensitive).map(Predicate::FormalArgType)
    }

    /// Whether this is a negation at the top level.
    #[inline]
    pub fn is_negation(&self) -> bool {
        matches!(self, Predicate::Not(_))
    }

    /// The regex predicate this tree evaluates, looking through negation.
    pub fn find_regexp(&self) -> Option<&RegexPredicate> {
        match self {
            Predicate::RegExp(r) => Some(r),
            Predicate::Not(inner) => inner.find_regexp(),
            _ => None,
        }
    }

    /// Evaluate against `target`.
    pub fn evaluate(&self, target: Target, ctx: &MatchContext<'_>) -> bool {
        match self {
            Predicate::Read => match target {
                Target::Node(node, _) => ctx.semantics().access(ctx.tree(), node).is_read(),
                Target::ImplicitThis(_) => true,
                Target::Classifier(_) => false,
            },
            Predicate::Write => match target {
                Target::Node(node, _) => ctx.semantics().access(ctx.tree(), node).is_write(),
                Target::ImplicitThis(_) | Target::Classifier(_) => false,
            },
            Predicate::ExprType(ty) => match target {
                Target::Node(node, _) => ctx
                    .semantics()
                    .expr_type(ctx.tree(), node)
                    .is_some_and(|info| ty.matches_type(&info, ctx)),
                Target::Classifier(id) | Target::ImplicitThis(Some(id)) => {
                    ty.matches_classifier(id, 0, ctx)
                }
                Target::ImplicitThis(None) => false,
            },
            Predicate::FormalArgType(ty) => match target {
                Target::Node(node, _) => ctx
                    .semantics()
                    .formal_parameter_type(ctx.tree(), node)
                    .is_some_and(|info| ty.matches_type(&info, ctx)),
                Target::Classifier(_) | Target::ImplicitThis(_) => false,
            },
            Predicate::RegExp(re) => match target {
                Target::Node(node, range) => {
                    let text = ctx.predicate_text(node);
                    let window = match range {
                        Some(r) => r.slice(&text),
                        None => text.as_str(),
                    };
                    re.is_match(window)
                }
                Target::Classifier(id) => ctx
                    .semantics()
                    .classifier(id)
                    .is_some_and(|info| re.is_match(&info.name) || re.is_match(&info.qualified_name)),
                Target::ImplicitThis(_) => re.is_match("this"),
            },
            Predicate::Not(inner) => !inner.evaluate(target, ctx),
        }
    }
}

fn compile(pattern: &str, case_sensitive: bool) -> Result<Regex, PatternError> {
    RegexBuilder::new(&format!("^(?:{pattern})$"))
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|source| PatternError::InvalidRegex {
            pattern: pattern.to_owned(),
            source,
        })
}

/// Whole-text regular expression.
#[derive(Clone, Debug)]
pub struct RegexPredicate {
    pattern: String,
    regex: Regex,
}

impl RegexPredicate {
    pub fn new(pattern: &str, case_sensitive: bool) -> Result<Self, PatternError> {
        Ok(RegexPredicate {
            pattern: pattern.to_owned(),
            regex: compile(pattern, case_sensitive)?,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[inline]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Type-name pattern, optionally satisfied by any supertype.
///
/// A type matches when its presentable text or qualified name (with `[]`
/// per array dimension) matches the regex.
#[derive(Clone, Debug)]
pub struct TypePredicate {
    pattern: String,
    regex: Regex,
    within_hierarchy: bool,
}

impl TypePredicate {
    pub fn new(
        pattern: &str,
        within_hierarchy: bool,
        case_sensitive: bool,
    ) -> Result<Self, PatternError> {
        Ok(TypePredicate {
            pattern: pattern.to_owned(),
            regex: compile(pattern, case_sensitive)?,
            within_hierarchy,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn matches_type(&self, info: &TypeInfo, ctx: &MatchContext<'_>) -> bool {
        let brackets = "[]".repeat(info.dims as usize);
        if self.regex.is_match(&format!("{}{brackets}", info.text)) {
            return true;
        }
        info.classifier
            .is_some_and(|id| self.matches_classifier(id, info.dims, ctx))
    }

    fn matches_classifier(&self, id: ClassifierId, dims: u32, ctx: &MatchContext<'_>) -> bool {
        let brackets = "[]".repeat(dims as usize);
        let names_match = |id: ClassifierId| {
            ctx.semantics().classifier(id).is_some_and(|info| {
                self.regex.is_match(&format!("{}{brackets}", info.name))
                    || self.regex.is_match(&format!("{}{brackets}", info.qualified_name))
            })
        };
        if self.within_hierarchy {
            HierarchyIterator::new(ctx.semantics(), id, true, true, true).any(names_match)
        } else {
            names_match(id)
        }
    }
}
