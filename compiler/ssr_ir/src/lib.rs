//! Syntax tree abstraction for the structural matcher.
//!
//! The matcher never parses source text. Frontends lower their trees into a
//! [`SyntaxTree`] of [`NodeKind`]-tagged nodes and answer semantic questions
//! through [`Semantics`].
//!
//! # Design
//!
//! - Flat arena: nodes are addressed by [`NodeId`], children carry a [`Role`]
//! - Fixed kind vocabulary shared by pattern and candidate trees
//! - Semantic facts (types, resolution, usage) live behind a trait so the
//!   matcher works with whatever model the frontend has

mod builder;
mod kind;
mod modifiers;
mod node_id;
mod semantics;
mod tree;

pub use builder::TreeBuilder;
pub use kind::{NodeKind, Role};
pub use modifiers::Modifiers;
pub use node_id::NodeId;
pub use semantics::{
    Access, ClassifierId, ClassifierInfo, NoSemantics, SemanticModel, Semantics, Symbol,
    SymbolKind, TypeInfo,
};
pub use tree::{ClassFlavor, Node, SyntaxTree};
