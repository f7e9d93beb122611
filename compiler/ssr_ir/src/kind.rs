//! Structural node kinds and child roles.
//!
//! The matcher works on a fixed vocabulary of kinds. A frontend maps its own
//! syntax onto these; anything it cannot map is a `Token`.

use std::fmt;

/// Structural kind of a syntax node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    // Declarations
    Class,
    AnonymousClass,
    Method,
    Field,
    LocalVariable,
    Parameter,
    ParameterList,
    ClassInitializer,
    ModifierList,
    Annotation,
    NameValuePair,
    AnnotationArrayInitializer,
    TypeParameterList,
    TypeParameter,
    ReferenceList,

    // Types
    TypeElement,
    ReferenceElement,
    TypeArgumentList,

    // Leaves
    Identifier,
    Keyword,
    Token,
    Literal,
    LineComment,
    BlockComment,
    DocComment,
    DocTag,

    // Statements
    CodeBlock,
    BlockStatement,
    ExpressionStatement,
    DeclarationStatement,
    ExpressionList,
    If,
    While,
    DoWhile,
    For,
    Foreach,
    Return,
    Throw,
    Break,
    Continue,
    Assert,
    Synchronized,
    Switch,
    SwitchLabel,
    Try,
    CatchSection,
    ResourceList,
    EmptyStatement,

    // Expressions
    ReferenceExpression,
    MethodCall,
    ArgumentList,
    New,
    ArrayInitializer,
    ArrayAccess,
    /// Polyadic binary expression: operands interleaved with one operator.
    Binary,
    Assignment,
    Prefix,
    Postfix,
    Conditional,
    Parenthesized,
    TypeCast,
    InstanceOf,
    This,
    Super,
    ClassObjectAccess,
    Lambda,
}

impl NodeKind {
    /// Comment kinds are skipped by sequential matching unless the pattern
    /// asks for them.
    #[inline]
    pub const fn is_comment(self) -> bool {
        matches!(
            self,
            NodeKind::LineComment | NodeKind::BlockComment | NodeKind::DocComment
        )
    }

    /// Class members that participate in class content matching.
    #[inline]
    pub const fn is_member(self) -> bool {
        matches!(
            self,
            NodeKind::Field | NodeKind::Method | NodeKind::Class | NodeKind::ClassInitializer
        )
    }

    /// Declarations that introduce a named variable.
    #[inline]
    pub const fn is_variable(self) -> bool {
        matches!(
            self,
            NodeKind::Field | NodeKind::LocalVariable | NodeKind::Parameter
        )
    }

    #[inline]
    pub const fn is_type(self) -> bool {
        matches!(
            self,
            NodeKind::TypeElement | NodeKind::ReferenceElement | NodeKind::TypeParameter
        )
    }

    pub const fn is_statement(self) -> bool {
        matches!(
            self,
            NodeKind::CodeBlock
                | NodeKind::BlockStatement
                | NodeKind::ExpressionStatement
                | NodeKind::DeclarationStatement
                | NodeKind::ExpressionList
                | NodeKind::If
                | NodeKind::While
                | NodeKind::DoWhile
                | NodeKind::For
                | NodeKind::Foreach
                | NodeKind::Return
                | NodeKind::Throw
                | NodeKind::Break
                | NodeKind::Continue
                | NodeKind::Assert
                | NodeKind::Synchronized
                | NodeKind::Switch
                | NodeKind::SwitchLabel
                | NodeKind::Try
                | NodeKind::EmptyStatement
        )
    }

    pub const fn is_expression(self) -> bool {
        matches!(
            self,
            NodeKind::ReferenceExpression
                | NodeKind::MethodCall
                | NodeKind::New
                | NodeKind::ArrayInitializer
                | NodeKind::ArrayAccess
                | NodeKind::Binary
                | NodeKind::Assignment
                | NodeKind::Prefix
                | NodeKind::Postfix
                | NodeKind::Conditional
                | NodeKind::Parenthesized
                | NodeKind::TypeCast
                | NodeKind::InstanceOf
                | NodeKind::This
                | NodeKind::Super
                | NodeKind::ClassObjectAccess
                | NodeKind::Lambda
                | NodeKind::Literal
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The slot a child occupies inside its parent.
///
/// Sub-slots are looked up by role, so rules read like
/// "the initializer of this variable" instead of "child number three".
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    /// Root node, or an element of a homogeneous list.
    #[default]
    Element,
    Name,
    Qualifier,
    Type,
    Initializer,
    Modifiers,
    TypeParameters,
    TypeArguments,
    Extends,
    Implements,
    Throws,
    Parameters,
    Parameter,
    Body,
    Arguments,
    Condition,
    Then,
    Else,
    Init,
    Update,
    IteratedValue,
    Expression,
    Operand,
    Operator,
    Left,
    Right,
    Label,
    Value,
    Message,
    Lock,
    Index,
    Array,
    /// Bracket pairs: `[]` per dimension.
    Dims,
    /// A dimension expression of an array creation.
    Dimension,
    ArrayInitializer,
    AnonymousBody,
    Catch,
    Finally,
    Resources,
    Member,
    /// Leading comment attached to a declaration.
    Comment,
    /// `class`, `interface`, `enum` or `@interface`.
    ClassKeyword,
}
