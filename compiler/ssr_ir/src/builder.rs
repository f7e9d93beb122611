//! Incremental syntax tree construction.
//!
//! Frontends lower their own trees through [`TreeBuilder::node`]; the typed
//! constructors cover the shapes the matcher knows about and synthesize a
//! plausible source text for composite nodes.

use crate::{NodeId, NodeKind, Role, SyntaxTree};

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// Builder for a [`SyntaxTree`].
#[derive(Debug, Default)]
pub struct TreeBuilder {
    tree: SyntaxTree,
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder {
            tree: SyntaxTree::new(),
        }
    }

    /// Finish building and hand out the tree.
    pub fn finish(self) -> SyntaxTree {
        self.tree
    }

    /// Read access to the tree built so far.
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// Generic node with explicit text.
    pub fn node(&mut self, kind: NodeKind, text: &str, children: &[(Role, NodeId)]) -> NodeId {
        self.tree.alloc(kind, text.into(), children)
    }

    /// Generic node whose text is its children's text joined by spaces.
    pub fn composite(&mut self, kind: NodeKind, children: &[(Role, NodeId)]) -> NodeId {
        let text = self.join(children.iter().map(|&(_, c)| c), " ");
        self.node(kind, &text, children)
    }

    /// Append `child` to an already built `parent` in slot `role`.
    ///
    /// The parent's text is left as is.
    pub fn attach(&mut self, parent: NodeId, role: Role, child: NodeId) {
        self.tree.attach(parent, role, child);
    }

    fn join(&self, ids: impl Iterator<Item = NodeId>, sep: &str) -> String {
        ids.map(|id| self.tree.text(id))
            .collect::<Vec<_>>()
            .join(sep)
    }

    fn list(&mut self, kind: NodeKind, open: &str, items: &[NodeId], close: &str) -> NodeId {
        let text = format!("{open}{}{close}", self.join(items.iter().copied(), ", "));
        let children: Vec<_> = items.iter().map(|&i| (Role::Element, i)).collect();
        self.node(kind, &text, &children)
    }

    // Leaves

    pub fn identifier(&mut self, name: &str) -> NodeId {
        self.node(NodeKind::Identifier, name, &[])
    }

    pub fn keyword(&mut self, keyword: &str) -> NodeId {
        self.node(NodeKind::Keyword, keyword, &[])
    }

    pub fn token(&mut self, text: &str) -> NodeId {
        self.node(NodeKind::Token, text, &[])
    }

    /// Literal with its source spelling (`"hi"`, `'c'`, `42`).
    pub fn literal(&mut self, text: &str) -> NodeId {
        self.node(NodeKind::Literal, text, &[])
    }

    /// Comment; the kind follows from the delimiter.
    pub fn comment(&mut self, text: &str) -> NodeId {
        let kind = if text.starts_with("/**") {
            NodeKind::DocComment
        } else if text.starts_with("/*") {
            NodeKind::BlockComment
        } else {
            NodeKind::LineComment
        };
        self.node(kind, text, &[])
    }

    pub fn doc_comment(&mut self, text: &str, tags: &[NodeId]) -> NodeId {
        let children: Vec<_> = tags.iter().map(|&t| (Role::Element, t)).collect();
        self.node(NodeKind::DocComment, text, &children)
    }

    /// Doc tag such as `@param x`; `name` includes the `@`.
    pub fn doc_tag(&mut self, name: &str, value: Option<&str>) -> NodeId {
        let name_id = self.identifier(name);
        let mut children = vec![(Role::Name, name_id)];
        let text = match value {
            Some(v) => {
                children.push((Role::Value, self.token(v)));
                format!("{name} {v}")
            }
            None => name.to_owned(),
        };
        self.node(NodeKind::DocTag, &text, &children)
    }

    // Types

    /// Possibly qualified reference such as `java.util.List`.
    pub fn reference_element(&mut self, qualified: &str) -> NodeId {
        match qualified.rsplit_once('.') {
            Some((qualifier, name)) => {
                let qualifier = self.reference_element(qualifier);
                let name = self.identifier(name);
                self.node(
                    NodeKind::ReferenceElement,
                    qualified,
                    &[(Role::Qualifier, qualifier), (Role::Name, name)],
                )
            }
            None => {
                let name = self.identifier(qualified);
                self.node(NodeKind::ReferenceElement, qualified, &[(Role::Name, name)])
            }
        }
    }

    /// Reference with type arguments, `List<String>`.
    pub fn generic_reference(&mut self, qualified: &str, args: &[NodeId]) -> NodeId {
        let base = self.reference_element(qualified);
        let list = self.list(NodeKind::TypeArgumentList, "<", args, ">");
        let text = format!("{qualified}{}", self.tree.text(list));
        self.tree.attach(base, Role::TypeArguments, list);
        self.retext(base, &text);
        base
    }

    /// Type element wrapping a component with `dims` array dimensions.
    pub fn type_element(&mut self, component: NodeId, dims: u32) -> NodeId {
        let brackets = "[]".repeat(dims as usize);
        let text = format!("{}{brackets}", self.tree.text(component));
        let mut children = vec![(Role::Element, component)];
        if dims > 0 {
            children.push((Role::Dims, self.token(&brackets)));
        }
        self.node(NodeKind::TypeElement, &text, &children)
    }

    /// Type by name: primitive keyword or class reference.
    pub fn simple_type(&mut self, name: &str) -> NodeId {
        self.array_type(name, 0)
    }

    pub fn array_type(&mut self, name: &str, dims: u32) -> NodeId {
        let component = if PRIMITIVES.contains(&name) {
            self.keyword(name)
        } else {
            self.reference_element(name)
        };
        self.type_element(component, dims)
    }

    pub fn type_parameter(&mut self, name: &str, bounds: &[NodeId]) -> NodeId {
        let name_id = self.identifier(name);
        let extends = self.reference_list(bounds);
        let text = if bounds.is_empty() {
            name.to_owned()
        } else {
            format!("{name} extends {}", self.tree.text(extends))
        };
        self.node(
            NodeKind::TypeParameter,
            &text,
            &[(Role::Name, name_id), (Role::Extends, extends)],
        )
    }

    pub fn type_parameter_list(&mut self, params: &[NodeId]) -> NodeId {
        self.list(NodeKind::TypeParameterList, "<", params, ">")
    }

    pub fn reference_list(&mut self, refs: &[NodeId]) -> NodeId {
        self.list(NodeKind::ReferenceList, "", refs, "")
    }

    // Declarations

    pub fn modifier_list(&mut self, keywords: &[&str], annotations: &[NodeId]) -> NodeId {
        let mut children: Vec<_> = annotations.iter().map(|&a| (Role::Element, a)).collect();
        for keyword in keywords {
            children.push((Role::Element, self.keyword(keyword)));
        }
        self.composite(NodeKind::ModifierList, &children)
    }

    pub fn annotation(&mut self, name: &str, pairs: &[NodeId]) -> NodeId {
        let reference = self.reference_element(name);
        let args = self.list(NodeKind::ArgumentList, "(", pairs, ")");
        let text = if pairs.is_empty() {
            format!("@{name}")
        } else {
            format!("@{name}{}", self.tree.text(args))
        };
        self.node(
            NodeKind::Annotation,
            &text,
            &[(Role::Name, reference), (Role::Arguments, args)],
        )
    }

    /// Annotation attribute; `None` name is the implicit `value`.
    pub fn name_value_pair(&mut self, name: Option<&str>, value: NodeId) -> NodeId {
        let mut children = Vec::new();
        let text = match name {
            Some(n) => {
                children.push((Role::Name, self.identifier(n)));
                format!("{n} = {}", self.tree.text(value))
            }
            None => self.tree.text(value).to_owned(),
        };
        children.push((Role::Value, value));
        self.node(NodeKind::NameValuePair, &text, &children)
    }

    pub fn annotation_array(&mut self, values: &[NodeId]) -> NodeId {
        self.list(NodeKind::AnnotationArrayInitializer, "{", values, "}")
    }

    fn variable(
        &mut self,
        kind: NodeKind,
        modifiers: Option<NodeId>,
        ty: NodeId,
        name: &str,
        init: Option<NodeId>,
    ) -> NodeId {
        let name_id = self.identifier(name);
        let mut children = Vec::with_capacity(4);
        let mut text = String::new();
        if let Some(m) = modifiers {
            children.push((Role::Modifiers, m));
            if !self.tree.text(m).is_empty() {
                text.push_str(self.tree.text(m));
                text.push(' ');
            }
        }
        children.push((Role::Type, ty));
        children.push((Role::Name, name_id));
        text.push_str(&format!("{} {name}", self.tree.text(ty)));
        if let Some(i) = init {
            text.push_str(&format!(" = {}", self.tree.text(i)));
            children.push((Role::Initializer, i));
        }
        self.node(kind, &text, &children)
    }

    pub fn local_variable(&mut self, ty: NodeId, name: &str, init: Option<NodeId>) -> NodeId {
        self.variable(NodeKind::LocalVariable, None, ty, name, init)
    }

    pub fn field(
        &mut self,
        modifiers: NodeId,
        ty: NodeId,
        name: &str,
        init: Option<NodeId>,
    ) -> NodeId {
        self.variable(NodeKind::Field, Some(modifiers), ty, name, init)
    }

    pub fn parameter(&mut self, ty: NodeId, name: &str) -> NodeId {
        self.variable(NodeKind::Parameter, None, ty, name, None)
    }

    pub fn parameter_list(&mut self, params: &[NodeId]) -> NodeId {
        self.list(NodeKind::ParameterList, "(", params, ")")
    }

    /// C-style array brackets after a variable's name, `int x[][]`.
    pub fn c_style_dims(&mut self, variable: NodeId, dims: u32) {
        let token = self.token(&"[]".repeat(dims as usize));
        self.tree.attach(variable, Role::Dims, token);
    }

    /// Method declaration; `ret` is `None` for constructors.
    pub fn method(
        &mut self,
        modifiers: NodeId,
        ret: Option<NodeId>,
        name: &str,
        params: &[NodeId],
        throws: &[NodeId],
        body: Option<NodeId>,
    ) -> NodeId {
        let name_id = self.identifier(name);
        let params = self.parameter_list(params);
        let throws = self.reference_list(throws);
        let mut children = vec![(Role::Modifiers, modifiers)];
        if let Some(r) = ret {
            children.push((Role::Type, r));
        }
        children.push((Role::Name, name_id));
        children.push((Role::Parameters, params));
        children.push((Role::Throws, throws));
        if let Some(b) = body {
            children.push((Role::Body, b));
        }
        let ret_text = ret.map_or(String::new(), |r| format!("{} ", self.tree.text(r)));
        let text = format!("{ret_text}{name}{}", self.tree.text(params));
        self.node(NodeKind::Method, &text, &children)
    }

    /// Class declaration; `keyword` is `class`, `interface`, `enum` or `@interface`.
    pub fn class(
        &mut self,
        modifiers: NodeId,
        keyword: &str,
        name: &str,
        extends: &[NodeId],
        implements: &[NodeId],
        members: &[NodeId],
    ) -> NodeId {
        let keyword_id = self.keyword(keyword);
        let name_id = self.identifier(name);
        let extends = self.reference_list(extends);
        let implements = self.reference_list(implements);
        let mut children = vec![
            (Role::Modifiers, modifiers),
            (Role::ClassKeyword, keyword_id),
            (Role::Name, name_id),
            (Role::Extends, extends),
            (Role::Implements, implements),
        ];
        children.extend(members.iter().map(|&m| (Role::Member, m)));
        self.node(NodeKind::Class, &format!("{keyword} {name}"), &children)
    }

    pub fn anonymous_class(&mut self, members: &[NodeId]) -> NodeId {
        let children: Vec<_> = members.iter().map(|&m| (Role::Member, m)).collect();
        let text = format!("{{ {} }}", self.join(members.iter().copied(), " "));
        self.node(NodeKind::AnonymousClass, &text, &children)
    }

    pub fn class_initializer(&mut self, is_static: bool, body: NodeId) -> NodeId {
        let keywords: &[&str] = if is_static { &["static"] } else { &[] };
        let modifiers = self.modifier_list(keywords, &[]);
        self.composite(
            NodeKind::ClassInitializer,
            &[(Role::Modifiers, modifiers), (Role::Body, body)],
        )
    }

    // Statements

    pub fn code_block(&mut self, statements: &[NodeId]) -> NodeId {
        let text = format!("{{ {} }}", self.join(statements.iter().copied(), " "));
        let children: Vec<_> = statements.iter().map(|&s| (Role::Element, s)).collect();
        self.node(NodeKind::CodeBlock, &text, &children)
    }

    pub fn block_statement(&mut self, block: NodeId) -> NodeId {
        self.composite(NodeKind::BlockStatement, &[(Role::Body, block)])
    }

    pub fn expression_statement(&mut self, expr: NodeId) -> NodeId {
        let text = format!("{};", self.tree.text(expr));
        self.node(NodeKind::ExpressionStatement, &text, &[(Role::Expression, expr)])
    }

    pub fn declaration_statement(&mut self, declarations: &[NodeId]) -> NodeId {
        let text = format!("{};", self.join(declarations.iter().copied(), ", "));
        let children: Vec<_> = declarations.iter().map(|&d| (Role::Element, d)).collect();
        self.node(NodeKind::DeclarationStatement, &text, &children)
    }

    pub fn if_statement(&mut self, cond: NodeId, then: NodeId, els: Option<NodeId>) -> NodeId {
        let mut children = vec![(Role::Condition, cond), (Role::Then, then)];
        let mut text = format!("if ({}) {}", self.tree.text(cond), self.tree.text(then));
        if let Some(e) = els {
            text.push_str(&format!(" else {}", self.tree.text(e)));
            children.push((Role::Else, e));
        }
        self.node(NodeKind::If, &text, &children)
    }

    pub fn while_statement(&mut self, cond: NodeId, body: NodeId) -> NodeId {
        let text = format!("while ({}) {}", self.tree.text(cond), self.tree.text(body));
        self.node(
            NodeKind::While,
            &text,
            &[(Role::Condition, cond), (Role::Body, body)],
        )
    }

    pub fn for_statement(
        &mut self,
        init: Option<NodeId>,
        cond: Option<NodeId>,
        update: Option<NodeId>,
        body: NodeId,
    ) -> NodeId {
        let mut children = Vec::with_capacity(4);
        if let Some(i) = init {
            children.push((Role::Init, i));
        }
        if let Some(c) = cond {
            children.push((Role::Condition, c));
        }
        if let Some(u) = update {
            children.push((Role::Update, u));
        }
        children.push((Role::Body, body));
        self.composite(NodeKind::For, &children)
    }

    pub fn foreach(&mut self, param: NodeId, iterated: NodeId, body: NodeId) -> NodeId {
        let text = format!(
            "for ({} : {}) {}",
            self.tree.text(param),
            self.tree.text(iterated),
            self.tree.text(body)
        );
        self.node(
            NodeKind::Foreach,
            &text,
            &[
                (Role::Parameter, param),
                (Role::IteratedValue, iterated),
                (Role::Body, body),
            ],
        )
    }

    pub fn return_statement(&mut self, value: Option<NodeId>) -> NodeId {
        match value {
            Some(v) => {
                let text = format!("return {};", self.tree.text(v));
                self.node(NodeKind::Return, &text, &[(Role::Expression, v)])
            }
            None => self.node(NodeKind::Return, "return;", &[]),
        }
    }

    pub fn throw_statement(&mut self, value: NodeId) -> NodeId {
        let text = format!("throw {};", self.tree.text(value));
        self.node(NodeKind::Throw, &text, &[(Role::Expression, value)])
    }

    pub fn try_statement(
        &mut self,
        resources: Option<NodeId>,
        block: NodeId,
        catches: &[NodeId],
        finally: Option<NodeId>,
    ) -> NodeId {
        let mut children = Vec::with_capacity(catches.len() + 3);
        if let Some(r) = resources {
            children.push((Role::Resources, r));
        }
        children.push((Role::Body, block));
        children.extend(catches.iter().map(|&c| (Role::Catch, c)));
        if let Some(f) = finally {
            children.push((Role::Finally, f));
        }
        let text = format!("try {}", self.tree.text(block));
        self.node(NodeKind::Try, &text, &children)
    }

    pub fn catch_section(&mut self, param: NodeId, body: NodeId) -> NodeId {
        let text = format!("catch ({}) {}", self.tree.text(param), self.tree.text(body));
        self.node(
            NodeKind::CatchSection,
            &text,
            &[(Role::Parameter, param), (Role::Body, body)],
        )
    }

    pub fn resource_list(&mut self, resources: &[NodeId]) -> NodeId {
        self.list(NodeKind::ResourceList, "(", resources, ")")
    }

    // Expressions

    /// Reference expression, optionally qualified.
    pub fn reference(&mut self, qualifier: Option<NodeId>, name: &str) -> NodeId {
        let name_id = self.identifier(name);
        match qualifier {
            Some(q) => {
                let text = format!("{}.{name}", self.tree.text(q));
                self.node(
                    NodeKind::ReferenceExpression,
                    &text,
                    &[(Role::Qualifier, q), (Role::Name, name_id)],
                )
            }
            None => self.node(NodeKind::ReferenceExpression, name, &[(Role::Name, name_id)]),
        }
    }

    /// Unqualified reference expression.
    pub fn name_ref(&mut self, name: &str) -> NodeId {
        self.reference(None, name)
    }

    pub fn argument_list(&mut self, args: &[NodeId]) -> NodeId {
        self.list(NodeKind::ArgumentList, "(", args, ")")
    }

    pub fn method_call(&mut self, qualifier: Option<NodeId>, name: &str, args: &[NodeId]) -> NodeId {
        let name_id = self.identifier(name);
        let args = self.argument_list(args);
        let mut children = Vec::with_capacity(3);
        let mut text = String::new();
        if let Some(q) = qualifier {
            text.push_str(self.tree.text(q));
            text.push('.');
            children.push((Role::Qualifier, q));
        }
        text.push_str(name);
        text.push_str(self.tree.text(args));
        children.push((Role::Name, name_id));
        children.push((Role::Arguments, args));
        self.node(NodeKind::MethodCall, &text, &children)
    }

    /// Object creation, `new T(args) { body }`.
    pub fn new_object(&mut self, class: NodeId, args: &[NodeId], body: Option<NodeId>) -> NodeId {
        let args = self.argument_list(args);
        let mut text = format!("new {}{}", self.tree.text(class), self.tree.text(args));
        let mut children = vec![(Role::Type, class), (Role::Arguments, args)];
        if let Some(b) = body {
            text.push(' ');
            text.push_str(self.tree.text(b));
            children.push((Role::AnonymousBody, b));
        }
        self.node(NodeKind::New, &text, &children)
    }

    /// Array creation, `new T[d1][d2]` or `new T[]{...}`.
    pub fn new_array(
        &mut self,
        component: NodeId,
        dimensions: &[NodeId],
        init: Option<NodeId>,
    ) -> NodeId {
        let mut text = format!("new {}", self.tree.text(component));
        let mut children = vec![(Role::Type, component)];
        for &d in dimensions {
            text.push_str(&format!("[{}]", self.tree.text(d)));
            children.push((Role::Dimension, d));
        }
        if let Some(i) = init {
            if dimensions.is_empty() {
                text.push_str("[]");
            }
            text.push_str(self.tree.text(i));
            children.push((Role::ArrayInitializer, i));
        }
        self.node(NodeKind::New, &text, &children)
    }

    pub fn array_initializer(&mut self, values: &[NodeId]) -> NodeId {
        self.list(NodeKind::ArrayInitializer, "{", values, "}")
    }

    pub fn array_access(&mut self, array: NodeId, index: NodeId) -> NodeId {
        let text = format!("{}[{}]", self.tree.text(array), self.tree.text(index));
        self.node(
            NodeKind::ArrayAccess,
            &text,
            &[(Role::Array, array), (Role::Index, index)],
        )
    }

    /// Polyadic binary expression `a op b op c`.
    pub fn binary(&mut self, op: &str, operands: &[NodeId]) -> NodeId {
        let op_id = self.token(op);
        let text = self.join(operands.iter().copied(), &format!(" {op} "));
        let mut children = vec![(Role::Operator, op_id)];
        children.extend(operands.iter().map(|&o| (Role::Operand, o)));
        self.node(NodeKind::Binary, &text, &children)
    }

    pub fn assignment(&mut self, left: NodeId, op: &str, right: NodeId) -> NodeId {
        let op_id = self.token(op);
        let text = format!("{} {op} {}", self.tree.text(left), self.tree.text(right));
        self.node(
            NodeKind::Assignment,
            &text,
            &[(Role::Left, left), (Role::Operator, op_id), (Role::Right, right)],
        )
    }

    pub fn prefix(&mut self, op: &str, operand: NodeId) -> NodeId {
        let op_id = self.token(op);
        let text = format!("{op}{}", self.tree.text(operand));
        self.node(
            NodeKind::Prefix,
            &text,
            &[(Role::Operator, op_id), (Role::Operand, operand)],
        )
    }

    pub fn postfix(&mut self, operand: NodeId, op: &str) -> NodeId {
        let op_id = self.token(op);
        let text = format!("{}{op}", self.tree.text(operand));
        self.node(
            NodeKind::Postfix,
            &text,
            &[(Role::Operand, operand), (Role::Operator, op_id)],
        )
    }

    pub fn conditional(&mut self, cond: NodeId, then: NodeId, els: NodeId) -> NodeId {
        let text = format!(
            "{} ? {} : {}",
            self.tree.text(cond),
            self.tree.text(then),
            self.tree.text(els)
        );
        self.node(
            NodeKind::Conditional,
            &text,
            &[(Role::Condition, cond), (Role::Then, then), (Role::Else, els)],
        )
    }

    pub fn parenthesized(&mut self, inner: NodeId) -> NodeId {
        let text = format!("({})", self.tree.text(inner));
        self.node(NodeKind::Parenthesized, &text, &[(Role::Expression, inner)])
    }

    pub fn type_cast(&mut self, ty: NodeId, operand: NodeId) -> NodeId {
        let text = format!("({}) {}", self.tree.text(ty), self.tree.text(operand));
        self.node(
            NodeKind::TypeCast,
            &text,
            &[(Role::Type, ty), (Role::Expression, operand)],
        )
    }

    pub fn instance_of(&mut self, operand: NodeId, ty: NodeId) -> NodeId {
        let text = format!("{} instanceof {}", self.tree.text(operand), self.tree.text(ty));
        self.node(
            NodeKind::InstanceOf,
            &text,
            &[(Role::Expression, operand), (Role::Type, ty)],
        )
    }

    pub fn this_expr(&mut self) -> NodeId {
        self.node(NodeKind::This, "this", &[])
    }

    pub fn super_expr(&mut self) -> NodeId {
        self.node(NodeKind::Super, "super", &[])
    }

    pub fn class_object_access(&mut self, ty: NodeId) -> NodeId {
        let text = format!("{}.class", self.tree.text(ty));
        self.node(NodeKind::ClassObjectAccess, &text, &[(Role::Type, ty)])
    }

    /// Lambda; `params` is `None` for the bare-identifier form.
    pub fn lambda(&mut self, params: Option<NodeId>, body: NodeId) -> NodeId {
        let mut children = Vec::with_capacity(2);
        let params_text = match params {
            Some(p) => {
                children.push((Role::Parameters, p));
                self.tree.text(p).to_owned()
            }
            None => "()".to_owned(),
        };
        children.push((Role::Body, body));
        let text = format!("{params_text} -> {}", self.tree.text(body));
        self.node(NodeKind::Lambda, &text, &children)
    }

    fn retext(&mut self, id: NodeId, text: &str) {
        self.tree.set_text(id, text);
    }
}

#[cfg(test)]
mod tests;
