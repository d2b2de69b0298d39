//! Abstract Syntax Tree (AST) for filter expressions.

use std::fmt;

use super::value::Value;

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOpKind {
    // ==================== Logical ====================
    /// `|`
    Or,
    /// `&`
    And,

    // ==================== Equality ====================
    /// `==`
    Equals,
    /// `!=`
    NotEquals,

    // ==================== Relational ====================
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,

    // ==================== Set / String ====================
    /// `->` or `contains`
    Contains,
    /// `<-` or `in`
    ContainedBy,
    /// `startswith`
    StartsWith,
    /// `endswith`
    EndsWith,
    /// `match` or `regex`
    Regex,

    // ==================== Arithmetic ====================
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
}

impl BinaryOpKind {
    /// The spelling used when serializing.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOpKind::Or => "|",
            BinaryOpKind::And => "&",
            BinaryOpKind::Equals => "==",
            BinaryOpKind::NotEquals => "!=",
            BinaryOpKind::LessThan => "<",
            BinaryOpKind::LessThanOrEqual => "<=",
            BinaryOpKind::GreaterThan => ">",
            BinaryOpKind::GreaterThanOrEqual => ">=",
            BinaryOpKind::Contains => "->",
            BinaryOpKind::ContainedBy => "<-",
            BinaryOpKind::StartsWith => "startswith",
            BinaryOpKind::EndsWith => "endswith",
            BinaryOpKind::Regex => "regex",
            BinaryOpKind::Add => "+",
            BinaryOpKind::Subtract => "-",
            BinaryOpKind::Multiply => "*",
            BinaryOpKind::Divide => "/",
        }
    }
}

impl fmt::Display for BinaryOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A prefix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOpKind {
    /// `!` logical not.
    Not,
    /// `-` arithmetic negation.
    Negate,
    /// `caseful`: string comparisons under it are case-sensitive.
    Caseful,
}

impl UnaryOpKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOpKind::Not => "!",
            UnaryOpKind::Negate => "-",
            UnaryOpKind::Caseful => "caseful",
        }
    }
}

/// A node of the expression tree.
///
/// Brackets are kept as nodes so that serializing a parsed tree reproduces
/// the same grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Node {
    BinaryOp {
        left: Box<Node>,
        right: Box<Node>,
        op: BinaryOpKind,
    },
    UnaryOp {
        operand: Box<Node>,
        op: UnaryOpKind,
    },
    /// A parenthesized expression; `inner: None` is `()`, which always holds.
    Bracket { inner: Option<Box<Node>> },
    /// `[a, b, ...]` with unique members in first-occurrence order.
    SetLiteral { values: Vec<Value> },
    ValueLeaf { value: Value },
}

impl Node {
    /// Creates a binary operator node.
    ///
    /// # Example
    ///
    /// ```
    /// use filter_query_rs::{BinaryOpKind, Node, Value};
    ///
    /// let node = Node::binary(
    ///     Node::value(Value::NumericImmediate(1)),
    ///     BinaryOpKind::Add,
    ///     Node::value(Value::NumericImmediate(2)),
    /// );
    /// assert_eq!(node.to_string(), "1 + 2");
    /// ```
    pub fn binary(left: Node, op: BinaryOpKind, right: Node) -> Self {
        Node::BinaryOp {
            left: Box::new(left),
            right: Box::new(right),
            op,
        }
    }

    /// Creates a prefix operator node.
    pub fn unary(op: UnaryOpKind, operand: Node) -> Self {
        Node::UnaryOp {
            operand: Box::new(operand),
            op,
        }
    }

    /// Wraps a node in brackets.
    pub fn bracket(inner: Node) -> Self {
        Node::Bracket {
            inner: Some(Box::new(inner)),
        }
    }

    /// The empty bracket `()`, used as the predicate of a query without one.
    pub fn always_true() -> Self {
        Node::Bracket { inner: None }
    }

    /// Creates a leaf node.
    pub fn value(value: Value) -> Self {
        Node::ValueLeaf { value }
    }

    /// Creates a set literal, dropping duplicate members.
    pub fn set(values: impl IntoIterator<Item = Value>) -> Self {
        let mut unique = Vec::new();
        for value in values {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }
        Node::SetLiteral { values: unique }
    }

    /// Returns true for the empty bracket `()`.
    pub fn is_always_true(&self) -> bool {
        matches!(self, Node::Bracket { inner: None })
    }

    /// Returns true if a `caseful` prefix occurs anywhere in this subtree.
    pub(crate) fn is_caseful(&self) -> bool {
        match self {
            Node::UnaryOp {
                op: UnaryOpKind::Caseful,
                ..
            } => true,
            Node::UnaryOp { operand, .. } => operand.is_caseful(),
            Node::BinaryOp { left, right, .. } => left.is_caseful() || right.is_caseful(),
            Node::Bracket { inner: Some(inner) } => inner.is_caseful(),
            _ => false,
        }
    }

    /// Returns the string immediate this node denotes, looking through
    /// brackets and `caseful`.
    pub(crate) fn as_string_immediate(&self) -> Option<&str> {
        match self {
            Node::ValueLeaf {
                value: Value::StringImmediate(s),
            } => Some(s),
            Node::Bracket { inner: Some(inner) } => inner.as_string_immediate(),
            Node::UnaryOp {
                op: UnaryOpKind::Caseful,
                operand,
            } => operand.as_string_immediate(),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    /// Renders the node in query syntax. Only `Bracket` nodes produce
    /// parentheses, so the output re-parses to an equal tree.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::BinaryOp { left, right, op } => write!(f, "{left} {op} {right}"),
            Node::UnaryOp {
                operand,
                op: UnaryOpKind::Caseful,
            } => write!(f, "caseful {operand}"),
            Node::UnaryOp { operand, op } => write!(f, "{}{operand}", op.symbol()),
            Node::Bracket { inner: None } => f.write_str("()"),
            Node::Bracket { inner: Some(inner) } => write!(f, "({inner})"),
            Node::SetLiteral { values } => {
                let members: Vec<_> = values.iter().map(Value::to_string).collect();
                write!(f, "[{}]", members.join(", "))
            }
            Node::ValueLeaf { value } => write!(f, "{value}"),
        }
    }
}
