//! Error types for query compilation.

use thiserror::Error;

/// A specialized Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// The single error type raised by tokenizing, parsing and evaluator
/// construction.
///
/// The message describes what went wrong; `remaining_input` is the part of
/// the query that had not been consumed yet, suitable for a
/// "...stopped here" hint.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{kind}")]
pub struct QueryError {
    kind: QueryErrorKind,
    remaining_input: String,
}

/// What went wrong.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryErrorKind {
    /// A quoted string had no closing quote.
    #[error("unterminated string starting at position {position}")]
    UnterminatedString {
        /// Byte offset of the opening quote.
        position: usize,
    },

    /// The source keyword is not registered.
    #[error("unknown source: {keyword}{}", did_you_mean(.suggestion))]
    UnknownSource {
        keyword: String,
        suggestion: Option<String>,
    },

    /// A source kind that needs an argument was given none.
    #[error("source '{keyword}' requires an argument")]
    MissingSourceArgument { keyword: String },

    /// `user.<field>` named a field outside the catalogue.
    #[error("unknown user field: {name}{}", did_you_mean(.suggestion))]
    UnknownUserField {
        name: String,
        suggestion: Option<String>,
    },

    /// `<account>.<relation>` named an unknown relation.
    #[error("unknown relation: {name}")]
    UnknownRelation { name: String },

    /// A bare literal matched nothing in the value catalogues.
    #[error("unknown token: {literal}{}", did_you_mean(.suggestion))]
    UnknownToken {
        literal: String,
        suggestion: Option<String>,
    },

    /// A numeric literal or `#id` could not be parsed as a 64-bit integer.
    #[error("invalid number: {text}")]
    InvalidNumber { text: String },

    /// The query ended where more input was required.
    #[error("unexpected end of query")]
    UnexpectedEnd,

    /// A specific token kind was required.
    #[error("expected {expected}, found {found}")]
    ExpectedToken { expected: String, found: String },

    /// A token appeared where it cannot be used.
    #[error("unexpected token: {token}")]
    UnexpectedToken { token: String },

    /// A closing bracket without a matching opening bracket.
    #[error("unbalanced bracket: {token}")]
    UnbalancedBracket { token: String },

    /// An operator was applied to operands it cannot handle.
    #[error("operator '{operator}' cannot be applied to {left} and {right}")]
    TypeMismatch {
        operator: String,
        left: String,
        right: String,
    },

    /// A unary operator or the query root received the wrong operand type.
    #[error("expected {expected} expression, found {found}")]
    WrongType { expected: String, found: String },

    /// A set literal member is neither a number nor a user reference.
    #[error("set literal cannot contain {member}")]
    InvalidSetMember { member: String },

    /// A literal `match` pattern failed to compile.
    #[error("invalid regular expression '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

impl QueryError {
    /// Creates an error with the given kind and unconsumed input.
    pub fn new(kind: QueryErrorKind, remaining_input: impl Into<String>) -> Self {
        Self {
            kind,
            remaining_input: remaining_input.into(),
        }
    }

    /// Creates an error raised outside of any token stream (evaluator build).
    pub fn without_input(kind: QueryErrorKind) -> Self {
        Self::new(kind, String::new())
    }

    /// Returns the error kind.
    pub fn kind(&self) -> &QueryErrorKind {
        &self.kind
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    /// Returns the part of the query that had not been consumed.
    pub fn remaining_input(&self) -> &str {
        &self.remaining_input
    }

    /// Creates a type mismatch error for a binary operator.
    pub fn type_mismatch(
        operator: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self::without_input(QueryErrorKind::TypeMismatch {
            operator: operator.into(),
            left: left.into(),
            right: right.into(),
        })
    }

    /// Creates a wrong-type error for a unary position.
    pub fn wrong_type(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::without_input(QueryErrorKind::WrongType {
            expected: expected.into(),
            found: found.into(),
        })
    }
}
