//! Forward-only reader over a token list.

use super::error::{QueryError, QueryErrorKind, QueryResult};
use super::lexer::{Token, TokenKind};

/// A cursor over materialized tokens with one token of lookahead.
#[derive(Debug, Clone)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenCursor {
    /// Wraps a token list.
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Returns the current token without consuming it, or None at the end.
    pub fn try_peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    /// Returns the kind of the current token, if any.
    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.try_peek().map(|t| t.kind)
    }

    /// Returns true if the current token has the given kind.
    pub fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    /// Returns true if the current token is the literal `keyword` (any case).
    pub fn check_keyword(&self, keyword: &str) -> bool {
        self.try_peek().is_some_and(|t| t.is_keyword(keyword))
    }

    /// Returns the current token without consuming it.
    ///
    /// # Errors
    ///
    /// Returns an "unexpected end of query" error if the tokens are exhausted.
    pub fn peek(&self) -> QueryResult<&Token> {
        self.try_peek()
            .ok_or_else(|| self.error(QueryErrorKind::UnexpectedEnd))
    }

    /// Consumes and returns the current token.
    ///
    /// # Errors
    ///
    /// Returns an "unexpected end of query" error if the tokens are exhausted.
    pub fn next(&mut self) -> QueryResult<Token> {
        let token = self.peek()?.clone();
        self.position += 1;
        Ok(token)
    }

    /// Consumes the current token, requiring it to be of `kind`.
    ///
    /// # Errors
    ///
    /// Returns "unexpected end of query" at the end of input, or
    /// "expected <kind>, found <token>" on a mismatch. The mismatched token is
    /// not consumed.
    pub fn expect(&mut self, kind: TokenKind) -> QueryResult<Token> {
        let found = self.peek()?;
        if found.kind != kind {
            return Err(self.error(QueryErrorKind::ExpectedToken {
                expected: kind.to_string(),
                found: found.to_string(),
            }));
        }
        self.next()
    }

    /// Returns true if any tokens remain.
    pub fn has_more(&self) -> bool {
        self.position < self.tokens.len()
    }

    /// Renders the unconsumed tokens joined by single spaces.
    pub fn remaining_text(&self) -> String {
        self.tokens[self.position..]
            .iter()
            .map(Token::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Creates an error carrying the unconsumed input.
    pub fn error(&self, kind: QueryErrorKind) -> QueryError {
        QueryError::new(kind, self.remaining_text())
    }
}
