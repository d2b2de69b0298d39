//! Lexer (tokenizer) for filter queries.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use super::error::{QueryError, QueryErrorKind, QueryResult};
use super::escape::{is_delimiter, is_query_whitespace, quote};

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `.`
    Period,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `!`
    Exclamation,

    /// A bare word.
    Literal,
    /// A double-quoted string, already unescaped.
    String,

    /// `&` or `&&`
    And,
    /// `|` or `||`
    Or,
    /// `==` or `=`
    Equals,
    /// `!=`
    NotEquals,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `->`
    Contains,
    /// `<-`
    ContainedBy,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Multiply,
    /// `/`
    Divide,

    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `[`
    OpenSquare,
    /// `]`
    CloseSquare,
}

impl TokenKind {
    /// The canonical spelling of a fixed-text token, or `None` for literals
    /// and strings.
    pub fn symbol(&self) -> Option<&'static str> {
        let symbol = match self {
            TokenKind::Period => ".",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Exclamation => "!",
            TokenKind::Literal | TokenKind::String => return None,
            TokenKind::And => "&",
            TokenKind::Or => "|",
            TokenKind::Equals => "==",
            TokenKind::NotEquals => "!=",
            TokenKind::LessThan => "<",
            TokenKind::LessThanOrEqual => "<=",
            TokenKind::GreaterThan => ">",
            TokenKind::GreaterThanOrEqual => ">=",
            TokenKind::Contains => "->",
            TokenKind::ContainedBy => "<-",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Multiply => "*",
            TokenKind::Divide => "/",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenSquare => "[",
            TokenKind::CloseSquare => "]",
        };
        Some(symbol)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            Some(symbol) => write!(f, "'{symbol}'"),
            None if *self == TokenKind::Literal => f.write_str("literal"),
            None => f.write_str("string"),
        }
    }
}

/// A token with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// The text of a literal or the unescaped contents of a string.
    pub value: Option<String>,
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
}

impl Token {
    fn symbol(kind: TokenKind, position: usize) -> Self {
        Self {
            kind,
            value: None,
            position,
        }
    }

    fn with_value(kind: TokenKind, value: String, position: usize) -> Self {
        Self {
            kind,
            value: Some(value),
            position,
        }
    }

    /// Returns the literal/string text, or an empty string for symbols.
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }

    /// Returns true if this is a literal equal to `keyword`, ignoring ASCII case.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Literal && self.text().eq_ignore_ascii_case(keyword)
    }
}

impl fmt::Display for Token {
    /// Renders the token the way it would be written in a query.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Literal => f.write_str(self.text()),
            TokenKind::String => f.write_str(&quote(self.text())),
            kind => f.write_str(kind.symbol().unwrap_or_default()),
        }
    }
}

/// Lexer for tokenizing filter queries.
///
/// The lexer is a lazy iterator; after it yields an error it yields nothing
/// more.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    suppress_errors: bool,
    failed: bool,
}

/// Tokenizes `input`.
///
/// With `suppress_errors`, an unterminated quoted string is returned as the
/// text up to end-of-input instead of an error.
///
/// # Example
///
/// ```
/// use filter_query_rs::{tokenize, TokenKind};
///
/// let kinds: Vec<_> = tokenize("user.verified & !rt", false)
///     .map(|t| t.unwrap().kind)
///     .collect();
/// assert_eq!(
///     kinds,
///     vec![
///         TokenKind::Literal,
///         TokenKind::Period,
///         TokenKind::Literal,
///         TokenKind::And,
///         TokenKind::Exclamation,
///         TokenKind::Literal,
///     ]
/// );
/// ```
pub fn tokenize(input: &str, suppress_errors: bool) -> Lexer<'_> {
    Lexer::new(input, suppress_errors)
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str, suppress_errors: bool) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            suppress_errors,
            failed: false,
        }
    }

    /// Peeks at the next character without consuming it.
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Consumes the next character if it equals `expected`.
    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(is_query_whitespace) {
            self.chars.next();
        }
    }

    /// Reads a quoted string; the opening quote has been consumed.
    fn read_string(&mut self, start: usize) -> QueryResult<Token> {
        let mut value = String::new();
        while let Some((_, c)) = self.chars.next() {
            match c {
                '"' => return Ok(Token::with_value(TokenKind::String, value, start)),
                '\\' => match self.peek() {
                    Some(escaped @ ('"' | '\\')) => {
                        self.chars.next();
                        value.push(escaped);
                    }
                    _ => value.push('\\'),
                },
                c => value.push(c),
            }
        }

        if self.suppress_errors {
            Ok(Token::with_value(TokenKind::String, value, start))
        } else {
            Err(QueryError::new(
                QueryErrorKind::UnterminatedString { position: start },
                &self.input[start..],
            ))
        }
    }

    /// Reads a bare literal starting at `start`.
    fn read_literal(&mut self, start: usize) -> Token {
        let mut end = self.input.len();
        while let Some(&(index, c)) = self.chars.peek() {
            if is_delimiter(c) {
                end = index;
                break;
            }
            self.chars.next();
        }
        Token::with_value(TokenKind::Literal, self.input[start..end].to_string(), start)
    }

    /// Returns the next token, or None at end of input.
    fn next_token(&mut self) -> Option<QueryResult<Token>> {
        self.skip_whitespace();

        let &(start, c) = self.chars.peek()?;
        if is_delimiter(c) {
            self.chars.next();
        }

        let kind = match c {
            '"' => return Some(self.read_string(start)),
            '.' => TokenKind::Period,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '!' if self.eat('=') => TokenKind::NotEquals,
            '!' => TokenKind::Exclamation,
            '&' => {
                self.eat('&');
                TokenKind::And
            }
            '|' => {
                self.eat('|');
                TokenKind::Or
            }
            '=' => {
                self.eat('=');
                TokenKind::Equals
            }
            '<' if self.eat('=') => TokenKind::LessThanOrEqual,
            '<' if self.eat('-') => TokenKind::ContainedBy,
            '<' => TokenKind::LessThan,
            '>' if self.eat('=') => TokenKind::GreaterThanOrEqual,
            '>' => TokenKind::GreaterThan,
            '-' if self.eat('>') => TokenKind::Contains,
            '-' => TokenKind::Minus,
            '+' => TokenKind::Plus,
            '*' => TokenKind::Multiply,
            '/' => TokenKind::Divide,
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            '[' => TokenKind::OpenSquare,
            ']' => TokenKind::CloseSquare,
            _ => return Some(Ok(self.read_literal(start))),
        };
        Some(Ok(Token::symbol(kind, start)))
    }
}

impl Iterator for Lexer<'_> {
    type Item = QueryResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let token = self.next_token()?;
        self.failed = token.is_err();
        Some(token)
    }
}
