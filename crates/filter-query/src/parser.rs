//! Recursive descent parser for filter queries.

use super::ast::{BinaryOpKind, Node, UnaryOpKind};
use super::catalogue::Catalogue;
use super::cursor::TokenCursor;
use super::error::{QueryErrorKind, QueryResult};
use super::lexer::{tokenize, Token, TokenKind};
use super::source::{parse_source_list, SourceDescriptor};
use super::suggest::find_similar;
use super::value::{relation_from_name, AccountSelector, StatusField, UserField, Value};

/// Parser for filter queries.
///
/// # Grammar
///
/// ```text
/// query      ::= "from" sources ("where" expr)? | "where" expr | expr | ε
/// expr       ::= L0
/// L0         ::= L1 ("|" L0)?
/// L1         ::= L2 ("&" L1)?
/// L2         ::= L3 (("==" | "!=") L2)?
/// L3         ::= L4 (("<" | "<=" | ">" | ">=") L3)?
/// L4         ::= L5 (("->" | "<-" | "contains" | "in" | "startswith"
///                    | "endswith" | "match" | "regex") L4)?
/// L5         ::= L6 (("+" | "-") L5)?
/// L6         ::= L7 (("*" | "/") L6)?
/// L7         ::= ("!" | "-" | "caseful") L7 | L8
/// L8         ::= "(" expr? ")" | "[" (value ("," value)*)? "]" | value
/// ```
///
/// Every binary level recurses into itself for its right operand, so all
/// binary operators associate to the right: `10 - 3 - 2` is `10 - (3 - 2)`.
/// Persisted queries depend on this.
pub struct QueryParser {
    cursor: TokenCursor,
}

impl QueryParser {
    /// Tokenizes `input` strictly and wraps the tokens.
    fn new(input: &str) -> QueryResult<Self> {
        let tokens = tokenize(input, false).collect::<QueryResult<Vec<_>>>()?;
        Ok(Self {
            cursor: TokenCursor::new(tokens),
        })
    }

    /// Parses a full query into its sources and predicate tree.
    pub fn parse_query(input: &str) -> QueryResult<(Vec<SourceDescriptor>, Node)> {
        let mut parser = Self::new(input)?;

        let sources = if parser.cursor.check_keyword("from") {
            parser.cursor.next()?;
            let sources = parse_source_list(&mut parser.cursor)?;
            if parser.cursor.has_more() && !parser.cursor.check_keyword("where") {
                let found = parser.cursor.peek()?.to_string();
                return Err(parser.cursor.error(QueryErrorKind::ExpectedToken {
                    expected: "'where'".to_string(),
                    found,
                }));
            }
            sources
        } else {
            vec![SourceDescriptor::local()]
        };

        let root = parser.parse_predicate()?;
        Ok((sources, root))
    }

    /// Parses a `where`-style expression without a source clause.
    pub fn parse_predicate_only(input: &str) -> QueryResult<Node> {
        Self::new(input)?.parse_predicate()
    }

    /// Parses an optional `where`, then the expression, and requires that all
    /// input is consumed. No input yields the always-true node.
    fn parse_predicate(&mut self) -> QueryResult<Node> {
        if self.cursor.check_keyword("where") {
            self.cursor.next()?;
        } else if !self.cursor.has_more() {
            return Ok(Node::always_true());
        }

        let root = self.parse_expression()?;

        if let Some(token) = self.cursor.try_peek() {
            let kind = match token.kind {
                TokenKind::CloseParen | TokenKind::CloseSquare => QueryErrorKind::UnbalancedBracket {
                    token: token.to_string(),
                },
                _ => QueryErrorKind::UnexpectedToken {
                    token: token.to_string(),
                },
            };
            return Err(self.cursor.error(kind));
        }
        Ok(root)
    }

    fn parse_expression(&mut self) -> QueryResult<Node> {
        self.parse_or()
    }

    /// Consumes the current token if `matcher` maps it to an operator.
    fn take_operator(&mut self, matcher: fn(&Token) -> Option<BinaryOpKind>) -> QueryResult<Option<BinaryOpKind>> {
        let Some(op) = self.cursor.try_peek().and_then(matcher) else {
            return Ok(None);
        };
        self.cursor.next()?;
        Ok(Some(op))
    }

    /// Parses one binary level: `left (op this_level)?`.
    fn parse_level(
        &mut self,
        operand: fn(&mut Self) -> QueryResult<Node>,
        this_level: fn(&mut Self) -> QueryResult<Node>,
        matcher: fn(&Token) -> Option<BinaryOpKind>,
    ) -> QueryResult<Node> {
        let left = operand(self)?;
        match self.take_operator(matcher)? {
            Some(op) => {
                let right = this_level(self)?;
                Ok(Node::binary(left, op, right))
            }
            None => Ok(left),
        }
    }

    /// L0: `|`
    fn parse_or(&mut self) -> QueryResult<Node> {
        self.parse_level(Self::parse_and, Self::parse_or, |t| {
            (t.kind == TokenKind::Or).then_some(BinaryOpKind::Or)
        })
    }

    /// L1: `&`
    fn parse_and(&mut self) -> QueryResult<Node> {
        self.parse_level(Self::parse_equality, Self::parse_and, |t| {
            (t.kind == TokenKind::And).then_some(BinaryOpKind::And)
        })
    }

    /// L2: `==`, `!=`
    fn parse_equality(&mut self) -> QueryResult<Node> {
        self.parse_level(Self::parse_relational, Self::parse_equality, |t| match t.kind {
            TokenKind::Equals => Some(BinaryOpKind::Equals),
            TokenKind::NotEquals => Some(BinaryOpKind::NotEquals),
            _ => None,
        })
    }

    /// L3: `<`, `<=`, `>`, `>=`
    fn parse_relational(&mut self) -> QueryResult<Node> {
        self.parse_level(Self::parse_set, Self::parse_relational, |t| match t.kind {
            TokenKind::LessThan => Some(BinaryOpKind::LessThan),
            TokenKind::LessThanOrEqual => Some(BinaryOpKind::LessThanOrEqual),
            TokenKind::GreaterThan => Some(BinaryOpKind::GreaterThan),
            TokenKind::GreaterThanOrEqual => Some(BinaryOpKind::GreaterThanOrEqual),
            _ => None,
        })
    }

    /// L4: containment and string matching.
    fn parse_set(&mut self) -> QueryResult<Node> {
        self.parse_level(Self::parse_additive, Self::parse_set, |t| match t.kind {
            TokenKind::Contains => Some(BinaryOpKind::Contains),
            TokenKind::ContainedBy => Some(BinaryOpKind::ContainedBy),
            TokenKind::Literal => match t.text().to_ascii_lowercase().as_str() {
                "contains" => Some(BinaryOpKind::Contains),
                "in" => Some(BinaryOpKind::ContainedBy),
                "startswith" | "startwith" => Some(BinaryOpKind::StartsWith),
                "endswith" | "endwith" => Some(BinaryOpKind::EndsWith),
                "match" | "regex" => Some(BinaryOpKind::Regex),
                _ => None,
            },
            _ => None,
        })
    }

    /// L5: `+`, `-`
    fn parse_additive(&mut self) -> QueryResult<Node> {
        self.parse_level(Self::parse_multiplicative, Self::parse_additive, |t| match t.kind {
            TokenKind::Plus => Some(BinaryOpKind::Add),
            TokenKind::Minus => Some(BinaryOpKind::Subtract),
            _ => None,
        })
    }

    /// L6: `*`, `/`
    fn parse_multiplicative(&mut self) -> QueryResult<Node> {
        self.parse_level(Self::parse_unary, Self::parse_multiplicative, |t| match t.kind {
            TokenKind::Multiply => Some(BinaryOpKind::Multiply),
            TokenKind::Divide => Some(BinaryOpKind::Divide),
            _ => None,
        })
    }

    /// L7: prefix `!`, `-`, `caseful`.
    fn parse_unary(&mut self) -> QueryResult<Node> {
        let token = self.cursor.peek()?;
        let op = match token.kind {
            TokenKind::Exclamation => Some(UnaryOpKind::Not),
            TokenKind::Minus => Some(UnaryOpKind::Negate),
            TokenKind::Literal if token.is_keyword("caseful") => Some(UnaryOpKind::Caseful),
            _ => None,
        };

        match op {
            Some(op) => {
                self.cursor.next()?;
                let operand = self.parse_unary()?;
                Ok(Node::unary(op, operand))
            }
            None => self.parse_atom(),
        }
    }

    /// L8: brackets, set literals and values.
    fn parse_atom(&mut self) -> QueryResult<Node> {
        match self.cursor.peek()?.kind {
            TokenKind::OpenParen => {
                self.cursor.next()?;
                if self.cursor.check(TokenKind::CloseParen) {
                    self.cursor.next()?;
                    return Ok(Node::always_true());
                }
                let inner = self.parse_expression()?;
                self.cursor.expect(TokenKind::CloseParen)?;
                Ok(Node::bracket(inner))
            }
            TokenKind::OpenSquare => {
                self.cursor.next()?;
                let mut values = Vec::new();
                if !self.cursor.check(TokenKind::CloseSquare) {
                    values.push(self.parse_value()?);
                    while self.cursor.check(TokenKind::Comma) {
                        self.cursor.next()?;
                        values.push(self.parse_value()?);
                    }
                }
                self.cursor.expect(TokenKind::CloseSquare)?;
                Ok(Node::set(values))
            }
            _ => Ok(Node::value(self.parse_value()?)),
        }
    }

    // ==================== Value Resolution ====================

    /// Resolves the next token(s) into a value.
    fn parse_value(&mut self) -> QueryResult<Value> {
        let token = self.cursor.peek()?;
        match token.kind {
            TokenKind::String => {
                let token = self.cursor.next()?;
                Ok(Value::StringImmediate(token.value.unwrap_or_default()))
            }
            TokenKind::Multiply => {
                self.cursor.next()?;
                self.parse_account_suffix(AccountSelector::Any)
            }
            TokenKind::Literal => self.parse_literal_value(),
            TokenKind::CloseParen | TokenKind::CloseSquare => {
                let token = token.to_string();
                Err(self.cursor.error(QueryErrorKind::UnbalancedBracket { token }))
            }
            _ => {
                let token = token.to_string();
                Err(self.cursor.error(QueryErrorKind::UnexpectedToken { token }))
            }
        }
    }

    fn parse_literal_value(&mut self) -> QueryResult<Value> {
        let text = self.cursor.peek()?.text().to_string();
        let lower = text.to_ascii_lowercase();

        if text == "@" {
            self.cursor.next()?;
            self.cursor.expect(TokenKind::Period)?;
            let name = self.expect_name()?;
            return self.parse_account_suffix(AccountSelector::ScreenName(name));
        }
        if let Some(name) = text.strip_prefix('@') {
            let selector = AccountSelector::ScreenName(name.to_string());
            self.cursor.next()?;
            return self.parse_account_suffix(selector);
        }
        if let Some(digits) = text.strip_prefix('#') {
            let id = self.parse_number(digits)?;
            self.cursor.next()?;
            return self.parse_account_suffix(AccountSelector::Id(id));
        }

        match lower.as_str() {
            "we" | "our" | "us" => {
                self.cursor.next()?;
                self.parse_account_suffix(AccountSelector::Any)
            }
            "user" | "retweeter" => {
                self.cursor.next()?;
                self.parse_user_field(lower == "retweeter")
            }
            "list" => {
                self.cursor.next()?;
                self.cursor.expect(TokenKind::Period)?;
                let owner = self.expect_name()?;
                self.cursor.expect(TokenKind::Period)?;
                let slug = self.expect_name()?;
                Ok(Value::ListMembers { owner, slug })
            }
            _ if text.chars().all(|c| c.is_ascii_digit()) => {
                let number = self.parse_number(&text)?;
                self.cursor.next()?;
                Ok(Value::NumericImmediate(number))
            }
            _ => match StatusField::from_name(&text) {
                Some(field) => {
                    self.cursor.next()?;
                    Ok(Value::StatusField(field))
                }
                None => Err(self.cursor.error(QueryErrorKind::UnknownToken {
                    suggestion: find_similar(&text, StatusField::all_spellings()),
                    literal: text,
                })),
            },
        }
    }

    /// Parses `("." field)?` after `user` or `retweeter`.
    fn parse_user_field(&mut self, is_retweeter: bool) -> QueryResult<Value> {
        if !self.cursor.check(TokenKind::Period) {
            return Ok(Value::UserField {
                is_retweeter,
                field: None,
            });
        }
        self.cursor.next()?;

        let name = self.cursor.expect(TokenKind::Literal)?.value.unwrap_or_default();
        match UserField::from_name(&name) {
            Some(field) => Ok(Value::UserField {
                is_retweeter,
                field: Some(field),
            }),
            None => Err(self.cursor.error(QueryErrorKind::UnknownUserField {
                suggestion: find_similar(&name, UserField::all_spellings()),
                name,
            })),
        }
    }

    /// Parses `("." relation)?` after an account reference.
    fn parse_account_suffix(&mut self, selector: AccountSelector) -> QueryResult<Value> {
        if !self.cursor.check(TokenKind::Period) {
            return Ok(Value::LocalUser(selector));
        }
        self.cursor.next()?;

        let name = self.cursor.expect(TokenKind::Literal)?.value.unwrap_or_default();
        match relation_from_name(&name) {
            Some(relation) => Ok(Value::LocalUserRelation { selector, relation }),
            None => Err(self.cursor.error(QueryErrorKind::UnknownRelation { name })),
        }
    }

    /// Consumes a literal or string and returns its text.
    fn expect_name(&mut self) -> QueryResult<String> {
        let token = self.cursor.peek()?;
        if !matches!(token.kind, TokenKind::Literal | TokenKind::String) {
            let found = token.to_string();
            return Err(self.cursor.error(QueryErrorKind::ExpectedToken {
                expected: "name".to_string(),
                found,
            }));
        }
        Ok(self.cursor.next()?.value.unwrap_or_default())
    }

    fn parse_number(&self, text: &str) -> QueryResult<i64> {
        text.parse::<i64>().map_err(|_| {
            self.cursor.error(QueryErrorKind::InvalidNumber {
                text: text.to_string(),
            })
        })
    }
}
