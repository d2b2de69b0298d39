//! Source registry and the `from` clause parser.
//!
//! A source names the timeline a query draws items from. The set of kinds is
//! closed; keywords are looked up case-sensitively in the kind catalogue.

use std::fmt;

use super::catalogue::Catalogue;
use super::cursor::TokenCursor;
use super::error::{QueryErrorKind, QueryResult};
use super::escape::quote;
use super::lexer::TokenKind;
use super::suggest::find_similar;

/// The kind of timeline a source descriptor requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Everything already stored locally.
    Local,
    /// The home timeline of one or all accounts.
    Home,
    /// Mentions and replies.
    Mentions,
    /// Direct messages.
    Messages,
    /// Favorited statuses.
    Favorites,
    /// Members of a list (`owner/slug`).
    List,
    /// Search results.
    Search,
    /// Keyword tracking on the streaming endpoint.
    Track,
    /// A single user's timeline.
    UserTimeline,
    /// A conversation rooted at a status id.
    Conversation,
}

impl SourceKind {
    /// Every source kind, in canonical order.
    pub const ALL: [SourceKind; 10] = [
        SourceKind::Local,
        SourceKind::Home,
        SourceKind::Mentions,
        SourceKind::Messages,
        SourceKind::Favorites,
        SourceKind::List,
        SourceKind::Search,
        SourceKind::Track,
        SourceKind::UserTimeline,
        SourceKind::Conversation,
    ];

    /// Looks up a source keyword. Keywords are case-sensitive.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::lookup(keyword)
    }

    /// All keywords that select this kind; the first is canonical.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            SourceKind::Local => &["local", "*", "all"],
            SourceKind::Home => &["home"],
            SourceKind::Mentions => &["mentions", "mention", "reply", "replies"],
            SourceKind::Messages => &["messages", "message", "dm", "dms"],
            SourceKind::Favorites => &["favorites", "favorite", "fav", "favs"],
            SourceKind::List => &["list"],
            SourceKind::Search => &["search", "find"],
            SourceKind::Track => &["track", "stream"],
            SourceKind::UserTimeline => &["user", "users"],
            SourceKind::Conversation => &["conversation", "conv"],
        }
    }

    /// The keyword used when serializing.
    pub fn keyword(&self) -> &'static str {
        self.keywords()[0]
    }

    /// Returns true if a descriptor of this kind is meaningless without an
    /// argument.
    pub fn requires_argument(&self) -> bool {
        matches!(
            self,
            SourceKind::List
                | SourceKind::Search
                | SourceKind::Track
                | SourceKind::UserTimeline
                | SourceKind::Conversation
        )
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One requested source: a kind plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceDescriptor {
    pub kind: SourceKind,
    pub arguments: Vec<String>,
}

impl SourceDescriptor {
    /// Creates a descriptor with no arguments.
    pub fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            arguments: Vec::new(),
        }
    }

    /// Creates a descriptor with a single argument.
    pub fn with_argument(kind: SourceKind, argument: impl Into<String>) -> Self {
        Self {
            kind,
            arguments: vec![argument.into()],
        }
    }

    /// The implicit source of a query without a `from` clause.
    pub fn local() -> Self {
        Self::new(SourceKind::Local)
    }
}

impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.keyword())?;
        if !self.arguments.is_empty() {
            let args: Vec<_> = self.arguments.iter().map(|a| quote(a)).collect();
            write!(f, ": {}", args.join(", "))?;
        }
        Ok(())
    }
}

/// Parses `source ("," source)*`; the `from` keyword has been consumed.
pub(crate) fn parse_source_list(cursor: &mut TokenCursor) -> QueryResult<Vec<SourceDescriptor>> {
    let mut sources = Vec::new();

    loop {
        let keyword_token = cursor.peek()?;
        let keyword = match keyword_token.kind {
            TokenKind::Literal => keyword_token.text().to_string(),
            TokenKind::Multiply => "*".to_string(),
            _ => {
                return Err(cursor.error(QueryErrorKind::ExpectedToken {
                    expected: "source".to_string(),
                    found: keyword_token.to_string(),
                }))
            }
        };

        let Some(kind) = SourceKind::from_keyword(&keyword) else {
            return Err(cursor.error(QueryErrorKind::UnknownSource {
                suggestion: find_similar(&keyword, SourceKind::all_spellings()),
                keyword,
            }));
        };
        cursor.next()?;

        if !cursor.check(TokenKind::Colon) {
            if kind.requires_argument() {
                return Err(cursor.error(QueryErrorKind::MissingSourceArgument { keyword }));
            }
            sources.push(SourceDescriptor::new(kind));
            if !cursor.check(TokenKind::Comma) {
                return Ok(sources);
            }
            cursor.next()?;
            continue;
        }
        cursor.next()?;

        // First argument may be bare; continuations must be quoted so that a
        // bare word after a comma starts the next source.
        sources.push(SourceDescriptor::with_argument(kind, parse_argument(cursor, true)?));
        loop {
            if !cursor.check(TokenKind::Comma) {
                return Ok(sources);
            }
            cursor.next()?;
            if !cursor.check(TokenKind::String) {
                break;
            }
            sources.push(SourceDescriptor::with_argument(kind, parse_argument(cursor, false)?));
        }
    }
}

/// Parses one argument; dotted parts (`"owner"."slug"`) are joined with `/`.
fn parse_argument(cursor: &mut TokenCursor, allow_bare: bool) -> QueryResult<String> {
    let mut parts = vec![parse_argument_part(cursor, allow_bare)?];
    while cursor.check(TokenKind::Period) {
        cursor.next()?;
        parts.push(parse_argument_part(cursor, true)?);
    }
    Ok(parts.join("/"))
}

fn parse_argument_part(cursor: &mut TokenCursor, allow_bare: bool) -> QueryResult<String> {
    let token = cursor.peek()?;
    let accepted = token.kind == TokenKind::String || (allow_bare && token.kind == TokenKind::Literal);
    if !accepted {
        return Err(cursor.error(QueryErrorKind::ExpectedToken {
            expected: "source argument".to_string(),
            found: token.to_string(),
        }));
    }
    Ok(cursor.next()?.text().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse(input: &str) -> QueryResult<Vec<SourceDescriptor>> {
        let tokens = tokenize(input, false).collect::<QueryResult<_>>()?;
        let mut cursor = TokenCursor::new(tokens);
        parse_source_list(&mut cursor)
    }

    #[test]
    fn test_keyword_aliases() {
        for keyword in ["mention", "mentions", "reply", "replies"] {
            assert_eq!(SourceKind::from_keyword(keyword), Some(SourceKind::Mentions));
        }
        for keyword in ["*", "local", "all"] {
            assert_eq!(SourceKind::from_keyword(keyword), Some(SourceKind::Local));
        }
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(SourceKind::from_keyword("Home"), None);
    }

    #[test]
    fn test_every_keyword_round_trips() {
        for kind in SourceKind::ALL {
            for keyword in kind.keywords() {
                assert_eq!(SourceKind::from_keyword(keyword), Some(kind));
            }
        }
    }

    #[test]
    fn test_parse_single_source() {
        assert_eq!(parse("home").unwrap(), vec![SourceDescriptor::new(SourceKind::Home)]);
    }

    #[test]
    fn test_parse_star_source() {
        assert_eq!(parse("*").unwrap(), vec![SourceDescriptor::local()]);
    }

    #[test]
    fn test_parse_multiple_sources() {
        assert_eq!(
            parse("home, mentions").unwrap(),
            vec![
                SourceDescriptor::new(SourceKind::Home),
                SourceDescriptor::new(SourceKind::Mentions),
            ]
        );
    }

    #[test]
    fn test_each_argument_yields_a_descriptor() {
        assert_eq!(
            parse(r#"list: "a/x", "b/y""#).unwrap(),
            vec![
                SourceDescriptor::with_argument(SourceKind::List, "a/x"),
                SourceDescriptor::with_argument(SourceKind::List, "b/y"),
            ]
        );
    }

    #[test]
    fn test_dotted_argument_joined() {
        assert_eq!(
            parse(r#"home, list: "user"."slug""#).unwrap(),
            vec![
                SourceDescriptor::new(SourceKind::Home),
                SourceDescriptor::with_argument(SourceKind::List, "user/slug"),
            ]
        );
    }

    #[test]
    fn test_bare_word_after_arguments_starts_next_source() {
        assert_eq!(
            parse(r#"search: "rust", home"#).unwrap(),
            vec![
                SourceDescriptor::with_argument(SourceKind::Search, "rust"),
                SourceDescriptor::new(SourceKind::Home),
            ]
        );
    }

    #[test]
    fn test_bare_first_argument() {
        assert_eq!(
            parse("user: karno").unwrap(),
            vec![SourceDescriptor::with_argument(SourceKind::UserTimeline, "karno")]
        );
    }

    #[test]
    fn test_unknown_source() {
        let err = parse("bogus").unwrap_err();
        assert!(err.message().starts_with("unknown source: bogus"));
    }

    #[test]
    fn test_unknown_source_suggests() {
        let err = parse("hme").unwrap_err();
        assert_eq!(err.message(), "unknown source: hme (did you mean 'home'?)");
    }

    #[test]
    fn test_required_argument_missing() {
        let err = parse("list").unwrap_err();
        assert_eq!(*err.kind(), QueryErrorKind::MissingSourceArgument { keyword: "list".to_string() });
    }

    #[test]
    fn test_optional_argument() {
        assert_eq!(
            parse(r#"home: "karno""#).unwrap(),
            vec![SourceDescriptor::with_argument(SourceKind::Home, "karno")]
        );
    }

    #[test]
    fn test_trailing_comma_fails() {
        let err = parse("home,").unwrap_err();
        assert_eq!(*err.kind(), QueryErrorKind::UnexpectedEnd);
    }

    #[test]
    fn test_descriptor_display() {
        let descriptor = SourceDescriptor::with_argument(SourceKind::Search, "say \"hi\"");
        assert_eq!(descriptor.to_string(), r#"search: "say \"hi\"""#);
        assert_eq!(SourceDescriptor::new(SourceKind::Mentions).to_string(), "mentions");
    }
}
