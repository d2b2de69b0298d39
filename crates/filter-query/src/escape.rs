//! String escaping shared by the lexer and the serializer.
//!
//! The query language knows exactly two escape pairs inside quoted strings:
//! `\"` for a quote and `\\` for a backslash.

/// Characters that end a bare literal.
pub(crate) const DELIMITERS: &[char] = &[
    '"', '.', ',', ':', '!', '&', '|', '=', '<', '>', '-', '+', '*', '/', '(', ')', '[', ']',
];

/// Returns true for the whitespace the lexer skips.
pub(crate) fn is_query_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Returns true if `c` terminates a bare literal.
pub(crate) fn is_delimiter(c: char) -> bool {
    is_query_whitespace(c) || DELIMITERS.contains(&c)
}

/// Escapes backslashes and double quotes.
///
/// # Example
///
/// ```
/// use filter_query_rs::escape;
///
/// assert_eq!(escape(r#"a"b\c"#), r#"a\"b\\c"#);
/// ```
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escapes `s` and wraps it in double quotes.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", escape(s))
}

/// Returns true if `s` lexes back as a single bare literal.
pub(crate) fn is_bare_literal(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(is_delimiter)
}

/// Renders `s` bare when it survives re-lexing as one literal, quoted otherwise.
pub(crate) fn literal_or_quoted(s: &str) -> String {
    if is_bare_literal(s) {
        s.to_string()
    } else {
        quote(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_quote_and_backslash() {
        assert_eq!(escape(r#"a"b\c"#), r#"a\"b\\c"#);
        assert_eq!(quote(r#"a"b\c"#), r#""a\"b\\c""#);
    }

    #[test]
    fn test_escape_leaves_other_characters() {
        assert_eq!(escape("plain text\n"), "plain text\n");
    }

    #[test]
    fn test_bare_literal_detection() {
        assert!(is_bare_literal("karno"));
        assert!(is_bare_literal("snake_case"));
        assert!(!is_bare_literal("has space"));
        assert!(!is_bare_literal("dash-ed"));
        assert!(!is_bare_literal(""));
    }

    #[test]
    fn test_literal_or_quoted() {
        assert_eq!(literal_or_quoted("friends"), "friends");
        assert_eq!(literal_or_quoted("my list"), "\"my list\"");
    }
}
