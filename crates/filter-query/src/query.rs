//! The compiled query: sources plus predicate tree.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ast::Node;
use super::error::QueryResult;
use super::evaluator::Predicate;
use super::parser::QueryParser;
use super::source::SourceDescriptor;

/// A compiled filter query.
///
/// Holds the requested sources and the predicate tree. The evaluator is built
/// on first use and cached; the query can be shared between threads.
#[derive(Debug)]
pub struct FilterQuery {
    sources: Vec<SourceDescriptor>,
    root: Node,
    evaluator: OnceLock<QueryResult<Predicate>>,
}

/// Compiles a query string.
///
/// # Errors
///
/// Returns a [`QueryError`](crate::QueryError) describing the first problem
/// found, with the unconsumed part of the input attached.
///
/// # Example
///
/// ```
/// use filter_query_rs::compile;
///
/// let query = compile("from home, mentions where user.verified & !rt").unwrap();
/// assert_eq!(query.sources().len(), 2);
/// assert_eq!(
///     query.to_query_string(),
///     "from home, mentions where user.verified & !retweet"
/// );
/// ```
pub fn compile(text: &str) -> QueryResult<FilterQuery> {
    FilterQuery::compile(text)
}

/// Compiles a `where` clause on its own. Empty text yields the always-true
/// predicate.
pub fn compile_predicate_only(text: &str) -> QueryResult<Node> {
    QueryParser::parse_predicate_only(text)
}

impl FilterQuery {
    /// Compiles a query string. See [`compile`].
    pub fn compile(text: &str) -> QueryResult<Self> {
        let (sources, root) = QueryParser::parse_query(text)?;
        tracing::debug!(query = text, sources = sources.len(), "compiled filter query");
        Ok(Self::new(sources, root))
    }

    /// Creates a query from already-built parts.
    pub fn new(sources: Vec<SourceDescriptor>, root: Node) -> Self {
        Self {
            sources,
            root,
            evaluator: OnceLock::new(),
        }
    }

    /// The requested sources, in query order.
    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    /// The predicate tree.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Returns the evaluator, building and caching it on first call.
    ///
    /// A build failure is cached too; later calls return the same error.
    pub fn get_evaluator(&self) -> QueryResult<Predicate> {
        self.evaluator
            .get_or_init(|| Predicate::from_node(&self.root))
            .clone()
    }

    /// Serializes the query back to text that compiles to an equal query.
    pub fn to_query_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FilterQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sources: Vec<_> = self.sources.iter().map(SourceDescriptor::to_string).collect();
        write!(f, "from {}", sources.join(", "))?;
        if !self.root.is_always_true() {
            write!(f, " where {}", self.root)?;
        }
        Ok(())
    }
}

impl Clone for FilterQuery {
    /// Clones the sources and tree; the clone builds its own evaluator.
    fn clone(&self) -> Self {
        Self::new(self.sources.clone(), self.root.clone())
    }
}

impl PartialEq for FilterQuery {
    fn eq(&self, other: &Self) -> bool {
        self.sources == other.sources && self.root == other.root
    }
}

impl Eq for FilterQuery {}

impl FromStr for FilterQuery {
    type Err = crate::QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl Serialize for FilterQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_query_string())
    }
}

impl<'de> Deserialize<'de> for FilterQuery {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::compile(&text).map_err(serde::de::Error::custom)
    }
}
