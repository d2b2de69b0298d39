//! Filter query language for timeline statuses.
//!
//! This crate compiles textual queries such as
//! `from home, mentions where user.verified & !rt` into a list of timeline
//! sources and a predicate that can be evaluated against statuses, and
//! serializes compiled queries back to text.
//!
//! # Supported Syntax
//!
//! ## Sources
//! - `from home, mentions` - Comma separated source keywords
//! - `from list: "owner/slug"`, `from search: "rust", "tokio"` - Arguments
//! - No `from` clause - Everything stored locally
//!
//! ## Values
//! - `"text"` - Strings, with `\"` and `\\` escapes
//! - `123` - 64-bit integers
//! - `user.verified`, `retweeter.screen_name` - Author and retweeter fields
//! - `text`, `rt`, `mentions`, `via`, ... - Status fields
//! - `our`, `@name`, `#123` - Local accounts; `our.following` - Their relations
//! - `list.owner.slug` - List members
//! - `[1, 2, @name]` - Sets of user ids
//!
//! ## Operators (loosest first)
//! - `|`
//! - `&`
//! - `==` `!=`
//! - `<` `<=` `>` `>=`
//! - `->`/`contains`, `<-`/`in`, `startswith`, `endswith`, `match`/`regex`
//! - `+` `-`
//! - `*` `/`
//! - prefix `!`, `-`, `caseful`
//!
//! Every binary operator associates to the right. `()` always matches.
//!
//! # Example
//!
//! ```
//! use filter_query_rs::{compile, FilterContext};
//! use timeline_model_rs::{Account, Status, User};
//!
//! let query = compile("from home where user <- our.following").unwrap();
//! let predicate = query.get_evaluator().unwrap();
//!
//! let mut me = Account::new(1, "me");
//! me.following.insert(2);
//! let accounts = vec![me];
//! let context = FilterContext::new(&accounts, &[]);
//!
//! let statuses = vec![
//!     Status::new(10, User::new(2, "friend"), "hi"),
//!     Status::new(11, User::new(3, "stranger"), "hello"),
//! ];
//! let matched = predicate.filter_statuses(&statuses, &context);
//! assert_eq!(matched.len(), 1);
//! assert_eq!(matched[0].id, 10);
//! ```

mod ast;
mod catalogue;
mod cursor;
mod error;
mod escape;
mod evaluator;
mod lexer;
mod parser;
mod query;
mod source;
mod suggest;
mod value;

pub use ast::{BinaryOpKind, Node, UnaryOpKind};
pub use cursor::TokenCursor;
pub use error::{QueryError, QueryErrorKind, QueryResult};
pub use escape::{escape, quote};
pub use evaluator::{FilterContext, Predicate};
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use parser::QueryParser;
pub use query::{compile, compile_predicate_only, FilterQuery};
pub use source::{SourceDescriptor, SourceKind};
pub use timeline_model_rs::Relation;
pub use value::{relation_aliases, relation_from_name, AccountSelector, StatusField, UserField, Value};
