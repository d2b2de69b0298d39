//! Query evaluation against timeline statuses.
//!
//! A parsed [`Node`] tree is compiled once into nested closures wrapped in a
//! [`Predicate`]. Type checking happens during that compilation, so an
//! ill-typed query fails before any status is seen and evaluation never
//! inspects the tree again.
//!
//! # Example
//!
//! ```
//! use filter_query_rs::{compile, FilterContext};
//! use timeline_model_rs::{Status, User};
//!
//! let query = compile("where user.verified & !rt").unwrap();
//! let predicate = query.get_evaluator().unwrap();
//!
//! let mut author = User::new(1, "karno");
//! author.is_verified = true;
//! let status = Status::new(100, author, "hello");
//!
//! let context = FilterContext::new(&[], &[]);
//! assert!(predicate.matches(&status, &context));
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use regex::RegexBuilder;
use timeline_model_rs::{Account, Relation, Status, TwitterList, User};

use super::ast::{BinaryOpKind, Node, UnaryOpKind};
use super::error::{QueryError, QueryErrorKind, QueryResult};
use super::value::{AccountSelector, StatusField, UserField, Value};

/// Context for query evaluation.
///
/// Holds the locally authenticated accounts and the cached list memberships
/// that account selectors and `list.owner.slug` resolve against.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterContext<'a> {
    accounts: &'a [Account],
    lists: &'a [TwitterList],
}

impl<'a> FilterContext<'a> {
    /// Creates a new filter context.
    ///
    /// # Arguments
    ///
    /// * `accounts` - All locally authenticated accounts
    /// * `lists` - Cached list memberships
    pub fn new(accounts: &'a [Account], lists: &'a [TwitterList]) -> Self {
        Self { accounts, lists }
    }

    /// Finds an account by screen name (case-insensitive).
    pub fn find_account_by_screen_name(&self, screen_name: &str) -> Option<&'a Account> {
        let name_lower = screen_name.to_lowercase();
        self.accounts
            .iter()
            .find(|a| a.screen_name.to_lowercase() == name_lower)
    }

    /// Finds an account by user id.
    pub fn find_account_by_id(&self, user_id: i64) -> Option<&'a Account> {
        self.accounts.iter().find(|a| a.user_id == user_id)
    }

    /// Returns the accounts a selector refers to. `Any` selects all of them.
    pub fn select_accounts(&self, selector: &AccountSelector) -> Vec<&'a Account> {
        match selector {
            AccountSelector::Any => self.accounts.iter().collect(),
            AccountSelector::ScreenName(name) => {
                self.find_account_by_screen_name(name).into_iter().collect()
            }
            AccountSelector::Id(id) => self.find_account_by_id(*id).into_iter().collect(),
        }
    }

    /// Returns the member ids of the list `owner/slug` (case-insensitive).
    pub fn list_members(&self, owner: &str, slug: &str) -> Option<&'a HashSet<i64>> {
        let owner_lower = owner.to_lowercase();
        let slug_lower = slug.to_lowercase();
        self.lists
            .iter()
            .find(|l| {
                l.owner_screen_name.to_lowercase() == owner_lower
                    && l.slug.to_lowercase() == slug_lower
            })
            .map(|l| &l.member_ids)
    }
}

type Eval<T> = Box<dyn Fn(&Status, &FilterContext<'_>) -> T + Send + Sync>;

fn boxed<T>(f: impl Fn(&Status, &FilterContext<'_>) -> T + Send + Sync + 'static) -> Eval<T> {
    Box::new(f)
}

/// A compiled boolean query.
///
/// Cloning is cheap; clones share the same compiled closure and can be used
/// from any thread.
#[derive(Clone)]
pub struct Predicate {
    inner: Arc<dyn Fn(&Status, &FilterContext<'_>) -> bool + Send + Sync>,
}

impl Predicate {
    /// Compiles a predicate tree.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] if an operator receives operands it cannot
    /// handle, a literal regular expression is invalid, or the root is not a
    /// boolean expression.
    pub fn from_node(root: &Node) -> QueryResult<Self> {
        tracing::debug!(query = %root, "building evaluator");
        match Compiler::default().compile(root)? {
            Compiled::Boolean(f) => Ok(Self {
                inner: Arc::from(f),
            }),
            other => Err(QueryError::wrong_type("boolean", other.type_name())),
        }
    }

    /// Returns true if the status matches.
    pub fn matches(&self, status: &Status, context: &FilterContext<'_>) -> bool {
        (self.inner)(status, context)
    }

    /// Filters a slice of statuses, returning only those that match.
    pub fn filter_statuses<'b>(
        &self,
        statuses: &'b [Status],
        context: &FilterContext<'_>,
    ) -> Vec<&'b Status> {
        statuses
            .iter()
            .filter(|status| self.matches(status, context))
            .collect()
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").finish_non_exhaustive()
    }
}

/// A typed, compiled expression.
enum Compiled {
    Boolean(Eval<bool>),
    Numeric(Eval<i64>),
    String(Eval<String>),
    /// A set of user ids.
    Set(Eval<HashSet<i64>>),
    /// Candidate ids of a user identity (an account selector may match
    /// several accounts, an absent retweeter none).
    User(Eval<Vec<i64>>),
}

impl Compiled {
    fn boolean(f: impl Fn(&Status, &FilterContext<'_>) -> bool + Send + Sync + 'static) -> Self {
        Compiled::Boolean(boxed(f))
    }

    fn numeric(f: impl Fn(&Status, &FilterContext<'_>) -> i64 + Send + Sync + 'static) -> Self {
        Compiled::Numeric(boxed(f))
    }

    fn string(f: impl Fn(&Status, &FilterContext<'_>) -> String + Send + Sync + 'static) -> Self {
        Compiled::String(boxed(f))
    }

    fn set(
        f: impl Fn(&Status, &FilterContext<'_>) -> HashSet<i64> + Send + Sync + 'static,
    ) -> Self {
        Compiled::Set(boxed(f))
    }

    fn user(f: impl Fn(&Status, &FilterContext<'_>) -> Vec<i64> + Send + Sync + 'static) -> Self {
        Compiled::User(boxed(f))
    }

    fn type_name(&self) -> &'static str {
        match self {
            Compiled::Boolean(_) => "boolean",
            Compiled::Numeric(_) => "numeric",
            Compiled::String(_) => "string",
            Compiled::Set(_) => "set",
            Compiled::User(_) => "user",
        }
    }

    /// Returns the expression as a set, coercing a user identity.
    fn into_set(self) -> Option<Eval<HashSet<i64>>> {
        match self {
            Compiled::Set(f) => Some(f),
            Compiled::User(f) => Some(boxed(move |s, c| f(s, c).into_iter().collect())),
            _ => None,
        }
    }
}

/// Tree walker that turns nodes into closures.
#[derive(Debug, Clone, Copy, Default)]
struct Compiler {
    /// Set inside a `caseful` operand.
    caseful: bool,
}

impl Compiler {
    fn compile(&self, node: &Node) -> QueryResult<Compiled> {
        match node {
            Node::BinaryOp { left, right, op } => self.compile_binary(left, *op, right),
            Node::UnaryOp { operand, op } => self.compile_unary(*op, operand),
            Node::Bracket { inner: None } => Ok(Compiled::boolean(|_, _| true)),
            Node::Bracket { inner: Some(inner) } => self.compile(inner),
            Node::SetLiteral { values } => self.compile_set_literal(values),
            Node::ValueLeaf { value } => Ok(compile_value(value)),
        }
    }

    fn compile_unary(&self, op: UnaryOpKind, operand: &Node) -> QueryResult<Compiled> {
        match op {
            UnaryOpKind::Not => match self.compile(operand)? {
                Compiled::Boolean(f) => Ok(Compiled::boolean(move |s, c| !f(s, c))),
                other => Err(QueryError::wrong_type("boolean", other.type_name())),
            },
            UnaryOpKind::Negate => match self.compile(operand)? {
                Compiled::Numeric(f) => Ok(Compiled::numeric(move |s, c| f(s, c).wrapping_neg())),
                other => Err(QueryError::wrong_type("numeric", other.type_name())),
            },
            UnaryOpKind::Caseful => Compiler { caseful: true }.compile(operand),
        }
    }

    /// Members must be numeric or user expressions.
    fn compile_set_literal(&self, values: &[Value]) -> QueryResult<Compiled> {
        let mut fixed = HashSet::new();
        let mut dynamic = Vec::new();

        for value in values {
            match value {
                Value::NumericImmediate(n) => {
                    fixed.insert(*n);
                }
                _ => match compile_value(value) {
                    Compiled::Numeric(f) => dynamic.push(Compiled::user(move |s, c| vec![f(s, c)])),
                    member @ Compiled::User(_) => dynamic.push(member),
                    _ => {
                        return Err(QueryError::without_input(QueryErrorKind::InvalidSetMember {
                            member: value.to_string(),
                        }))
                    }
                },
            }
        }

        let members: Vec<_> = dynamic.into_iter().filter_map(Compiled::into_set).collect();
        Ok(Compiled::set(move |s, c| {
            let mut ids = fixed.clone();
            for member in &members {
                ids.extend(member(s, c));
            }
            ids
        }))
    }

    fn compile_binary(&self, left: &Node, op: BinaryOpKind, right: &Node) -> QueryResult<Compiled> {
        let caseful = self.caseful || left.is_caseful() || right.is_caseful();
        let lhs = self.compile(left)?;
        let rhs = self.compile(right)?;
        let mismatch = QueryError::type_mismatch(op.symbol(), lhs.type_name(), rhs.type_name());

        let compiled = match op {
            BinaryOpKind::And | BinaryOpKind::Or => compile_logical(op, lhs, rhs),
            BinaryOpKind::Equals => compile_equals(lhs, rhs, caseful),
            BinaryOpKind::NotEquals => compile_equals(lhs, rhs, caseful).map(|eq| match eq {
                Compiled::Boolean(f) => Compiled::boolean(move |s, c| !f(s, c)),
                other => other,
            }),
            BinaryOpKind::LessThan
            | BinaryOpKind::LessThanOrEqual
            | BinaryOpKind::GreaterThan
            | BinaryOpKind::GreaterThanOrEqual => compile_relational(op, lhs, rhs),
            BinaryOpKind::Contains => compile_contains(lhs, rhs, caseful),
            BinaryOpKind::ContainedBy => compile_contains(rhs, lhs, caseful),
            BinaryOpKind::StartsWith => compile_string_test(lhs, rhs, caseful, |a, b| a.starts_with(b)),
            BinaryOpKind::EndsWith => compile_string_test(lhs, rhs, caseful, |a, b| a.ends_with(b)),
            BinaryOpKind::Regex => {
                return match right.as_string_immediate() {
                    Some(pattern) => compile_literal_regex(lhs, pattern, caseful)
                        .unwrap_or(Err(mismatch)),
                    None => compile_dynamic_regex(lhs, rhs, caseful).ok_or(mismatch),
                };
            }
            BinaryOpKind::Add
            | BinaryOpKind::Subtract
            | BinaryOpKind::Multiply
            | BinaryOpKind::Divide => compile_arithmetic(op, lhs, rhs),
        };

        compiled.ok_or(mismatch)
    }
}

// ==================== Operators ====================

fn compile_logical(op: BinaryOpKind, lhs: Compiled, rhs: Compiled) -> Option<Compiled> {
    let (Compiled::Boolean(a), Compiled::Boolean(b)) = (lhs, rhs) else {
        return None;
    };
    Some(if op == BinaryOpKind::And {
        Compiled::boolean(move |s, c| a(s, c) && b(s, c))
    } else {
        Compiled::boolean(move |s, c| a(s, c) || b(s, c))
    })
}

fn compile_equals(lhs: Compiled, rhs: Compiled, caseful: bool) -> Option<Compiled> {
    let compiled = match (lhs, rhs) {
        (Compiled::Boolean(a), Compiled::Boolean(b)) => Compiled::boolean(move |s, c| a(s, c) == b(s, c)),
        (Compiled::Numeric(a), Compiled::Numeric(b)) => Compiled::boolean(move |s, c| a(s, c) == b(s, c)),
        (Compiled::String(a), Compiled::String(b)) => {
            return compile_string_test(Compiled::String(a), Compiled::String(b), caseful, |x, y| x == y)
        }
        (Compiled::User(a), Compiled::User(b)) => Compiled::boolean(move |s, c| {
            let right = b(s, c);
            a(s, c).iter().any(|id| right.contains(id))
        }),
        (Compiled::User(u), Compiled::Numeric(n)) | (Compiled::Numeric(n), Compiled::User(u)) => {
            Compiled::boolean(move |s, c| u(s, c).contains(&n(s, c)))
        }
        (lhs @ (Compiled::Set(_) | Compiled::User(_)), rhs @ (Compiled::Set(_) | Compiled::User(_))) => {
            let a = lhs.into_set()?;
            let b = rhs.into_set()?;
            Compiled::boolean(move |s, c| a(s, c) == b(s, c))
        }
        _ => return None,
    };
    Some(compiled)
}

fn compile_relational(op: BinaryOpKind, lhs: Compiled, rhs: Compiled) -> Option<Compiled> {
    let (Compiled::Numeric(a), Compiled::Numeric(b)) = (lhs, rhs) else {
        return None;
    };
    let compare: fn(i64, i64) -> bool = match op {
        BinaryOpKind::LessThan => |x, y| x < y,
        BinaryOpKind::LessThanOrEqual => |x, y| x <= y,
        BinaryOpKind::GreaterThan => |x, y| x > y,
        _ => |x, y| x >= y,
    };
    Some(Compiled::boolean(move |s, c| compare(a(s, c), b(s, c))))
}

/// `container -> item`. String containers test for a substring; everything
/// else is treated as a set of user ids.
fn compile_contains(container: Compiled, item: Compiled, caseful: bool) -> Option<Compiled> {
    if let (Compiled::String(_), Compiled::String(_)) = (&container, &item) {
        return compile_string_test(container, item, caseful, |a, b| a.contains(b));
    }

    let set = container.into_set()?;
    let compiled = match item {
        Compiled::Numeric(n) => Compiled::boolean(move |s, c| set(s, c).contains(&n(s, c))),
        Compiled::User(u) => Compiled::boolean(move |s, c| {
            let members = set(s, c);
            u(s, c).iter().any(|id| members.contains(id))
        }),
        Compiled::Set(other) => Compiled::boolean(move |s, c| set(s, c).is_superset(&other(s, c))),
        _ => return None,
    };
    Some(compiled)
}

/// Applies `test` to two strings, lowercasing both unless `caseful`.
fn compile_string_test(
    lhs: Compiled,
    rhs: Compiled,
    caseful: bool,
    test: fn(&str, &str) -> bool,
) -> Option<Compiled> {
    let (Compiled::String(a), Compiled::String(b)) = (lhs, rhs) else {
        return None;
    };
    Some(if caseful {
        Compiled::boolean(move |s, c| test(&a(s, c), &b(s, c)))
    } else {
        Compiled::boolean(move |s, c| test(&a(s, c).to_lowercase(), &b(s, c).to_lowercase()))
    })
}

/// Builds the regex once. Returns None on a non-string subject.
fn compile_literal_regex(lhs: Compiled, pattern: &str, caseful: bool) -> Option<QueryResult<Compiled>> {
    let Compiled::String(text) = lhs else {
        return None;
    };
    let regex = match RegexBuilder::new(pattern).case_insensitive(!caseful).build() {
        Ok(regex) => regex,
        Err(err) => {
            return Some(Err(QueryError::without_input(QueryErrorKind::InvalidRegex {
                pattern: pattern.to_string(),
                reason: err.to_string(),
            })))
        }
    };
    Some(Ok(Compiled::boolean(move |s, c| regex.is_match(&text(s, c)))))
}

/// Builds the regex on every evaluation; a bad pattern never matches.
fn compile_dynamic_regex(lhs: Compiled, rhs: Compiled, caseful: bool) -> Option<Compiled> {
    let (Compiled::String(text), Compiled::String(pattern)) = (lhs, rhs) else {
        return None;
    };
    Some(Compiled::boolean(move |s, c| {
        let pattern = pattern(s, c);
        match RegexBuilder::new(&pattern).case_insensitive(!caseful).build() {
            Ok(regex) => regex.is_match(&text(s, c)),
            Err(err) => {
                tracing::warn!(%pattern, error = %err, "invalid regular expression; treating as no match");
                false
            }
        }
    }))
}

fn compile_arithmetic(op: BinaryOpKind, lhs: Compiled, rhs: Compiled) -> Option<Compiled> {
    match (lhs, rhs) {
        (Compiled::Numeric(a), Compiled::Numeric(b)) => {
            let apply: fn(i64, i64) -> i64 = match op {
                BinaryOpKind::Add => i64::wrapping_add,
                BinaryOpKind::Subtract => i64::wrapping_sub,
                BinaryOpKind::Multiply => i64::wrapping_mul,
                _ => |x, y| if y == 0 { 0 } else { x.wrapping_div(y) },
            };
            Some(Compiled::numeric(move |s, c| apply(a(s, c), b(s, c))))
        }
        (Compiled::String(a), Compiled::String(b)) if op == BinaryOpKind::Add => {
            Some(Compiled::string(move |s, c| a(s, c) + &b(s, c)))
        }
        _ => None,
    }
}

// ==================== Values ====================

type UserPick = fn(&Status) -> Option<&User>;

fn author_of(status: &Status) -> Option<&User> {
    Some(status.author())
}

fn compile_value(value: &Value) -> Compiled {
    match value {
        Value::StringImmediate(text) => {
            let text = text.clone();
            Compiled::string(move |_, _| text.clone())
        }
        Value::NumericImmediate(n) => {
            let n = *n;
            Compiled::numeric(move |_, _| n)
        }
        Value::LocalUser(selector) => {
            let selector = selector.clone();
            Compiled::user(move |_, c| {
                c.select_accounts(&selector)
                    .iter()
                    .map(|a| a.user_id)
                    .collect()
            })
        }
        Value::LocalUserRelation { selector, relation } => {
            compile_relation(selector.clone(), *relation)
        }
        Value::UserField {
            is_retweeter,
            field,
        } => {
            let pick: UserPick = if *is_retweeter {
                Status::retweeter
            } else {
                author_of
            };
            match field {
                None => Compiled::user(move |s, _| pick(s).map(|u| vec![u.id]).unwrap_or_default()),
                Some(field) => compile_user_field(*field, pick),
            }
        }
        Value::StatusField(field) => compile_status_field(*field),
        Value::ListMembers { owner, slug } => {
            let (owner, slug) = (owner.clone(), slug.clone());
            Compiled::set(move |_, c| c.list_members(&owner, &slug).cloned().unwrap_or_default())
        }
    }
}

fn compile_relation(selector: AccountSelector, relation: Relation) -> Compiled {
    Compiled::set(move |_, c| {
        c.select_accounts(&selector)
            .iter()
            .flat_map(|a| a.relation(relation).iter().copied())
            .collect()
    })
}

fn compile_user_field(field: UserField, pick: UserPick) -> Compiled {
    let flag = |get: fn(&User) -> bool| Compiled::boolean(move |s, _| pick(s).is_some_and(get));
    let number = |get: fn(&User) -> i64| Compiled::numeric(move |s, _| pick(s).map_or(-1, get));
    let text = |get: fn(&User) -> &str| {
        Compiled::string(move |s, _| pick(s).map(get).unwrap_or_default().to_string())
    };

    match field {
        UserField::Protected => flag(|u| u.is_protected),
        UserField::Verified => flag(|u| u.is_verified),
        UserField::Translator => flag(|u| u.is_translator),
        UserField::ContributorsEnabled => flag(|u| u.is_contributors_enabled),
        UserField::GeoEnabled => flag(|u| u.is_geo_enabled),
        UserField::Id => number(|u| u.id),
        UserField::StatusesCount => number(|u| u.statuses_count),
        UserField::FollowingCount => number(|u| u.friends_count),
        UserField::FollowersCount => number(|u| u.followers_count),
        UserField::FavoritesCount => number(|u| u.favorites_count),
        UserField::ListedCount => number(|u| u.listed_count),
        UserField::ScreenName => text(|u| u.screen_name.as_str()),
        UserField::Name => text(|u| u.name.as_str()),
        UserField::Bio => text(|u| u.description.as_str()),
        UserField::Location => text(|u| u.location.as_str()),
        UserField::Language => text(|u| u.language.as_str()),
    }
}

fn compile_status_field(field: StatusField) -> Compiled {
    match field {
        StatusField::IsDirectMessage => Compiled::boolean(|s, _| s.original().is_direct_message),
        StatusField::IsRetweet => Compiled::boolean(|s, _| s.is_retweet()),
        StatusField::InReplyTo => {
            Compiled::numeric(|s, _| s.original().in_reply_to_user_id.unwrap_or(-1))
        }
        StatusField::Mentions => Compiled::set(|s, _| s.mentioned_user_ids().into_iter().collect()),
        StatusField::Id => Compiled::numeric(|s, _| s.id),
        StatusField::Favoriters => {
            Compiled::set(|s, _| s.original().favoriter_ids.iter().copied().collect())
        }
        StatusField::Retweeters => {
            Compiled::set(|s, _| s.original().retweeter_ids.iter().copied().collect())
        }
        StatusField::Text => Compiled::string(|s, _| s.original().text.clone()),
        StatusField::SourceClient => Compiled::string(|s, _| s.original().source.clone()),
        StatusField::HasMedia => Compiled::boolean(|s, _| s.has_media()),
        StatusField::IsMuted => Compiled::boolean(|s, c| {
            let author = s.author().id;
            c.select_accounts(&AccountSelector::Any)
                .iter()
                .any(|a| a.relation(Relation::Muting).contains(&author))
        }),
    }
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
