//! Leaf values of the expression tree and their name catalogues.

use std::fmt;

use timeline_model_rs::Relation;

use super::catalogue::Catalogue;
use super::escape::{is_bare_literal, literal_or_quoted, quote};

/// Selects one or more locally authenticated accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccountSelector {
    /// Any local account (`*`, `we`, `our`, `us`).
    Any,
    /// The account with this screen name (`@name`).
    ScreenName(String),
    /// The account with this user id (`#123`).
    Id(i64),
}

impl fmt::Display for AccountSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountSelector::Any => f.write_str("our"),
            AccountSelector::ScreenName(name) if is_bare_literal(name) => write!(f, "@{name}"),
            AccountSelector::ScreenName(name) => write!(f, "@.{}", quote(name)),
            AccountSelector::Id(id) => write!(f, "#{id}"),
        }
    }
}

/// A field of a user object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    Protected,
    Verified,
    Translator,
    ContributorsEnabled,
    GeoEnabled,
    Id,
    StatusesCount,
    FollowingCount,
    FollowersCount,
    FavoritesCount,
    ListedCount,
    ScreenName,
    Name,
    Bio,
    Location,
    Language,
}

impl UserField {
    /// Every user field, in canonical order.
    pub const ALL: [UserField; 16] = [
        UserField::Protected,
        UserField::Verified,
        UserField::Translator,
        UserField::ContributorsEnabled,
        UserField::GeoEnabled,
        UserField::Id,
        UserField::StatusesCount,
        UserField::FollowingCount,
        UserField::FollowersCount,
        UserField::FavoritesCount,
        UserField::ListedCount,
        UserField::ScreenName,
        UserField::Name,
        UserField::Bio,
        UserField::Location,
        UserField::Language,
    ];

    /// Accepted spellings; the first is canonical.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            UserField::Protected => &["protected", "is_protected", "isprotected"],
            UserField::Verified => &["verified", "is_verified", "isverified"],
            UserField::Translator => &["translator", "is_translator", "istranslator"],
            UserField::ContributorsEnabled => &[
                "contributors_enabled",
                "contributorsenabled",
                "is_contributors_enabled",
            ],
            UserField::GeoEnabled => &["geo_enabled", "geoenabled", "is_geo_enabled"],
            UserField::Id => &["id"],
            UserField::StatusesCount => &[
                "statuses",
                "status",
                "statuses_count",
                "statuscount",
                "tweets",
            ],
            UserField::FollowingCount => &[
                "following",
                "followings",
                "friend",
                "friends",
                "friends_count",
                "following_count",
            ],
            UserField::FollowersCount => &["followers", "follower", "followers_count"],
            UserField::FavoritesCount => &["favorites", "fav", "favs", "favorite", "favorites_count"],
            UserField::ListedCount => &["listed", "list", "listed_count"],
            UserField::ScreenName => &["screen_name", "screenname"],
            UserField::Name => &["name", "username"],
            UserField::Bio => &["bio", "description"],
            UserField::Location => &["location", "loc"],
            UserField::Language => &["language", "lang"],
        }
    }

    /// Looks up a field by any of its spellings, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::lookup(name)
    }

    /// The canonical name.
    pub fn name(&self) -> &'static str {
        self.aliases()[0]
    }
}

/// A field of a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusField {
    IsDirectMessage,
    IsRetweet,
    InReplyTo,
    Mentions,
    Id,
    Favoriters,
    Retweeters,
    Text,
    SourceClient,
    HasMedia,
    IsMuted,
}

impl StatusField {
    /// Every status field, in canonical order.
    pub const ALL: [StatusField; 11] = [
        StatusField::IsDirectMessage,
        StatusField::IsRetweet,
        StatusField::InReplyTo,
        StatusField::Mentions,
        StatusField::Id,
        StatusField::Favoriters,
        StatusField::Retweeters,
        StatusField::Text,
        StatusField::SourceClient,
        StatusField::HasMedia,
        StatusField::IsMuted,
    ];

    /// Accepted spellings; the first is canonical.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            StatusField::IsDirectMessage => &[
                "direct_message",
                "dm",
                "is_dm",
                "isdm",
                "message",
                "is_direct_message",
            ],
            StatusField::IsRetweet => &["retweet", "rt", "isretweet", "is_retweet"],
            StatusField::InReplyTo => &["in_reply_to", "reply_to", "replyto", "inreplyto"],
            StatusField::Mentions => &["mentions", "mention", "to"],
            StatusField::Id => &["id"],
            StatusField::Favoriters => &["favoriters", "favs", "favorites", "favorer", "favorers"],
            StatusField::Retweeters => &["retweeters", "rts", "retweeted"],
            StatusField::Text => &["text", "body"],
            StatusField::SourceClient => &["via", "source", "client"],
            StatusField::HasMedia => &["has_media", "media", "hasmedia"],
            StatusField::IsMuted => &["mute", "muted", "is_muted", "ismuted"],
        }
    }

    /// Looks up a field by any of its spellings, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::lookup(name)
    }

    /// The canonical name.
    pub fn name(&self) -> &'static str {
        self.aliases()[0]
    }
}

/// Accepted spellings of a relation; the first is canonical.
pub fn relation_aliases(relation: Relation) -> &'static [&'static str] {
    match relation {
        Relation::Following => &["following", "followings", "friend", "friends"],
        Relation::Followers => &["followers", "follower"],
        Relation::Blocking => &["blocking", "block", "blocks", "blocked"],
        Relation::Muting => &["muting", "mute", "mutes", "muted"],
    }
}

/// Looks up a relation by any of its spellings, ignoring case.
pub fn relation_from_name(name: &str) -> Option<Relation> {
    Relation::lookup(name)
}

/// A leaf value: an immediate or an accessor into item/account/list data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// A quoted string.
    StringImmediate(String),
    /// A 64-bit integer.
    NumericImmediate(i64),
    /// One or more local accounts.
    LocalUser(AccountSelector),
    /// A relationship set of one or more local accounts.
    LocalUserRelation {
        selector: AccountSelector,
        relation: Relation,
    },
    /// The author (or retweeter) of the item, or one of its fields.
    /// `field: None` is the user object itself.
    UserField {
        is_retweeter: bool,
        field: Option<UserField>,
    },
    /// A field of the item.
    StatusField(StatusField),
    /// Members of the list `owner/slug`.
    ListMembers { owner: String, slug: String },
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::StringImmediate(s) => f.write_str(&quote(s)),
            Value::NumericImmediate(n) => write!(f, "{n}"),
            Value::LocalUser(selector) => write!(f, "{selector}"),
            Value::LocalUserRelation { selector, relation } => {
                write!(f, "{selector}.{}", relation_aliases(*relation)[0])
            }
            Value::UserField { is_retweeter, field } => {
                f.write_str(if *is_retweeter { "retweeter" } else { "user" })?;
                if let Some(field) = field {
                    write!(f, ".{}", field.name())?;
                }
                Ok(())
            }
            Value::StatusField(field) => f.write_str(field.name()),
            Value::ListMembers { owner, slug } => {
                write!(f, "list.{}.{}", literal_or_quoted(owner), literal_or_quoted(slug))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_field_synonyms() {
        for name in ["friends", "following", "followings", "FRIENDS"] {
            assert_eq!(UserField::from_name(name), Some(UserField::FollowingCount));
        }
        assert_eq!(UserField::from_name("nonfield"), None);
    }

    #[test]
    fn test_status_field_synonyms() {
        for name in ["rt", "retweet", "isretweet", "is_retweet", "RT"] {
            assert_eq!(StatusField::from_name(name), Some(StatusField::IsRetweet));
        }
    }

    #[test]
    fn test_relation_synonyms() {
        assert_eq!(relation_from_name("friends"), Some(Relation::Following));
        assert_eq!(relation_from_name("blocked"), Some(Relation::Blocking));
        assert_eq!(relation_from_name("mute"), Some(Relation::Muting));
        assert_eq!(relation_from_name("ignoring"), None);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::StringImmediate("a\"b".into()).to_string(), r#""a\"b""#);
        assert_eq!(
            Value::UserField { is_retweeter: true, field: Some(UserField::ScreenName) }.to_string(),
            "retweeter.screen_name"
        );
        assert_eq!(
            Value::LocalUserRelation {
                selector: AccountSelector::ScreenName("karno".into()),
                relation: Relation::Followers,
            }
            .to_string(),
            "@karno.followers"
        );
        assert_eq!(
            Value::ListMembers { owner: "karno".into(), slug: "my friends".into() }.to_string(),
            r#"list.karno."my friends""#
        );
    }
}
