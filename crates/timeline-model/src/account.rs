//! Locally authenticated accounts and list memberships.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A relationship set held by a local account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// Users the account follows.
    Following,
    /// Users following the account.
    Followers,
    /// Users the account blocks.
    Blocking,
    /// Users the account mutes.
    Muting,
}

impl Relation {
    /// Every relation, in canonical order.
    pub const ALL: [Relation; 4] = [
        Relation::Following,
        Relation::Followers,
        Relation::Blocking,
        Relation::Muting,
    ];
}

/// An account the client is signed in with, together with its relationships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub user_id: i64,

    pub screen_name: String,

    #[serde(default)]
    pub following: HashSet<i64>,

    #[serde(default)]
    pub followers: HashSet<i64>,

    #[serde(default)]
    pub blocking: HashSet<i64>,

    #[serde(default)]
    pub muting: HashSet<i64>,
}

impl Account {
    /// Creates an account with empty relationship sets.
    pub fn new(user_id: i64, screen_name: impl Into<String>) -> Self {
        Self {
            user_id,
            screen_name: screen_name.into(),
            following: HashSet::new(),
            followers: HashSet::new(),
            blocking: HashSet::new(),
            muting: HashSet::new(),
        }
    }

    /// Returns the id set for the given relation.
    pub fn relation(&self, relation: Relation) -> &HashSet<i64> {
        match relation {
            Relation::Following => &self.following,
            Relation::Followers => &self.followers,
            Relation::Blocking => &self.blocking,
            Relation::Muting => &self.muting,
        }
    }
}

/// Members of a Twitter list, identified by owner and slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitterList {
    pub owner_screen_name: String,

    pub slug: String,

    #[serde(default)]
    pub member_ids: HashSet<i64>,
}

impl TwitterList {
    pub fn new(
        owner_screen_name: impl Into<String>,
        slug: impl Into<String>,
        member_ids: impl IntoIterator<Item = i64>,
    ) -> Self {
        Self {
            owner_screen_name: owner_screen_name.into(),
            slug: slug.into(),
            member_ids: member_ids.into_iter().collect(),
        }
    }
}
