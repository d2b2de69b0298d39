//! Status model.
//!
//! A [`Status`] is either a tweet or a direct message. Retweets carry the
//! retweeted status in `retweeted_status`; most accessors that matter for
//! filtering should read [`Status::original`] rather than the wrapper.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::User;

/// A timeline entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    /// The status id.
    pub id: i64,

    /// Who posted this status. For a retweet this is the retweeter.
    pub user: User,

    /// The status text.
    #[serde(default)]
    pub text: String,

    /// The client the status was posted from (e.g. "Twitter Web App").
    #[serde(default)]
    pub source: String,

    /// When the status was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to_status_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_reply_to_user_id: Option<i64>,

    /// True for direct messages.
    #[serde(default)]
    pub is_direct_message: bool,

    /// The receiving user of a direct message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<User>,

    /// The retweeted status, when this status is a retweet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retweeted_status: Option<Box<Status>>,

    /// Ids of users mentioned in the text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mention_ids: Vec<i64>,

    /// Ids of users known to have favorited this status.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub favoriter_ids: Vec<i64>,

    /// Ids of users known to have retweeted this status.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub retweeter_ids: Vec<i64>,

    /// Attached media.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<Media>,
}

/// A media attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,

    #[serde(default, rename = "type")]
    pub kind: MediaKind,
}

/// The kind of a media attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    #[default]
    Photo,
    Video,
    AnimatedGif,
}

impl Status {
    /// Creates a plain tweet.
    pub fn new(id: i64, user: User, text: impl Into<String>) -> Self {
        Self {
            id,
            user,
            text: text.into(),
            source: String::new(),
            created_at: None,
            in_reply_to_status_id: None,
            in_reply_to_user_id: None,
            is_direct_message: false,
            recipient: None,
            retweeted_status: None,
            mention_ids: Vec::new(),
            favoriter_ids: Vec::new(),
            retweeter_ids: Vec::new(),
            media: Vec::new(),
        }
    }

    /// Creates a retweet of `original` by `retweeter`.
    pub fn retweet(id: i64, retweeter: User, original: Status) -> Self {
        let mut status = Self::new(id, retweeter, original.text.clone());
        status.retweeted_status = Some(Box::new(original));
        status
    }

    /// Creates a direct message from `sender` to `recipient`.
    pub fn direct_message(id: i64, sender: User, recipient: User, text: impl Into<String>) -> Self {
        let mut status = Self::new(id, sender, text);
        status.is_direct_message = true;
        status.recipient = Some(recipient);
        status
    }

    /// Returns true if this status is a retweet.
    pub fn is_retweet(&self) -> bool {
        self.retweeted_status.is_some()
    }

    /// Returns the retweeted status for a retweet, or `self` otherwise.
    pub fn original(&self) -> &Status {
        self.retweeted_status.as_deref().unwrap_or(self)
    }

    /// Returns the author of the original status.
    pub fn author(&self) -> &User {
        &self.original().user
    }

    /// Returns the retweeting user, if this status is a retweet.
    pub fn retweeter(&self) -> Option<&User> {
        self.is_retweet().then_some(&self.user)
    }

    /// Returns true if the original status has any media attached.
    pub fn has_media(&self) -> bool {
        !self.original().media.is_empty()
    }

    /// Returns the ids of users this status is addressed to.
    ///
    /// For a direct message this includes the recipient.
    pub fn mentioned_user_ids(&self) -> Vec<i64> {
        let original = self.original();
        let mut ids = original.mention_ids.clone();
        if let Some(recipient) = &original.recipient {
            if !ids.contains(&recipient.id) {
                ids.push(recipient.id);
            }
        }
        ids
    }
}
