//! A serialized timeline: statuses plus the local state they are filtered
//! against.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Account, Status, TwitterList};

/// A point-in-time dump of timeline data.
///
/// The JSON layout mirrors the struct; every collection may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// When the snapshot was taken.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,

    /// Locally authenticated accounts.
    #[serde(default)]
    pub accounts: Vec<Account>,

    /// Cached list memberships.
    #[serde(default)]
    pub lists: Vec<TwitterList>,

    /// Statuses, newest first.
    #[serde(default)]
    pub statuses: Vec<Status>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_deserialize_empty() {
        let snapshot: Snapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn test_snapshot_deserialize() {
        let json = r#"{
            "accounts": [{"user_id": 1, "screen_name": "me", "following": [2]}],
            "lists": [{"owner_screen_name": "me", "slug": "friends", "member_ids": [2]}],
            "statuses": [
                {"id": 10, "user": {"id": 2, "screen_name": "friend"}, "text": "hi"},
                {
                    "id": 11,
                    "user": {"id": 3, "screen_name": "booster"},
                    "retweeted_status": {"id": 9, "user": {"id": 2, "screen_name": "friend"}}
                }
            ]
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.accounts[0].following.len(), 1);
        assert_eq!(snapshot.lists[0].slug, "friends");
        assert_eq!(snapshot.statuses.len(), 2);
        assert_eq!(snapshot.statuses[1].original().id, 9);
    }
}
