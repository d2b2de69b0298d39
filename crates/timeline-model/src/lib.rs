//! Timeline data model.
//!
//! These are the types a compiled filter query reads when it is evaluated:
//! statuses (tweets and direct messages), their authors, the locally
//! authenticated accounts with their relationship sets, and list memberships.
//!
//! # Quick Start
//!
//! ```
//! use timeline_model_rs::{Status, User};
//!
//! let status = Status::new(1, User::new(10, "alice"), "hello");
//! assert!(!status.is_retweet());
//! assert_eq!(status.author().screen_name, "alice");
//! ```

mod account;
mod snapshot;
mod status;
mod user;

pub use account::{Account, Relation, TwitterList};
pub use snapshot::Snapshot;
pub use status::{Media, MediaKind, Status};
pub use user::User;
