//! TikTok comment extraction.
//!
//! Data flows `client` (or a sample source) → [`extract::is_comment_like`] →
//! [`extract::normalize_comment`] → exporter. The normalization half (`keys`,
//! `resolve`, `user`, `extract`, `types`) does no I/O and never fails.
pub mod client;
pub mod extract;
pub mod keys;
pub mod links;
pub mod page;
pub mod resolve;
pub mod types;
pub mod user;

pub use client::TikTokClient;
pub use extract::{is_comment_like, normalize_batch, normalize_comment};
pub use types::{CanonicalComment, CanonicalUser, EXPORT_FIELDS};
pub use user::normalize_user;
