//! Candidate keys per canonical field, in precedence order.
//!
//! Upstream payloads spell the same field differently across API versions and
//! locales; the first candidate that resolves wins.

// Comment fields.
pub const AUTHOR_PIN: &[&str] = &["author_pin", "isPinned", "pinned"];
pub const AWEME_ID: &[&str] = &["aweme_id", "awemeId", "video_id", "videoId"];
pub const COMMENT_ID: &[&str] = &["cid", "comment_id", "id"];
pub const LANGUAGE: &[&str] = &["comment_language", "lang", "language"];
pub const CREATE_TIME: &[&str] = &["create_time", "createTime", "timestamp"];
pub const LIKE_COUNT: &[&str] = &["digg_count", "like_count", "likes"];
pub const REPLY_COUNT: &[&str] = &["reply_comment_total", "reply_count", "replies"];
pub const TEXT: &[&str] = &["text", "comment", "content"];
pub const USER: &[&str] = &["user", "author"];

// Share info: `share_info.url`.
pub const SHARE_INFO: &str = "share_info";
pub const SHARE_URL: &str = "url";

// User fields.
pub const NICKNAME: &[&str] = &["nickname", "nicknameName", "display_name", "displayName"];
pub const UNIQUE_ID: &[&str] = &["unique_id", "uniqueId", "username", "uid"];
pub const AVATAR_THUMB_SNAKE: (&str, &str) = ("avatar_thumb", "url_list");
pub const AVATAR_THUMB_CAMEL: (&str, &str) = ("avatarThumb", "urlList");
pub const AVATAR_SINGLE: &[&str] = &["avatar", "avatarUrl"];
