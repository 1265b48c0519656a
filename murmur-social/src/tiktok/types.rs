use serde::{Serialize, Serializer};

/// Dot-paths of the exported record, in column order.
pub const EXPORT_FIELDS: [&str; 12] = [
    "author_pin",
    "aweme_id",
    "cid",
    "comment_language",
    "create_time",
    "digg_count",
    "reply_comment_total",
    "text",
    "user.nickname",
    "user.unique_id",
    "user.avatar_thumb.url_list",
    "share_info.url",
];

/// Comment author, always fully populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CanonicalUser {
    pub nickname: String,
    pub unique_id: String,
    /// Non-empty, trimmed URLs in platform order. Serialized as `avatar_thumb.url_list`.
    #[serde(rename = "avatar_thumb", serialize_with = "avatar_thumb")]
    pub avatar_urls: Vec<String>,
}

/// One normalized comment. Built once per accepted raw item and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalComment {
    #[serde(rename = "author_pin")]
    pub author_pinned: bool,
    pub aweme_id: String,
    #[serde(rename = "cid")]
    pub comment_id: String,
    #[serde(rename = "comment_language")]
    pub language: String,
    /// Unix seconds.
    pub create_time: u64,
    #[serde(rename = "digg_count")]
    pub like_count: u64,
    #[serde(rename = "reply_comment_total")]
    pub reply_count: u64,
    pub text: String,
    pub user: CanonicalUser,
    /// Serialized as `share_info.url`.
    #[serde(rename = "share_info", serialize_with = "share_info")]
    pub share_url: String,
}

#[derive(Serialize)]
struct UrlList<'a> {
    url_list: &'a [String],
}

#[derive(Serialize)]
struct ShareInfo<'a> {
    url: &'a str,
}

fn avatar_thumb<S: Serializer>(urls: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    UrlList { url_list: urls }.serialize(serializer)
}

fn share_info<S: Serializer>(url: &str, serializer: S) -> Result<S::Ok, S::Error> {
    ShareInfo { url }.serialize(serializer)
}
