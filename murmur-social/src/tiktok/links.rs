//! Video URL helpers.
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

const ID_QUERY_KEYS: [&str; 3] = ["aweme_id", "item_id", "share_item_id"];

fn video_path_re() -> &'static Regex {
    static VIDEO_PATH_RE: OnceLock<Regex> = OnceLock::new();
    VIDEO_PATH_RE.get_or_init(|| Regex::new(r"/video/(\d+)").expect("valid video path regex"))
}

fn desktop_host_re() -> &'static Regex {
    static DESKTOP_HOST_RE: OnceLock<Regex> = OnceLock::new();
    DESKTOP_HOST_RE.get_or_init(|| {
        Regex::new(r"(?i)^(https?://)(www\.)?tiktok\.com/").expect("valid desktop host regex")
    })
}

/// Extract the video (aweme) id from a TikTok URL, or `""` when none is found.
///
/// ```
/// use murmur_social::tiktok::links::parse_aweme_id_from_url;
///
/// assert_eq!(
///     parse_aweme_id_from_url("https://www.tiktok.com/@user/video/7171782248281165058?lang=en"),
///     "7171782248281165058"
/// );
/// assert_eq!(parse_aweme_id_from_url("https://vm.tiktok.com/ZMabc/"), "");
/// ```
pub fn parse_aweme_id_from_url(url: &str) -> String {
    if let Some(caps) = video_path_re().captures(url) {
        return caps[1].to_string();
    }
    let Ok(parsed) = Url::parse(url) else {
        return String::new();
    };
    parsed
        .query_pairs()
        .find(|(key, value)| {
            ID_QUERY_KEYS.contains(&key.as_ref())
                && !value.is_empty()
                && value.bytes().all(|b| b.is_ascii_digit())
        })
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

/// Point a desktop `tiktok.com` URL at the lighter `m.tiktok.com` host.
/// Other URLs are returned unchanged.
pub fn to_mobile_url(url: &str) -> String {
    desktop_host_re()
        .replace(url, "${1}m.tiktok.com/")
        .into_owned()
}
