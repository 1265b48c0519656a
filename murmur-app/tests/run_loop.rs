use async_trait::async_trait;
use clap::Parser;
use murmur_app::cli::Cli;
use murmur_app::run::run_with_source;
use murmur_common::{MurmurError, OutputFormat};
use murmur_config::Settings;
use murmur_social::source::CommentSource;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const LIVE_URL: &str = "https://www.tiktok.com/@creator/video/7171782248281165058";
const SAMPLE_URL: &str = "https://www.tiktok.com/@creator/video/7000000000000000001";

/// Live source that only knows a fixed set of URLs.
struct Canned(HashMap<&'static str, Vec<Value>>);

#[async_trait]
impl CommentSource for Canned {
    async fn fetch_comments(&self, url: &str, max_items: usize) -> Vec<Value> {
        self.0
            .get(url)
            .map(|items| items.iter().take(max_items).cloned().collect())
            .unwrap_or_default()
    }
}

fn live() -> Canned {
    Canned(HashMap::from([(
        LIVE_URL,
        vec![
            json!({ "cid": "1", "text": "live one", "aweme_id": "7171782248281165058", "digg_count": 4 }),
            json!({ "text": "", "digg_count": 9 }),
            json!({ "cid": "3", "text": "live two", "user": { "nickname": "Ann", "unique_id": "ann" } }),
        ],
    )]))
}

fn write_input(dir: &Path) -> String {
    let input = json!({
        "startUrls": [LIVE_URL, "  ", SAMPLE_URL, LIVE_URL, 42],
        "sampleComments": {
            SAMPLE_URL: [
                { "comment_id": "s1", "content": "from sample", "awemeId": "7000000000000000001" },
                "not a comment"
            ]
        }
    });
    let path = dir.join("input.json");
    fs::write(&path, input.to_string()).unwrap();
    path.display().to_string()
}

fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("murmur").chain(args.iter().copied()))
}

#[tokio::test]
async fn live_results_and_sample_fallback_reach_json_output() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(tmp.path());
    let out = tmp.path().join("out/comments.json");
    let out_arg = out.display().to_string();

    let summary = run_with_source(&cli(&["-i", &input, "-o", &out_arg]), &Settings::default(), &live())
        .await
        .unwrap();

    assert_eq!(summary.urls, 2);
    assert_eq!(summary.written, 3);
    assert_eq!(summary.format, OutputFormat::Json);

    let rows: Vec<Value> = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let cids: Vec<&str> = rows.iter().map(|r| r["cid"].as_str().unwrap()).collect();
    assert_eq!(cids, ["1", "3", "s1"]);

    assert_eq!(rows[0]["digg_count"], json!(4));
    assert_eq!(rows[1]["user"]["unique_id"], json!("ann"));
    assert_eq!(rows[2]["text"], json!("from sample"));
    assert_eq!(
        rows[2]["share_info"]["url"],
        json!("https://m.tiktok.com/v/7000000000000000001.html?share_comment_id=s1")
    );
}

#[tokio::test]
async fn cli_urls_override_input_and_respect_max_items() {
    let tmp = TempDir::new().unwrap();
    let input = write_input(tmp.path());
    let out = tmp.path().join("comments.csv");
    let out_arg = out.display().to_string();

    let summary = run_with_source(
        &cli(&["-i", &input, "-o", &out_arg, "-u", LIVE_URL, "--max-items", "1"]),
        &Settings::default(),
        &live(),
    )
    .await
    .unwrap();

    assert_eq!(summary.urls, 1);
    assert_eq!(summary.written, 1);

    let csv = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = csv.split("\r\n").collect();
    assert_eq!(
        lines[0],
        "author_pin,aweme_id,cid,comment_language,create_time,digg_count,reply_comment_total,\
         text,user.nickname,user.unique_id,user.avatar_thumb.url_list,share_info.url"
    );
    assert!(lines[1].starts_with("false,7171782248281165058,1,,0,4,0,live one,,,[],"));
    assert_eq!(lines[2], "");
}

#[tokio::test]
async fn missing_input_without_urls_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.json").display().to_string();
    let out = tmp.path().join("never.json");
    let out_arg = out.display().to_string();

    let err = run_with_source(&cli(&["-i", &missing, "-o", &out_arg]), &Settings::default(), &live())
        .await
        .unwrap_err();

    assert!(matches!(err.downcast_ref::<MurmurError>(), Some(MurmurError::NoUrls)));
    assert!(!out.exists());
}

#[tokio::test]
async fn unreachable_urls_still_produce_an_empty_export() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("nope.json").display().to_string();
    let out = tmp.path().join("empty.jsonl");
    let out_arg = out.display().to_string();

    let summary = run_with_source(
        &cli(&["-i", &missing, "-o", &out_arg, "-u", "https://www.tiktok.com/@x/video/9"]),
        &Settings::default(),
        &live(),
    )
    .await
    .unwrap();

    assert_eq!(summary.written, 0);
    assert_eq!(fs::read_to_string(&out).unwrap(), "");
}

#[tokio::test]
async fn malformed_start_urls_keep_sample_payloads() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("input.json");
    let body = json!({
        "startUrls": null,
        "sampleComments": { SAMPLE_URL: [{ "cid": "s1", "text": "kept" }] }
    });
    fs::write(&input, body.to_string()).unwrap();
    let input_arg = input.display().to_string();
    let out = tmp.path().join("out.json");
    let out_arg = out.display().to_string();

    let summary = run_with_source(
        &cli(&["-i", &input_arg, "-o", &out_arg, "-u", SAMPLE_URL]),
        &Settings::default(),
        &live(),
    )
    .await
    .unwrap();

    assert_eq!(summary.written, 1);
    let rows: Vec<Value> = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(rows[0]["text"], json!("kept"));
}
