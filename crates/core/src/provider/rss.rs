//! Tag-bounded scanner for Nyaa-style RSS feeds.
//!
//! Feeds are scanned item by item with regexes rather than a full XML parser:
//! each field is the first `<tag ...>text</tag>` inside the item whose text
//! holds no nested markup.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::lenient::parse_int_prefix;
use super::FetchError;

static ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<item>(.*?)</item>").expect("valid item regex"));

static TITLE: Lazy<Regex> = Lazy::new(|| tag_regex("title"));
static LINK: Lazy<Regex> = Lazy::new(|| tag_regex("link"));
static GUID: Lazy<Regex> = Lazy::new(|| tag_regex("guid"));
static PUB_DATE: Lazy<Regex> = Lazy::new(|| tag_regex("pubDate"));
static INFO_HASH: Lazy<Regex> = Lazy::new(|| tag_regex("nyaa:infoHash"));
static SIZE: Lazy<Regex> = Lazy::new(|| tag_regex("nyaa:size"));
static SEEDERS: Lazy<Regex> = Lazy::new(|| tag_regex("nyaa:seeders"));
static LEECHERS: Lazy<Regex> = Lazy::new(|| tag_regex("nyaa:leechers"));
static DOWNLOADS: Lazy<Regex> = Lazy::new(|| tag_regex("nyaa:downloads"));

/// One `<item>` of the feed, with raw text fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    /// `.torrent` download link.
    pub link: String,
    /// View page, when the feed provides one.
    pub guid: Option<String>,
    pub pub_date: Option<DateTime<Utc>>,
    /// Lowercased info-hash, possibly empty.
    pub info_hash: String,
    /// Size exactly as advertised, e.g. "1.4 GiB".
    pub size: String,
    pub seeders: u32,
    pub leechers: u32,
    pub downloads: u64,
}

/// Extract every item of an RSS document.
///
/// A body without a `<channel` element is not a feed and is rejected.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedItem>, FetchError> {
    if !xml.contains("<channel") {
        return Err(FetchError::Decode(format!(
            "not an RSS document: {}",
            xml.chars().take(80).collect::<String>()
        )));
    }

    Ok(ITEM
        .captures_iter(xml)
        .map(|caps| parse_item(caps.get(1).map_or("", |m| m.as_str())))
        .collect())
}

fn parse_item(item: &str) -> FeedItem {
    let guid = tag_content(&GUID, item);

    FeedItem {
        title: tag_content(&TITLE, item),
        link: tag_content(&LINK, item),
        guid: (!guid.is_empty()).then_some(guid),
        pub_date: parse_pub_date(&tag_content(&PUB_DATE, item)),
        info_hash: tag_content(&INFO_HASH, item).to_lowercase(),
        size: tag_content(&SIZE, item),
        seeders: parse_count(&tag_content(&SEEDERS, item)) as u32,
        leechers: parse_count(&tag_content(&LEECHERS, item)) as u32,
        downloads: parse_count(&tag_content(&DOWNLOADS, item)),
    }
}

/// Matches `<tag ...>text</tag>` where the text holds no nested markup.
fn tag_regex(tag: &str) -> Regex {
    let pattern = format!(
        r"<{tag}(?:\s[^>]*)?>([^<]*)</{tag}>",
        tag = regex_lite::escape(tag)
    );
    Regex::new(&pattern).expect("valid tag regex")
}

/// Text of the first match of `re` in `xml`, trimmed and unescaped.
fn tag_content(re: &Regex, xml: &str) -> String {
    re.captures(xml)
        .and_then(|caps| caps.get(1))
        .map(|m| unescape(m.as_str().trim()))
        .unwrap_or_default()
}

fn parse_count(text: &str) -> u64 {
    parse_int_prefix(text).unwrap_or(0).clamp(0, u32::MAX as i64) as u64
}

fn parse_pub_date(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
