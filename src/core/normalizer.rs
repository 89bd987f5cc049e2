//! Cleans one post into plain sentences the readability formula can count.
//!
//! Passes run in a fixed order, each on the output of the previous one:
//! URLs, hashtags, @-mentions, HTML entities, newlines, then whitespace and the
//! terminating period.

use regex::Regex;
use std::sync::LazyLock;

/// Returned instead of text when nothing readable is left.
pub const SENTINEL: &str = " ";

static RE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://(?:www\.)?[-a-z0-9@:%._+~#=]{1,256}\.[a-z]{2,4}\b[-a-z0-9@:%_+.~#?&/=]*")
        .expect("URL pattern compiles")
});

static RE_HASHTAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S*#(?:\[[^\]]+\]|\S+)").expect("hashtag pattern compiles"));

// The leading boundary character is captured so it can be put back.
static RE_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)(^|[^@\w])@\w{1,15}\b ").expect("mention pattern compiles")
});

static RE_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n").expect("newline pattern compiles"));

static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern compiles"));

pub fn normalize(raw: &str) -> String {
    let text = RE_URL.replace_all(raw, "");
    let text = RE_HASHTAG.replace_all(&text, "");
    let text = strip_mentions(&text);
    let text = html_escape::decode_html_entities(&text);
    let text = RE_NEWLINE.replace_all(&text, ". ");
    let text = RE_WHITESPACE.replace_all(&text, " ");

    let body = text.trim().trim_end_matches(|c: char| c == '.' || c.is_whitespace());
    if !body.chars().any(char::is_alphanumeric) {
        return SENTINEL.to_string();
    }

    let mut out = String::with_capacity(body.len() + 1);
    out.push_str(body);
    out.push('.');
    out
}

pub fn is_sentinel(text: &str) -> bool {
    text == SENTINEL
}

/// Adjacent mentions share their separating space, so a single pass leaves every
/// second one behind. Repeat until none match; each round removes at least one.
fn strip_mentions(text: &str) -> String {
    let mut current = text.to_string();
    while RE_MENTION.is_match(&current) {
        current = RE_MENTION.replace_all(&current, "${1}").into_owned();
    }
    current
}
