// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2026 tweetkit contributors

//! Tweet text normalization
//!
//! Applies a fixed, ordered substitution chain to raw tweet text:
//! 1. literal fixups for mis-encoded artifacts, then HTML entity unescape,
//!    then collapsing runs of spaces
//! 2. sentinel substitution for retweet prefixes, mentions and URLs
//! 3. collapsing runs of 3+ repeated characters to 2
//! 4. trim and lowercase
//!
//! Pure string-in/string-out; there are no error conditions. The rule set
//! is fixed at construction and stateless across calls.

use html_escape::decode_html_entities;
use regex::Regex;

/// Beginning-of-sentence tag
pub const XBOS: &str = "xbos";
/// Data field tag
pub const XFLD: &str = "xfld";
/// Non-English occurrence
pub const XNEL: &str = "xnel";
/// URL occurrence
pub const XURL: &str = "xurl";
/// @person occurrence
pub const XATP: &str = "xatp";
/// Retweet, unmodified
pub const XRTU: &str = "xrtu:";
/// Retweet, modified
pub const XRTM: &str = "xrtm:";

/// Literal replacements applied first, in order. Later entries see the
/// output of earlier ones, so the bare-backslash rule comes after the
/// escaped-sequence rules it would otherwise mangle.
const FIXUPS: &[(&str, &str)] = &[
    ("#39;", "'"),
    ("amp;", "&"),
    ("#146;", "'"),
    ("nbsp;", " "),
    ("#36;", "$"),
    ("\\n", "\n"),
    ("quot;", "'"),
    ("<br />", "\n"),
    ("\\\"", "\""),
    ("<unk>", "u_n"),
    (" @.@ ", "."),
    (" @-@ ", "-"),
    ("\\", " \\ "),
    ("\n", " "),
    ("\t", " "),
    ("\r", " "),
    ("rt @", "@"),
];

/// Tweet normalizer with its substitution regexes compiled once.
#[derive(Debug, Clone)]
pub struct TweetNormalizer {
    re_spaces: Regex,
    re_retweet_unmodified: Regex,
    re_retweet_modified: Regex,
    re_mention: Regex,
    re_url: Regex,
}

impl TweetNormalizer {
    pub fn new() -> Self {
        Self {
            re_spaces: Regex::new(r"  +").expect("valid regex"),
            re_retweet_unmodified: Regex::new(r"^RT @ \w+:").expect("valid regex"),
            re_retweet_modified: Regex::new(r"^MRT @ \w+:").expect("valid regex"),
            re_mention: Regex::new(r"@ \w+").expect("valid regex"),
            re_url: Regex::new(r"http\S+").expect("valid regex"),
        }
    }

    /// Run the full substitution chain over one tweet.
    pub fn normalize(&self, tweet: &str) -> String {
        let tweet = self.fixup(tweet);
        let tweet = self.re_retweet_unmodified.replace(&tweet, XRTU);
        let tweet = self.re_retweet_modified.replace(&tweet, XRTM);
        let tweet = self.re_mention.replace_all(&tweet, XATP);
        let tweet = self.re_url.replace_all(&tweet, XURL);
        let tweet = collapse_repeats(&tweet);
        tweet.trim().to_lowercase()
    }

    /// Literal fixups, HTML entity unescape, then collapse every run of two
    /// or more spaces to one.
    fn fixup(&self, text: &str) -> String {
        let mut text = text.to_string();
        for (pattern, replacement) in FIXUPS {
            text = text.replace(pattern, replacement);
        }
        let text = decode_html_entities(&text);
        self.re_spaces.replace_all(&text, " ").into_owned()
    }
}

impl Default for TweetNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop every non-ASCII character. A naive non-English filter.
pub fn clean_non_ascii(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii()).collect()
}

/// Collapse every run of three or more identical characters down to two.
fn collapse_repeats(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run_char: Option<char> = None;
    let mut run_len = 0usize;

    for c in text.chars() {
        if Some(c) == run_char {
            run_len += 1;
        } else {
            run_char = Some(c);
            run_len = 1;
        }
        if run_len <= 2 {
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_retweet_url_and_repeats() {
        let normalizer = TweetNormalizer::new();

        let cleaned = normalizer.normalize("RT @ user: check http://x.co  now!!!");

        assert_eq!(cleaned, "xrtu: check xurl now!!");
    }

    #[test]
    fn test_normalize_modified_retweet_prefix() {
        let normalizer = TweetNormalizer::new();

        let cleaned = normalizer.normalize("MRT @ sam: going viral");

        assert_eq!(cleaned, "xrtm: going viral");
    }

    #[test]
    fn test_normalize_mentions_anywhere() {
        let normalizer = TweetNormalizer::new();

        let cleaned = normalizer.normalize("Hello @ Alice how are youuuuu");

        assert_eq!(cleaned, "hello xatp how are youu");
    }

    #[test]
    fn test_normalize_lowercase_retweet_marker() {
        let normalizer = TweetNormalizer::new();

        // A mid-string lowercase "rt @" loses its marker before the mention
        // rule runs
        let cleaned = normalizer.normalize("so true rt @ bob earlier");

        assert_eq!(cleaned, "so true xatp earlier");
    }

    #[test]
    fn test_normalize_url_variants() {
        let normalizer = TweetNormalizer::new();

        let cleaned = normalizer.normalize("see https://t.co/ab12 and http://bit.ly/x");

        assert_eq!(cleaned, "see xurl and xurl");
    }

    #[test]
    fn test_fixup_misencoded_artifacts() {
        let normalizer = TweetNormalizer::new();

        let cleaned = normalizer.normalize("it#39;s a nbsp;deal for #36;5");

        assert_eq!(cleaned, "it's a deal for $5");
    }

    #[test]
    fn test_html_entities_unescaped() {
        let normalizer = TweetNormalizer::new();

        let cleaned = normalizer.normalize("I &lt;3 this");

        assert_eq!(cleaned, "i <3 this");
    }

    #[test]
    fn test_whitespace_flattened() {
        let normalizer = TweetNormalizer::new();

        let cleaned = normalizer.normalize("a\tb\nc\rd   e");

        assert_eq!(cleaned, "a b c d e");
    }

    #[test]
    fn test_collapse_keeps_pairs() {
        let normalizer = TweetNormalizer::new();

        let cleaned = normalizer.normalize("sooooo goooood, yess");

        assert_eq!(cleaned, "soo good, yess");
    }

    #[test]
    fn test_empty_input() {
        let normalizer = TweetNormalizer::new();

        assert_eq!(normalizer.normalize(""), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = TweetNormalizer::new();
        let inputs = [
            "RT @ user: check http://x.co  now!!!",
            "Hello @ Alice how are youuuuu",
            "it#39;s a nbsp;deal",
            "plain text stays plain",
        ];

        for input in inputs {
            let once = normalizer.normalize(input);
            let twice = normalizer.normalize(&once);
            assert_eq!(twice, once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_clean_non_ascii() {
        assert_eq!(clean_non_ascii("café ☕ break"), "caf  break");
        assert_eq!(clean_non_ascii("all ascii"), "all ascii");
    }
}
