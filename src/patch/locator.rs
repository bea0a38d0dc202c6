// src/patch/locator.rs

//! Fuzzy block locator: finds the substring of a page that a model-authored
//! search block was aiming at, tolerating whitespace differences (different
//! indentation, collapsed line breaks) but nothing else.

use regex::Regex;

/// A located occurrence of a search block inside a haystack. `text` is the
/// literal substring of the haystack that matched; replacement must remove
/// `text`, not the search block, so whitespace actually present in the
/// haystack goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    pub start: usize,
    pub text: String,
}

/// Builds a whitespace-tolerant pattern from a literal search block.
///
/// Three relaxation passes over the escaped text:
/// 1. any run of whitespace matches zero-or-more whitespace,
/// 2. `><` admits whitespace between the tags,
/// 3. every `>` admits whitespace before it.
pub fn flexible_pattern(search_block: &str) -> String {
    let escaped = regex::escape(search_block);

    let ws_run = Regex::new(r"\s+").expect("static pattern");
    let relaxed = ws_run.replace_all(&escaped, r"\s*");

    let relaxed = relaxed.replace("><", r">\s*<");

    let before_gt = Regex::new(r"\s*>").expect("static pattern");
    before_gt.replace_all(&relaxed, r"\s*>").into_owned()
}

/// Finds the first whitespace-tolerant occurrence of `search_block` inside
/// `haystack`. First occurrence wins; overlapping matches are not considered.
pub fn locate(search_block: &str, haystack: &str) -> Option<FuzzyMatch> {
    let pattern = flexible_pattern(search_block);
    let regex = match Regex::new(&pattern) {
        Ok(regex) => regex,
        Err(e) => {
            log::warn!("Search block produced an uncompilable pattern: {}", e);
            return None;
        }
    };

    regex.find(haystack).map(|m| FuzzyMatch {
        start: m.start(),
        text: m.as_str().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_text_matches_itself() {
        let needle = "<h1>Hello</h1>";
        let m = locate(needle, "<body><h1>Hello</h1></body>").unwrap();
        assert_eq!(m.start, 6);
        assert_eq!(m.text, "<h1>Hello</h1>");
    }

    #[test]
    fn collapsed_whitespace_still_matches() {
        let search = "<div>\n  <h1>Hi</h1>\n</div>";
        let haystack = "prefix <div><h1>Hi</h1></div> suffix";
        let m = locate(search, haystack).unwrap();
        assert_eq!(m.text, "<div><h1>Hi</h1></div>");
    }

    #[test]
    fn expanded_whitespace_still_matches() {
        let search = "<div><h1>Hi</h1></div>";
        let haystack = "<div>\n    <h1>Hi</h1>\n</div>";
        let m = locate(search, haystack).unwrap();
        assert_eq!(m.start, 0);
        assert_eq!(m.text, haystack);
    }

    #[test]
    fn matched_text_is_the_haystack_span() {
        // The match must carry the haystack's own formatting so replacement
        // removes it correctly.
        let search = "<p>a</p>\n<p>b</p>";
        let haystack = "<p>a</p>   <p>b</p>";
        let m = locate(search, haystack).unwrap();
        assert_eq!(m.text, "<p>a</p>   <p>b</p>");
    }

    #[test]
    fn content_differences_do_not_match() {
        assert!(locate("<h1>Hello</h1>", "<h1>Goodbye</h1>").is_none());
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let search = "price: $4.99 (sale)";
        let haystack = "today's price: $4.99 (sale) only";
        let m = locate(search, haystack).unwrap();
        assert_eq!(m.text, "price: $4.99 (sale)");
    }

    #[test]
    fn first_occurrence_wins() {
        let m = locate("<li>x</li>", "<li>x</li><li>x</li>").unwrap();
        assert_eq!(m.start, 0);
    }
}
