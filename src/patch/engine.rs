// src/patch/engine.rs

//! Patch engine: parses raw model output against the marker grammar and
//! applies it to an in-memory page set.
//!
//! The engine never fails on malformed or non-matching content; every bad
//! instruction degrades to a no-op for that instruction. Callers detect the
//! "nothing recognizable at all" case with [`contains_patch_markers`].

use crate::models::{ChangedRange, EditBlock, Page};
use crate::patch::locator;
use crate::patch::markers::{
    DIVIDER, NEW_PAGE_END, NEW_PAGE_START, PROJECT_NAME_END, PROJECT_NAME_START, REPLACE_END,
    SEARCH_START, TITLE_PAGE_END, TITLE_PAGE_START, UPDATE_PAGE_END, UPDATE_PAGE_START,
};
use regex::Regex;

/// Result of parsing an initial-generation response.
#[derive(Debug, Clone)]
pub struct FullGeneration {
    pub project_name: Option<String>,
    pub pages: Vec<Page>,
}

/// Result of applying an incremental update to a page set.
#[derive(Debug, Clone)]
pub struct UpdateResult {
    pub pages: Vec<Page>,
    pub changed_ranges: Vec<ChangedRange>,
}

/// Per-edit outcome. Non-matching search text is skipped silently, which is
/// deliberate product behavior: models occasionally hallucinate slightly
/// wrong search text, and the rest of the batch must still land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Applied(ChangedRange),
    SkippedNoMatch,
}

/// Whether the raw text carries any token of the marker grammar at all.
pub fn contains_patch_markers(raw: &str) -> bool {
    raw.contains(UPDATE_PAGE_START)
        || raw.contains(NEW_PAGE_START)
        || raw.contains(SEARCH_START)
        || raw.contains(TITLE_PAGE_START)
}

/// Parses a full-generation response: optional project name, then one page
/// per title-marker segment. No search/replace logic on this path.
pub fn parse_full_generation(raw: &str) -> FullGeneration {
    let project_name = extract_between(raw, PROJECT_NAME_START, PROJECT_NAME_END)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    let mut pages = Vec::new();
    let mut pos = 0;
    while let Some(offset) = raw[pos..].find(TITLE_PAGE_START) {
        let name_start = pos + offset + TITLE_PAGE_START.len();
        let Some(name_end) = find_from(raw, TITLE_PAGE_END, name_start) else {
            break;
        };
        let path = raw[name_start..name_end].trim().to_string();

        let segment_start = name_end + TITLE_PAGE_END.len();
        let segment_end =
            find_from(raw, TITLE_PAGE_START, segment_start).unwrap_or(raw.len());
        let segment = &raw[segment_start..segment_end];

        let html = first_fenced_block(segment).unwrap_or(segment).trim();
        if !path.is_empty() {
            pages.push(Page::new(path, html));
        }
        pos = segment_end;
    }

    FullGeneration {
        project_name,
        pages,
    }
}

/// Applies an incremental-update response against the current page set.
///
/// Update regions and new-page regions are both scanned over the original
/// raw text, in that order; neither scan sees the other's output. Changed
/// ranges come back in application order.
pub fn apply_update(current_pages: &[Page], raw: &str) -> UpdateResult {
    let mut pages: Vec<Page> = current_pages.to_vec();
    let mut changed_ranges: Vec<ChangedRange> = Vec::new();

    for region in scan_regions(raw, UPDATE_PAGE_START, UPDATE_PAGE_END) {
        let Some(index) = pages.iter().position(|p| p.path == region.path) else {
            // An update marker never creates a page; only a new-page marker
            // does. Known product behavior, not an error.
            log::debug!("Update region targets unknown page '{}', ignored", region.path);
            continue;
        };

        let mut body = region.body;
        if let Some(inner) = fenced_html_block(body) {
            if !inner.contains(SEARCH_START) {
                // The whole region is one HTML block: full-file replacement,
                // checked before any triplet scanning.
                pages[index].html = inner.trim().to_string();
                continue;
            }
            body = inner;
        }

        let mut html = pages[index].html.clone();
        for block in scan_edit_blocks(body) {
            match apply_edit_block(&mut html, &block) {
                EditOutcome::Applied(range) => changed_ranges.push(range),
                EditOutcome::SkippedNoMatch => {
                    log::debug!(
                        "Search block not found in '{}', edit skipped",
                        region.path
                    );
                }
            }
        }
        pages[index].html = html;
    }

    for region in scan_regions(raw, NEW_PAGE_START, NEW_PAGE_END) {
        let html = fenced_html_block(region.body)
            .unwrap_or(region.body)
            .trim()
            .to_string();
        if let Some(index) = pages.iter().position(|p| p.path == region.path) {
            pages[index].html = html;
        } else {
            pages.push(Page::new(region.path, html));
        }
    }

    // Leniency fallback: some models emit bare search/replace triplets with
    // no update-page wrapper. Apply them against the home page.
    if pages.len() == current_pages.len() && !raw.contains(UPDATE_PAGE_START) {
        let home_index = pages.iter().position(|p| is_home_alias(&p.path));
        let mut html = home_index
            .map(|i| pages[i].html.clone())
            .unwrap_or_default();
        let mut applied_any = false;

        for block in scan_edit_blocks(raw) {
            match apply_edit_block(&mut html, &block) {
                EditOutcome::Applied(range) => {
                    changed_ranges.push(range);
                    applied_any = true;
                }
                EditOutcome::SkippedNoMatch => {
                    log::debug!("Unwrapped search block not found in home page, edit skipped");
                }
            }
        }

        if applied_any {
            if let Some(index) = home_index {
                pages[index].html = html;
            }
        }
    }

    UpdateResult {
        pages,
        changed_ranges,
    }
}

/// Applies one edit block to `html` in place.
///
/// Empty search text means "prepend the replace text to the top of the
/// page"; anything else goes through the fuzzy locator against the current
/// (possibly already mutated) text.
pub fn apply_edit_block(html: &mut String, block: &EditBlock) -> EditOutcome {
    if block.search.trim().is_empty() {
        let replace_lines = block.replace.split('\n').count();
        *html = format!("{}\n{}", block.replace, html);
        return EditOutcome::Applied(ChangedRange {
            start_line: 1,
            end_line: replace_lines,
        });
    }

    let Some(found) = locator::locate(&block.search, html) else {
        return EditOutcome::SkippedNoMatch;
    };

    // Line numbers are derived from the pre-edit text before the match.
    let start_line = html[..found.start].split('\n').count();
    let replace_lines = block.replace.split('\n').count();
    let end_line = start_line + replace_lines - 1;

    *html = html.replacen(&found.text, &block.replace, 1);

    EditOutcome::Applied(ChangedRange {
        start_line,
        end_line,
    })
}

/// Home-page aliases the downstream callers treat as the canonical
/// top-level document.
pub fn is_home_alias(path: &str) -> bool {
    path == "/" || path == "/index" || path == "index"
}

struct Region<'a> {
    path: &'a str,
    body: &'a str,
}

/// Scans `raw` for `start_token <path> end_token <body>` regions; each body
/// runs to the next update/new-page marker or end of text.
fn scan_regions<'a>(raw: &'a str, start_token: &str, end_token: &str) -> Vec<Region<'a>> {
    let mut regions = Vec::new();
    let mut pos = 0;

    while let Some(offset) = raw[pos..].find(start_token) {
        let path_start = pos + offset + start_token.len();
        let Some(path_end) = find_from(raw, end_token, path_start) else {
            break;
        };

        let header = raw[path_start..path_end].trim();
        let body_start = path_end + end_token.len();
        let body_end = [
            find_from(raw, UPDATE_PAGE_START, body_start),
            find_from(raw, NEW_PAGE_START, body_start),
        ]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(raw.len());

        // The path is a single whitespace-free token.
        if !header.is_empty() && !header.contains(char::is_whitespace) {
            regions.push(Region {
                path: header,
                body: &raw[body_start..body_end],
            });
        }
        pos = body_end;
    }

    regions
}

/// Extracts search/divider/replace triplets left to right, non-overlapping,
/// stopping at the first incomplete triplet.
fn scan_edit_blocks(content: &str) -> Vec<EditBlock> {
    let mut blocks = Vec::new();
    let mut pos = 0;

    loop {
        let Some(search_offset) = content[pos..].find(SEARCH_START) else {
            break;
        };
        let search_start = pos + search_offset + SEARCH_START.len();
        let Some(divider_start) = find_from(content, DIVIDER, search_start) else {
            break;
        };
        let replace_start = divider_start + DIVIDER.len();
        let Some(replace_end) = find_from(content, REPLACE_END, replace_start) else {
            break;
        };

        blocks.push(EditBlock {
            search: content[search_start..divider_start].to_string(),
            replace: content[replace_start..replace_end].to_string(),
        });
        pos = replace_end + REPLACE_END.len();
    }

    blocks
}

fn find_from(text: &str, token: &str, from: usize) -> Option<usize> {
    text[from..].find(token).map(|offset| from + offset)
}

fn extract_between<'a>(text: &'a str, start_token: &str, end_token: &str) -> Option<&'a str> {
    let start = text.find(start_token)? + start_token.len();
    let end = find_from(text, end_token, start)?;
    Some(&text[start..end])
}

/// The ```html fence used by update and new-page regions.
fn fenced_html_block(text: &str) -> Option<&str> {
    let fence = Regex::new(r"(?s)```html\s*(.*?)\s*```").expect("static pattern");
    fence.captures(text).map(|c| c.get(1).expect("group 1").as_str())
}

/// First fenced code block of any (or no) language tag, for full-generation
/// segments.
fn first_fenced_block(text: &str) -> Option<&str> {
    let fence = Regex::new(r"(?s)```[a-zA-Z]*\s*(.*?)\s*```").expect("static pattern");
    fence.captures(text).map(|c| c.get(1).expect("group 1").as_str())
}
