//! Routine declaration extraction from page text.
//!
//! Every page's extracted text is scanned with a pattern built from the
//! language table: a routine keyword immediately followed by an identifier,
//! unless the keyword sits behind the language's end keyword (`end subroutine
//! foo` is a closing statement, not a declaration). Matches inside comments
//! or strings are accepted as false positives; names are not deduplicated.

use crate::language::Language;
use anyhow::Result;
use lopdf::Document;
use regex::Regex;

/// One routine declaration found on a (zero-based) page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineOccurrence {
    pub name: String,
    pub page: u32,
}

pub struct RoutineMatcher {
    pattern: Regex,
    end_guard: bool,
}

impl RoutineMatcher {
    /// Build the matcher for a language, or None when the language has no
    /// routine keywords to look for.
    pub fn for_language(language: &Language) -> Option<RoutineMatcher> {
        if language.routine_keywords.is_empty() {
            return None;
        }
        let keywords = language.routine_keywords.join("|");

        // the regex crate has no lookbehind, so instead of excluding matches
        // preceded by the end keyword we optionally consume it and drop those
        // occurrences; consuming the whole closing statement also keeps the
        // inner keyword from re-matching
        let pattern = match language.end_keyword {
            Some(end) => format!(r"(?:\b({end})\s+)?\b(?:{keywords})\s+(\w+)"),
            None => format!(r"\b(?:{keywords})\s+(\w+)"),
        };
        let pattern = Regex::new(&pattern).expect("language table patterns are well-formed");

        Some(RoutineMatcher {
            pattern,
            end_guard: language.end_keyword.is_some(),
        })
    }

    /// All declarations in `text`, in the order they occur.
    pub fn scan(&self, text: &str, page: u32) -> Vec<RoutineOccurrence> {
        let mut found = Vec::new();
        for caps in self.pattern.captures_iter(text) {
            let name = if self.end_guard {
                if caps.get(1).is_some() {
                    // a closing statement, not a declaration
                    continue;
                }
                caps.get(2)
            } else {
                caps.get(1)
            };
            if let Some(name) = name {
                found.push(RoutineOccurrence {
                    name: name.as_str().to_string(),
                    page,
                });
            }
        }
        found
    }
}

/// Scan every page of the document, in page order.
pub fn extract_routines(
    doc: &Document,
    page_count: u32,
    matcher: &RoutineMatcher,
) -> Result<Vec<RoutineOccurrence>> {
    let mut occurrences = Vec::new();
    for page in 0..page_count {
        // lopdf numbers pages from 1
        let text = match doc.extract_text(&[page + 1]) {
            Ok(text) => text,
            Err(e) => {
                // a page we can't decode just contributes no occurrences
                log::warn!("failed to extract text from page {page}: {e}");
                continue;
            }
        };
        occurrences.extend(matcher.scan(&text, page));
    }
    Ok(occurrences)
}
