use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::debug;

use crate::config::MatchMode;
use crate::errors::{SearchError, SearchResult};
use crate::metrics::SearchMetrics;

/// Compiled patterns keyed by (pattern text, case-insensitive flag)
static PATTERN_CACHE: Lazy<DashMap<(String, bool), Arc<Regex>>> = Lazy::new(DashMap::new);

/// Compiles a regex-mode item, reusing an earlier compilation when possible.
///
/// Case-insensitivity is a compile flag; the pattern text itself is never
/// lowercased.
pub fn compile_pattern(
    pattern: &str,
    case_insensitive: bool,
    metrics: &SearchMetrics,
) -> SearchResult<Arc<Regex>> {
    let key = (pattern.to_string(), case_insensitive);
    if let Some(entry) = PATTERN_CACHE.get(&key) {
        metrics.record_cache_operation(true);
        return Ok(entry.clone());
    }

    let regex = RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|e| SearchError::invalid_pattern(pattern, e))?;
    let regex = Arc::new(regex);

    metrics.record_cache_operation(false);
    debug!(
        "Compiled pattern '{}' (case insensitive: {})",
        pattern, case_insensitive
    );
    PATTERN_CACHE.insert(key, regex.clone());
    Ok(regex)
}

/// Lowercases `text` when folding is on, borrowing it otherwise
pub fn fold_case(text: &str, case_insensitive: bool) -> Cow<'_, str> {
    if case_insensitive {
        Cow::Owned(text.to_lowercase())
    } else {
        Cow::Borrowed(text)
    }
}

/// A prepared item, ready to be compared against elements
#[derive(Debug, Clone)]
pub enum Needle {
    /// Searches for absent elements only
    Absent,
    /// Literal text, already case-folded if the search is case-insensitive
    Text(String),
    /// Compiled regex-mode item
    Pattern(Arc<Regex>),
}

impl Needle {
    /// Builds a literal needle, folding case when requested
    pub fn text(item: Option<&str>, case_insensitive: bool) -> Self {
        match item {
            Some(text) => Needle::Text(fold_case(text, case_insensitive).into_owned()),
            None => Needle::Absent,
        }
    }

    /// Builds a regex needle; absent items stay absent
    pub fn pattern(
        item: Option<&str>,
        case_insensitive: bool,
        metrics: &SearchMetrics,
    ) -> SearchResult<Self> {
        match item {
            Some(text) => Ok(Needle::Pattern(compile_pattern(
                text,
                case_insensitive,
                metrics,
            )?)),
            None => Ok(Needle::Absent),
        }
    }
}

/// Decides whether a needle matches an element under one mode and word
/// separator.
#[derive(Debug, Clone)]
pub struct Matcher {
    mode: MatchMode,
    word_separator: Option<String>,
}

impl Matcher {
    /// Creates a matcher. The separator is dropped for modes that ignore it.
    pub fn new(mode: MatchMode, word_separator: Option<&str>) -> Self {
        let word_separator = word_separator
            .filter(|_| mode.uses_word_separator())
            .map(str::to_string);
        Self {
            mode,
            word_separator,
        }
    }

    pub fn word_separator(&self) -> Option<&str> {
        self.word_separator.as_deref()
    }

    /// Compares one needle against one element.
    ///
    /// Absence only ever matches absence. Text needles and elements are
    /// expected to be folded the same way by the caller.
    pub fn matches(&self, needle: &Needle, element: Option<&str>) -> bool {
        let element = match (needle, element) {
            (Needle::Absent, element) => return element.is_none(),
            (_, None) => return false,
            (_, Some(element)) => element,
        };

        match needle {
            Needle::Absent => false,
            Needle::Pattern(regex) => regex.is_match(element),
            Needle::Text(item) => self.matches_text(item, element),
        }
    }

    fn matches_text(&self, item: &str, element: &str) -> bool {
        let sep = self.word_separator();
        match self.mode {
            MatchMode::Exact => item == element,
            // Regex items are always compiled into `Needle::Pattern`
            MatchMode::Regex => false,
            mode => {
                (mode.has_prefix() && is_prefix(item, element, sep))
                    || (mode.has_infix() && is_infix(item, element, sep))
                    || (mode.has_suffix() && is_suffix(item, element, sep))
            }
        }
    }
}

/// `item` starts `element` and, with a separator, is followed by the end of
/// the element or by the separator.
pub fn is_prefix(item: &str, element: &str, sep: Option<&str>) -> bool {
    if !element.starts_with(item) {
        return false;
    }
    match sep {
        None => true,
        Some(sep) => element[item.len()..].is_empty() || element[item.len()..].starts_with(sep),
    }
}

/// `item` ends `element` and, with a separator, is preceded by the start of
/// the element or by the separator.
pub fn is_suffix(item: &str, element: &str, sep: Option<&str>) -> bool {
    if !element.ends_with(item) {
        return false;
    }
    let head = &element[..element.len() - item.len()];
    match sep {
        None => true,
        Some(sep) => head.is_empty() || head.ends_with(sep),
    }
}

/// Some occurrence of `item` sits away from both edges of `element`.
///
/// With a separator the occurrence must be enclosed by the separator on both
/// sides; touching an edge never qualifies. Every occurrence is tried,
/// overlapping ones included, so `"a"` is an infix of `"aab"`.
pub fn is_infix(item: &str, element: &str, sep: Option<&str>) -> bool {
    let end = |idx: usize| idx + item.len();
    match sep {
        None => occurrences(element, item).any(|idx| idx > 0 && end(idx) < element.len()),
        Some(sep) => occurrences(element, item)
            .any(|idx| element[..idx].ends_with(sep) && element[end(idx)..].starts_with(sep)),
    }
}

/// Byte offsets of every occurrence of `item` in `element`, overlapping ones
/// included. The empty item occurs at every char boundary.
fn occurrences<'a>(element: &'a str, item: &'a str) -> impl Iterator<Item = usize> + 'a {
    let mut from = Some(0);
    std::iter::from_fn(move || {
        let start = from?;
        let found = element[start..].find(item).map(|offset| start + offset);
        from = found.and_then(|idx| {
            element[idx..]
                .chars()
                .next()
                .map(|c| idx + c.len_utf8())
        });
        found
    })
}
