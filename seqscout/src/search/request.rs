//! Turns a caller-facing request into what the search loop consumes.
//!
//! Requests accept both singular and plural forms of their inputs (`item`
//! and `items`, `sequence` and `sequences`). Normalization flattens each pair
//! into one ordered list, singular value first. Preparation then validates
//! the configuration, folds case and compiles regex items, so that every
//! error is reported before the first comparison.
//!
//! A request in JSON form:
//! ```json
//! {
//!   "item": "a.b",
//!   "sequences": [["a", "a.b.", "a.b", "a.bb"], ["a.b.c", "b.c.d"]],
//!   "config": { "mode": "prefix", "word_separator": "." }
//! }
//! ```
//! `"item": null` searches for absent elements; leaving `item` out means
//! there is no singular item. The `config` object only overrides the
//! settings it names.
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::path::Path;
use tracing::debug;

use super::matcher::{fold_case, Matcher, Needle};
use crate::config::{ConfigOverrides, MatchMode, SearchConfig};
use crate::errors::SearchResult;
use crate::metrics::SearchMetrics;
use crate::results::FindOutput;

/// A search request with the singular/plural parameter forms still apart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindRequest {
    /// Single item; `Some(None)` searches for absent elements
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub item: Option<Option<String>>,

    #[serde(default)]
    pub items: Vec<Option<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<Vec<Option<String>>>,

    #[serde(default)]
    pub sequences: Vec<Vec<Option<String>>>,

    #[serde(default)]
    pub config: ConfigOverrides,
}

/// Keeps an explicit `null` apart from a missing field
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl FindRequest {
    /// Reads a JSON request from a file
    pub fn from_json_file(path: &Path) -> SearchResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> SearchResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Flattens the singular/plural forms, resolving the config over the defaults
    pub fn normalize(self) -> NormalizedRequest {
        self.normalize_with(SearchConfig::default())
    }

    /// Flattens the singular/plural forms, resolving the config over `base`
    pub fn normalize_with(self, base: SearchConfig) -> NormalizedRequest {
        let mut items = Vec::with_capacity(self.items.len() + 1);
        items.extend(self.item);
        items.extend(self.items);

        let mut sequences = Vec::with_capacity(self.sequences.len() + 1);
        sequences.extend(self.sequence);
        sequences.extend(self.sequences);

        NormalizedRequest {
            items,
            sequences,
            config: base.merge_overrides(self.config),
        }
    }

    /// Normalizes and runs the request
    pub fn run(self) -> SearchResult<FindOutput> {
        self.normalize().run()
    }
}

/// Flat, ordered inputs for one search, with the configuration resolved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRequest {
    pub items: Vec<Option<String>>,
    pub sequences: Vec<Vec<Option<String>>>,
    pub config: SearchConfig,
}

impl NormalizedRequest {
    pub fn run(&self) -> SearchResult<FindOutput> {
        super::engine::find(&self.items, &self.sequences, &self.config)
    }
}

/// Validated, case-folded and compiled inputs for the search loop.
///
/// Elements are folded once here instead of once per comparison.
#[derive(Debug)]
pub struct PreparedSearch<'a> {
    pub(crate) matcher: Matcher,
    pub(crate) needles: Vec<Needle>,
    pub(crate) originals: &'a [Vec<Option<String>>],
    folded: Vec<Vec<Option<Cow<'a, str>>>>,
    fold_for_matching: bool,
}

impl<'a> PreparedSearch<'a> {
    pub fn new(
        items: &[Option<String>],
        sequences: &'a [Vec<Option<String>>],
        config: &SearchConfig,
        metrics: &SearchMetrics,
    ) -> SearchResult<Self> {
        config.validate()?;

        let case_insensitive = config.case_insensitive;
        let needles = if config.mode == MatchMode::Regex {
            items
                .iter()
                .map(|item| Needle::pattern(item.as_deref(), case_insensitive, metrics))
                .collect::<SearchResult<Vec<_>>>()?
        } else {
            items
                .iter()
                .map(|item| Needle::text(item.as_deref(), case_insensitive))
                .collect()
        };

        let folded: Vec<Vec<Option<Cow<'a, str>>>> = sequences
            .iter()
            .map(|sequence| {
                sequence
                    .iter()
                    .map(|element| {
                        element
                            .as_deref()
                            .map(|text| fold_case(text, case_insensitive))
                    })
                    .collect()
            })
            .collect();

        if config.word_separator.is_some() && !config.mode.uses_word_separator() {
            debug!("Word separator ignored in {} mode", config.mode);
        }

        Ok(Self {
            matcher: Matcher::new(config.mode, config.word_separator.as_deref()),
            needles,
            originals: sequences,
            folded,
            // Regex mode carries case-insensitivity in the pattern
            fold_for_matching: case_insensitive && config.mode != MatchMode::Regex,
        })
    }

    /// Text the matcher sees for an element
    pub(crate) fn match_text(&self, seq_index: usize, el_index: usize) -> Option<&str> {
        if self.fold_for_matching {
            self.folded[seq_index][el_index].as_deref()
        } else {
            self.originals[seq_index][el_index].as_deref()
        }
    }

    /// Key used to detect duplicate results
    pub(crate) fn dedup_key(&self, seq_index: usize, el_index: usize) -> Option<&str> {
        self.folded[seq_index][el_index].as_deref()
    }
}
