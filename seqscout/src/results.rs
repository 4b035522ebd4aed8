//! Result types returned by a search.
//!
//! Values are the original element values, before any case folding, in the
//! order the search loop discovered them. The loop owns uniqueness; the only
//! post-processing left here is the optional shuffle.
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use std::fmt;

/// Why the search loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Every item was compared against every remaining element
    #[default]
    Exhausted,
    /// The result budget was reached
    ResultLimit,
    /// The comparison budget was reached
    ComparisonLimit,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Termination::Exhausted => "exhausted",
            Termination::ResultLimit => "result limit",
            Termination::ComparisonLimit => "comparison limit",
        };
        f.write_str(text)
    }
}

/// Counters for a single search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SearchStats {
    /// Item/element pairs actually compared
    pub comparisons: u64,
    /// Pairs skipped because the element had already matched
    pub skipped: u64,
    /// Successful comparisons, including ones dropped as duplicates
    pub matches: u64,
    /// Matches not appended because an equal value was already collected
    pub duplicates_suppressed: u64,
    /// Distinct items that matched at least once
    pub items_satisfied: usize,
    pub termination: Termination,
}

/// The complete search result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FindOutput {
    pub values: Vec<Option<String>>,
    pub stats: SearchStats,
}

impl FindOutput {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Permutes the values uniformly; a seed makes the order reproducible
    pub fn shuffle(&mut self, seed: Option<u64>) {
        match seed {
            Some(seed) => self.values.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => self.values.shuffle(&mut rand::thread_rng()),
        }
    }

    pub fn into_values(self) -> Vec<Option<String>> {
        self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(values: &[&str]) -> FindOutput {
        FindOutput {
            values: values.iter().map(|v| Some(v.to_string())).collect(),
            stats: SearchStats::default(),
        }
    }

    fn sorted(values: &[Option<String>]) -> Vec<Option<String>> {
        let mut values = values.to_vec();
        values.sort();
        values
    }

    #[test]
    fn test_empty_output() {
        let out = FindOutput::default();
        assert!(out.is_empty());
        assert_eq!(out.len(), 0);
        assert_eq!(out.stats.termination, Termination::Exhausted);
    }

    #[test]
    fn test_shuffle_keeps_values() {
        let original = output(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        let mut shuffled = original.clone();
        shuffled.shuffle(None);

        assert_eq!(shuffled.len(), original.len());
        assert_eq!(sorted(&shuffled.values), sorted(&original.values));
    }

    #[test]
    fn test_seeded_shuffle_is_reproducible() {
        let mut first = output(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        let mut second = first.clone();
        first.shuffle(Some(42));
        second.shuffle(Some(42));
        assert_eq!(first.values, second.values);
    }

    #[test]
    fn test_termination_display() {
        assert_eq!(Termination::ResultLimit.to_string(), "result limit");
        assert_eq!(
            serde_json::to_string(&Termination::ComparisonLimit).unwrap(),
            "\"comparison_limit\""
        );
    }
}
