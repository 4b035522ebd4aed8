use std::collections::HashSet;
use tracing::{debug, info, trace};

use super::request::PreparedSearch;
use crate::config::SearchConfig;
use crate::errors::SearchResult;
use crate::metrics::SearchMetrics;
use crate::results::{FindOutput, SearchStats, Termination};

/// Searches every sequence for every item.
///
/// Items are tried in order; for each item, sequences in order; for each
/// sequence, elements in order. An element that matched once is skipped for
/// all later items. Results keep that discovery order unless `shuffle` is
/// set.
pub fn find(
    items: &[Option<String>],
    sequences: &[Vec<Option<String>>],
    config: &SearchConfig,
) -> SearchResult<FindOutput> {
    find_with_metrics(items, sequences, config, &SearchMetrics::new())
}

/// Same as [`find`], recording counters into `metrics`
pub fn find_with_metrics(
    items: &[Option<String>],
    sequences: &[Vec<Option<String>>],
    config: &SearchConfig,
    metrics: &SearchMetrics,
) -> SearchResult<FindOutput> {
    info!(
        "Starting {} search for {} items across {} sequences",
        config.mode,
        items.len(),
        sequences.len()
    );

    let prepared = PreparedSearch::new(items, sequences, config, metrics)?;
    let mut output = search_prepared(&prepared, config);

    metrics.record_search(
        output.stats.comparisons,
        output.stats.matches,
        output.stats.skipped,
    );

    if config.shuffle {
        debug!("Shuffling {} results", output.len());
        output.shuffle(config.seed);
    }

    metrics.log_stats();

    info!(
        "Search complete. Found {} results with {} comparisons ({})",
        output.len(),
        output.stats.comparisons,
        output.stats.termination
    );

    Ok(output)
}

/// Signed result limit, decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResultBudget {
    Unbounded,
    /// Stop once this many results were collected
    Results(usize),
    /// Stop once this many distinct items matched
    Items(usize),
}

impl ResultBudget {
    fn from_limit(limit: i64) -> Self {
        let to_usize = |n: u64| usize::try_from(n).unwrap_or(usize::MAX);
        match limit {
            0 => ResultBudget::Unbounded,
            n if n > 0 => ResultBudget::Results(to_usize(n.unsigned_abs())),
            n => ResultBudget::Items(to_usize(n.unsigned_abs())),
        }
    }

    fn reached(self, results: usize, items_satisfied: usize) -> bool {
        match self {
            ResultBudget::Unbounded => false,
            ResultBudget::Results(max) => results >= max,
            ResultBudget::Items(max) => items_satisfied >= max,
        }
    }
}

/// Which elements are used up and which items have matched
#[derive(Debug)]
struct MatchRecord {
    matched: Vec<Vec<bool>>,
    satisfied: Vec<bool>,
    satisfied_count: usize,
}

impl MatchRecord {
    fn new(item_count: usize, sequences: &[Vec<Option<String>>]) -> Self {
        Self {
            matched: sequences.iter().map(|s| vec![false; s.len()]).collect(),
            satisfied: vec![false; item_count],
            satisfied_count: 0,
        }
    }

    fn is_matched(&self, seq_index: usize, el_index: usize) -> bool {
        self.matched[seq_index][el_index]
    }

    fn mark(&mut self, item_index: usize, seq_index: usize, el_index: usize) {
        self.matched[seq_index][el_index] = true;
        if !self.satisfied[item_index] {
            self.satisfied[item_index] = true;
            self.satisfied_count += 1;
        }
    }
}

fn search_prepared(prepared: &PreparedSearch<'_>, config: &SearchConfig) -> FindOutput {
    let budget = ResultBudget::from_limit(config.max_results);
    let max_comparisons = config.max_comparisons;

    let mut record = MatchRecord::new(prepared.needles.len(), prepared.originals);
    let mut seen: HashSet<Option<&str>> = HashSet::new();
    let mut values = Vec::new();
    let mut stats = SearchStats::default();

    'search: for (item_index, needle) in prepared.needles.iter().enumerate() {
        for (seq_index, sequence) in prepared.originals.iter().enumerate() {
            for (el_index, original) in sequence.iter().enumerate() {
                if record.is_matched(seq_index, el_index) {
                    stats.skipped += 1;
                    continue;
                }

                stats.comparisons += 1;
                let matched = prepared
                    .matcher
                    .matches(needle, prepared.match_text(seq_index, el_index));

                if matched {
                    stats.matches += 1;
                    trace!(
                        "Item {} matched element {} of sequence {}: {:?}",
                        item_index,
                        el_index,
                        seq_index,
                        original
                    );
                    if !config.unique || seen.insert(prepared.dedup_key(seq_index, el_index)) {
                        values.push(original.clone());
                    } else {
                        stats.duplicates_suppressed += 1;
                    }
                    record.mark(item_index, seq_index, el_index);
                }

                if max_comparisons > 0 && stats.comparisons >= max_comparisons {
                    debug!("Comparison limit of {} reached", max_comparisons);
                    stats.termination = Termination::ComparisonLimit;
                    break 'search;
                }

                if matched && budget.reached(values.len(), record.satisfied_count) {
                    debug!("Result limit of {} reached", config.max_results);
                    stats.termination = Termination::ResultLimit;
                    break 'search;
                }
            }
        }
    }

    stats.items_satisfied = record.satisfied_count;
    FindOutput { values, stats }
}
