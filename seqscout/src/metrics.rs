use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Tracks search counters across one or more searches.
///
/// Cloning shares the underlying counters, so a handle can be passed to
/// several searches (or threads) and read back afterwards.
#[derive(Debug, Clone)]
pub struct SearchMetrics {
    searches: Arc<AtomicU64>,
    comparisons: Arc<AtomicU64>,
    matches: Arc<AtomicU64>,
    skipped: Arc<AtomicU64>,

    // Pattern cache metrics
    cache_hits: Arc<AtomicU64>,
    cache_misses: Arc<AtomicU64>,
}

impl SearchMetrics {
    /// Creates a new SearchMetrics instance
    pub fn new() -> Self {
        Self {
            searches: Arc::new(AtomicU64::new(0)),
            comparisons: Arc::new(AtomicU64::new(0)),
            matches: Arc::new(AtomicU64::new(0)),
            skipped: Arc::new(AtomicU64::new(0)),
            cache_hits: Arc::new(AtomicU64::new(0)),
            cache_misses: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records the totals of a finished search
    pub fn record_search(&self, comparisons: u64, matches: u64, skipped: u64) {
        self.searches.fetch_add(1, Ordering::Relaxed);
        let total = self.comparisons.fetch_add(comparisons, Ordering::Relaxed) + comparisons;
        self.matches.fetch_add(matches, Ordering::Relaxed);
        self.skipped.fetch_add(skipped, Ordering::Relaxed);
        debug!(
            "Search recorded: {} comparisons, {} matches, total comparisons: {}",
            comparisons, matches, total
        );
    }

    /// Records a compiled-pattern cache lookup
    pub fn record_cache_operation(&self, hit: bool) {
        if hit {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.cache_misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn cache_hits(&self) -> u64 {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> u64 {
        self.cache_misses.load(Ordering::Relaxed)
    }

    /// Gets current statistics
    pub fn get_stats(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            searches: self.searches.load(Ordering::Relaxed),
            comparisons: self.comparisons.load(Ordering::Relaxed),
            matches: self.matches.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            cache_hits: self.cache_hits(),
            cache_misses: self.cache_misses(),
        }
    }

    /// Logs current statistics
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Search stats:\n\
             Searches: {}\n\
             Comparisons: {}\n\
             Matches: {}\n\
             Skipped (already matched): {}\n\
             Pattern cache hits/misses: {}/{}",
            stats.searches,
            stats.comparisons,
            stats.matches,
            stats.skipped,
            stats.cache_hits,
            stats.cache_misses
        );
    }
}

impl Default for SearchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the counters in [`SearchMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub searches: u64,
    pub comparisons: u64,
    pub matches: u64,
    pub skipped: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
}
