pub mod config;
pub mod errors;
pub mod metrics;
pub mod results;
pub mod search;

pub use crate::config::{ConfigOverrides, MatchMode, SearchConfig};
pub use crate::errors::{SearchError, SearchResult};
pub use crate::metrics::SearchMetrics;
pub use crate::results::{FindOutput, SearchStats, Termination};
pub use crate::search::{find, FindRequest};
