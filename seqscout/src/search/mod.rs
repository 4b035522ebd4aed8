//! Matching engine and search loop.
//!
//! A search runs in three steps:
//!
//! 1. **Preparation** ([`request`]): singular and plural inputs are merged,
//!    the configuration is validated, items and elements are case-folded
//!    and regex items are compiled. Every error surfaces here.
//! 2. **Search loop** ([`engine`]): items × sequences × elements in that
//!    nesting order, one [`Matcher`] call per pair, with element
//!    exclusivity and the comparison/result budgets.
//! 3. **Finishing** ([`crate::results`]): optional shuffle.
//!
//! ```rust,ignore
//! let config = SearchConfig {
//!     mode: MatchMode::Prefix,
//!     word_separator: Some(".".to_string()),
//!     ..SearchConfig::default()
//! };
//! let output = find(&items, &sequences, &config)?;
//! for value in output.values { /* ... */ }
//! ```
//!
//! # Word separators
//!
//! With a separator, prefix, suffix and infix matches must line up with word
//! boundaries: searching for `a.b` with separator `.` finds `a.b` and
//! `a.b.c` but not `a.bb`. Without one, any substring position counts, with
//! infix additionally requiring the occurrence to touch neither edge.
pub mod engine;
pub mod matcher;
pub mod request;

pub use engine::{find, find_with_metrics};
pub use matcher::{Matcher, Needle};
pub use request::{FindRequest, NormalizedRequest, PreparedSearch};
