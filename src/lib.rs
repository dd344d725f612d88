// Wallet Match - Core Library
// Exposes the normalizer, matching engine and report modules for use in
// the CLI, the TUI and tests. The engine is a pure function of its two
// inputs: no persistence, no shared state, safe to call on every trigger.

pub mod matcher;
pub mod parser;
pub mod report;

// Only compile the TUI when the feature is enabled
#[cfg(feature = "tui")]
pub mod ui;

// Re-export commonly used types
pub use matcher::{
    reconcile, summarize, ComparisonSummary, DifferenceType, FrequencyTable, MatchFilter,
    MatchResult,
};
pub use parser::{normalize, normalize_with_stats, ParseStats};
pub use report::{render_table, write_csv, write_json, MatchReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
