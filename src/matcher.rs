// ⚖️ Matching Engine - Frequency-based two-list reconciliation
// Builds a frequency table per list, unions the distinct values and
// classifies every value by how its multiplicity differs between lists.
//
// Frequency tables (not set difference) are the whole point: "the wallet
// has one extra duplicate of a value the system also has" is a real
// accounting discrepancy, and presence/absence alone cannot see it.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

// ============================================================================
// DIFFERENCE TYPE
// ============================================================================

/// Classification of one distinct value across the two lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DifferenceType {
    /// Same count (> 0) in both lists
    Matched,

    /// Present in the system list only
    SystemOnly,

    /// Present in the wallet list only
    WalletOnly,

    /// Present in both lists with different counts
    FrequencyMismatch,
}

impl DifferenceType {
    /// Human-readable label for display
    pub fn label(&self) -> &str {
        match self {
            DifferenceType::Matched => "Matched",
            DifferenceType::SystemOnly => "System only",
            DifferenceType::WalletOnly => "Wallet only",
            DifferenceType::FrequencyMismatch => "Frequency mismatch",
        }
    }
}

impl std::fmt::Display for DifferenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DifferenceType::Matched => write!(f, "MATCHED"),
            DifferenceType::SystemOnly => write!(f, "SYSTEM_ONLY"),
            DifferenceType::WalletOnly => write!(f, "WALLET_ONLY"),
            DifferenceType::FrequencyMismatch => write!(f, "FREQUENCY_MISMATCH"),
        }
    }
}

// ============================================================================
// FREQUENCY TABLE
// ============================================================================

/// Multiset of numeric values keyed by exact numeric equality.
///
/// Values are keyed by their bit pattern; the normalizer already folded
/// -0.0 into +0.0 and dropped NaN, so bit equality IS numeric equality here.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTable {
    counts: HashMap<u64, usize>,
    total: usize,
}

impl FrequencyTable {
    /// Build a table from a sequence of values (order irrelevant)
    pub fn build(values: &[f64]) -> Self {
        let mut table = FrequencyTable::default();
        for &v in values {
            *table.counts.entry(key(v)).or_insert(0) += 1;
            table.total += 1;
        }
        table
    }

    /// Occurrence count for a value (0 if absent)
    pub fn count(&self, value: f64) -> usize {
        self.counts.get(&key(value)).copied().unwrap_or(0)
    }

    /// Number of distinct values present
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Total values inserted, duplicates included
    pub fn total(&self) -> usize {
        self.total
    }

    fn distinct_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.counts.keys().map(|&bits| f64::from_bits(bits))
    }
}

/// Exact-equality map key. -0.0 folds into +0.0 (same numeric value).
fn key(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

// ============================================================================
// MATCH RESULT
// ============================================================================

/// One row of the reconciliation output, keyed by a distinct value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The distinct numeric value
    pub value: f64,

    /// How this value differs between the two lists
    pub status: DifferenceType,

    /// Human-readable explanation (embeds both counts for mismatches)
    pub description: String,

    /// Occurrences in the system list (0 if absent)
    pub system_count: usize,

    /// Occurrences in the wallet list (0 if absent)
    pub wallet_count: usize,
}

// ============================================================================
// RECONCILIATION
// ============================================================================

/// Reconcile two value sequences into one classified row per distinct value.
///
/// Output is sorted strictly descending by value with no duplicates:
/// exactly one row per distinct value in the union of both inputs. Input
/// order never matters - classification is frequency-based. Empty inputs
/// simply produce an empty list; this function cannot fail.
///
/// # Example
/// ```
/// use wallet_match::{reconcile, DifferenceType};
///
/// let rows = reconcile(&[5.0, 5.0, 3.0], &[5.0, 3.0, 3.0]);
/// assert_eq!(rows.len(), 2);
/// assert_eq!(rows[0].value, 5.0);
/// assert_eq!(rows[0].status, DifferenceType::FrequencyMismatch);
/// ```
pub fn reconcile(system_values: &[f64], wallet_values: &[f64]) -> Vec<MatchResult> {
    let system_freq = FrequencyTable::build(system_values);
    let wallet_freq = FrequencyTable::build(wallet_values);

    // Union of distinct values, largest first
    let mut all_values: Vec<f64> = system_freq.distinct_values().collect();
    all_values.extend(wallet_freq.distinct_values().filter(|&v| system_freq.count(v) == 0));
    all_values.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));

    all_values
        .into_iter()
        .map(|value| {
            let s = system_freq.count(value);
            let w = wallet_freq.count(value);
            // v came from the union, so s == w == 0 is unreachable
            let status = if s == w {
                DifferenceType::Matched
            } else if w == 0 {
                DifferenceType::SystemOnly
            } else if s == 0 {
                DifferenceType::WalletOnly
            } else {
                DifferenceType::FrequencyMismatch
            };

            MatchResult {
                value,
                status,
                description: describe(status, s, w),
                system_count: s,
                wallet_count: w,
            }
        })
        .collect()
}

fn describe(status: DifferenceType, system_count: usize, wallet_count: usize) -> String {
    match status {
        DifferenceType::Matched => "Exact match".to_string(),
        DifferenceType::SystemOnly => "In the system, missing from the wallet".to_string(),
        DifferenceType::WalletOnly => "In the wallet, missing from the system".to_string(),
        DifferenceType::FrequencyMismatch => format!(
            "Occurrence count differs (system: {}, wallet: {})",
            system_count, wallet_count
        ),
    }
}

// ============================================================================
// FILTERING
// ============================================================================

/// Filter predicate over match results - one tab per variant in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchFilter {
    All,
    Matched,
    SystemOnly,
    WalletOnly,
    FrequencyMismatch,
}

impl MatchFilter {
    /// Every filter, in display order
    pub const ALL_FILTERS: [MatchFilter; 5] = [
        MatchFilter::All,
        MatchFilter::Matched,
        MatchFilter::SystemOnly,
        MatchFilter::WalletOnly,
        MatchFilter::FrequencyMismatch,
    ];

    /// Does a result with this status pass the filter?
    pub fn matches(&self, status: DifferenceType) -> bool {
        match self {
            MatchFilter::All => true,
            MatchFilter::Matched => status == DifferenceType::Matched,
            MatchFilter::SystemOnly => status == DifferenceType::SystemOnly,
            MatchFilter::WalletOnly => status == DifferenceType::WalletOnly,
            MatchFilter::FrequencyMismatch => status == DifferenceType::FrequencyMismatch,
        }
    }

    /// Apply the filter to a result slice
    pub fn apply<'a>(&self, results: &'a [MatchResult]) -> Vec<&'a MatchResult> {
        results.iter().filter(|r| self.matches(r.status)).collect()
    }

    pub fn label(&self) -> &str {
        match self {
            MatchFilter::All => "All",
            MatchFilter::Matched => "Matched",
            MatchFilter::SystemOnly => "System only",
            MatchFilter::WalletOnly => "Wallet only",
            MatchFilter::FrequencyMismatch => "Frequency mismatch",
        }
    }

    /// Parse a CLI-style status name ("SYSTEM_ONLY", case-insensitive)
    pub fn parse(name: &str) -> Option<MatchFilter> {
        match name.to_uppercase().as_str() {
            "ALL" => Some(MatchFilter::All),
            "MATCHED" => Some(MatchFilter::Matched),
            "SYSTEM_ONLY" => Some(MatchFilter::SystemOnly),
            "WALLET_ONLY" => Some(MatchFilter::WalletOnly),
            "FREQUENCY_MISMATCH" => Some(MatchFilter::FrequencyMismatch),
            _ => None,
        }
    }
}

// ============================================================================
// SUMMARY
// ============================================================================

/// Derived headline numbers for one reconciliation run.
///
/// Always recomputed from the classification list - nothing here is cached.
/// `total_system`/`total_wallet` count all parsed tokens including
/// duplicates, which is why they sum the per-row counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub total_system: usize,
    pub total_wallet: usize,
    pub matched_count: usize,
    pub differences_count: usize,
}

/// Compute the summary for a classification list.
pub fn summarize(results: &[MatchResult]) -> ComparisonSummary {
    let mut summary = ComparisonSummary::default();

    for r in results {
        summary.total_system += r.system_count;
        summary.total_wallet += r.wallet_count;
        if r.status == DifferenceType::Matched {
            summary.matched_count += 1;
        } else {
            summary.differences_count += 1;
        }
    }

    summary
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::normalize;

    fn statuses(results: &[MatchResult]) -> Vec<DifferenceType> {
        results.iter().map(|r| r.status).collect()
    }

    #[test]
    fn test_frequency_table_counts() {
        let table = FrequencyTable::build(&[5.0, 5.0, 3.0]);
        assert_eq!(table.count(5.0), 2);
        assert_eq!(table.count(3.0), 1);
        assert_eq!(table.count(99.0), 0);
        assert_eq!(table.distinct(), 2);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_frequency_table_negative_zero() {
        let table = FrequencyTable::build(&[0.0, -0.0]);
        assert_eq!(table.distinct(), 1);
        assert_eq!(table.count(0.0), 2);
        assert_eq!(table.count(-0.0), 2);
    }

    #[test]
    fn test_reconcile_frequency_mismatch_both_directions() {
        // system=[5,5,3], wallet=[5,3,3] → both values mismatch on count
        let results = reconcile(&[5.0, 5.0, 3.0], &[5.0, 3.0, 3.0]);

        assert_eq!(results.len(), 2);

        assert_eq!(results[0].value, 5.0);
        assert_eq!(results[0].status, DifferenceType::FrequencyMismatch);
        assert_eq!(results[0].system_count, 2);
        assert_eq!(results[0].wallet_count, 1);

        assert_eq!(results[1].value, 3.0);
        assert_eq!(results[1].status, DifferenceType::FrequencyMismatch);
        assert_eq!(results[1].system_count, 1);
        assert_eq!(results[1].wallet_count, 2);
    }

    #[test]
    fn test_reconcile_order_independence() {
        // system=[10,7], wallet=[7,10] → both matched
        let results = reconcile(&[10.0, 7.0], &[7.0, 10.0]);
        assert_eq!(statuses(&results), vec![DifferenceType::Matched, DifferenceType::Matched]);
    }

    #[test]
    fn test_reconcile_permutation_invariance() {
        let a = reconcile(&[3.0, 1.0, 2.0, 1.0], &[2.0, 2.0, 5.0]);
        let b = reconcile(&[1.0, 1.0, 2.0, 3.0], &[5.0, 2.0, 2.0]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_reconcile_wallet_only_sorted() {
        // system=[], wallet=[1,2] → two WALLET_ONLY rows, 2 before 1
        let results = reconcile(&[], &[1.0, 2.0]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].value, 2.0);
        assert_eq!(results[1].value, 1.0);
        assert!(results.iter().all(|r| r.status == DifferenceType::WalletOnly));
        assert!(results.iter().all(|r| r.system_count == 0));
    }

    #[test]
    fn test_reconcile_system_only() {
        // system=[4], wallet=[] → one SYSTEM_ONLY row
        let results = reconcile(&[4.0], &[]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].value, 4.0);
        assert_eq!(results[0].status, DifferenceType::SystemOnly);
        assert_eq!(results[0].wallet_count, 0);
    }

    #[test]
    fn test_reconcile_infinite_values() {
        let system = normalize("inf, 5");
        let wallet = normalize("5, -inf");
        let results = reconcile(&system, &wallet);

        // Largest first: +inf, then 5, then -inf
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].value, f64::INFINITY);
        assert_eq!(results[0].status, DifferenceType::SystemOnly);
        assert_eq!(results[1].value, 5.0);
        assert_eq!(results[1].status, DifferenceType::Matched);
        assert_eq!(results[2].value, f64::NEG_INFINITY);
        assert_eq!(results[2].status, DifferenceType::WalletOnly);
    }

    #[test]
    fn test_reconcile_empty_inputs() {
        assert!(reconcile(&[], &[]).is_empty());
    }

    #[test]
    fn test_reconcile_strictly_descending_no_duplicates() {
        let system = normalize("7, 3, 7, -1, 0, 3.5");
        let wallet = normalize("3, 9, -1, -1, 0");
        let results = reconcile(&system, &wallet);

        for pair in results.windows(2) {
            assert!(pair[0].value > pair[1].value, "not strictly descending");
        }
    }

    #[test]
    fn test_reconcile_counts_sum_to_input_lengths() {
        let system = normalize("5, 5, 3, junk, 8");
        let wallet = normalize("5, 3, 3, 2");
        let results = reconcile(&system, &wallet);

        let s_sum: usize = results.iter().map(|r| r.system_count).sum();
        let w_sum: usize = results.iter().map(|r| r.wallet_count).sum();
        assert_eq!(s_sum, system.len());
        assert_eq!(w_sum, wallet.len());
    }

    #[test]
    fn test_reconcile_status_consistent_with_counts() {
        let results = reconcile(&[1.0, 1.0, 2.0, 4.0], &[1.0, 3.0, 4.0]);

        for r in &results {
            let expected = match (r.system_count, r.wallet_count) {
                (s, w) if s == w && s > 0 => DifferenceType::Matched,
                (s, 0) if s > 0 => DifferenceType::SystemOnly,
                (0, w) if w > 0 => DifferenceType::WalletOnly,
                _ => DifferenceType::FrequencyMismatch,
            };
            assert_eq!(r.status, expected, "value {}", r.value);
        }
    }

    #[test]
    fn test_reconcile_is_deterministic() {
        let system = [9.0, 1.5, -3.0, 1.5];
        let wallet = [1.5, 9.0, 9.0];
        assert_eq!(reconcile(&system, &wallet), reconcile(&system, &wallet));
    }

    #[test]
    fn test_mismatch_description_embeds_counts() {
        let results = reconcile(&[5.0, 5.0], &[5.0]);
        assert_eq!(results[0].status, DifferenceType::FrequencyMismatch);
        assert!(results[0].description.contains("system: 2"));
        assert!(results[0].description.contains("wallet: 1"));
    }

    #[test]
    fn test_difference_type_display() {
        assert_eq!(DifferenceType::Matched.to_string(), "MATCHED");
        assert_eq!(DifferenceType::SystemOnly.to_string(), "SYSTEM_ONLY");
        assert_eq!(DifferenceType::WalletOnly.to_string(), "WALLET_ONLY");
        assert_eq!(DifferenceType::FrequencyMismatch.to_string(), "FREQUENCY_MISMATCH");
    }

    #[test]
    fn test_filter_all_passes_everything() {
        let results = reconcile(&[1.0, 2.0], &[2.0, 3.0]);
        assert_eq!(MatchFilter::All.apply(&results).len(), results.len());
    }

    #[test]
    fn test_filter_by_status() {
        let results = reconcile(&[1.0, 2.0, 2.0], &[2.0, 3.0]);

        let matched = MatchFilter::Matched.apply(&results);
        assert!(matched.is_empty()); // 2 appears twice in system, once in wallet

        let system_only = MatchFilter::SystemOnly.apply(&results);
        assert_eq!(system_only.len(), 1);
        assert_eq!(system_only[0].value, 1.0);

        let mismatch = MatchFilter::FrequencyMismatch.apply(&results);
        assert_eq!(mismatch.len(), 1);
        assert_eq!(mismatch[0].value, 2.0);
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(MatchFilter::parse("all"), Some(MatchFilter::All));
        assert_eq!(MatchFilter::parse("SYSTEM_ONLY"), Some(MatchFilter::SystemOnly));
        assert_eq!(MatchFilter::parse("wallet_only"), Some(MatchFilter::WalletOnly));
        assert_eq!(MatchFilter::parse("bogus"), None);
    }

    #[test]
    fn test_summary_from_results() {
        let system = normalize("5\n5\n3");
        let wallet = normalize("5, 3, 3");
        let results = reconcile(&system, &wallet);
        let summary = summarize(&results);

        assert_eq!(summary.total_system, 3);
        assert_eq!(summary.total_wallet, 3);
        assert_eq!(summary.matched_count, 0);
        assert_eq!(summary.differences_count, 2);
    }

    #[test]
    fn test_summary_empty_run() {
        assert_eq!(summarize(&[]), ComparisonSummary::default());
    }

    #[test]
    fn test_summary_mixed_statuses() {
        // 10 matched, 7 system-only, 4 wallet-only, 2 mismatched
        let results = reconcile(&[10.0, 7.0, 2.0, 2.0], &[10.0, 4.0, 2.0]);
        let summary = summarize(&results);

        assert_eq!(summary.matched_count, 1);
        assert_eq!(summary.differences_count, 3);
        assert_eq!(summary.total_system, 4);
        assert_eq!(summary.total_wallet, 3);
    }
}
