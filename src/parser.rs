// 🧹 Input Normalizer - Pasted text → clean numeric values
// Tolerant by design: people paste columns straight out of spreadsheets,
// bank exports and chat messages. We extract every token that parses as a
// number and silently drop the rest.

use serde::{Deserialize, Serialize};

// ============================================================================
// PARSE STATS
// ============================================================================

/// Accounting for one normalization pass.
///
/// Rejected tokens never block the run - this exists only so consumers can
/// show "3 of 120 tokens ignored" next to the results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Tokens that parsed as numbers
    pub accepted: usize,

    /// Non-empty tokens that did NOT parse as numbers
    pub rejected: usize,
}

impl ParseStats {
    /// Total non-empty tokens seen
    pub fn total(&self) -> usize {
        self.accepted + self.rejected
    }
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Normalize raw delimited text into a sequence of numeric values.
///
/// Rules:
/// - Split on newline, tab or comma
/// - Trim surrounding whitespace from each token
/// - Drop empty tokens and anything that doesn't parse as an f64
///   (plain decimals, leading sign and scientific notation all accepted)
/// - Preserve the original left-to-right order of the surviving tokens
///
/// Never fails. Malformed input just yields fewer values.
///
/// # Example
/// ```
/// use wallet_match::normalize;
///
/// let values = normalize("3,,abc, 5\t-2.5");
/// assert_eq!(values, vec![3.0, 5.0, -2.5]);
/// ```
pub fn normalize(text: &str) -> Vec<f64> {
    normalize_with_stats(text).0
}

/// Same as [`normalize`] but also reports how many tokens were kept/dropped.
pub fn normalize_with_stats(text: &str) -> (Vec<f64>, ParseStats) {
    let mut values = Vec::new();
    let mut stats = ParseStats::default();

    for token in text.split(['\n', '\t', ',']) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        match token.parse::<f64>() {
            // "NaN" parses but is not a usable value - treat it as malformed
            Ok(v) if !v.is_nan() => {
                stats.accepted += 1;
                values.push(canonical(v));
            }
            _ => stats.rejected += 1,
        }
    }

    (values, stats)
}

/// Fold -0.0 into +0.0 so "0" and "-0" count as the same distinct value.
fn canonical(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

// ============================================================================
// TESTS
// ============================================================================
