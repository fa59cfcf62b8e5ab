//! Boolean pre-checks for user-entered experiment tables.
//!
//! These mirror the checks a form layer runs before handing data to the
//! calculation core; the core still re-validates its own tight preconditions
//! and fails with an error where these return `false`.

use crate::analysis::{GroupSummary, Measurement};
use crate::analysis::srm::SrmGroup;

/// Whether a set of traffic allocations (in percent) is usable: every group
/// strictly between 0% and 100%, and the total at most 100%.
pub fn valid_traffic_allocation(allocations_pct: &[f64]) -> bool {
    if allocations_pct.is_empty() {
        return false;
    }
    let total: f64 = allocations_pct.iter().sum();
    allocations_pct.iter().all(|&a| a > 0.0 && a < 100.0) && total <= 100.0
}

/// Whether every group summary row is usable for significance calculations.
pub fn valid_summary_data(groups: &[GroupSummary]) -> bool {
    !groups.is_empty()
        && groups.iter().all(|group| {
            group.sample_size > 0
                && match group.measurement {
                    Measurement::Binary { successes } => successes <= group.sample_size,
                    Measurement::Normal { mean, std_dev } => mean >= 0.0 && std_dev >= 0.0,
                }
        })
}

/// Whether every SRM row is usable: positive sample sizes and expected
/// percentages strictly between 0% and 100%.
pub fn valid_srm_data(sample_sizes: &[u64], expected_proportions_pct: &[f64]) -> bool {
    !sample_sizes.is_empty()
        && sample_sizes.len() == expected_proportions_pct.len()
        && sample_sizes.iter().all(|&n| n > 0)
        && expected_proportions_pct.iter().all(|&p| p > 0.0 && p < 100.0)
}

/// Convert validated percentage rows into [`SrmGroup`] fractions.
pub fn srm_groups_from_percentages(
    sample_sizes: &[u64],
    expected_proportions_pct: &[f64],
) -> Vec<SrmGroup> {
    sample_sizes
        .iter()
        .zip(expected_proportions_pct)
        .map(|(&sample_size, &pct)| SrmGroup {
            sample_size,
            expected_proportion: pct / 100.0,
        })
        .collect()
}
