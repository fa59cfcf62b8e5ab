//! Sample ratio mismatch detection.
//!
//! A chi-square goodness-of-fit test compares the observed group sizes
//! against the traffic split the experiment was configured to produce. A
//! p-value below a caller-chosen threshold (0.001 is a common choice) points
//! at a randomization or instrumentation bug rather than a chance imbalance.

use anyhow::{Result, anyhow};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Observed size and configured traffic share for one experiment group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SrmGroup {
    pub sample_size: u64,
    /// Expected share of total traffic, as a fraction in (0, 1).
    pub expected_proportion: f64,
}

/// Chi-square goodness-of-fit p-value for the observed traffic allocation.
///
/// Observed counts are the group sample sizes; expected counts are
/// `expected_proportion * total`; the statistic is referred to a chi-square
/// distribution with `groups.len() - 1` degrees of freedom.
///
/// # Arguments
/// * `groups` - at least two groups with positive sizes and expected
///   proportions in (0, 1)
///
/// # Returns
/// * `Result<f64>` - two-sided p-value in [0, 1]
pub fn srm_pvalue(groups: &[SrmGroup]) -> Result<f64> {
    if groups.len() < 2 {
        return Err(anyhow!(
            "At least 2 groups are required for an SRM test, got {}",
            groups.len()
        ));
    }
    for group in groups {
        if group.sample_size == 0 {
            return Err(anyhow!("Sample sizes must be positive"));
        }
        if !(group.expected_proportion > 0.0 && group.expected_proportion < 1.0) {
            return Err(anyhow!(
                "Expected proportions must be in (0, 1), got {}",
                group.expected_proportion
            ));
        }
    }

    let total: u64 = groups.iter().map(|g| g.sample_size).sum();
    let total = total as f64;

    let statistic: f64 = groups
        .iter()
        .map(|g| {
            let expected = g.expected_proportion * total;
            let observed = g.sample_size as f64;
            (observed - expected) * (observed - expected) / expected
        })
        .sum();

    let dof = (groups.len() - 1) as f64;
    let chi_squared = ChiSquared::new(dof)?;
    Ok(chi_squared.sf(statistic))
}
