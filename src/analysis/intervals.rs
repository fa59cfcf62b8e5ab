//! Point estimates and confidence intervals for between-group differences and
//! per-group responses.
//!
//! Binary outcomes use the binomial normal approximation with a z critical
//! value; normal outcomes use Student's t with Welch-Satterthwaite degrees of
//! freedom, so unequal variances are handled correctly. Relative differences
//! propagate variance through the ratio with the delta method.

use anyhow::{Result, anyhow};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

use crate::analysis::{ConfidenceInterval, GroupDifference, GroupResponse, GroupSummary, Measurement};
use crate::design::{EffectType, OutcomeType};

/// Standard error of a sample proportion, `sqrt(p * (1 - p) / n)`.
pub fn binomial_standard_error(proportion: f64, sample_size: f64) -> f64 {
    (proportion * (1.0 - proportion) / sample_size).sqrt()
}

/// Standard error of a sample mean, `stdev / sqrt(n)`.
pub fn normal_standard_error(std_dev: f64, sample_size: f64) -> f64 {
    std_dev / sample_size.sqrt()
}

/// Welch-Satterthwaite degrees of freedom for a two-sample t-test where the
/// group variances may be unequal.
pub fn welch_satterthwaite_dof(std_dev1: f64, n1: f64, std_dev2: f64, n2: f64) -> f64 {
    let term1 = std_dev1 * std_dev1 / n1;
    let term2 = std_dev2 * std_dev2 / n2;
    let combined = term1 + term2;
    combined * combined / (term1 * term1 / (n1 - 1.0) + term2 * term2 / (n2 - 1.0))
}

/// Point estimate and confidence interval for the difference between two
/// binomially distributed groups.
///
/// Absolute: `prop2 - prop1` with standard errors added in quadrature.
/// Relative: `(prop2 - prop1) / prop1` with the delta-method standard error
/// `sqrt(se2^2 / prop1^2 + prop2^2 * se1^2 / prop1^4)`; a zero baseline
/// proportion leaves the ratio undefined and is rejected.
///
/// # Arguments
/// * `prop1` - response rate in group 1, in [0, 1]
/// * `n1` - sample size of group 1
/// * `prop2` - response rate in group 2, in [0, 1]
/// * `n2` - sample size of group 2
/// * `confidence` - confidence level (1 - alpha), in (0, 1)
/// * `effect_type` - absolute or relative difference
pub fn binomial_confidence_interval(
    prop1: f64,
    n1: u64,
    prop2: f64,
    n2: u64,
    confidence: f64,
    effect_type: EffectType,
) -> Result<ConfidenceInterval> {
    validate_confidence(confidence)?;
    for (label, n) in [("group 1", n1), ("group 2", n2)] {
        if n == 0 {
            return Err(anyhow!("Sample size for {} must be positive", label));
        }
    }
    for (label, p) in [("group 1", prop1), ("group 2", prop2)] {
        if !(0.0..=1.0).contains(&p) {
            return Err(anyhow!(
                "Proportion for {} must be in [0, 1], got {}",
                label,
                p
            ));
        }
    }

    let std_err_1 = binomial_standard_error(prop1, n1 as f64);
    let std_err_2 = binomial_standard_error(prop2, n2 as f64);

    let (diff, se_diff) = match effect_type {
        EffectType::Absolute => (
            prop2 - prop1,
            (std_err_1 * std_err_1 + std_err_2 * std_err_2).sqrt(),
        ),
        EffectType::Relative => {
            if prop1 == 0.0 {
                return Err(anyhow!(
                    "Relative difference is undefined for a zero baseline proportion"
                ));
            }
            let diff = (prop2 - prop1) / prop1;
            let se = (std_err_2 * std_err_2 / (prop1 * prop1)
                + prop2 * prop2 * std_err_1 * std_err_1 / prop1.powi(4))
            .sqrt();
            (diff, se)
        }
    };

    let z_crit = Normal::new(0.0, 1.0)
        .unwrap()
        .inverse_cdf((1.0 + confidence) / 2.0);
    Ok(ConfidenceInterval::from_margin(diff, z_crit * se_diff))
}

/// Point estimate and confidence interval for the difference between two
/// normally distributed groups.
///
/// Same shapes as [`binomial_confidence_interval`] with means in place of
/// proportions, but the critical value comes from Student's t at the
/// Welch-Satterthwaite degrees of freedom.
pub fn normal_confidence_interval(
    mean1: f64,
    std_dev1: f64,
    n1: u64,
    mean2: f64,
    std_dev2: f64,
    n2: u64,
    confidence: f64,
    effect_type: EffectType,
) -> Result<ConfidenceInterval> {
    validate_confidence(confidence)?;
    for (label, n) in [("group 1", n1), ("group 2", n2)] {
        if n < 2 {
            return Err(anyhow!(
                "Sample size for {} must be at least 2 for a t-interval",
                label
            ));
        }
    }
    for (label, sd) in [("group 1", std_dev1), ("group 2", std_dev2)] {
        if sd < 0.0 {
            return Err(anyhow!(
                "Standard deviation for {} must be non-negative, got {}",
                label,
                sd
            ));
        }
    }
    if std_dev1 == 0.0 && std_dev2 == 0.0 {
        return Err(anyhow!(
            "Both groups have zero variance; the t-interval is undefined"
        ));
    }

    let std_err_1 = normal_standard_error(std_dev1, n1 as f64);
    let std_err_2 = normal_standard_error(std_dev2, n2 as f64);

    let (diff, se_diff) = match effect_type {
        EffectType::Absolute => (
            mean2 - mean1,
            (std_err_1 * std_err_1 + std_err_2 * std_err_2).sqrt(),
        ),
        EffectType::Relative => {
            if mean1 == 0.0 {
                return Err(anyhow!(
                    "Relative difference is undefined for a zero baseline mean"
                ));
            }
            let diff = (mean2 - mean1) / mean1;
            let se = (std_err_2 * std_err_2 / (mean1 * mean1)
                + mean2 * mean2 * std_err_1 * std_err_1 / mean1.powi(4))
            .sqrt();
            (diff, se)
        }
    };

    let dof = welch_satterthwaite_dof(std_dev1, n1 as f64, std_dev2, n2 as f64);
    let t_crit = StudentsT::new(0.0, 1.0, dof)?.inverse_cdf((1.0 + confidence) / 2.0);
    Ok(ConfidenceInterval::from_margin(diff, t_crit * se_diff))
}

/// Differences for every requested comparison pair, in pair order.
///
/// Each result is labeled `"{group2} - {group1}"`. Every group's measurement
/// must match `outcome_type`; pair indices reference positions in `groups`.
pub fn group_differences(
    groups: &[GroupSummary],
    alpha: f64,
    comparison_pairs: &[(usize, usize)],
    outcome_type: OutcomeType,
    effect_type: EffectType,
) -> Result<Vec<GroupDifference>> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(anyhow!("Alpha must be in (0, 1), got {}", alpha));
    }
    let confidence = 1.0 - alpha;

    let mut differences = Vec::with_capacity(comparison_pairs.len());
    for &(index1, index2) in comparison_pairs {
        let group1 = group_at(groups, index1)?;
        let group2 = group_at(groups, index2)?;

        let interval = match outcome_type {
            OutcomeType::Binary => {
                let (successes1, successes2) =
                    (binary_successes(group1)?, binary_successes(group2)?);
                binomial_confidence_interval(
                    successes1 as f64 / group1.sample_size as f64,
                    group1.sample_size,
                    successes2 as f64 / group2.sample_size as f64,
                    group2.sample_size,
                    confidence,
                    effect_type,
                )?
            }
            OutcomeType::Normal => {
                let (mean1, std_dev1) = normal_moments(group1)?;
                let (mean2, std_dev2) = normal_moments(group2)?;
                normal_confidence_interval(
                    mean1,
                    std_dev1,
                    group1.sample_size,
                    mean2,
                    std_dev2,
                    group2.sample_size,
                    confidence,
                    effect_type,
                )?
            }
        };

        differences.push(GroupDifference {
            comparison: format!("{} - {}", group2.name, group1.name),
            group1_name: group1.name.clone(),
            group2_name: group2.name.clone(),
            interval,
        });
    }

    Ok(differences)
}

/// Each group's own response rate or mean with a confidence interval, for
/// absolute display alongside the pairwise differences.
///
/// Binary groups get the normal-approximation proportion interval
/// `p ± z * sqrt(p(1-p)/n)`; normal groups get `mean ± z * sd/sqrt(n)`.
pub fn group_responses(
    outcome_type: OutcomeType,
    groups: &[GroupSummary],
    alpha: f64,
) -> Result<Vec<GroupResponse>> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(anyhow!("Alpha must be in (0, 1), got {}", alpha));
    }
    let z_crit = Normal::new(0.0, 1.0)
        .unwrap()
        .inverse_cdf(1.0 - alpha / 2.0);

    let mut responses = Vec::with_capacity(groups.len());
    for group in groups {
        if group.sample_size == 0 {
            return Err(anyhow!(
                "Sample size for group '{}' must be positive",
                group.name
            ));
        }
        let n = group.sample_size as f64;

        let interval = match outcome_type {
            OutcomeType::Binary => {
                let successes = binary_successes(group)?;
                let proportion = successes as f64 / n;
                ConfidenceInterval::from_margin(
                    proportion,
                    z_crit * binomial_standard_error(proportion, n),
                )
            }
            OutcomeType::Normal => {
                let (mean, std_dev) = normal_moments(group)?;
                ConfidenceInterval::from_margin(mean, z_crit * normal_standard_error(std_dev, n))
            }
        };

        responses.push(GroupResponse {
            group_name: group.name.clone(),
            interval,
        });
    }

    Ok(responses)
}

fn group_at(groups: &[GroupSummary], index: usize) -> Result<&GroupSummary> {
    groups.get(index).ok_or_else(|| {
        anyhow!(
            "Comparison pair references group {} but only {} groups were provided",
            index,
            groups.len()
        )
    })
}

fn binary_successes(group: &GroupSummary) -> Result<u64> {
    match group.measurement {
        Measurement::Binary { successes } => {
            if successes > group.sample_size {
                return Err(anyhow!(
                    "Group '{}' has more successes than samples",
                    group.name
                ));
            }
            Ok(successes)
        }
        Measurement::Normal { .. } => Err(anyhow!(
            "Group '{}' carries a normal measurement in a binary-outcome calculation",
            group.name
        )),
    }
}

fn normal_moments(group: &GroupSummary) -> Result<(f64, f64)> {
    match group.measurement {
        Measurement::Normal { mean, std_dev } => Ok((mean, std_dev)),
        Measurement::Binary { .. } => Err(anyhow!(
            "Group '{}' carries a binary measurement in a normal-outcome calculation",
            group.name
        )),
    }
}

fn validate_confidence(confidence: f64) -> Result<()> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(anyhow!(
            "Confidence level must be in (0, 1), got {}",
            confidence
        ));
    }
    Ok(())
}
