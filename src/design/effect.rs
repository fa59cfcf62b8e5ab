//! Effect-size transforms between user-facing minimum detectable effects and
//! the standardized effect sizes the power solver operates on.
//!
//! Binary outcomes use the arcsine ("normal method") proportion effect size;
//! normal outcomes use Cohen's d against the baseline standard deviation.
//! Effect sizes are signed throughout: a negative value is a decrease, and no
//! function here takes an absolute value on the caller's behalf.

use anyhow::{Result, anyhow};

use crate::design::{EffectType, OutcomeType};

/// Normalize a user-entered minimum detectable effect.
///
/// A normal outcome with an absolute effect is already in outcome units and
/// passes through unchanged; every other combination is entered as a
/// percentage and is divided by 100.
pub fn minimum_detectable_effect(
    outcome_type: OutcomeType,
    effect_type: EffectType,
    mde_input: f64,
) -> f64 {
    match (outcome_type, effect_type) {
        (OutcomeType::Normal, EffectType::Absolute) => mde_input,
        _ => mde_input / 100.0,
    }
}

/// Arcsine-transformed effect size between two proportions.
///
/// This is the "normal method" proportion effect size,
/// `2*asin(sqrt(p1)) - 2*asin(sqrt(p2))`.
fn proportion_effect_size(prop1: f64, prop2: f64) -> Result<f64> {
    for (label, p) in [("proportion 1", prop1), ("proportion 2", prop2)] {
        if !(p > 0.0 && p < 1.0) {
            return Err(anyhow!(
                "Arcsine transform requires {} in (0, 1), got {}",
                label,
                p
            ));
        }
    }
    Ok(2.0 * prop1.sqrt().asin() - 2.0 * prop2.sqrt().asin())
}

/// Convert a minimum detectable effect on a binary outcome to a proportion
/// effect size.
///
/// The treatment proportion is `baseline_mean + mde` for an absolute effect or
/// `(1 + mde) * baseline_mean` for a relative effect; both it and the baseline
/// must land strictly inside (0, 1) for the arcsine transform to be defined.
///
/// # Arguments
/// * `effect_type` - whether `mde` is an absolute or relative effect
/// * `baseline_mean` - conversion rate in the baseline group
/// * `mde` - minimum detectable effect, as a fraction
///
/// # Returns
/// * `Result<f64>` - signed standardized effect size
pub fn binary_effect_size(effect_type: EffectType, baseline_mean: f64, mde: f64) -> Result<f64> {
    let proportion_1 = match effect_type {
        EffectType::Absolute => baseline_mean + mde,
        EffectType::Relative => (1.0 + mde) * baseline_mean,
    };
    proportion_effect_size(proportion_1, baseline_mean)
}

/// Convert a minimum detectable effect on a normal outcome to Cohen's d.
///
/// # Arguments
/// * `effect_type` - whether `mde` is an absolute or relative effect
/// * `baseline_mean` - mean in the baseline group
/// * `mde` - minimum detectable effect (outcome units if absolute, fraction if relative)
/// * `baseline_stdev` - standard deviation in the baseline group, must be positive
///
/// # Returns
/// * `Result<f64>` - signed Cohen's d
pub fn normal_effect_size(
    effect_type: EffectType,
    baseline_mean: f64,
    mde: f64,
    baseline_stdev: Option<f64>,
) -> Result<f64> {
    let stdev = match baseline_stdev {
        Some(s) if s > 0.0 => s,
        _ => return Err(anyhow!("Baseline standard deviation must be positive")),
    };

    let new_mean = match effect_type {
        EffectType::Relative => baseline_mean * (1.0 + mde),
        EffectType::Absolute => baseline_mean + mde,
    };

    Ok((new_mean - baseline_mean) / stdev)
}

/// Dispatch to the effect-size calculation for the given outcome type.
pub fn effect_size(
    outcome_type: OutcomeType,
    effect_type: EffectType,
    baseline_mean: f64,
    mde: f64,
    baseline_stdev: Option<f64>,
) -> Result<f64> {
    match outcome_type {
        OutcomeType::Binary => binary_effect_size(effect_type, baseline_mean, mde),
        OutcomeType::Normal => normal_effect_size(effect_type, baseline_mean, mde, baseline_stdev),
    }
}

/// Convert a standardized effect size back to a displayable effect for a
/// binary outcome.
///
/// The implied treatment proportion `prop1 + effect_size * sqrt(prop1 * (1 - prop1))`
/// is clamped to [0, 1]: extreme effect sizes saturate at an impossible-to-exceed
/// proportion rather than erroring. Returns percentage points rounded to 2
/// decimals for an absolute effect, or percent change rounded to 2 decimals
/// for a relative effect.
pub fn convert_effect_size_for_binary_outcome(
    effect_type: EffectType,
    effect_size: f64,
    prop1: f64,
) -> Result<f64> {
    if !(prop1 > 0.0 && prop1 < 1.0) {
        return Err(anyhow!(
            "Baseline proportion must be in (0, 1), got {}",
            prop1
        ));
    }

    let delta = effect_size * (prop1 * (1.0 - prop1)).sqrt();
    let prop2 = (prop1 + delta).clamp(0.0, 1.0);

    match effect_type {
        EffectType::Absolute => Ok(round_to((prop2 - prop1) * 100.0, 2)),
        EffectType::Relative => Ok(round_to((prop2 / prop1 - 1.0) * 100.0, 2)),
    }
}

/// Convert Cohen's d back to a displayable effect for a normal outcome.
///
/// Returns outcome units rounded to 3 decimals for an absolute effect, or
/// percent change over the baseline mean rounded to 2 decimals for a relative
/// effect.
pub fn convert_effect_size_for_normal_outcome(
    effect_type: EffectType,
    effect_size: f64,
    baseline_mean: f64,
    baseline_stdev: f64,
) -> Result<f64> {
    if baseline_stdev <= 0.0 {
        return Err(anyhow!("Baseline standard deviation must be positive"));
    }

    let absolute_effect = effect_size * baseline_stdev;
    match effect_type {
        EffectType::Absolute => Ok(round_to(absolute_effect, 3)),
        EffectType::Relative => {
            if baseline_mean == 0.0 {
                return Err(anyhow!(
                    "Relative effect is undefined for a zero baseline mean"
                ));
            }
            Ok(round_to(100.0 * (absolute_effect / baseline_mean), 2))
        }
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}
