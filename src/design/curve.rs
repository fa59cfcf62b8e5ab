//! Power-curve sampling: the (x, power%) series behind a power-curve plot.
//!
//! For a fixed effect size the x-axis is the total sample size required at
//! each power level; for a fixed sample size it is the detectable effect in
//! display units. Each call recomputes the full series from its inputs and
//! returns a fresh, finite sequence; nothing is cached between calls.

use anyhow::{Result, anyhow};
use ndarray::Array1;

use crate::design::{Alternative, EffectType, OutcomeType, effect, power};

/// Number of points on the default power grid.
pub const POWER_GRID_POINTS: usize = 90;

/// The default power grid: [`POWER_GRID_POINTS`] values spanning 10% to 99%
/// power.
pub fn power_grid() -> Array1<f64> {
    Array1::linspace(0.10, 0.99, POWER_GRID_POINTS)
}

/// One point of a power curve: the computed quantity at `power_pct` percent
/// power.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub x: f64,
    pub power_pct: f64,
}

/// Total required sample size at each power level of the grid.
///
/// At every grid power the group-1 size is solved for `effect_size` at the
/// limiting ratio, then scaled to the whole experiment by the per-group
/// ratios and rounded up.
///
/// # Arguments
/// * `effect_size` - standardized effect size the experiment must detect
/// * `alpha` - operative significance level
/// * `limiting_ratio` - allocation ratio binding the solve (see `design::comparisons`)
/// * `group_ratios` - each group's size relative to the design baseline
/// * `alternative` - hypothesis-test directionality
/// * `grid` - power levels to sample, each in (0, 1)
pub fn sample_size_curve(
    effect_size: f64,
    alpha: f64,
    limiting_ratio: f64,
    group_ratios: &[f64],
    alternative: Alternative,
    grid: &Array1<f64>,
) -> Result<Vec<CurvePoint>> {
    if group_ratios.is_empty() {
        return Err(anyhow!("At least one group ratio is required"));
    }
    if group_ratios.iter().any(|&r| !(r > 0.0 && r.is_finite())) {
        return Err(anyhow!("Group ratios must be positive and finite"));
    }
    let ratio_sum: f64 = group_ratios.iter().sum();

    let mut points = Vec::with_capacity(grid.len());
    for &target_power in grid.iter() {
        let n1 = power::sample_size_for_power(
            effect_size,
            alpha,
            target_power,
            limiting_ratio,
            alternative,
        )?;
        points.push(CurvePoint {
            x: (n1 as f64 * ratio_sum).ceil(),
            power_pct: target_power * 100.0,
        });
    }

    Ok(points)
}

/// Detectable effect in display units at each power level of the grid.
///
/// At every grid power the detectable standardized effect for a fixed
/// group-1 size is solved, then converted to the user-facing scale of the
/// outcome (percentage points / percent for binary, outcome units / percent
/// for normal).
///
/// # Arguments
/// * `n1` - group 1 sample size; fractional values are allowed
/// * `alpha` - operative significance level
/// * `limiting_ratio` - allocation ratio binding the solve
/// * `outcome_type` - binary or normal outcome
/// * `effect_type` - absolute or relative display units
/// * `baseline_mean` - baseline conversion rate or mean
/// * `baseline_stdev` - baseline standard deviation; required for normal outcomes
/// * `alternative` - hypothesis-test directionality
/// * `grid` - power levels to sample, each in (0, 1)
#[allow(clippy::too_many_arguments)]
pub fn detectable_effect_curve(
    n1: f64,
    alpha: f64,
    limiting_ratio: f64,
    outcome_type: OutcomeType,
    effect_type: EffectType,
    baseline_mean: f64,
    baseline_stdev: Option<f64>,
    alternative: Alternative,
    grid: &Array1<f64>,
) -> Result<Vec<CurvePoint>> {
    let stdev = match (outcome_type, baseline_stdev) {
        (OutcomeType::Normal, Some(s)) if s > 0.0 => s,
        (OutcomeType::Normal, _) => {
            return Err(anyhow!(
                "A positive baseline standard deviation is required for normal outcomes"
            ));
        }
        (OutcomeType::Binary, _) => 1.0,
    };

    let mut points = Vec::with_capacity(grid.len());
    for &target_power in grid.iter() {
        let effect_size =
            power::detectable_effect_size(n1, target_power, alpha, limiting_ratio, alternative)?;

        let x = match outcome_type {
            OutcomeType::Binary => effect::convert_effect_size_for_binary_outcome(
                effect_type,
                effect_size,
                baseline_mean,
            )?,
            OutcomeType::Normal => effect::convert_effect_size_for_normal_outcome(
                effect_type,
                effect_size,
                baseline_mean,
                stdev,
            )?,
        };

        points.push(CurvePoint {
            x,
            power_pct: target_power * 100.0,
        });
    }

    Ok(points)
}
