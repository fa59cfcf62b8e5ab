//! Two-sample t-test power relationship: sample size, effect size, power, and
//! significance, solving for any one given the others.
//!
//! Power is computed exactly on the non-central t-distribution by integrating
//! the normal tail over the distribution of the estimated standard deviation,
//! `u = sqrt(chi2(df) / df)`:
//!
//! `P(T(df, nc) > t) = integral_0^inf f(u) * Phi(nc - t*u) du`
//!
//! where `f(u) = 2 * (df/2)^{df/2} / Gamma(df/2) * u^{df-1} * exp(-df*u^2/2)`,
//! `df = n1*(1+ratio) - 2` and `nc = es * sqrt(n1*ratio/(1+ratio))`. The group
//! size `n1` is treated as continuous during the solve; only the final sample
//! size is rounded up. `ratio` is the group-2:group-1 size ratio, so values
//! below 1 shrink the comparison group and inflate the required `n1`.
//!
//! The integrand is a near-Gaussian bump centered on u = 1 with spread
//! ~1/sqrt(df), so the quadrature window is centered there and scaled by df;
//! a fixed window would lose the bump entirely at the degrees of freedom
//! produced by realistic experiment sizes.

use anyhow::{Result, anyhow};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};
use statrs::function::gamma::ln_gamma;

use crate::design::Alternative;

/// Largest group-1 size the sample-size solve will consider.
const MAX_GROUP_SIZE: f64 = 1e9;

/// Largest standardized effect size the effect-size solve will consider.
const MAX_EFFECT_SIZE: f64 = 1e6;

/// Statistical power of a two-sample t-test.
///
/// # Arguments
/// * `effect_size` - signed standardized effect size (Cohen's d scale)
/// * `n1` - group 1 sample size; continuous, must leave positive degrees of freedom
/// * `alpha` - significance level, in (0, 1)
/// * `ratio` - group-2:group-1 sample size ratio, positive
/// * `alternative` - hypothesis-test directionality
///
/// # Returns
/// * `Result<f64>` - achieved power, in [0, 1]
pub fn power_for_sample_size(
    effect_size: f64,
    n1: f64,
    alpha: f64,
    ratio: f64,
    alternative: Alternative,
) -> Result<f64> {
    validate_alpha(alpha)?;
    validate_ratio(ratio)?;
    if !effect_size.is_finite() {
        return Err(anyhow!("Effect size must be finite, got {}", effect_size));
    }

    let df = n1 * (1.0 + ratio) - 2.0;
    if !(df > 0.0) {
        return Err(anyhow!(
            "Group sizes leave no degrees of freedom (n1 = {}, ratio = {})",
            n1,
            ratio
        ));
    }

    let noncentrality = effect_size * (n1 * ratio / (1.0 + ratio)).sqrt();
    let t_dist = StudentsT::new(0.0, 1.0, df)?;
    let t_crit = match alternative {
        Alternative::TwoSided => t_dist.inverse_cdf(1.0 - alpha / 2.0),
        Alternative::Smaller | Alternative::Larger => t_dist.inverse_cdf(1.0 - alpha),
    };

    Ok(noncentral_t_power(t_crit, df, noncentrality, alternative))
}

/// Smallest integer group-1 sample size achieving at least the requested power.
///
/// The continuous power equation is solved by monotone bracket expansion and
/// bisection, and the result rounded up. A zero effect size is rejected: no
/// finite sample size reaches a power target under an exactly null effect.
///
/// # Arguments
/// * `effect_size` - signed standardized effect size, nonzero
/// * `alpha` - significance level, in (0, 1)
/// * `power` - target power, in (0, 1)
/// * `ratio` - group-2:group-1 sample size ratio, positive
/// * `alternative` - hypothesis-test directionality
///
/// # Returns
/// * `Result<u64>` - required group 1 sample size
pub fn sample_size_for_power(
    effect_size: f64,
    alpha: f64,
    power: f64,
    ratio: f64,
    alternative: Alternative,
) -> Result<u64> {
    if effect_size == 0.0 || !effect_size.is_finite() {
        return Err(anyhow!(
            "Effect size must be nonzero and finite, got {}",
            effect_size
        ));
    }
    validate_power(power)?;

    let mut lower = 2.0_f64;
    if power_for_sample_size(effect_size, lower, alpha, ratio, alternative)? >= power {
        return Ok(lower.ceil() as u64);
    }

    let mut upper = lower;
    loop {
        upper *= 2.0;
        if upper > MAX_GROUP_SIZE {
            return Err(anyhow!(
                "No sample size up to {} reaches power {}; \
                 check the effect size direction against the alternative",
                MAX_GROUP_SIZE,
                power
            ));
        }
        if power_for_sample_size(effect_size, upper, alpha, ratio, alternative)? >= power {
            break;
        }
    }

    while upper - lower > 1e-9 * upper.max(1.0) {
        let mid = 0.5 * (lower + upper);
        if power_for_sample_size(effect_size, mid, alpha, ratio, alternative)? < power {
            lower = mid;
        } else {
            upper = mid;
        }
    }

    Ok(upper.ceil() as u64)
}

/// Effect size detectable at the requested power with a fixed group-1 size.
///
/// Inverse of [`sample_size_for_power`] with no rounding; `n1` may be
/// fractional (the curve sampler passes averaged group sizes). The result is
/// signed by the alternative: positive for `TwoSided` and `Larger`, negative
/// for `Smaller`.
///
/// # Arguments
/// * `n1` - group 1 sample size; must leave positive degrees of freedom
/// * `power` - target power, in (0, 1); must exceed `alpha`
/// * `alpha` - significance level, in (0, 1)
/// * `ratio` - group-2:group-1 sample size ratio, positive
/// * `alternative` - hypothesis-test directionality
///
/// # Returns
/// * `Result<f64>` - signed detectable standardized effect size
pub fn detectable_effect_size(
    n1: f64,
    power: f64,
    alpha: f64,
    ratio: f64,
    alternative: Alternative,
) -> Result<f64> {
    validate_alpha(alpha)?;
    validate_power(power)?;
    if power <= alpha {
        return Err(anyhow!(
            "Requested power {} does not exceed the significance level {}",
            power,
            alpha
        ));
    }

    // Solve for the magnitude on the tail that gains power, then restore the
    // sign. A decrease under Smaller mirrors an increase under Larger.
    let solve_alternative = match alternative {
        Alternative::Smaller => Alternative::Larger,
        other => other,
    };

    let mut lower = 0.0_f64;
    let mut upper = 1e-3_f64;
    while power_for_sample_size(upper, n1, alpha, ratio, solve_alternative)? < power {
        upper *= 2.0;
        if upper > MAX_EFFECT_SIZE {
            return Err(anyhow!(
                "No effect size up to {} reaches power {} at n1 = {}",
                MAX_EFFECT_SIZE,
                power,
                n1
            ));
        }
    }

    while upper - lower > 1e-10 * upper.max(1e-6) {
        let mid = 0.5 * (lower + upper);
        if power_for_sample_size(mid, n1, alpha, ratio, solve_alternative)? < power {
            lower = mid;
        } else {
            upper = mid;
        }
    }

    let magnitude = 0.5 * (lower + upper);
    match alternative {
        Alternative::Smaller => Ok(-magnitude),
        _ => Ok(magnitude),
    }
}

fn validate_alpha(alpha: f64) -> Result<()> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(anyhow!("Alpha must be in (0, 1), got {}", alpha));
    }
    Ok(())
}

fn validate_power(power: f64) -> Result<()> {
    if !(power > 0.0 && power < 1.0) {
        return Err(anyhow!("Power must be in (0, 1), got {}", power));
    }
    Ok(())
}

fn validate_ratio(ratio: f64) -> Result<()> {
    if !(ratio > 0.0 && ratio.is_finite()) {
        return Err(anyhow!("Sample size ratio must be positive, got {}", ratio));
    }
    Ok(())
}

/// Rejection probability of the t-test at critical value `t_crit` when the
/// test statistic follows a non-central t with `df` degrees of freedom and
/// noncentrality `nc`.
fn noncentral_t_power(t_crit: f64, df: f64, nc: f64, alternative: Alternative) -> f64 {
    let normal = Normal::new(0.0, 1.0).unwrap();
    let half_df = df / 2.0;

    // Log normalizing constant for the density of u = sqrt(chi2(df)/df):
    // f(u) = 2 * (df/2)^{df/2} / Gamma(df/2) * u^{df-1} * exp(-df*u^2/2)
    let log_norm = std::f64::consts::LN_2 + half_df * half_df.ln() - ln_gamma(half_df);

    // u has mean ~1 and SD ~1/sqrt(df); +-10/sqrt(df) captures all the mass.
    let half_width = 10.0 / df.sqrt();
    let window_lower = (1.0 - half_width).max(0.0);
    let window_upper = 1.0 + half_width;

    let (nodes, weights) = gauss_legendre_32();

    let mut power = 0.0;
    for (panel_lower, panel_upper) in [(window_lower, 1.0), (1.0, window_upper)] {
        let mid = 0.5 * (panel_lower + panel_upper);
        let half_len = 0.5 * (panel_upper - panel_lower);

        for i in 0..nodes.len() {
            let u = mid + half_len * nodes[i];
            if u <= 0.0 {
                continue;
            }
            let w = weights[i] * half_len;

            let log_density = log_norm + (df - 1.0) * u.ln() - df * u * u / 2.0;
            let density = log_density.exp();

            // P(T > t_crit) contributes Phi(nc - t_crit*u); P(T < -t_crit)
            // contributes Phi(-t_crit*u - nc).
            let tail = match alternative {
                Alternative::TwoSided => {
                    normal.cdf(nc - t_crit * u) + normal.cdf(-t_crit * u - nc)
                }
                Alternative::Larger => normal.cdf(nc - t_crit * u),
                Alternative::Smaller => normal.cdf(-t_crit * u - nc),
            };

            power += w * density * tail;
        }
    }

    power.clamp(0.0, 1.0)
}

/// 32-point Gauss-Legendre nodes and weights on [-1, 1].
fn gauss_legendre_32() -> ([f64; 32], [f64; 32]) {
    let mut nodes = [0.0; 32];
    let mut weights = [0.0; 32];

    let half_nodes: [f64; 16] = [
        0.04830766568773831,
        0.14447196158279649,
        0.23928736225213707,
        0.33186860228212767,
        0.42135127613063534,
        0.50689990893222942,
        0.58771575724076233,
        0.66304426693021520,
        0.73218211874028968,
        0.79448379596794241,
        0.84936761373256997,
        0.89632115576605212,
        0.93490607593773969,
        0.96476225558750643,
        0.98561151154526834,
        0.99726386184948156,
    ];
    let half_weights: [f64; 16] = [
        0.09654008851472780,
        0.09563872007927486,
        0.09384439908080457,
        0.09117387869576389,
        0.08765209300440381,
        0.08331192422694676,
        0.07819389578707031,
        0.07234579410884851,
        0.06582222277636185,
        0.05868409347853555,
        0.05099805926237618,
        0.04283589802222668,
        0.03427386291302143,
        0.02539206530926206,
        0.01627439473090567,
        0.00701861000947009,
    ];

    for i in 0..16 {
        nodes[i] = -half_nodes[15 - i];
        weights[i] = half_weights[15 - i];
        nodes[16 + i] = half_nodes[i];
        weights[16 + i] = half_weights[i];
    }

    (nodes, weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_power_equals_alpha_under_null() {
        // With a zero effect the rejection probability is exactly alpha,
        // which pins down the quadrature accuracy.
        for alternative in [
            Alternative::TwoSided,
            Alternative::Larger,
            Alternative::Smaller,
        ] {
            let power = power_for_sample_size(0.0, 100.0, 0.05, 1.0, alternative).unwrap();
            assert_abs_diff_eq!(power, 0.05, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_power_increases_with_sample_size() {
        let small = power_for_sample_size(0.2, 100.0, 0.05, 1.0, Alternative::TwoSided).unwrap();
        let large = power_for_sample_size(0.2, 400.0, 0.05, 1.0, Alternative::TwoSided).unwrap();
        assert!(large > small);
    }

    #[test]
    fn test_sample_size_known_values() {
        // Reference values from statsmodels tt_ind_solve_power.
        let n1 =
            sample_size_for_power(0.2, 0.05, 0.8, 1.0, Alternative::TwoSided).unwrap();
        assert_eq!(n1, 394);

        let n1 =
            sample_size_for_power(0.5, 0.05, 0.8, 1.0, Alternative::TwoSided).unwrap();
        assert_eq!(n1, 64);
    }

    #[test]
    fn test_sample_size_achieves_requested_power() {
        let n1 = sample_size_for_power(0.2, 0.05, 0.8, 1.0, Alternative::TwoSided).unwrap();
        let achieved =
            power_for_sample_size(0.2, n1 as f64, 0.05, 1.0, Alternative::TwoSided).unwrap();
        assert!(achieved >= 0.8);

        let short = power_for_sample_size(0.2, (n1 - 1) as f64, 0.05, 1.0, Alternative::TwoSided)
            .unwrap();
        assert!(short < 0.8);
    }

    #[test]
    fn test_sample_size_increases_with_smaller_effect() {
        let n_small_effect =
            sample_size_for_power(0.1, 0.05, 0.8, 1.0, Alternative::TwoSided).unwrap();
        let n_large_effect =
            sample_size_for_power(0.5, 0.05, 0.8, 1.0, Alternative::TwoSided).unwrap();
        assert!(n_small_effect > n_large_effect);
    }

    #[test]
    fn test_sample_size_increases_with_higher_power() {
        let n_low = sample_size_for_power(0.2, 0.05, 0.5, 1.0, Alternative::TwoSided).unwrap();
        let n_high = sample_size_for_power(0.2, 0.05, 0.95, 1.0, Alternative::TwoSided).unwrap();
        assert!(n_high > n_low);
    }

    #[test]
    fn test_unequal_allocation_inflates_group_one() {
        let n_equal = sample_size_for_power(0.2, 0.05, 0.8, 1.0, Alternative::TwoSided).unwrap();
        let n_unequal =
            sample_size_for_power(0.2, 0.05, 0.8, 0.5, Alternative::TwoSided).unwrap();
        assert!(n_unequal > n_equal);
    }

    #[test]
    fn test_one_sided_needs_fewer_samples() {
        let two_sided = sample_size_for_power(0.2, 0.05, 0.8, 1.0, Alternative::TwoSided).unwrap();
        let one_sided = sample_size_for_power(0.2, 0.05, 0.8, 1.0, Alternative::Larger).unwrap();
        assert!(one_sided < two_sided);
    }

    #[test]
    fn test_negative_effect_two_sided_symmetric() {
        let positive = sample_size_for_power(0.2, 0.05, 0.8, 1.0, Alternative::TwoSided).unwrap();
        let negative = sample_size_for_power(-0.2, 0.05, 0.8, 1.0, Alternative::TwoSided).unwrap();
        assert_eq!(positive, negative);
    }

    #[test]
    fn test_solver_reciprocity() {
        let n1 = sample_size_for_power(0.2, 0.05, 0.8, 1.0, Alternative::TwoSided).unwrap();
        let es = detectable_effect_size(n1 as f64, 0.8, 0.05, 1.0, Alternative::TwoSided).unwrap();
        assert!((es - 0.2).abs() / 0.2 < 0.01);
    }

    #[test]
    fn test_detectable_effect_shrinks_with_sample_size() {
        let coarse = detectable_effect_size(100.0, 0.8, 0.05, 1.0, Alternative::TwoSided).unwrap();
        let fine = detectable_effect_size(10_000.0, 0.8, 0.05, 1.0, Alternative::TwoSided).unwrap();
        assert!(fine < coarse);
        assert!(fine > 0.0);
    }

    #[test]
    fn test_detectable_effect_signed_by_alternative() {
        let larger = detectable_effect_size(500.0, 0.8, 0.05, 1.0, Alternative::Larger).unwrap();
        let smaller = detectable_effect_size(500.0, 0.8, 0.05, 1.0, Alternative::Smaller).unwrap();
        assert!(larger > 0.0);
        assert_abs_diff_eq!(smaller, -larger, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_effect_size_rejected() {
        assert!(sample_size_for_power(0.0, 0.05, 0.8, 1.0, Alternative::TwoSided).is_err());
    }

    #[test]
    fn test_wrong_direction_cannot_reach_power() {
        // A decreasing effect never rejects upward under Larger.
        assert!(sample_size_for_power(-0.2, 0.05, 0.8, 1.0, Alternative::Larger).is_err());
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(power_for_sample_size(0.2, 100.0, 0.0, 1.0, Alternative::TwoSided).is_err());
        assert!(power_for_sample_size(0.2, 100.0, 0.05, 0.0, Alternative::TwoSided).is_err());
        assert!(power_for_sample_size(0.2, 1.0, 0.05, 1.0, Alternative::TwoSided).is_err());
        assert!(sample_size_for_power(0.2, 0.05, 1.0, 1.0, Alternative::TwoSided).is_err());
        assert!(detectable_effect_size(500.0, 0.04, 0.05, 1.0, Alternative::TwoSided).is_err());
    }
}
