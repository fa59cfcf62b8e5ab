use anyhow::{Result, anyhow};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::design::{MultipleComparison, SequentialTest};

/// Significance-level adjustment for multiple comparisons and sequential
/// testing.

/// Default floor applied to a sequentially adjusted alpha.
///
/// The O'Brien-Fleming spend underflows to zero at very small information
/// fractions; a zero alpha would turn the downstream critical value into a
/// meaningless huge number instead of failing. The floor is a policy choice;
/// use [`adjusted_alpha_with_floor`] to override it.
pub const DEFAULT_ALPHA_FLOOR: f64 = 1e-13;

/// Approximation of the O'Brien-Fleming alpha spending function.
///
/// Returns the redistributed alpha at the point where `information_fraction`
/// of the experiment (e.g. the share of the maximum sample size) has been
/// observed. The spend is strictest for early looks and converges to `alpha`
/// as the fraction approaches 1.
///
/// # Arguments
/// * `information_fraction` - share of the total information observed, in (0, 1]
/// * `alpha` - Type-I error rate for the experiment
///
/// # Returns
/// * `Result<f64>` - adjusted alpha at the given information fraction
pub fn obrien_fleming_alpha(information_fraction: f64, alpha: f64) -> Result<f64> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(anyhow!("Alpha must be in (0, 1), got {}", alpha));
    }
    if !(information_fraction > 0.0 && information_fraction <= 1.0) {
        return Err(anyhow!(
            "Information fraction must be in (0, 1], got {}",
            information_fraction
        ));
    }

    let std_normal = Normal::new(0.0, 1.0).unwrap();
    let z_alpha = std_normal.inverse_cdf(1.0 - alpha / 2.0);
    Ok(2.0 * (1.0 - std_normal.cdf(z_alpha / information_fraction.sqrt())))
}

/// Adjust a base significance level for multiple comparisons and/or
/// sequential testing, flooring the result at [`DEFAULT_ALPHA_FLOOR`].
///
/// # Arguments
/// * `base_alpha` - the significance level defined for the experiment
/// * `num_comparisons` - number of group comparisons made, at least 1
/// * `multiple_comparisons` - multiple-comparison correction to apply
/// * `sequential_testing` - sequential-testing correction to apply
/// * `information_fraction` - share of the experiment completed so far;
///   required when `sequential_testing` is O'Brien-Fleming
///
/// # Returns
/// * `Result<f64>` - the adjusted alpha
///
/// # Example
/// ```
/// use experiment_statistics::design::{MultipleComparison, SequentialTest};
/// use experiment_statistics::design::alpha::adjusted_alpha;
///
/// let alpha = adjusted_alpha(
///     0.05,
///     3,
///     MultipleComparison::Bonferroni,
///     SequentialTest::None,
///     None,
/// )
/// .unwrap();
/// assert!((alpha - 0.05 / 3.0).abs() < 1e-12);
/// ```
pub fn adjusted_alpha(
    base_alpha: f64,
    num_comparisons: usize,
    multiple_comparisons: MultipleComparison,
    sequential_testing: SequentialTest,
    information_fraction: Option<f64>,
) -> Result<f64> {
    adjusted_alpha_with_floor(
        base_alpha,
        num_comparisons,
        multiple_comparisons,
        sequential_testing,
        information_fraction,
        DEFAULT_ALPHA_FLOOR,
    )
}

/// [`adjusted_alpha`] with an explicit floor on the sequentially adjusted
/// result, for callers with different precision requirements.
pub fn adjusted_alpha_with_floor(
    base_alpha: f64,
    num_comparisons: usize,
    multiple_comparisons: MultipleComparison,
    sequential_testing: SequentialTest,
    information_fraction: Option<f64>,
    floor: f64,
) -> Result<f64> {
    if !(base_alpha > 0.0 && base_alpha < 1.0) {
        return Err(anyhow!("Base alpha must be in (0, 1), got {}", base_alpha));
    }
    if num_comparisons < 1 {
        return Err(anyhow!("Number of comparisons must be at least 1"));
    }

    let alpha = match multiple_comparisons {
        MultipleComparison::Bonferroni => base_alpha / num_comparisons as f64,
        MultipleComparison::None => base_alpha,
    };

    match sequential_testing {
        SequentialTest::ObrienFleming => {
            let fraction = information_fraction.ok_or_else(|| {
                anyhow!("Sequential testing requires an information fraction")
            })?;
            let spent = obrien_fleming_alpha(fraction, alpha)?;
            Ok(spent.max(floor))
        }
        SequentialTest::None => Ok(alpha),
    }
}
