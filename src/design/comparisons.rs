//! Comparison planning: which group pairs an experiment evaluates, and which
//! allocation ratio binds the sample-size calculation.

use anyhow::{Result, anyhow};

use crate::design::ComparisonMode;

/// Index pairs of the groups to compare, in the order results are reported.
///
/// `CompareToFirst` pairs every other group against group 0;
/// `CompareAllPairs` enumerates all unordered pairs in ascending
/// lexicographic order. Indices are positions in the caller's ordered group
/// sequence.
///
/// # Example
/// ```
/// use experiment_statistics::design::ComparisonMode;
/// use experiment_statistics::design::comparisons::comparison_pairs;
///
/// let pairs = comparison_pairs(ComparisonMode::CompareAllPairs, 3).unwrap();
/// assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
/// ```
pub fn comparison_pairs(mode: ComparisonMode, num_groups: usize) -> Result<Vec<(usize, usize)>> {
    if num_groups < 2 {
        return Err(anyhow!(
            "At least 2 groups are required for comparisons, got {}",
            num_groups
        ));
    }

    match mode {
        ComparisonMode::CompareToFirst => Ok((1..num_groups).map(|i| (0, i)).collect()),
        ComparisonMode::CompareAllPairs => {
            let mut pairs = Vec::with_capacity(num_groups * (num_groups - 1) / 2);
            for a in 0..num_groups {
                for b in (a + 1)..num_groups {
                    pairs.push((a, b));
                }
            }
            Ok(pairs)
        }
    }
}

/// The allocation ratio that binds the sample-size calculation.
///
/// `ratios` are per-group sizes relative to the baseline group. Comparing
/// `max(ratios)` against `1/min(ratios)` identifies which direction of
/// imbalance dominates; the ratio in that direction is returned and fed to
/// the power solver, since unequal allocation inflates the required sample
/// size in either direction.
pub fn design_ratio(ratios: &[f64]) -> Result<f64> {
    if ratios.is_empty() {
        return Err(anyhow!("At least one allocation ratio is required"));
    }
    if ratios.iter().any(|&r| !(r > 0.0 && r.is_finite())) {
        return Err(anyhow!("Allocation ratios must be positive and finite"));
    }

    let biggest = ratios.iter().cloned().fold(f64::MIN, f64::max);
    let smallest = ratios.iter().cloned().fold(f64::MAX, f64::min);

    if biggest >= 1.0 / smallest {
        Ok(biggest)
    } else {
        Ok(smallest)
    }
}

/// Each group's size relative to the design baseline.
///
/// For `CompareToFirst` the baseline is the first group; for
/// `CompareAllPairs` it is the largest group. Multiplying these by the solved
/// group-1 sample size yields the per-group requirements.
pub fn group_ratios(mode: ComparisonMode, allocations: &[f64]) -> Result<Vec<f64>> {
    validate_allocations(allocations)?;

    let baseline = match mode {
        ComparisonMode::CompareToFirst => allocations[0],
        ComparisonMode::CompareAllPairs => allocations.iter().cloned().fold(f64::MIN, f64::max),
    };
    Ok(allocations.iter().map(|&a| a / baseline).collect())
}

/// Limiting ratio for the power solve under the given comparison mode.
///
/// `CompareToFirst` reduces the per-group ratios with [`design_ratio`];
/// `CompareAllPairs` bounds every pairwise comparison by the most unequal
/// one, `min / (max + min)`.
pub fn limiting_ratio(mode: ComparisonMode, allocations: &[f64]) -> Result<f64> {
    validate_allocations(allocations)?;

    match mode {
        ComparisonMode::CompareToFirst => {
            let ratios = group_ratios(mode, allocations)?;
            design_ratio(&ratios)
        }
        ComparisonMode::CompareAllPairs => {
            let biggest = allocations.iter().cloned().fold(f64::MIN, f64::max);
            let smallest = allocations.iter().cloned().fold(f64::MAX, f64::min);
            Ok(smallest / (biggest + smallest))
        }
    }
}

fn validate_allocations(allocations: &[f64]) -> Result<()> {
    if allocations.len() < 2 {
        return Err(anyhow!(
            "At least 2 group allocations are required, got {}",
            allocations.len()
        ));
    }
    if allocations.iter().any(|&a| !(a > 0.0 && a.is_finite())) {
        return Err(anyhow!("Group allocations must be positive and finite"));
    }
    Ok(())
}
