pub mod intervals;
pub mod srm;

/// Outcome summary for one experimental group, as entered in the experiment
/// readout: binary groups carry a success count, normal groups a mean and
/// standard deviation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    Binary { successes: u64 },
    Normal { mean: f64, std_dev: f64 },
}

/// Summary statistics for one experimental group.
///
/// Group names are expected to be unique within an experiment; comparison
/// pairs reference groups by position in an ordered slice of summaries.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub name: String,
    pub sample_size: u64,
    pub measurement: Measurement,
}

impl GroupSummary {
    /// Summary for a group with a binary outcome.
    pub fn binary(name: impl Into<String>, sample_size: u64, successes: u64) -> Self {
        GroupSummary {
            name: name.into(),
            sample_size,
            measurement: Measurement::Binary { successes },
        }
    }

    /// Summary for a group with a normal outcome.
    pub fn normal(name: impl Into<String>, sample_size: u64, mean: f64, std_dev: f64) -> Self {
        GroupSummary {
            name: name.into(),
            sample_size,
            measurement: Measurement::Normal { mean, std_dev },
        }
    }
}

/// Point estimate and confidence interval for a single quantity.
///
/// Built as `point ± margin` with a non-negative margin, so
/// `ci_lower <= point_estimate <= ci_upper` holds by construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidenceInterval {
    pub point_estimate: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

impl ConfidenceInterval {
    pub(crate) fn from_margin(point_estimate: f64, margin_of_error: f64) -> Self {
        let margin = margin_of_error.abs();
        ConfidenceInterval {
            point_estimate,
            ci_lower: point_estimate - margin,
            ci_upper: point_estimate + margin,
        }
    }

    /// Width of the interval.
    pub fn width(&self) -> f64 {
        self.ci_upper - self.ci_lower
    }

    /// Whether the interval excludes zero, i.e. the difference it estimates
    /// is statistically significant at the interval's confidence level.
    pub fn is_significant(&self) -> bool {
        !(self.ci_lower <= 0.0 && 0.0 <= self.ci_upper)
    }
}

/// Estimated difference between one pair of groups.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDifference {
    /// Display label, `"{group2} - {group1}"`.
    pub comparison: String,
    pub group1_name: String,
    pub group2_name: String,
    pub interval: ConfidenceInterval,
}

/// A single group's own response rate or mean with its confidence interval.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupResponse {
    pub group_name: String,
    pub interval: ConfidenceInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_ordering_by_construction() {
        let interval = ConfidenceInterval::from_margin(0.05, 0.02);
        assert!(interval.ci_lower <= interval.point_estimate);
        assert!(interval.point_estimate <= interval.ci_upper);

        // A negative margin cannot invert the bounds.
        let interval = ConfidenceInterval::from_margin(-0.1, -0.03);
        assert!(interval.ci_lower <= interval.point_estimate);
        assert!(interval.point_estimate <= interval.ci_upper);
    }

    #[test]
    fn test_significance_is_zero_exclusion() {
        assert!(
            ConfidenceInterval {
                point_estimate: 0.05,
                ci_lower: 0.01,
                ci_upper: 0.09
            }
            .is_significant()
        );
        assert!(
            !ConfidenceInterval {
                point_estimate: 0.02,
                ci_lower: -0.01,
                ci_upper: 0.05
            }
            .is_significant()
        );
        assert!(
            ConfidenceInterval {
                point_estimate: -0.04,
                ci_lower: -0.06,
                ci_upper: -0.02
            }
            .is_significant()
        );
    }
}
