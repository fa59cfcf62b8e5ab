pub mod alpha;
pub mod comparisons;
pub mod curve;
pub mod effect;
pub mod power;

/// Distribution family of the outcome being measured.
///
/// Determines which statistical family (proportion vs. Gaussian) governs
/// effect-size and variance formulas throughout the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeType {
    /// Binary outcome (conversion / success rate), binomially distributed.
    Binary,
    /// Continuous outcome summarised by mean and standard deviation.
    Normal,
}

/// How an effect is expressed relative to the baseline group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectType {
    /// Raw difference in outcome units (or percentage points for binary).
    Absolute,
    /// Fractional change relative to the baseline value.
    Relative,
}

/// Directionality of the hypothesis test passed to the power solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alternative {
    TwoSided,
    Smaller,
    Larger,
}

/// Multiple-comparison correction applied to the base significance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultipleComparison {
    Bonferroni,
    None,
}

/// Sequential-testing (alpha spending) correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequentialTest {
    ObrienFleming,
    None,
}

/// Which group pairs are evaluated in a multi-group experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonMode {
    /// Compare every other group against the first (control) group.
    CompareToFirst,
    /// Compare all unordered group pairs.
    CompareAllPairs,
}
