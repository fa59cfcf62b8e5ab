use experiment_statistics::analysis::srm::srm_pvalue;
use experiment_statistics::analysis::{GroupSummary, intervals};
use experiment_statistics::design::{
    Alternative, ComparisonMode, EffectType, MultipleComparison, OutcomeType, SequentialTest,
    alpha, comparisons, curve, effect, power,
};
use experiment_statistics::validation;

use ndarray::Array1;

/// Full power-calculator flow for a binary outcome: minimum sample size for a
/// two-group experiment with a 10% baseline and a 2pp absolute MDE.
#[test]
fn power_calculator_binary_sample_size_flow() {
    let allocations = vec![50.0, 50.0];
    assert!(validation::valid_traffic_allocation(&allocations));

    let pairs = comparisons::comparison_pairs(ComparisonMode::CompareToFirst, allocations.len())
        .unwrap();
    let operative_alpha = alpha::adjusted_alpha(
        0.05,
        pairs.len(),
        MultipleComparison::None,
        SequentialTest::None,
        None,
    )
    .unwrap();

    let mde = effect::minimum_detectable_effect(OutcomeType::Binary, EffectType::Absolute, 2.0);
    assert!((mde - 0.02).abs() < 1e-12);

    let effect_size = effect::effect_size(
        OutcomeType::Binary,
        EffectType::Absolute,
        0.10,
        mde,
        None,
    )
    .unwrap();

    let limiting_ratio =
        comparisons::limiting_ratio(ComparisonMode::CompareToFirst, &allocations).unwrap();
    let n1 = power::sample_size_for_power(
        effect_size,
        operative_alpha,
        0.8,
        limiting_ratio,
        Alternative::TwoSided,
    )
    .unwrap();

    // The closed-form two-proportion z-test puts the requirement near 3841
    // per group; the non-central t solve must land within solver tolerance.
    assert!(n1 > 0);
    let z_approximation = 3841.0;
    assert!((n1 as f64 - z_approximation).abs() / z_approximation < 0.05);

    // The plotting series spans the whole default grid.
    let group_ratios =
        comparisons::group_ratios(ComparisonMode::CompareToFirst, &allocations).unwrap();
    let series = curve::sample_size_curve(
        effect_size,
        operative_alpha,
        limiting_ratio,
        &group_ratios,
        Alternative::TwoSided,
        &curve::power_grid(),
    )
    .unwrap();
    assert_eq!(series.len(), curve::POWER_GRID_POINTS);

    // The grid point at 80% power agrees with the direct solve.
    let at_80 = series
        .iter()
        .min_by(|a, b| {
            (a.power_pct - 80.0)
                .abs()
                .partial_cmp(&(b.power_pct - 80.0).abs())
                .unwrap()
        })
        .unwrap();
    assert!((at_80.x - (n1 * 2) as f64).abs() / ((n1 * 2) as f64) < 0.02);
}

/// Full power-calculator flow in the other direction: the detectable effect
/// for a fixed total sample, converted back to percentage points.
#[test]
fn power_calculator_binary_detectable_effect_flow() {
    let allocations = vec![50.0, 50.0];
    let group_ratios =
        comparisons::group_ratios(ComparisonMode::CompareToFirst, &allocations).unwrap();
    let ratio_sum: f64 = group_ratios.iter().sum();
    let n1 = 8000.0 / ratio_sum;

    let limiting_ratio =
        comparisons::limiting_ratio(ComparisonMode::CompareToFirst, &allocations).unwrap();
    let detectable =
        power::detectable_effect_size(n1, 0.8, 0.05, limiting_ratio, Alternative::TwoSided)
            .unwrap();
    let displayed =
        effect::convert_effect_size_for_binary_outcome(EffectType::Absolute, detectable, 0.10)
            .unwrap();

    // 4000 per group detects a bit under 2pp on a 10% baseline at 80% power.
    assert!(displayed > 1.5 && displayed < 2.2);

    let series = curve::detectable_effect_curve(
        n1,
        0.05,
        limiting_ratio,
        OutcomeType::Binary,
        EffectType::Absolute,
        0.10,
        None,
        Alternative::TwoSided,
        &curve::power_grid(),
    )
    .unwrap();
    assert_eq!(series.len(), curve::POWER_GRID_POINTS);
    // Displayed effects grow with the power demanded of the same sample.
    assert!(series.first().unwrap().x <= series.last().unwrap().x);
}

/// Significance-calculator flow for a three-group binary experiment with
/// Bonferroni correction.
#[test]
fn significance_calculator_binary_flow() {
    let groups = vec![
        GroupSummary::binary("control", 10_000, 1_000),
        GroupSummary::binary("variant_a", 10_000, 1_150),
        GroupSummary::binary("variant_b", 10_000, 1_020),
    ];
    assert!(validation::valid_summary_data(&groups));

    let pairs =
        comparisons::comparison_pairs(ComparisonMode::CompareToFirst, groups.len()).unwrap();
    assert_eq!(pairs, vec![(0, 1), (0, 2)]);

    let operative_alpha = alpha::adjusted_alpha(
        0.05,
        pairs.len(),
        MultipleComparison::Bonferroni,
        SequentialTest::None,
        None,
    )
    .unwrap();
    assert!((operative_alpha - 0.025).abs() < 1e-12);

    let differences = intervals::group_differences(
        &groups,
        operative_alpha,
        &pairs,
        OutcomeType::Binary,
        EffectType::Absolute,
    )
    .unwrap();

    assert_eq!(differences.len(), 2);
    assert_eq!(differences[0].comparison, "variant_a - control");

    // A 1.5pp lift on 10% at n = 10,000 survives the corrected level; a 0.2pp
    // lift does not.
    assert!(differences[0].interval.is_significant());
    assert!(!differences[1].interval.is_significant());

    let responses =
        intervals::group_responses(OutcomeType::Binary, &groups, operative_alpha).unwrap();
    assert_eq!(responses.len(), 3);
    for (response, group) in responses.iter().zip(&groups) {
        assert_eq!(response.group_name, group.name);
        assert!(response.interval.ci_lower > 0.0);
        assert!(response.interval.ci_upper < 1.0);
    }
}

/// Significance-calculator flow for a normal outcome with a relative effect
/// and sequential testing at the halfway look.
#[test]
fn significance_calculator_normal_sequential_flow() {
    let groups = vec![
        GroupSummary::normal("control", 5_000, 42.0, 11.0),
        GroupSummary::normal("variant", 5_000, 43.1, 11.4),
    ];
    assert!(validation::valid_summary_data(&groups));

    let pairs =
        comparisons::comparison_pairs(ComparisonMode::CompareToFirst, groups.len()).unwrap();

    let fixed_alpha = alpha::adjusted_alpha(
        0.05,
        pairs.len(),
        MultipleComparison::None,
        SequentialTest::None,
        None,
    )
    .unwrap();
    let sequential_alpha = alpha::adjusted_alpha(
        0.05,
        pairs.len(),
        MultipleComparison::None,
        SequentialTest::ObrienFleming,
        Some(0.5),
    )
    .unwrap();
    assert!(sequential_alpha < fixed_alpha);

    let fixed = intervals::group_differences(
        &groups,
        fixed_alpha,
        &pairs,
        OutcomeType::Normal,
        EffectType::Relative,
    )
    .unwrap();
    let sequential = intervals::group_differences(
        &groups,
        sequential_alpha,
        &pairs,
        OutcomeType::Normal,
        EffectType::Relative,
    )
    .unwrap();

    // Same point estimate, stricter interval at the interim look.
    let relative_lift = (43.1 - 42.0) / 42.0;
    assert!((fixed[0].interval.point_estimate - relative_lift).abs() < 1e-12);
    assert!((sequential[0].interval.point_estimate - relative_lift).abs() < 1e-12);
    assert!(sequential[0].interval.width() > fixed[0].interval.width());
}

/// SRM-test flow: percentages in, p-value out, thresholded by the caller.
#[test]
fn srm_test_flow() {
    let sample_sizes = vec![5_000_u64, 5_000];
    let expected_pct = vec![50.0, 50.0];
    assert!(validation::valid_srm_data(&sample_sizes, &expected_pct));

    let groups = validation::srm_groups_from_percentages(&sample_sizes, &expected_pct);
    let p_value = srm_pvalue(&groups).unwrap();
    assert!(p_value > 0.05);

    let skewed = validation::srm_groups_from_percentages(&[9_000, 1_000], &expected_pct);
    let p_value = srm_pvalue(&skewed).unwrap();
    assert!(p_value < 0.001);
}

/// The detectable-effect direction is consistent with the sample-size
/// direction across a coarse grid of designs.
#[test]
fn solver_directions_are_mutually_consistent() {
    let grid = Array1::from(vec![0.5, 0.8, 0.9]);
    for &target_power in grid.iter() {
        for &ratio in &[1.0, 0.5] {
            let n1 = power::sample_size_for_power(
                0.25,
                0.05,
                target_power,
                ratio,
                Alternative::TwoSided,
            )
            .unwrap();
            let recovered = power::detectable_effect_size(
                n1 as f64,
                target_power,
                0.05,
                ratio,
                Alternative::TwoSided,
            )
            .unwrap();
            // Rounding n1 up means the recovered effect is at most the input.
            assert!(recovered <= 0.25 + 1e-9);
            assert!((recovered - 0.25).abs() / 0.25 < 0.05);
        }
    }
}
