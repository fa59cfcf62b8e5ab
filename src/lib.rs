//! # experiment-statistics
//!
//! A Rust library for designing and analysing controlled experiments (A/B tests)
//! with binary (conversion-rate) or normal (continuous) outcomes.
//!
//! This crate is the statistical calculation core behind an experiment
//! calculator: effect-size transforms, power and sample-size solving on the
//! non-central t-distribution, multiple-comparison and sequential-testing alpha
//! adjustment, and confidence-interval construction with correct variance
//! propagation (delta method, Welch-Satterthwaite equation). It performs no I/O
//! and keeps no state; every calculation is a pure function of validated
//! numeric inputs.
//!
//! ## Core Features
//!
//! - **Sample Size & MDE**: required group sizes for a target power, or the
//!   minimum detectable effect for a fixed sample
//! - **Alpha Adjustment**: Bonferroni correction and O'Brien-Fleming alpha
//!   spending for sequential looks
//! - **Significance Analysis**: point estimates and confidence intervals for
//!   between-group differences, absolute or relative
//! - **SRM Detection**: chi-square goodness-of-fit test for traffic allocation
//!
//! ## Quick Start
//!
//! Convert a minimum detectable effect into a standardized effect size with
//! [`design::effect`], adjust the significance level with [`design::alpha`],
//! and solve for the required sample size with [`design::power`]. Read out a
//! finished experiment with [`analysis::intervals`] and [`analysis::srm`].
//!
//! ## Module Organization
//!
//! - **[`design`]**: experiment planning: alpha adjustment, effect sizes,
//!   the power solver, comparison planning, and power-curve sampling
//! - **[`analysis`]**: experiment readout: group and difference confidence
//!   intervals, and sample-ratio-mismatch detection

pub mod analysis;
pub mod design;
pub mod validation;
