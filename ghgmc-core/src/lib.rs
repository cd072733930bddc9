//! Core building blocks for recalculating a greenhouse-gas inventory with
//! measurement-based natural gas methane emissions.
//!
//! Nothing in this crate runs a simulation. It provides the year-indexed
//! input series, unit conversions, normal distribution specifications,
//! summary statistics and the run parameters that the simulators in
//! `ghgmc-components` are built from.

pub mod distribution;
pub mod errors;
pub mod statistics;
pub mod timeseries;
pub mod units;

/// Floating point type used for all physical quantities.
pub type FloatValue = f64;

/// Calendar year.
pub type Year = i32;
