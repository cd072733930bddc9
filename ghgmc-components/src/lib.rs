//! Simulation components for recalculating natural gas methane emissions
//!
//! # Module Organisation
//!
//! - `components`: the Monte Carlo emissions simulator and the GWP
//!   sensitivity sweep that reuses its methane draws
//! - `parameters`: parameter structs for both, with defaults taken from
//!   measurement studies and AR6 GWP values

pub mod components;
pub mod parameters;
