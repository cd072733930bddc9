//! Simulation parameters
//!
//! Each parameter struct provides defaults matching the published
//! measurement-based estimates of US natural gas supply chain methane
//! emissions and the AR6 methane GWP values.

mod emissions;
mod regime;
mod sweep;

pub use emissions::{EmissionsParameters, GwpHorizon};
pub use regime::RegimeParameter;
pub use sweep::SweepParameters;
