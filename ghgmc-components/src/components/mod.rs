mod emissions;
mod sweep;

pub use emissions::{
    adjusted_gross_emissions, draw_per_run, draw_per_year, methane_emissions,
    EmissionsEnsemble, MonteCarloEmissions,
};
pub use sweep::{GwpSensitivitySweep, SweepResult};
