//! Recalculate a national greenhouse-gas inventory with measurement-based
//! natural gas methane emissions.
//!
//! The reported methane emissions of the natural gas system are replaced by
//! an estimate built from field-measured leak rates, and the uncertainty of
//! those rates and of the methane GWP is propagated by Monte Carlo
//! simulation. Results are reported at both the 100-year and 20-year GWP.
//!
//! Reading inventory spreadsheets and rendering charts are left to callers:
//! this crate consumes an [`InputSeries`] and produces an [`AnalysisReport`].

pub mod analysis;

pub use analysis::{run_analysis, run_analysis_with_rng, AnalysisReport, ByHorizon, SweepReport};
pub use ghgmc_components::components::{
    EmissionsEnsemble, GwpSensitivitySweep, MonteCarloEmissions, SweepResult,
};
pub use ghgmc_components::parameters::{
    EmissionsParameters, GwpHorizon, RegimeParameter, SweepParameters,
};
pub use ghgmc_core::errors::{GhgError, GhgResult};
pub use ghgmc_core::timeseries::{InputRecord, InputSeries, YearSeries};
pub use ghgmc_core::{distribution, statistics, units};
