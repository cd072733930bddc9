//! End-to-end analysis run.
//!
//! Runs the emissions simulation, the GWP sweep for the most recent year, and
//! reduces everything to the summaries that reporting and plotting consume.
//! Raw trial matrices are dropped once summarised.

use ghgmc_components::components::{GwpSensitivitySweep, MonteCarloEmissions};
use ghgmc_components::parameters::{EmissionsParameters, GwpHorizon};
use ghgmc_core::errors::GhgResult;
use ghgmc_core::statistics::{DistributionSummary, SummaryInterval};
use ghgmc_core::timeseries::InputSeries;
use ghgmc_core::{FloatValue, Year};
use ndarray::Array1;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A value for each GWP horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ByHorizon<T> {
    pub gwp100: T,
    pub gwp20: T,
}

impl<T> ByHorizon<T> {
    fn try_from_fn<F>(mut f: F) -> GhgResult<Self>
    where
        F: FnMut(GwpHorizon) -> GhgResult<T>,
    {
        Ok(Self {
            gwp100: f(GwpHorizon::Gwp100)?,
            gwp20: f(GwpHorizon::Gwp20)?,
        })
    }

    pub fn get(&self, horizon: GwpHorizon) -> &T {
        match horizon {
            GwpHorizon::Gwp100 => &self.gwp100,
            GwpHorizon::Gwp20 => &self.gwp20,
        }
    }
}

/// Summary of the GWP sensitivity sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub year: Year,
    pub gwp_values: Array1<FloatValue>,
    pub adjusted_gross: DistributionSummary,
}

/// Everything a reporting collaborator needs from one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub years: Vec<Year>,
    pub n_trials: usize,
    pub confidence_level: FloatValue,
    /// Per-year adjusted gross emissions (Gt CO2e/yr)
    pub adjusted_gross: ByHorizon<DistributionSummary>,
    /// Per-year natural gas methane emissions (Gt CO2e/yr)
    pub methane_co2e: ByHorizon<DistributionSummary>,
    /// The sampled GWP distributions
    pub gwp: ByHorizon<SummaryInterval>,
    pub sweep: SweepReport,
}

/// Run the full analysis with a generator seeded from `parameters.seed`.
///
/// Without a seed the generator is seeded from OS entropy.
pub fn run_analysis(
    inputs: &InputSeries,
    parameters: &EmissionsParameters,
) -> GhgResult<AnalysisReport> {
    let mut rng = match parameters.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => {
            warn!("No seed configured; results will not be reproducible");
            ChaCha8Rng::from_entropy()
        }
    };
    run_analysis_with_rng(inputs, parameters, &mut rng)
}

/// Run the full analysis drawing from `rng`.
pub fn run_analysis_with_rng<R: Rng + ?Sized>(
    inputs: &InputSeries,
    parameters: &EmissionsParameters,
    rng: &mut R,
) -> GhgResult<AnalysisReport> {
    let ensemble = MonteCarloEmissions::from_parameters(parameters.clone()).run(inputs, rng)?;
    let sweep = GwpSensitivitySweep::from_parameters(parameters.sweep.clone())
        .run(&ensemble, inputs, None)?;

    let report = AnalysisReport {
        years: inputs.years().values().to_vec(),
        n_trials: ensemble.n_trials(),
        confidence_level: ensemble.confidence_level(),
        adjusted_gross: ByHorizon::try_from_fn(|h| ensemble.adjusted_gross_summary(h))?,
        methane_co2e: ByHorizon::try_from_fn(|h| ensemble.methane_co2e_summary(h))?,
        gwp: ByHorizon::try_from_fn(|h| ensemble.gwp_summary(h))?,
        sweep: SweepReport {
            year: sweep.year(),
            gwp_values: sweep.gwp_values().clone(),
            adjusted_gross: sweep.summary()?,
        },
    };
    info!(years = report.years.len(), "Analysis complete");

    Ok(report)
}
