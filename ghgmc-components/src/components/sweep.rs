//! GWP sensitivity sweep
//!
//! Isolates the effect of the GWP choice on the adjusted inventory total for
//! a single year. The methane draws of an existing [`EmissionsEnsemble`] are
//! reused unchanged; only the random GWP is replaced by each value of a fixed
//! grid:
//!
//! $$ G_{k,j} = N - E_{reported} + g_k \cdot E_{CH_4,j} $$

use super::emissions::EmissionsEnsemble;
use crate::parameters::{GwpHorizon, SweepParameters};
use ghgmc_core::errors::{GhgError, GhgResult};
use ghgmc_core::statistics::{summarize_with_level, DistributionSummary, SummaryInterval};
use ghgmc_core::timeseries::InputSeries;
use ghgmc_core::{FloatValue, Year};
use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Deterministic sweep of the GWP over the methane draws of one year
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GwpSensitivitySweep {
    parameters: SweepParameters,
}

impl Default for GwpSensitivitySweep {
    fn default() -> Self {
        Self::from_parameters(SweepParameters::default())
    }
}

impl GwpSensitivitySweep {
    pub fn from_parameters(parameters: SweepParameters) -> Self {
        Self { parameters }
    }

    /// Sweep the GWP for `year`, or the most recent year when `None`.
    ///
    /// `inputs` must be the series `ensemble` was simulated from.
    pub fn run(
        &self,
        ensemble: &EmissionsEnsemble,
        inputs: &InputSeries,
        year: Option<Year>,
    ) -> GhgResult<SweepResult> {
        self.parameters.validate()?;
        if inputs.years() != ensemble.years() {
            return Err(GhgError::InputShape(
                "input series does not match the years of the simulation".to_string(),
            ));
        }

        let year = match year.or_else(|| ensemble.years().last()) {
            Some(year) => year,
            None => {
                return Err(GhgError::InputShape(
                    "cannot sweep an empty year series".to_string(),
                ))
            }
        };
        let (record, methane) = match (inputs.record(year), ensemble.methane_emissions_for(year))
        {
            (Some(record), Some(methane)) => (record, methane),
            _ => {
                return Err(GhgError::InvalidParameter(format!(
                    "year {} is not part of the simulation",
                    year
                )))
            }
        };

        let gwp_values = self.parameters.values();
        info!(
            year,
            points = gwp_values.len(),
            trials = methane.len(),
            "Running GWP sensitivity sweep"
        );

        let offset = record.net_emissions - record.reported_methane;
        let adjusted = Array2::from_shape_fn((gwp_values.len(), methane.len()), |(k, j)| {
            offset + gwp_values[k] * methane[j]
        });

        Ok(SweepResult {
            year,
            gwp_values,
            adjusted,
            gwp100: ensemble.gwp_summary(GwpHorizon::Gwp100)?,
            gwp20: ensemble.gwp_summary(GwpHorizon::Gwp20)?,
            confidence_level: ensemble.confidence_level(),
        })
    }
}

/// Adjusted gross emissions of one year as a function of the GWP
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResult {
    year: Year,
    gwp_values: Array1<FloatValue>,
    /// shape (sweep points, trials)
    adjusted: Array2<FloatValue>,
    gwp100: SummaryInterval,
    gwp20: SummaryInterval,
    confidence_level: FloatValue,
}

impl SweepResult {
    pub fn year(&self) -> Year {
        self.year
    }

    pub fn gwp_values(&self) -> &Array1<FloatValue> {
        &self.gwp_values
    }

    /// Adjusted gross emissions (Gt CO2e/yr), shape (sweep points, trials)
    pub fn adjusted_gross(&self) -> ArrayView2<FloatValue> {
        self.adjusted.view()
    }

    /// Mean and interval of the adjusted gross emissions at each GWP value
    pub fn summary(&self) -> GhgResult<DistributionSummary> {
        summarize_with_level(self.adjusted.view(), Axis(1), self.confidence_level)
    }

    /// Mean and interval of the sampled GWP for `horizon`, for annotation
    pub fn gwp_summary(&self, horizon: GwpHorizon) -> SummaryInterval {
        match horizon {
            GwpHorizon::Gwp100 => self.gwp100,
            GwpHorizon::Gwp20 => self.gwp20,
        }
    }

    /// Index of the grid value nearest to `gwp`
    pub fn closest_index(&self, gwp: FloatValue) -> Option<usize> {
        self.gwp_values
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (*a - gwp).abs().total_cmp(&(*b - gwp).abs()))
            .map(|(i, _)| i)
    }
}
