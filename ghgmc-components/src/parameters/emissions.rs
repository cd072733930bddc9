//! Parameters of the Monte Carlo emissions simulation.

use super::{RegimeParameter, SweepParameters};
use ghgmc_core::distribution::NormalParameters;
use ghgmc_core::errors::{GhgError, GhgResult};
use ghgmc_core::statistics::DEFAULT_CONFIDENCE_LEVEL;
use ghgmc_core::units::{BCF_KG_PER_FT3_TO_GT, GAS_DENSITY_KG_PER_FT3};
use ghgmc_core::FloatValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Time horizon of a global warming potential
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GwpHorizon {
    /// 100-year horizon
    Gwp100,
    /// 20-year horizon
    Gwp20,
}

impl GwpHorizon {
    pub const ALL: [GwpHorizon; 2] = [GwpHorizon::Gwp100, GwpHorizon::Gwp20];
}

impl fmt::Display for GwpHorizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GwpHorizon::Gwp100 => write!(f, "GWP100"),
            GwpHorizon::Gwp20 => write!(f, "GWP20"),
        }
    }
}

/// Parameters for the measurement-based methane emissions simulation
///
/// Methane emitted by the natural gas system in a year is
///
/// $$ E_{CH_4} = r_{up} \cdot m_{prod} + r_{down} \cdot m_{cons} $$
///
/// where $m$ are the gas masses produced and consumed downstream and $r$ the
/// fractions leaked. The adjusted gross inventory total then replaces the
/// reported natural gas methane with this estimate:
///
/// $$ G = N - E_{reported} + GWP \cdot E_{CH_4} $$
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmissionsParameters {
    /// Number of Monte Carlo trials
    /// default: 1_000_000
    pub n_trials: usize,

    /// Seed of the random number generator.
    /// Runs are not reproducible when unset.
    /// default: none
    pub seed: Option<u64>,

    /// Upstream and midstream leak rate as a fraction of production.
    /// Measurement campaigns before and after 2008 give different rates.
    /// unit: %
    /// default: 1.32 +/- 0.285 (95% CI) before 2008, 2.95 (sd 0.087) from 2008
    pub upstream_rate: RegimeParameter,

    /// Downstream leak rate as a fraction of delivered gas
    /// unit: %
    /// default: 2.48 (sd 0.388)
    pub downstream_rate: NormalParameters,

    /// 100-year methane GWP
    /// unit: dimensionless
    /// default: 29.8 +/- 11 (95% CI)
    pub gwp100: NormalParameters,

    /// 20-year methane GWP
    /// unit: dimensionless
    /// default: 82.5 +/- 25.8 (95% CI)
    pub gwp20: NormalParameters,

    /// Natural gas density
    /// unit: kg/ft^3
    /// default: 0.0192
    pub gas_density: FloatValue,

    /// Factor taking bcf x (kg/ft^3) to the mass unit of the inventory
    /// unit: Gt / (bcf kg/ft^3)
    /// default: 1e-3
    pub mass_per_unit_density: FloatValue,

    /// Two-sided level of every reported interval
    /// default: 0.95
    pub confidence_level: FloatValue,

    /// GWP grid used by the sensitivity sweep
    pub sweep: SweepParameters,
}

impl Default for EmissionsParameters {
    fn default() -> Self {
        Self {
            n_trials: 1_000_000,
            seed: None,
            upstream_rate: RegimeParameter {
                boundary_year: 2008,
                before: NormalParameters::with_half_width_95(1.32, 0.285),
                after: NormalParameters::with_std_dev(2.95, 0.087),
            },
            downstream_rate: NormalParameters::with_std_dev(2.48, 0.388),
            gwp100: NormalParameters::with_half_width_95(29.8, 11.0),
            gwp20: NormalParameters::with_half_width_95(82.5, 25.8),
            gas_density: GAS_DENSITY_KG_PER_FT3,
            mass_per_unit_density: BCF_KG_PER_FT3_TO_GT,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            sweep: SweepParameters::default(),
        }
    }
}

impl EmissionsParameters {
    /// Read parameters from a TOML document.
    ///
    /// Missing keys take their default values.
    pub fn from_toml_str(document: &str) -> GhgResult<Self> {
        let parameters: Self = toml::from_str(document)?;
        parameters.validate()?;
        Ok(parameters)
    }

    /// Read parameters from a TOML file.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> GhgResult<Self> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path)
            .map_err(|e| GhgError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&document)
    }

    /// Distribution of the GWP for `horizon`
    pub fn gwp(&self, horizon: GwpHorizon) -> &NormalParameters {
        match horizon {
            GwpHorizon::Gwp100 => &self.gwp100,
            GwpHorizon::Gwp20 => &self.gwp20,
        }
    }

    /// Check the distribution, sweep and interval parameters.
    ///
    /// The trial count is checked when a simulation runs. Physical constants
    /// are not range checked.
    pub fn validate(&self) -> GhgResult<()> {
        self.upstream_rate.validate()?;
        self.downstream_rate.validate()?;
        self.gwp100.validate()?;
        self.gwp20.validate()?;
        self.sweep.validate()?;
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(GhgError::InvalidParameter(format!(
                "confidence level must be within (0, 1), got {}",
                self.confidence_level
            )));
        }
        Ok(())
    }
}
