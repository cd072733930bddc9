//! GWP sensitivity sweep parameters

use ghgmc_core::errors::{GhgError, GhgResult};
use ghgmc_core::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Evenly spaced grid of GWP values, endpoints included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepParameters {
    /// First GWP value of the grid
    /// default: 10.0
    pub gwp_min: FloatValue,
    /// Last GWP value of the grid
    /// default: 115.0
    pub gwp_max: FloatValue,
    /// Number of grid points
    /// default: 100
    pub points: usize,
}

impl Default for SweepParameters {
    fn default() -> Self {
        Self {
            gwp_min: 10.0,
            gwp_max: 115.0,
            points: 100,
        }
    }
}

impl SweepParameters {
    pub fn validate(&self) -> GhgResult<()> {
        if self.points == 0 {
            return Err(GhgError::InvalidParameter(
                "GWP sweep needs at least one point".to_string(),
            ));
        }
        if !(self.gwp_min.is_finite() && self.gwp_max.is_finite()) || self.gwp_min >= self.gwp_max
        {
            return Err(GhgError::InvalidParameter(format!(
                "GWP sweep range must satisfy min < max, got [{}, {}]",
                self.gwp_min, self.gwp_max
            )));
        }
        Ok(())
    }

    /// The GWP grid
    pub fn values(&self) -> Array1<FloatValue> {
        Array1::linspace(self.gwp_min, self.gwp_max, self.points)
    }
}
