//! Distribution parameters that switch at a policy-change year.

use ghgmc_core::distribution::NormalParameters;
use ghgmc_core::errors::GhgResult;
use ghgmc_core::Year;
use serde::{Deserialize, Serialize};

/// A distribution whose parameters depend on which side of a boundary year
/// a year falls.
///
/// Years strictly before `boundary_year` use `before`; the boundary year
/// itself and every later year use `after`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeParameter {
    pub boundary_year: Year,
    pub before: NormalParameters,
    pub after: NormalParameters,
}

impl RegimeParameter {
    /// Distribution parameters that apply to `year`
    pub fn resolve(&self, year: Year) -> &NormalParameters {
        if year < self.boundary_year {
            &self.before
        } else {
            &self.after
        }
    }

    pub fn validate(&self) -> GhgResult<()> {
        self.before.validate()?;
        self.after.validate()
    }
}
