//! Normal distributions for uncertain inputs.
//!
//! Uncertainties are quoted in two ways in the literature: as a standard
//! deviation, or as the half-width of a 95% confidence interval. [`Spread`]
//! keeps track of which one a parameter was given as, and
//! [`NormalParameters::std_dev`] is the only place the two are reconciled.

use crate::errors::{GhgError, GhgResult};
use crate::FloatValue;
use ndarray::{Array1, Array2};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// z-score of the 97.5th percentile of the standard normal distribution
pub const Z_95: FloatValue = 1.96;

/// Width of a normal distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spread {
    /// Standard deviation
    StdDev(FloatValue),
    /// Half-width of the central 95% interval, i.e. `1.96 * sigma`
    #[serde(rename = "half_width_95")]
    HalfWidth95(FloatValue),
}

/// Mean and spread of a normal distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalParameters {
    pub mean: FloatValue,
    pub spread: Spread,
}

impl NormalParameters {
    pub fn with_std_dev(mean: FloatValue, std_dev: FloatValue) -> Self {
        Self {
            mean,
            spread: Spread::StdDev(std_dev),
        }
    }

    pub fn with_half_width_95(mean: FloatValue, half_width: FloatValue) -> Self {
        Self {
            mean,
            spread: Spread::HalfWidth95(half_width),
        }
    }

    /// Standard deviation of the distribution
    pub fn std_dev(&self) -> FloatValue {
        match self.spread {
            Spread::StdDev(sigma) => sigma,
            Spread::HalfWidth95(half_width) => half_width / Z_95,
        }
    }

    /// Check that the parameters describe a usable distribution.
    ///
    /// The mean must be finite and the standard deviation finite and
    /// non-negative. A zero standard deviation yields a point mass.
    pub fn validate(&self) -> GhgResult<()> {
        let sigma = self.std_dev();
        if !self.mean.is_finite() {
            return Err(GhgError::InvalidParameter(format!(
                "distribution mean must be finite, got {}",
                self.mean
            )));
        }
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(GhgError::InvalidParameter(format!(
                "distribution spread must be finite and non-negative, got {:?}",
                self.spread
            )));
        }
        Ok(())
    }

    fn normal(&self) -> GhgResult<Normal<FloatValue>> {
        self.validate()?;
        Ok(Normal::new(self.mean, self.std_dev())?)
    }

    /// Draw `count` independent samples.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> GhgResult<Array1<FloatValue>> {
        let normal = self.normal()?;
        Ok(Array1::from_shape_simple_fn(count, || normal.sample(rng)))
    }

    /// Draw a `(rows, cols)` matrix of independent samples, filled row by row.
    pub fn sample_matrix<R: Rng + ?Sized>(
        &self,
        rows: usize,
        cols: usize,
        rng: &mut R,
    ) -> GhgResult<Array2<FloatValue>> {
        let normal = self.normal()?;
        Ok(Array2::from_shape_simple_fn((rows, cols), || normal.sample(rng)))
    }
}

/// Draw `count` samples from a normal distribution specified by its mean and
/// the half-width of its 95% interval.
pub fn sample_normal<R: Rng + ?Sized>(
    mean: FloatValue,
    half_width_95: FloatValue,
    count: usize,
    rng: &mut R,
) -> GhgResult<Array1<FloatValue>> {
    NormalParameters::with_half_width_95(mean, half_width_95).sample(count, rng)
}
