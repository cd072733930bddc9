//! Monte Carlo emissions simulation
//!
//! Replaces the reported natural gas methane emissions in a greenhouse-gas
//! inventory with a measurement-based estimate and propagates the uncertainty
//! of leak rates and GWPs through to the adjusted inventory total.
//!
//! # Correlation structure
//!
//! Two kinds of draws are made, and they must not be confused:
//!
//! - Leak rates vary from year to year. Every (year, trial) cell gets an
//!   independent draw from the distribution that applies to that year
//!   ([`draw_per_year`]).
//! - GWPs are physical constants whose value is uncertain. Each trial draws
//!   one GWP and uses it for every year ([`draw_per_run`]), so the columns of
//!   the result matrices are correlated across years.
//!
//! # Outputs
//!
//! - Methane emissions (Gt CH4/yr), shape (years, trials)
//! - GWP100 and GWP20 samples, shape (trials,)
//! - Adjusted gross emissions (Gt CO2e/yr) under both horizons, shape (years, trials)

use crate::parameters::{EmissionsParameters, GwpHorizon};
use ghgmc_core::distribution::NormalParameters;
use ghgmc_core::errors::{GhgError, GhgResult};
use ghgmc_core::statistics::{
    summarize_samples_with_level, summarize_with_level, DistributionSummary, SummaryInterval,
};
use ghgmc_core::timeseries::{InputSeries, YearSeries};
use ghgmc_core::units::{percent_to_fraction, to_co2e_per_trial, volume_to_mass};
use ghgmc_core::{FloatValue, Year};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Draw a (years x trials) matrix in which each year is sampled independently
/// from the distribution `resolve` returns for it.
pub fn draw_per_year<'a, R, F>(
    years: &YearSeries,
    n_trials: usize,
    resolve: F,
    rng: &mut R,
) -> GhgResult<Array2<FloatValue>>
where
    R: Rng + ?Sized,
    F: Fn(Year) -> &'a NormalParameters,
{
    let mut draws = Array2::zeros((years.len(), n_trials));
    for (year, mut row) in years.iter().zip(draws.rows_mut()) {
        let distribution = resolve(year);
        debug!(year, ?distribution, "Sampling per-year rate");
        row.assign(&distribution.sample(n_trials, rng)?);
    }
    Ok(draws)
}

/// Draw one value per trial, shared by every year of that trial.
pub fn draw_per_run<R: Rng + ?Sized>(
    distribution: &NormalParameters,
    n_trials: usize,
    rng: &mut R,
) -> GhgResult<Array1<FloatValue>> {
    distribution.sample(n_trials, rng)
}

/// Methane emitted by the gas system for every (year, trial).
///
/// Rates are in percent and masses in Gt/yr; the per-year masses are
/// broadcast across trials.
pub fn methane_emissions(
    upstream_rate: ArrayView2<FloatValue>,
    downstream_rate: ArrayView2<FloatValue>,
    production_mass: ArrayView1<FloatValue>,
    downstream_mass: ArrayView1<FloatValue>,
) -> Array2<FloatValue> {
    Array2::from_shape_fn(upstream_rate.raw_dim(), |(i, j)| {
        percent_to_fraction(upstream_rate[[i, j]]) * production_mass[i]
            + percent_to_fraction(downstream_rate[[i, j]]) * downstream_mass[i]
    })
}

/// Net emissions with the reported gas system methane swapped for `methane_co2e`.
///
/// $$ G_{y,j} = N_y - E_{reported,y} + C_{y,j} $$
pub fn adjusted_gross_emissions(
    methane_co2e: ArrayView2<FloatValue>,
    net_emissions: ArrayView1<FloatValue>,
    reported_methane: ArrayView1<FloatValue>,
) -> Array2<FloatValue> {
    let offset = &net_emissions - &reported_methane;
    &methane_co2e + &offset.insert_axis(Axis(1))
}

/// Monte Carlo simulator of measurement-based natural gas methane emissions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloEmissions {
    parameters: EmissionsParameters,
}

impl Default for MonteCarloEmissions {
    fn default() -> Self {
        Self::new()
    }
}

impl MonteCarloEmissions {
    /// Create a simulator with default parameters
    pub fn new() -> Self {
        Self::from_parameters(EmissionsParameters::default())
    }

    /// Create a simulator from parameters
    pub fn from_parameters(parameters: EmissionsParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &EmissionsParameters {
        &self.parameters
    }

    /// Run every trial for every year of `inputs`.
    ///
    /// Draws are taken from `rng` in a fixed order (upstream rates year by
    /// year, downstream rates year by year, GWP100, GWP20), so a seeded
    /// generator gives identical results on every run.
    pub fn run<R: Rng + ?Sized>(
        &self,
        inputs: &InputSeries,
        rng: &mut R,
    ) -> GhgResult<EmissionsEnsemble> {
        let params = &self.parameters;
        let n_trials = params.n_trials;
        if n_trials == 0 {
            return Err(GhgError::Precondition(
                "a simulation needs at least one trial".to_string(),
            ));
        }
        params.validate()?;

        let years = inputs.years();
        info!(
            years = years.len(),
            trials = n_trials,
            "Running Monte Carlo emissions simulation"
        );

        let upstream_rate = draw_per_year(
            years,
            n_trials,
            move |year| params.upstream_rate.resolve(year),
            rng,
        )?;
        let downstream_rate =
            draw_per_year(years, n_trials, move |_| &params.downstream_rate, rng)?;

        let production_mass = volume_to_mass(
            inputs.production().view(),
            params.gas_density,
            params.mass_per_unit_density,
        );
        let downstream_mass = volume_to_mass(
            inputs.downstream_consumption().view(),
            params.gas_density,
            params.mass_per_unit_density,
        );
        let methane = methane_emissions(
            upstream_rate.view(),
            downstream_rate.view(),
            production_mass.view(),
            downstream_mass.view(),
        );

        let gwp100 = draw_per_run(&params.gwp100, n_trials, rng)?;
        let gwp20 = draw_per_run(&params.gwp20, n_trials, rng)?;
        for (horizon, gwp) in [(GwpHorizon::Gwp100, &gwp100), (GwpHorizon::Gwp20, &gwp20)] {
            let non_positive = gwp.iter().filter(|&&g| g <= 0.0).count();
            if non_positive > 0 {
                warn!(
                    %horizon,
                    count = non_positive,
                    "Non-positive GWP draws kept as sampled"
                );
            }
        }

        let adjusted = |gwp: &Array1<FloatValue>| {
            adjusted_gross_emissions(
                to_co2e_per_trial(methane.view(), gwp.view()).view(),
                inputs.net_emissions().view(),
                inputs.reported_methane().view(),
            )
        };
        let adjusted_gwp100 = adjusted(&gwp100);
        let adjusted_gwp20 = adjusted(&gwp20);

        info!("Monte Carlo emissions simulation complete");

        Ok(EmissionsEnsemble {
            years: years.clone(),
            methane,
            gwp100,
            gwp20,
            adjusted_gwp100,
            adjusted_gwp20,
            confidence_level: params.confidence_level,
        })
    }
}

/// Result of a Monte Carlo emissions run.
///
/// Matrices are indexed by (year, trial) with years in the order of the input
/// series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmissionsEnsemble {
    years: YearSeries,
    methane: Array2<FloatValue>,
    gwp100: Array1<FloatValue>,
    gwp20: Array1<FloatValue>,
    adjusted_gwp100: Array2<FloatValue>,
    adjusted_gwp20: Array2<FloatValue>,
    confidence_level: FloatValue,
}

impl EmissionsEnsemble {
    pub fn years(&self) -> &YearSeries {
        &self.years
    }

    pub fn n_years(&self) -> usize {
        self.methane.nrows()
    }

    pub fn n_trials(&self) -> usize {
        self.methane.ncols()
    }

    pub fn confidence_level(&self) -> FloatValue {
        self.confidence_level
    }

    /// Methane emissions (Gt CH4/yr)
    pub fn methane_emissions(&self) -> ArrayView2<FloatValue> {
        self.methane.view()
    }

    /// Methane emissions of every trial in `year`
    pub fn methane_emissions_for(&self, year: Year) -> Option<ArrayView1<FloatValue>> {
        self.years.index_of(year).map(|i| self.methane.row(i))
    }

    /// The per-trial GWP draws for `horizon`
    pub fn gwp_samples(&self, horizon: GwpHorizon) -> ArrayView1<FloatValue> {
        match horizon {
            GwpHorizon::Gwp100 => self.gwp100.view(),
            GwpHorizon::Gwp20 => self.gwp20.view(),
        }
    }

    /// Methane emissions in CO2-equivalents (Gt CO2e/yr)
    pub fn methane_co2e(&self, horizon: GwpHorizon) -> Array2<FloatValue> {
        to_co2e_per_trial(self.methane.view(), self.gwp_samples(horizon))
    }

    /// Adjusted gross emissions (Gt CO2e/yr)
    pub fn adjusted_gross(&self, horizon: GwpHorizon) -> ArrayView2<FloatValue> {
        match horizon {
            GwpHorizon::Gwp100 => self.adjusted_gwp100.view(),
            GwpHorizon::Gwp20 => self.adjusted_gwp20.view(),
        }
    }

    /// Per-year mean and interval of the adjusted gross emissions
    pub fn adjusted_gross_summary(&self, horizon: GwpHorizon) -> GhgResult<DistributionSummary> {
        summarize_with_level(
            self.adjusted_gross(horizon),
            Axis(1),
            self.confidence_level,
        )
    }

    /// Per-year mean and interval of the methane CO2-equivalents
    pub fn methane_co2e_summary(&self, horizon: GwpHorizon) -> GhgResult<DistributionSummary> {
        summarize_with_level(
            self.methane_co2e(horizon).view(),
            Axis(1),
            self.confidence_level,
        )
    }

    /// Mean and interval of the GWP draws
    pub fn gwp_summary(&self, horizon: GwpHorizon) -> GhgResult<SummaryInterval> {
        summarize_samples_with_level(self.gwp_samples(horizon), self.confidence_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::RegimeParameter;
    use approx::assert_relative_eq;
    use ghgmc_core::timeseries::InputRecord;
    use ndarray::array;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn inputs() -> InputSeries {
        InputSeries::from_records(&[
            InputRecord {
                year: 2006,
                production: 19410.0,
                downstream_consumption: 21699.0,
                reported_methane: 0.205,
                net_emissions: 6.23,
            },
            InputRecord {
                year: 2007,
                production: 20196.0,
                downstream_consumption: 23104.0,
                reported_methane: 0.21,
                net_emissions: 6.37,
            },
            InputRecord {
                year: 2008,
                production: 21112.0,
                downstream_consumption: 23277.0,
                reported_methane: 0.215,
                net_emissions: 6.19,
            },
        ])
        .unwrap()
    }

    fn simulator(n_trials: usize) -> MonteCarloEmissions {
        MonteCarloEmissions::from_parameters(EmissionsParameters {
            n_trials,
            ..Default::default()
        })
    }

    /// Parameters with no spread in the leak rates
    fn point_rates(n_trials: usize) -> EmissionsParameters {
        EmissionsParameters {
            n_trials,
            upstream_rate: RegimeParameter {
                boundary_year: 2008,
                before: NormalParameters::with_std_dev(1.0, 0.0),
                after: NormalParameters::with_std_dev(3.0, 0.0),
            },
            downstream_rate: NormalParameters::with_std_dev(2.0, 0.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_methane_emissions_broadcasts_masses() {
        let upstream = array![[100.0, 50.0], [10.0, 20.0]];
        let downstream = array![[0.0, 100.0], [0.0, 0.0]];
        let production = array![2.0, 3.0];
        let consumption = array![5.0, 7.0];

        let methane = methane_emissions(
            upstream.view(),
            downstream.view(),
            production.view(),
            consumption.view(),
        );

        assert_relative_eq!(methane[[0, 0]], 2.0);
        assert_relative_eq!(methane[[0, 1]], 1.0 + 5.0);
        assert_relative_eq!(methane[[1, 0]], 0.3);
        assert_relative_eq!(methane[[1, 1]], 0.6);
    }

    #[test]
    fn test_adjusted_gross_emissions() {
        let co2e = array![[1.0, 2.0], [3.0, 4.0]];
        let net = array![10.0, 20.0];
        let reported = array![0.5, 1.0];

        let adjusted = adjusted_gross_emissions(co2e.view(), net.view(), reported.view());

        assert_eq!(adjusted, array![[10.5, 11.5], [22.0, 23.0]]);
    }

    #[test]
    fn test_shapes() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let ensemble = simulator(64).run(&inputs(), &mut rng).unwrap();

        assert_eq!(ensemble.n_years(), 3);
        assert_eq!(ensemble.n_trials(), 64);
        assert_eq!(ensemble.gwp_samples(GwpHorizon::Gwp20).len(), 64);
        assert_eq!(ensemble.adjusted_gross(GwpHorizon::Gwp100).dim(), (3, 64));
        assert_eq!(ensemble.methane_co2e(GwpHorizon::Gwp20).dim(), (3, 64));
    }

    #[test]
    fn test_gwp_is_shared_across_years() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let inputs = inputs();
        let ensemble = MonteCarloEmissions::from_parameters(point_rates(50))
            .run(&inputs, &mut rng)
            .unwrap();

        // With fixed rates the CO2e of every year is the same GWP draw times
        // a per-year constant, so the ratio between years is identical for
        // every trial.
        let co2e = ensemble.methane_co2e(GwpHorizon::Gwp100);
        let ratio = co2e[[2, 0]] / co2e[[0, 0]];
        for j in 0..50 {
            assert_relative_eq!(co2e[[2, j]] / co2e[[0, j]], ratio, max_relative = 1e-12);
        }

        let gwp = ensemble.gwp_samples(GwpHorizon::Gwp100);
        let methane = ensemble.methane_emissions();
        for i in 0..3 {
            for j in 0..50 {
                assert_relative_eq!(co2e[[i, j]], methane[[i, j]] * gwp[j]);
            }
        }
    }

    #[test]
    fn test_rates_are_redrawn_per_year() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let ensemble = simulator(20).run(&inputs(), &mut rng).unwrap();

        // 2006 and 2007 share a regime, but their rates are drawn separately,
        // so the ratio between the two years changes from trial to trial.
        let methane = ensemble.methane_emissions();
        let first = methane[[0, 0]] / methane[[1, 0]];
        let differs = (1..20).any(|j| (methane[[0, j]] / methane[[1, j]] - first).abs() > 1e-9);
        assert!(differs);
    }

    #[test]
    fn test_regime_switch_in_methane() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let inputs = inputs();
        let params = point_rates(4);
        let ensemble = MonteCarloEmissions::from_parameters(params.clone())
            .run(&inputs, &mut rng)
            .unwrap();

        let mass = |bcf: FloatValue| bcf * params.gas_density * params.mass_per_unit_density;
        let expected_2007 = 0.01 * mass(20196.0) + 0.02 * mass(23104.0);
        let expected_2008 = 0.03 * mass(21112.0) + 0.02 * mass(23277.0);

        for j in 0..4 {
            assert_relative_eq!(ensemble.methane_emissions()[[1, j]], expected_2007);
            assert_relative_eq!(ensemble.methane_emissions()[[2, j]], expected_2008);
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let inputs = inputs();
        let sim = simulator(100);

        let a = sim
            .run(&inputs, &mut ChaCha8Rng::seed_from_u64(99))
            .unwrap();
        let b = sim
            .run(&inputs, &mut ChaCha8Rng::seed_from_u64(99))
            .unwrap();
        let c = sim
            .run(&inputs, &mut ChaCha8Rng::seed_from_u64(100))
            .unwrap();

        for horizon in GwpHorizon::ALL {
            assert_eq!(a.adjusted_gross(horizon), b.adjusted_gross(horizon));
            assert_ne!(a.adjusted_gross(horizon), c.adjusted_gross(horizon));
        }
    }

    #[test]
    fn test_zero_trials() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = simulator(0).run(&inputs(), &mut rng).unwrap_err();
        assert!(matches!(err, GhgError::Precondition(_)));
    }

    #[test]
    fn test_single_trial() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let ensemble = simulator(1).run(&inputs(), &mut rng).unwrap();
        let summary = ensemble.adjusted_gross_summary(GwpHorizon::Gwp20).unwrap();
        let adjusted = ensemble.adjusted_gross(GwpHorizon::Gwp20);

        for i in 0..3 {
            assert_eq!(summary.mean[i], adjusted[[i, 0]]);
            assert_eq!(summary.lower[i], adjusted[[i, 0]]);
            assert_eq!(summary.upper[i], adjusted[[i, 0]]);
        }
    }

    #[test]
    fn test_invalid_distribution() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let params = EmissionsParameters {
            n_trials: 10,
            gwp20: NormalParameters::with_half_width_95(82.5, -1.0),
            ..Default::default()
        };
        let err = MonteCarloEmissions::from_parameters(params)
            .run(&inputs(), &mut rng)
            .unwrap_err();
        assert!(matches!(err, GhgError::InvalidParameter(_)));
    }

    #[test]
    fn test_nan_inputs_propagate() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let inputs = InputSeries::from_records(&[InputRecord {
            year: 2010,
            production: FloatValue::NAN,
            downstream_consumption: 100.0,
            reported_methane: 0.1,
            net_emissions: 6.0,
        }])
        .unwrap();

        let ensemble = simulator(10).run(&inputs, &mut rng).unwrap();
        assert!(ensemble
            .adjusted_gross(GwpHorizon::Gwp100)
            .iter()
            .all(|v| v.is_nan()));
    }

    #[test]
    fn test_summary_brackets_mean() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let ensemble = simulator(2000).run(&inputs(), &mut rng).unwrap();

        for horizon in GwpHorizon::ALL {
            for summary in [
                ensemble.adjusted_gross_summary(horizon).unwrap(),
                ensemble.methane_co2e_summary(horizon).unwrap(),
            ] {
                assert_eq!(summary.len(), 3);
                for s in summary.iter() {
                    assert!(s.lower <= s.mean && s.mean <= s.upper);
                }
            }
            let gwp = ensemble.gwp_summary(horizon).unwrap();
            assert!(gwp.lower < gwp.mean && gwp.mean < gwp.upper);
        }
    }

    #[test]
    fn test_year_lookup() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let ensemble = simulator(5).run(&inputs(), &mut rng).unwrap();

        assert_eq!(
            ensemble.methane_emissions_for(2007).unwrap(),
            ensemble.methane_emissions().row(1)
        );
        assert!(ensemble.methane_emissions_for(2020).is_none());
    }
}
