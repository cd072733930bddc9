//! Unit conversions between gas volumes, methane mass and CO2-equivalents.
//!
//! All functions are pure and perform no validation; invalid inputs (negative
//! volumes, NaN) propagate into the results.

use crate::FloatValue;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Density of natural gas at standard conditions
/// unit: kg/ft^3
pub const GAS_DENSITY_KG_PER_FT3: FloatValue = 0.0192;

/// Converts (bcf/yr) x (kg/ft^3) into Gt/yr.
///
/// 1 bcf = 1e9 ft^3 and 1 Gt = 1e12 kg.
pub const BCF_KG_PER_FT3_TO_GT: FloatValue = 1e9 / 1e12;

const PERCENT: FloatValue = 100.0;

/// Convert a volumetric gas flow into a mass flow.
///
/// $$ m = V \cdot \rho \cdot k $$
///
/// where $\rho$ is the gas density and $k$ is the factor taking volume
/// times density to the mass unit.
pub fn volume_to_mass(
    volume: ArrayView1<FloatValue>,
    density: FloatValue,
    mass_per_unit_density: FloatValue,
) -> Array1<FloatValue> {
    volume.mapv(|v| v * density * mass_per_unit_density)
}

/// Convert a rate given in percent into a fraction.
pub fn percent_to_fraction(percent: FloatValue) -> FloatValue {
    percent / PERCENT
}

/// CO2-equivalent of a single mass flow.
pub fn to_co2e(mass: FloatValue, gwp: FloatValue) -> FloatValue {
    mass * gwp
}

/// CO2-equivalent of a (year x trial) methane matrix.
///
/// The per-trial `gwp` vector is broadcast across every year, so trial `j`
/// uses the same warming potential in every row.
pub fn to_co2e_per_trial(
    mass: ArrayView2<FloatValue>,
    gwp: ArrayView1<FloatValue>,
) -> Array2<FloatValue> {
    &mass * &gwp.insert_axis(Axis(0))
}
