//! Year-indexed input data.
//!
//! [`InputSeries`] holds the four measured quantities the simulators consume,
//! one value per calendar year. Values are trusted as delivered by the data
//! loader: negative volumes or implausible emissions are not rejected, and
//! NaN values flow through into every derived quantity.
//!
//! Units are fixed at ingestion:
//! - volumes in billion cubic feet per year (bcf/yr)
//! - emissions in gigatonnes CO2-equivalent per year (Gt CO2e/yr)

use crate::errors::{GhgError, GhgResult};
use crate::{FloatValue, Year};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// A single year's row of input data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    pub year: Year,
    /// Natural gas production
    /// unit: bcf/yr
    pub production: FloatValue,
    /// Natural gas delivered to downstream consumers
    /// unit: bcf/yr
    pub downstream_consumption: FloatValue,
    /// Inventory estimate of natural gas system methane emissions
    /// unit: Gt CO2e/yr
    pub reported_methane: FloatValue,
    /// Net greenhouse-gas emissions (gross emissions less removals)
    /// unit: Gt CO2e/yr
    pub net_emissions: FloatValue,
}

/// Strictly increasing sequence of calendar years.
///
/// Every per-year array in an [`InputSeries`] is indexed by position in this
/// sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Year>", into = "Vec<Year>")]
pub struct YearSeries(Vec<Year>);

impl YearSeries {
    pub fn new(years: Vec<Year>) -> GhgResult<Self> {
        if let Some(pair) = years.windows(2).find(|w| w[1] <= w[0]) {
            return Err(GhgError::InputShape(format!(
                "years must be strictly increasing, found {} followed by {}",
                pair[0], pair[1]
            )));
        }
        Ok(Self(years))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn values(&self) -> &[Year] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = Year> + '_ {
        self.0.iter().copied()
    }

    /// Position of `year` in the series
    pub fn index_of(&self, year: Year) -> Option<usize> {
        self.0.binary_search(&year).ok()
    }

    /// The most recent year in the series
    pub fn last(&self) -> Option<Year> {
        self.0.last().copied()
    }
}

impl TryFrom<Vec<Year>> for YearSeries {
    type Error = GhgError;

    fn try_from(value: Vec<Year>) -> Result<Self, Self::Error> {
        YearSeries::new(value)
    }
}

impl From<YearSeries> for Vec<Year> {
    fn from(value: YearSeries) -> Self {
        value.0
    }
}

/// Measured inputs for every year of the analysis.
///
/// Immutable once constructed. All arrays have the same length as `years`.
/// Deserialise rows with [`InputRecord`] and use [`InputSeries::from_records`]
/// so that the shape checks run.
#[derive(Debug, Clone, Serialize)]
pub struct InputSeries {
    years: YearSeries,
    production: Array1<FloatValue>,
    downstream_consumption: Array1<FloatValue>,
    reported_methane: Array1<FloatValue>,
    net_emissions: Array1<FloatValue>,
}

impl InputSeries {
    /// Create an input series from column arrays.
    ///
    /// Fails with [`GhgError::InputShape`] if any column's length differs from
    /// the number of years.
    pub fn new(
        years: YearSeries,
        production: Array1<FloatValue>,
        downstream_consumption: Array1<FloatValue>,
        reported_methane: Array1<FloatValue>,
        net_emissions: Array1<FloatValue>,
    ) -> GhgResult<Self> {
        let columns = [
            ("production", production.len()),
            ("downstream_consumption", downstream_consumption.len()),
            ("reported_methane", reported_methane.len()),
            ("net_emissions", net_emissions.len()),
        ];
        for (name, len) in columns {
            if len != years.len() {
                return Err(GhgError::InputShape(format!(
                    "column '{}' has {} values but there are {} years",
                    name,
                    len,
                    years.len()
                )));
            }
        }

        Ok(Self {
            years,
            production,
            downstream_consumption,
            reported_methane,
            net_emissions,
        })
    }

    /// Create an input series from per-year rows.
    ///
    /// Rows must already be ordered by year.
    pub fn from_records(records: &[InputRecord]) -> GhgResult<Self> {
        let years = YearSeries::new(records.iter().map(|r| r.year).collect())?;
        let column = |f: fn(&InputRecord) -> FloatValue| -> Array1<FloatValue> {
            records.iter().map(f).collect()
        };

        Self::new(
            years,
            column(|r| r.production),
            column(|r| r.downstream_consumption),
            column(|r| r.reported_methane),
            column(|r| r.net_emissions),
        )
    }

    pub fn years(&self) -> &YearSeries {
        &self.years
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    pub fn production(&self) -> &Array1<FloatValue> {
        &self.production
    }

    pub fn downstream_consumption(&self) -> &Array1<FloatValue> {
        &self.downstream_consumption
    }

    pub fn reported_methane(&self) -> &Array1<FloatValue> {
        &self.reported_methane
    }

    pub fn net_emissions(&self) -> &Array1<FloatValue> {
        &self.net_emissions
    }

    /// Row for a single year, if present
    pub fn record(&self, year: Year) -> Option<InputRecord> {
        self.years.index_of(year).map(|i| InputRecord {
            year,
            production: self.production[i],
            downstream_consumption: self.downstream_consumption[i],
            reported_methane: self.reported_methane[i],
            net_emissions: self.net_emissions[i],
        })
    }
}
