//! Summary statistics over the trial axis of simulated distributions.
//!
//! Quantiles use linear interpolation between closest ranks (Hyndman & Fan
//! type 7). For `n` sorted values and probability `p` the estimate is
//!
//! $$ q(p) = x_{\lfloor h \rfloor} + (h - \lfloor h \rfloor)(x_{\lfloor h \rfloor + 1} - x_{\lfloor h \rfloor}), \quad h = (n - 1) p $$
//!
//! Every interval reported by this workspace uses this estimator.

use crate::errors::{GhgError, GhgResult};
use crate::FloatValue;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Default two-sided confidence level of reported intervals
pub const DEFAULT_CONFIDENCE_LEVEL: FloatValue = 0.95;

/// Mean and central confidence interval of one distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryInterval {
    pub mean: FloatValue,
    /// Lower quantile, 0.025 at the default level
    pub lower: FloatValue,
    /// Upper quantile, 0.975 at the default level
    pub upper: FloatValue,
}

/// Per-lane summaries of a two-dimensional array.
///
/// Holds one entry per year (or sweep point) after reducing over trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub mean: Array1<FloatValue>,
    pub lower: Array1<FloatValue>,
    pub upper: Array1<FloatValue>,
}

impl DistributionSummary {
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// Summary of the lane at `index`
    pub fn get(&self, index: usize) -> Option<SummaryInterval> {
        (index < self.len()).then(|| SummaryInterval {
            mean: self.mean[index],
            lower: self.lower[index],
            upper: self.upper[index],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = SummaryInterval> + '_ {
        (0..self.len()).filter_map(|i| self.get(i))
    }
}

/// Quantile of already sorted values.
///
/// `sorted` must be non-empty and `p` lie in `[0, 1]`.
fn quantile_sorted(sorted: &[FloatValue], p: FloatValue) -> FloatValue {
    let h = (sorted.len() - 1) as FloatValue * p;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (h - lo as FloatValue) * (sorted[hi] - sorted[lo])
}

/// Quantile of `values` at probability `p`.
///
/// Returns NaN if any value is NaN.
pub fn quantile(values: ArrayView1<FloatValue>, p: FloatValue) -> GhgResult<FloatValue> {
    check_probability(p)?;
    if values.is_empty() {
        return Err(GhgError::Precondition(
            "cannot compute a quantile of zero trials".to_string(),
        ));
    }
    Ok(quantiles(values, &[p])[0])
}

fn quantiles(values: ArrayView1<FloatValue>, ps: &[FloatValue]) -> Vec<FloatValue> {
    if values.iter().any(|v| v.is_nan()) {
        return vec![FloatValue::NAN; ps.len()];
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(FloatValue::total_cmp);
    ps.iter().map(|&p| quantile_sorted(&sorted, p)).collect()
}

fn check_probability(p: FloatValue) -> GhgResult<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(GhgError::InvalidParameter(format!(
            "quantile probability must be within [0, 1], got {}",
            p
        )));
    }
    Ok(())
}

fn tail_probabilities(level: FloatValue) -> GhgResult<(FloatValue, FloatValue)> {
    if !(level > 0.0 && level < 1.0) {
        return Err(GhgError::InvalidParameter(format!(
            "confidence level must be within (0, 1), got {}",
            level
        )));
    }
    let tail = (1.0 - level) / 2.0;
    Ok((tail, 1.0 - tail))
}

/// Summarise a one-dimensional sample at the given confidence level.
pub fn summarize_samples_with_level(
    samples: ArrayView1<FloatValue>,
    level: FloatValue,
) -> GhgResult<SummaryInterval> {
    let (lo, hi) = tail_probabilities(level)?;
    if samples.is_empty() {
        return Err(GhgError::Precondition(
            "cannot summarise zero trials".to_string(),
        ));
    }

    let q = quantiles(samples, &[lo, hi]);
    Ok(SummaryInterval {
        mean: samples.sum() / samples.len() as FloatValue,
        lower: q[0],
        upper: q[1],
    })
}

/// Mean and 95% interval of a one-dimensional sample.
pub fn summarize_samples(samples: ArrayView1<FloatValue>) -> GhgResult<SummaryInterval> {
    summarize_samples_with_level(samples, DEFAULT_CONFIDENCE_LEVEL)
}

/// Reduce `array` along `axis` at the given confidence level.
///
/// The other axis is kept, giving one summary per lane.
pub fn summarize_with_level(
    array: ArrayView2<FloatValue>,
    axis: Axis,
    level: FloatValue,
) -> GhgResult<DistributionSummary> {
    tail_probabilities(level)?;
    if axis.index() > 1 {
        return Err(GhgError::InvalidParameter(format!(
            "axis {} out of bounds for a two-dimensional array",
            axis.index()
        )));
    }
    if array.len_of(axis) == 0 {
        return Err(GhgError::Precondition(format!(
            "cannot summarise over an empty axis {}",
            axis.index()
        )));
    }

    let n_lanes = array.len_of(Axis(1 - axis.index()));
    let mut mean = Array1::<FloatValue>::zeros(n_lanes);
    let mut lower = Array1::<FloatValue>::zeros(n_lanes);
    let mut upper = Array1::<FloatValue>::zeros(n_lanes);

    for (i, lane) in array.lanes(axis).into_iter().enumerate() {
        let summary = summarize_samples_with_level(lane, level)?;
        mean[i] = summary.mean;
        lower[i] = summary.lower;
        upper[i] = summary.upper;
    }

    let nan_lanes = mean.iter().filter(|m| m.is_nan()).count();
    if nan_lanes > 0 {
        warn!(
            lanes = nan_lanes,
            "NaN in simulated trials; check the input series"
        );
    }

    Ok(DistributionSummary { mean, lower, upper })
}

/// Mean and 95% interval along `axis`.
pub fn summarize(array: ArrayView2<FloatValue>, axis: Axis) -> GhgResult<DistributionSummary> {
    summarize_with_level(array, axis, DEFAULT_CONFIDENCE_LEVEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;
    use ndarray::{array, Array2};

    #[test]
    fn test_quantile_interpolates() {
        let values = array![4.0, 1.0, 3.0, 2.0, 5.0];
        assert!(is_close!(quantile(values.view(), 0.0).unwrap(), 1.0));
        assert!(is_close!(quantile(values.view(), 0.5).unwrap(), 3.0));
        assert!(is_close!(quantile(values.view(), 1.0).unwrap(), 5.0));
        // h = 4 * 0.025 = 0.1
        assert!(is_close!(quantile(values.view(), 0.025).unwrap(), 1.1));
        // h = 4 * 0.975 = 3.9
        assert!(is_close!(quantile(values.view(), 0.975).unwrap(), 4.9));
    }

    #[test]
    fn test_quantile_rejects_bad_probability() {
        let values = array![1.0, 2.0];
        assert!(matches!(
            quantile(values.view(), 1.5),
            Err(GhgError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_nan_propagates() {
        let values = array![1.0, FloatValue::NAN, 3.0];
        let summary = summarize_samples(values.view()).unwrap();
        assert!(summary.mean.is_nan());
        assert!(summary.lower.is_nan());
        assert!(summary.upper.is_nan());
    }

    #[test]
    fn test_single_trial() {
        let values = array![[7.5], [2.0]];
        let summary = summarize(values.view(), Axis(1)).unwrap();

        assert_eq!(summary.mean, array![7.5, 2.0]);
        assert_eq!(summary.lower, array![7.5, 2.0]);
        assert_eq!(summary.upper, array![7.5, 2.0]);
    }

    #[test]
    fn test_zero_trials() {
        let values = Array2::<FloatValue>::zeros((3, 0));
        assert!(matches!(
            summarize(values.view(), Axis(1)),
            Err(GhgError::Precondition(_))
        ));
        assert!(matches!(
            summarize_samples(Array1::<FloatValue>::zeros(0).view()),
            Err(GhgError::Precondition(_))
        ));
    }

    #[test]
    fn test_summarize_keeps_other_axis() {
        let values = Array2::from_shape_fn((2, 101), |(i, j)| (i * 1000 + j) as FloatValue);
        let summary = summarize(values.view(), Axis(1)).unwrap();

        assert_eq!(summary.len(), 2);
        assert!(is_close!(summary.mean[0], 50.0));
        assert!(is_close!(summary.lower[0], 2.5));
        assert!(is_close!(summary.upper[0], 97.5));
        assert!(is_close!(summary.mean[1], 1050.0));

        let by_column = summarize(values.view(), Axis(0)).unwrap();
        assert_eq!(by_column.len(), 101);
        assert!(is_close!(by_column.mean[0], 500.0));
    }

    #[test]
    fn test_interval_brackets_mean() {
        let values = Array2::from_shape_fn((4, 50), |(i, j)| ((i + 1) * j * j) as FloatValue);
        let summary = summarize(values.view(), Axis(1)).unwrap();

        for s in summary.iter() {
            assert!(s.lower <= s.mean && s.mean <= s.upper);
        }
    }

    #[test]
    fn test_custom_level() {
        let values = Array1::range(0.0, 11.0, 1.0);
        let summary = summarize_samples_with_level(values.view(), 0.8).unwrap();
        assert!(is_close!(summary.lower, 1.0));
        assert!(is_close!(summary.upper, 9.0));

        assert!(summarize_samples_with_level(values.view(), 1.0).is_err());
        assert!(summarize_samples_with_level(values.view(), 0.0).is_err());
    }
}
