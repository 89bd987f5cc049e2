//! Integer-grade histogram with a Gaussian reference curve.

use crate::domain::model::{BatchStatistics, Histogram};
use crate::utils::error::{GradeError, Result};
use statrs::distribution::{Continuous, Normal};
use std::collections::BTreeMap;

pub struct HistogramFitter;

impl HistogramFitter {
    /// Observed bins plus the expected count per bin under `N(mean, sd)` scaled by the
    /// batch size. Fails with `DegenerateDistribution` when the scores have no spread.
    pub fn fit(stats: &BatchStatistics, scores: &[f64]) -> Result<Histogram> {
        let bins = Self::observe(stats, scores)?;

        let sigma = stats.samp_std_dev;
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(GradeError::DegenerateDistribution { std_dev: sigma });
        }

        let normal = Normal::new(stats.samp_mean, sigma).map_err(|e| GradeError::ProcessingError {
            message: format!("cannot build reference curve: {}", e),
        })?;
        let count = stats.count as f64;
        let ideal = bins
            .keys()
            .map(|&grade| (grade, normal.pdf(grade as f64) * count))
            .collect();

        Ok(Histogram { bins, ideal })
    }

    /// Counts of `floor(score)` over the contiguous range starting at `stats.min`.
    pub fn observe(stats: &BatchStatistics, scores: &[f64]) -> Result<BTreeMap<i64, u32>> {
        let end = Self::range_end(stats, scores);
        let mut bins: BTreeMap<i64, u32> = (stats.min..end).map(|grade| (grade, 0)).collect();

        for &score in scores {
            let grade = score.floor() as i64;
            match bins.get_mut(&grade) {
                Some(count) => *count += 1,
                None => {
                    return Err(GradeError::ProcessingError {
                        message: format!(
                            "score {} falls outside bin range [{}, {})",
                            score, stats.min, end
                        ),
                    })
                }
            }
        }

        Ok(bins)
    }

    /// `stats.max` is the ceiling of the largest score, which equals the largest score
    /// itself when that is a whole number; the range is widened by one so it still gets
    /// a bin.
    fn range_end(stats: &BatchStatistics, scores: &[f64]) -> i64 {
        scores
            .iter()
            .copied()
            .reduce(f64::max)
            .map(|top| stats.max.max(top.floor() as i64 + 1))
            .unwrap_or(stats.max)
    }
}
