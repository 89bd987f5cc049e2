use crate::domain::model::BatchStatistics;
use crate::utils::error::{GradeError, Result};
use statrs::statistics::Statistics;

pub const MIN_SAMPLE: usize = 2;

/// Summary statistics over one batch of grade scores.
///
/// Standard deviation is the sample estimate (divides by `n - 1`). Batches smaller than
/// [`MIN_SAMPLE`] are rejected since the sample variance is undefined for them.
pub fn aggregate(scores: &[f64]) -> Result<BatchStatistics> {
    let count = scores.len();
    if count < MIN_SAMPLE {
        return Err(GradeError::InsufficientSample { count });
    }

    let mut sorted = scores.to_vec();
    sorted.sort_by(f64::total_cmp);

    let first = sorted[0];
    let last = sorted[count - 1];
    let median = if count % 2 == 0 {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    } else {
        sorted[count / 2]
    };

    let mean = sorted.iter().mean();
    let sum_sq: f64 = sorted.iter().map(|x| (x - mean).powi(2)).sum();

    Ok(BatchStatistics {
        count,
        min: first.floor() as i64,
        max: last.ceil() as i64,
        median,
        samp_mean: mean,
        // two-pass so a batch of identical scores yields exactly zero
        samp_std_dev: (sum_sq / (count - 1) as f64).sqrt(),
    })
}
