use crate::core::aggregator::aggregate;
use crate::core::histogram::HistogramFitter;
use crate::core::normalizer::normalize;
use crate::core::scorer::score;
use crate::domain::model::{
    AnalysisReport, BatchStatistics, GradeComparison, HistogramOutcome, RawItem, ScoredItem,
    SkippedItem,
};
use crate::utils::error::{GradeError, Result};

/// Textbook fifth-grade reading level.
pub const FIFTH_GRADE: f64 = 5.0;

/// Runs normalize → score → aggregate → fit over one batch.
///
/// Holds only per-run, read-only parameters; build one per request.
#[derive(Debug, Clone)]
pub struct GradeEngine {
    reference_grade: f64,
    subject: Option<String>,
}

impl Default for GradeEngine {
    fn default() -> Self {
        Self::new(FIFTH_GRADE)
    }
}

impl GradeEngine {
    pub fn new(reference_grade: f64) -> Self {
        Self {
            reference_grade,
            subject: None,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn analyze(&self, raw_items: &[RawItem]) -> Result<AnalysisReport> {
        let (items, skipped) = Self::score_items(raw_items);
        let scores: Vec<f64> = items.iter().map(|item| item.grade).collect();

        tracing::debug!(
            "Scored {} of {} items ({} skipped)",
            items.len(),
            raw_items.len(),
            skipped.len()
        );

        let stats = aggregate(&scores)?;
        let histogram = match HistogramFitter::fit(&stats, &scores) {
            Ok(histogram) => HistogramOutcome::Fitted(histogram),
            Err(GradeError::DegenerateDistribution { std_dev }) => {
                tracing::warn!(
                    "All {} scores are identical, reporting observed bins without a reference curve",
                    stats.count
                );
                HistogramOutcome::Degenerate {
                    bins: HistogramFitter::observe(&stats, &scores)?,
                    std_dev,
                }
            }
            Err(e) => return Err(e),
        };
        let comparison = self.compare(&stats, &scores);

        Ok(AnalysisReport {
            subject: self.subject.clone(),
            items,
            skipped,
            stats,
            histogram,
            comparison,
        })
    }

    /// Unscoreable items are set aside with their reason instead of failing the batch.
    pub fn score_items(raw_items: &[RawItem]) -> (Vec<ScoredItem>, Vec<SkippedItem>) {
        let mut items = Vec::with_capacity(raw_items.len());
        let mut skipped = Vec::new();

        for raw in raw_items {
            let text = normalize(&raw.text);
            match score(&raw.id, &text) {
                Ok(grade) => items.push(ScoredItem {
                    id: raw.id.clone(),
                    text,
                    grade,
                }),
                Err(e) => {
                    tracing::debug!("Skipping item {}: {}", raw.id, e);
                    skipped.push(SkippedItem {
                        id: raw.id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        (items, skipped)
    }

    fn compare(&self, stats: &BatchStatistics, scores: &[f64]) -> GradeComparison {
        let at_or_below = scores
            .iter()
            .filter(|&&grade| grade <= self.reference_grade)
            .count();
        GradeComparison {
            reference_grade: self.reference_grade,
            median_at_or_below: stats.median <= self.reference_grade,
            share_at_or_below: at_or_below as f64 / stats.count as f64,
        }
    }
}
