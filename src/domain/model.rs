use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One post as delivered by a source, before any cleaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    pub id: String,
    pub text: String,
}

impl RawItem {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub id: String,
    pub text: String,
    pub grade: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedItem {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatistics {
    pub count: usize,
    /// Floor of the smallest score.
    pub min: i64,
    /// Ceiling of the largest score.
    pub max: i64,
    pub median: f64,
    pub samp_mean: f64,
    pub samp_std_dev: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: BTreeMap<i64, u32>,
    pub ideal: BTreeMap<i64, f64>,
}

impl Histogram {
    pub fn total(&self) -> u64 {
        self.bins.values().map(|&c| u64::from(c)).sum()
    }
}

/// What the caller ended up with after fitting: either both curves, or the observed bins
/// alone when the scores have no spread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistogramOutcome {
    Fitted(Histogram),
    Degenerate {
        bins: BTreeMap<i64, u32>,
        std_dev: f64,
    },
}

impl HistogramOutcome {
    pub fn bins(&self) -> &BTreeMap<i64, u32> {
        match self {
            HistogramOutcome::Fitted(histogram) => &histogram.bins,
            HistogramOutcome::Degenerate { bins, .. } => bins,
        }
    }

    pub fn ideal(&self) -> Option<&BTreeMap<i64, f64>> {
        match self {
            HistogramOutcome::Fitted(histogram) => Some(&histogram.ideal),
            HistogramOutcome::Degenerate { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeComparison {
    pub reference_grade: f64,
    pub median_at_or_below: bool,
    /// Fraction of scored items whose grade is at or below the reference.
    pub share_at_or_below: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub subject: Option<String>,
    pub items: Vec<ScoredItem>,
    pub skipped: Vec<SkippedItem>,
    pub stats: BatchStatistics,
    pub histogram: HistogramOutcome,
    pub comparison: GradeComparison,
}
