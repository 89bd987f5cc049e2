use crate::core::Pipeline;
use crate::domain::model::HistogramOutcome;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting grade analysis...");

        // Extract
        tracing::info!("Fetching posts...");
        let raw_items = self.pipeline.extract().await?;
        tracing::info!("Fetched {} posts", raw_items.len());

        // Transform
        tracing::info!("Scoring posts...");
        let report = self.pipeline.transform(raw_items).await?;
        tracing::info!(
            "Scored {} posts (skipped {}), mean grade {:.2}, median {:.2}",
            report.stats.count,
            report.skipped.len(),
            report.stats.samp_mean,
            report.stats.median
        );
        tracing::info!(
            "Median at or below grade {}: {} ({:.0}% of posts)",
            report.comparison.reference_grade,
            if report.comparison.median_at_or_below { "yes" } else { "no" },
            report.comparison.share_at_or_below * 100.0
        );
        if let HistogramOutcome::Degenerate { .. } = report.histogram {
            tracing::info!("Reference curve omitted: every post has the same grade");
        }

        // Load
        tracing::info!("Writing report...");
        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
