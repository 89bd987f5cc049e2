pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalStorage, CliConfig};

pub use app::pipelines::GradePipeline;
pub use crate::core::{engine::GradeEngine, etl::EtlEngine};
pub use domain::model::{
    AnalysisReport, BatchStatistics, Histogram, HistogramOutcome, RawItem, ScoredItem,
};
pub use utils::error::{GradeError, Result};
