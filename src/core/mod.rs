pub mod aggregator;
pub mod engine;
pub mod etl;
pub mod histogram;
pub mod normalizer;
pub mod scorer;

pub use crate::domain::model::{AnalysisReport, RawItem};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
