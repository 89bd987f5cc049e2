pub mod grade_pipeline;

pub use grade_pipeline::GradePipeline;
