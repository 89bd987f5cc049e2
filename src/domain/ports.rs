use crate::domain::model::{AnalysisReport, RawItem};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Where the raw posts come from. Built fresh for every run.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSpec {
    File(FileRequest),
    Api(ApiRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldNames {
    pub id: Vec<String>,
    pub text: Vec<String>,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            id: vec!["id_str".to_string(), "id".to_string()],
            text: vec!["full_text".to_string(), "text".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileRequest {
    pub path: String,
    pub fields: FieldNames,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub endpoint: String,
    pub subject: String,
    pub max_items: u32,
    pub exclude_replies: bool,
    pub include_reposts: bool,
    pub timeout_seconds: u64,
    pub fields: FieldNames,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    pub const NAMES: [&'static str; 2] = ["json", "csv"];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "json" => Some(OutputFormat::Json),
            "csv" => Some(OutputFormat::Csv),
            _ => None,
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn source(&self) -> SourceSpec;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> Vec<OutputFormat>;
    fn reference_grade(&self) -> f64;
    /// Archive name when outputs should be bundled into one zip.
    fn zip_filename(&self) -> Option<&str>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<RawItem>>;
    async fn transform(&self, data: Vec<RawItem>) -> Result<AnalysisReport>;
    async fn load(&self, report: AnalysisReport) -> Result<String>;
}
