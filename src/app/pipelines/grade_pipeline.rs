use crate::adapters::api_source::ApiSource;
use crate::adapters::file_source::FileSource;
use crate::core::engine::GradeEngine;
use crate::core::{AnalysisReport, ConfigProvider, Pipeline, RawItem, Storage};
use crate::domain::ports::{OutputFormat, SourceSpec};
use crate::utils::error::{GradeError, Result};
use std::io::Write;
use std::path::Path;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const REPORT_FILE: &str = "report.json";
pub const ITEMS_FILE: &str = "items.csv";

pub struct GradePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    api: ApiSource,
}

impl<S: Storage, C: ConfigProvider> GradePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            api: ApiSource::default(),
        }
    }

    fn output_file(&self, name: &str) -> String {
        Path::new(self.config.output_path())
            .join(name)
            .to_string_lossy()
            .into_owned()
    }
}

/// `id,text,grade` table of the scored posts.
pub fn items_csv(report: &AnalysisReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["id", "text", "grade"])?;
    for item in &report.items {
        writer.write_record([
            item.id.as_str(),
            item.text.as_str(),
            item.grade.to_string().as_str(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| GradeError::IoError(e.into_error()))
}

fn render(report: &AnalysisReport, formats: &[OutputFormat]) -> Result<Vec<(&'static str, Vec<u8>)>> {
    let mut files = Vec::with_capacity(formats.len());
    for format in formats {
        match format {
            OutputFormat::Json => files.push((REPORT_FILE, serde_json::to_vec_pretty(report)?)),
            OutputFormat::Csv => files.push((ITEMS_FILE, items_csv(report)?)),
        }
    }
    Ok(files)
}

fn zip_files(files: &[(&str, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file(*name, SimpleFileOptions::default())?;
        zip.write_all(data)?;
    }
    // 完成並取回底層 Vec<u8>
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for GradePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<RawItem>> {
        match self.config.source() {
            SourceSpec::File(request) => FileSource::new(&self.storage).fetch(&request).await,
            SourceSpec::Api(request) => self.api.fetch(&request).await,
        }
    }

    async fn transform(&self, data: Vec<RawItem>) -> Result<AnalysisReport> {
        let mut engine = GradeEngine::new(self.config.reference_grade());
        if let SourceSpec::Api(request) = self.config.source() {
            engine = engine.with_subject(request.subject);
        }
        engine.analyze(&data)
    }

    async fn load(&self, report: AnalysisReport) -> Result<String> {
        let files = render(&report, &self.config.output_formats())?;

        if let Some(archive) = self.config.zip_filename() {
            tracing::debug!("Creating ZIP file with {} files", files.len());
            let zip_data = zip_files(&files)?;
            let path = self.output_file(archive);
            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(&path, &zip_data).await?;
            return Ok(path);
        }

        for (name, data) in &files {
            let path = self.output_file(name);
            tracing::debug!("Writing {} ({} bytes)", path, data.len());
            self.storage.write_file(&path, data).await?;
        }
        Ok(self.config.output_path().to_string())
    }
}
