use crate::core::engine::FIFTH_GRADE;
use crate::core::ConfigProvider;
use crate::domain::ports::{ApiRequest, FieldNames, FileRequest, OutputFormat, SourceSpec};
use crate::utils::error::{GradeError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static RE_ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern compiles"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    pub source: SourceConfig,
    pub analysis: Option<AnalysisConfig>,
    pub load: LoadConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    File,
    Api,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub r#type: SourceType,
    pub path: Option<String>,
    pub endpoint: Option<String>,
    pub subject: Option<String>,
    pub max_items: Option<u32>,
    pub exclude_replies: Option<bool>,
    pub include_reposts: Option<bool>,
    pub timeout_seconds: Option<u64>,
    pub fields: Option<FieldsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldsConfig {
    pub id: Option<Vec<String>>,
    pub text: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub reference_grade: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub compression: Option<CompressionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| GradeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_ENDPOINT})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        RE_ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    fn field_names(&self) -> FieldNames {
        let defaults = FieldNames::default();
        match &self.source.fields {
            Some(fields) => FieldNames {
                id: fields.id.clone().unwrap_or(defaults.id),
                text: fields.text.clone().unwrap_or(defaults.text),
            },
            None => defaults,
        }
    }

    pub fn json_logs(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.json)
            .unwrap_or(false)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        match self.source.r#type {
            SourceType::File => {
                let path = validation::validate_required_field("source.path", &self.source.path)?;
                validation::validate_path("source.path", path)?;
                validation::validate_file_extension("source.path", path, &["json", "csv"])?;
            }
            SourceType::Api => {
                let endpoint =
                    validation::validate_required_field("source.endpoint", &self.source.endpoint)?;
                validation::validate_url("source.endpoint", endpoint)?;
                let subject =
                    validation::validate_required_field("source.subject", &self.source.subject)?;
                validation::validate_non_empty_string("source.subject", subject)?;
                if let Some(max_items) = self.source.max_items {
                    validation::validate_positive_number("source.max_items", max_items as usize, 1)?;
                }
                if let Some(timeout) = self.source.timeout_seconds {
                    validation::validate_positive_number(
                        "source.timeout_seconds",
                        timeout as usize,
                        1,
                    )?;
                }
            }
        }

        let fields = self.field_names();
        if fields.text.is_empty() {
            return Err(GradeError::ConfigValidationError {
                field: "source.fields.text".to_string(),
                message: "at least one text field name is required".to_string(),
            });
        }

        validation::validate_path("load.output_path", &self.load.output_path)?;
        validation::validate_output_formats(
            "load.output_formats",
            &self.load.output_formats,
            &OutputFormat::NAMES,
        )?;
        validation::validate_range("analysis.reference_grade", self.reference_grade(), 0.0, 20.0)?;

        if let Some(compression) = &self.load.compression {
            if compression.enabled {
                validation::validate_non_empty_string(
                    "load.compression.filename",
                    &compression.filename,
                )?;
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn source(&self) -> SourceSpec {
        let fields = self.field_names();
        match self.source.r#type {
            SourceType::File => SourceSpec::File(FileRequest {
                path: self.source.path.clone().unwrap_or_default(),
                fields,
            }),
            SourceType::Api => SourceSpec::Api(ApiRequest {
                endpoint: self.source.endpoint.clone().unwrap_or_default(),
                subject: self.source.subject.clone().unwrap_or_default(),
                max_items: self.source.max_items.unwrap_or(200),
                exclude_replies: self.source.exclude_replies.unwrap_or(false),
                include_reposts: self.source.include_reposts.unwrap_or(false),
                timeout_seconds: self.source.timeout_seconds.unwrap_or(30),
                fields,
            }),
        }
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn output_formats(&self) -> Vec<OutputFormat> {
        self.load
            .output_formats
            .iter()
            .filter_map(|f| OutputFormat::parse(f))
            .collect()
    }

    fn reference_grade(&self) -> f64 {
        self.analysis
            .as_ref()
            .and_then(|a| a.reference_grade)
            .unwrap_or(FIFTH_GRADE)
    }

    fn zip_filename(&self) -> Option<&str> {
        self.load
            .compression
            .as_ref()
            .filter(|c| c.enabled)
            .map(|c| c.filename.as_str())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
