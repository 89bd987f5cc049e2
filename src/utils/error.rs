use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GradeError {
    #[error("Item '{id}' has no scoreable text")]
    UnscoreableItem { id: String },

    #[error("Not enough scoreable posts: found {count}, need at least 2")]
    InsufficientSample { count: usize },

    #[error("Degenerate distribution: sample standard deviation is {std_dev}")]
    DegenerateDistribution { std_dev: f64 },

    #[error("Subject '{subject}' does not exist")]
    SubjectNotFound { subject: String },

    #[error("Rate limited while fetching '{subject}'")]
    RateLimited {
        subject: String,
        reset_at: Option<DateTime<Utc>>,
    },

    #[error("Access to '{subject}' was revoked")]
    AccessRevoked { subject: String },

    #[error("Upstream returned HTTP {status}")]
    UpstreamStatus { status: u16 },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Analysis,
    Upstream,
    Io,
    Configuration,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GradeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GradeError::UnscoreableItem { .. }
            | GradeError::InsufficientSample { .. }
            | GradeError::DegenerateDistribution { .. } => ErrorCategory::Analysis,
            GradeError::SubjectNotFound { .. }
            | GradeError::RateLimited { .. }
            | GradeError::AccessRevoked { .. }
            | GradeError::UpstreamStatus { .. }
            | GradeError::ApiError(_) => ErrorCategory::Upstream,
            GradeError::ZipError(_)
            | GradeError::CsvError(_)
            | GradeError::IoError(_)
            | GradeError::SerializationError(_) => ErrorCategory::Io,
            GradeError::ConfigError { .. }
            | GradeError::MissingConfigError { .. }
            | GradeError::InvalidConfigValueError { .. }
            | GradeError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            GradeError::ProcessingError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單筆或分佈退化：呼叫端可以降級處理
            GradeError::UnscoreableItem { .. } | GradeError::DegenerateDistribution { .. } => {
                ErrorSeverity::Low
            }
            // 稍後重試可能成功
            GradeError::RateLimited { .. }
            | GradeError::UpstreamStatus { .. }
            | GradeError::ApiError(_) => ErrorSeverity::Medium,
            GradeError::InsufficientSample { .. }
            | GradeError::SubjectNotFound { .. }
            | GradeError::AccessRevoked { .. }
            | GradeError::CsvError(_)
            | GradeError::SerializationError(_)
            | GradeError::ConfigError { .. }
            | GradeError::MissingConfigError { .. }
            | GradeError::InvalidConfigValueError { .. }
            | GradeError::ConfigValidationError { .. } => ErrorSeverity::High,
            GradeError::ZipError(_)
            | GradeError::IoError(_)
            | GradeError::ProcessingError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GradeError::InsufficientSample { count } => format!(
                "Only {} post(s) had readable text; at least 2 are needed to build a grade distribution",
                count
            ),
            GradeError::SubjectNotFound { subject } => format!("{} doesn't exist", subject),
            GradeError::AccessRevoked { subject } => format!("{} was suspended", subject),
            GradeError::RateLimited {
                reset_at: Some(reset_at),
                ..
            } => format!(
                "Too many requests right now, try again after {}",
                reset_at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            GradeError::RateLimited { reset_at: None, .. } => {
                "Too many requests right now, try again later".to_string()
            }
            GradeError::DegenerateDistribution { .. } => {
                "Every post scored the same grade, so no reference curve can be drawn".to_string()
            }
            other => other.to_string(),
        }
    }

    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Analysis => "Try a subject with more text-heavy posts",
            ErrorCategory::Upstream => match self {
                GradeError::RateLimited { .. } => "Wait for the rate limit window to reset",
                GradeError::SubjectNotFound { .. } => "Check the spelling of the subject name",
                _ => "Check the API endpoint and network connectivity",
            },
            ErrorCategory::Io => "Check that the input file exists and the output path is writable",
            ErrorCategory::Configuration => "Review the configuration values and try again",
            ErrorCategory::Internal => "Please report this as a bug with the input that caused it",
        }
    }
}

pub type Result<T> = std::result::Result<T, GradeError>;
