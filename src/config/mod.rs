#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use crate::core::engine::FIFTH_GRADE;
    use crate::core::ConfigProvider;
    use crate::domain::ports::{ApiRequest, FieldNames, FileRequest, OutputFormat, SourceSpec};
    use crate::utils::error::{GradeError, Result};
    use crate::utils::validation::{
        validate_file_extension, validate_non_empty_string, validate_output_formats,
        validate_path, validate_positive_number, validate_range, validate_url, Validate,
    };
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "grade-stats")]
    #[command(about = "Score the reading grade of a subject's posts against a fifth-grade reference")]
    pub struct CliConfig {
        /// Local JSON or CSV file with posts
        #[arg(long, conflicts_with = "api_endpoint")]
        pub input: Option<String>,

        /// Timeline endpoint returning a JSON array of posts
        #[arg(long, requires = "subject")]
        pub api_endpoint: Option<String>,

        /// Screen name whose posts are fetched
        #[arg(long)]
        pub subject: Option<String>,

        #[arg(long, default_value = "200")]
        pub max_items: u32,

        #[arg(long, default_value = "30")]
        pub timeout_seconds: u64,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        #[arg(long, value_delimiter = ',', default_values = ["json", "csv"])]
        pub formats: Vec<String>,

        #[arg(long, default_value_t = FIFTH_GRADE)]
        pub reference_grade: f64,

        /// Bundle the outputs into one zip archive with this name
        #[arg(long)]
        pub zip: Option<String>,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,
    }

    impl ConfigProvider for CliConfig {
        fn source(&self) -> SourceSpec {
            match (&self.input, &self.api_endpoint) {
                (Some(path), _) => SourceSpec::File(FileRequest {
                    path: path.clone(),
                    fields: FieldNames::default(),
                }),
                (None, endpoint) => SourceSpec::Api(ApiRequest {
                    endpoint: endpoint.clone().unwrap_or_default(),
                    subject: self.subject.clone().unwrap_or_default(),
                    max_items: self.max_items,
                    exclude_replies: false,
                    include_reposts: false,
                    timeout_seconds: self.timeout_seconds,
                    fields: FieldNames::default(),
                }),
            }
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_formats(&self) -> Vec<OutputFormat> {
            self.formats
                .iter()
                .filter_map(|f| OutputFormat::parse(f))
                .collect()
        }

        fn reference_grade(&self) -> f64 {
            self.reference_grade
        }

        fn zip_filename(&self) -> Option<&str> {
            self.zip.as_deref()
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            match (&self.input, &self.api_endpoint) {
                (Some(path), _) => {
                    validate_path("input", path)?;
                    validate_file_extension("input", path, &["json", "csv"])?;
                }
                (None, Some(endpoint)) => {
                    validate_url("api_endpoint", endpoint)?;
                    validate_non_empty_string("subject", self.subject.as_deref().unwrap_or(""))?;
                    validate_positive_number("max_items", self.max_items as usize, 1)?;
                    validate_positive_number("timeout_seconds", self.timeout_seconds as usize, 1)?;
                }
                (None, None) => {
                    return Err(GradeError::ConfigError {
                        message: "either --input or --api-endpoint is required".to_string(),
                    })
                }
            }
            validate_path("output_path", &self.output_path)?;
            validate_output_formats("formats", &self.formats, &OutputFormat::NAMES)?;
            validate_range("reference_grade", self.reference_grade, 0.0, 20.0)?;
            if let Some(name) = &self.zip {
                validate_path("zip", name)?;
            }
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn parse(args: &[&str]) -> CliConfig {
            let mut argv = vec!["grade-stats"];
            argv.extend_from_slice(args);
            CliConfig::parse_from(argv)
        }

        #[test]
        fn test_file_source_from_flags() {
            let config = parse(&["--input", "posts.json"]);
            assert!(config.validate().is_ok());
            assert_eq!(
                config.source(),
                SourceSpec::File(FileRequest {
                    path: "posts.json".to_string(),
                    fields: FieldNames::default(),
                })
            );
            assert_eq!(
                config.output_formats(),
                vec![OutputFormat::Json, OutputFormat::Csv]
            );
            assert_eq!(config.reference_grade(), 5.0);
        }

        #[test]
        fn test_api_source_from_flags() {
            let config = parse(&[
                "--api-endpoint",
                "https://api.example.com/timeline",
                "--subject",
                "reader",
                "--max-items",
                "50",
            ]);
            assert!(config.validate().is_ok());
            match config.source() {
                SourceSpec::Api(request) => {
                    assert_eq!(request.subject, "reader");
                    assert_eq!(request.max_items, 50);
                    assert!(!request.include_reposts);
                }
                other => panic!("expected api source, got {:?}", other),
            }
        }

        #[test]
        fn test_missing_source_is_rejected() {
            let config = parse(&[]);
            assert!(matches!(
                config.validate(),
                Err(GradeError::ConfigError { .. })
            ));
        }

        #[test]
        fn test_zero_timeout_is_rejected() {
            let config = parse(&[
                "--api-endpoint",
                "https://api.example.com/timeline",
                "--subject",
                "reader",
                "--timeout-seconds",
                "0",
            ]);
            assert!(matches!(
                config.validate(),
                Err(GradeError::InvalidConfigValueError { .. })
            ));
        }

        #[test]
        fn test_bad_format_is_rejected() {
            let config = parse(&["--input", "posts.csv", "--formats", "json,html"]);
            assert!(config.validate().is_err());
        }
    }
}
