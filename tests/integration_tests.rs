use anyhow::Result;
use grade_stats::config::toml_config::TomlConfig;
use grade_stats::{AnalysisReport, CliConfig, EtlEngine, GradeError, GradePipeline, LocalStorage};
use httpmock::prelude::*;
use tempfile::TempDir;

fn cli_config(output_path: &str) -> CliConfig {
    CliConfig {
        input: None,
        api_endpoint: None,
        subject: None,
        max_items: 200,
        timeout_seconds: 10,
        output_path: output_path.to_string(),
        formats: vec!["json".to_string(), "csv".to_string()],
        reference_grade: 5.0,
        zip: None,
        verbose: false,
        json_logs: false,
    }
}

#[tokio::test]
async fn test_end_to_end_from_json_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("posts.json");
    std::fs::write(
        &input,
        serde_json::to_vec(&serde_json::json!([
            {"id_str": "1", "full_text": "Visit https://x.com today! #fun"},
            {"id_str": "2", "full_text": "Hello @bob World"},
            {"id_str": "3", "full_text": "The committee deliberated extensively\nNobody agreed."},
            {"id_str": "4", "full_text": "#justtags #nothingelse"}
        ]))?,
    )?;
    let output = temp_dir.path().join("out");

    let mut config = cli_config(output.to_str().unwrap());
    config.input = Some(input.to_str().unwrap().to_string());

    let pipeline = GradePipeline::new(LocalStorage::new("."), config);
    let output_path = EtlEngine::new(pipeline).run().await?;
    assert_eq!(output_path, output.to_str().unwrap());

    let report: AnalysisReport =
        serde_json::from_slice(&std::fs::read(output.join("report.json"))?)?;
    assert_eq!(report.stats.count, 3);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].id, "4");
    assert_eq!(report.items[0].text, "Visit today!.");
    assert_eq!(report.items[1].text, "Hello World.");
    assert_eq!(
        report.items[2].text,
        "The committee deliberated extensively. Nobody agreed."
    );
    let total: u32 = report.histogram.bins().values().sum();
    assert_eq!(total as usize, report.stats.count);

    let csv = std::fs::read_to_string(output.join("items.csv"))?;
    assert!(csv.starts_with("id,text,grade\n"));
    assert_eq!(csv.lines().count(), 4);
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_from_api() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output = temp_dir.path().join("out");

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/statuses/user_timeline")
            .query_param("screen_name", "reader");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!([
                {"id_str": "100", "full_text": "Short words win."},
                {"id_str": "101", "full_text": "Sophisticated terminology occasionally impedes comprehension."},
                {"id_str": "102", "full_text": "I like to read &amp; write."}
            ]));
    });

    let mut config = cli_config(output.to_str().unwrap());
    config.api_endpoint = Some(server.url("/statuses/user_timeline"));
    config.subject = Some("reader".to_string());
    config.zip = Some("grades.zip".to_string());

    let pipeline = GradePipeline::new(LocalStorage::new("."), config);
    let output_path = EtlEngine::new(pipeline).run().await?;

    api_mock.assert();
    assert!(output_path.ends_with("grades.zip"));

    let zip_data = std::fs::read(output.join("grades.zip"))?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    let mut report_json = String::new();
    std::io::Read::read_to_string(&mut archive.by_name("report.json")?, &mut report_json)?;

    let report: AnalysisReport = serde_json::from_str(&report_json)?;
    assert_eq!(report.subject.as_deref(), Some("reader"));
    assert_eq!(report.stats.count, 3);
    assert_eq!(report.items[2].text, "I like to read & write.");
    Ok(())
}

#[tokio::test]
async fn test_api_rate_limit_surfaces_without_output() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let output = temp_dir.path().join("out");

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/timeline");
        then.status(429).header("x-rate-limit-reset", "1700000900");
    });

    let mut config = cli_config(output.to_str().unwrap());
    config.api_endpoint = Some(server.url("/timeline"));
    config.subject = Some("busy".to_string());

    let pipeline = GradePipeline::new(LocalStorage::new("."), config);
    let err = EtlEngine::new(pipeline).run().await.unwrap_err();

    api_mock.assert_hits(1);
    assert!(matches!(err, GradeError::RateLimited { .. }));
    assert!(err.user_friendly_message().contains("try again after"));
    assert_eq!(err.exit_code(), 2);
    assert!(!output.exists());
    Ok(())
}

#[tokio::test]
async fn test_too_few_posts_is_reported_with_count() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("posts.csv");
    std::fs::write(&input, "id,text\n1,Only one readable post.\n2,https://t.co/abc\n")?;

    let mut config = cli_config(temp_dir.path().join("out").to_str().unwrap());
    config.input = Some(input.to_str().unwrap().to_string());

    let pipeline = GradePipeline::new(LocalStorage::new("."), config);
    let err = EtlEngine::new(pipeline).run().await.unwrap_err();

    assert!(matches!(err, GradeError::InsufficientSample { count: 1 }));
    assert!(err.user_friendly_message().contains("Only 1 post"));
    Ok(())
}

#[tokio::test]
async fn test_toml_config_drives_pipeline() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let input = temp_dir.path().join("posts.csv");
    std::fs::write(
        &input,
        "post,body\na,\"Cats nap. Dogs run.\"\nb,\"Remarkable architectural achievements impress visitors.\"\n",
    )?;
    let output = temp_dir.path().join("out");

    let toml_content = format!(
        r#"
[pipeline]
name = "toml-test"

[source]
type = "file"
path = "{}"

[source.fields]
id = ["post"]
text = ["body"]

[analysis]
reference_grade = 6.0

[load]
output_path = "{}"
output_formats = ["json"]
"#,
        input.to_str().unwrap(),
        output.to_str().unwrap()
    );
    let config = TomlConfig::from_toml_str(&toml_content)?;

    let pipeline = GradePipeline::new(LocalStorage::new("."), config);
    EtlEngine::new(pipeline).run().await?;

    let report: AnalysisReport =
        serde_json::from_slice(&std::fs::read(output.join("report.json"))?)?;
    let ids: Vec<&str> = report.items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert_eq!(report.comparison.reference_grade, 6.0);
    assert!(!output.join("items.csv").exists());
    Ok(())
}
