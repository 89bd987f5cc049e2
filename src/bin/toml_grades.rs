use clap::Parser;
use grade_stats::config::toml_config::{AnalysisConfig, TomlConfig};
use grade_stats::core::ConfigProvider;
use grade_stats::domain::ports::SourceSpec;
use grade_stats::utils::{logger, validation::Validate};
use grade_stats::{EtlEngine, GradePipeline, LocalStorage};

#[derive(Parser)]
#[command(name = "toml-grades")]
#[command(about = "Grade report driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "grade-stats.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the reference grade from config
    #[arg(long)]
    reference_grade: Option<f64>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    if config.json_logs() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(grade) = args.reference_grade {
        config
            .analysis
            .get_or_insert(AnalysisConfig {
                reference_grade: None,
            })
            .reference_grade = Some(grade);
        tracing::info!("🔧 Reference grade overridden to: {}", grade);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        return Ok(());
    }

    let storage = LocalStorage::new(".");
    let pipeline = GradePipeline::new(storage, config);
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Grade report completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Grade analysis failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Pipeline: {}", config.pipeline.name);
    if let Some(description) = &config.pipeline.description {
        println!("  Description: {}", description);
    }

    match config.source() {
        SourceSpec::File(request) => println!("  Source: file {}", request.path),
        SourceSpec::Api(request) => {
            println!("  Source: {} (subject: {})", request.endpoint, request.subject);
            println!("  Max Items: {}", request.max_items);
            println!("  Include Reposts: {}", request.include_reposts);
        }
    }

    println!("  Reference Grade: {}", config.reference_grade());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.load.output_formats.join(", "));
    if let Some(archive) = config.zip_filename() {
        println!("  Compression: {} (ZIP)", archive);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
