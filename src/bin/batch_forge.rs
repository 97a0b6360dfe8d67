use anyhow::Context;
use clap::Parser;
use ean_forge::core::ConfigProvider;
use ean_forge::utils::{logger, validation::Validate};
use ean_forge::{BatchEngine, BatchPipeline, FileExclusions, LocalStorage, TomlConfig};

#[derive(Parser)]
#[command(name = "batch-forge")]
#[command(about = "Generate EAN-13 bundles from a TOML job file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "batch-forge.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Override the seed from the config
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of codes from the config
    #[arg(long)]
    count: Option<usize>,

    /// Dry run - show what would be generated without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!(config = %args.config, "Loading batch job");

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    if let Some(seed) = args.seed {
        config.generation.seed = Some(seed);
        tracing::info!(seed, "Seed overridden");
    }
    if let Some(count) = args.count {
        config.generation.count = count;
        tracing::info!(count, "Count overridden");
    }

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        perform_dry_run(&config)?;
        return Ok(());
    }

    let storage = LocalStorage::new(".".to_string());
    let engine = BatchEngine::new(BatchPipeline::new(storage, config));

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Batch completed");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "Batch failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Job: {}", config.job_name());
    if let Some(description) = config.description() {
        println!("  Description: {}", description);
    }
    println!("  Prefix: {}", config.generation.prefix);
    println!("  Count: {}", config.count());
    let formats: Vec<String> = config
        .render_formats()
        .iter()
        .map(|f| f.to_string())
        .collect();
    println!("  Formats: {}", formats.join(", "));
    println!(
        "  Output: {}/{}",
        config.output_path().trim_end_matches('/'),
        config.archive_name()
    );

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    println!("🔍 Dry Run Analysis:");

    let prefix = config.prefix()?;
    let free = prefix.free_positions() as u32;
    let space = 10u64.pow(free);
    println!("  Free payload digits: {} ({} possible codes)", free, space);

    let existing = match config.exclude_file() {
        Some(path) => FileExclusions::load(path)
            .with_context(|| format!("failed to read exclusion file '{}'", path))?
            .len(),
        None => 0,
    };
    println!("  Excluded codes: {}", existing);

    let settings = config.generator_settings();
    println!(
        "  Budget: {} attempts per code, sequential scan after {} rejections",
        settings.max_attempts, settings.scan_threshold
    );

    if (config.count() as u64) > space {
        println!(
            "  ⚠️  Requested {} codes but only {} exist under this prefix",
            config.count(),
            space
        );
    }

    Ok(())
}
