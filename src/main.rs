use clap::Parser;
use ean_forge::adapters::render;
use ean_forge::config::{BatchArgs, Command, RandomArgs, RenderArgs};
use ean_forge::core::codec;
use ean_forge::utils::{logger, validation::Validate};
use ean_forge::{
    BatchEngine, BatchPipeline, CliConfig, Constraint, ConstraintEngine, Ean13, FileExclusions,
    LocalStorage, Result, Symbol,
};
use std::collections::HashSet;
use std::io::Write;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = run(config.command).await {
        tracing::error!(
            "Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

async fn run(command: Command) -> Result<()> {
    let output = command_output(command).await?;
    std::io::stdout().lock().write_all(&output)?;
    Ok(())
}

/// Everything a command prints, collected before stdout is touched.
async fn command_output(command: Command) -> Result<Vec<u8>> {
    let mut out = Vec::new();

    match command {
        Command::Encode { payload, pattern } => {
            let code = codec::encode_str(&payload)?;
            writeln!(out, "{}", code)?;
            if pattern {
                writeln!(out, "{}", code.to_module_pattern())?;
            }
        }
        Command::Decode { input } => {
            let code = codec::decode_text(&input)?;
            writeln!(out, "{}", code)?;
            writeln!(out, "{}", Symbol::new(code).human_readable())?;
        }
        Command::Random(args) => {
            for code in random_codes(&args)? {
                writeln!(out, "{}", code)?;
            }
        }
        Command::Render(args) => {
            let bytes = render_code(&args)?;
            match &args.output {
                Some(path) => {
                    tokio::fs::write(path, &bytes).await?;
                    tracing::info!(path = %path, "Rendered {}", args.code);
                }
                None => out = bytes,
            }
        }
        Command::Batch(args) => {
            let output_path = run_batch(args).await?;
            writeln!(out, "✅ Batch completed")?;
            writeln!(out, "📁 Output saved to: {}", output_path)?;
        }
    }

    Ok(out)
}

fn random_codes(args: &RandomArgs) -> Result<Vec<Ean13>> {
    args.validate()?;
    let generation = &args.generation;
    let prefix = generation.parsed_prefix()?;
    let exclusions: HashSet<Ean13> = match &generation.exclude_file {
        Some(path) => FileExclusions::load(path)?.into_codes(),
        None => HashSet::new(),
    };

    let constraint = Constraint::new(prefix, &exclusions);
    let codes = match generation.seed {
        Some(seed) => ConstraintEngine::seeded(seed, generation.settings())
            .generate_many(&constraint, args.count),
        None => ConstraintEngine::new(generation.settings()).generate_many(&constraint, args.count),
    }?;
    Ok(codes)
}

fn render_code(args: &RenderArgs) -> Result<Vec<u8>> {
    args.style.validate()?;
    let code: Ean13 = args.code.parse()?;
    let symbol = Symbol::new(code);
    Ok(render::render(&symbol, args.format, &args.style.render_config()))
}

async fn run_batch(args: BatchArgs) -> Result<String> {
    args.validate()?;

    let storage = LocalStorage::new(".".to_string());
    let pipeline = BatchPipeline::new(storage, args);
    BatchEngine::new(pipeline).run().await
}
