use crate::core::generator::{GeneratorSettings, DEFAULT_MAX_ATTEMPTS, DEFAULT_SCAN_THRESHOLD};
use crate::core::ConfigProvider;
use crate::domain::model::{Prefix, RenderConfig, RenderFormat};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Args, Parser, Subcommand};
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "ean-forge")]
#[command(about = "Encode, decode, render and generate EAN-13 codes")]
pub struct CliConfig {
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Append the check digit to a 12-digit payload
    Encode {
        payload: String,

        /// Also print the 95-module pattern
        #[arg(long)]
        pattern: bool,
    },

    /// Decode 13 digits or a 95-module string of 0/1
    Decode { input: String },

    /// Generate random valid codes
    Random(RandomArgs),

    /// Draw a code as text or SVG
    Render(RenderArgs),

    /// Generate codes and write their renderings into a ZIP bundle
    Batch(BatchArgs),
}

#[derive(Debug, Clone, Args)]
pub struct GenerationArgs {
    /// Leading payload digits every generated code must carry
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// File listing existing codes, one per line
    #[arg(long)]
    pub exclude_file: Option<String>,

    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u64,

    /// Consecutive rejections before switching to a sequential scan
    #[arg(long, default_value_t = DEFAULT_SCAN_THRESHOLD)]
    pub scan_threshold: u64,

    /// Wall-clock budget per code, in milliseconds
    #[arg(long)]
    pub time_budget_ms: Option<u64>,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

impl GenerationArgs {
    pub fn parsed_prefix(&self) -> Result<Prefix> {
        Ok(self.prefix.parse::<Prefix>()?)
    }

    pub fn settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            max_attempts: self.max_attempts,
            scan_threshold: self.scan_threshold,
            time_budget: self.time_budget_ms.map(Duration::from_millis),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct RandomArgs {
    #[command(flatten)]
    pub generation: GenerationArgs,

    /// Number of distinct codes to print
    #[arg(long, default_value_t = 1)]
    pub count: usize,
}

impl Validate for RandomArgs {
    fn validate(&self) -> Result<()> {
        self.generation.parsed_prefix()?;
        validation::validate_positive_number("count", self.count, 1)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Args)]
pub struct StyleArgs {
    /// SVG units per module
    #[arg(long, default_value_t = 2)]
    pub module_width: u32,

    /// SVG bar height
    #[arg(long, default_value_t = 60)]
    pub bar_height: u32,

    /// Bar rows in text output
    #[arg(long, default_value_t = 4)]
    pub ascii_rows: u32,

    #[arg(long)]
    pub no_quiet_zone: bool,

    #[arg(long)]
    pub no_text: bool,
}

impl StyleArgs {
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            module_width: self.module_width,
            bar_height: self.bar_height,
            ascii_rows: self.ascii_rows,
            quiet_zone: !self.no_quiet_zone,
            show_text: !self.no_text,
            ..RenderConfig::default()
        }
    }
}

impl Validate for StyleArgs {
    fn validate(&self) -> Result<()> {
        validation::validate_range("module_width", self.module_width, 1, 50)?;
        validation::validate_range("bar_height", self.bar_height, 1, 2_000)?;
        validation::validate_range("ascii_rows", self.ascii_rows, 1, 100)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// 13-digit code
    pub code: String,

    #[arg(long, value_enum, default_value = "ascii")]
    pub format: RenderFormat,

    #[command(flatten)]
    pub style: StyleArgs,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    /// Job name recorded in the bundle summary
    #[arg(long, default_value = "batch")]
    pub name: String,

    #[command(flatten)]
    pub generation: GenerationArgs,

    #[arg(long, default_value_t = 10)]
    pub count: usize,

    #[arg(long, value_enum, value_delimiter = ',', default_value = "svg")]
    pub formats: Vec<RenderFormat>,

    #[command(flatten)]
    pub style: StyleArgs,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, default_value = "barcodes.zip")]
    pub archive: String,
}

impl ConfigProvider for BatchArgs {
    fn job_name(&self) -> &str {
        &self.name
    }

    fn prefix(&self) -> Result<Prefix> {
        self.generation.parsed_prefix()
    }

    fn count(&self) -> usize {
        self.count
    }

    fn exclude_file(&self) -> Option<&str> {
        self.generation.exclude_file.as_deref()
    }

    fn seed(&self) -> Option<u64> {
        self.generation.seed
    }

    fn generator_settings(&self) -> GeneratorSettings {
        self.generation.settings()
    }

    fn render_formats(&self) -> &[RenderFormat] {
        &self.formats
    }

    fn render_config(&self) -> RenderConfig {
        self.style.render_config()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn archive_name(&self) -> &str {
        &self.archive
    }
}

impl Validate for BatchArgs {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("name", &self.name)?;
        self.generation.parsed_prefix()?;
        validation::validate_positive_number("count", self.count, 1)?;
        validation::validate_positive_number("formats", self.formats.len(), 1)?;
        self.style.validate()?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_file_extension("archive", &self.archive, &["zip"])?;
        Ok(())
    }
}
