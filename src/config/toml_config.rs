use crate::core::generator::{GeneratorSettings, DEFAULT_MAX_ATTEMPTS, DEFAULT_SCAN_THRESHOLD};
use crate::core::ConfigProvider;
use crate::domain::model::{Prefix, RenderConfig, RenderFormat};
use crate::utils::error::{ForgeError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ARCHIVE: &str = "barcodes.zip";

/// A batch job described in a TOML file.
///
/// ```toml
/// [job]
/// name = "spring-catalogue"
///
/// [generation]
/// prefix = "400"
/// count = 50
/// exclude_file = "${CATALOGUE_DIR}/existing.txt"
///
/// [render]
/// formats = ["svg", "ascii"]
///
/// [output]
/// path = "./output"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: JobConfig,
    pub generation: GenerationConfig,
    #[serde(default)]
    pub render: RenderSection,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub prefix: String,
    pub count: usize,
    pub max_attempts: Option<u64>,
    pub scan_threshold: Option<u64>,
    pub time_budget_ms: Option<u64>,
    pub seed: Option<u64>,
    pub exclude_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSection {
    #[serde(default = "default_formats")]
    pub formats: Vec<RenderFormat>,
    pub module_width: Option<u32>,
    pub bar_height: Option<u32>,
    pub ascii_rows: Option<u32>,
    pub quiet_zone: Option<bool>,
    pub show_text: Option<bool>,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            formats: default_formats(),
            module_width: None,
            bar_height: None,
            ascii_rows: None,
            quiet_zone: None,
            show_text: None,
        }
    }
}

fn default_formats() -> Vec<RenderFormat> {
    vec![RenderFormat::Svg]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub archive: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ForgeError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ForgeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left
    /// as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ForgeError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("job.name", &self.job.name)?;
        validation::validate_prefix("generation.prefix", &self.generation.prefix)?;
        validation::validate_positive_number("generation.count", self.generation.count, 1)?;

        if let Some(max_attempts) = self.generation.max_attempts {
            validation::validate_positive_number("generation.max_attempts", max_attempts, 1)?;
        }
        if let Some(path) = &self.generation.exclude_file {
            validation::validate_path("generation.exclude_file", path)?;
            if path.contains("${") {
                return Err(ForgeError::InvalidConfigValueError {
                    field: "generation.exclude_file".to_string(),
                    value: path.clone(),
                    reason: "Unresolved environment variable".to_string(),
                });
            }
        }

        validation::validate_positive_number("render.formats", self.render.formats.len(), 1)?;
        if let Some(width) = self.render.module_width {
            validation::validate_range("render.module_width", width, 1, 50)?;
        }
        if let Some(height) = self.render.bar_height {
            validation::validate_range("render.bar_height", height, 1, 2_000)?;
        }
        if let Some(rows) = self.render.ascii_rows {
            validation::validate_range("render.ascii_rows", rows, 1, 100)?;
        }

        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_file_extension("output.archive", self.archive_name(), &["zip"])?;

        Ok(())
    }

    pub fn description(&self) -> Option<&str> {
        self.job.description.as_deref()
    }
}

impl ConfigProvider for TomlConfig {
    fn job_name(&self) -> &str {
        &self.job.name
    }

    fn prefix(&self) -> Result<Prefix> {
        validation::validate_prefix("generation.prefix", &self.generation.prefix)
    }

    fn count(&self) -> usize {
        self.generation.count
    }

    fn exclude_file(&self) -> Option<&str> {
        self.generation.exclude_file.as_deref()
    }

    fn seed(&self) -> Option<u64> {
        self.generation.seed
    }

    fn generator_settings(&self) -> GeneratorSettings {
        GeneratorSettings {
            max_attempts: self.generation.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS),
            scan_threshold: self
                .generation
                .scan_threshold
                .unwrap_or(DEFAULT_SCAN_THRESHOLD),
            time_budget: self.generation.time_budget_ms.map(Duration::from_millis),
        }
    }

    fn render_formats(&self) -> &[RenderFormat] {
        &self.render.formats
    }

    fn render_config(&self) -> RenderConfig {
        let defaults = RenderConfig::default();
        RenderConfig {
            module_width: self.render.module_width.unwrap_or(defaults.module_width),
            bar_height: self.render.bar_height.unwrap_or(defaults.bar_height),
            ascii_rows: self.render.ascii_rows.unwrap_or(defaults.ascii_rows),
            quiet_zone: self.render.quiet_zone.unwrap_or(defaults.quiet_zone),
            show_text: self.render.show_text.unwrap_or(defaults.show_text),
            ..defaults
        }
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn archive_name(&self) -> &str {
        self.output.archive.as_deref().unwrap_or(DEFAULT_ARCHIVE)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MINIMAL: &str = r#"
[job]
name = "minimal"

[generation]
count = 5

[output]
path = "./output"
"#;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = TomlConfig::from_toml_str(MINIMAL).unwrap();

        assert_eq!(config.job_name(), "minimal");
        assert!(config.prefix().unwrap().is_empty());
        assert_eq!(config.render_formats(), &[RenderFormat::Svg]);
        assert_eq!(config.archive_name(), DEFAULT_ARCHIVE);
        assert_eq!(config.generator_settings(), GeneratorSettings::default());
        assert_eq!(config.render_config(), RenderConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config() {
        let toml_content = r#"
[job]
name = "catalogue"
description = "Spring range"

[generation]
prefix = "400638"
count = 20
max_attempts = 500
scan_threshold = 10
time_budget_ms = 250
seed = 7

[render]
formats = ["svg", "ascii"]
module_width = 3
show_text = false

[output]
path = "./bundles"
archive = "spring.zip"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.description(), Some("Spring range"));
        assert_eq!(config.prefix().unwrap().to_string(), "400638");
        assert_eq!(config.seed(), Some(7));
        let settings = config.generator_settings();
        assert_eq!(settings.max_attempts, 500);
        assert_eq!(settings.scan_threshold, 10);
        assert_eq!(settings.time_budget, Some(Duration::from_millis(250)));
        let render = config.render_config();
        assert_eq!(render.module_width, 3);
        assert!(!render.show_text);
        assert!(render.quiet_zone);
        assert_eq!(config.archive_name(), "spring.zip");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("EAN_FORGE_TEST_PREFIX", "978");

        let toml_content = r#"
[job]
name = "books"

[generation]
prefix = "${EAN_FORGE_TEST_PREFIX}"
count = 1

[output]
path = "./output"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.generation.prefix, "978");

        std::env::remove_var("EAN_FORGE_TEST_PREFIX");
    }

    #[test]
    fn test_validation_failures() {
        let bad_prefix = MINIMAL.replace("count = 5", "prefix = \"12x\"\ncount = 5");
        let config = TomlConfig::from_toml_str(&bad_prefix).unwrap();
        assert!(config.validate().is_err());

        let zero_count = MINIMAL.replace("count = 5", "count = 0");
        let config = TomlConfig::from_toml_str(&zero_count).unwrap();
        assert!(config.validate().is_err());

        let bad_archive = format!("{}archive = \"codes.tar\"\n", MINIMAL);
        let config = TomlConfig::from_toml_str(&bad_archive).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_format_is_a_parse_error() {
        let toml_content = format!("{}\n[render]\nformats = [\"pdf\"]\n", MINIMAL);
        assert!(matches!(
            TomlConfig::from_toml_str(&toml_content),
            Err(ForgeError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.job.name, "minimal");
        assert!(TomlConfig::from_file("/nonexistent/job.toml").is_err());
    }
}
