use crate::adapters::exclusion::FileExclusions;
use crate::adapters::render;
use crate::core::generator::{Constraint, ConstraintEngine};
use crate::core::symbol::Symbol;
use crate::core::{BatchResult, ConfigProvider, Ean13, Pipeline, Storage};
use crate::domain::model::{Artifact, BatchSummary, GeneratedCode};
use crate::utils::error::{ForgeError, Result};
use chrono::Utc;
use std::collections::HashSet;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const MANIFEST_FILE: &str = "manifest.csv";
pub const SUMMARY_FILE: &str = "summary.json";

/// Generates a batch of fresh codes and bundles their renderings.
///
/// Extract reads the optional exclusion file through storage, transform runs
/// the constraint engine and every configured renderer, and load writes one
/// ZIP archive holding the renderings, `manifest.csv` and `summary.json`.
pub struct BatchPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> BatchPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn archive_path(&self) -> String {
        let dir = self.config.output_path().trim_end_matches('/');
        if dir.is_empty() {
            self.config.archive_name().to_string()
        } else {
            format!("{}/{}", dir, self.config.archive_name())
        }
    }
}

fn manifest_csv(codes: &[GeneratedCode]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for code in codes {
        writer.serialize(code)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ForgeError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| ForgeError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for BatchPipeline<S, C> {
    async fn extract(&self) -> Result<HashSet<Ean13>> {
        let Some(path) = self.config.exclude_file() else {
            tracing::debug!("No exclusion file configured");
            return Ok(HashSet::new());
        };

        tracing::debug!(path, "Reading exclusion file");
        let bytes = self.storage.read_file(path).await?;
        let exclusions = FileExclusions::from_bytes(path, &bytes)?;
        Ok(exclusions.into_codes())
    }

    async fn transform(&self, existing: HashSet<Ean13>) -> Result<BatchResult> {
        let started_at = Utc::now();
        let prefix = self.config.prefix()?;
        let settings = self.config.generator_settings();
        let count = self.config.count();

        let constraint = Constraint::new(prefix.clone(), &existing);
        let codes = match self.config.seed() {
            Some(seed) => ConstraintEngine::seeded(seed, settings).generate_many(&constraint, count),
            None => ConstraintEngine::new(settings).generate_many(&constraint, count),
        }?;
        tracing::debug!(count = codes.len(), prefix = %prefix, "Generated codes");

        let render_config = self.config.render_config();
        let formats = self.config.render_formats();
        let mut artifacts = Vec::with_capacity(codes.len() * formats.len());
        let mut generated = Vec::with_capacity(codes.len());

        for code in codes {
            let symbol = Symbol::new(code);
            for &format in formats {
                artifacts.push(Artifact {
                    name: render::file_name(&symbol, format),
                    bytes: render::render(&symbol, format, &render_config),
                });
            }
            generated.push(GeneratedCode::new(code, Utc::now()));
        }

        let manifest_csv = manifest_csv(&generated)?;
        let summary = BatchSummary {
            job: self.config.job_name().to_string(),
            prefix: prefix.to_string(),
            requested: count,
            generated: generated.len(),
            existing_codes: existing.len(),
            formats: formats.to_vec(),
            started_at,
            finished_at: Utc::now(),
        };

        Ok(BatchResult {
            codes: generated,
            artifacts,
            manifest_csv,
            summary,
        })
    }

    async fn load(&self, result: BatchResult) -> Result<String> {
        let output_path = self.archive_path();

        tracing::debug!(
            "Creating ZIP file with {} files",
            result.artifacts.len() + 2
        );

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            for artifact in &result.artifacts {
                zip.start_file::<_, ()>(artifact.name.as_str(), FileOptions::default())?;
                zip.write_all(&artifact.bytes)?;
            }

            zip.start_file::<_, ()>(MANIFEST_FILE, FileOptions::default())?;
            zip.write_all(result.manifest_csv.as_bytes())?;

            zip.start_file::<_, ()>(SUMMARY_FILE, FileOptions::default())?;
            let summary = serde_json::to_string_pretty(&result.summary)?;
            zip.write_all(summary.as_bytes())?;

            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage.write_file(&output_path, &zip_data).await?;

        Ok(output_path)
    }
}
