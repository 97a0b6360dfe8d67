use crate::core::Pipeline;
use crate::utils::error::Result;

/// Drives a [`Pipeline`] through extract, transform and load.
pub struct BatchEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> BatchEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Returns the path of the written bundle.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting batch run");

        let existing = self.pipeline.extract().await?;
        tracing::info!(existing = existing.len(), "Loaded existing codes");

        let result = self.pipeline.transform(existing).await?;
        tracing::info!(
            generated = result.codes.len(),
            artifacts = result.artifacts.len(),
            "Generated codes"
        );

        let output_path = self.pipeline.load(result).await?;
        tracing::info!(output = %output_path, "Bundle written");

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{BatchResult, BatchSummary, Ean13, GeneratedCode};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPipeline {
        calls: Mutex<Vec<&'static str>>,
        fail_transform: bool,
    }

    impl RecordingPipeline {
        fn record(&self, step: &'static str) {
            self.calls.lock().unwrap().push(step);
        }
    }

    #[async_trait]
    impl Pipeline for RecordingPipeline {
        async fn extract(&self) -> Result<HashSet<Ean13>> {
            self.record("extract");
            Ok(HashSet::from(["4006381333931".parse().unwrap()]))
        }

        async fn transform(&self, existing: HashSet<Ean13>) -> Result<BatchResult> {
            self.record("transform");
            if self.fail_transform {
                return Err(crate::domain::error::CodecError::Exhausted { attempts: 3 }.into());
            }
            let now = chrono::Utc::now();
            let code: Ean13 = "9780306406157".parse().unwrap();
            Ok(BatchResult {
                codes: vec![GeneratedCode::new(code, now)],
                artifacts: Vec::new(),
                manifest_csv: String::new(),
                summary: BatchSummary {
                    job: "test".to_string(),
                    prefix: String::new(),
                    requested: 1,
                    generated: 1,
                    existing_codes: existing.len(),
                    formats: Vec::new(),
                    started_at: now,
                    finished_at: now,
                },
            })
        }

        async fn load(&self, result: BatchResult) -> Result<String> {
            self.record("load");
            assert_eq!(result.summary.existing_codes, 1);
            Ok("out/bundle.zip".to_string())
        }
    }

    #[tokio::test]
    async fn test_run_calls_steps_in_order() {
        let engine = BatchEngine::new(RecordingPipeline::default());
        let path = engine.run().await.unwrap();

        assert_eq!(path, "out/bundle.zip");
        assert_eq!(
            *engine.pipeline().calls.lock().unwrap(),
            vec!["extract", "transform", "load"]
        );
    }

    #[tokio::test]
    async fn test_failed_transform_skips_load() {
        let engine = BatchEngine::new(RecordingPipeline {
            fail_transform: true,
            ..Default::default()
        });
        let err = engine.run().await.unwrap_err();

        assert_eq!(err.kind(), "ExhaustedError");
        assert_eq!(
            *engine.pipeline().calls.lock().unwrap(),
            vec!["extract", "transform"]
        );
    }
}
