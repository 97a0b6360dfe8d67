use crate::core::generator::GeneratorSettings;
use crate::core::symbol::Symbol;
use crate::domain::model::{BatchResult, Ean13, Prefix, RenderConfig, RenderFormat};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashSet};

/// Membership test against codes that already exist elsewhere.
///
/// The generator only ever reads through this trait. Recording accepted codes
/// is the caller's job; callers sharing one set across threads need an atomic
/// check-and-insert of their own (see `SharedExclusions`).
pub trait ExclusionSet: Send + Sync {
    fn contains(&self, code: &Ean13) -> bool;
}

/// Excludes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExclusions;

impl ExclusionSet for NoExclusions {
    fn contains(&self, _code: &Ean13) -> bool {
        false
    }
}

impl ExclusionSet for HashSet<Ean13> {
    fn contains(&self, code: &Ean13) -> bool {
        HashSet::contains(self, code)
    }
}

impl ExclusionSet for BTreeSet<Ean13> {
    fn contains(&self, code: &Ean13) -> bool {
        BTreeSet::contains(self, code)
    }
}

impl<E: ExclusionSet + ?Sized> ExclusionSet for &E {
    fn contains(&self, code: &Ean13) -> bool {
        (**self).contains(code)
    }
}

/// Turns a symbol into an external representation.
///
/// Implementations are pure: the same symbol and config always give the same
/// bytes.
pub trait Renderer: Send + Sync {
    fn render(&self, symbol: &Symbol, config: &RenderConfig) -> Vec<u8>;

    /// File extension for rendered output, without the dot.
    fn extension(&self) -> &'static str;
}

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn job_name(&self) -> &str;
    fn prefix(&self) -> Result<Prefix>;
    fn count(&self) -> usize;
    fn exclude_file(&self) -> Option<&str>;
    fn seed(&self) -> Option<u64>;
    fn generator_settings(&self) -> GeneratorSettings;
    fn render_formats(&self) -> &[RenderFormat];
    fn render_config(&self) -> RenderConfig;
    /// Directory the bundle is written to.
    fn output_path(&self) -> &str;
    fn archive_name(&self) -> &str;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<HashSet<Ean13>>;
    async fn transform(&self, existing: HashSet<Ean13>) -> Result<BatchResult>;
    async fn load(&self, result: BatchResult) -> Result<String>;
}
