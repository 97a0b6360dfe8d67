pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use adapters::exclusion::{FileExclusions, SharedExclusions};
pub use app::pipelines::BatchPipeline;
pub use crate::core::{
    batch::BatchEngine,
    codec::{decode, decode_text, encode},
    generator::{Constraint, ConstraintEngine, GeneratorSettings},
    symbol::Symbol,
};
pub use domain::error::CodecError;
pub use domain::model::{Digit, Ean13, ModulePattern, Payload, Prefix, RenderConfig, RenderFormat};
pub use utils::error::{ForgeError, Result};
