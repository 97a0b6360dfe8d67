pub mod batch;
pub mod checksum;
pub mod codec;
pub mod generator;
pub mod symbol;
pub mod tables;

pub use crate::domain::model::{BatchResult, Ean13};
pub use crate::domain::ports::{ConfigProvider, ExclusionSet, Pipeline, Renderer, Storage};
pub use crate::utils::error::Result;
