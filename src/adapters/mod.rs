pub mod exclusion;
pub mod render;
