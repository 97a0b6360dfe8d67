// Domain layer: value types, core errors and ports (interfaces).

pub mod error;
pub mod model;
pub mod ports;
