// Domain layer: models and ports. No hardware or runtime dependencies.

pub mod model;
pub mod ports;
