pub mod config;
pub mod schema;

pub use config::{DumpFormat, ScalingMode, SweepConfig, parse_k_values};
