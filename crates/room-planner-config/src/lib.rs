pub mod config;

pub use config::{PlannerConfig, DATA_DIR_ENV};
