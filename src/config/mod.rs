//! Configuration loading and management for the Rotation Indicator Engine.
//!
//! This module loads the engine settings (worker pool size, fetch timeout,
//! supported year range) and the OData endpoint per report type from YAML
//! files.
//!
//! # Example
//!
//! ```no_run
//! use rotation_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/rotation").unwrap().into_config();
//! println!("Rotation endpoint: {}", config.base_url("rotacion-personal"));
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{EndpointsConfig, EngineConfig, EngineSettings, ROTATION_REPORT};
