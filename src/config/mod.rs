//! Configuration module
//!
//! User settings read from `config.toml`: analysis defaults, output
//! preferences and logging.

pub mod config;

pub use config::Config;
