//! Utility functions and helpers
//!
//! Application directories and tracing setup for the command line tool.

pub mod app_paths;
pub mod logging;
