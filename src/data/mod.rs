//! Loading records from files, field statistics and pattern export

pub mod data_analyzer;
pub mod data_exporter;
pub mod loaders;
pub mod type_inference;
