use crate::models::Pattern;
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Export file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Pick the format from the target extension; anything but `.json` is CSV
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ExportFormat::Json,
            _ => ExportFormat::Csv,
        }
    }

    fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Serialize)]
struct PatternRow<'a> {
    path: &'a str,
    count: usize,
    percentage: f64,
    depth: usize,
}

/// Writes pattern lists to files
pub struct DataExporter;

impl DataExporter {
    /// Export patterns to `path`, returning a status message
    pub fn export_patterns(patterns: &[Pattern], path: &Path) -> Result<String> {
        if patterns.is_empty() {
            return Err(anyhow!("No patterns to export"));
        }

        let file =
            File::create(path).with_context(|| format!("Failed to create export file: {:?}", path))?;
        let writer = BufWriter::new(file);

        let format = ExportFormat::from_path(path);
        match format {
            ExportFormat::Csv => Self::write_csv(patterns, writer)?,
            ExportFormat::Json => Self::write_json(patterns, writer)?,
        }

        Ok(format!(
            "Exported {} patterns to {} file: {}",
            patterns.len(),
            format.extension().to_uppercase(),
            path.display()
        ))
    }

    /// Path, count, percentage and depth per row. Samples are not exported.
    pub fn write_csv<W: Write>(patterns: &[Pattern], writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for pattern in patterns {
            csv_writer.serialize(PatternRow {
                path: &pattern.path,
                count: pattern.count,
                percentage: pattern.percentage,
                depth: pattern.depth,
            })?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_json<W: Write>(patterns: &[Pattern], mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, patterns)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
