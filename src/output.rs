//! Report output: row formatting settings and the report file writer.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::Result;
use crate::domain::DisplayZone;
use crate::engine::{Report, RowFormatter, SOURCE_TAG};

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Literal tag written in the second column (default: "【X】")
    pub source_tag: String,

    /// Offset such as "+09:00" for rendering times; system local time when unset
    pub utc_offset: Option<String>,

    /// Append to an existing report file instead of replacing it (default: true)
    pub append: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            source_tag: SOURCE_TAG.to_string(),
            utc_offset: None,
            append: true,
        }
    }
}

impl OutputConfig {
    pub fn zone(&self) -> Result<DisplayZone> {
        DisplayZone::parse(self.utc_offset.as_deref())
    }

    pub fn formatter(&self) -> Result<RowFormatter> {
        Ok(RowFormatter::new(self.source_tag.clone(), self.zone()?))
    }
}

pub struct ReportWriter;

impl ReportWriter {
    /// Write the report rows to `path`, one per line. Returns the number of rows written.
    pub fn write(path: &Path, report: &Report, append: bool) -> Result<usize> {
        if report.count == 0 && append {
            return Ok(0);
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;

        let mut writer = BufWriter::new(file);
        if !report.data.is_empty() {
            writer.write_all(report.data.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        Ok(report.count)
    }
}
