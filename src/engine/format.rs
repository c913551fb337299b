use chrono::{DateTime, Utc};

use crate::domain::{DisplayZone, PostRecord};

/// Default literal tag placed in the second column
pub const SOURCE_TAG: &str = "【X】";

const EXECUTION_FORMAT: &str = "%H:%M";
const POST_DATE_FORMAT: &str = "%m/%d %H:%M";

/// Renders records as tab-separated report rows:
/// `execution time, tag, MM/DD HH:MM, text`.
#[derive(Debug, Clone)]
pub struct RowFormatter {
    tag: String,
    zone: DisplayZone,
}

impl Default for RowFormatter {
    fn default() -> Self {
        Self::new(SOURCE_TAG, DisplayZone::Local)
    }
}

impl RowFormatter {
    pub fn new(tag: impl Into<String>, zone: DisplayZone) -> Self {
        Self {
            tag: tag.into(),
            zone,
        }
    }

    pub fn zone(&self) -> &DisplayZone {
        &self.zone
    }

    /// `HH:MM` label for the moment a run started.
    pub fn execution_label(&self, at: DateTime<Utc>) -> String {
        self.zone.format(at, EXECUTION_FORMAT)
    }

    pub fn format(&self, record: &PostRecord, execution_label: &str) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            execution_label,
            self.tag,
            self.zone.format(record.date, POST_DATE_FORMAT),
            record.text
        )
    }

    /// One row per record, newline-joined, no header and no trailing newline.
    pub fn format_all(&self, records: &[PostRecord], execution_label: &str) -> String {
        records
            .iter()
            .map(|r| self.format(r, execution_label))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
