//! Report periods and spreadsheet export.
use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use chrono::{Datelike, NaiveDate};

use crate::{error::ValidationError, forms::validate_date_range};

const EXPORT_PREFIX: &str = "laporan-keuangan";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        validate_date_range(start, end)?;
        Ok(Self { start, end })
    }

    /// First to last day of the month containing `today`.
    pub fn this_month(today: NaiveDate) -> Self {
        let start = today.with_day(1).unwrap_or(today);
        let end = start
            .checked_add_months(chrono::Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(today);
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn export_filename(&self) -> String {
        format!(
            "{EXPORT_PREFIX}_{}_{}.xlsx",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Exported spreadsheet. The bytes are never inspected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Export {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Export {
    pub fn save_to(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.bytes)?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "report exported");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn inverted_period_is_rejected() {
        assert_eq!(
            ReportPeriod::new(day(2026, 10, 2), day(2026, 10, 1)),
            Err(ValidationError::DateRange)
        );
        assert!(ReportPeriod::new(day(2026, 10, 1), day(2026, 10, 1)).is_ok());
    }

    #[test]
    fn this_month_covers_whole_month() {
        let period = ReportPeriod::this_month(day(2026, 2, 14));
        assert_eq!(period.start(), day(2026, 2, 1));
        assert_eq!(period.end(), day(2026, 2, 28));

        let december = ReportPeriod::this_month(day(2026, 12, 31));
        assert_eq!(december.end(), day(2026, 12, 31));
    }

    #[test]
    fn export_filename_encodes_period() {
        let period = ReportPeriod::new(day(2026, 10, 1), day(2026, 10, 31)).unwrap();
        assert_eq!(
            period.export_filename(),
            "laporan-keuangan_2026-10-01_2026-10-31.xlsx"
        );
    }

    #[test]
    fn export_is_written_verbatim() {
        let dir = std::env::temp_dir().join(format!("dompet-export-{}", uuid::Uuid::new_v4()));
        let export = Export {
            filename: "laporan.xlsx".to_string(),
            bytes: vec![0x50, 0x4b, 0x03, 0x04],
        };
        let path = export.save_to(&dir).unwrap();
        assert_eq!(fs::read(&path).unwrap(), export.bytes);
        fs::remove_dir_all(dir).unwrap();
    }
}
