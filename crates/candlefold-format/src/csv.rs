//! CSV output format.

use candlefold_aggregate::Bar;
use std::io::Write;

use crate::{FormatError, Formatter};

/// CSV formatter.
#[derive(Debug, Clone, Default)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
    /// Whether to write bucket starts as raw epoch seconds instead of ISO-8601.
    epoch_seconds: bool,
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
            epoch_seconds: false,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Sets whether to write bucket starts as epoch seconds.
    #[must_use]
    pub const fn with_epoch_seconds(mut self, epoch: bool) -> Self {
        self.epoch_seconds = epoch;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self::new().with_delimiter('\t')
    }

    fn time_field(&self, bar: &Bar) -> String {
        match bar.bucket_start_utc() {
            Some(time) if !self.epoch_seconds => time.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            _ => bar.bucket_start.to_string(),
        }
    }
}

impl Formatter for CsvFormatter {
    fn write_bars<W: Write + Send>(&self, bars: &[Bar], mut writer: W) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            writeln!(writer, "time{d}open{d}high{d}low{d}close")?;
        }

        for bar in bars {
            writeln!(
                writer,
                "{}{d}{}{d}{}{d}{}{d}{}",
                self.time_field(bar),
                bar.open,
                bar.high,
                bar.low,
                bar.close,
            )?;
        }

        writer.flush()?;
        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == '\t' { "tsv" } else { "csv" }
    }
}
