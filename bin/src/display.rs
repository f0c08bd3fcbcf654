//! Display utilities and input/output handling for the candlefold CLI.

use anyhow::{Context, Result, bail};
use candlefold_lib::{Bar, BucketWidth, LocalOffset, PriceTick};
use candlefold_lib::{CsvFormatter, Formatter, JsonFormatter, read_ticks_csv, read_ticks_ndjson};
use chrono::FixedOffset;
use clap::ValueEnum;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Output format for folded bars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
    Parquet,
}

/// Parse a bucket width argument.
pub(crate) fn parse_width(s: &str) -> Result<BucketWidth> {
    s.parse::<BucketWidth>()
        .with_context(|| format!("Invalid bucket width: {s}"))
}

/// Parse an offset argument: `utc`, `local`, `+HH:MM`, or seconds east of UTC.
///
/// `local` is read once, so a DST change while running is not picked up.
pub(crate) fn parse_offset(s: &str) -> Result<LocalOffset> {
    match s.to_lowercase().as_str() {
        "utc" | "z" => Ok(LocalOffset::utc()),
        "local" => Ok(LocalOffset::current_local()),
        other => {
            if let Ok(fixed) = other.parse::<FixedOffset>() {
                return Ok(LocalOffset::from_fixed(fixed));
            }
            match other.parse::<LocalOffset>() {
                Ok(offset) if offset.seconds().abs() < 86_400 => Ok(offset),
                _ => bail!("Invalid offset: {s}. Use utc, local, +HH:MM, or seconds east of UTC"),
            }
        }
    }
}

/// Read ticks from a file, choosing the reader by extension.
pub(crate) fn read_ticks(path: &Path) -> Result<Vec<PriceTick>> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let reader = BufReader::new(file);

    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let ticks = if is_csv {
        read_ticks_csv(reader)
    } else {
        read_ticks_ndjson(reader)
    };
    ticks.with_context(|| format!("Cannot read ticks from {}", path.display()))
}

/// Write bars to a file, or to stdout when no path is given.
pub(crate) fn write_bars(bars: &[Bar], output: Option<&Path>, format: Format) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Cannot create {}", path.display()))?;
            write_bars_to(bars, BufWriter::new(file), format)
        }
        None => write_bars_to(bars, std::io::stdout(), format),
    }
}

fn write_bars_to<W: Write + Send>(bars: &[Bar], writer: W, format: Format) -> Result<()> {
    match format {
        Format::Csv => {
            let formatter = CsvFormatter::new();
            formatter.write_bars(bars, writer)?;
        }
        Format::Json => {
            let formatter = JsonFormatter::new();
            formatter.write_bars(bars, writer)?;
        }
        Format::Ndjson => {
            let formatter = JsonFormatter::ndjson();
            formatter.write_bars(bars, writer)?;
        }
        Format::Parquet => {
            #[cfg(feature = "parquet")]
            {
                let formatter = candlefold_lib::ParquetFormatter::new();
                formatter.write_bars(bars, writer)?;
            }
            #[cfg(not(feature = "parquet"))]
            {
                let _ = writer;
                bail!("Parquet support not compiled in");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("UTC").unwrap(), LocalOffset::utc());
        assert_eq!(parse_offset("+05:30").unwrap().seconds(), 19_800);
        assert_eq!(parse_offset("-03:00").unwrap().seconds(), -10_800);
        assert_eq!(parse_offset("3600").unwrap().seconds(), 3_600);
        assert!(parse_offset("90000").is_err());
        assert!(parse_offset("soon").is_err());
    }

    #[test]
    fn test_parse_width() {
        assert_eq!(parse_width("multi-day").unwrap(), BucketWidth::DAY);
        assert!(parse_width("0").is_err());
    }

    #[test]
    fn test_read_ticks_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv = dir.path().join("ticks.CSV");
        std::fs::write(&csv, "instrument,price,timestamp\nbtcusdt,1.5,1000\n").unwrap();
        assert_eq!(read_ticks(&csv).unwrap().len(), 1);

        let ndjson = dir.path().join("ticks.jsonl");
        std::fs::write(
            &ndjson,
            "{\"instrument\":\"btcusdt\",\"price\":1.5,\"timestamp\":1000}\n",
        )
        .unwrap();
        assert_eq!(read_ticks(&ndjson).unwrap()[0].timestamp_ms, 1_000);
    }

    #[test]
    fn test_write_bars_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bars.ndjson");
        let bars = [Bar::opened_at(0, 1.0), Bar::opened_at(60, 2.0)];

        write_bars(&bars, Some(&path), Format::Ndjson).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 2);
    }
}
