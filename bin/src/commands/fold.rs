//! Fold command implementation.
//!
//! This module folds a recorded tick file into bars, optionally on top of a
//! seed series, and writes the result in the requested format.

use crate::display::{Format, parse_offset, parse_width, read_ticks, write_bars};
use anyhow::{Context, Result, bail};
use candlefold_lib::{
    BarAggregator, BarSeries, FoldOutcome, FoldStats, InstrumentId, PriceTick, read_bars_json,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// Fold a tick file into bars.
#[allow(clippy::too_many_arguments)]
pub(crate) fn fold(
    ticks_path: &Path,
    instrument: Option<&str>,
    width: &str,
    offset: &str,
    seed: Option<&Path>,
    output: Option<&Path>,
    format: Format,
    quiet: bool,
) -> Result<()> {
    let aggregator = BarAggregator::new(parse_width(width)?, parse_offset(offset)?);

    let ticks = read_ticks(ticks_path)?;
    let instrument = match instrument {
        Some(id) => Some(InstrumentId::new(id)),
        None => single_instrument(&ticks)?,
    };
    let selected: Vec<&PriceTick> = ticks
        .iter()
        .filter(|tick| instrument.as_ref().is_none_or(|id| &tick.instrument == id))
        .collect();

    let mut series = match seed {
        Some(path) => load_seed(path)?,
        None => BarSeries::new(),
    };
    info!(
        ticks = selected.len(),
        seed_bars = series.len(),
        width = %aggregator.width(),
        offset = %aggregator.offset(),
        "folding"
    );

    // Setup progress bar
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(selected.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ticks ({percent}%) {msg}")?
                .progress_chars("=>-"),
        );
        if let Some(id) = &instrument {
            pb.set_message(format!("{id} @ {}", aggregator.width()));
        }
        pb
    };

    let mut stats = FoldStats::default();
    for tick in selected {
        let (next, outcome) = aggregator.fold_tick(&series, tick);
        match outcome {
            FoldOutcome::Rejected(reason) => {
                debug!(timestamp = tick.timestamp_ms, %reason, "dropped invalid tick");
            }
            FoldOutcome::Late {
                bucket_start,
                last_bucket_start,
            } => {
                debug!(bucket_start, last_bucket_start, "dropped late tick");
            }
            FoldOutcome::Appended | FoldOutcome::Updated => {}
        }
        series = next;
        stats.record(outcome);
        progress.inc(1);
    }
    progress.finish_with_message(format!("{} bars", series.len()));

    write_bars(series.as_slice(), output, format)?;

    if !quiet {
        eprintln!(
            "Folded {} ticks: {} appended, {} updated, {} late, {} rejected",
            stats.total(),
            stats.appended,
            stats.updated,
            stats.late,
            stats.rejected
        );
        if let Some(path) = output {
            eprintln!("Output written to: {}", path.display());
        }
    }

    Ok(())
}

/// Returns the only instrument in `ticks`, or `None` for an empty file.
fn single_instrument(ticks: &[PriceTick]) -> Result<Option<InstrumentId>> {
    let instruments: BTreeSet<&str> = ticks.iter().map(|t| t.instrument.as_str()).collect();
    match instruments.len() {
        0 => Ok(None),
        1 => Ok(instruments.first().map(|id| InstrumentId::new(id))),
        n => bail!(
            "Tick file covers {n} instruments ({}); pass --instrument",
            instruments.into_iter().collect::<Vec<_>>().join(", ")
        ),
    }
}

fn load_seed(path: &Path) -> Result<BarSeries> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let bars = read_bars_json(BufReader::new(file))
        .with_context(|| format!("Cannot read seed from {}", path.display()))?;
    BarSeries::seeded(bars).with_context(|| format!("Invalid seed in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_instrument() {
        assert_eq!(single_instrument(&[]).unwrap(), None);

        let ticks = [
            PriceTick::new("BTCUSDT", 1.0, 0),
            PriceTick::new("btcusdt", 2.0, 1),
        ];
        assert_eq!(
            single_instrument(&ticks).unwrap(),
            Some(InstrumentId::new("btcusdt"))
        );

        let mixed = [
            PriceTick::new("btcusdt", 1.0, 0),
            PriceTick::new("ethusdt", 2.0, 1),
        ];
        let err = single_instrument(&mixed).unwrap_err();
        assert!(err.to_string().contains("btcusdt, ethusdt"));
    }

    #[test]
    fn test_fold_file_onto_seed() {
        let dir = tempfile::tempdir().unwrap();
        let ticks = dir.path().join("ticks.csv");
        let seed = dir.path().join("seed.json");
        let output = dir.path().join("bars.json");

        std::fs::write(
            &ticks,
            "instrument,price,timestamp\n\
             btcusdt,105,3700000\n\
             btcusdt,90,100\n\
             btcusdt,-1,3800000\n\
             ethusdt,1,3900000\n\
             btcusdt,101,7300000\n",
        )
        .unwrap();
        std::fs::write(
            &seed,
            r#"[{"time":3600,"open":100,"high":100,"low":100,"close":100}]"#,
        )
        .unwrap();

        fold(
            &ticks,
            Some("btcusdt"),
            "1h",
            "utc",
            Some(&seed),
            Some(&output),
            Format::Json,
            true,
        )
        .unwrap();

        let bars = read_bars_json(File::open(&output).unwrap()).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].bucket_start, 3_600);
        assert_eq!(bars[0].close, 105.0);
        assert_eq!(bars[1].bucket_start, 7_200);
    }

    #[test]
    fn test_fold_rejects_unordered_seed() {
        let dir = tempfile::tempdir().unwrap();
        let ticks = dir.path().join("ticks.ndjson");
        let seed = dir.path().join("seed.json");
        std::fs::write(&ticks, "").unwrap();
        std::fs::write(
            &seed,
            r#"[{"time":60,"open":1,"high":1,"low":1,"close":1},
                {"time":0,"open":1,"high":1,"low":1,"close":1}]"#,
        )
        .unwrap();

        let result = fold(
            &ticks,
            None,
            "1m",
            "utc",
            Some(&seed),
            None,
            Format::Csv,
            true,
        );
        assert!(result.is_err());
    }
}
