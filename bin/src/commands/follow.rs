//! Follow command implementation.
//!
//! This module charts instruments live from an NDJSON tick stream on stdin,
//! printing the last bar of each chart whenever it changes.

use crate::display::{parse_offset, parse_width};
use anyhow::Result;
use candlefold_lib::{
    Bar, BarAggregator, ClientConfig, FeedEvent, FileSeedSource, InstrumentId, LiveFeed,
    SeedClient, SeedSource, tick_lines,
};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// One line of `follow` output.
#[derive(Serialize)]
struct BarLine<'a> {
    instrument: &'a InstrumentId,
    #[serde(flatten)]
    bar: &'a Bar,
}

/// Chart instruments from stdin ticks until the stream closes.
pub(crate) async fn follow(
    instruments: &[String],
    width: &str,
    offset: &str,
    seed_url: Option<&str>,
    seed_dir: Option<PathBuf>,
) -> Result<()> {
    let aggregator = BarAggregator::new(parse_width(width)?, parse_offset(offset)?);
    let instruments: Vec<_> = instruments.iter().map(InstrumentId::new).collect();

    match seed_dir {
        Some(dir) => run(FileSeedSource::new(dir), &instruments, aggregator).await,
        None => {
            let mut config = ClientConfig::default();
            if let Some(url) = seed_url {
                config.base_url = url.to_string();
            }
            run(SeedClient::new(config)?, &instruments, aggregator).await
        }
    }
}

async fn run<S: SeedSource>(
    source: S,
    instruments: &[InstrumentId],
    aggregator: BarAggregator,
) -> Result<()> {
    let feed = instruments
        .iter()
        .fold(LiveFeed::new(source), |feed, id| {
            feed.select(id.clone(), aggregator)
        });
    info!(
        charts = instruments.len(),
        width = %aggregator.width(),
        offset = %aggregator.offset(),
        "following stdin"
    );

    let ticks = tick_lines(tokio::io::BufReader::new(tokio::io::stdin()));
    let registry = feed.run(ticks, report).await;

    info!(charts = registry.len(), "tick feed closed");
    Ok(())
}

fn report(event: FeedEvent) {
    match event {
        FeedEvent::Seeded {
            instrument,
            series,
            stats,
        } => {
            info!(
                %instrument,
                bars = series.len(),
                replayed = stats.total(),
                dropped = stats.dropped(),
                "chart live"
            );
            if let Some(bar) = series.last() {
                print_bar(&instrument, bar);
            }
        }
        FeedEvent::Updated {
            instrument, series, ..
        } => {
            if let Some(bar) = series.last() {
                print_bar(&instrument, bar);
            }
        }
        FeedEvent::SeedFailed { instrument, error } => {
            error!(%instrument, %error, "chart dropped");
        }
    }
}

fn print_bar(instrument: &InstrumentId, bar: &Bar) {
    let result = bar_line(instrument, bar).and_then(|line| {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{line}")?;
        Ok(stdout.flush()?)
    });
    if let Err(e) = result {
        warn!(%instrument, error = %e, "cannot write bar");
    }
}

fn bar_line(instrument: &InstrumentId, bar: &Bar) -> Result<String> {
    Ok(serde_json::to_string(&BarLine { instrument, bar })?)
}
