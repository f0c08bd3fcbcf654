//! Live aggregation driver.

use std::future::Future;

use candlefold_aggregate::{
    Bar, BarAggregator, BarSeries, ChartRegistry, FoldOutcome, FoldStats, SeedRequest,
    TickDisposition,
};
use candlefold_types::{CandlefoldError, InstrumentId, PriceTick, SeedError};
use futures::stream::{self, FuturesUnordered, Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::{FeedError, FetchError, SeedSource};

/// Notification emitted by [`LiveFeed`] as charts change.
#[derive(Debug)]
pub enum FeedEvent {
    /// An instrument's seed was installed and its buffered ticks folded.
    Seeded {
        /// The instrument that went live.
        instrument: InstrumentId,
        /// Snapshot of the series after buffered ticks were folded.
        series: BarSeries,
        /// Outcomes of the buffered ticks.
        stats: FoldStats,
    },
    /// A live tick changed an instrument's series.
    Updated {
        /// The instrument whose series changed.
        instrument: InstrumentId,
        /// Snapshot of the series after the tick.
        series: BarSeries,
        /// Whether the tick opened a bar or updated the last one.
        outcome: FoldOutcome,
    },
    /// An instrument could not be seeded and was dropped from the registry.
    SeedFailed {
        /// The instrument that failed.
        instrument: InstrumentId,
        /// Why seeding failed.
        error: CandlefoldError,
    },
}

/// Drives a [`ChartRegistry`] from a tick stream and a seed source.
///
/// Everything runs on the calling task: seed fetches are polled
/// concurrently, but the registry is only touched between awaits, so folds
/// never interleave. Ticks that arrive before an instrument's seed are
/// buffered and folded in arrival order once it lands.
#[derive(Debug)]
pub struct LiveFeed<S> {
    source: S,
    registry: ChartRegistry,
    selections: Vec<(InstrumentId, BarAggregator)>,
}

impl<S: SeedSource> LiveFeed<S> {
    /// Creates a driver that seeds charts from `source`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            registry: ChartRegistry::new(),
            selections: Vec::new(),
        }
    }

    /// Queues an instrument to be selected when the feed starts.
    #[must_use]
    pub fn select(mut self, instrument: InstrumentId, aggregator: BarAggregator) -> Self {
        self.selections.push((instrument, aggregator));
        self
    }

    /// Runs until the tick stream ends and every outstanding seed resolves.
    ///
    /// Returns the registry holding the final series.
    pub async fn run<T, F>(self, ticks: T, on_event: F) -> ChartRegistry
    where
        T: Stream<Item = Result<PriceTick, FeedError>>,
        F: FnMut(FeedEvent),
    {
        self.run_with_selections(ticks, stream::empty(), on_event)
            .await
    }

    /// Like [`run`](Self::run), also accepting selection changes while running.
    ///
    /// A selection for an already charted instrument discards its series and
    /// re-seeds it; seeds still in flight for the replaced selection are ignored.
    pub async fn run_with_selections<T, C, F>(
        self,
        ticks: T,
        selections: C,
        mut on_event: F,
    ) -> ChartRegistry
    where
        T: Stream<Item = Result<PriceTick, FeedError>>,
        C: Stream<Item = (InstrumentId, BarAggregator)>,
        F: FnMut(FeedEvent),
    {
        let Self {
            source,
            mut registry,
            selections: initial,
        } = self;

        let mut seeds = FuturesUnordered::new();
        for (instrument, aggregator) in initial {
            let request = registry.select(instrument, aggregator);
            seeds.push(fetch_seed(&source, request));
        }

        let mut ticks = std::pin::pin!(ticks);
        let mut selections = std::pin::pin!(selections);
        let mut ticks_done = false;
        let mut selections_done = false;

        loop {
            tokio::select! {
                biased;

                Some((request, result)) = seeds.next(), if !seeds.is_empty() => {
                    install_seed(&mut registry, request, result, &mut on_event);
                }
                selection = selections.next(), if !selections_done => match selection {
                    Some((instrument, aggregator)) => {
                        let request = registry.select(instrument, aggregator);
                        seeds.push(fetch_seed(&source, request));
                    }
                    None => selections_done = true,
                },
                item = ticks.next(), if !ticks_done => match item {
                    Some(Ok(tick)) => route_tick(&mut registry, tick, &mut on_event),
                    Some(Err(e)) if e.is_recoverable() => warn!(error = %e, "skipping feed line"),
                    Some(Err(e)) => {
                        warn!(error = %e, "tick feed failed");
                        ticks_done = true;
                    }
                    None => {
                        debug!(pending = seeds.len(), "tick feed ended");
                        ticks_done = true;
                    }
                },
                else => break,
            }
        }

        registry
    }
}

fn fetch_seed<'a, S: SeedSource>(
    source: &'a S,
    request: SeedRequest,
) -> impl Future<Output = (SeedRequest, Result<Vec<Bar>, FetchError>)> + 'a {
    async move {
        let result = source.fetch_bars(&request.instrument, request.width).await;
        (request, result)
    }
}

fn install_seed<F: FnMut(FeedEvent)>(
    registry: &mut ChartRegistry,
    request: SeedRequest,
    result: Result<Vec<Bar>, FetchError>,
    on_event: &mut F,
) {
    let instrument = request.instrument.clone();
    let width = request.width;

    let bars = match result {
        Ok(bars) => bars,
        Err(e) => {
            warn!(%instrument, %width, error = %e, "seed fetch failed");
            match registry.fail_seed(&request) {
                Ok(_) => on_event(FeedEvent::SeedFailed {
                    error: CandlefoldError::SeedFetch {
                        instrument: instrument.clone(),
                        message: e.to_string(),
                    },
                    instrument,
                }),
                Err(stale) => debug!(error = %stale, "ignoring failed seed"),
            }
            return;
        }
    };

    match registry.complete_seed(&request, bars) {
        Ok(stats) => {
            info!(
                %instrument,
                %width,
                folded = stats.total(),
                dropped = stats.dropped(),
                "chart seeded"
            );
            if let Some(series) = registry.series(&instrument) {
                on_event(FeedEvent::Seeded {
                    instrument,
                    series,
                    stats,
                });
            }
        }
        Err(e @ (SeedError::StaleSelection { .. } | SeedError::Untracked(_))) => {
            debug!(error = %e, "ignoring seed");
        }
        Err(e) => {
            warn!(%instrument, error = %e, "seed rejected");
            if registry.fail_seed(&request).is_ok() {
                on_event(FeedEvent::SeedFailed {
                    instrument,
                    error: e.into(),
                });
            }
        }
    }
}

fn route_tick<F: FnMut(FeedEvent)>(
    registry: &mut ChartRegistry,
    tick: PriceTick,
    on_event: &mut F,
) {
    let instrument = tick.instrument.clone();
    if let TickDisposition::Folded(outcome) = registry.on_tick(tick) {
        if !outcome.changed() {
            return;
        }
        if let Some(series) = registry.series(&instrument) {
            on_event(FeedEvent::Updated {
                instrument,
                series,
                outcome,
            });
        }
    }
}
