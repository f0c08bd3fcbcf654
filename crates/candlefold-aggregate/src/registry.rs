//! Per-instrument chart state.

use std::collections::HashMap;

use candlefold_types::{BucketWidth, InstrumentId, PriceTick, SeedError};
use tracing::{debug, trace};

use crate::{Bar, BarAggregator, BarSeries, FoldOutcome, FoldStats};

/// Seed fetch the caller must perform after selecting an instrument.
///
/// The request is handed back to [`ChartRegistry::complete_seed`] or
/// [`ChartRegistry::fail_seed`]; only the request from the latest selection
/// of an instrument is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRequest {
    /// Instrument to fetch history for.
    pub instrument: InstrumentId,
    /// Width the history must be bucketed with.
    pub width: BucketWidth,
    /// Selection this request belongs to.
    pub generation: u64,
}

/// What the registry did with an incoming tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickDisposition {
    /// Held until the instrument's seed lands.
    Buffered,
    /// Folded into the instrument's live series.
    Folded(FoldOutcome),
    /// No chart is selected for the tick's instrument.
    Untracked,
}

#[derive(Debug)]
enum ChartState {
    Seeding { buffered: Vec<PriceTick> },
    Live { series: BarSeries },
}

#[derive(Debug)]
struct Chart {
    aggregator: BarAggregator,
    generation: u64,
    state: ChartState,
}

/// Independent bar series per instrument.
///
/// Each instrument has its own aggregator and series, so ticks never cross
/// between charts. A chart starts out seeding: ticks for it are buffered in
/// arrival order and folded right after the historical seed is installed.
/// The registry expects a single owner; callers serialize access.
#[derive(Debug, Default)]
pub struct ChartRegistry {
    charts: HashMap<InstrumentId, Chart>,
    generations: u64,
}

impl ChartRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects an instrument for charting with the given aggregator.
    ///
    /// Any existing series or buffered ticks for the instrument are discarded;
    /// a new seed is needed even if nothing changed. Requests from earlier
    /// selections of the instrument become stale.
    pub fn select(&mut self, instrument: InstrumentId, aggregator: BarAggregator) -> SeedRequest {
        self.generations += 1;
        let generation = self.generations;
        debug!(
            %instrument,
            width = %aggregator.width(),
            generation,
            "selecting chart, awaiting seed"
        );
        let request = SeedRequest {
            instrument: instrument.clone(),
            width: aggregator.width(),
            generation,
        };
        self.charts.insert(
            instrument,
            Chart {
                aggregator,
                generation,
                state: ChartState::Seeding {
                    buffered: Vec::new(),
                },
            },
        );
        request
    }

    /// Stops charting an instrument, returning its last series if it was live.
    pub fn deselect(&mut self, instrument: &InstrumentId) -> Option<BarSeries> {
        match self.charts.remove(instrument)?.state {
            ChartState::Live { series } => Some(series),
            ChartState::Seeding { .. } => None,
        }
    }

    /// Routes a tick to its instrument's chart.
    pub fn on_tick(&mut self, tick: PriceTick) -> TickDisposition {
        let Some(chart) = self.charts.get_mut(&tick.instrument) else {
            trace!(instrument = %tick.instrument, "tick for unselected instrument");
            return TickDisposition::Untracked;
        };

        match &mut chart.state {
            ChartState::Seeding { buffered } => {
                buffered.push(tick);
                TickDisposition::Buffered
            }
            ChartState::Live { series } => {
                let (next, outcome) = chart.aggregator.fold_tick(series, &tick);
                log_drop(&tick, outcome);
                *series = next;
                TickDisposition::Folded(outcome)
            }
        }
    }

    /// Installs the historical seed for an instrument and folds buffered ticks.
    ///
    /// # Errors
    ///
    /// Returns an error if the instrument is not awaiting a seed, the request
    /// belongs to an earlier selection, or the seed bars are unordered or
    /// inconsistent. The chart keeps waiting in every case.
    pub fn complete_seed(
        &mut self,
        request: &SeedRequest,
        bars: Vec<Bar>,
    ) -> Result<FoldStats, SeedError> {
        let instrument = &request.instrument;
        let chart = self.awaiting(request)?;

        let seed = BarSeries::seeded(bars)?;
        let seed_len = seed.len();
        let previous = std::mem::replace(&mut chart.state, ChartState::Live { series: seed });
        let buffered = match previous {
            ChartState::Seeding { buffered } => buffered,
            ChartState::Live { .. } => Vec::new(),
        };

        let mut stats = FoldStats::default();
        if let ChartState::Live { series } = &mut chart.state {
            for tick in &buffered {
                let (next, outcome) = chart.aggregator.fold_tick(series, tick);
                log_drop(tick, outcome);
                stats.record(outcome);
                *series = next;
            }
        }

        debug!(
            %instrument,
            seed_bars = seed_len,
            buffered = buffered.len(),
            dropped = stats.dropped(),
            "chart is live"
        );
        Ok(stats)
    }

    /// Abandons a chart whose seed could not be fetched.
    ///
    /// Buffered ticks are discarded and their count returned; the instrument
    /// must be selected again before it is charted.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the registry untouched, if the instrument is
    /// not awaiting a seed or the request belongs to an earlier selection.
    pub fn fail_seed(&mut self, request: &SeedRequest) -> Result<usize, SeedError> {
        let discarded = match &self.awaiting(request)?.state {
            ChartState::Seeding { buffered } => buffered.len(),
            ChartState::Live { .. } => 0,
        };
        let instrument = &request.instrument;
        self.charts.remove(instrument);
        debug!(%instrument, discarded, "seed failed, chart abandoned");
        Ok(discarded)
    }

    /// Returns the chart waiting on `request`.
    fn awaiting(&mut self, request: &SeedRequest) -> Result<&mut Chart, SeedError> {
        let instrument = &request.instrument;
        let chart = self
            .charts
            .get_mut(instrument)
            .filter(|chart| matches!(chart.state, ChartState::Seeding { .. }))
            .ok_or_else(|| SeedError::Untracked(instrument.clone()))?;

        if chart.generation != request.generation {
            let selected = chart.aggregator.width();
            debug!(
                %instrument,
                requested = %request.width,
                %selected,
                "discarding stale seed"
            );
            return Err(SeedError::StaleSelection {
                instrument: instrument.clone(),
                requested: request.width,
                selected,
            });
        }
        Ok(chart)
    }

    /// Returns a snapshot of an instrument's live series.
    #[must_use]
    pub fn series(&self, instrument: &InstrumentId) -> Option<BarSeries> {
        match &self.charts.get(instrument)?.state {
            ChartState::Live { series } => Some(series.clone()),
            ChartState::Seeding { .. } => None,
        }
    }

    /// Returns the aggregator an instrument is charted with.
    #[must_use]
    pub fn aggregator(&self, instrument: &InstrumentId) -> Option<BarAggregator> {
        self.charts.get(instrument).map(|chart| chart.aggregator)
    }

    /// Returns true if the instrument has a seeded series.
    #[must_use]
    pub fn is_live(&self, instrument: &InstrumentId) -> bool {
        matches!(
            self.charts.get(instrument).map(|chart| &chart.state),
            Some(ChartState::Live { .. })
        )
    }

    /// Returns the number of ticks waiting for the instrument's seed.
    #[must_use]
    pub fn buffered_len(&self, instrument: &InstrumentId) -> usize {
        match self.charts.get(instrument).map(|chart| &chart.state) {
            Some(ChartState::Seeding { buffered }) => buffered.len(),
            _ => 0,
        }
    }

    /// Returns the selected instruments.
    pub fn instruments(&self) -> impl Iterator<Item = &InstrumentId> {
        self.charts.keys()
    }

    /// Returns the number of selected instruments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.charts.len()
    }

    /// Returns true if no instrument is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

fn log_drop(tick: &PriceTick, outcome: FoldOutcome) {
    match outcome {
        FoldOutcome::Rejected(reason) => {
            trace!(instrument = %tick.instrument, price = tick.price, %reason, "tick rejected");
        }
        FoldOutcome::Late {
            bucket_start,
            last_bucket_start,
        } => {
            trace!(
                instrument = %tick.instrument,
                bucket_start,
                last_bucket_start,
                "late tick dropped"
            );
        }
        FoldOutcome::Appended | FoldOutcome::Updated => {}
    }
}
