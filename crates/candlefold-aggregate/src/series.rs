//! Immutable ordered bar sequence.

use std::sync::Arc;

use candlefold_types::SeedError;

use crate::Bar;

/// Ordered sequence of bars with strictly increasing bucket starts.
///
/// Cloning is cheap and yields a snapshot: updates produce a new series and
/// never disturb readers of an older one. Storage is shared until the first
/// update after a clone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarSeries {
    bars: Arc<Vec<Bar>>,
}

impl BarSeries {
    /// Creates an empty series.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a series from historical bars.
    ///
    /// # Errors
    ///
    /// Returns an error if bucket starts are not strictly increasing or a bar
    /// has inconsistent prices.
    pub fn seeded(bars: Vec<Bar>) -> Result<Self, SeedError> {
        for (index, bar) in bars.iter().enumerate() {
            if !bar.is_consistent() {
                return Err(SeedError::Inconsistent { index });
            }
            if index > 0 {
                let previous = bars[index - 1].bucket_start;
                if bar.bucket_start <= previous {
                    return Err(SeedError::Unordered {
                        index,
                        previous,
                        current: bar.bucket_start,
                    });
                }
            }
        }
        Ok(Self {
            bars: Arc::new(bars),
        })
    }

    /// Returns the bars as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Bar] {
        &self.bars
    }

    /// Returns the most recent bar.
    #[must_use]
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Returns the number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Returns true if the series holds no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Returns an iterator over the bars in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Bar> {
        self.bars.iter()
    }

    /// Returns a new series with `bar` appended.
    pub(crate) fn appended(&self, bar: Bar) -> Self {
        let mut next = self.clone();
        Arc::make_mut(&mut next.bars).push(bar);
        next
    }

    /// Returns a new series with the last bar replaced by `bar`.
    pub(crate) fn with_last(&self, bar: Bar) -> Self {
        let mut next = self.clone();
        let bars = Arc::make_mut(&mut next.bars);
        match bars.last_mut() {
            Some(last) => *last = bar,
            None => bars.push(bar),
        }
        next
    }
}

impl<'a> IntoIterator for &'a BarSeries {
    type Item = &'a Bar;
    type IntoIter = std::slice::Iter<'a, Bar>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<BarSeries> for Vec<Bar> {
    fn from(series: BarSeries) -> Self {
        Arc::unwrap_or_clone(series.bars)
    }
}
