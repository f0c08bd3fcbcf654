//! NDJSON tick feed decoding.

use candlefold_types::PriceTick;
use futures::stream::{self, Stream};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Errors produced while reading a tick feed.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Reading from the feed failed.
    #[error("Feed I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line was not a valid tick.
    #[error("Invalid tick on line {line}: {source}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}

impl FeedError {
    /// Returns true if the feed can keep being read after this error.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

/// Decodes one [`PriceTick`] per line from an async reader.
///
/// Blank lines are skipped. A malformed line yields an error item and the
/// stream continues with the next line. An I/O error ends the stream after
/// being yielded.
pub fn tick_lines<R>(reader: R) -> impl Stream<Item = Result<PriceTick, FeedError>>
where
    R: AsyncBufRead + Unpin,
{
    stream::unfold(Some((reader.lines(), 0usize)), |state| async move {
        let (mut lines, mut line_no) = state?;
        loop {
            line_no += 1;
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => {
                    let item = serde_json::from_str::<PriceTick>(&line).map_err(|source| {
                        FeedError::Parse {
                            line: line_no,
                            source,
                        }
                    });
                    return Some((item, Some((lines, line_no))));
                }
                Ok(None) => return None,
                Err(e) => return Some((Err(e.into()), None)),
            }
        }
    })
}
