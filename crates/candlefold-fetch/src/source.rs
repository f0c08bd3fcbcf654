//! Seed source abstraction.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use candlefold_aggregate::Bar;
use candlefold_types::{BucketWidth, InstrumentId};

use crate::{FetchError, SeedClient};

/// Anything that can supply the historical bars a chart is seeded with.
#[async_trait]
pub trait SeedSource: Send + Sync {
    /// Fetches ordered bars for an instrument at a bucket width.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be retrieved or decoded.
    async fn fetch_bars(
        &self,
        instrument: &InstrumentId,
        width: BucketWidth,
    ) -> Result<Vec<Bar>, FetchError>;
}

#[async_trait]
impl SeedSource for SeedClient {
    async fn fetch_bars(
        &self,
        instrument: &InstrumentId,
        width: BucketWidth,
    ) -> Result<Vec<Bar>, FetchError> {
        Self::fetch_bars(self, instrument, width).await
    }
}

/// Reads seed bars from JSON files in a directory.
///
/// Files are named `{instrument}-{seconds}.json` and hold a JSON bar array.
/// A missing file is an empty history.
#[derive(Debug, Clone)]
pub struct FileSeedSource {
    dir: PathBuf,
}

impl FileSeedSource {
    /// Creates a source reading from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory seeds are read from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the seed file path for an instrument and width.
    #[must_use]
    pub fn path_for(&self, instrument: &InstrumentId, width: BucketWidth) -> PathBuf {
        self.dir
            .join(format!("{}-{}.json", instrument, width.seconds()))
    }
}

#[async_trait]
impl SeedSource for FileSeedSource {
    async fn fetch_bars(
        &self,
        instrument: &InstrumentId,
        width: BucketWidth,
    ) -> Result<Vec<Bar>, FetchError> {
        let path = self.path_for(instrument, width);
        match tokio::fs::read(&path).await {
            Ok(body) => Ok(serde_json::from_slice(&body)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_source_reads_bars() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("btcusdt-3600.json"),
            r#"[{"time":0,"open":1.0,"high":1.0,"low":1.0,"close":1.0}]"#,
        )
        .unwrap();

        let source = FileSeedSource::new(dir.path());
        let bars = source
            .fetch_bars(&InstrumentId::new("BTCUSDT"), BucketWidth::HOUR)
            .await
            .unwrap();
        assert_eq!(bars, vec![Bar::opened_at(0, 1.0)]);
    }

    #[tokio::test]
    async fn test_file_source_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let source = FileSeedSource::new(dir.path());
        let bars = source
            .fetch_bars(&InstrumentId::new("btcusdt"), BucketWidth::DAY)
            .await
            .unwrap();
        assert!(bars.is_empty());
    }

    #[tokio::test]
    async fn test_file_source_bad_json() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("btcusdt-86400.json"), "not json").unwrap();

        let source = FileSeedSource::new(dir.path());
        let err = source
            .fetch_bars(&InstrumentId::new("btcusdt"), BucketWidth::DAY)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
