//! Bar history URL construction.

use candlefold_types::{BucketWidth, InstrumentId};

/// Default base URL for the exchange's bar history endpoint.
pub const BASE_URL: &str = "http://localhost:8080/api";

/// Builds the URL for an instrument's bar history at a bucket width.
///
/// URL format: `{base}/bars?symbol={SYMBOL}&interval={SECONDS}`
///
/// # Example
///
/// ```
/// use candlefold_fetch::url::bars_url;
/// use candlefold_types::{BucketWidth, InstrumentId};
///
/// let url = bars_url("https://api.example.com/v1", &InstrumentId::new("btcusdt"), BucketWidth::HOUR);
/// assert_eq!(url, "https://api.example.com/v1/bars?symbol=BTCUSDT&interval=3600");
/// ```
#[must_use]
pub fn bars_url(base: &str, instrument: &InstrumentId, width: BucketWidth) -> String {
    format!(
        "{}/bars?symbol={}&interval={}",
        base.trim_end_matches('/'),
        instrument.symbol(),
        width.seconds()
    )
}
