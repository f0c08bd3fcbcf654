//! Tick and seed file readers.

use candlefold_aggregate::Bar;
use candlefold_types::PriceTick;
use csv::{Position, StringRecord, Trim};
use std::io::{BufRead, Read};

use crate::FormatError;

/// Reads one JSON tick per line.
///
/// Blank lines are skipped. Line numbers in errors are one-based and count
/// blank lines.
///
/// # Errors
///
/// Returns [`FormatError::Input`] for the first malformed line, or an I/O
/// error if reading fails.
pub fn read_ticks_ndjson<R: BufRead>(reader: R) -> Result<Vec<PriceTick>, FormatError> {
    let mut ticks = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let tick = serde_json::from_str(&line).map_err(|e| FormatError::Input {
            line: index + 1,
            message: e.to_string(),
        })?;
        ticks.push(tick);
    }
    Ok(ticks)
}

/// Reads `instrument,price,timestamp` rows.
///
/// Fields may be quoted and are trimmed. A first row whose first field is
/// `instrument` is treated as a header. Prices are parsed as written, so
/// `NaN` or `-1` survive here and are left for the aggregator to reject.
///
/// # Errors
///
/// Returns [`FormatError::Input`] for a row with the wrong field count or an
/// unparseable field, or an I/O error if reading fails.
pub fn read_ticks_csv<R: Read>(reader: R) -> Result<Vec<PriceTick>, FormatError> {
    let mut rows = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut ticks = Vec::new();
    let mut record = StringRecord::new();
    let mut first = true;
    while rows.read_record(&mut record).map_err(csv_error)? {
        let is_header = first
            && record
                .get(0)
                .is_some_and(|field| field.eq_ignore_ascii_case("instrument"));
        first = false;
        if is_header {
            continue;
        }
        if record.len() != 3 {
            return Err(FormatError::Input {
                line: line_of(record.position()),
                message: format!("expected 3 fields, found {}", record.len()),
            });
        }
        let tick = record
            .deserialize::<PriceTick>(None)
            .map_err(|e| FormatError::Input {
                line: line_of(record.position()),
                message: e.to_string(),
            })?;
        ticks.push(tick);
    }
    Ok(ticks)
}

fn line_of(position: Option<&Position>) -> usize {
    position.map_or(0, |pos| usize::try_from(pos.line()).unwrap_or(usize::MAX))
}

fn csv_error(e: csv::Error) -> FormatError {
    let line = line_of(e.position());
    let message = e.to_string();
    match e.into_kind() {
        csv::ErrorKind::Io(io) => FormatError::Io(io),
        _ => FormatError::Input { line, message },
    }
}

/// Reads a JSON array of bars, as served by a seed endpoint.
///
/// Ordering and consistency are not checked here; seeding validates them.
///
/// # Errors
///
/// Returns [`FormatError::Input`] if the document is not an array of bars,
/// or an I/O error if reading fails.
pub fn read_bars_json<R: Read>(reader: R) -> Result<Vec<Bar>, FormatError> {
    serde_json::from_reader(reader).map_err(|e| {
        if e.is_io() {
            FormatError::Io(e.into())
        } else {
            FormatError::Input {
                line: e.line(),
                message: e.to_string(),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_read_ticks_ndjson() {
        let input = "{\"instrument\":\"BTCUSDT\",\"price\":100.5,\"timestamp\":1000}\n\n\
{\"instrument\":\"btcusdt\",\"price\":101,\"timestamp\":2000}\n";
        let ticks = read_ticks_ndjson(input.as_bytes()).unwrap();

        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[0].instrument.as_str(), "btcusdt");
        assert_relative_eq!(ticks[1].price, 101.0);
    }

    #[test]
    fn test_read_ticks_ndjson_reports_line() {
        let input = "{\"instrument\":\"a\",\"price\":1,\"timestamp\":0}\n\n{oops}\n";
        let err = read_ticks_ndjson(input.as_bytes()).unwrap_err();
        assert!(matches!(err, FormatError::Input { line: 3, .. }));
    }

    #[test]
    fn test_read_ticks_csv() {
        let input = "instrument,price,timestamp\nethusdt, 2500.25 ,1700000000000\nethusdt,NaN,1700000001000\n";
        let ticks = read_ticks_csv(input.as_bytes()).unwrap();

        assert_eq!(ticks.len(), 2);
        assert_eq!(ticks[0].timestamp_ms, 1_700_000_000_000);
        assert_relative_eq!(ticks[0].price, 2500.25);
        assert!(ticks[1].price.is_nan());
    }

    #[test]
    fn test_read_ticks_csv_without_header() {
        let ticks = read_ticks_csv("x,1,2\n".as_bytes()).unwrap();
        assert_eq!(ticks[0].instrument.as_str(), "x");
    }

    #[test]
    fn test_read_ticks_csv_quoted_fields() {
        let input = "\"instrument\",\"price\",\"timestamp\"\n\"btcusdt\",1.5,1000\n\"BTCUSDT\",\"1.5\",\"2000\"\n";
        let ticks = read_ticks_csv(input.as_bytes()).unwrap();

        assert_eq!(ticks.len(), 2);
        for tick in &ticks {
            assert_eq!(tick.instrument.as_str(), "btcusdt");
            assert_relative_eq!(tick.price, 1.5);
        }
        assert_eq!(ticks[1].timestamp_ms, 2_000);

        let ticks = read_ticks_csv("\"btc,usdt\",2,3\n".as_bytes()).unwrap();
        assert_eq!(ticks[0].instrument.as_str(), "btc,usdt");
    }

    #[test]
    fn test_read_ticks_csv_errors() {
        let err = read_ticks_csv("x,1\n".as_bytes()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid input on line 1: expected 3 fields, found 2"
        );

        let err = read_ticks_csv("x,1,2\n\ny,1,soon\n".as_bytes()).unwrap_err();
        assert!(matches!(err, FormatError::Input { line: 3, .. }));
    }

    #[test]
    fn test_read_bars_json() {
        let input = r#"[{"time":0,"open":1,"high":2,"low":0.5,"close":1.5}]"#;
        let bars = read_bars_json(input.as_bytes()).unwrap();
        assert_eq!(bars, vec![Bar::new(0, 1.0, 2.0, 0.5, 1.5)]);

        assert!(matches!(
            read_bars_json("{}".as_bytes()),
            Err(FormatError::Input { .. })
        ));
    }
}
