//! Quote fetching. Failures are logged and become absent values.
use crate::error::{FetchError, Result};
use crate::watchlist::Lookback;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::sync::Arc;

/// One daily close.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

/// Latest formatted price for a symbol, or `None` when the fetch failed.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotePoint {
    pub symbol: String,
    pub formatted_price: Option<String>,
}

/// Remote market-data provider.
pub trait QuoteSource: Send + Sync {
    /// Last closing value of the most recent trading session.
    fn latest_close(&self, symbol: &str) -> Result<f64>;

    /// Daily closes over the trailing `lookback` window, oldest first.
    fn history(&self, symbol: &str, lookback: Lookback) -> Result<Vec<HistoryPoint>>;
}

/// Cheap to clone; clones share the underlying source.
#[derive(Clone)]
pub struct QuoteFetcher {
    source: Arc<dyn QuoteSource>,
}

impl QuoteFetcher {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }

    /// Formatted latest price, e.g. `$1,234.50`, or `None` on any failure.
    pub fn fetch_latest(&self, symbol: &str) -> Option<String> {
        match self.source.latest_close(symbol) {
            Ok(price) => {
                debug!("Latest close for {}: {}", symbol, price);
                Some(format_usd(price))
            }
            Err(e) => {
                warn!("Error fetching data for {}: {}", symbol, e);
                None
            }
        }
    }

    pub fn fetch_quote(&self, symbol: &str) -> QuotePoint {
        QuotePoint {
            symbol: symbol.to_string(),
            formatted_price: self.fetch_latest(symbol),
        }
    }

    /// Daily closes in ascending time order; empty on any failure.
    pub fn fetch_history(&self, symbol: &str, lookback: Lookback) -> Vec<HistoryPoint> {
        match self.source.history(symbol, lookback) {
            Ok(mut points) => {
                if points.is_empty() {
                    warn!(
                        "Error fetching historical data for {}: {}",
                        symbol,
                        FetchError::EmptySeries(symbol.to_string())
                    );
                }
                points.sort_by_key(|p| p.timestamp);
                points
            }
            Err(e) => {
                warn!("Error fetching historical data for {}: {}", symbol, e);
                Vec::new()
            }
        }
    }
}

/// Format a price as US dollars with two decimals and thousands separators.
pub fn format_usd(price: f64) -> String {
    let fixed = format!("{:.2}", price.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if price < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, cents)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashMap;

    /// In-memory source: symbols missing from `prices` fail.
    #[derive(Default)]
    pub(crate) struct FakeSource {
        pub prices: HashMap<String, f64>,
        pub history: HashMap<String, Vec<HistoryPoint>>,
    }

    impl FakeSource {
        pub fn with_prices(prices: &[(&str, f64)]) -> Self {
            Self {
                prices: prices.iter().map(|(s, p)| (s.to_string(), *p)).collect(),
                history: HashMap::new(),
            }
        }
    }

    impl QuoteSource for FakeSource {
        fn latest_close(&self, symbol: &str) -> Result<f64> {
            self.prices.get(symbol).copied().ok_or_else(|| FetchError::Provider {
                symbol: symbol.to_string(),
                message: "No data found, symbol may be delisted".to_string(),
            })
        }

        fn history(&self, symbol: &str, _lookback: Lookback) -> Result<Vec<HistoryPoint>> {
            self.history
                .get(symbol)
                .cloned()
                .ok_or_else(|| FetchError::EmptySeries(symbol.to_string()))
        }
    }

    pub(crate) fn point(day: u32, close: f64) -> HistoryPoint {
        HistoryPoint {
            timestamp: Utc.with_ymd_and_hms(2024, 1, day, 21, 0, 0).unwrap(),
            close,
        }
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(1234.5), "$1,234.50");
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(150.25), "$150.25");
        assert_eq!(format_usd(999.999), "$1,000.00");
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
        assert_eq!(format_usd(-42.1), "-$42.10");
    }

    #[test]
    fn test_fetch_latest_fails_soft() {
        let fetcher = QuoteFetcher::new(Arc::new(FakeSource::with_prices(&[("AAPL", 150.25)])));
        assert_eq!(fetcher.fetch_latest("AAPL").as_deref(), Some("$150.25"));
        assert_eq!(fetcher.fetch_latest("MSFT"), None);

        let quote = fetcher.fetch_quote("MSFT");
        assert_eq!(quote.symbol, "MSFT");
        assert!(quote.formatted_price.is_none());
    }

    #[test]
    fn test_fetch_history_sorted_and_empty_on_error() {
        let mut source = FakeSource::default();
        source
            .history
            .insert("AAPL".to_string(), vec![point(3, 12.0), point(1, 10.0), point(2, 11.0)]);
        let fetcher = QuoteFetcher::new(Arc::new(source));

        let closes: Vec<f64> = fetcher
            .fetch_history("AAPL", Lookback::OneYear)
            .iter()
            .map(|p| p.close)
            .collect();
        assert_eq!(closes, vec![10.0, 11.0, 12.0]);
        assert!(fetcher.fetch_history("MSFT", Lookback::TenYears).is_empty());
    }
}
