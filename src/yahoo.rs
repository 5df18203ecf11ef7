use crate::config::DashboardConfig;
use crate::error::{FetchError, Result};
use crate::fetcher::{HistoryPoint, QuoteSource};
use crate::watchlist::Lookback;
use chrono::DateTime;
use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;

// ────────────────────────────────────────────────
// Chart document
// ────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Blocking client for the chart endpoint. One instance is shared by every thread.
// ────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chart(&self, symbol: &str, range: &str) -> Result<Vec<HistoryPoint>> {
        let url = format!("{}/{}?interval=1d&range={}", self.base_url, symbol, range);
        debug!("GET {}", url);

        let response = self.client.get(&url).send()?;
        let status = response.status();
        let body = response.text()?;

        // Yahoo reports unknown symbols as 404 with a JSON error body.
        match parse_chart(symbol, &body) {
            Err(FetchError::Decode(_)) if !status.is_success() => Err(FetchError::Status {
                symbol: symbol.to_string(),
                status: status.as_u16(),
            }),
            other => other,
        }
    }
}

impl QuoteSource for YahooClient {
    fn latest_close(&self, symbol: &str) -> Result<f64> {
        let points = self.chart(symbol, "1d")?;
        points
            .last()
            .map(|p| p.close)
            .ok_or_else(|| FetchError::EmptySeries(symbol.to_string()))
    }

    fn history(&self, symbol: &str, lookback: Lookback) -> Result<Vec<HistoryPoint>> {
        self.chart(symbol, &lookback.range_param())
    }
}

/// Decode a chart document into closes aligned with their timestamps.
///
/// Null closes (halted sessions, the still-open bar) are skipped.
pub(crate) fn parse_chart(symbol: &str, body: &str) -> Result<Vec<HistoryPoint>> {
    let envelope: ChartEnvelope = serde_json::from_str(body)?;

    if let Some(error) = envelope.chart.error {
        let message = error
            .description
            .or(error.code)
            .unwrap_or_else(|| "unknown provider error".to_string());
        return Err(FetchError::Provider {
            symbol: symbol.to_string(),
            message,
        });
    }

    let result = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| FetchError::EmptySeries(symbol.to_string()))?;

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    let points: Vec<HistoryPoint> = result
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let close = close?;
            let timestamp = DateTime::from_timestamp(*ts, 0)?;
            Some(HistoryPoint { timestamp, close })
        })
        .collect();

    if points.is_empty() {
        return Err(FetchError::EmptySeries(symbol.to_string()));
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AAPL_CHART: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"currency": "USD", "symbol": "AAPL", "regularMarketPrice": 151.0},
                "timestamp": [1704207600, 1704294000, 1704380400],
                "indicators": {
                    "quote": [{
                        "open": [185.0, 184.2, 182.1],
                        "close": [185.64, null, 181.91]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    const UNKNOWN_SYMBOL: &str = r#"{
        "chart": {
            "result": null,
            "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
        }
    }"#;

    #[test]
    fn test_parse_chart_skips_null_closes() {
        let points = parse_chart("AAPL", AAPL_CHART).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].close, 185.64);
        assert_eq!(points[1].close, 181.91);
        assert_eq!(points[0].timestamp.timestamp(), 1704207600);
        assert!(points[0].timestamp < points[1].timestamp);
    }

    #[test]
    fn test_parse_chart_provider_error() {
        match parse_chart("NOPE", UNKNOWN_SYMBOL) {
            Err(FetchError::Provider { symbol, message }) => {
                assert_eq!(symbol, "NOPE");
                assert!(message.contains("delisted"));
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_chart_empty_series() {
        let body = r#"{"chart": {"result": [{"timestamp": [], "indicators": {"quote": [{"close": []}]}}], "error": null}}"#;
        assert!(matches!(
            parse_chart("AAPL", body),
            Err(FetchError::EmptySeries(_))
        ));

        let no_quote = r#"{"chart": {"result": [{"indicators": {"quote": []}}], "error": null}}"#;
        assert!(matches!(
            parse_chart("AAPL", no_quote),
            Err(FetchError::EmptySeries(_))
        ));
    }

    #[test]
    fn test_parse_chart_rejects_garbage() {
        assert!(matches!(
            parse_chart("AAPL", "<html>rate limited</html>"),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn test_client_builds_from_default_config() {
        let client = YahooClient::new(&DashboardConfig::default()).unwrap();
        assert!(client.base_url.ends_with("/chart"));
    }
}
