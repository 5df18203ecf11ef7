use crate::fetcher::{HistoryPoint, QuoteFetcher};
use crate::watchlist::Lookback;
use log::info;

pub const X_LABEL: &str = "Date";
pub const Y_LABEL: &str = "Closing Price (USD)";
pub const NO_DATA: &str = "No Data Available";

/// A fully prepared line plot of daily closes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPlot {
    pub title: String,
    pub legend: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub points: Vec<HistoryPoint>,
    pub min_close: f64,
    pub max_close: f64,
}

impl ChartPlot {
    /// `None` for an empty series.
    pub fn new(symbol: &str, display_name: &str, lookback: Lookback, points: Vec<HistoryPoint>) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let (min_close, max_close) = points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), p| (lo.min(p.close), hi.max(p.close)),
        );
        let years = lookback.years();
        Some(Self {
            title: format!("{} - Daily Closing Prices ({} Year)", display_name, years),
            legend: format!("{} - {} Year", symbol, years),
            x_label: X_LABEL,
            y_label: Y_LABEL,
            points,
            min_close,
            max_close,
        })
    }
}

/// What the chart surface shows. Each render replaces the previous view whole.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartView {
    Plot(ChartPlot),
    NoData,
}

impl ChartView {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ChartView::NoData)
    }
}

#[derive(Clone)]
pub struct ChartRenderer {
    fetcher: QuoteFetcher,
}

impl ChartRenderer {
    pub fn new(fetcher: QuoteFetcher) -> Self {
        Self { fetcher }
    }

    pub fn render(&self, symbol: &str, display_name: &str, lookback: Lookback) -> ChartView {
        let points = self.fetcher.fetch_history(symbol, lookback);
        let count = points.len();
        match ChartPlot::new(symbol, display_name, lookback, points) {
            Some(plot) => {
                info!("Charting {} closes for {} ({} Year)", count, symbol, lookback.years());
                ChartView::Plot(plot)
            }
            None => {
                info!("No history for {} ({} Year)", symbol, lookback.years());
                ChartView::NoData
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::tests::{FakeSource, point};
    use std::sync::Arc;

    fn renderer_with_history(symbol: &str, points: Vec<HistoryPoint>) -> ChartRenderer {
        let mut source = FakeSource::default();
        source.history.insert(symbol.to_string(), points);
        ChartRenderer::new(QuoteFetcher::new(Arc::new(source)))
    }

    #[test]
    fn test_render_plot_labels() {
        let renderer = renderer_with_history("AAPL", vec![point(1, 150.0), point(2, 155.5), point(3, 149.0)]);
        match renderer.render("AAPL", "AAPL - Apple", Lookback::FiveYears) {
            ChartView::Plot(plot) => {
                assert_eq!(plot.title, "AAPL - Apple - Daily Closing Prices (5 Year)");
                assert_eq!(plot.legend, "AAPL - 5 Year");
                assert_eq!(plot.x_label, "Date");
                assert_eq!(plot.y_label, "Closing Price (USD)");
                assert_eq!(plot.points.len(), 3);
                assert_eq!(plot.min_close, 149.0);
                assert_eq!(plot.max_close, 155.5);
            }
            ChartView::NoData => panic!("expected a plot"),
        }
    }

    #[test]
    fn test_empty_history_shows_placeholder() {
        let renderer = renderer_with_history("AAPL", Vec::new());
        assert!(renderer.render("AAPL", "AAPL - Apple", Lookback::OneYear).is_placeholder());
        // Fetch failure (unknown symbol) degrades the same way.
        assert!(renderer.render("MSFT", "MSFT - Microsoft", Lookback::OneYear).is_placeholder());
    }

    #[test]
    fn test_non_empty_history_never_shows_placeholder() {
        let renderer = renderer_with_history("AAPL", vec![point(1, 1.0)]);
        assert!(!renderer.render("AAPL", "AAPL - Apple", Lookback::TenYears).is_placeholder());
    }
}
