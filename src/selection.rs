use crate::chart::{ChartRenderer, ChartView};
use crate::fetcher::QuoteFetcher;
use crate::watchlist::{Lookback, Watchlist, WatchlistEntry};
use log::{info, warn};

/// Current dropdown state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// Index into the watchlist.
    pub index: usize,
    pub lookback: Lookback,
}

/// Price label text for a selection.
pub fn price_label(display_name: &str, price: Option<&str>) -> String {
    match price {
        Some(price) => format!("{}: {}", display_name, price),
        None => format!("{}: Error fetching data", display_name),
    }
}

pub struct SelectionController {
    fetcher: QuoteFetcher,
    renderer: ChartRenderer,
    watchlist: Watchlist,
    selection: Selection,
    price_label: String,
    chart: ChartView,
}

impl SelectionController {
    pub fn new(fetcher: QuoteFetcher, watchlist: Watchlist) -> Self {
        let price_label = watchlist
            .get(0)
            .map(|e| format!("{}: Loading...", e.display_name))
            .unwrap_or_default();
        Self {
            renderer: ChartRenderer::new(fetcher.clone()),
            fetcher,
            watchlist,
            selection: Selection::default(),
            price_label,
            chart: ChartView::NoData,
        }
    }

    /// Fetch the default symbol's price and render its chart once.
    pub fn initialize(&mut self) {
        self.refresh_price();
        self.refresh_chart();
    }

    /// Handle a pick in the symbol dropdown. Returns `false` for an unknown index.
    pub fn select_symbol(&mut self, index: usize) -> bool {
        let Some(entry) = self.watchlist.get(index) else {
            warn!("Ignoring selection of unknown watchlist index {}", index);
            return false;
        };
        info!("Selected {}", entry.display_name);
        self.selection.index = index;
        self.refresh_price();
        self.refresh_chart();
        true
    }

    /// Handle a pick in the lookback dropdown.
    pub fn select_lookback(&mut self, lookback: Lookback) {
        info!("Selected lookback {} Year", lookback.years());
        self.selection.lookback = lookback;
        self.refresh_chart();
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn current_entry(&self) -> Option<&WatchlistEntry> {
        self.watchlist.get(self.selection.index)
    }

    pub fn price_label(&self) -> &str {
        &self.price_label
    }

    pub fn chart(&self) -> &ChartView {
        &self.chart
    }

    fn refresh_price(&mut self) {
        let Some(entry) = self.watchlist.get(self.selection.index) else {
            return;
        };
        let price = self.fetcher.fetch_latest(&entry.symbol);
        self.price_label = price_label(&entry.display_name, price.as_deref());
    }

    fn refresh_chart(&mut self) {
        let Some(entry) = self.watchlist.get(self.selection.index) else {
            self.chart = ChartView::NoData;
            return;
        };
        self.chart = self
            .renderer
            .render(&entry.symbol, &entry.display_name, self.selection.lookback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::tests::{FakeSource, point};
    use std::sync::Arc;

    fn controller() -> SelectionController {
        let mut source = FakeSource::with_prices(&[("AAPL", 150.25)]);
        source
            .history
            .insert("AAPL".to_string(), vec![point(1, 149.0), point(2, 150.25)]);
        let watchlist = Watchlist::from_table(&[("AAPL", "AAPL - Apple"), ("MSFT", "MSFT - Microsoft")]);
        SelectionController::new(QuoteFetcher::new(Arc::new(source)), watchlist)
    }

    #[test]
    fn test_price_label() {
        assert_eq!(price_label("AAPL - Apple", Some("$150.25")), "AAPL - Apple: $150.25");
        assert_eq!(price_label("MSFT - Microsoft", None), "MSFT - Microsoft: Error fetching data");
    }

    #[test]
    fn test_initialize_loads_default_selection() {
        let mut controller = controller();
        assert_eq!(controller.price_label(), "AAPL - Apple: Loading...");
        assert!(controller.chart().is_placeholder());

        controller.initialize();
        assert_eq!(controller.price_label(), "AAPL - Apple: $150.25");
        assert!(!controller.chart().is_placeholder());
        assert_eq!(controller.selection(), Selection::default());
    }

    #[test]
    fn test_select_failing_symbol() {
        let mut controller = controller();
        controller.initialize();

        assert!(controller.select_symbol(1));
        assert_eq!(controller.price_label(), "MSFT - Microsoft: Error fetching data");
        assert!(controller.chart().is_placeholder());
        assert_eq!(controller.current_entry().map(|e| e.symbol.as_str()), Some("MSFT"));
    }

    #[test]
    fn test_select_lookback_rerenders_chart() {
        let mut controller = controller();
        controller.initialize();
        controller.select_lookback(Lookback::TwoYears);

        assert_eq!(controller.selection().lookback, Lookback::TwoYears);
        match controller.chart() {
            ChartView::Plot(plot) => assert_eq!(plot.legend, "AAPL - 2 Year"),
            ChartView::NoData => panic!("expected a plot"),
        }
    }

    #[test]
    fn test_unknown_index_is_ignored() {
        let mut controller = controller();
        controller.initialize();
        assert!(!controller.select_symbol(99));
        assert_eq!(controller.selection().index, 0);
        assert_eq!(controller.price_label(), "AAPL - Apple: $150.25");
    }
}
