//! The fixed watchlist and the selectable lookback windows.
use strum::{Display, EnumIter};

/// Symbols tracked by the banner and offered in the symbol dropdown.
pub const WATCHLIST: &[(&str, &str)] = &[
    ("AAPL", "AAPL - Apple"),
    ("ADBE", "ADBE - Adobe"),
    ("AMD", "AMD - Advanced Micro Devices"),
    ("AMZN", "AMZN - Amazon"),
    ("ARM", "ARM - ARM Holdings"),
    ("AVGO", "AVGO - Broadcom"),
    ("BABA", "BABA - Alibaba"),
    ("CSCO", "CSCO - Cisco"),
    ("GOOG", "GOOG - Alphabet (Google)"),
    ("IBM", "IBM - International Business Machines"),
    ("INTC", "INTC - Intel"),
    ("META", "META - Meta (Facebook)"),
    ("MSFT", "MSFT - Microsoft"),
    ("NFLX", "NFLX - Netflix"),
    ("NVDA", "NVDA - Nvidia"),
    ("ORCL", "ORCL - Oracle"),
    ("PYPL", "PYPL - PayPal"),
    ("QCOM", "QCOM - QUALCOMM"),
    ("RBLX", "RBLX - Roblox"),
    ("SHOP", "SHOP - Shopify"),
    ("T", "T - AT&T"),
    ("TMUS", "TMUS - T-Mobile US"),
    ("TSLA", "TSLA - Tesla"),
    ("TSM", "TSM - Taiwan Semiconductor Manufacturing"),
    ("TX", "TX - Texas Instruments"),
    ("VZ", "VZ - Verizon Communications"),
];

/// One tracked equity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WatchlistEntry {
    pub symbol: String,
    pub display_name: String,
}

impl WatchlistEntry {
    pub fn new(symbol: &str, display_name: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            display_name: display_name.to_string(),
        }
    }
}

/// Ordered, immutable list of tracked equities.
#[derive(Debug, Clone)]
pub struct Watchlist {
    entries: Vec<WatchlistEntry>,
}

impl Watchlist {
    /// Build a watchlist from a `(symbol, display name)` table, keeping its order.
    /// Later duplicates of a symbol are ignored.
    pub fn from_table(table: &[(&str, &str)]) -> Self {
        let mut entries: Vec<WatchlistEntry> = Vec::with_capacity(table.len());
        for (symbol, name) in table {
            if entries.iter().any(|e| e.symbol == *symbol) {
                continue;
            }
            entries.push(WatchlistEntry::new(symbol, name));
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&WatchlistEntry> {
        self.entries.get(index)
    }

    pub fn position(&self, symbol: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.symbol == symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn display_names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.display_name.clone()).collect()
    }
}

impl Default for Watchlist {
    fn default() -> Self {
        Self::from_table(WATCHLIST)
    }
}

/// Historical window offered in the lookback dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter)]
pub enum Lookback {
    #[default]
    #[strum(serialize = "1")]
    OneYear,
    #[strum(serialize = "2")]
    TwoYears,
    #[strum(serialize = "5")]
    FiveYears,
    #[strum(serialize = "10")]
    TenYears,
}

impl Lookback {
    pub fn years(self) -> u32 {
        match self {
            Lookback::OneYear => 1,
            Lookback::TwoYears => 2,
            Lookback::FiveYears => 5,
            Lookback::TenYears => 10,
        }
    }

    /// Provider `range` parameter for this window, e.g. `5y`.
    pub fn range_param(self) -> String {
        format!("{}y", self.years())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_default_watchlist_keeps_table_order() {
        let watchlist = Watchlist::default();
        assert_eq!(watchlist.len(), WATCHLIST.len());
        assert_eq!(watchlist.get(0).map(|e| e.symbol.as_str()), Some("AAPL"));
        assert_eq!(watchlist.position("VZ"), Some(WATCHLIST.len() - 1));
    }

    #[test]
    fn test_every_display_name_carries_its_symbol() {
        for entry in Watchlist::default().entries() {
            assert!(
                entry.display_name.starts_with(&format!("{} - ", entry.symbol)),
                "{} has display name {}",
                entry.symbol,
                entry.display_name
            );
        }
    }

    #[test]
    fn test_duplicate_symbols_are_ignored() {
        let watchlist = Watchlist::from_table(&[("AAPL", "AAPL - Apple"), ("AAPL", "Other")]);
        assert_eq!(watchlist.len(), 1);
        assert_eq!(watchlist.entries()[0].display_name, "AAPL - Apple");
    }

    #[test]
    fn test_lookback_options() {
        let years: Vec<u32> = Lookback::iter().map(Lookback::years).collect();
        assert_eq!(years, vec![1, 2, 5, 10]);
        assert_eq!(Lookback::default(), Lookback::OneYear);
        assert_eq!(Lookback::FiveYears.to_string(), "5");
        assert_eq!(Lookback::TenYears.range_param(), "10y");
    }
}
