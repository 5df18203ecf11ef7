//! StockStream: scrolling watchlist ticker and closing-price chart.
pub mod batch;
pub mod chart;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod refresh;
pub mod selection;
pub mod tasks;
pub mod ticker;
pub mod ui;
pub mod watchlist;
pub mod yahoo;

pub use config::DashboardConfig;
pub use error::{FetchError, Result};
pub use fetcher::{HistoryPoint, QuoteFetcher, QuoteSource};
pub use watchlist::{Lookback, Watchlist, WatchlistEntry};
pub use yahoo::YahooClient;
