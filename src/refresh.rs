//! Periodic banner refresh across the whole watchlist.
use crate::batch::run_bounded_while;
use crate::fetcher::{QuoteFetcher, QuotePoint};
use crate::tasks::ShutdownSignal;
use crate::ticker::{TickerState, assemble_banner};
use crate::watchlist::Watchlist;
use chrono::{DateTime, Utc};
use crossbeam_channel::{Sender, TrySendError};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Summary of one completed refresh cycle, sent to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshEvent {
    pub cycle: u64,
    pub completed_at: DateTime<Utc>,
    pub quoted: usize,
    pub total: usize,
}

pub struct PriceRefresher {
    fetcher: QuoteFetcher,
    watchlist: Watchlist,
    state: Arc<TickerState>,
    max_in_flight: usize,
    events: Option<Sender<RefreshEvent>>,
}

impl PriceRefresher {
    pub fn new(
        fetcher: QuoteFetcher,
        watchlist: Watchlist,
        state: Arc<TickerState>,
        max_in_flight: usize,
    ) -> Self {
        Self {
            fetcher,
            watchlist,
            state,
            max_in_flight,
            events: None,
        }
    }

    /// Report each finished cycle on `events`. A full channel drops the report.
    pub fn with_events(mut self, events: Sender<RefreshEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Fetch every watchlist quote, in watchlist order.
    pub fn fetch_quotes(&self) -> Vec<QuotePoint> {
        self.fetch_quotes_while(|| true).into_iter().flatten().collect()
    }

    fn fetch_quotes_while<C>(&self, keep_going: C) -> Vec<Option<QuotePoint>>
    where
        C: Fn() -> bool + Sync,
    {
        let symbols: Vec<&str> = self
            .watchlist
            .entries()
            .iter()
            .map(|e| e.symbol.as_str())
            .collect();
        run_bounded_while(&symbols, self.max_in_flight, keep_going, |symbol| {
            self.fetcher.fetch_quote(symbol)
        })
    }

    /// Run one cycle: fetch, assemble, publish. Returns the published banner.
    pub fn refresh_once(&self, cycle: u64) -> String {
        let quotes = self.fetch_quotes();
        self.publish(cycle, &quotes)
    }

    /// Run one cycle unless shutdown is requested part way. Queued fetches are
    /// skipped once `shutdown` fires and nothing is published.
    pub fn refresh_until(&self, cycle: u64, shutdown: &ShutdownSignal) -> Option<String> {
        let quotes = self.fetch_quotes_while(|| !shutdown.is_requested());
        if shutdown.is_requested() {
            info!("Refresh cycle {} abandoned on shutdown", cycle);
            return None;
        }
        let quotes: Vec<QuotePoint> = quotes.into_iter().flatten().collect();
        Some(self.publish(cycle, &quotes))
    }

    fn publish(&self, cycle: u64, quotes: &[QuotePoint]) -> String {
        let quoted = quotes.iter().filter(|q| q.formatted_price.is_some()).count();
        let banner = assemble_banner(
            quotes
                .iter()
                .map(|q| (q.symbol.as_str(), q.formatted_price.as_deref())),
        );

        let generation = self.state.publish_base(banner.clone());
        info!(
            "Refresh cycle {}: {}/{} symbols quoted (generation {})",
            cycle,
            quoted,
            quotes.len(),
            generation
        );
        if quoted == 0 && !quotes.is_empty() {
            warn!("Refresh cycle {}: every quote failed", cycle);
        }

        self.notify(RefreshEvent {
            cycle,
            completed_at: Utc::now(),
            quoted,
            total: quotes.len(),
        });
        banner
    }

    fn notify(&self, event: RefreshEvent) {
        let Some(events) = &self.events else {
            return;
        };
        match events.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                debug!("UI is behind, dropping refresh event {}", event.cycle)
            }
            Err(TrySendError::Disconnected(_)) => debug!("UI event receiver is gone"),
        }
    }

    /// Refresh every `interval`, measured from cycle start, until shutdown.
    pub fn run(self, interval: Duration, shutdown: ShutdownSignal) {
        info!(
            "Price refresh loop started: {} symbols every {:?}",
            self.watchlist.len(),
            interval
        );
        let mut cycle = 0u64;
        loop {
            cycle += 1;
            let started = Instant::now();
            if self.refresh_until(cycle, &shutdown).is_none() {
                break;
            }

            let elapsed = started.elapsed();
            if elapsed > interval {
                warn!(
                    "Refresh cycle {} took {:?}, longer than the {:?} period",
                    cycle, elapsed, interval
                );
            }
            if shutdown.wait_until(started + interval) {
                break;
            }
        }
        info!("Price refresh loop stopped after {} cycles", cycle);
    }
}
