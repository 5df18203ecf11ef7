//! Shared marquee text and the animator that scrolls it.
use crate::tasks::ShutdownSignal;
use crate::watchlist::Watchlist;
use log::{debug, info, trace};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Separator between banner entries, also used when doubling a short banner.
pub const SEPARATOR: &str = " | ";

#[derive(Debug, Clone)]
struct BaseText {
    generation: u64,
    text: Arc<str>,
}

/// Last published banner (with its generation) and the rotated text the UI
/// draws. Each is swapped as a whole string under its own lock.
#[derive(Debug)]
pub struct TickerState {
    base: Mutex<BaseText>,
    display: Mutex<Arc<str>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // Values are replaced whole, so a poisoned lock still holds a complete string.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl TickerState {
    pub fn new(initial: &str) -> Self {
        let text: Arc<str> = Arc::from(initial);
        Self {
            base: Mutex::new(BaseText {
                generation: 0,
                text: Arc::clone(&text),
            }),
            display: Mutex::new(text),
        }
    }

    /// Replace the base text. Returns the new generation.
    pub fn publish_base(&self, text: String) -> u64 {
        let mut base = lock(&self.base);
        base.generation += 1;
        base.text = Arc::from(text);
        base.generation
    }

    pub fn base(&self) -> Arc<str> {
        Arc::clone(&lock(&self.base).text)
    }

    /// Base text together with its generation.
    pub fn base_snapshot(&self) -> (u64, Arc<str>) {
        let base = lock(&self.base);
        (base.generation, Arc::clone(&base.text))
    }

    pub fn display(&self) -> Arc<str> {
        Arc::clone(&lock(&self.display))
    }

    pub fn set_display(&self, text: String) {
        *lock(&self.display) = Arc::from(text);
    }
}

// ────────────────────────────────────────────────
// Banner text
// ────────────────────────────────────────────────

/// Banner shown before the first refresh cycle completes.
pub fn loading_banner(watchlist: &Watchlist) -> String {
    let parts: Vec<String> = watchlist
        .entries()
        .iter()
        .map(|e| format!("{}: Loading...", e.symbol))
        .collect();
    format!("{} |", parts.join(SEPARATOR))
}

/// Join `(symbol, price)` pairs into `"SYM: $1.00 | SYM: $2.00 | "`.
/// Entries without a price are dropped; order is preserved.
pub fn assemble_banner<'a, I>(quotes: I) -> String
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let parts: Vec<String> = quotes
        .into_iter()
        .filter_map(|(symbol, price)| price.map(|p| format!("{}: {}", symbol, p)))
        .collect();
    format!("{}{}", parts.join(SEPARATOR), SEPARATOR)
}

/// Move the first character to the end.
pub fn rotate_left(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => {
            let mut rotated = String::with_capacity(text.len());
            rotated.push_str(chars.as_str());
            rotated.push(first);
            rotated
        }
        None => String::new(),
    }
}

/// One animator step.
///
/// A stale display (the base was republished) restarts from the new base; a
/// display shorter than `min_len` characters is reseeded as `base | base`.
/// The result is then rotated by one character.
pub fn next_display(display: &str, base: &str, stale: bool, min_len: usize) -> String {
    let mut current = (if stale { base } else { display }).to_string();
    if current.chars().count() < min_len {
        current = format!("{}{}{}", base, SEPARATOR, base);
    }
    rotate_left(&current)
}

// ────────────────────────────────────────────────
// Animator
// ────────────────────────────────────────────────

/// Scroll the display text one character per `interval` until shutdown.
pub fn run_animator(
    state: Arc<TickerState>,
    interval: Duration,
    min_len: usize,
    shutdown: ShutdownSignal,
) {
    info!("Ticker animator started, interval {:?}", interval);
    // `TickerState::new` seeds the display from generation 0, so anything
    // published before this thread started still counts as new.
    let mut seen_generation = 0;
    let mut next_tick = Instant::now();

    loop {
        let (generation, base) = state.base_snapshot();
        let stale = generation != seen_generation;
        if stale {
            debug!("Ticker base text changed (generation {})", generation);
            seen_generation = generation;
        }

        let display = state.display();
        let next = next_display(&display, &base, stale, min_len);
        trace!("Ticker tick: {} chars", next.len());
        state.set_display(next);

        next_tick += interval;
        if shutdown.wait_until(next_tick) {
            break;
        }
        // Skip missed ticks instead of bursting to catch up.
        let now = Instant::now();
        if next_tick < now {
            next_tick = now;
        }
    }
    info!("Ticker animator stopped");
}
