mod dropdown;
mod plot;

use crate::config::{DashboardConfig, Theme};
use crate::fetcher::{QuoteFetcher, QuoteSource};
use crate::refresh::{PriceRefresher, RefreshEvent};
use crate::selection::SelectionController;
use crate::tasks::BackgroundTasks;
use crate::ticker::{TickerState, loading_banner, run_animator};
use crate::watchlist::{Lookback, Watchlist};
use crossbeam_channel::{Receiver, bounded};
use dropdown::Dropdown;
use log::info;
use macroquad::prelude::*;
use macroquad::window::Conf;
use std::sync::Arc;
use strum::IntoEnumIterator;

use plot::draw_chart;

const MARQUEE_Y: f32 = 40.0;
const CONTROLS_Y: f32 = 70.0;
const PRICE_LABEL_Y: f32 = 140.0;
const CHART_TOP: f32 = 165.0;

pub fn window_conf() -> Conf {
    Conf {
        window_title: "StockStream".to_owned(),
        window_width: Theme::WINDOW_WIDTH,
        window_height: Theme::WINDOW_HEIGHT,
        ..Default::default()
    }
}

pub struct Dashboard {
    ticker: Arc<TickerState>,
    controller: SelectionController,
    symbol_menu: Dropdown,
    lookback_menu: Dropdown,
    lookbacks: Vec<Lookback>,
    events: Receiver<RefreshEvent>,
    last_refresh: Option<RefreshEvent>,
    tasks: BackgroundTasks,
}

impl Dashboard {
    /// Load the default selection, then start the refresh loop and the animator.
    pub fn start(
        config: &DashboardConfig,
        source: Arc<dyn QuoteSource>,
        watchlist: Watchlist,
    ) -> std::io::Result<Self> {
        let fetcher = QuoteFetcher::new(source);
        let ticker = Arc::new(TickerState::new(&loading_banner(&watchlist)));

        let mut controller = SelectionController::new(fetcher.clone(), watchlist.clone());
        controller.initialize();

        let (events_tx, events) = bounded::<RefreshEvent>(8);
        let refresher = PriceRefresher::new(
            fetcher,
            watchlist.clone(),
            Arc::clone(&ticker),
            config.max_concurrent_fetches,
        )
        .with_events(events_tx);

        let mut tasks = BackgroundTasks::new();
        let refresh_interval = config.refresh_interval;
        tasks.spawn("price-refresh", move |shutdown| {
            refresher.run(refresh_interval, shutdown)
        })?;
        let animator_state = Arc::clone(&ticker);
        let (ticker_interval, display_width) = (config.ticker_interval, config.display_width);
        tasks.spawn("ticker-animator", move |shutdown| {
            run_animator(animator_state, ticker_interval, display_width, shutdown)
        })?;

        let lookbacks: Vec<Lookback> = Lookback::iter().collect();
        Ok(Self {
            ticker,
            controller,
            symbol_menu: Dropdown::new(watchlist.display_names(), 520.0),
            lookback_menu: Dropdown::new(lookbacks.iter().map(|l| l.to_string()).collect(), 90.0),
            lookbacks,
            events,
            last_refresh: None,
            tasks,
        })
    }

    /// Event loop. Returns when the window is closed or Escape is pressed.
    pub async fn run(mut self) {
        prevent_quit();
        loop {
            if is_quit_requested() || is_key_pressed(KeyCode::Escape) {
                break;
            }
            while let Ok(event) = self.events.try_recv() {
                self.last_refresh = Some(event);
            }

            clear_background(Theme::BACKGROUND);
            self.draw_frame();
            next_frame().await;
        }

        info!("Window closed, stopping background tasks");
        self.tasks.shutdown();
    }

    fn draw_frame(&mut self) {
        let width = screen_width();
        let height = screen_height();

        draw_text(&self.ticker.display(), 10.0, MARQUEE_Y, Theme::TICKER_FONT, Theme::FOREGROUND);

        let price_label = self.controller.price_label();
        let dims = measure_text(price_label, None, Theme::LABEL_FONT as u16, 1.0);
        draw_text(
            price_label,
            (width - dims.width) / 2.0,
            PRICE_LABEL_Y,
            Theme::LABEL_FONT,
            Theme::FOREGROUND,
        );

        let chart_area = Rect::new(40.0, CHART_TOP, width - 80.0, height - CHART_TOP - 30.0);
        draw_chart(self.controller.chart(), chart_area);

        if let Some(event) = &self.last_refresh {
            draw_text(
                &format!(
                    "Last update: {} ({}/{} quoted)",
                    event.completed_at.with_timezone(&chrono::Local).format("%H:%M:%S"),
                    event.quoted,
                    event.total
                ),
                10.0,
                height - 8.0,
                Theme::SMALL_FONT,
                Theme::MUTED,
            );
        }

        // Menus last so an open list overlays the chart.
        let controls_w = self.symbol_menu.width() + 20.0 + self.lookback_menu.width();
        let symbol_x = (width - controls_w) / 2.0;
        let lookback_x = symbol_x + self.symbol_menu.width() + 20.0;

        let lookback_pick = self
            .lookback_menu
            .show(lookback_x, CONTROLS_Y, !self.symbol_menu.is_open());
        let symbol_pick = self
            .symbol_menu
            .show(symbol_x, CONTROLS_Y, !self.lookback_menu.is_open());

        if let Some(index) = symbol_pick {
            self.controller.select_symbol(index);
        }
        if let Some(lookback) = lookback_pick.and_then(|i| self.lookbacks.get(i).copied()) {
            self.controller.select_lookback(lookback);
        }
    }
}
