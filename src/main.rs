// main.rs
use log::{error, info};
use std::sync::Arc;
use stock_stream::ui::{Dashboard, window_conf};
use stock_stream::{DashboardConfig, Watchlist, YahooClient};

fn init_logger() {
    // RUST_LOG overrides the default level.
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

#[macroquad::main(window_conf)]
async fn main() {
    init_logger();

    let config = DashboardConfig::default();
    let watchlist = Watchlist::default();
    info!("Tracking {} symbols", watchlist.len());

    let client = match YahooClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build HTTP client: {}", e);
            return;
        }
    };

    let dashboard = match Dashboard::start(&config, Arc::new(client), watchlist) {
        Ok(dashboard) => dashboard,
        Err(e) => {
            error!("Failed to start background tasks: {}", e);
            return;
        }
    };

    dashboard.run().await;
    info!("StockStream exited");
}
