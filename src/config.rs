//! Compiled-in runtime settings and the window palette.
use macroquad::color::Color;
use std::time::Duration;

/// Base URL of the Yahoo Finance v8 chart endpoint.
pub const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Settings shared by the background loops and the quote client.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Period of the price refresh loop, measured from cycle start.
    pub refresh_interval: Duration,
    /// Cadence of the ticker animator.
    pub ticker_interval: Duration,
    /// Minimum number of characters the marquee keeps available for scrolling.
    pub display_width: usize,
    /// Upper bound on in-flight quote requests during one refresh cycle.
    pub max_concurrent_fetches: usize,
    /// Timeout applied to every HTTP request.
    pub request_timeout: Duration,
    pub base_url: String,
    pub user_agent: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(60),
            ticker_interval: Duration::from_millis(150),
            display_width: 300,
            max_concurrent_fetches: 10,
            request_timeout: Duration::from_secs(10),
            base_url: YAHOO_CHART_URL.to_string(),
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}

/// Window colours and text sizes.
pub struct Theme;

impl Theme {
    pub const BACKGROUND: Color = Color::from_rgba(16, 14, 79, 255); // #100e4f
    pub const FOREGROUND: Color = Color::from_rgba(242, 138, 209, 255); // #f28ad1
    pub const PANEL: Color = Color::from_rgba(24, 21, 97, 255);
    pub const GRID: Color = Color::from_rgba(242, 138, 209, 46);
    pub const PLACEHOLDER: Color = Color::from_rgba(255, 0, 0, 255);
    pub const MUTED: Color = Color::from_rgba(166, 158, 204, 255);

    pub const TICKER_FONT: f32 = 26.0;
    pub const LABEL_FONT: f32 = 24.0;
    pub const SMALL_FONT: f32 = 16.0;

    pub const WINDOW_WIDTH: i32 = 1000;
    pub const WINDOW_HEIGHT: i32 = 650;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.ticker_interval, Duration::from_millis(150));
        assert_eq!(config.display_width, 300);
        assert_eq!(config.max_concurrent_fetches, 10);
        assert!(config.base_url.starts_with("https://"));
    }

    #[test]
    fn test_palette_matches_hex_colours() {
        assert_eq!(Theme::BACKGROUND, Color::from_rgba(0x10, 0x0e, 0x4f, 0xff));
        assert_eq!(Theme::FOREGROUND, Color::from_rgba(0xf2, 0x8a, 0xd1, 0xff));
        assert!((Theme::BACKGROUND.b - 79.0 / 255.0).abs() < 1e-6);
    }
}
