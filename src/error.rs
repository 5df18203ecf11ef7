use thiserror::Error;

/// Failure while retrieving or decoding provider data for one symbol.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport failure (connect, timeout, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status code.
    #[error("Unexpected HTTP status {status} for {symbol}")]
    Status { symbol: String, status: u16 },

    /// The response body was not the chart document we expect.
    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The provider reported an error, e.g. an unknown symbol.
    #[error("Provider error for {symbol}: {message}")]
    Provider { symbol: String, message: String },

    /// The response parsed but carried no usable closing prices.
    #[error("No closing prices returned for {0}")]
    EmptySeries(String),
}

/// Crate-wide `Result` alias with `FetchError` as the default error.
pub type Result<T, E = FetchError> = std::result::Result<T, E>;
