use thiserror::Error;

// =============================================================================
// Fetch failures
// =============================================================================

/// Everything that can go wrong between sending a GET and holding a decoded body.
///
/// All three variants take the same failure path; the split only exists so the
/// log line says what happened.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} error for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Failed to decode response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return FetchError::HttpStatus {
                status: status.as_u16(),
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
            };
        }

        if err.is_decode() {
            return FetchError::Decode(err.to_string());
        }

        FetchError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(format!(
            "{err} (line {}, column {})",
            err.line(),
            err.column()
        ))
    }
}

// =============================================================================
// Page wiring failures
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageError {
    #[error("No element matches selector '{0}'")]
    MissingElement(String),

    #[error("Invalid endpoint '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

// =============================================================================
// Configuration failures
// =============================================================================

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid base URL for '{api}': {message}")]
    InvalidUrl { api: String, message: String },
}
