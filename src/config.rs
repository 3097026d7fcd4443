use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use url::Url;

pub const DEFAULT_SWAPI: &str = "https://swapi.dev/";
pub const DEFAULT_OMDB: &str = "http://www.omdbapi.com/";
pub const DEFAULT_FRIENDS: &str = "https://friends-quotes-api.herokuapp.com/";
pub const DEFAULT_TVMAZE: &str = "https://api.tvmaze.com/";
/// Key issued for the lesson at omdbapi.com/apikey.aspx.
pub const DEFAULT_OMDB_KEY: &str = "db7c7992";

// =============================================================================
// Raw file layout
// =============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    api: RawApi,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawApi {
    swapi: Option<String>,
    omdb: Option<String>,
    friends: Option<String>,
    tvmaze: Option<String>,
    omdb_api_key: Option<String>,
}

// =============================================================================
// Validated configuration
// =============================================================================

/// Base URLs of the services the examples talk to.
///
/// Every base ends with `/` so that relative routes join onto it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub swapi: Url,
    pub omdb: Url,
    pub friends: Url,
    pub tvmaze: Url,
    pub omdb_api_key: String,
}

impl ApiConfig {
    /// Points every service at the same base, which is what tests against a
    /// single mock server want.
    pub fn all_at(base: &str) -> Result<Self, ConfigError> {
        let url = parse_base("all", base)?;
        Ok(Self {
            swapi: url.clone(),
            omdb: url.clone(),
            friends: url.clone(),
            tvmaze: url,
            omdb_api_key: DEFAULT_OMDB_KEY.to_string(),
        })
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        // The defaults are constants known to parse.
        let parse = |s: &str| Url::parse(s).unwrap_or_else(|_| unreachable!("bad default {s}"));
        Self {
            swapi: parse(DEFAULT_SWAPI),
            omdb: parse(DEFAULT_OMDB),
            friends: parse(DEFAULT_FRIENDS),
            tvmaze: parse(DEFAULT_TVMAZE),
            omdb_api_key: DEFAULT_OMDB_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub api: ApiConfig,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(content)?;
        let defaults = ApiConfig::default();

        let base = |api: &str, value: Option<String>, fallback: Url| match value {
            Some(s) => parse_base(api, &s),
            None => Ok(fallback),
        };

        Ok(Self {
            api: ApiConfig {
                swapi: base("swapi", raw.api.swapi, defaults.swapi)?,
                omdb: base("omdb", raw.api.omdb, defaults.omdb)?,
                friends: base("friends", raw.api.friends, defaults.friends)?,
                tvmaze: base("tvmaze", raw.api.tvmaze, defaults.tvmaze)?,
                omdb_api_key: raw.api.omdb_api_key.unwrap_or(defaults.omdb_api_key),
            },
        })
    }

    /// Reads `path` if it exists, otherwise falls back to the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

fn parse_base(api: &str, value: &str) -> Result<Url, ConfigError> {
    let mut owned = value.trim().to_string();
    if !owned.ends_with('/') {
        owned.push('/');
    }

    let url = Url::parse(&owned).map_err(|err| ConfigError::InvalidUrl {
        api: api.to_string(),
        message: err.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            api: api.to_string(),
            message: format!("'{value}' cannot be used as a base URL"),
        });
    }
    Ok(url)
}
