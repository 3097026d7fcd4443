use crate::config::ApiConfig;
use crate::error::PageError;
use std::fmt;
use url::Url;

/// Which service a route is resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Api {
    Swapi,
    Omdb,
    Friends,
    Tvmaze,
}

impl Api {
    fn base<'a>(&self, config: &'a ApiConfig) -> &'a Url {
        match self {
            Api::Swapi => &config.swapi,
            Api::Omdb => &config.omdb,
            Api::Friends => &config.friends,
            Api::Tvmaze => &config.tvmaze,
        }
    }
}

/// A fully built request URL. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    pub fn parse(url: &str) -> Result<Self, PageError> {
        Url::parse(url)
            .map(|url| Self { url })
            .map_err(|err| PageError::InvalidUrl {
                url: url.to_string(),
                message: err.to_string(),
            })
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Endpoint template: a path relative to the service base, fixed query
/// pairs, and optionally one query parameter filled from user input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Route {
    pub api: Api,
    pub path: &'static str,
    pub query: &'static [(&'static str, &'static str)],
    pub term_param: Option<&'static str>,
}

impl Route {
    pub const fn fixed(api: Api, path: &'static str) -> Self {
        Self {
            api,
            path,
            query: &[],
            term_param: None,
        }
    }

    pub const fn with_query(
        api: Api,
        path: &'static str,
        query: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            api,
            path,
            query,
            term_param: None,
        }
    }

    pub const fn search(api: Api, path: &'static str, term_param: &'static str) -> Self {
        Self {
            api,
            path,
            query: &[],
            term_param: Some(term_param),
        }
    }

    /// Builds the endpoint for one invocation.
    ///
    /// OMDb routes always carry the configured `apikey` first. A search route
    /// with no term sends an empty value rather than dropping the parameter.
    pub fn resolve(&self, config: &ApiConfig, term: Option<&str>) -> Result<Endpoint, PageError> {
        let base = self.api.base(config);
        let mut url = base.join(self.path).map_err(|err| PageError::InvalidUrl {
            url: format!("{base}{}", self.path),
            message: err.to_string(),
        })?;

        let has_query = self.api == Api::Omdb || !self.query.is_empty() || self.term_param.is_some();
        if has_query {
            let mut pairs = url.query_pairs_mut();
            if self.api == Api::Omdb {
                pairs.append_pair("apikey", &config.omdb_api_key);
            }
            for (key, value) in self.query {
                pairs.append_pair(key, value);
            }
            if let Some(param) = self.term_param {
                pairs.append_pair(param, term.unwrap_or_default());
            }
        }

        Ok(Endpoint { url })
    }
}
