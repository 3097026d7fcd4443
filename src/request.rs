use crate::endpoint::Endpoint;
use crate::error::FetchError;
use futures::future::{FutureExt, LocalBoxFuture};
use reqwest::Client;
use serde_json::Value;
use std::future::IntoFuture;
use tokio::task::JoinHandle;

// =============================================================================
// The one request helper
// =============================================================================

/// GETs `endpoint` and decodes the body as JSON.
///
/// Non-2xx responses fail before the body is read. No timeout and no retry:
/// a request that never completes never resolves.
pub async fn fetch_json(client: &Client, endpoint: &Endpoint) -> Result<Value, FetchError> {
    let response = client
        .get(endpoint.url().clone())
        .send()
        .await
        .map_err(FetchError::from)?;

    if !response.status().is_success() {
        return Err(FetchError::HttpStatus {
            status: response.status().as_u16(),
            url: endpoint.to_string(),
        });
    }

    let body = response.text().await.map_err(FetchError::from)?;
    Ok(serde_json::from_str(&body)?)
}

#[derive(Debug, Clone, Default)]
pub struct RequestRenderer {
    client: Client,
}

impl RequestRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Suspend-style entry point.
    pub async fn fetch(&self, endpoint: &Endpoint) -> Result<Value, FetchError> {
        log::debug!("GET {endpoint}");
        fetch_json(&self.client, endpoint).await
    }

    /// Starts building a request whose outcome is consumed either with
    /// `.then(..).catch(..)` or by awaiting it.
    pub fn get(&self, endpoint: Endpoint) -> PendingRequest {
        let client = self.client.clone();
        PendingRequest {
            future: async move {
                log::debug!("GET {endpoint}");
                fetch_json(&client, &endpoint).await
            }
            .boxed_local(),
        }
    }
}

// =============================================================================
// Deferred-callback style
// =============================================================================

/// A request that has not been driven yet.
pub struct PendingRequest {
    future: LocalBoxFuture<'static, Result<Value, FetchError>>,
}

impl PendingRequest {
    /// An already-settled request, for bodies that never hit the network.
    pub fn settled(result: Result<Value, FetchError>) -> Self {
        Self {
            future: futures::future::ready(result).boxed_local(),
        }
    }

    pub fn then<S>(self, on_success: S) -> Then<S>
    where
        S: FnOnce(Value) + 'static,
    {
        Then {
            pending: self,
            on_success,
        }
    }
}

impl IntoFuture for PendingRequest {
    type Output = Result<Value, FetchError>;
    type IntoFuture = LocalBoxFuture<'static, Result<Value, FetchError>>;

    fn into_future(self) -> Self::IntoFuture {
        self.future
    }
}

/// A pending request with its success continuation attached. Attaching the
/// failure continuation schedules both; only one failure handler can exist.
pub struct Then<S> {
    pending: PendingRequest,
    on_success: S,
}

impl<S> Then<S>
where
    S: FnOnce(Value) + 'static,
{
    /// Spawns the request on the current `LocalSet`. Exactly one of the two
    /// continuations runs, once.
    ///
    /// Panics when called outside a `LocalSet`.
    pub fn catch<F>(self, on_failure: F) -> JoinHandle<()>
    where
        F: FnOnce(FetchError) + 'static,
    {
        let Then {
            pending,
            on_success,
        } = self;
        tokio::task::spawn_local(async move {
            match pending.await {
                Ok(body) => on_success(body),
                Err(err) => on_failure(err),
            }
        })
    }
}
