//! HTTP client for the route computation service.
//!
//! Thin wrapper around `POST {base_url}/route`. The bearer token travels with the
//! service object itself rather than through any shared client state, so each
//! screen is handed exactly the credentials it should use.

use std::time::Duration;

use tracing::debug;

use super::types::{RouteError, RouteRequest, RouteResponse, RouteService, parse_response};
use crate::config::RouteServiceConfig;

const ROUTE_PATH: &str = "/route";

// =============================================================================
// CLIENT
// =============================================================================

pub struct HttpRouteService {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpRouteService {
    /// Build a client from typed config.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::ClientBuild`] if the HTTP client cannot be built.
    pub fn new(config: &RouteServiceConfig) -> Result<Self, RouteError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| RouteError::ClientBuild(e.to_string()))?;
        Ok(Self { http, endpoint: format!("{}{ROUTE_PATH}", config.base_url), token: config.token.clone() })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl RouteService for HttpRouteService {
    async fn compute(&self, request: &RouteRequest) -> Result<RouteResponse, RouteError> {
        let mut builder = self.http.post(&self.endpoint).json(request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RouteError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| RouteError::Request(e.to_string()))?;
        debug!(status, bytes = text.len(), points = request.points.len(), "route service responded");

        if !(200..300).contains(&status) {
            return Err(RouteError::Status { status, body: text });
        }

        parse_response(&text)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
