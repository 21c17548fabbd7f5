//! API client for communicating with the DevOrbit REST API.
//!
//! This module provides the `ApiClient` struct. Every request it sends runs
//! through its request interceptors first, and every response it receives
//! runs through its response interceptors before the status is checked.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, Method, Request, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::interceptors::{
    RequestAuthorizer, RequestInterceptor, ResponseContext, ResponseGuardian, ResponseInterceptor,
};
use super::ApiError;
use crate::auth::SessionStore;
use crate::models::{
    AuthorizationUrlResponse, GithubDailyStatsResponse, GithubSyncResponse, LoginResponse,
    SyncParams,
};
use crate::router::Navigator;

// ============================================================================
// Constants
// ============================================================================

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// API client for the DevOrbit backend.
/// Clone is cheap - reqwest::Client and the interceptor lists are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    request_interceptors: Vec<Arc<dyn RequestInterceptor>>,
    response_interceptors: Vec<Arc<dyn ResponseInterceptor>>,
}

impl ApiClient {
    /// Create a new API client with no interceptors
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::from_client(client, base_url))
    }

    /// Wrap an already configured reqwest client
    pub fn from_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_interceptors: Vec::new(),
            response_interceptors: Vec::new(),
        }
    }

    /// Register the session hooks: bearer authorization on the way out,
    /// sign-out on 401 on the way back.
    pub fn with_session(self, session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        self.with_request_interceptor(Arc::new(RequestAuthorizer::new(session.clone())))
            .with_response_interceptor(Arc::new(ResponseGuardian::new(session, navigator)))
    }

    pub fn with_request_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.request_interceptors.push(interceptor);
        self
    }

    pub fn with_response_interceptor(mut self, interceptor: Arc<dyn ResponseInterceptor>) -> Self {
        self.response_interceptors.push(interceptor);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// Run a request through the interceptor chain.
    ///
    /// Transport failures come back as `ApiError::NetworkError` without any
    /// interceptor seeing them; no request is ever retried.
    pub async fn send(&self, mut request: Request) -> Result<Response> {
        for interceptor in &self.request_interceptors {
            interceptor.on_request(&mut request)?;
        }

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(method = %method, url = %url, "Sending request");

        let response = self
            .client
            .execute(request)
            .await
            .map_err(ApiError::NetworkError)?;

        let context = ResponseContext {
            method: &method,
            url: &url,
            status: response.status(),
        };
        debug!(status = %context.status, url = %url, "Response received");
        for interceptor in &self.response_interceptors {
            interceptor.on_response(&context);
        }

        Self::check_response(response).await
    }

    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url(path);
        let request = self
            .client
            .request(method, &url)
            .header(header::ACCEPT, "application/json")
            .query(query)
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

        let response = self.send(request).await?;
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("{}: {}", url, e)).into())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        self.request_json(Method::GET, path, query).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        self.request_json(Method::POST, path, query).await
    }

    // ===== Authentication =====

    /// Fetch the GitHub authorization URL the user should be sent to
    pub async fn github_authorization_url(&self) -> Result<String> {
        let response: AuthorizationUrlResponse = self.get("/auth/github/login", &[]).await?;
        Ok(response.authorization_url)
    }

    /// Exchange a one-time OAuth code for a session token and user
    pub async fn github_callback(&self, code: &str) -> Result<LoginResponse> {
        self.get("/auth/github/callback", &[("code", code.to_string())]).await
    }

    // ===== GitHub activity =====

    /// Ask the backend to pull fresh data from GitHub
    pub async fn sync_github(&self, params: &SyncParams) -> Result<GithubSyncResponse> {
        self.post("/github/sync", &params.to_query()).await
    }

    /// Fetch per-day activity, defaulting to the backend's range when unset
    pub async fn daily_stats(
        &self,
        from_date: Option<chrono::NaiveDate>,
        to_date: Option<chrono::NaiveDate>,
    ) -> Result<GithubDailyStatsResponse> {
        let params = SyncParams {
            from_date,
            to_date,
            mode: None,
        };
        self.get("/github/stats/daily", &params.to_query()).await
    }

    pub async fn health(&self) -> Result<serde_json::Value> {
        self.get("/health", &[]).await
    }
}
