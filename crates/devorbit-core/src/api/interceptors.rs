//! Hooks run by `ApiClient` around every request.
//!
//! Request interceptors run in registration order just before a request is
//! sent and may mutate it. Response interceptors run in registration order on
//! every response that arrives, whatever its status, before the status is
//! turned into a result.

use std::sync::Arc;

use reqwest::header::{self, HeaderValue};
use reqwest::{Method, Request, StatusCode, Url};
use tracing::{debug, warn};

use super::ApiError;
use crate::auth::SessionStore;
use crate::router::{Navigator, LOGIN_PATH};

pub trait RequestInterceptor: Send + Sync {
    fn on_request(&self, request: &mut Request) -> Result<(), ApiError>;
}

/// What a response interceptor gets to see of a response
#[derive(Debug, Clone, Copy)]
pub struct ResponseContext<'a> {
    pub method: &'a Method,
    pub url: &'a Url,
    pub status: StatusCode,
}

pub trait ResponseInterceptor: Send + Sync {
    fn on_response(&self, response: &ResponseContext<'_>);
}

// ============================================================================
// Request authorizer
// ============================================================================

/// Attaches the current session token as a bearer credential.
pub struct RequestAuthorizer {
    session: Arc<SessionStore>,
}

impl RequestAuthorizer {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self { session }
    }
}

impl RequestInterceptor for RequestAuthorizer {
    fn on_request(&self, request: &mut Request) -> Result<(), ApiError> {
        // Read at send time, never cached
        let Some(token) = self.session.token() else {
            return Ok(());
        };

        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ApiError::InvalidRequest("session token is not a valid header value".into()))?;
        value.set_sensitive(true);

        // insert() replaces any existing value, so there is exactly one
        request.headers_mut().insert(header::AUTHORIZATION, value);
        Ok(())
    }
}

// ============================================================================
// Response guardian
// ============================================================================

/// Signs the user out and hard-navigates to the login page on any 401.
pub struct ResponseGuardian {
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl ResponseGuardian {
    pub fn new(session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }
}

impl ResponseInterceptor for ResponseGuardian {
    fn on_response(&self, response: &ResponseContext<'_>) {
        if response.status != StatusCode::UNAUTHORIZED {
            return;
        }

        warn!(
            method = %response.method,
            url = %response.url,
            "Request rejected as unauthorized, signing out"
        );

        if let Err(e) = self.session.logout() {
            warn!(error = %e, "Failed to clear persisted session");
        }

        // Bypasses the navigation gate on purpose
        self.navigator.hard_navigate(LOGIN_PATH);
        debug!("Hard navigation to login issued");
    }
}
