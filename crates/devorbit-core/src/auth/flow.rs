//! GitHub OAuth login sequence.
//!
//! 1. `begin_login` asks the backend for the GitHub authorization URL.
//! 2. The user authorizes on GitHub and comes back to the callback route with
//!    a one-time `code`.
//! 3. `complete_login` exchanges the code, stores the session and moves on to
//!    the dashboard.

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Url;
use tracing::{info, warn};

use super::SessionStore;
use crate::api::ApiClient;
use crate::models::User;
use crate::router::{Location, Navigator, DASHBOARD_PATH, LOGIN_PATH};

/// Base used to parse callback locations given as bare paths
const LOCAL_ORIGIN: &str = "http://localhost";

pub struct AuthFlow {
    api: ApiClient,
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl AuthFlow {
    pub fn new(api: ApiClient, session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            api,
            session,
            navigator,
        }
    }

    /// URL of the GitHub consent page to send the user to
    pub async fn begin_login(&self) -> Result<String> {
        self.api.github_authorization_url().await
    }

    /// Finish the OAuth round trip with the code GitHub handed back.
    ///
    /// Exchange failures are returned as-is and leave the session untouched.
    pub async fn complete_login(&self, code: &str) -> Result<User> {
        let code = code.trim();
        if code.is_empty() {
            anyhow::bail!("OAuth callback is missing the authorization code");
        }

        let login = self.api.github_callback(code).await?;
        let user = login.user.clone();

        // Memory is authoritative even if persisting fails
        if let Err(e) = self.session.set_auth(login.access_token, login.user) {
            warn!(error = %e, "Failed to persist session");
        }
        info!(login = %user.github_login, "Login successful");

        self.navigator
            .navigate(DASHBOARD_PATH)
            .context("Failed to open dashboard after login")?;
        Ok(user)
    }

    /// Explicit sign-out from the UI
    pub fn logout(&self) -> Result<Location> {
        if let Err(e) = self.session.logout() {
            warn!(error = %e, "Failed to clear persisted session");
        }
        Ok(self.navigator.navigate(LOGIN_PATH)?)
    }

    /// Pull the `code` parameter out of a callback location.
    ///
    /// Accepts a full URL, a path with query string, or a bare code.
    pub fn extract_code(location: &str) -> Option<String> {
        let location = location.trim();
        if location.is_empty() {
            return None;
        }
        if !location.contains('?') && !location.contains('/') {
            return Some(location.to_string());
        }

        let base = Url::parse(LOCAL_ORIGIN).ok()?;
        let url = base.join(location).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "code")
            .map(|(_, value)| value.into_owned())
            .filter(|code| !code.is_empty())
    }
}
