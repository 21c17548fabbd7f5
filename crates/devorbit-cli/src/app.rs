//! Wiring shared by every command.
//!
//! Builds the session store, router and API client from the configuration,
//! the same way for every invocation, and restores the last session.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use devorbit_core::config::Config;
use devorbit_core::router::Navigator;
use devorbit_core::{ApiClient, AuthFlow, Location, Router, SessionStore};

pub struct App {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub router: Arc<Router>,
    pub api: ApiClient,
    pub auth: AuthFlow,
}

impl App {
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };
        let config = config.with_env_overrides()?;
        debug!(api_base_url = config.api_base_url(), storage = ?config.storage, "Config loaded");

        let storage = config.open_storage()?;
        let session = Arc::new(SessionStore::open(storage));
        debug!(authenticated = session.is_authenticated(), "Session loaded");

        let router = Arc::new(Router::new(session.clone()));
        let api = ApiClient::new(config.api_base_url(), config.request_timeout())?
            .with_session(session.clone(), router.clone());
        let auth = AuthFlow::new(api.clone(), session.clone(), router.clone());

        Ok(Self {
            config,
            session,
            router,
            api,
            auth,
        })
    }

    /// Soft-navigate, reporting where the gate actually let us land
    pub fn open(&self, path: &str) -> Result<Location> {
        Ok(self.router.navigate(path)?)
    }
}
