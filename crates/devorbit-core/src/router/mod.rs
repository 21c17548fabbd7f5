//! In-app navigation with route-level access control.
//!
//! This module provides:
//! - `RouteTable`: the route surface and its access requirements
//! - `gate`: the decision taken before every soft transition
//! - `Router`: the current location, implementing `Navigator`
//!
//! Soft navigation (`Navigator::navigate`) always passes through the gate.
//! Hard navigation (`Navigator::hard_navigate`) is a full reload that skips
//! it, used only to escape after the session has been invalidated.

pub mod gate;
pub mod routes;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::auth::SessionStore;

pub use gate::NavigationDecision;
pub use routes::{Route, RouteName, RouteTable};

pub const LOGIN_PATH: &str = "/login";
pub const OAUTH_CALLBACK_PATH: &str = "/auth/github/callback";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const SETTINGS_PATH: &str = "/settings";

/// Maximum gate redirects followed for a single transition
const MAX_GATE_REDIRECTS: usize = 8;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Too many redirects navigating to {0}")]
    RedirectLoop(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub route: RouteName,
    pub path: String,
    pub query: Option<String>,
}

impl Location {
    pub fn href(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{}", self.path, q),
            None => self.path.clone(),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.href(), self.route)
    }
}

/// The two ways of moving the user around the application
pub trait Navigator: Send + Sync {
    /// In-app transition, subject to the navigation gate
    fn navigate(&self, path: &str) -> Result<Location, NavigationError>;

    /// Full reload of `path`, bypassing the gate and in-app routing state
    fn hard_navigate(&self, path: &str);
}

pub struct Router {
    routes: RouteTable,
    session: Arc<SessionStore>,
    location: watch::Sender<Location>,
    reloads: AtomicU64,
}

impl Router {
    /// Create a router sitting on the login page. Call `navigate` to move to
    /// the page the user actually asked for.
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self::with_routes(RouteTable::default(), session)
    }

    pub fn with_routes(routes: RouteTable, session: Arc<SessionStore>) -> Self {
        let (location, _) = watch::channel(Location {
            route: RouteName::Login,
            path: LOGIN_PATH.to_string(),
            query: None,
        });
        Self {
            routes,
            session,
            location,
            reloads: AtomicU64::new(0),
        }
    }

    pub fn current(&self) -> Location {
        self.location.borrow().clone()
    }

    /// Number of hard navigations performed so far
    pub fn reload_count(&self) -> u64 {
        self.reloads.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> watch::Receiver<Location> {
        self.location.subscribe()
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    fn commit(&self, location: Location) {
        self.location.send_if_modified(|current| {
            if *current == location {
                false
            } else {
                *current = location.clone();
                true
            }
        });
    }
}

impl Navigator for Router {
    fn navigate(&self, path: &str) -> Result<Location, NavigationError> {
        let mut target = path.to_string();

        for _ in 0..MAX_GATE_REDIRECTS {
            let resolved = self.routes.resolve(&target);
            // Fresh on every hop, never carried over from a previous transition
            let authenticated = self.session.is_authenticated();

            match gate::check(resolved.route, authenticated) {
                NavigationDecision::Allow => {
                    let location = Location {
                        route: resolved.route.name,
                        path: resolved.path,
                        query: resolved.query,
                    };
                    debug!(requested = path, landed = %location, "Navigation allowed");
                    self.commit(location.clone());
                    return Ok(location);
                }
                NavigationDecision::Redirect(to) => {
                    debug!(from = %resolved.path, to = to, authenticated, "Navigation redirected");
                    target = to.to_string();
                }
            }
        }

        Err(NavigationError::RedirectLoop(path.to_string()))
    }

    fn hard_navigate(&self, path: &str) {
        let (clean_path, query) = RouteTable::split(path);
        let location = Location {
            route: self.routes.name_of(&clean_path),
            path: clean_path,
            query,
        };
        self.reloads.fetch_add(1, Ordering::SeqCst);
        info!(location = %location, "Hard navigation");
        self.commit(location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::tests::sample_user;
    use crate::auth::MemoryStore;

    fn router() -> (Arc<SessionStore>, Router) {
        let session = Arc::new(SessionStore::new(Arc::new(MemoryStore::new())));
        let router = Router::new(session.clone());
        (session, router)
    }

    #[test]
    fn test_unauthenticated_dashboard_lands_on_login() {
        let (_session, router) = router();
        let location = router.navigate("/dashboard").unwrap();
        assert_eq!(location.route, RouteName::Login);
        assert_eq!(location.path, "/login");
        assert_eq!(router.current(), location);
    }

    #[test]
    fn test_authenticated_login_lands_on_dashboard() {
        let (session, router) = router();
        session.set_auth("abc123", sample_user()).unwrap();

        let location = router.navigate("/login").unwrap();
        assert_eq!(location.route, RouteName::Dashboard);
    }

    #[test]
    fn test_unauthenticated_login_is_allowed() {
        let (_session, router) = router();
        assert_eq!(router.navigate("/login").unwrap().route, RouteName::Login);
    }

    #[test]
    fn test_authenticated_settings_is_allowed() {
        let (session, router) = router();
        session.set_auth("abc123", sample_user()).unwrap();
        assert_eq!(router.navigate("/settings").unwrap().route, RouteName::Settings);
    }

    #[test]
    fn test_unknown_path_resolves_by_session() {
        let (session, router) = router();
        assert_eq!(router.navigate("/nowhere").unwrap().path, "/login");

        session.set_auth("abc123", sample_user()).unwrap();
        assert_eq!(router.navigate("/nowhere").unwrap().path, "/dashboard");
    }

    #[test]
    fn test_gate_reads_session_on_each_transition() {
        let (session, router) = router();
        session.set_auth("abc123", sample_user()).unwrap();
        assert_eq!(router.navigate("/settings").unwrap().route, RouteName::Settings);

        session.logout().unwrap();
        assert_eq!(router.navigate("/settings").unwrap().route, RouteName::Login);
    }

    #[test]
    fn test_callback_keeps_query() {
        let (_session, router) = router();
        let location = router.navigate("/auth/github/callback?code=xyz").unwrap();
        assert_eq!(location.route, RouteName::OAuthCallback);
        assert_eq!(location.href(), "/auth/github/callback?code=xyz");
    }

    #[test]
    fn test_hard_navigate_bypasses_gate() {
        let (session, router) = router();
        session.set_auth("abc123", sample_user()).unwrap();
        router.navigate("/settings").unwrap();

        // The gate would bounce an authenticated user off /login
        router.hard_navigate("/login");
        assert_eq!(router.current().route, RouteName::Login);
        assert_eq!(router.reload_count(), 1);
    }

    #[test]
    fn test_repeated_hard_navigation_converges() {
        let (_session, router) = router();
        router.navigate("/login").unwrap();
        let mut rx = router.subscribe();

        router.hard_navigate("/login");
        router.hard_navigate("/login");

        assert_eq!(router.current().path, "/login");
        assert_eq!(router.reload_count(), 2);
        // Location never actually changed
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_redirect_loop_is_reported() {
        let session = Arc::new(SessionStore::new(Arc::new(MemoryStore::new())));
        // A table where login itself is protected cannot settle for anonymous users
        let routes = RouteTable::default().with_route(Route {
            name: RouteName::Login,
            path: Some(LOGIN_PATH),
            redirect: None,
            requires_auth: Some(true),
        });
        let router = Router::with_routes(routes, session);

        assert_eq!(
            router.navigate("/dashboard"),
            Err(NavigationError::RedirectLoop("/dashboard".to_string()))
        );
    }
}
