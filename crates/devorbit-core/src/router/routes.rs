//! The application's route surface.

use super::{DASHBOARD_PATH, LOGIN_PATH, OAUTH_CALLBACK_PATH, SETTINGS_PATH};

/// Upper bound on chained static redirects while resolving a path
const MAX_ROUTE_REDIRECTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Root,
    Login,
    OAuthCallback,
    Dashboard,
    Settings,
    CatchAll,
}

impl std::fmt::Display for RouteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteName::Root => write!(f, "Root"),
            RouteName::Login => write!(f, "Login"),
            RouteName::OAuthCallback => write!(f, "GithubCallback"),
            RouteName::Dashboard => write!(f, "Dashboard"),
            RouteName::Settings => write!(f, "Settings"),
            RouteName::CatchAll => write!(f, "NotFound"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Route {
    pub name: RouteName,
    /// Exact path, or `None` for the catch-all
    pub path: Option<&'static str>,
    pub redirect: Option<&'static str>,
    /// Unset means the route is protected
    pub requires_auth: Option<bool>,
}

impl Route {
    pub fn requires_auth(&self) -> bool {
        self.requires_auth.unwrap_or(true)
    }
}

/// Result of matching a path against the table
#[derive(Debug, Clone)]
pub struct Resolved<'a> {
    pub route: &'a Route,
    /// Path actually landed on after static redirects
    pub path: String,
    /// Query string of the requested location, kept only if no redirect applied
    pub query: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    catch_all: Route,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            routes: vec![
                Route {
                    name: RouteName::Root,
                    path: Some("/"),
                    redirect: Some(DASHBOARD_PATH),
                    requires_auth: None,
                },
                Route {
                    name: RouteName::Login,
                    path: Some(LOGIN_PATH),
                    redirect: None,
                    requires_auth: Some(false),
                },
                Route {
                    name: RouteName::OAuthCallback,
                    path: Some(OAUTH_CALLBACK_PATH),
                    redirect: None,
                    requires_auth: Some(false),
                },
                Route {
                    name: RouteName::Dashboard,
                    path: Some(DASHBOARD_PATH),
                    redirect: None,
                    requires_auth: Some(true),
                },
                Route {
                    name: RouteName::Settings,
                    path: Some(SETTINGS_PATH),
                    redirect: None,
                    requires_auth: Some(true),
                },
            ],
            catch_all: Route {
                name: RouteName::CatchAll,
                path: None,
                redirect: Some(DASHBOARD_PATH),
                requires_auth: None,
            },
        }
    }
}

impl RouteTable {
    /// Replace the route with the same name, or add it if there is none
    pub fn with_route(mut self, route: Route) -> Self {
        if route.path.is_none() {
            self.catch_all = route;
        } else if let Some(existing) = self.routes.iter_mut().find(|r| r.name == route.name) {
            *existing = route;
        } else {
            self.routes.push(route);
        }
        self
    }

    /// Split a location into its path and query parts
    pub fn split(location: &str) -> (String, Option<String>) {
        let location = location.split('#').next().unwrap_or_default();
        let (path, query) = match location.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (location, None),
        };
        let path = path.trim_end_matches('/');
        let path = if path.is_empty() { "/" } else { path };
        (path.to_string(), query.filter(|q| !q.is_empty()))
    }

    fn lookup(&self, path: &str) -> &Route {
        self.routes
            .iter()
            .find(|r| r.path == Some(path))
            .unwrap_or(&self.catch_all)
    }

    /// Match a location, following static redirects such as `/` and the
    /// catch-all to their destination route.
    pub fn resolve(&self, location: &str) -> Resolved<'_> {
        let (mut path, mut query) = Self::split(location);
        let mut route = self.lookup(&path);

        for _ in 0..MAX_ROUTE_REDIRECTS {
            let Some(target) = route.redirect else {
                break;
            };
            path = target.to_string();
            query = None;
            route = self.lookup(&path);
        }

        Resolved { route, path, query }
    }

    /// Name of the route a path matches directly, without following redirects
    pub fn name_of(&self, location: &str) -> RouteName {
        let (path, _) = Self::split(location);
        self.lookup(&path).name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_location() {
        assert_eq!(RouteTable::split("/login"), ("/login".to_string(), None));
        assert_eq!(RouteTable::split("/settings/"), ("/settings".to_string(), None));
        assert_eq!(RouteTable::split(""), ("/".to_string(), None));
        assert_eq!(
            RouteTable::split("/auth/github/callback?code=abc&state=1#top"),
            ("/auth/github/callback".to_string(), Some("code=abc&state=1".to_string()))
        );
        assert_eq!(RouteTable::split("/login?"), ("/login".to_string(), None));
    }

    #[test]
    fn test_resolve_known_routes() {
        let routes = RouteTable::default();
        assert_eq!(routes.resolve("/login").route.name, RouteName::Login);
        assert_eq!(routes.resolve("/dashboard").route.name, RouteName::Dashboard);
        assert_eq!(routes.resolve("/settings").route.name, RouteName::Settings);

        let callback = routes.resolve("/auth/github/callback?code=abc");
        assert_eq!(callback.route.name, RouteName::OAuthCallback);
        assert_eq!(callback.query.as_deref(), Some("code=abc"));
    }

    #[test]
    fn test_resolve_root_and_unknown_land_on_dashboard() {
        let routes = RouteTable::default();

        let root = routes.resolve("/");
        assert_eq!(root.route.name, RouteName::Dashboard);
        assert_eq!(root.path, "/dashboard");

        let unknown = routes.resolve("/repos/42?tab=commits");
        assert_eq!(unknown.route.name, RouteName::Dashboard);
        assert_eq!(unknown.path, "/dashboard");
        assert_eq!(unknown.query, None);
    }

    #[test]
    fn test_requires_auth_defaults_to_true() {
        let routes = RouteTable::default();
        assert_eq!(routes.name_of("/whatever"), RouteName::CatchAll);
        assert!(routes.catch_all.requires_auth());
        assert!(routes.lookup("/").requires_auth());
        assert!(!routes.lookup("/login").requires_auth());
    }

    #[test]
    fn test_with_route_replaces_by_name() {
        let routes = RouteTable::default().with_route(Route {
            name: RouteName::Settings,
            path: Some("/preferences"),
            redirect: None,
            requires_auth: Some(true),
        });
        assert_eq!(routes.name_of("/preferences"), RouteName::Settings);
        assert_eq!(routes.name_of("/settings"), RouteName::CatchAll);
    }
}
