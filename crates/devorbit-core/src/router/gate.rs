//! Access decision taken before every in-app route transition.

use super::routes::{Route, RouteName};
use super::{DASHBOARD_PATH, LOGIN_PATH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    Redirect(&'static str),
}

/// Decide whether a transition may proceed.
///
/// Anonymous visitors are sent to login from any protected route, and signed
/// in users are sent from login to the dashboard. An anonymous visit to login
/// is always allowed, so the gate cannot bounce between the two.
pub fn decide(requires_auth: bool, target_is_login: bool, authenticated: bool) -> NavigationDecision {
    if requires_auth && !authenticated {
        NavigationDecision::Redirect(LOGIN_PATH)
    } else if !requires_auth && target_is_login && authenticated {
        NavigationDecision::Redirect(DASHBOARD_PATH)
    } else {
        NavigationDecision::Allow
    }
}

/// Gate a resolved route against the current authentication state
pub fn check(route: &Route, authenticated: bool) -> NavigationDecision {
    decide(route.requires_auth(), route.name == RouteName::Login, authenticated)
}
