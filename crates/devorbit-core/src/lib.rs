//! Client-side session handling for DevOrbit.
//!
//! The pieces fit together like this:
//!
//! - [`auth::SessionStore`] owns the bearer token and user, in memory and in
//!   durable storage.
//! - [`api::ApiClient`] sends every request through an interceptor chain:
//!   [`api::RequestAuthorizer`] attaches the token, [`api::ResponseGuardian`]
//!   signs the user out on a 401 and hard-navigates to login.
//! - [`router::Router`] runs the navigation gate before every in-app
//!   transition.
//!
//! The session store is shared as an `Arc` and handed to each of them
//! explicitly.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod router;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthFlow, SessionStore};
pub use config::Config;
pub use router::{Location, Navigator, Router};
