//! REST API client module for the DevOrbit backend.
//!
//! This module provides the `ApiClient` for talking to the backend and the
//! interceptor chain every request and response passes through.
//!
//! Authenticated calls carry `Authorization: Bearer <token>`, attached by the
//! `RequestAuthorizer` from the live session. A 401 on any call is absorbed by
//! the `ResponseGuardian`, which signs the user out.

pub mod client;
pub mod error;
pub mod interceptors;

pub use client::ApiClient;
pub use error::{is_handled, ApiError};
pub use interceptors::{
    RequestAuthorizer, RequestInterceptor, ResponseContext, ResponseGuardian, ResponseInterceptor,
};
