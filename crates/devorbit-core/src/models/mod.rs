//! Data models for DevOrbit API entities.
//!
//! This module contains the data structures exchanged with the DevOrbit
//! backend:
//!
//! - `User`: the authenticated identity kept in the session
//! - `LoginResponse`, `AuthorizationUrlResponse`: OAuth login payloads
//! - GitHub activity types: `GithubDailyStat`, `GithubSyncResponse`, etc.

pub mod github;
pub mod timestamp;
pub mod user;

pub use github::{GithubDailyStat, GithubDailyStatsResponse, GithubSyncResponse, SyncMode, SyncParams};
pub use user::{AuthorizationUrlResponse, LoginResponse, User};
