//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `SessionStore`: the bearer token and user, persisted across restarts
//! - `KeyValueStore`: durable storage backends (file, OS keychain, memory)
//! - `AuthFlow`: the GitHub OAuth login sequence built on top of both
//!
//! The session is persisted as two slots under the `devorbit_auth` namespace.

pub mod flow;
pub mod session;
pub mod storage;

pub use flow::AuthFlow;
pub use session::{SessionState, SessionStore, STORAGE_NAMESPACE};
pub use storage::{FileStore, KeyValueStore, KeyringStore, MemoryStore, StorageError};
