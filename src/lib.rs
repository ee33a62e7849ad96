//! # PodSec
//!
//! Authenticated management of Podman secrets behind a small HTTP API.
//!
//! The service verifies users against a SQLite credential store, issues
//! stateless HS256 session tokens, and proxies secret CRUD to a Podman
//! runtime through one of two interchangeable backends: a local `podman`
//! subprocess or the remote libpod HTTP API. The backend is selected once
//! at startup from `PODMAN_HOST`.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod observability;
pub mod podman;
pub mod startup;
pub mod storage;

pub use config::AppConfig;
pub use errors::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
