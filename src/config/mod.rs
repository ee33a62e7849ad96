//! # Configuration Management
//!
//! Environment-driven configuration for the PodSec service. Everything is
//! read once at startup into an immutable [`AppConfig`] and injected into the
//! components that need it.

mod settings;

pub use settings::{
    AppConfig, AuthConfig, BackendMode, DatabaseConfig, ObservabilityConfig, PodmanConfig,
    ServerConfig,
};
