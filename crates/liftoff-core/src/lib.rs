//! Core types and configuration for liftoff.
//!
//! This crate defines the `liftoff.toml` schema ([`LiftoffConfig`]), the
//! per-run [`DeploymentConfig`] with its uniqueness-token naming, the local
//! secret file loader ([`SecretSet`]), and shared error types.

pub mod config;
pub mod deployment;
pub mod error;
pub mod naming;
pub mod secrets;

pub use config::{
    AppServiceConfig, BuildConfig, CONFIG_FILE, ContainerConfig, LiftoffConfig, ProjectConfig,
    RuntimeConfig, SecretsConfig, Topology,
};
pub use deployment::DeploymentConfig;
pub use error::{Error, Result};
pub use naming::RunToken;
pub use secrets::SecretSet;
