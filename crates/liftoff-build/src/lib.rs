//! Dockerfile generation and build-context bundling for liftoff.
//!
//! # Packaging
//!
//! ```text
//! liftoff deploy
//!   1. Dockerfile ── project Dockerfile, else DockerfileGenerator::render()
//!   2. Bundle     ── [build].include → .liftoff-bundle/
//!   3. Image      ── docker build .liftoff-bundle/ (container topology)
//!      Source     ── az webapp up from .liftoff-bundle/ (app-service topology)
//! ```
//!
//! # Bundle strategy
//!
//! Only paths listed in `[build].include` are copied. `.git/`, `.env`,
//! `__pycache__/` and the bundle directory itself are always excluded, so
//! the local secret file never reaches an image or the platform.

pub mod bundle;
pub mod custom;
pub mod dockerfile;

pub use custom::DockerfileSource;
pub use dockerfile::DockerfileGenerator;
