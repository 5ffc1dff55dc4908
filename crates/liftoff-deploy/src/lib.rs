//! Phase-ordered deployment pipeline for liftoff.
//!
//! [`Pipeline`] drives a run through the ten [`Phase`]s against the
//! [`CloudProvider`](liftoff_cloud::CloudProvider),
//! [`ContainerEngine`](liftoff_cloud::ContainerEngine) and
//! [`ToolProbe`](liftoff_cloud::ToolProbe) seams. Topology differences live
//! behind [`DeploymentStrategy`]; the first failing phase ends the run with a
//! [`PipelineError`] naming it.

pub mod auth;
pub mod configure;
pub mod error;
pub mod execute;
pub mod phase;
pub mod pipeline;
pub mod prereq;
pub mod progress;
pub mod provision;
pub mod publish;
pub mod report;
pub mod secrets;
pub mod strategy;

pub use error::{DeployError, PipelineError, PublishStage};
pub use execute::Endpoint;
pub use phase::Phase;
pub use pipeline::{Deployment, Pipeline};
pub use progress::{ConsoleProgress, Progress, Status};
pub use publish::PublishedArtifact;
pub use strategy::{AppServiceStrategy, ContainerInstanceStrategy, DeploymentStrategy};
