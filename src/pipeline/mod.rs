//! Sequential development pipelines used by release sprints.
//!
//! A [`DevelopmentPipeline`] is an ordered list of [`PipelineAction`]s that
//! executes strictly in order and stops at the first failing action. Action
//! failures are data, not errors: [`DevelopmentPipeline::execute`] returns a
//! boolean and [`DevelopmentPipeline::run`] a [`PipelineRun`] summary. The
//! bundled actions simulate their work and are built through
//! [`create_action`] from a typed [`ActionSpec`].

mod action;
mod development;
mod error;
mod factory;

pub use action::{ActionKind, PipelineAction};
pub use development::{DevelopmentPipeline, PipelineRun};
pub use error::PipelineError;
pub use factory::{ActionSpec, create_action};

#[cfg(test)]
mod tests;
