//! The development pipeline and its execution fold.

use super::{ActionKind, PipelineAction, PipelineError};
use std::sync::Arc;
use tracing::{info, warn};

/// Summary of one pipeline execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRun {
    /// Whether every action succeeded.
    pub succeeded: bool,
    /// Number of actions that were invoked, including a failing one.
    pub executed: usize,
    /// Name of the action that stopped the run, if any.
    pub failed_action: Option<String>,
}

/// An ordered sequence of actions executed with short-circuit on failure.
#[derive(Debug, Clone)]
pub struct DevelopmentPipeline {
    name: String,
    actions: Vec<Arc<dyn PipelineAction>>,
}

impl DevelopmentPipeline {
    /// Creates an empty pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::EmptyPipelineName`] for a blank name.
    pub fn new(name: impl Into<String>) -> Result<Self, PipelineError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PipelineError::EmptyPipelineName);
        }
        Ok(Self {
            name: trimmed.to_owned(),
            actions: Vec::new(),
        })
    }

    /// Appends an action, builder style.
    #[must_use]
    pub fn with_action(mut self, action: Arc<dyn PipelineAction>) -> Self {
        self.actions.push(action);
        self
    }

    /// Appends an action.
    pub fn add_action(&mut self, action: Arc<dyn PipelineAction>) {
        self.actions.push(action);
    }

    /// Returns the pipeline name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the actions in execution order.
    #[must_use]
    pub fn actions(&self) -> &[Arc<dyn PipelineAction>] {
        &self.actions
    }

    /// Returns whether the last action is a deployment.
    #[must_use]
    pub fn ends_with_deployment(&self) -> bool {
        self.actions
            .last()
            .is_some_and(|action| action.kind() == ActionKind::Deploy)
    }

    /// Executes every action in order and reports overall success.
    ///
    /// Stops at the first failing action; an empty pipeline succeeds.
    #[must_use]
    pub fn execute(&self) -> bool {
        self.run().succeeded
    }

    /// Executes the pipeline and returns a summary of the run.
    #[must_use]
    pub fn run(&self) -> PipelineRun {
        info!(pipeline = %self.name, actions = self.actions.len(), "pipeline started");
        let mut executed = 0;
        for action in &self.actions {
            executed += 1;
            if !action.execute() {
                warn!(pipeline = %self.name, action = %action.name(), kind = %action.kind(), "pipeline action failed");
                return PipelineRun {
                    succeeded: false,
                    executed,
                    failed_action: Some(action.name().to_owned()),
                };
            }
        }
        info!(pipeline = %self.name, executed, "pipeline succeeded");
        PipelineRun {
            succeeded: true,
            executed,
            failed_action: None,
        }
    }
}
