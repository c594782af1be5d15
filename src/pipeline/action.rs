//! The pipeline action capability and the bundled simulated actions.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{info, warn};

/// Kind of work a pipeline action performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Fetch sources from a repository.
    Source,
    /// Install packages.
    Package,
    /// Compile the product.
    Build,
    /// Run the test suite.
    Test,
    /// Run static analysis.
    Analyse,
    /// Deploy to an environment.
    Deploy,
    /// Run an arbitrary command.
    Utility,
}

impl ActionKind {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Package => "package",
            Self::Build => "build",
            Self::Test => "test",
            Self::Analyse => "analyse",
            Self::Deploy => "deploy",
            Self::Utility => "utility",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of a sequential pipeline.
///
/// `execute` reports success or failure only; actions produce no partial
/// output and are never rolled back.
pub trait PipelineAction: fmt::Debug + Send + Sync {
    /// Returns the action's display name.
    fn name(&self) -> &str;

    /// Returns the kind of work performed.
    fn kind(&self) -> ActionKind;

    /// Runs the action and returns whether it succeeded.
    fn execute(&self) -> bool;
}

#[derive(Debug)]
pub(super) struct SourceAction {
    pub(super) name: String,
    pub(super) repository_url: String,
    pub(super) branch: String,
}

impl PipelineAction for SourceAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ActionKind {
        ActionKind::Source
    }

    fn execute(&self) -> bool {
        info!(action = %self.name, repository = %self.repository_url, branch = %self.branch, "checking out sources");
        true
    }
}

#[derive(Debug)]
pub(super) struct PackageAction {
    pub(super) name: String,
    pub(super) packages: Vec<String>,
}

impl PipelineAction for PackageAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ActionKind {
        ActionKind::Package
    }

    fn execute(&self) -> bool {
        info!(action = %self.name, packages = %self.packages.join(", "), "installing packages");
        true
    }
}

#[derive(Debug)]
pub(super) struct BuildAction {
    pub(super) name: String,
    pub(super) configuration: String,
    pub(super) platform: String,
}

impl PipelineAction for BuildAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ActionKind {
        ActionKind::Build
    }

    fn execute(&self) -> bool {
        info!(action = %self.name, configuration = %self.configuration, platform = %self.platform, "building");
        true
    }
}

#[derive(Debug)]
pub(super) struct TestAction {
    pub(super) name: String,
    pub(super) framework: String,
    pub(super) publish_results: bool,
    pub(super) collect_coverage: bool,
    pub(super) should_fail: bool,
}

impl PipelineAction for TestAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ActionKind {
        ActionKind::Test
    }

    fn execute(&self) -> bool {
        info!(
            action = %self.name,
            framework = %self.framework,
            coverage = self.collect_coverage,
            publish = self.publish_results,
            "running tests"
        );
        if self.should_fail {
            warn!(action = %self.name, "test run failed");
            return false;
        }
        true
    }
}

#[derive(Debug)]
pub(super) struct AnalyseAction {
    pub(super) name: String,
    pub(super) tool: String,
    pub(super) settings_file: Option<String>,
}

impl PipelineAction for AnalyseAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ActionKind {
        ActionKind::Analyse
    }

    fn execute(&self) -> bool {
        info!(
            action = %self.name,
            tool = %self.tool,
            settings = self.settings_file.as_deref().unwrap_or("default"),
            "analysing code"
        );
        true
    }
}

#[derive(Debug)]
pub(super) struct DeployAction {
    pub(super) name: String,
    pub(super) environment: String,
    pub(super) server_address: String,
    pub(super) should_fail: bool,
}

impl PipelineAction for DeployAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ActionKind {
        ActionKind::Deploy
    }

    fn execute(&self) -> bool {
        info!(action = %self.name, environment = %self.environment, server = %self.server_address, "deploying");
        if self.should_fail {
            warn!(action = %self.name, environment = %self.environment, "deployment failed");
            return false;
        }
        true
    }
}

#[derive(Debug)]
pub(super) struct UtilityAction {
    pub(super) name: String,
    pub(super) command: String,
    pub(super) arguments: Vec<String>,
}

impl PipelineAction for UtilityAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ActionKind {
        ActionKind::Utility
    }

    fn execute(&self) -> bool {
        info!(action = %self.name, command = %self.command, arguments = %self.arguments.join(" "), "running utility command");
        true
    }
}
