//! Typed construction of pipeline actions.

use super::action::{
    AnalyseAction, BuildAction, DeployAction, PackageAction, SourceAction, TestAction,
    UtilityAction,
};
use super::{ActionKind, PipelineAction, PipelineError};
use std::sync::Arc;

/// Parameters for one pipeline action, per kind.
///
/// Optional fields fall back to the defaults a build server would use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionSpec {
    /// Check out a branch of a repository.
    Source {
        /// Repository URL. Required.
        repository_url: String,
        /// Branch to check out. Required.
        branch: String,
    },
    /// Install a list of packages.
    Package {
        /// Packages to install.
        packages: Vec<String>,
    },
    /// Compile the product.
    Build {
        /// Build configuration, `Release` when unset.
        configuration: Option<String>,
        /// Target platform, `Any CPU` when unset.
        platform: Option<String>,
    },
    /// Run the test suite.
    Test {
        /// Test framework, `NUnit` when unset.
        framework: Option<String>,
        /// Whether results are published.
        publish_results: bool,
        /// Whether coverage is collected.
        collect_coverage: bool,
        /// Simulate a failing test run.
        should_fail: bool,
    },
    /// Run static analysis.
    Analyse {
        /// Analysis tool, `SonarQube` when unset.
        tool: Option<String>,
        /// Optional settings file.
        settings_file: Option<String>,
    },
    /// Deploy to an environment.
    Deploy {
        /// Target environment. Required.
        environment: String,
        /// Target server. Required.
        server_address: String,
        /// Simulate a failing deployment.
        should_fail: bool,
    },
    /// Run a command.
    Utility {
        /// Command to run. Required.
        command: String,
        /// Command arguments.
        arguments: Vec<String>,
    },
}

impl ActionSpec {
    /// Returns the kind of action this spec builds.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::Source { .. } => ActionKind::Source,
            Self::Package { .. } => ActionKind::Package,
            Self::Build { .. } => ActionKind::Build,
            Self::Test { .. } => ActionKind::Test,
            Self::Analyse { .. } => ActionKind::Analyse,
            Self::Deploy { .. } => ActionKind::Deploy,
            Self::Utility { .. } => ActionKind::Utility,
        }
    }

    /// A build with default configuration and platform.
    #[must_use]
    pub const fn build() -> Self {
        Self::Build {
            configuration: None,
            platform: None,
        }
    }

    /// A test run with default framework that publishes results and
    /// collects coverage.
    #[must_use]
    pub const fn test(should_fail: bool) -> Self {
        Self::Test {
            framework: None,
            publish_results: true,
            collect_coverage: true,
            should_fail,
        }
    }

    /// A deployment to `environment` on `server_address`.
    #[must_use]
    pub fn deploy(environment: impl Into<String>, server_address: impl Into<String>) -> Self {
        Self::Deploy {
            environment: environment.into(),
            server_address: server_address.into(),
            should_fail: false,
        }
    }
}

fn required(
    kind: ActionKind,
    parameter: &'static str,
    value: &str,
) -> Result<String, PipelineError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PipelineError::MissingParameter { kind, parameter });
    }
    Ok(trimmed.to_owned())
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|candidate| !candidate.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}

/// Builds a pipeline action from its typed parameters.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyActionName`] for a blank name and
/// [`PipelineError::MissingParameter`] when a required string parameter is
/// blank.
pub fn create_action(
    name: &str,
    spec: ActionSpec,
) -> Result<Arc<dyn PipelineAction>, PipelineError> {
    let kind = spec.kind();
    let action_name = name.trim();
    if action_name.is_empty() {
        return Err(PipelineError::EmptyActionName(kind));
    }
    let name = action_name.to_owned();

    let action: Arc<dyn PipelineAction> = match spec {
        ActionSpec::Source {
            repository_url,
            branch,
        } => Arc::new(SourceAction {
            name,
            repository_url: required(kind, "repository_url", &repository_url)?,
            branch: required(kind, "branch", &branch)?,
        }),
        ActionSpec::Package { packages } => Arc::new(PackageAction { name, packages }),
        ActionSpec::Build {
            configuration,
            platform,
        } => Arc::new(BuildAction {
            name,
            configuration: or_default(configuration, "Release"),
            platform: or_default(platform, "Any CPU"),
        }),
        ActionSpec::Test {
            framework,
            publish_results,
            collect_coverage,
            should_fail,
        } => Arc::new(TestAction {
            name,
            framework: or_default(framework, "NUnit"),
            publish_results,
            collect_coverage,
            should_fail,
        }),
        ActionSpec::Analyse {
            tool,
            settings_file,
        } => Arc::new(AnalyseAction {
            name,
            tool: or_default(tool, "SonarQube"),
            settings_file,
        }),
        ActionSpec::Deploy {
            environment,
            server_address,
            should_fail,
        } => Arc::new(DeployAction {
            name,
            environment: required(kind, "environment", &environment)?,
            server_address: required(kind, "server_address", &server_address)?,
            should_fail,
        }),
        ActionSpec::Utility { command, arguments } => Arc::new(UtilityAction {
            name,
            command: required(kind, "command", &command)?,
            arguments,
        }),
    };
    Ok(action)
}
