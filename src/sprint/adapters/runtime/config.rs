//! Release executor settings.

use std::time::Duration;
use tracing::warn;

/// Environment variable holding the release timeout in whole seconds.
pub const RELEASE_TIMEOUT_ENV: &str = "SCRUMFLOW_RELEASE_TIMEOUT_SECS";

/// Settings for [`super::TokioReleaseExecutor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReleaseExecutorConfig {
    timeout: Option<Duration>,
}

impl ReleaseExecutorConfig {
    /// Returns a configuration that bounds each pipeline run.
    ///
    /// A run that exceeds the timeout counts as a failed release.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the configured timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Reads [`RELEASE_TIMEOUT_ENV`] from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Missing, zero or unparsable values leave the timeout unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let Some(raw) = lookup(RELEASE_TIMEOUT_ENV) else {
            return Self::default();
        };
        match raw.trim().parse::<u64>() {
            Ok(0) => Self::default(),
            Ok(secs) => Self::default().with_timeout(Duration::from_secs(secs)),
            Err(err) => {
                warn!(variable = RELEASE_TIMEOUT_ENV, value = %raw, error = %err, "ignoring invalid release timeout");
                Self::default()
            }
        }
    }
}
