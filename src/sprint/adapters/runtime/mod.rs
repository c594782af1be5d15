//! Release execution on the Tokio runtime.

mod config;
mod executor;

pub use config::{RELEASE_TIMEOUT_ENV, ReleaseExecutorConfig};
pub use executor::TokioReleaseExecutor;
