//! Domain model for sprints.

mod error;
mod event;
mod ids;
mod release;
mod sprint;
mod state;

pub use error::{ParseSprintStateError, SprintDomainError, SprintPrecondition};
pub use event::{SprintEvent, SprintEventKind};
pub use ids::SprintId;
pub use release::{ReleaseCallback, ReleaseResolution, ReleaseTicket};
pub use sprint::{SharedSprint, Sprint, SprintDraft, SprintTransition};
pub use state::{ALL_SPRINT_STATES, SprintAction, SprintState, SprintType};
