//! Sprint reports: a read-only snapshot rendered in a chosen format.
//!
//! A [`domain::SprintReport`] is captured from a locked sprint, walking its
//! backlog through the [`crate::work_item::domain::WorkItem`] composite.
//! Rendering is a strategy ([`ports::ReportGenerationStrategy`]) so plain
//! text and markdown share the snapshot and the header/footer decoration.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Template-backed strategies in [`adapters`]
//! - Report assembly in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
