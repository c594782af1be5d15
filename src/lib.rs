//! Scrumflow: Scrum project management with release pipelines.
//!
//! This crate models backlog items and sprints as explicit state machines,
//! notifies the people involved when either changes state, and runs a
//! sprint's release pipeline asynchronously without letting a late or stale
//! pipeline result overwrite a newer decision.
//!
//! # Architecture
//!
//! Scrumflow follows hexagonal architecture principles:
//!
//! - **Domain**: Aggregates, transition tables and events, free of
//!   infrastructure
//! - **Ports**: Repository, delivery and execution contracts
//! - **Adapters**: In-memory stores, simulated channels, a tokio release
//!   executor and template-backed reports
//! - **Services**: Use cases that look entities up by identifier and wire
//!   observers
//!
//! # Modules
//!
//! - [`work_item`]: Backlog items, activities and discussions
//! - [`sprint`]: Sprint lifecycle and the release handshake
//! - [`pipeline`]: Development pipelines and their actions
//! - [`notification`]: Users observing items and sprints
//! - [`user`] and [`project`]: People and the product backlog
//! - [`report`]: Read-only sprint reports
//! - [`observer`], [`shared`] and [`error`]: Cross-cutting building blocks

pub mod error;
pub mod notification;
pub mod observer;
pub mod pipeline;
pub mod project;
pub mod report;
pub mod shared;
pub mod sprint;
pub mod user;
pub mod work_item;
