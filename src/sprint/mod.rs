//! Sprints, their lifecycle state machine and the release sub-protocol.
//!
//! A sprint moves through `created → running → finished` and then either
//! into review (`reviewed`) or into the asynchronous release handshake
//! (`releasing → released`, back to `finished` on pipeline failure, or
//! `cancelled`). Release results arrive from a [`ports::ReleaseExecutor`] and
//! are applied only while the attempt that produced them is still current.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
