//! Adapter implementations for backlog item ports.

pub mod memory;
