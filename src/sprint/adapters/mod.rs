//! Adapter implementations for sprint ports.

pub mod memory;
pub mod runtime;
