//! Adapter implementations for report ports.

pub mod template;
