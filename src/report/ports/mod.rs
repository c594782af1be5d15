//! Port contracts for report rendering.

mod strategy;

pub use strategy::ReportGenerationStrategy;
