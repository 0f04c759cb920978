//! Domain model for the assessment flow.

pub mod aggregates;
pub mod answers;
pub mod commands;
pub mod pagination;
pub mod scoring;
