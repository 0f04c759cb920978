//! Gifts Core: shared domain vocabulary.
//!
//! This crate defines the category enumeration, the error type every
//! context returns, and the ports (clock, narrative client) that the
//! infrastructure crates implement. It contains no infrastructure code.

pub mod category;
pub mod clock;
pub mod error;
pub mod narrative;
