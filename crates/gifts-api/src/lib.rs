//! HTTP host for the spiritual gifts assessment.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
