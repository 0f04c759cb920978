//! Gifts Assessment: the questionnaire flow.
//!
//! Responsible for collecting ratings page by page, scoring them into a
//! ranked per-category result list, and sequencing the Landing, Quiz,
//! Results and Coach views of a single session.

pub mod application;
pub mod domain;
pub mod repository;
