//! # nlxdf
//!
//! Library half of the nlxdf binary: configuration loading and report
//! rendering, shared by the CLI and its integration tests.

pub mod config;
pub mod report;
