//! Rule-based recovery outcome estimation for hip fracture patients.
//!
//! The [`estimation`] module holds the pipeline: profile validation, the
//! versioned rule registry, the scoring engine and the outcome formatter.
//! `config`, `telemetry` and `error` carry the application plumbing shared
//! with the HTTP/CLI front end.

pub mod config;
pub mod error;
pub mod estimation;
pub mod telemetry;
