//! Test runners for a deployed ERP backend
//!
//! [`suite`] runs a fixed sequence of health, authentication, API, front-end
//! and security checks and reports pass/fail per case. [`load`] drives a
//! staged ramp of virtual users over the record list endpoints and judges
//! the run against latency and error-rate thresholds.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc
)]

pub mod error;
pub mod load;
pub mod suite;

pub use error::{HarnessError, HarnessResult};
pub use load::{LoadReport, LoadTarget, Ramp, RunOptions, Stage, Thresholds, run_load};
pub use suite::{Category, Harness, Summary, TestCase, all_cases, run_suite, select_cases};
