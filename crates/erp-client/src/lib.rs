//! REST access for the ERP workbench
//!
//! [`ApiClient`] talks to the backend's `{success, data, message}` endpoints
//! with a bearer token from `POST /api/auth/login`. [`HttpRepository`] puts
//! that client behind the record [`Repository`](erp_records::Repository)
//! seam so any page can run against the live API instead of sample data.

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

pub mod client;
pub mod console;
pub mod envelope;
pub mod error;
pub mod render;
pub mod repository;

pub use client::{ApiClient, AuthUser, LOGIN_PATH, Session};
pub use envelope::Envelope;
pub use error::{ClientError, ClientResult};
pub use repository::HttpRepository;
