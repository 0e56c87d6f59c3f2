//! Generic record page engine for the ERP admin pages
//!
//! Every page of the admin front end follows one pattern: a repository
//! supplies records, a filter bar narrows them, a list view renders one page
//! of them with row actions, a detail dialog creates or edits one, and stat
//! cards and a chart summarise the full array. This crate implements that
//! pattern once, parametrised by the [`Record`](erp_core::Record) type, and
//! ships page definitions for the record types in [`erp_core::types`].

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
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::significant_drop_tightening,
    clippy::cast_precision_loss,
    clippy::redundant_closure,
    clippy::type_complexity,
    clippy::float_cmp
)]

pub mod aggregate;
pub mod chart;
pub mod definition;
pub mod dialog;
pub mod error;
pub mod filter;
pub mod loader;
pub mod mutation;
pub mod notify;
pub mod page;
pub mod pages;
pub mod pagination;
pub mod repository;
pub mod sample;
pub mod sort;
pub mod view;

pub use aggregate::{Aggregate, StatCard, StatFormat, StatSpec};
pub use chart::{ChartData, ChartKind, ChartSpec, SeriesSpec};
pub use definition::PageDefinition;
pub use dialog::{DetailDialog, DialogState, Submission};
pub use error::{BoxError, RecordError, RecordResult};
pub use filter::{FilterBar, FilterSchema, FilterSet, Predicate, SelectFilter};
pub use loader::{LoadTicket, LoadTracker};
pub use mutation::{AlwaysConfirm, Confirm, NeverConfirm, RecordSet};
pub use notify::{Notifications, Severity, Toast};
pub use page::{LoadOutcome, PageController};
pub use pagination::{DEFAULT_PAGE_SIZE, Page, PageMeta, PageRequest, paginate};
pub use repository::{Backend, InMemoryRepository, Repository};
pub use sort::{SortDirection, SortKey, SortSpec};
pub use view::{Cell, Column, ListView, Row, RowAction, Table};
