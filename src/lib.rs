//! Engineering-consistency validation for vessel noon reports.
//!
//! The pipeline reads a noon-report CSV ([`loader`]), derives report hours
//! and fuel-efficiency figures ([`hours`], [`metrics`]), evaluates each
//! report against the rule set ([`rules`]), and assembles the processed
//! table, the failure table and the batch summary ([`assemble`], [`engine`]).
//! Results go out as CSV/JSON files ([`output`]) and per-vessel alert
//! messages ([`notify`]).

pub mod assemble;
pub mod columns;
pub mod config;
pub mod engine;
pub mod error;
pub mod hours;
pub mod loader;
pub mod metrics;
pub mod notify;
pub mod output;
pub mod rules;
pub mod types;
pub mod util;

pub use engine::{validate, ValidationOutcome};
pub use error::ValidateError;
