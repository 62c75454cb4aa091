//! Shared building blocks for the EC dashboard.
//!
//! Error taxonomy, experiment configuration, record models, Unicode name
//! normalization, the [`statistic::Statistic`] sentinel, CLI settings and
//! text formatting helpers.

pub mod error;
pub mod experiment;
pub mod formatting;
pub mod models;
pub mod normalize;
pub mod settings;
pub mod statistic;
pub mod timestamp;

pub use error::{DashboardError, ErrorKind, Result};
