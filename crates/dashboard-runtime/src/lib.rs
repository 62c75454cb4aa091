//! Runtime layer for the EC dashboard.
//!
//! Caches loaded dashboards per data directory and reloads them when the
//! directory contents change.

pub mod data_manager;
pub mod fingerprint;

pub use dashboard_core as core;
pub use dashboard_data as data;
