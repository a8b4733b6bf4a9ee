//! Runtime layer for Indundi Charts.
//!
//! Owns the process-wide table store and assembles the sections of each
//! dashboard page from the resident tables.

pub mod dashboard;
pub mod data_manager;

pub use charts_core as core;
pub use charts_data as data;
