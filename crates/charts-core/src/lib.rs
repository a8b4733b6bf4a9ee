//! Shared domain types for Indundi Charts.
//!
//! Holds the channel and video record models, the error type, CLI settings,
//! number formatting and the timestamp helpers used by every other crate in
//! the workspace.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;
