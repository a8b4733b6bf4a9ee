//! Terminal UI layer for Indundi Charts.
//!
//! Provides themes, the header and page switcher, table and chart sections,
//! a plain-text report renderer, and the interactive event loop built on
//! top of [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod components;
pub mod report;
pub mod table_view;
pub mod themes;

pub use charts_core as core;
