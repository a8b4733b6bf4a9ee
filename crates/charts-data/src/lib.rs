//! Data layer for Indundi Charts.
//!
//! Loads the channel and video CSV snapshots and turns them into the "Top N"
//! rankings, time-windowed subsets, category and tag counts and chart series
//! that the dashboard pages display.

pub mod aggregator;
pub mod analysis;
pub mod loader;
pub mod ranking;
pub mod time_window;

pub use charts_core as core;
