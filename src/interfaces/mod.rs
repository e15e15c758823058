//! Inputs and outputs at the edge of the crate: CSV scripts and summaries,
//! and text rendering of dashboards.

pub mod csv;
pub mod display;
