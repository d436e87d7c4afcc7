//! # Processing Module
//!
//! Per-frame resize steps shared by detection and display.

pub mod processing;

pub use processing::FrameScaler;
