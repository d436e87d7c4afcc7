//! # Configuration Module
//!
//! This module provides the scanner configuration and address handling.

pub mod config;

pub use config::{ScannerConfig, normalize_address, stream_endpoint};
