//! ROI Bridge Settings Crate
//!
//! Handles configuration of the servers the bridge talks to and the options
//! that steer ROI transfers.

pub mod config;

pub use config::{Config, ServerSettings, TransferSettings, DEFAULT_PORT};
