//! hoststat-core — host resource telemetry decoded straight from kernel interfaces.
//!
//! Provides:
//! - `collector` — mount table, disk I/O and virtual memory collectors
//! - `model` — serializable output records
//! - `fmt` — shared formatting helpers (bytes, milliseconds, percent)

pub mod collector;
pub mod fmt;
pub mod model;
