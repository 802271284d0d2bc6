//! Output records produced by the collectors.
//!
//! All records are built fresh per query and serialize with serde.

mod disk;
mod memory;

pub use disk::{IoCounters, IoCountersReport, Partition};
pub use memory::VirtualMemoryStat;
