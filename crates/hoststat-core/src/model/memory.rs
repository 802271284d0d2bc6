//! Virtual memory record.

use serde::{Deserialize, Serialize};

/// Virtual memory state in bytes.
///
/// `total` and the page categories come from two separate reads (a sysctl and
/// a `vm_stat` snapshot), so they may describe slightly different instants.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct VirtualMemoryStat {
    /// Physical memory.
    /// Source: `hw.memsize`
    pub total: u64,

    /// `free + inactive`.
    pub available: u64,

    /// `total - free`.
    pub used: u64,

    /// `(total - available) / total * 100`.
    pub used_percent: f64,

    /// Source: `vm_stat` "Pages free"
    pub free: u64,

    /// Source: `vm_stat` "Pages active"
    pub active: u64,

    /// Source: `vm_stat` "Pages inactive"
    pub inactive: u64,

    /// Source: `vm_stat` "Pages wired down"
    pub wired: u64,
}

impl VirtualMemoryStat {
    /// Fills `available`, `used` and `used_percent` from the raw fields.
    pub fn derive(&mut self) {
        self.available = self.free.saturating_add(self.inactive);
        self.used = self.total.saturating_sub(self.free);
        self.used_percent = if self.total == 0 {
            0.0
        } else {
            self.total.saturating_sub(self.available) as f64 / self.total as f64 * 100.0
        };
    }
}
