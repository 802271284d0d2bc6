//! Disk collectors: mounted filesystems, per-device I/O counters and serial numbers.

pub mod devstat;
pub mod mount;
pub mod serial;

use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

use crate::collector::error::CollectError;
use crate::collector::traits::{FileSystem, Kernel};
use crate::model::{IoCounters, IoCountersReport, Partition};

pub use devstat::DevstatTable;
pub use mount::{MountFlags, format_options};
pub use serial::{DeviceId, resolve_serial};

/// Collects disk information from the kernel and device metadata files.
pub struct DiskCollector<K: Kernel, F: FileSystem> {
    kernel: K,
    fs: F,
}

impl<K: Kernel, F: FileSystem> DiskCollector<K, F> {
    /// Creates a new disk collector.
    ///
    /// # Arguments
    /// * `kernel` - Kernel implementation (real or mock)
    /// * `fs` - Filesystem implementation used for device checks and metadata
    pub fn new(kernel: K, fs: F) -> Self {
        Self { kernel, fs }
    }

    /// Lists mounted filesystems in kernel order.
    ///
    /// With `all == false`, entries whose device is not an absolute path that
    /// exists on the live filesystem are dropped.
    pub fn partitions(&self, all: bool) -> Result<Vec<Partition>, CollectError> {
        mount::list_partitions(&self.kernel, &self.fs, all)
    }

    /// Reads per-device I/O counters, optionally restricted to `names`.
    ///
    /// Records that fail to decode are skipped; use [`Self::io_counters_report`]
    /// to see how many.
    pub fn io_counters(&self, names: &[&str]) -> Result<HashMap<String, IoCounters>, CollectError> {
        let report = self.io_counters_report(names)?;
        if report.skipped > 0 {
            warn!(
                skipped = report.skipped,
                decoded = report.counters.len(),
                "some devstat records could not be decoded"
            );
        }
        Ok(report.counters)
    }

    /// Like [`Self::io_counters`] but also reports the number of skipped records.
    pub fn io_counters_report(&self, names: &[&str]) -> Result<IoCountersReport, CollectError> {
        devstat::collect_io_counters(&self.kernel, names)
    }

    /// Best-effort serial number of the device at `path`. Empty when unknown.
    pub fn serial_number(&self, path: &Path) -> String {
        resolve_serial(&self.fs, path)
    }
}
