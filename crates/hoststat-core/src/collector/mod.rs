//! Host telemetry collectors.
//!
//! Every query talks to the kernel through two seams so that decoding and
//! normalization can be tested on any host:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  DiskCollector                        MemoryCollector        │
//! │  - partitions   (getfsstat)           - virtual_memory       │
//! │  - io_counters  (kern.devstat.all)      (hw.memsize, vm_stat)│
//! │  - serial_number (udev, sysfs)                               │
//! │          │                                   │               │
//! │          ├──────────────┬────────────────────┘               │
//! │   ┌──────▼──────┐ ┌─────▼──────┐   ┌─────────────────────┐   │
//! │   │ FileSystem  │ │   Kernel   │   │ decode (layouts,    │   │
//! │   │  (trait)    │ │  (trait)   │   │ bintime, c_string)  │   │
//! │   └──────┬──────┘ └─────┬──────┘   └─────────────────────┘   │
//! └──────────┼──────────────┼────────────────────────────────────┘
//!            │              │
//!     ┌──────▼──────┐ ┌─────▼──────┐ ┌──────────────────────┐
//!     │   RealFs    │ │ RealKernel │ │ MockFs / MockKernel  │
//!     └─────────────┘ └────────────┘ └──────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use hoststat_core::collector::{DiskCollector, RealFs, RealKernel};
//!
//! let disks = DiskCollector::new(RealKernel::new(), RealFs::new());
//! let partitions = disks.partitions(false).unwrap();
//! ```
//!
//! ## Testing (with mocks)
//!
//! ```
//! use hoststat_core::collector::{DiskCollector, MockKernel};
//!
//! let (kernel, fs) = MockKernel::freebsd_host();
//! let disks = DiskCollector::new(kernel, fs);
//! let counters = disks.io_counters(&[]).unwrap();
//! assert!(counters.contains_key("ada0"));
//! ```

pub mod decode;
pub mod disk;
mod error;
pub mod kernel;
pub mod mem;
pub mod mock;
pub mod traits;

use std::collections::HashMap;
use std::path::Path;

pub use disk::DiskCollector;
pub use error::CollectError;
pub use kernel::RealKernel;
pub use mem::MemoryCollector;
pub use mock::{MockFs, MockKernel};
pub use traits::{FileSystem, Kernel, RealFs};

use crate::model::{IoCounters, Partition, VirtualMemoryStat};

/// Lists mounted filesystems of the running host.
///
/// With `all == false` pseudo filesystems and entries whose device node is
/// gone are dropped.
pub fn partitions(all: bool) -> Result<Vec<Partition>, CollectError> {
    DiskCollector::new(RealKernel::new(), RealFs::new()).partitions(all)
}

/// Reads per-device I/O counters of the running host. An empty `names`
/// slice returns every device.
pub fn io_counters(names: &[&str]) -> Result<HashMap<String, IoCounters>, CollectError> {
    DiskCollector::new(RealKernel::new(), RealFs::new()).io_counters(names)
}

/// Best-effort serial number of the block device at `path`, or an empty string.
pub fn disk_serial_number(path: impl AsRef<Path>) -> String {
    DiskCollector::new(RealKernel::new(), RealFs::new()).serial_number(path.as_ref())
}

/// Reads virtual memory statistics of the running host.
pub fn virtual_memory() -> Result<VirtualMemoryStat, CollectError> {
    MemoryCollector::new(RealKernel::new()).virtual_memory()
}
