//! Mounted filesystem and disk I/O records.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One mounted filesystem.
///
/// Source: `getfsstat(2)` (`struct statfs`)
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct Partition {
    /// Mounted device or source, e.g. `/dev/ada0p2` or `zroot/ROOT/default`.
    /// Source: `f_mntfromname`
    pub device: String,

    /// Directory the filesystem is mounted on.
    /// Source: `f_mntonname`
    pub mountpoint: String,

    /// Filesystem type name, e.g. `ufs`, `zfs`, `devfs`.
    /// Source: `f_fstypename`
    pub fs_type: String,

    /// Comma-separated mount options, always starting with `rw` or `ro`.
    /// Source: `f_flags`
    pub options: String,
}

/// Cumulative I/O counters of one physical disk.
///
/// Source: `kern.devstat.all` (`struct devstat`)
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct IoCounters {
    /// Device name with unit number, e.g. `ada0`.
    pub name: String,

    /// Completed read operations.
    pub read_count: u64,

    /// Completed write operations.
    pub write_count: u64,

    /// Bytes read.
    pub read_bytes: u64,

    /// Bytes written.
    pub write_bytes: u64,

    /// Total time spent on reads (ms).
    pub read_time_ms: u64,

    /// Total time spent on writes (ms).
    pub write_time_ms: u64,

    /// Time the device had at least one transaction outstanding (ms).
    pub busy_time_ms: u64,
}

/// I/O counters together with the number of device records that could not be decoded.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
pub struct IoCountersReport {
    pub counters: HashMap<String, IoCounters>,
    pub skipped: usize,
}
