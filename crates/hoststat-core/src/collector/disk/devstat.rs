//! Per-device I/O counters from the `kern.devstat.all` sysctl.
//!
//! The sysctl value is an 8-byte generation/version header followed by one
//! `struct devstat` per registered device.

use tracing::{debug, trace, warn};

use crate::collector::decode::layout::{DEVSTAT_READ, DEVSTAT_WRITE, Devstat};
use crate::collector::decode::{ByteReader, DecodeError, KernelStruct, c_string, decode_records};
use crate::collector::error::CollectError;
use crate::collector::traits::Kernel;
use crate::model::{IoCounters, IoCountersReport};

/// Name of the sysctl holding the device statistics table.
pub const DEVSTAT_MIB: &str = "kern.devstat.all";

/// Bytes preceding the first record.
pub const HEADER_LEN: usize = 8;

/// A `kern.devstat.all` blob split into header and records.
#[derive(Debug, Clone, Copy)]
pub struct DevstatTable<'a> {
    version: u64,
    records: &'a [u8],
}

impl<'a> DevstatTable<'a> {
    /// Splits the raw sysctl value. Fails if the header itself is missing.
    pub fn parse(blob: &'a [u8]) -> Result<Self, DecodeError> {
        if blob.len() < HEADER_LEN {
            return Err(DecodeError::Truncated {
                needed: HEADER_LEN,
                available: blob.len(),
            });
        }
        let version = ByteReader::new(blob).read_u64()?;
        Ok(Self {
            version,
            records: &blob[HEADER_LEN..],
        })
    }

    /// Header value preceding the records.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of whole records in the table.
    pub fn len(&self) -> usize {
        self.records.len() / Devstat::SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decodes each whole record; a trailing partial record is ignored.
    pub fn records(&self) -> impl Iterator<Item = Result<Devstat, DecodeError>> + 'a {
        decode_records::<Devstat>(self.records)
    }
}

/// Composes the device name from the name prefix and unit number, e.g. `ada0`.
pub fn device_name(ds: &Devstat) -> String {
    format!("{}{}", c_string(&ds.device_name), ds.unit_number)
}

impl From<&Devstat> for IoCounters {
    fn from(ds: &Devstat) -> Self {
        IoCounters {
            name: device_name(ds),
            read_count: ds.operations[DEVSTAT_READ],
            write_count: ds.operations[DEVSTAT_WRITE],
            read_bytes: ds.bytes[DEVSTAT_READ],
            write_bytes: ds.bytes[DEVSTAT_WRITE],
            read_time_ms: ds.duration[DEVSTAT_READ].as_millis(),
            write_time_ms: ds.duration[DEVSTAT_WRITE].as_millis(),
            busy_time_ms: ds.busy_time.as_millis(),
        }
    }
}

pub(super) fn collect_io_counters<K: Kernel>(
    kernel: &K,
    names: &[&str],
) -> Result<IoCountersReport, CollectError> {
    let blob = kernel.sysctl(DEVSTAT_MIB)?;
    let mut report = IoCountersReport::default();

    let table = match DevstatTable::parse(&blob) {
        Ok(table) => table,
        Err(e) => {
            warn!(error = %e, "devstat table has no header");
            return Ok(report);
        }
    };
    debug!(
        version = table.version(),
        records = table.len(),
        "read devstat table"
    );

    for record in table.records() {
        let ds = match record {
            Ok(ds) => ds,
            Err(e) => {
                debug!(error = %e, "skipping devstat record");
                report.skipped += 1;
                continue;
            }
        };
        if ds.is_updating() {
            trace!(
                device = %device_name(&ds),
                sequence0 = ds.sequence0,
                sequence1 = ds.sequence1,
                "devstat record copied mid-update"
            );
        }
        let counters = IoCounters::from(&ds);
        if !names.is_empty() && !names.contains(&counters.name.as_str()) {
            continue;
        }
        report.counters.insert(counters.name.clone(), counters);
    }

    Ok(report)
}
