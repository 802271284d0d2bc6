//! Mount table enumeration and mount flag formatting.

use std::path::Path;

use bitflags::bitflags;
use tracing::{debug, warn};

use crate::collector::decode::layout::Statfs;
use crate::collector::decode::{KernelStruct, c_string, decode_records};
use crate::collector::error::CollectError;
use crate::collector::traits::{FileSystem, Kernel};
use crate::model::Partition;

bitflags! {
    /// Mount flags from `f_flags` (`sys/mount.h`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MountFlags: u64 {
        const RDONLY = 0x0000_0001;
        const SYNCHRONOUS = 0x0000_0002;
        const NOEXEC = 0x0000_0004;
        const NOSUID = 0x0000_0008;
        const NFS4ACLS = 0x0000_0010;
        const UNION = 0x0000_0020;
        const ASYNC = 0x0000_0040;
        const SUIDDIR = 0x0010_0000;
        const SOFTDEP = 0x0020_0000;
        const NOSYMFOLLOW = 0x0040_0000;
        const GJOURNAL = 0x0200_0000;
        const MULTILABEL = 0x0400_0000;
        const ACLS = 0x0800_0000;
        const NOATIME = 0x1000_0000;
        const NOCLUSTERR = 0x4000_0000;
        const NOCLUSTERW = 0x8000_0000;
    }
}

/// Option tokens in output order. Spellings match historical output and must not change.
const OPTION_TOKENS: &[(MountFlags, &str)] = &[
    (MountFlags::SYNCHRONOUS, "sync"),
    (MountFlags::NOEXEC, "noexec"),
    (MountFlags::NOSUID, "nosuid"),
    (MountFlags::UNION, "union"),
    (MountFlags::ASYNC, "async"),
    (MountFlags::SUIDDIR, "suiddir"),
    (MountFlags::SOFTDEP, "softdep"),
    (MountFlags::NOSYMFOLLOW, "nosymfollow"),
    (MountFlags::GJOURNAL, "gjounalc"),
    (MountFlags::MULTILABEL, "multilabel"),
    (MountFlags::ACLS, "acls"),
    (MountFlags::NOATIME, "noattime"),
    (MountFlags::NOCLUSTERR, "nocluster"),
    (MountFlags::NOCLUSTERW, "noclusterw"),
    (MountFlags::NFS4ACLS, "nfs4acls"),
];

/// Formats mount flags as `rw`/`ro` followed by one token per known set flag.
///
/// Unknown bits are ignored.
pub fn format_options(flags: MountFlags) -> String {
    let mut opts = String::from(if flags.contains(MountFlags::RDONLY) {
        "ro"
    } else {
        "rw"
    });
    for (flag, token) in OPTION_TOKENS {
        if flags.contains(*flag) {
            opts.push(',');
            opts.push_str(token);
        }
    }
    opts
}

impl From<&Statfs> for Partition {
    fn from(stat: &Statfs) -> Self {
        Partition {
            device: c_string(&stat.mntfromname),
            mountpoint: c_string(&stat.mntonname),
            fs_type: c_string(&stat.fstypename),
            options: format_options(MountFlags::from_bits_retain(stat.flags)),
        }
    }
}

/// Reads the mount table in two phases (count, then records) and builds partitions.
pub(super) fn list_partitions<K: Kernel, F: FileSystem>(
    kernel: &K,
    fs: &F,
    all: bool,
) -> Result<Vec<Partition>, CollectError> {
    let count = kernel.mount_count()?;
    let buf = kernel.mount_table(count)?;
    debug!(
        probed = count,
        returned = buf.len() / Statfs::SIZE,
        "read mount table"
    );

    let mut partitions = Vec::with_capacity(count);
    for record in decode_records::<Statfs>(&buf) {
        let stat = match record {
            Ok(stat) => stat,
            Err(e) => {
                warn!(error = %e, "skipping undecodable mount record");
                continue;
            }
        };
        let partition = Partition::from(&stat);
        if !all && !is_live_device(fs, &partition.device) {
            continue;
        }
        partitions.push(partition);
    }
    Ok(partitions)
}

fn is_live_device<F: FileSystem>(fs: &F, device: &str) -> bool {
    let path = Path::new(device);
    path.is_absolute() && fs.exists(path)
}
