//! Native structure layouts for FreeBSD on LP64 targets (amd64, arm64).
//!
//! Field order and widths follow `sys/mount.h` and `sys/devicestat.h`.
//! Padding is spelled out as explicit skips so that every layout consumes
//! exactly `SIZE` bytes.

use super::{Bintime, ByteReader, DecodeError, KernelStruct};

/// `STATFS_VERSION` of the ino64 `struct statfs` (FreeBSD 12 and later).
pub const STATFS_VERSION: u32 = 0x2014_0518;

/// Length of `f_fstypename`.
pub const MFSNAMELEN: usize = 16;
/// Length of `f_mntfromname` and `f_mntonname`.
pub const MNAMELEN: usize = 1024;
/// Length of `device_name` in `struct devstat`.
pub const DEVSTAT_NAME_LEN: usize = 16;

/// `getfsstat(2)` mode: wait for each filesystem to refresh its statistics.
pub const MNT_WAIT: i32 = 1;

/// Index of each transaction type in the devstat counter arrays.
pub const DEVSTAT_NO_DATA: usize = 0;
pub const DEVSTAT_READ: usize = 1;
pub const DEVSTAT_WRITE: usize = 2;
pub const DEVSTAT_FREE: usize = 3;

/// `struct statfs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statfs {
    pub version: u32,
    pub fs_type: u32,
    pub flags: u64,
    pub bsize: u64,
    pub iosize: u64,
    pub blocks: u64,
    pub bfree: u64,
    pub bavail: i64,
    pub files: u64,
    pub ffree: i64,
    pub syncwrites: u64,
    pub asyncwrites: u64,
    pub syncreads: u64,
    pub asyncreads: u64,
    pub nvnodelistsize: u32,
    pub owner: u32,
    pub fsid: [i32; 2],
    pub fstypename: [u8; MFSNAMELEN],
    pub mntfromname: [u8; MNAMELEN],
    pub mntonname: [u8; MNAMELEN],
}

impl Default for Statfs {
    fn default() -> Self {
        Self {
            version: STATFS_VERSION,
            fs_type: 0,
            flags: 0,
            bsize: 0,
            iosize: 0,
            blocks: 0,
            bfree: 0,
            bavail: 0,
            files: 0,
            ffree: 0,
            syncwrites: 0,
            asyncwrites: 0,
            syncreads: 0,
            asyncreads: 0,
            nvnodelistsize: 0,
            owner: 0,
            fsid: [0; 2],
            fstypename: [0; MFSNAMELEN],
            mntfromname: [0; MNAMELEN],
            mntonname: [0; MNAMELEN],
        }
    }
}

impl KernelStruct for Statfs {
    const SIZE: usize = 2344;

    fn read_from(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let version = r.read_u32()?;
        if version != STATFS_VERSION {
            return Err(DecodeError::Version {
                expected: STATFS_VERSION,
                found: version,
            });
        }
        let fs_type = r.read_u32()?;
        let flags = r.read_u64()?;
        let bsize = r.read_u64()?;
        let iosize = r.read_u64()?;
        let blocks = r.read_u64()?;
        let bfree = r.read_u64()?;
        let bavail = r.read_i64()?;
        let files = r.read_u64()?;
        let ffree = r.read_i64()?;
        let syncwrites = r.read_u64()?;
        let asyncwrites = r.read_u64()?;
        let syncreads = r.read_u64()?;
        let asyncreads = r.read_u64()?;
        let nvnodelistsize = r.read_u32()?;
        r.skip(4)?; // f_spare0
        r.skip(9 * 8)?; // f_spare[9]
        let owner = r.read_u32()?;
        let fsid = [r.read_i32()?, r.read_i32()?];
        r.skip(80)?; // f_charspare
        let fstypename = r.read_array()?;
        let mntfromname = r.read_array()?;
        let mntonname = r.read_array()?;
        r.skip(4)?; // tail padding to 8-byte alignment
        Ok(Self {
            version,
            fs_type,
            flags,
            bsize,
            iosize,
            blocks,
            bfree,
            bavail,
            files,
            ffree,
            syncwrites,
            asyncwrites,
            syncreads,
            asyncreads,
            nvnodelistsize,
            owner,
            fsid,
            fstypename,
            mntfromname,
            mntonname,
        })
    }
}

/// `struct devstat`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Devstat {
    pub sequence0: u32,
    pub allocated: i32,
    pub start_count: u32,
    pub end_count: u32,
    pub busy_from: Bintime,
    pub device_number: u32,
    pub device_name: [u8; DEVSTAT_NAME_LEN],
    pub unit_number: i32,
    pub bytes: [u64; 4],
    pub operations: [u64; 4],
    pub duration: [Bintime; 4],
    pub busy_time: Bintime,
    pub creation_time: Bintime,
    pub block_size: u32,
    pub tag_types: [u64; 3],
    pub flags: u32,
    pub device_type: u32,
    pub priority: u32,
    pub sequence1: u32,
}

impl Devstat {
    /// True when the record was copied out while the kernel was updating it.
    ///
    /// The kernel bumps `sequence1` before an update and `sequence0` after it.
    /// Counters of such a record are at most one transaction stale.
    pub fn is_updating(&self) -> bool {
        self.sequence0 != self.sequence1
    }
}

impl KernelStruct for Devstat {
    const SIZE: usize = 288;

    fn read_from(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let sequence0 = r.read_u32()?;
        let allocated = r.read_i32()?;
        let start_count = r.read_u32()?;
        let end_count = r.read_u32()?;
        let busy_from = r.read()?;
        r.skip(8)?; // dev_links (STAILQ_ENTRY)
        let device_number = r.read_u32()?;
        let device_name = r.read_array()?;
        let unit_number = r.read_i32()?;
        let bytes = r.read_u64_array()?;
        let operations = r.read_u64_array()?;
        let duration = [r.read()?, r.read()?, r.read()?, r.read()?];
        let busy_time = r.read()?;
        let creation_time = r.read()?;
        let block_size = r.read_u32()?;
        r.skip(4)?;
        let tag_types = r.read_u64_array()?;
        let flags = r.read_u32()?;
        let device_type = r.read_u32()?;
        let priority = r.read_u32()?;
        r.skip(4)?;
        r.skip(8)?; // id (kernel pointer)
        let sequence1 = r.read_u32()?;
        r.skip(4)?;
        Ok(Self {
            sequence0,
            allocated,
            start_count,
            end_count,
            busy_from,
            device_number,
            device_name,
            unit_number,
            bytes,
            operations,
            duration,
            busy_time,
            creation_time,
            block_size,
            tag_types,
            flags,
            device_type,
            priority,
            sequence1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::decode::{c_string, decode};
    use crate::collector::mock::{encode_devstat, encode_statfs, fixed_name};

    #[test]
    fn test_statfs_round_trip() {
        // every field distinct so a swapped read cannot go unnoticed
        let stat = Statfs {
            version: STATFS_VERSION,
            fs_type: 0x35,
            flags: 0x1000_0001,
            bsize: 4096,
            iosize: 32_768,
            blocks: 1_000_000,
            bfree: 400_000,
            bavail: -12,
            files: 250_000,
            ffree: 249_000,
            syncwrites: 11,
            asyncwrites: 22,
            syncreads: 33,
            asyncreads: 44,
            nvnodelistsize: 55,
            owner: 1001,
            fsid: [7, -7],
            fstypename: fixed_name("ufs"),
            mntfromname: fixed_name("/dev/ada0p2"),
            mntonname: fixed_name("/"),
        };
        let buf = encode_statfs(&stat);
        assert_eq!(buf.len(), Statfs::SIZE);

        let decoded: Statfs = decode(&buf).unwrap();
        assert_eq!(decoded, stat);
        assert_eq!(c_string(&decoded.mntfromname), "/dev/ada0p2");
        assert_eq!(c_string(&decoded.mntonname), "/");
        assert_eq!(c_string(&decoded.fstypename), "ufs");
    }

    #[test]
    fn test_statfs_field_offsets() {
        let stat = Statfs {
            flags: 0xDEAD_BEEF,
            fstypename: fixed_name("zfs"),
            mntfromname: fixed_name("zroot/ROOT/default"),
            mntonname: fixed_name("/"),
            ..Statfs::default()
        };
        let buf = encode_statfs(&stat);
        assert_eq!(&buf[0..4], &STATFS_VERSION.to_le_bytes());
        assert_eq!(&buf[8..16], &0xDEAD_BEEFu64.to_le_bytes());
        assert_eq!(&buf[276..279], b"zfs");
        assert_eq!(&buf[292..310], b"zroot/ROOT/default");
        assert_eq!(buf[1316], b'/');
    }

    #[test]
    fn test_statfs_version_mismatch() {
        let mut buf = encode_statfs(&Statfs::default());
        buf[0..4].copy_from_slice(&0x1999_0928u32.to_le_bytes());
        assert_eq!(
            decode::<Statfs>(&buf),
            Err(DecodeError::Version {
                expected: STATFS_VERSION,
                found: 0x1999_0928
            })
        );
    }

    #[test]
    fn test_devstat_round_trip() {
        let ds = Devstat {
            sequence0: 42,
            allocated: 1,
            start_count: 7_001,
            end_count: 6_999,
            busy_from: Bintime::new(900, 17),
            device_number: 13,
            device_name: fixed_name("ada"),
            unit_number: 2,
            bytes: [101, 1024, 2048, 4096],
            operations: [3, 10, 20, 40],
            duration: [
                Bintime::new(4, 5),
                Bintime::new(1, 1 << 63),
                Bintime::new(2, 6),
                Bintime::new(8, 9),
            ],
            busy_time: Bintime::new(3, 1 << 62),
            creation_time: Bintime::new(100, 200),
            block_size: 512,
            tag_types: [21, 22, 23],
            flags: 0x0102,
            device_type: 0x0203,
            priority: 0x0304,
            sequence1: 43,
        };
        let buf = encode_devstat(&ds);
        assert_eq!(buf.len(), Devstat::SIZE);
        assert_eq!(decode::<Devstat>(&buf).unwrap(), ds);
    }

    #[test]
    fn test_devstat_field_offsets() {
        let ds = Devstat {
            device_name: fixed_name("nvd"),
            unit_number: 3,
            bytes: [0, 0xAB, 0, 0],
            sequence1: 0,
            ..Devstat::default()
        };
        let buf = encode_devstat(&ds);
        assert_eq!(&buf[44..47], b"nvd");
        assert_eq!(&buf[60..64], &3i32.to_le_bytes());
        assert_eq!(&buf[72..80], &0xABu64.to_le_bytes());
    }

    #[test]
    fn test_devstat_mid_update_record_decodes() {
        let mut ds = Devstat {
            sequence0: 5,
            sequence1: 6,
            device_name: fixed_name("nvd"),
            ..Devstat::default()
        };
        ds.operations[DEVSTAT_READ] = 9;
        let decoded = decode::<Devstat>(&encode_devstat(&ds)).unwrap();
        assert!(decoded.is_updating());
        assert_eq!(decoded, ds);

        ds.sequence1 = 5;
        assert!(!decode::<Devstat>(&encode_devstat(&ds)).unwrap().is_updating());
    }
}
