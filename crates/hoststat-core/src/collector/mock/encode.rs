//! Writers producing raw kernel structure bytes, the inverse of the decoders.

use crate::collector::decode::layout::{DEVSTAT_READ, DEVSTAT_WRITE, Devstat, Statfs};
use crate::collector::decode::{Bintime, KernelStruct};

/// Little-endian byte sink mirroring `ByteReader`.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u64(&mut self, v: u64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i64(&mut self, v: i64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn bytes(&mut self, v: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(v);
        self
    }

    pub fn pad(&mut self, n: usize) -> &mut Self {
        self.buf.resize(self.buf.len() + n, 0);
        self
    }

    pub fn bintime(&mut self, bt: Bintime) -> &mut Self {
        self.i64(bt.sec).u64(bt.frac)
    }

    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
}

/// Copies `s` into a NUL-padded fixed-length array, truncating if needed.
pub fn fixed_name<const N: usize>(s: &str) -> [u8; N] {
    let mut out = [0u8; N];
    let len = s.len().min(N);
    out[..len].copy_from_slice(&s.as_bytes()[..len]);
    out
}

pub fn encode_statfs(s: &Statfs) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.u32(s.version)
        .u32(s.fs_type)
        .u64(s.flags)
        .u64(s.bsize)
        .u64(s.iosize)
        .u64(s.blocks)
        .u64(s.bfree)
        .i64(s.bavail)
        .u64(s.files)
        .i64(s.ffree)
        .u64(s.syncwrites)
        .u64(s.asyncwrites)
        .u64(s.syncreads)
        .u64(s.asyncreads)
        .u32(s.nvnodelistsize)
        .pad(4 + 9 * 8)
        .u32(s.owner)
        .i32(s.fsid[0])
        .i32(s.fsid[1])
        .pad(80)
        .bytes(&s.fstypename)
        .bytes(&s.mntfromname)
        .bytes(&s.mntonname)
        .pad(4);
    let buf = w.finish();
    debug_assert_eq!(buf.len(), Statfs::SIZE);
    buf
}

pub fn encode_devstat(d: &Devstat) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.u32(d.sequence0)
        .i32(d.allocated)
        .u32(d.start_count)
        .u32(d.end_count)
        .bintime(d.busy_from)
        .pad(8)
        .u32(d.device_number)
        .bytes(&d.device_name)
        .i32(d.unit_number);
    for v in d.bytes.iter().chain(&d.operations) {
        w.u64(*v);
    }
    for bt in d.duration {
        w.bintime(bt);
    }
    w.bintime(d.busy_time)
        .bintime(d.creation_time)
        .u32(d.block_size)
        .pad(4);
    for v in d.tag_types {
        w.u64(v);
    }
    w.u32(d.flags)
        .u32(d.device_type)
        .u32(d.priority)
        .pad(4)
        .pad(8)
        .u32(d.sequence1)
        .pad(4);
    let buf = w.finish();
    debug_assert_eq!(buf.len(), Devstat::SIZE);
    buf
}

/// A mount record with the given names and raw `f_flags`.
pub fn statfs_record(from: &str, on: &str, fstype: &str, flags: u64) -> Statfs {
    Statfs {
        flags,
        bsize: 4096,
        iosize: 32768,
        fstypename: fixed_name(fstype),
        mntfromname: fixed_name(from),
        mntonname: fixed_name(on),
        ..Statfs::default()
    }
}

/// A consistent devstat record with read/write operation and byte counters.
pub fn devstat_record(name: &str, unit: i32, ops: [u64; 2], bytes: [u64; 2]) -> Devstat {
    let mut ds = Devstat {
        sequence0: 1,
        sequence1: 1,
        allocated: 1,
        device_name: fixed_name(name),
        unit_number: unit,
        block_size: 512,
        ..Devstat::default()
    };
    ds.operations[DEVSTAT_READ] = ops[0];
    ds.operations[DEVSTAT_WRITE] = ops[1];
    ds.bytes[DEVSTAT_READ] = bytes[0];
    ds.bytes[DEVSTAT_WRITE] = bytes[1];
    ds
}

/// A `kern.devstat.all` blob: 8-byte header followed by the records.
pub fn devstat_table(version: u64, records: &[Devstat]) -> Vec<u8> {
    let mut w = ByteWriter::new();
    w.u64(version);
    for ds in records {
        w.bytes(&encode_devstat(ds));
    }
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_name_truncates() {
        let name: [u8; 4] = fixed_name("abcdef");
        assert_eq!(&name, b"abcd");
        let name: [u8; 6] = fixed_name("ab");
        assert_eq!(&name, b"ab\0\0\0\0");
    }

    #[test]
    fn test_encoded_sizes() {
        assert_eq!(encode_statfs(&Statfs::default()).len(), Statfs::SIZE);
        assert_eq!(encode_devstat(&Devstat::default()).len(), Devstat::SIZE);
    }
}
