//! Abstractions over the filesystem and the kernel to enable testing and mocking.
//!
//! The `FileSystem` trait covers udev/sysfs metadata files and device nodes;
//! the `Kernel` trait covers sysctl MIBs, the mount table, and the diagnostic
//! commands that only exist on the target platform. Both have real and mock
//! implementations.

use std::io;
use std::path::Path;

use crate::collector::decode::{ByteReader, DecodeError};
use crate::collector::disk::DeviceId;
use crate::collector::error::CollectError;

/// Abstraction for filesystem operations.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as raw bytes.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Checks if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Returns the device number (`st_rdev`) of a device node.
    fn device_id(&self, path: &Path) -> io::Result<DeviceId>;
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    /// Creates a new `RealFs` instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    #[cfg(any(
        target_os = "linux",
        target_os = "android",
        target_os = "freebsd",
        target_os = "macos"
    ))]
    fn device_id(&self, path: &Path) -> io::Result<DeviceId> {
        use std::os::unix::fs::MetadataExt;
        let rdev = std::fs::metadata(path)?.rdev() as libc::dev_t;
        Ok(DeviceId {
            major: libc::major(rdev) as u32,
            minor: libc::minor(rdev) as u32,
        })
    }

    #[cfg(not(any(
        target_os = "linux",
        target_os = "android",
        target_os = "freebsd",
        target_os = "macos"
    )))]
    fn device_id(&self, _path: &Path) -> io::Result<DeviceId> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "device numbers are not available on this platform",
        ))
    }
}

/// Abstraction for kernel queries.
///
/// Implementations hand back raw bytes exactly as the kernel produced them;
/// interpreting those bytes is the job of [`crate::collector::decode`].
pub trait Kernel: Send + Sync {
    /// Reads a sysctl MIB by name and returns its raw value.
    fn sysctl(&self, name: &str) -> io::Result<Vec<u8>>;

    /// Returns the number of entries currently in the mount table.
    fn mount_count(&self) -> io::Result<usize>;

    /// Copies at most `capacity` mount records into a flat buffer.
    ///
    /// The table is live, so the buffer may hold fewer records than requested.
    fn mount_table(&self, capacity: usize) -> io::Result<Vec<u8>>;

    /// Size of a virtual memory page in bytes.
    fn page_size(&self) -> u64;

    /// Runs a program and returns its standard output.
    fn run_command(&self, program: &str, args: &[&str]) -> io::Result<String>;

    /// Reads an integer sysctl that the kernel exports as either 32 or 64 bits.
    fn sysctl_u64(&self, name: &'static str) -> Result<u64, CollectError> {
        let raw = self.sysctl(name)?;
        let mut reader = ByteReader::new(&raw);
        let value = match raw.len() {
            8 => reader.read_u64()?,
            4 => u64::from(reader.read_u32()?),
            len => return Err(DecodeError::UnexpectedWidth { name, len }.into()),
        };
        Ok(value)
    }
}
