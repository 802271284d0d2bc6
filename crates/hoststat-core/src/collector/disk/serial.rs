//! Best-effort disk serial number lookup from udev and sysfs metadata.
//!
//! Lookups run in order and stop at the first hit. A missing device node or
//! metadata file simply yields no value; nothing here is an error.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::collector::traits::FileSystem;

const UDEV_DATA_DIR: &str = "/run/udev/data";
const SYSFS_BLOCK_DIR: &str = "/sys/dev/block";
const UDEV_SERIAL_KEY: &str = "E:ID_SERIAL";

/// Block device number split into major and minor parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceId {
    pub major: u32,
    pub minor: u32,
}

impl DeviceId {
    /// Splits a raw `dev_t` using the Linux (glibc) encoding.
    ///
    /// Real device nodes are split by the platform's own `major`/`minor`
    /// in [`crate::collector::RealFs`]; this form backs the in-memory fixtures.
    pub fn from_raw(dev: u64) -> Self {
        let major = ((dev >> 8) & 0x0fff) | ((dev >> 32) & 0xffff_f000);
        let minor = (dev & 0xff) | ((dev >> 12) & 0xffff_ff00);
        Self {
            major: major as u32,
            minor: minor as u32,
        }
    }

    /// Inverse of [`DeviceId::from_raw`].
    pub fn to_raw(self) -> u64 {
        let major = u64::from(self.major);
        let minor = u64::from(self.minor);
        ((major & 0xffff_f000) << 32)
            | ((major & 0x0fff) << 8)
            | ((minor & 0xffff_ff00) << 12)
            | (minor & 0xff)
    }
}

type Lookup<F> = fn(&F, DeviceId) -> Option<String>;

/// Resolves the serial number of the block device at `path`.
///
/// Returns an empty string if the device cannot be stat'ed or no metadata source knows it.
pub fn resolve_serial<F: FileSystem>(fs: &F, path: &Path) -> String {
    let id = match fs.device_id(path) {
        Ok(id) => id,
        Err(e) => {
            trace!(path = %path.display(), error = %e, "cannot stat device");
            return String::new();
        }
    };

    let lookups: [Lookup<F>; 2] = [udev_serial, sysfs_serial];
    lookups
        .iter()
        .find_map(|lookup| lookup(fs, id))
        .unwrap_or_default()
}

/// `E:ID_SERIAL` from `/run/udev/data/b<major>:<minor>`.
fn udev_serial<F: FileSystem>(fs: &F, id: DeviceId) -> Option<String> {
    let path = PathBuf::from(format!("{}/b{}:{}", UDEV_DATA_DIR, id.major, id.minor));
    let data = fs.read(&path).ok()?;
    let serial = String::from_utf8_lossy(&data).lines().find_map(|line| {
        let values: Vec<&str> = line.split('=').collect();
        match values.as_slice() {
            [key, value] if *key == UDEV_SERIAL_KEY => Some(value.to_string()),
            _ => None,
        }
    });
    if serial.is_none() {
        trace!(major = id.major, minor = id.minor, "no udev serial");
    }
    serial
}

/// `<model>_<serial>` from sysfs, always read from the whole-disk node (minor 0).
///
/// File contents are joined verbatim, trailing newlines included.
fn sysfs_serial<F: FileSystem>(fs: &F, id: DeviceId) -> Option<String> {
    let device_dir = PathBuf::from(format!("{}/{}:0/device", SYSFS_BLOCK_DIR, id.major));
    let model = fs.read(&device_dir.join("model")).unwrap_or_default();
    let serial = fs.read(&device_dir.join("serial")).unwrap_or_default();
    if model.is_empty() || serial.is_empty() {
        trace!(major = id.major, "no sysfs model/serial");
        return None;
    }
    Some(format!(
        "{}_{}",
        String::from_utf8_lossy(&model),
        String::from_utf8_lossy(&serial)
    ))
}
