//! In-memory mock filesystem for testing collectors without real device metadata.

use crate::collector::disk::DeviceId;
use crate::collector::traits::FileSystem;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// In-memory filesystem for testing.
///
/// Stores files, directories and device nodes in memory, allowing tests to
/// simulate udev/sysfs metadata and `/dev` entries on any host.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: HashMap<PathBuf, Vec<u8>>,
    /// Set of directories.
    directories: HashSet<PathBuf>,
    /// Map from device node path to raw device number, Linux `dev_t` encoding.
    devices: HashMap<PathBuf, u64>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content.
    ///
    /// Parent directories are automatically created.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.files.insert(path, content.into());
    }

    /// Adds an empty directory.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.directories.insert(path);
    }

    /// Adds a device node with the given raw device number.
    pub fn add_device(&mut self, path: impl AsRef<Path>, rdev: u64) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.devices.insert(path, rdev);
    }

    fn add_parents(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("file not found: {:?}", path),
    )
}

impl FileSystem for MockFs {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| not_found(path))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
            || self.directories.contains(path)
            || self.devices.contains_key(path)
    }

    fn device_id(&self, path: &Path) -> io::Result<DeviceId> {
        if let Some(rdev) = self.devices.get(path) {
            return Ok(DeviceId::from_raw(*rdev));
        }
        if self.exists(path) {
            // regular files and directories have no device number
            return Ok(DeviceId::from_raw(0));
        }
        Err(not_found(path))
    }
}
