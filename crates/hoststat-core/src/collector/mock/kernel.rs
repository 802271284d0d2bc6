//! In-memory kernel for testing collectors without FreeBSD or macOS.

use std::collections::HashMap;
use std::io;

use crate::collector::decode::layout::Statfs;
use crate::collector::traits::Kernel;

use super::encode::encode_statfs;

/// Scriptable kernel: sysctl values, a mount table, command outputs and a page size.
#[derive(Debug, Clone)]
pub struct MockKernel {
    sysctls: HashMap<String, Vec<u8>>,
    /// Encoded mount records in kernel order.
    mounts: Vec<Vec<u8>>,
    /// Mounts added (positive) or removed (negative) between the count probe and the fetch.
    mount_drift: isize,
    mount_error: Option<io::ErrorKind>,
    commands: HashMap<String, String>,
    page_size: u64,
}

impl Default for MockKernel {
    fn default() -> Self {
        Self {
            sysctls: HashMap::new(),
            mounts: Vec::new(),
            mount_drift: 0,
            mount_error: None,
            commands: HashMap::new(),
            page_size: 4096,
        }
    }
}

impl MockKernel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_sysctl(&mut self, name: &str, value: impl Into<Vec<u8>>) {
        self.sysctls.insert(name.to_string(), value.into());
    }

    pub fn push_mount(&mut self, stat: Statfs) {
        self.mounts.push(encode_statfs(&stat));
    }

    /// Breaks the layout version of mount record `index`.
    pub fn corrupt_mount(&mut self, index: usize) {
        if let Some(record) = self.mounts.get_mut(index) {
            record[..4].copy_from_slice(&0u32.to_le_bytes());
        }
    }

    /// Simulates the mount table changing between the count probe and the fetch.
    pub fn set_mount_drift(&mut self, drift: isize) {
        self.mount_drift = drift;
    }

    /// Makes both mount table calls fail with `kind`.
    pub fn fail_mount_table(&mut self, kind: io::ErrorKind) {
        self.mount_error = Some(kind);
    }

    pub fn set_command_output(&mut self, program: &str, output: impl Into<String>) {
        self.commands.insert(program.to_string(), output.into());
    }

    pub fn set_page_size(&mut self, page_size: u64) {
        self.page_size = page_size;
    }

    fn check_mount_error(&self) -> io::Result<()> {
        match self.mount_error {
            Some(kind) => Err(io::Error::new(kind, "getfsstat failed")),
            None => Ok(()),
        }
    }
}

impl Kernel for MockKernel {
    fn sysctl(&self, name: &str) -> io::Result<Vec<u8>> {
        self.sysctls.get(name).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("unknown sysctl: {}", name))
        })
    }

    fn mount_count(&self) -> io::Result<usize> {
        self.check_mount_error()?;
        let grown = self.mount_drift.max(0).unsigned_abs();
        Ok(self.mounts.len().saturating_sub(grown))
    }

    fn mount_table(&self, capacity: usize) -> io::Result<Vec<u8>> {
        self.check_mount_error()?;
        let removed = self.mount_drift.min(0).unsigned_abs();
        let live = self.mounts.len().saturating_sub(removed);
        Ok(self.mounts[..live.min(capacity)].concat())
    }

    fn page_size(&self) -> u64 {
        self.page_size
    }

    fn run_command(&self, program: &str, _args: &[&str]) -> io::Result<String> {
        self.commands.get(program).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("command not found: {}", program),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::decode::KernelStruct;
    use crate::collector::mock::statfs_record;

    #[test]
    fn test_mount_drift() {
        let mut kernel = MockKernel::new();
        for on in ["/", "/usr", "/var"] {
            kernel.push_mount(statfs_record("/dev/ada0", on, "ufs", 0));
        }
        assert_eq!(kernel.mount_count().unwrap(), 3);

        kernel.set_mount_drift(-1);
        assert_eq!(kernel.mount_count().unwrap(), 3);
        assert_eq!(kernel.mount_table(3).unwrap().len(), 2 * Statfs::SIZE);

        kernel.set_mount_drift(2);
        assert_eq!(kernel.mount_count().unwrap(), 1);
        assert_eq!(kernel.mount_table(1).unwrap().len(), Statfs::SIZE);
    }

    #[test]
    fn test_unknown_command() {
        let kernel = MockKernel::new();
        let err = kernel.run_command("vm_stat", &[]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
