//! Virtual memory collector.
//!
//! Total physical memory comes from the `hw.memsize` sysctl and the page
//! categories from the `vm_stat` report. The two reads are separate and not
//! atomic with respect to each other, so derived values are approximate by a
//! few pages on a busy host.

mod parser;

pub use parser::{ParseError, parse_vm_stat};

use tracing::debug;

use crate::collector::error::CollectError;
use crate::collector::traits::Kernel;
use crate::model::VirtualMemoryStat;

/// Sysctl holding physical memory size in bytes.
pub const MEMSIZE_MIB: &str = "hw.memsize";

/// Command printing page category counts.
pub const VM_STAT_COMMAND: &str = "vm_stat";

/// Collects virtual memory statistics.
pub struct MemoryCollector<K: Kernel> {
    kernel: K,
}

impl<K: Kernel> MemoryCollector<K> {
    pub fn new(kernel: K) -> Self {
        Self { kernel }
    }

    /// Reads total memory and page counts and computes the derived fields.
    pub fn virtual_memory(&self) -> Result<VirtualMemoryStat, CollectError> {
        let total = self.kernel.sysctl_u64(MEMSIZE_MIB)?;
        let out = self.kernel.run_command(VM_STAT_COMMAND, &[])?;
        let page_size = self.kernel.page_size();

        let mut vms = VirtualMemoryStat {
            total,
            ..Default::default()
        };
        parse_vm_stat(&out, page_size, &mut vms)?;
        vms.derive();

        debug!(
            total = vms.total,
            available = vms.available,
            page_size,
            "collected virtual memory"
        );
        Ok(vms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockKernel;
    use std::io;

    fn kernel_with(total: u64, out: &str) -> MockKernel {
        let mut kernel = MockKernel::new();
        kernel.set_page_size(4096);
        kernel.set_sysctl(MEMSIZE_MIB, total.to_le_bytes());
        kernel.set_command_output(VM_STAT_COMMAND, out);
        kernel
    }

    #[test]
    fn test_virtual_memory() {
        let kernel = kernel_with(
            8_000_000,
            "Pages free:        1000.\nPages active:       500.\nPages wired down:   200.\n",
        );
        let vms = MemoryCollector::new(kernel).virtual_memory().unwrap();

        assert_eq!(vms.total, 8_000_000);
        assert_eq!(vms.free, 4_096_000);
        assert_eq!(vms.active, 2_048_000);
        assert_eq!(vms.wired, 819_200);
        assert_eq!(vms.inactive, 0);
        assert_eq!(vms.available, 4_096_000);
        assert_eq!(vms.used, 3_904_000);
        assert!((vms.used_percent - 48.8).abs() < 1e-9);
    }

    #[test]
    fn test_derived_fields_identities() {
        for (total, free, inactive) in [(1u64 << 34, 1000u64, 0u64), (1 << 30, 20, 30000), (4096, 1, 0)] {
            let out = format!("Pages free: {}.\nPages inactive: {}.\n", free, inactive);
            let vms = MemoryCollector::new(kernel_with(total, &out))
                .virtual_memory()
                .unwrap();
            assert_eq!(vms.available, vms.free + vms.inactive);
            assert_eq!(vms.used, vms.total - vms.free);
            assert!(vms.available <= vms.total);
        }
    }

    #[test]
    fn test_sysctl_failure() {
        let mut kernel = MockKernel::new();
        kernel.set_command_output(VM_STAT_COMMAND, "Pages free: 1.\n");
        let err = MemoryCollector::new(kernel).virtual_memory().unwrap_err();
        assert!(matches!(err, CollectError::Syscall(e) if e.kind() == io::ErrorKind::NotFound));
    }

    #[test]
    fn test_command_failure() {
        let mut kernel = MockKernel::new();
        kernel.set_sysctl(MEMSIZE_MIB, 1u64.to_le_bytes());
        let err = MemoryCollector::new(kernel).virtual_memory().unwrap_err();
        assert!(matches!(err, CollectError::Syscall(_)));
    }

    #[test]
    fn test_parse_failure_is_reported() {
        let kernel = kernel_with(8_000_000, "Pages free: lots.\nPages active: 5.\n");
        let err = MemoryCollector::new(kernel).virtual_memory().unwrap_err();
        assert!(matches!(err, CollectError::Parse(_)));
    }
}
