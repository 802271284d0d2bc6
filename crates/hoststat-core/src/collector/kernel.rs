//! Real kernel implementation backed by libc.
//!
//! Each query is compiled only for the platforms that expose it; elsewhere it
//! fails with `io::ErrorKind::Unsupported`.

use std::io;
use std::process::Command;

use crate::collector::traits::Kernel;

/// Kernel queries against the running host.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealKernel;

impl RealKernel {
    /// Creates a new `RealKernel` instance.
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(all(target_os = "freebsd", target_pointer_width = "64")))]
fn unsupported(what: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        format!("{} is not available on this platform", what),
    )
}

impl Kernel for RealKernel {
    #[cfg(any(target_os = "freebsd", target_os = "macos"))]
    fn sysctl(&self, name: &str) -> io::Result<Vec<u8>> {
        use std::ffi::CString;

        let cname =
            CString::new(name).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let mut len: libc::size_t = 0;
        // SAFETY: a null old buffer with a valid length pointer only queries the value size.
        let rc = unsafe {
            libc::sysctlbyname(
                cname.as_ptr(),
                std::ptr::null_mut(),
                &mut len,
                std::ptr::null(),
                0,
            )
        };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }

        // tables such as kern.devstat.all can grow between the two calls
        len += len / 8;
        let mut buf = vec![0u8; len];
        // SAFETY: `buf` is writable for `len` bytes and the kernel writes at most `len`.
        let rc = unsafe {
            libc::sysctlbyname(
                cname.as_ptr(),
                buf.as_mut_ptr().cast(),
                &mut len,
                std::ptr::null(),
                0,
            )
        };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        buf.truncate(len);
        Ok(buf)
    }

    #[cfg(not(any(target_os = "freebsd", target_os = "macos")))]
    fn sysctl(&self, name: &str) -> io::Result<Vec<u8>> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("sysctl {} is not available on this platform", name),
        ))
    }

    #[cfg(all(target_os = "freebsd", target_pointer_width = "64"))]
    fn mount_count(&self) -> io::Result<usize> {
        use crate::collector::decode::layout::MNT_WAIT;

        // SAFETY: a null buffer asks only for the number of mounted filesystems.
        let n = unsafe { libc::getfsstat(std::ptr::null_mut(), 0, MNT_WAIT) };
        usize::try_from(n).map_err(|_| io::Error::last_os_error())
    }

    #[cfg(not(all(target_os = "freebsd", target_pointer_width = "64")))]
    fn mount_count(&self) -> io::Result<usize> {
        Err(unsupported("getfsstat"))
    }

    #[cfg(all(target_os = "freebsd", target_pointer_width = "64"))]
    fn mount_table(&self, capacity: usize) -> io::Result<Vec<u8>> {
        use crate::collector::decode::KernelStruct;
        use crate::collector::decode::layout::{MNT_WAIT, Statfs};

        let mut buf = vec![0u8; capacity * Statfs::SIZE];
        let bufsize = libc::c_long::try_from(buf.len())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        // SAFETY: `buf` holds `capacity` native statfs records and the kernel
        // copies out at most `bufsize` bytes.
        let n = unsafe { libc::getfsstat(buf.as_mut_ptr().cast(), bufsize, MNT_WAIT) };
        let n = usize::try_from(n).map_err(|_| io::Error::last_os_error())?;
        buf.truncate(n.min(capacity) * Statfs::SIZE);
        Ok(buf)
    }

    #[cfg(not(all(target_os = "freebsd", target_pointer_width = "64")))]
    fn mount_table(&self, _capacity: usize) -> io::Result<Vec<u8>> {
        Err(unsupported("getfsstat"))
    }

    #[cfg(unix)]
    fn page_size(&self) -> u64 {
        // SAFETY: sysconf has no preconditions.
        let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        u64::try_from(size).ok().filter(|&s| s > 0).unwrap_or(4096)
    }

    #[cfg(not(unix))]
    fn page_size(&self) -> u64 {
        4096
    }

    fn run_command(&self, program: &str, args: &[&str]) -> io::Result<String> {
        let output = Command::new(program).args(args).output()?;
        if !output.status.success() {
            return Err(io::Error::other(format!(
                "{} exited with {}",
                program, output.status
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_page_size_is_power_of_two() {
        let size = RealKernel::new().page_size();
        assert!(size >= 4096);
        assert!(size.is_power_of_two());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_captures_stdout() {
        let out = RealKernel::new().run_command("echo", &["Pages free: 1."]).unwrap();
        assert_eq!(out, "Pages free: 1.\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_run_command_failure() {
        let kernel = RealKernel::new();
        assert!(kernel.run_command("false", &[]).is_err());
        assert!(kernel.run_command("/nonexistent/hoststat-cmd", &[]).is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_has_no_mount_table_syscall() {
        let kernel = RealKernel::new();
        assert_eq!(
            kernel.mount_count().unwrap_err().kind(),
            io::ErrorKind::Unsupported
        );
        assert_eq!(
            kernel.sysctl("kern.devstat.all").unwrap_err().kind(),
            io::ErrorKind::Unsupported
        );
    }
}
