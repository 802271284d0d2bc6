//! Pre-built host scenarios for testing.

use super::encode::{devstat_record, devstat_table, statfs_record};
use super::filesystem::MockFs;
use super::kernel::MockKernel;
use crate::collector::decode::Bintime;
use crate::collector::decode::layout::{DEVSTAT_READ, DEVSTAT_WRITE};
use crate::collector::disk::DeviceId;
use crate::collector::disk::devstat::DEVSTAT_MIB;
use crate::collector::mem::{MEMSIZE_MIB, VM_STAT_COMMAND};

impl MockKernel {
    /// A FreeBSD-like host with two SATA disks, a USB disk, a CD drive and a mixed mount table.
    ///
    /// The devstat table also carries one record caught mid-update, which
    /// collectors still report. Returns the kernel together with a filesystem
    /// holding the matching `/dev` nodes and udev/sysfs metadata.
    pub fn freebsd_host() -> (MockKernel, MockFs) {
        let mut kernel = MockKernel::new();

        let mut ada0 = devstat_record("ada", 0, [15_234, 40_211], [624_000_000, 1_310_000_000]);
        ada0.duration[DEVSTAT_READ] = Bintime::new(12, 1 << 63);
        ada0.duration[DEVSTAT_WRITE] = Bintime::new(48, 1 << 62);
        ada0.busy_time = Bintime::new(55, 0);

        let mut ada1 = devstat_record("ada", 1, [812, 96], [33_000_000, 4_100_000]);
        ada1.duration[DEVSTAT_READ] = Bintime::new(1, 0);
        ada1.busy_time = Bintime::new(1, 1 << 61);

        let mut da0 = devstat_record("da", 0, [1, 1], [512, 512]);
        da0.sequence1 = da0.sequence0 + 1;

        let cd0 = devstat_record("cd", 0, [0, 0], [0, 0]);

        kernel.set_sysctl(DEVSTAT_MIB, devstat_table(6, &[ada0, ada1, da0, cd0]));

        kernel.push_mount(statfs_record("/dev/ada0p2", "/", "ufs", 0x5000_1000));
        kernel.push_mount(statfs_record("devfs", "/dev", "devfs", 0x0000_1010));
        kernel.push_mount(statfs_record("/dev/ada1p1", "/data", "ufs", 0x0020_1008));
        kernel.push_mount(statfs_record("tmpfs", "/tmp", "tmpfs", 0x0000_1002));
        kernel.push_mount(statfs_record("/dev/cd0", "/cdrom", "cd9660", 0x0000_1001));

        kernel.set_sysctl(MEMSIZE_MIB, (8u64 << 30).to_le_bytes());
        kernel.set_page_size(4096);
        kernel.set_command_output(
            VM_STAT_COMMAND,
            "\
Mach Virtual Memory Statistics: (page size of 4096 bytes)
Pages free:                              262144.
Pages active:                            786432.
Pages inactive:                          524288.
Pages speculative:                        16384.
Pages wired down:                        393216.
Pageins:                                1234567.
",
        );

        let mut fs = MockFs::new();
        fs.add_device("/dev/ada0", DeviceId { major: 8, minor: 0 }.to_raw());
        fs.add_device("/dev/ada0p2", DeviceId { major: 8, minor: 2 }.to_raw());
        fs.add_device("/dev/ada1", DeviceId { major: 259, minor: 0 }.to_raw());
        fs.add_device("/dev/ada1p1", DeviceId { major: 259, minor: 1 }.to_raw());
        fs.add_file(
            "/run/udev/data/b8:0",
            "S:disk/by-id/ata-WDC_WD10EZEX\nE:ID_MODEL=WDC_WD10EZEX\nE:ID_SERIAL=WDC_WD10EZEX_WD-WCC6Y0\n",
        );
        fs.add_file("/sys/dev/block/8:0/device/model", "WDC WD10EZEX\n");
        fs.add_file("/sys/dev/block/8:0/device/serial", "WD-WCC6Y0\n");

        (kernel, fs)
    }
}
