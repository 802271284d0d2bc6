//! Mock kernel and filesystem implementations for testing.
//!
//! This module provides `MockFs`, `MockKernel`, encoders that lay out kernel
//! structures byte for byte, and pre-built host scenarios, so collectors can
//! be exercised on any platform.

mod encode;
mod filesystem;
mod kernel;
mod scenarios;

pub use encode::{
    ByteWriter, devstat_record, devstat_table, encode_devstat, encode_statfs, fixed_name,
    statfs_record,
};
pub use filesystem::MockFs;
pub use kernel::MockKernel;
