//! Kernel fixed-point time values (`struct bintime`).

use super::{ByteReader, DecodeError, KernelStruct};

/// 2^-64, the weight of one unit of `Bintime::frac`.
const FRAC_SCALE: f64 = 1.0 / 18_446_744_073_709_551_616.0;

/// Elapsed time as whole seconds plus a 64-bit binary fraction of a second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bintime {
    pub sec: i64,
    pub frac: u64,
}

impl Bintime {
    pub fn new(sec: i64, frac: u64) -> Self {
        Self { sec, frac }
    }

    /// Converts to floating-point seconds: `sec + frac * 2^-64`.
    pub fn as_secs_f64(&self) -> f64 {
        self.sec as f64 + self.frac as f64 * FRAC_SCALE
    }

    /// Converts to whole milliseconds, truncating. Negative values clamp to zero.
    pub fn as_millis(&self) -> u64 {
        (self.as_secs_f64() * 1000.0) as u64
    }
}

impl KernelStruct for Bintime {
    const SIZE: usize = 16;

    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            sec: reader.read_i64()?,
            frac: reader.read_u64()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_seconds_are_exact() {
        for sec in [0i64, 1, 59, 86_400, 1 << 40] {
            assert_eq!(Bintime::new(sec, 0).as_secs_f64(), sec as f64);
        }
    }

    #[test]
    fn test_half_and_quarter() {
        assert_eq!(Bintime::new(2, 1 << 63).as_secs_f64(), 2.5);
        assert_eq!(Bintime::new(0, 1 << 62).as_secs_f64(), 0.25);
    }

    #[test]
    fn test_sub_millisecond_precision() {
        // 1.5 ms expressed as a binary fraction
        let frac = (0.0015f64 / FRAC_SCALE) as u64;
        let secs = Bintime::new(0, frac).as_secs_f64();
        assert!((secs - 0.0015).abs() < 1e-15);
        assert_eq!(Bintime::new(0, frac).as_millis(), 1);
        assert_eq!(Bintime::new(3, frac).as_millis(), 3001);
    }

    #[test]
    fn test_monotonic_in_both_fields() {
        let base = Bintime::new(10, 1_000_000);
        assert!(Bintime::new(11, 1_000_000).as_secs_f64() > base.as_secs_f64());
        assert!(Bintime::new(10, u64::MAX / 2).as_secs_f64() > base.as_secs_f64());
        assert!(Bintime::new(10, u64::MAX).as_secs_f64() <= Bintime::new(11, 0).as_secs_f64());
    }

    #[test]
    fn test_negative_clamps_to_zero_millis() {
        assert_eq!(Bintime::new(-5, 0).as_millis(), 0);
    }

    #[test]
    fn test_read_from_bytes() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&7i64.to_le_bytes());
        buf.extend_from_slice(&(1u64 << 63).to_le_bytes());
        let bt: Bintime = super::super::decode(&buf).unwrap();
        assert_eq!(bt, Bintime::new(7, 1 << 63));
        assert_eq!(bt.as_millis(), 7500);
    }
}
