//! Decoding of raw kernel structures.
//!
//! Kernel interfaces hand back flat byte buffers whose layout is the native C
//! structure of the target. Each structure we understand implements
//! [`KernelStruct`] with a fixed `SIZE` and a single sequential pass over a
//! [`ByteReader`]. Layouts are compiled in per platform family (see
//! [`layout`]); nothing is inferred at runtime.

pub mod bintime;
pub mod layout;

pub use bintime::Bintime;

/// Error type for decoding failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Buffer is shorter than the structure it should contain.
    Truncated { needed: usize, available: usize },
    /// A field read ran past the end of the buffer.
    Overrun {
        offset: usize,
        width: usize,
        len: usize,
    },
    /// Structure carries a layout version we were not compiled for.
    Version { expected: u32, found: u32 },
    /// A scalar value had a width we do not know how to read.
    UnexpectedWidth { name: &'static str, len: usize },
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Truncated { needed, available } => {
                write!(f, "buffer too short: need {} bytes, have {}", needed, available)
            }
            DecodeError::Overrun { offset, width, len } => write!(
                f,
                "read of {} bytes at offset {} overruns {}-byte buffer",
                width, offset, len
            ),
            DecodeError::Version { expected, found } => write!(
                f,
                "layout version {:#x} does not match compiled-in {:#x}",
                found, expected
            ),
            DecodeError::UnexpectedWidth { name, len } => {
                write!(f, "{}: unexpected value width {}", name, len)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Bounds-checked little-endian cursor over an immutable byte buffer.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, width: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(width)
            .filter(|&end| end <= self.buf.len())
            .ok_or(DecodeError::Overrun {
                offset: self.pos,
                width,
                len: self.buf.len(),
            })?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Reads a fixed-length byte array verbatim.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Skips padding or fields we do not surface.
    pub fn skip(&mut self, width: usize) -> Result<(), DecodeError> {
        self.take(width).map(|_| ())
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32, DecodeError> {
        self.read_array().map(i32::from_le_bytes)
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        self.read_array().map(u64::from_le_bytes)
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        self.read_array().map(i64::from_le_bytes)
    }

    /// Reads a nested structure in place.
    pub fn read<T: KernelStruct>(&mut self) -> Result<T, DecodeError> {
        T::read_from(self)
    }

    /// Reads `N` consecutive `u64` values.
    pub fn read_u64_array<const N: usize>(&mut self) -> Result<[u64; N], DecodeError> {
        let mut out = [0u64; N];
        for slot in &mut out {
            *slot = self.read_u64()?;
        }
        Ok(out)
    }
}

/// A kernel structure with a fixed, platform-defined layout.
pub trait KernelStruct: Sized {
    /// Size of the structure in bytes, including trailing padding.
    const SIZE: usize;

    /// Reads the structure field by field, in declaration order.
    fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError>;
}

/// Decodes one structure from the start of `buf`.
///
/// Bytes beyond `T::SIZE` are ignored.
pub fn decode<T: KernelStruct>(buf: &[u8]) -> Result<T, DecodeError> {
    if buf.len() < T::SIZE {
        return Err(DecodeError::Truncated {
            needed: T::SIZE,
            available: buf.len(),
        });
    }
    let mut reader = ByteReader::new(&buf[..T::SIZE]);
    let value = T::read_from(&mut reader)?;
    debug_assert_eq!(reader.position(), T::SIZE, "layout does not cover SIZE");
    Ok(value)
}

/// Decodes a packed array of structures. A trailing partial record is ignored.
pub fn decode_records<'a, T: KernelStruct + 'a>(
    buf: &'a [u8],
) -> impl Iterator<Item = Result<T, DecodeError>> + 'a {
    buf.chunks_exact(T::SIZE).map(decode::<T>)
}

/// Interprets a fixed-length C character array as text, stopping at the first NUL.
pub fn c_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    #[derive(Debug, PartialEq)]
    struct Pair {
        id: u32,
        value: i64,
        tag: [u8; 4],
    }

    impl KernelStruct for Pair {
        const SIZE: usize = 16;

        fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
            let id = reader.read_u32()?;
            reader.skip(4)?;
            let value = reader.read_i64()?;
            // reads past SIZE on purpose
            let tag = reader.read_array()?;
            Ok(Self { id, value, tag })
        }
    }

    fn pair_bytes(id: u32, value: i64) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&id.to_le_bytes());
        buf.extend_from_slice(&[0xAA; 4]);
        buf.extend_from_slice(&value.to_le_bytes());
        buf
    }

    #[test]
    fn test_reader_little_endian() {
        let buf = [0x01, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff];
        let mut reader = ByteReader::new(&buf);
        assert_eq!(reader.read_u32().unwrap(), 1);
        assert_eq!(reader.read_i32().unwrap(), -1);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_reader_overrun() {
        let buf = [0u8; 6];
        let mut reader = ByteReader::new(&buf);
        reader.read_u32().unwrap();
        assert_eq!(
            reader.read_u32(),
            Err(DecodeError::Overrun {
                offset: 4,
                width: 4,
                len: 6
            })
        );
        // a failed read does not advance
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_decode_truncated() {
        let buf = pair_bytes(7, -3);
        assert_eq!(
            decode::<Pair>(&buf[..10]),
            Err(DecodeError::Truncated {
                needed: 16,
                available: 10
            })
        );
    }

    #[test]
    fn test_decode_field_overrun_inside_size() {
        // SIZE says 16 but the reader wants 20: the overrun is reported, not a panic.
        let buf = pair_bytes(7, -3);
        assert!(matches!(
            decode::<Pair>(&buf),
            Err(DecodeError::Overrun { offset: 16, .. })
        ));
    }

    #[test]
    fn test_decode_records_ignores_partial_tail() {
        #[derive(Debug)]
        struct Word(u32);
        impl KernelStruct for Word {
            const SIZE: usize = 4;
            fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
                reader.read_u32().map(Word)
            }
        }

        let mut buf = Vec::new();
        for v in [10u32, 20, 30] {
            buf.extend_from_slice(&v.to_le_bytes());
        }
        buf.extend_from_slice(&[1, 2]);

        let words: Vec<u32> = decode_records::<Word>(&buf)
            .map(|w| w.unwrap().0)
            .collect();
        assert_eq!(words, vec![10, 20, 30]);
    }

    #[test]
    fn test_c_string() {
        assert_eq!(c_string(b"ada\0\0\0\0\0"), "ada");
        assert_eq!(c_string(b"/dev/ada0p2\0garbage"), "/dev/ada0p2");
        assert_eq!(c_string(b"nonul"), "nonul");
        assert_eq!(c_string(b"\0"), "");
    }
}
