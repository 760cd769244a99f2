//! Length-prefixed byte strings (`var_str`).
//!
//! ```text
//! compact_size  length N
//! N bytes       payload
//! ```
//!
//! The length prefix uses the CompactSize size classes, with the multi-byte
//! forms in network byte order like every other integer in the payload:
//!
//! | Length                 | Prefix                |
//! |------------------------|-----------------------|
//! | `0..=0xFC`             | 1 byte, the length    |
//! | `0xFD..=0xFFFF`        | `0xFD` + u16          |
//! | `0x1_0000..=0xFFFF_FFFF` | `0xFE` + u32        |
//! | larger                 | `0xFF` + u64          |

use std::borrow::Cow;
use std::fmt;

use crate::wire::endian::{read_u16, read_u32, read_u64, u16_to_be, u32_to_be, u64_to_be};
use crate::wire::error::{Result, WireError};

/// Writes `value` using the shortest CompactSize form.
pub fn write_compact_size(value: u64, out: &mut Vec<u8>) {
    match value {
        0..=0xFC => out.push(value as u8),
        0xFD..=0xFFFF => {
            out.push(0xFD);
            out.extend(u16_to_be(value as u16));
        }
        0x1_0000..=0xFFFF_FFFF => {
            out.push(0xFE);
            out.extend(u32_to_be(value as u32));
        }
        _ => {
            out.push(0xFF);
            out.extend(u64_to_be(value));
        }
    }
}

/// Number of bytes [`write_compact_size`] emits for `value`.
pub fn compact_size_len(value: u64) -> usize {
    match value {
        0..=0xFC => 1,
        0xFD..=0xFFFF => 3,
        0x1_0000..=0xFFFF_FFFF => 5,
        _ => 9,
    }
}

/// Reads a CompactSize integer at `*c`, advancing the cursor.
pub fn read_compact_size(p: &[u8], c: &mut usize) -> Result<u64> {
    let first = *p.get(*c).ok_or(WireError::UnexpectedEof("compact_size"))?;
    *c += 1;
    match first {
        0xFD => Ok(read_u16(p, c, "compact_size:fd")? as u64),
        0xFE => Ok(read_u32(p, c, "compact_size:fe")? as u64),
        0xFF => read_u64(p, c, "compact_size:ff"),
        n => Ok(n as u64),
    }
}

/// An arbitrary byte string carried behind a CompactSize length.
///
/// Content is not validated: user agents are conventionally printable
/// ASCII, but any bytes round-trip unchanged.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct VarStr(Vec<u8>);

impl VarStr {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Payload decoded as UTF-8, with invalid sequences replaced.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    /// Size of the prefix plus payload on the wire.
    pub fn encoded_len(&self) -> usize {
        compact_size_len(self.0.len() as u64) + self.0.len()
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        write_compact_size(self.0.len() as u64, out);
        out.extend_from_slice(&self.0);
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out);
        out
    }

    /// Reads one `var_str` starting at `*c`, advancing the cursor past it.
    ///
    /// Fails with [`WireError::MalformedVarLength`] when the prefix declares
    /// more bytes than remain, without touching anything past the buffer.
    pub fn read(p: &[u8], c: &mut usize) -> Result<Self> {
        let declared = read_compact_size(p, c)?;
        let available = p.len().saturating_sub(*c);

        let len = usize::try_from(declared)
            .ok()
            .filter(|&n| n <= available)
            .ok_or(WireError::MalformedVarLength {
                declared,
                available,
            })?;

        let bytes = p[*c..*c + len].to_vec();
        *c += len;
        Ok(Self(bytes))
    }

    /// Decodes a buffer that holds exactly one `var_str` and nothing else.
    pub fn decode_exact(p: &[u8]) -> Result<Self> {
        let mut c = 0;
        let s = Self::read(p, &mut c)?;
        if c != p.len() {
            return Err(WireError::TrailingBytes(p.len() - c));
        }
        Ok(s)
    }
}

impl From<&str> for VarStr {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

impl From<String> for VarStr {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<&[u8]> for VarStr {
    fn from(b: &[u8]) -> Self {
        Self(b.to_vec())
    }
}

impl From<Vec<u8>> for VarStr {
    fn from(b: Vec<u8>) -> Self {
        Self(b)
    }
}

impl fmt::Debug for VarStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarStr({:?})", self.to_string_lossy())
    }
}
