//! Network byte order helpers.
//!
//! Every multi-byte integer in a `version` payload is big-endian. Writers
//! return fixed-size arrays and cannot fail; readers walk a payload with a
//! cursor and fail only when the input runs out.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use byteorder::{BigEndian, ByteOrder};

use crate::wire::error::{Result, WireError};

pub fn u16_to_be(value: u16) -> [u8; 2] {
    let mut b = [0u8; 2];
    BigEndian::write_u16(&mut b, value);
    b
}

pub fn u32_to_be(value: u32) -> [u8; 4] {
    let mut b = [0u8; 4];
    BigEndian::write_u32(&mut b, value);
    b
}

pub fn u64_to_be(value: u64) -> [u8; 8] {
    let mut b = [0u8; 8];
    BigEndian::write_u64(&mut b, value);
    b
}

pub fn be_to_u16(bytes: [u8; 2]) -> u16 {
    BigEndian::read_u16(&bytes)
}

pub fn be_to_u32(bytes: [u8; 4]) -> u32 {
    BigEndian::read_u32(&bytes)
}

pub fn be_to_u64(bytes: [u8; 8]) -> u64 {
    BigEndian::read_u64(&bytes)
}

/// Whole seconds since the unix epoch, discarding any sub-second part.
///
/// Times before the epoch round toward negative infinity so that
/// `from_unix_secs(unix_secs(t)) <= t` always holds.
pub fn unix_secs(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs() as i64,
        Err(e) => {
            let before = e.duration();
            let secs = before.as_secs() as i64;
            if before.subsec_nanos() > 0 {
                -secs - 1
            } else {
                -secs
            }
        }
    }
}

pub fn from_unix_secs(secs: i64) -> SystemTime {
    if secs >= 0 {
        UNIX_EPOCH + Duration::from_secs(secs as u64)
    } else {
        UNIX_EPOCH - Duration::from_secs(secs.unsigned_abs())
    }
}

/// Encodes a timestamp as 8 big-endian bytes of signed unix seconds.
pub fn timestamp_to_be(time: SystemTime) -> [u8; 8] {
    u64_to_be(unix_secs(time) as u64)
}

pub fn be_to_timestamp(bytes: [u8; 8]) -> SystemTime {
    from_unix_secs(be_to_u64(bytes) as i64)
}

pub(crate) fn read_u16(p: &[u8], c: &mut usize, ctx: &'static str) -> Result<u16> {
    Ok(be_to_u16(slice::<2>(p, c, ctx)?))
}

pub(crate) fn read_u32(p: &[u8], c: &mut usize, ctx: &'static str) -> Result<u32> {
    Ok(be_to_u32(slice::<4>(p, c, ctx)?))
}

pub(crate) fn read_u64(p: &[u8], c: &mut usize, ctx: &'static str) -> Result<u64> {
    Ok(be_to_u64(slice::<8>(p, c, ctx)?))
}

/// Copies the next `N` bytes out of `p` and advances the cursor.
pub(crate) fn slice<const N: usize>(
    p: &[u8],
    c: &mut usize,
    ctx: &'static str,
) -> Result<[u8; N]> {
    let end = c.checked_add(N).ok_or(WireError::UnexpectedEof(ctx))?;
    let mut out = [0u8; N];
    out.copy_from_slice(p.get(*c..end).ok_or(WireError::UnexpectedEof(ctx))?);
    *c = end;
    Ok(out)
}
