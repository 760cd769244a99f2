/// Protocol version advertised by default in outgoing `version` messages.
///
/// Serialized on the wire as an unsigned 32-bit big-endian integer.
/// Peers compare it against their own to decide compatibility; this crate
/// never rejects a message because of it.
pub const PROTOCOL_VERSION: u32 = 70001;

/// Size of the fixed-width prefix of a `version` payload, up to and
/// including the nonce.
///
/// ```text
/// 4  bytes  version
/// 8  bytes  services
/// 8  bytes  timestamp
/// 26 bytes  recipient address
/// 26 bytes  sender address
/// 8  bytes  nonce
/// ```
pub const VERSION_FIXED_PREFIX_LEN: usize = 80;

/// Size of the trailing `start_height` field.
pub const START_HEIGHT_LEN: usize = 4;

/// Smallest buffer that can hold a structurally complete `version` payload:
/// the fixed prefix, a one-byte empty user agent and the start height.
///
/// Older implementations gate on 84 bytes, one short of this, which lets a
/// payload with no user agent byte at all through. We reject it up front.
pub const MIN_VERSION_PAYLOAD_LEN: usize = VERSION_FIXED_PREFIX_LEN + 1 + START_HEIGHT_LEN;

/// Size of a peer address record as embedded in `version`
/// (services + 16-byte address + port, no timestamp).
pub const PEER_ADDRESS_LEN: usize = 26;

/// Byte offsets of each fixed field inside a `version` payload.
pub mod offsets {
    use std::ops::Range;

    pub const VERSION: Range<usize> = 0..4;
    pub const SERVICES: Range<usize> = 4..12;
    pub const TIMESTAMP: Range<usize> = 12..20;
    pub const RECIPIENT: Range<usize> = 20..46;
    pub const SENDER: Range<usize> = 46..72;
    pub const NONCE: Range<usize> = 72..80;
}
