use std::fmt::{Debug, Formatter, Result};

/// Implemented by types that can be decoded from a raw message payload.
///
/// The payload is what the framing layer hands over after stripping its
/// own header (command, length, checksum).
pub trait Decode: Sized {
    fn decode(payload: &[u8]) -> crate::wire::Result<Self>;
}

/// Implemented by types that serialize into a raw message payload.
///
/// Encoding is infallible: any fully populated value has a byte form.
pub trait Encode {
    fn encode(&self) -> Vec<u8>;
}

/// Service flags advertised in the handshake.
///
/// This is a bitfield (`u64`) carried in the `version` message and in each
/// embedded peer address. Each bit is a capability of the node.
///
/// Unknown bits are preserved.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Services(u64);

impl Services {
    /// Creates a new `Services` from raw bits.
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    /// Returns the raw bitfield value.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Returns true if all bits in `other` are set.
    pub const fn contains(self, other: Services) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Returns true if no bits are set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// 0x00 — not a full node.
    pub const NONE: Services = Services(0x00);

    /// 0x01 — NODE_NETWORK
    ///
    /// This is a full node and can be asked for full blocks.
    pub const NODE_NETWORK: Services = Services(0x01);

    pub fn names(self) -> Vec<&'static str> {
        let mut names = Vec::new();

        if self.is_empty() {
            names.push("NONE");
            return names;
        }

        if self.contains(Self::NODE_NETWORK) {
            names.push("NODE_NETWORK");
        }
        if self.0 & !Self::NODE_NETWORK.0 != 0 {
            names.push("UNKNOWN");
        }

        names
    }
}

impl From<u64> for Services {
    fn from(value: u64) -> Self {
        Services::new(value)
    }
}

impl From<Services> for u64 {
    fn from(value: Services) -> Self {
        value.bits()
    }
}

impl Debug for Services {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if self.is_empty() {
            return write!(f, "Services(NONE)");
        }

        let names = self.names().join(" | ");

        write!(f, "Services({}) [0x{:016x}]", names, self.bits())
    }
}
