//! Handshake `version` message wire codec.
//!
//! This module translates between [`VersionMessage`] and the payload bytes
//! carried inside an outer message frame. It does no I/O: framing, sockets
//! and handshake policy belong to the caller.
//!
//! It implements:
//! - Big-endian integer and timestamp helpers
//! - The 26-byte peer address record embedded in `version`
//! - CompactSize length-prefixed strings (`var_str`)
//! - Encoding and decoding of the full `version` payload
pub mod constants;
pub mod endian;
pub mod error;

pub mod decode;
pub mod message;
pub mod net_addr;
pub mod payload;
pub mod var_str;
pub mod version;

pub use error::{Result, WireError};
pub use message::{Decode, Encode, Services};
pub use net_addr::PeerAddress;
pub use payload::VersionMessageBuilder;
pub use var_str::VarStr;
pub use version::VersionMessage;
