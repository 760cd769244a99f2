//! Bit-exact codec for the peer handshake `version` message.
pub mod wire;
