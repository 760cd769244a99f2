use std::time::SystemTime;

use rand::Rng;
use tracing::trace;

use crate::wire::constants::PROTOCOL_VERSION;
use crate::wire::endian::{u32_to_be, u64_to_be};
use crate::wire::message::{Encode, Services};
use crate::wire::net_addr::PeerAddress;
use crate::wire::var_str::VarStr;
use crate::wire::version::VersionMessage;

impl Encode for VersionMessage {
    /// Serializes the message as a `version` payload.
    ///
    /// ```text
    /// u32       version
    /// u64       services
    /// i64       timestamp
    /// net_addr  recipient
    /// net_addr  sender
    /// u64       nonce
    /// var_str   user_agent
    /// u32       start_height
    /// ```
    ///
    /// The same field values always produce the same bytes.
    ///
    /// # Example
    ///
    /// ```
    /// use handshake_wire::wire::{Encode, VersionMessage};
    ///
    /// let payload = VersionMessage::new().encode();
    /// assert_eq!(payload.len(), 85);
    /// assert_eq!(payload[80], 0x00); // empty user agent
    /// ```
    fn encode(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(self.encoded_len());

        payload.extend(u32_to_be(self.version()));
        payload.extend(u64_to_be(self.services().bits()));
        payload.extend(u64_to_be(self.timestamp_secs() as u64));
        payload.extend(self.recipient().compile());
        payload.extend(self.sender().compile());
        payload.extend(u64_to_be(self.nonce()));
        self.user_agent_var_str().encode_into(&mut payload);
        payload.extend(u32_to_be(self.start_height()));

        trace!(len = payload.len(), "version: encoded");

        payload
    }
}

impl VersionMessage {
    /// Starts a builder for an outgoing message, with `version` preset to
    /// [`PROTOCOL_VERSION`] and every other field zeroed.
    ///
    /// # Example
    ///
    /// ```
    /// use handshake_wire::wire::{Decode, Encode, PeerAddress, Services, VersionMessage};
    /// use std::net::SocketAddr;
    ///
    /// let msg = VersionMessage::builder()
    ///     .services(Services::NODE_NETWORK)
    ///     .recipient(PeerAddress::from("1.2.3.4:8080".parse::<SocketAddr>().unwrap()))
    ///     .user_agent("/test:1.0/")
    ///     .start_height(12345)
    ///     .build();
    ///
    /// let decoded = VersionMessage::decode(&msg.encode()).unwrap();
    /// assert_eq!(decoded, msg);
    /// ```
    pub fn builder() -> VersionMessageBuilder {
        VersionMessageBuilder::default()
    }
}

/// Assembles a [`VersionMessage`] in one expression.
#[derive(Debug, Clone)]
pub struct VersionMessageBuilder {
    msg: VersionMessage,
}

impl Default for VersionMessageBuilder {
    fn default() -> Self {
        let mut msg = VersionMessage::new();
        msg.set_version(PROTOCOL_VERSION);
        Self { msg }
    }
}

impl VersionMessageBuilder {
    pub fn version(mut self, version: u32) -> Self {
        self.msg.set_version(version);
        self
    }

    pub fn services(mut self, services: impl Into<Services>) -> Self {
        self.msg.set_services(services);
        self
    }

    pub fn timestamp(mut self, time: SystemTime) -> Self {
        self.msg.set_timestamp(time);
        self
    }

    pub fn timestamp_secs(mut self, secs: i64) -> Self {
        self.msg.set_timestamp_secs(secs);
        self
    }

    pub fn timestamp_now(mut self) -> Self {
        self.msg.set_timestamp_now();
        self
    }

    pub fn recipient(mut self, addr: PeerAddress) -> Self {
        self.msg.set_recipient_record(addr);
        self
    }

    pub fn sender(mut self, addr: PeerAddress) -> Self {
        self.msg.set_sender_record(addr);
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.msg.set_nonce(nonce);
        self
    }

    pub fn random_nonce<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.msg.set_random_nonce(rng);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<VarStr>) -> Self {
        self.msg.set_user_agent(user_agent);
        self
    }

    pub fn start_height(mut self, height: u32) -> Self {
        self.msg.set_start_height(height);
        self
    }

    pub fn build(self) -> VersionMessage {
        self.msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::net::{IpAddr, Ipv4Addr};

    fn sample() -> VersionMessage {
        VersionMessage::builder()
            .version(70001)
            .services(Services::NODE_NETWORK)
            .timestamp_secs(1_700_000_000)
            .recipient(PeerAddress::new(
                IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4)),
                8080,
                Services::NONE,
            ))
            .sender(PeerAddress::new(
                IpAddr::V4(Ipv4Addr::new(5, 6, 7, 8)),
                8444,
                Services::NODE_NETWORK,
            ))
            .nonce(0xDEADBEEFCAFEBABE)
            .user_agent("/test:1.0/")
            .start_height(12345)
            .build()
    }

    #[test]
    fn encode_layout_is_bit_exact() {
        let payload = sample().encode();

        let mut expected = vec![];
        expected.extend_from_slice(&[0x00, 0x01, 0x11, 0x71]);
        expected.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 1]);
        expected.extend_from_slice(&[0, 0, 0, 0, 0x65, 0x53, 0xF1, 0x00]);
        // recipient
        expected.extend_from_slice(&[0; 8]);
        expected.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xFF, 0xFF, 1, 2, 3, 4]);
        expected.extend_from_slice(&[0x1F, 0x90]);
        // sender
        expected.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 1]);
        expected.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xFF, 0xFF, 5, 6, 7, 8]);
        expected.extend_from_slice(&[0x20, 0xFC]);
        // nonce
        expected.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE, 0xBA, 0xBE]);
        expected.push(10);
        expected.extend_from_slice(b"/test:1.0/");
        expected.extend_from_slice(&[0x00, 0x00, 0x30, 0x39]);

        assert_eq!(payload, expected);
        assert_eq!(payload.len(), sample().encoded_len());
    }

    #[test]
    fn encode_is_deterministic() {
        assert_eq!(sample().encode(), sample().encode());
    }

    #[test]
    fn cleared_user_agent_is_one_zero_byte() {
        let mut msg = sample();
        msg.clear_user_agent();
        let payload = msg.encode();

        assert_eq!(payload.len(), 85);
        assert_eq!(&payload[80..81], &[0x00]);
    }

    #[test]
    fn builder_defaults_to_protocol_version() {
        let msg = VersionMessage::builder().build();
        assert_eq!(msg.version(), PROTOCOL_VERSION);
        assert_eq!(msg.nonce(), 0);
    }

    #[test]
    fn seeded_rng_gives_reproducible_nonce() {
        let a = VersionMessage::builder()
            .random_nonce(&mut StdRng::seed_from_u64(7))
            .build();
        let b = VersionMessage::builder()
            .random_nonce(&mut StdRng::seed_from_u64(7))
            .build();
        assert_eq!(a.nonce(), b.nonce());
    }
}
