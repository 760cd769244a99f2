use std::borrow::Cow;
use std::fmt;
use std::net::IpAddr;
use std::time::SystemTime;

use rand::Rng;

use crate::wire::constants::{START_HEIGHT_LEN, VERSION_FIXED_PREFIX_LEN};
use crate::wire::endian::{self, u32_to_be, u64_to_be};
use crate::wire::message::Services;
use crate::wire::net_addr::PeerAddress;
use crate::wire::var_str::VarStr;

/// The handshake `version` message.
///
/// Payload layout (all integers big-endian):
///
/// ```text
/// u32       version
/// u64       services
/// i64       timestamp        (unix seconds)
/// net_addr  recipient        (26 bytes, no timestamp)
/// net_addr  sender           (26 bytes, no timestamp)
/// u64       nonce
/// var_str   user_agent
/// u32       start_height
/// ```
///
/// Built with the setters or [`VersionMessage::builder`] before sending, or
/// produced by [`Decode`](crate::wire::Decode) on receipt. It is a plain
/// value: no I/O, no interior mutability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionMessage {
    version: u32,
    services: Services,
    timestamp: i64,
    recipient: PeerAddress,
    sender: PeerAddress,
    nonce: u64,
    user_agent: VarStr,
    start_height: u32,
}

impl VersionMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn set_version(&mut self, version: u32) {
        self.version = version;
    }

    pub fn services(&self) -> Services {
        self.services
    }

    pub fn set_services(&mut self, services: impl Into<Services>) {
        self.services = services.into();
    }

    /// Sender's clock, at whole-second resolution.
    pub fn timestamp(&self) -> SystemTime {
        endian::from_unix_secs(self.timestamp)
    }

    pub fn timestamp_secs(&self) -> i64 {
        self.timestamp
    }

    /// Stores `time` truncated to whole seconds.
    pub fn set_timestamp(&mut self, time: SystemTime) {
        self.timestamp = endian::unix_secs(time);
    }

    pub fn set_timestamp_secs(&mut self, secs: i64) {
        self.timestamp = secs;
    }

    pub fn set_timestamp_now(&mut self) {
        self.set_timestamp(SystemTime::now());
    }

    /// Address the sender believes it is connecting to.
    pub fn recipient(&self) -> &PeerAddress {
        &self.recipient
    }

    pub fn set_recipient(&mut self, ip: IpAddr, port: u16, services: impl Into<Services>) {
        self.recipient = PeerAddress::new(ip, port, services);
    }

    /// Address the sender believes is its own.
    pub fn sender(&self) -> &PeerAddress {
        &self.sender
    }

    pub fn set_sender(&mut self, ip: IpAddr, port: u16, services: impl Into<Services>) {
        self.sender = PeerAddress::new(ip, port, services);
    }

    pub(crate) fn set_recipient_record(&mut self, addr: PeerAddress) {
        self.recipient = addr;
    }

    pub(crate) fn set_sender_record(&mut self, addr: PeerAddress) {
        self.sender = addr;
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn set_nonce(&mut self, nonce: u64) {
        self.nonce = nonce;
    }

    /// Draws a fresh nonce from `rng` and returns it.
    ///
    /// The nonce only serves to spot a node talking to itself; it is not a
    /// secret, so any generator will do.
    pub fn set_random_nonce<R: Rng + ?Sized>(&mut self, rng: &mut R) -> u64 {
        self.nonce = rng.r#gen();
        self.nonce
    }

    /// Raw user agent bytes, without the length prefix.
    pub fn user_agent(&self) -> &[u8] {
        self.user_agent.as_bytes()
    }

    pub fn user_agent_lossy(&self) -> Cow<'_, str> {
        self.user_agent.to_string_lossy()
    }

    pub fn set_user_agent(&mut self, user_agent: impl Into<VarStr>) {
        self.user_agent = user_agent.into();
    }

    /// Resets the user agent to the empty string (a lone `0x00` on the wire).
    pub fn clear_user_agent(&mut self) {
        self.user_agent = VarStr::default();
    }

    /// The user agent section exactly as it appears on the wire.
    pub fn user_agent_encoded(&self) -> Vec<u8> {
        self.user_agent.encode()
    }

    pub(crate) fn user_agent_var_str(&self) -> &VarStr {
        &self.user_agent
    }

    /// Last block height known to the sender.
    pub fn start_height(&self) -> u32 {
        self.start_height
    }

    pub fn set_start_height(&mut self, height: u32) {
        self.start_height = height;
    }

    /// Size of the encoded payload.
    pub fn encoded_len(&self) -> usize {
        VERSION_FIXED_PREFIX_LEN + self.user_agent.encoded_len() + START_HEIGHT_LEN
    }
}

/// Multi-line report of every field, raw bytes next to their meaning.
/// Diagnostic only; the format is not stable.
impl fmt::Display for VersionMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn row(f: &mut fmt::Formatter<'_>, raw: &[u8], meaning: String) -> fmt::Result {
            writeln!(f, "  {:<52} - {}", hex::encode_upper(raw), meaning)
        }

        writeln!(f, "Version message:")?;
        row(
            f,
            &u32_to_be(self.version),
            format!("{} (version)", self.version),
        )?;
        row(
            f,
            &u64_to_be(self.services.bits()),
            format!("{} (services) {:?}", self.services.bits(), self.services),
        )?;
        row(
            f,
            &u64_to_be(self.timestamp as u64),
            format!("{} (timestamp)", self.timestamp),
        )?;
        row(
            f,
            &self.recipient.compile(),
            format!("{} (recipient address)", self.recipient),
        )?;
        row(
            f,
            &self.sender.compile(),
            format!("{} (sender address)", self.sender),
        )?;
        row(f, &u64_to_be(self.nonce), "node id (nonce)".to_string())?;
        row(
            f,
            &self.user_agent_encoded(),
            format!("{:?} (user agent)", self.user_agent_lossy()),
        )?;
        write!(
            f,
            "  {:<52} - last block sending node has is #{}",
            hex::encode_upper(u32_to_be(self.start_height)),
            self.start_height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use std::net::{Ipv4Addr, SocketAddr};
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn default_has_empty_user_agent() {
        let msg = VersionMessage::new();
        assert!(msg.user_agent().is_empty());
        assert_eq!(msg.user_agent_encoded(), vec![0x00]);
        assert_eq!(msg.encoded_len(), 85);
    }

    #[test]
    fn timestamp_truncates_to_seconds() {
        let mut msg = VersionMessage::new();
        msg.set_timestamp(UNIX_EPOCH + Duration::from_millis(1_700_000_000_750));

        assert_eq!(msg.timestamp_secs(), 1_700_000_000);
        assert_eq!(
            msg.timestamp(),
            UNIX_EPOCH + Duration::from_secs(1_700_000_000)
        );
    }

    #[test]
    fn timestamp_now_is_close_to_now() {
        let before = endian::unix_secs(SystemTime::now());
        let mut msg = VersionMessage::new();
        msg.set_timestamp_now();
        let after = endian::unix_secs(SystemTime::now());

        assert!(msg.timestamp_secs() >= before && msg.timestamp_secs() <= after);
    }

    #[test]
    fn random_nonce_comes_from_injected_rng() {
        let mut rng = StepRng::new(0xDEADBEEFCAFEBABE, 1);
        let mut msg = VersionMessage::new();

        assert_eq!(msg.set_random_nonce(&mut rng), 0xDEADBEEFCAFEBABE);
        assert_eq!(msg.nonce(), 0xDEADBEEFCAFEBABE);
        assert_eq!(msg.set_random_nonce(&mut rng), 0xDEADBEEFCAFEBABF);
    }

    #[test]
    fn clear_user_agent() {
        let mut msg = VersionMessage::new();
        msg.set_user_agent("/test:1.0/");
        assert_eq!(msg.encoded_len(), 80 + 11 + 4);

        msg.clear_user_agent();
        assert_eq!(msg.user_agent_encoded(), vec![0x00]);
        assert_eq!(msg.user_agent_lossy(), "");
    }

    #[test]
    fn address_setters() {
        let mut msg = VersionMessage::new();
        msg.set_recipient(IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4)), 8080, Services::NONE);
        msg.set_sender(
            IpAddr::V4(Ipv4Addr::new(5, 6, 7, 8)),
            8444,
            Services::NODE_NETWORK,
        );

        assert_eq!(
            msg.recipient().socket_addr(),
            "1.2.3.4:8080".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(
            msg.sender().socket_addr(),
            "5.6.7.8:8444".parse::<SocketAddr>().unwrap()
        );
        assert_eq!(msg.sender().services(), Services::NODE_NETWORK);
    }

    #[test]
    fn report_lists_every_field() {
        let mut msg = VersionMessage::new();
        msg.set_version(70001);
        msg.set_user_agent("/test:1.0/");
        msg.set_start_height(12345);
        msg.set_nonce(0xDEADBEEFCAFEBABE);

        let report = msg.to_string();
        assert!(report.starts_with("Version message:\n"));
        assert!(report.contains("00011171"));
        assert!(report.contains("70001 (version)"));
        assert!(report.contains("DEADBEEFCAFEBABE"));
        assert!(report.contains("\"/test:1.0/\" (user agent)"));
        assert!(report.contains("#12345"));
        assert_eq!(report.lines().count(), 9);
    }

    #[test]
    fn message_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VersionMessage>();
    }
}
