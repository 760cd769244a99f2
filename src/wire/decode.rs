use tracing::{debug, trace};

use crate::wire::constants::{
    MIN_VERSION_PAYLOAD_LEN, PEER_ADDRESS_LEN, START_HEIGHT_LEN, VERSION_FIXED_PREFIX_LEN,
    offsets,
};
use crate::wire::endian::{read_u32, read_u64, slice};
use crate::wire::error::{Result, WireError};
use crate::wire::message::{Decode, Services};
use crate::wire::net_addr::PeerAddress;
use crate::wire::var_str::VarStr;
use crate::wire::version::VersionMessage;

impl Decode for VersionMessage {
    /// Parses a `version` payload.
    ///
    /// Everything between the nonce and the last four bytes is the user
    /// agent section; it must hold exactly one `var_str`. Decoding either
    /// yields the whole message or an error, never a partial record.
    ///
    /// This is stricter than a plain fixed-offset split: the user agent is
    /// parsed here, and bytes left over after its declared length are
    /// rejected with [`WireError::TrailingBytes`] instead of being ignored.
    fn decode(payload: &[u8]) -> Result<Self> {
        decode_version(payload)
            .inspect_err(|e| debug!(len = payload.len(), "version: rejected: {e}"))
    }
}

fn decode_version(payload: &[u8]) -> Result<VersionMessage> {
    if payload.len() < MIN_VERSION_PAYLOAD_LEN {
        return Err(WireError::Truncated {
            needed: MIN_VERSION_PAYLOAD_LEN,
            actual: payload.len(),
        });
    }

    let mut msg = VersionMessage::new();
    let mut c = offsets::VERSION.start;

    msg.set_version(read_u32(payload, &mut c, "version: version")?);
    debug_assert_eq!(c, offsets::VERSION.end);

    let services = read_u64(payload, &mut c, "version: services")?;
    msg.set_services(Services::from(services));
    debug_assert_eq!(c, offsets::SERVICES.end);

    msg.set_timestamp_secs(read_u64(payload, &mut c, "version: timestamp")? as i64);
    debug_assert_eq!(c, offsets::TIMESTAMP.end);

    let recipient = decode_peer_address(payload, &mut c, "version: recipient")?;
    msg.set_recipient_record(recipient);
    debug_assert_eq!(c, offsets::RECIPIENT.end);

    let sender = decode_peer_address(payload, &mut c, "version: sender")?;
    msg.set_sender_record(sender);
    debug_assert_eq!(c, offsets::SENDER.end);

    msg.set_nonce(read_u64(payload, &mut c, "version: nonce")?);
    debug_assert_eq!(c, offsets::NONCE.end);
    debug_assert_eq!(c, VERSION_FIXED_PREFIX_LEN);

    let ua_end = payload.len() - START_HEIGHT_LEN;
    let user_agent = VarStr::decode_exact(&payload[c..ua_end])?;
    msg.set_user_agent(user_agent);

    let mut c = ua_end;
    msg.set_start_height(read_u32(payload, &mut c, "version: start_height")?);

    trace!(
        len = payload.len(),
        version = msg.version(),
        start_height = msg.start_height(),
        "version: decoded"
    );

    Ok(msg)
}

fn decode_peer_address(p: &[u8], c: &mut usize, ctx: &'static str) -> Result<PeerAddress> {
    let bytes = slice::<PEER_ADDRESS_LEN>(p, c, ctx)?;
    Ok(PeerAddress::from_bytes(&bytes))
}
