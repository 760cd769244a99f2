use std::fmt;
use std::net::{IpAddr, Ipv6Addr, SocketAddr};

use crate::wire::constants::PEER_ADDRESS_LEN;
use crate::wire::endian::{be_to_u16, be_to_u64, u16_to_be, u64_to_be};
use crate::wire::message::Services;

/// Peer address record as embedded (twice) in a `version` payload.
///
/// Unlike entries of an `addr` message this form has no leading timestamp:
///
/// ```text
/// 8  bytes  services     (big-endian)
/// 16 bytes  IPv6 address (IPv4 as ::ffff:a.b.c.d)
/// 2  bytes  port         (big-endian)
/// ```
///
/// The address is stored in its 16-byte wire form and is not validated;
/// reserved or unroutable ranges pass through untouched.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerAddress {
    services: Services,
    ip: Ipv6Addr,
    port: u16,
}

impl Default for PeerAddress {
    fn default() -> Self {
        Self {
            services: Services::NONE,
            ip: Ipv6Addr::UNSPECIFIED,
            port: 0,
        }
    }
}

impl PeerAddress {
    pub fn new(ip: IpAddr, port: u16, services: impl Into<Services>) -> Self {
        let mut addr = Self::default();
        addr.set_address(ip);
        addr.set_port(port);
        addr.set_services(services);
        addr
    }

    pub fn set_services(&mut self, services: impl Into<Services>) {
        self.services = services.into();
    }

    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    /// Stores `ip`, mapping IPv4 into `::ffff:0:0/96`.
    pub fn set_address(&mut self, ip: IpAddr) {
        self.ip = match ip {
            IpAddr::V4(v4) => v4.to_ipv6_mapped(),
            IpAddr::V6(v6) => v6,
        };
    }

    pub fn services(&self) -> Services {
        self.services
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// The raw 16-byte address as carried on the wire.
    pub fn ipv6(&self) -> Ipv6Addr {
        self.ip
    }

    /// The address with IPv4-mapped values turned back into IPv4.
    pub fn ip(&self) -> IpAddr {
        match self.ip.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(self.ip),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip(), self.port)
    }

    /// Serializes the record into its 26-byte wire form.
    pub fn compile(&self) -> [u8; PEER_ADDRESS_LEN] {
        let mut out = [0u8; PEER_ADDRESS_LEN];
        out[0..8].copy_from_slice(&u64_to_be(self.services.bits()));
        out[8..24].copy_from_slice(&self.ip.octets());
        out[24..26].copy_from_slice(&u16_to_be(self.port));
        out
    }

    /// Splits a 26-byte record back into its fields.
    pub fn from_bytes(bytes: &[u8; PEER_ADDRESS_LEN]) -> Self {
        let mut services = [0u8; 8];
        let mut ip = [0u8; 16];
        let mut port = [0u8; 2];
        services.copy_from_slice(&bytes[0..8]);
        ip.copy_from_slice(&bytes[8..24]);
        port.copy_from_slice(&bytes[24..26]);

        Self {
            services: Services::new(be_to_u64(services)),
            ip: Ipv6Addr::from(ip),
            port: be_to_u16(port),
        }
    }
}

impl From<SocketAddr> for PeerAddress {
    fn from(addr: SocketAddr) -> Self {
        Self::new(addr.ip(), addr.port(), Services::NONE)
    }
}

impl fmt::Debug for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerAddress")
            .field("services", &self.services)
            .field("addr", &self.socket_addr())
            .finish()
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} services=0x{:016x}",
            self.socket_addr(),
            self.services.bits()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn ipv4_is_stored_mapped() {
        let addr = PeerAddress::new(IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4)), 8080, 0u64);
        let bytes = addr.compile();

        assert_eq!(&bytes[0..8], &[0u8; 8]);
        assert_eq!(
            &bytes[8..24],
            &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xFF, 0xFF, 1, 2, 3, 4]
        );
        assert_eq!(&bytes[24..26], &[0x1F, 0x90]);
    }

    #[test]
    fn ipv4_round_trips_through_mapped_form() {
        let ip = IpAddr::V4(Ipv4Addr::new(5, 6, 7, 8));
        let addr = PeerAddress::new(ip, 8444, 1u64);

        let decoded = PeerAddress::from_bytes(&addr.compile());
        assert_eq!(decoded.ip(), ip);
        assert_eq!(decoded.port(), 8444);
        assert_eq!(decoded.services(), Services::NODE_NETWORK);
        assert_eq!(decoded, addr);
    }

    #[test]
    fn ipv6_is_stored_as_is() {
        let v6: Ipv6Addr = "2001:db8::1".parse().unwrap();
        let addr = PeerAddress::new(IpAddr::V6(v6), 443, Services::NONE);
        let bytes = addr.compile();

        assert_eq!(&bytes[8..24], &v6.octets());
        assert_eq!(PeerAddress::from_bytes(&bytes).ip(), IpAddr::V6(v6));
    }

    #[test]
    fn services_are_big_endian() {
        let addr = PeerAddress::new(
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            1,
            0x0102_0304_0506_0708u64,
        );
        assert_eq!(&addr.compile()[0..8], &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn decode_does_not_validate_address() {
        let mut bytes = [0xFFu8; PEER_ADDRESS_LEN];
        bytes[8..24].copy_from_slice(&Ipv6Addr::UNSPECIFIED.octets());
        let addr = PeerAddress::from_bytes(&bytes);
        assert_eq!(addr.ipv6(), Ipv6Addr::UNSPECIFIED);
        assert_eq!(addr.port(), u16::MAX);
        assert_eq!(addr.services().bits(), u64::MAX);
    }

    #[test]
    fn from_socket_addr() {
        let sa: SocketAddr = "10.0.0.1:8333".parse().unwrap();
        let addr = PeerAddress::from(sa);
        assert_eq!(addr.socket_addr(), sa);
        assert!(addr.services().is_empty());
    }
}
