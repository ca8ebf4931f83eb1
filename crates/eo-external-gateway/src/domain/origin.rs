//! Caller origin classification and the address-based perimeter check.
//!
//! The check trusts the TCP origin only. A caller is admitted when it is the
//! loopback address or one of this node's own interface addresses; the
//! envelope cipher is what authenticates the payload itself.

use crate::domain::error::RequestFault;
use crate::ports::NetworkInfo;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use tracing::debug;

/// Host literal that always denotes the local machine.
pub const LOOPBACK_MARKER: &str = "localhost";

/// Host part of a caller origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginHost {
    /// `127.0.0.1`, `::1` or the loopback marker
    Loopback,
    /// Any other address, IPv4-mapped IPv6 folded to IPv4
    Ip(IpAddr),
    /// Not an address literal; never matches the own-address set
    Name(String),
}

/// Where a request came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    host: OriginHost,
    port: Option<u16>,
}

impl Origin {
    pub fn from_socket_addr(addr: SocketAddr) -> Self {
        Self {
            host: classify_ip(addr.ip()),
            port: Some(addr.port()),
        }
    }

    /// Parse a `host:port` style remote address.
    ///
    /// Accepts `1.2.3.4:80`, `[::1]:80`, bare addresses, and
    /// `localhost:80`. The port is `None` when absent or not a number.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();

        if let Ok(addr) = raw.parse::<SocketAddr>() {
            return Self::from_socket_addr(addr);
        }
        if let Ok(ip) = raw.parse::<IpAddr>() {
            return Self {
                host: classify_ip(ip),
                port: None,
            };
        }

        let (host, port) = match raw.rsplit_once(':') {
            Some((host, port)) => match port.parse::<u16>() {
                Ok(port) => (host, Some(port)),
                Err(_) => (raw, None),
            },
            None => (raw, None),
        };
        let host = host.trim_start_matches('[').trim_end_matches(']');

        let host = if host.eq_ignore_ascii_case(LOOPBACK_MARKER) {
            OriginHost::Loopback
        } else if let Ok(ip) = host.parse::<IpAddr>() {
            classify_ip(ip)
        } else {
            OriginHost::Name(host.to_string())
        };

        Self { host, port }
    }

    pub fn host(&self) -> &OriginHost {
        &self.host
    }

    /// Source port, used for requester resolution.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn is_local(&self) -> bool {
        self.host == OriginHost::Loopback
    }
}

impl From<SocketAddr> for Origin {
    fn from(addr: SocketAddr) -> Self {
        Self::from_socket_addr(addr)
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.host {
            OriginHost::Loopback => f.write_str(LOOPBACK_MARKER)?,
            OriginHost::Ip(IpAddr::V6(ip)) if self.port.is_some() => write!(f, "[{}]", ip)?,
            OriginHost::Ip(ip) => write!(f, "{}", ip)?,
            OriginHost::Name(name) => f.write_str(name)?,
        }
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        Ok(())
    }
}

/// Admits loopback callers and callers using one of this node's addresses.
#[derive(Clone)]
pub struct OriginAuthorizer {
    network: Arc<dyn NetworkInfo>,
}

impl OriginAuthorizer {
    pub fn new(network: Arc<dyn NetworkInfo>) -> Self {
        Self { network }
    }

    /// Decide whether `origin` may use the gateway.
    ///
    /// The address set is fetched on every call, before the loopback
    /// shortcut, so a failing provider fails every caller.
    pub fn authorize(&self, origin: &Origin) -> Result<(), RequestFault> {
        let own = self.network.own_addresses()?;

        if origin.is_local() {
            return Ok(());
        }

        match origin.host() {
            OriginHost::Ip(ip) if own.iter().any(|addr| addr.to_canonical() == *ip) => {
                debug!(origin = %origin, "Origin is an own address");
                Ok(())
            }
            _ => Err(RequestFault::OriginForbidden(origin.to_string())),
        }
    }
}

fn classify_ip(ip: IpAddr) -> OriginHost {
    match ip.to_canonical() {
        IpAddr::V4(v4) if v4 == Ipv4Addr::LOCALHOST => OriginHost::Loopback,
        IpAddr::V6(v6) if v6 == Ipv6Addr::LOCALHOST => OriginHost::Loopback,
        other => OriginHost::Ip(other),
    }
}
