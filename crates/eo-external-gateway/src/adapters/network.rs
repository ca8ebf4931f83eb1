//! Host interface addresses via `local-ip-address`.

use crate::ports::{NetworkError, NetworkInfo};
use std::net::IpAddr;

/// Enumerates every address on every interface, fresh on each call.
#[derive(Debug, Clone, Copy, Default)]
pub struct InterfaceAddresses;

impl InterfaceAddresses {
    pub fn new() -> Self {
        Self
    }
}

impl NetworkInfo for InterfaceAddresses {
    fn own_addresses(&self) -> Result<Vec<IpAddr>, NetworkError> {
        let interfaces = local_ip_address::list_afinet_netifas()
            .map_err(|e| NetworkError::Enumeration(e.to_string()))?;

        let mut addresses: Vec<IpAddr> = interfaces.into_iter().map(|(_, ip)| ip).collect();
        addresses.sort();
        addresses.dedup();
        Ok(addresses)
    }
}
