//! Adapters for the External Gateway.
//!
//! Default implementations of the outbound ports that touch the host:
//! interface enumeration and port-to-process lookup.

pub mod network;
pub mod port_table;
pub mod proc_resolver;

pub use network::InterfaceAddresses;
pub use port_table::PortTable;
pub use proc_resolver::ProcPortResolver;
