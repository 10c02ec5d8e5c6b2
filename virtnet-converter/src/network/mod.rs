//! Network interface conversion.
//!
//! This module provides:
//! - Network source validation and name indexing
//! - Pod interface name resolution (`eth0`, `net<k>`)
//! - virtio-net queue sizing
//! - QEMU user-mode networking arguments
//! - vhost-user socket lookup from the pod network status
//! - The per-binding dispatcher producing domain interfaces

mod converter;
mod index;
mod pod_iface;
mod queues;
mod slirp;
mod types;
mod vhostuser;

pub use converter::{
    create_domain_interfaces, ConversionWarning, ConverterContext, NetworkConversion, MODEL_E1000,
    MODEL_RTL8139, MODEL_VIRTIO, MODEL_VIRTIO_TRANSITIONAL,
};
pub use index::{duplicate_network_names, index_networks_by_name, validate_networks_types};
pub use pod_iface::{
    compose_pod_interface_name, find_interface_by_network_name, is_secondary_multus_network,
    pod_interface_name,
};
pub use queues::{calculate_network_queues, cap_queues};
pub use slirp::{create_slirp_network, SlirpNetdev};
pub use types::*;
pub use vhostuser::{socket_source_and_device, vhostuser_info, VhostUserSocket};
