//! Pod interface names.
//!
//! The CNI names the pod interface of the primary network `eth0` and the k-th
//! secondary multus attachment `net<k>`, counting from 1 in declaration order.

use crate::config::ConverterConfig;
use crate::error::{ConverterError, Result};
use crate::types::{Interface, Network, VirtualMachineInstance};

/// Whether the network is a multus attachment added next to the pod network.
pub fn is_secondary_multus_network(network: &Network) -> bool {
    network.is_secondary_multus()
}

/// The interface attached to the given network, if any.
pub fn find_interface_by_network_name<'a>(
    vmi: &'a VirtualMachineInstance,
    network: &Network,
) -> Option<&'a Interface> {
    vmi.interfaces().iter().find(|iface| iface.name == network.name)
}

/// 1-based position of the network among the secondary multus networks.
fn find_multus_index(vmi: &VirtualMachineInstance, network: &Network) -> Option<usize> {
    vmi.networks()
        .iter()
        .filter(|n| is_secondary_multus_network(n))
        .position(|n| n.name == network.name)
        .map(|idx| idx + 1)
}

/// Pod interface name for a network.
pub fn compose_pod_interface_name(
    vmi: &VirtualMachineInstance,
    network: &Network,
    config: &ConverterConfig,
) -> Result<String> {
    if is_secondary_multus_network(network) {
        let idx = find_multus_index(vmi, network).ok_or_else(|| {
            ConverterError::Reference(format!("network name {} not found", network.name))
        })?;
        return Ok(format!("net{}", idx));
    }
    Ok(config.primary_pod_interface_name.clone())
}

/// Pod interface name for a VMI interface.
pub fn pod_interface_name(
    vmi: &VirtualMachineInstance,
    iface_name: &str,
    config: &ConverterConfig,
) -> Result<String> {
    for network in vmi.networks() {
        if network.pod.is_none() && network.multus.is_none() {
            continue;
        }
        let attached = find_interface_by_network_name(vmi, network)
            .map(|iface| iface.name == iface_name)
            .unwrap_or(false);
        if attached {
            return compose_pod_interface_name(vmi, network, config);
        }
    }
    Err(ConverterError::Reference(format!("interface {} not found", iface_name)))
}
