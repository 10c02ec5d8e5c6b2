//! Type definitions for the VirtualMachineInstance spec consumed by the converter.
//!
//! Field names follow the Kubernetes resource (camelCase on the wire). By the time
//! a spec reaches the converter it has passed admission, so structural rules such
//! as unique names are assumed rather than re-checked.

use serde::{Deserialize, Serialize};

// =============================================================================
// VMI
// =============================================================================

/// A virtual machine instance resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VirtualMachineInstance {
    /// Object metadata
    #[serde(default)]
    pub metadata: ObjectMeta,
    /// Desired state
    #[serde(default)]
    pub spec: VmiSpec,
}

impl VirtualMachineInstance {
    /// Create an empty VMI with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta {
                name: name.into(),
                ..Default::default()
            },
            spec: VmiSpec::default(),
        }
    }

    /// Add a network.
    pub fn with_network(mut self, network: Network) -> Self {
        self.spec.networks.push(network);
        self
    }

    /// Add an interface.
    pub fn with_interface(mut self, iface: Interface) -> Self {
        self.spec.domain.devices.interfaces.push(iface);
        self
    }

    /// Set the CPU topology.
    pub fn with_cpu(mut self, cpu: CpuTopology) -> Self {
        self.spec.domain.cpu = Some(cpu);
        self
    }

    /// Request virtio-net multi-queue for all virtio interfaces.
    pub fn with_multi_queue(mut self, enabled: bool) -> Self {
        self.spec.domain.devices.network_interface_multi_queue = Some(enabled);
        self
    }

    /// Declared networks, in declaration order.
    pub fn networks(&self) -> &[Network] {
        &self.spec.networks
    }

    /// Declared interfaces, in declaration order.
    pub fn interfaces(&self) -> &[Interface] {
        &self.spec.domain.devices.interfaces
    }

    /// Whether virtio-net multi-queue was requested.
    pub fn multi_queue_requested(&self) -> bool {
        self.spec.domain.devices.network_interface_multi_queue.unwrap_or(false)
    }
}

/// Object metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    /// UID assigned by the API server
    #[serde(default)]
    pub uid: Option<String>,
}

/// VMI spec.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VmiSpec {
    /// Domain (hardware) description
    #[serde(default)]
    pub domain: DomainSpec,
    /// Networks the interfaces attach to
    #[serde(default)]
    pub networks: Vec<Network>,
}

/// Virtual hardware description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainSpec {
    /// CPU topology (1 vCPU when unset)
    #[serde(default)]
    pub cpu: Option<CpuTopology>,
    /// Devices
    #[serde(default)]
    pub devices: Devices,
}

/// CPU topology. Zero means unset and counts as 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuTopology {
    #[serde(default)]
    pub sockets: u32,
    #[serde(default)]
    pub cores: u32,
    #[serde(default)]
    pub threads: u32,
}

impl CpuTopology {
    /// Create a topology.
    pub fn new(sockets: u32, cores: u32, threads: u32) -> Self {
        Self { sockets, cores, threads }
    }
}

/// Devices attached to the domain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Devices {
    /// Network interfaces
    #[serde(default)]
    pub interfaces: Vec<Interface>,
    /// Enable virtio-net multi-queue
    #[serde(default, rename = "networkInterfaceMultiqueue")]
    pub network_interface_multi_queue: Option<bool>,
}

// =============================================================================
// NETWORKS
// =============================================================================

/// A network an interface can attach to.
///
/// Exactly one of `pod` and `multus` must be set; the converter checks this
/// before doing anything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub name: String,
    /// Pod default network
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod: Option<PodNetwork>,
    /// Multus attachment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multus: Option<MultusNetwork>,
}

impl Network {
    /// A network backed by the pod's default network.
    pub fn pod(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pod: Some(PodNetwork::default()),
            multus: None,
        }
    }

    /// A network backed by a multus network attachment definition.
    pub fn multus(name: impl Into<String>, network_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pod: None,
            multus: Some(MultusNetwork {
                network_name: network_name.into(),
                default: false,
            }),
        }
    }

    /// Mark the multus attachment as the pod's default network.
    pub fn as_default(mut self) -> Self {
        if let Some(multus) = self.multus.as_mut() {
            multus.default = true;
        }
        self
    }

    /// Set the VM-side CIDR of a pod network.
    pub fn with_vm_cidr(mut self, cidr: impl Into<String>) -> Self {
        if let Some(pod) = self.pod.as_mut() {
            pod.vm_network_cidr = Some(cidr.into());
        }
        self
    }

    /// Whether this is an additional multus attachment rather than the pod network.
    pub fn is_secondary_multus(&self) -> bool {
        self.multus.as_ref().map(|m| !m.default).unwrap_or(false)
    }
}

/// Pod default network source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodNetwork {
    /// CIDR handed to the guest by user-mode networking
    #[serde(default, rename = "vmNetworkCIDR", skip_serializing_if = "Option::is_none")]
    pub vm_network_cidr: Option<String>,
}

/// Multus network source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultusNetwork {
    /// NetworkAttachmentDefinition reference
    pub network_name: String,
    /// Replaces the pod network instead of adding to it
    #[serde(default)]
    pub default: bool,
}

// =============================================================================
// INTERFACES
// =============================================================================

/// A guest network interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interface {
    /// Must match the name of a network in the same spec
    pub name: String,
    /// NIC model (virtio when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Guest PCI address, `DDDD:BB:SS.F`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pci_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boot_order: Option<u32>,
    /// Ports forwarded by user-mode networking
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<Port>,
    /// How the interface connects to the host
    #[serde(flatten)]
    pub binding: InterfaceBinding,
}

impl Interface {
    /// Create an interface with the given binding.
    pub fn new(name: impl Into<String>, binding: InterfaceBinding) -> Self {
        Self {
            name: name.into(),
            model: None,
            pci_address: None,
            boot_order: None,
            ports: Vec::new(),
            binding,
        }
    }

    /// Set the NIC model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the guest PCI address.
    pub fn with_pci_address(mut self, address: impl Into<String>) -> Self {
        self.pci_address = Some(address.into());
        self
    }

    /// Set the boot order.
    pub fn with_boot_order(mut self, order: u32) -> Self {
        self.boot_order = Some(order);
        self
    }

    /// Add a forwarded port.
    pub fn with_port(mut self, port: Port) -> Self {
        self.ports.push(port);
        self
    }
}

/// Interface binding method.
///
/// Exactly one binding per interface; the wire form is a single key such as
/// `bridge: {}` next to the interface's other fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceBinding {
    /// Pre-configured tap device bridged to the pod interface
    Bridge {},
    /// Pre-configured tap device behind NAT
    Masquerade {},
    /// QEMU user-mode networking
    Slirp {},
    /// macvtap device on a secondary network
    Macvtap {},
    /// SR-IOV VF passthrough, handled as a host device
    Sriov {},
    /// vhost-user socket provided by the CNI
    Vhostuser {},
}

impl InterfaceBinding {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceBinding::Bridge {} => "bridge",
            InterfaceBinding::Masquerade {} => "masquerade",
            InterfaceBinding::Slirp {} => "slirp",
            InterfaceBinding::Macvtap {} => "macvtap",
            InterfaceBinding::Sriov {} => "sriov",
            InterfaceBinding::Vhostuser {} => "vhostuser",
        }
    }
}

/// A port forwarded into the guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub port: u16,
    /// TCP when empty
    #[serde(default)]
    pub protocol: String,
}

impl Port {
    /// A port with the default protocol.
    pub fn new(port: u16) -> Self {
        Self {
            name: None,
            port,
            protocol: String::new(),
        }
    }

    /// A port with an explicit protocol.
    pub fn with_protocol(port: u16, protocol: impl Into<String>) -> Self {
        Self {
            name: None,
            port,
            protocol: protocol.into(),
        }
    }
}
