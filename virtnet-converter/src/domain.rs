//! Libvirt domain types produced by the converter.

use serde::{Deserialize, Serialize};

use crate::pci::PciAddress;

// =============================================================================
// INTERFACES
// =============================================================================

/// Libvirt interface type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceType {
    /// Pre-configured tap or macvtap device
    Ethernet,
    /// QEMU user-mode networking
    User,
    /// vhost-user unix socket
    Vhostuser,
}

impl InterfaceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceType::Ethernet => "ethernet",
            InterfaceType::User => "user",
            InterfaceType::Vhostuser => "vhostuser",
        }
    }
}

/// A `<interface>` element of the domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainInterface {
    pub interface_type: InterfaceType,
    /// NIC model (`<model type=...>`)
    pub model_type: String,
    /// User-defined alias, the VMI interface name
    pub alias: String,
    pub address: Option<PciAddress>,
    pub boot_order: Option<u32>,
    pub rom: Option<Rom>,
    pub driver: Option<InterfaceDriver>,
    pub source: Option<InterfaceSource>,
    pub target: Option<InterfaceTarget>,
}

impl DomainInterface {
    /// An interface with only type, model and alias set.
    pub fn new(interface_type: InterfaceType, model_type: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            interface_type,
            model_type: model_type.into(),
            alias: alias.into(),
            address: None,
            boot_order: None,
            rom: None,
            driver: None,
            source: None,
            target: None,
        }
    }
}

/// Option ROM setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rom {
    pub enabled: bool,
}

impl Rom {
    /// Keeps non-boot NICs from attempting a network boot.
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn enabled_str(&self) -> &'static str {
        if self.enabled {
            "yes"
        } else {
            "no"
        }
    }
}

/// `<driver>` settings of an interface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDriver {
    /// Backend name, e.g. `vhost`
    pub name: Option<String>,
    pub queues: Option<u32>,
    pub rx_queue_size: Option<u32>,
    pub tx_queue_size: Option<u32>,
}

/// `<source>` of a socket-backed interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceSource {
    /// Socket type, `unix`
    pub source_type: String,
    pub path: String,
    /// `client` or `server`
    pub mode: String,
}

/// `<target>` device name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceTarget {
    pub device: String,
}

// =============================================================================
// QEMU COMMAND LINE
// =============================================================================

/// A single `<qemu:arg value=...>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QemuArg {
    pub value: String,
}

impl QemuArg {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }
}

/// Extra arguments passed straight to QEMU.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QemuCmd {
    pub args: Vec<QemuArg>,
}

// =============================================================================
// DOMAIN
// =============================================================================

/// The parts of a libvirt domain the network conversion fills in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
    pub uuid: Option<String>,
    pub interfaces: Vec<DomainInterface>,
    /// Only present when something needs extra QEMU arguments
    pub qemu_cmd: Option<QemuCmd>,
}

impl Domain {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the domain UUID.
    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    /// Append interfaces and QEMU arguments, keeping their order.
    pub fn apply_network(&mut self, interfaces: Vec<DomainInterface>, qemu_args: Vec<QemuArg>) {
        self.interfaces.extend(interfaces);
        if !qemu_args.is_empty() {
            self.qemu_cmd
                .get_or_insert_with(QemuCmd::default)
                .args
                .extend(qemu_args);
        }
    }
}
