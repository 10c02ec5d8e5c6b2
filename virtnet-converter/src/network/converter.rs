//! Conversion of VMI interfaces into domain interfaces.
//!
//! Each interface is dispatched on its binding:
//!
//! | Binding              | Domain interface | Extra                           |
//! |----------------------|------------------|---------------------------------|
//! | bridge / masquerade  | `ethernet`       | boot order or ROM disabled      |
//! | macvtap              | `ethernet`       | secondary multus network only   |
//! | slirp                | `user`           | `-netdev user,...` QEMU args    |
//! | vhostuser            | `vhostuser`      | unix socket from pod status     |
//! | sriov                | none             | attached as a host device       |
//!
//! The conversion is all-or-nothing: the first error aborts it. Non-fatal
//! findings come back as [`ConversionWarning`]s for the caller to surface.

use std::fmt;

use tracing::{debug, instrument, warn};

use crate::config::ConverterConfig;
use crate::dns::ResolvConfSource;
use crate::domain::{
    DomainInterface, InterfaceDriver, InterfaceSource, InterfaceTarget, InterfaceType, QemuArg, Rom,
};
use crate::error::{ConverterError, Result};
use crate::pci::PciAddress;
use crate::types::{Interface, InterfaceBinding, VirtualMachineInstance};

use super::index::{duplicate_network_names, index_networks_by_name, validate_networks_types};
use super::pod_iface::pod_interface_name;
use super::queues::calculate_network_queues;
use super::slirp::create_slirp_network;
use super::types::PodNetInterfaces;
use super::vhostuser::{socket_source_and_device, vhostuser_info};

/// Default NIC model.
pub const MODEL_VIRTIO: &str = "virtio";
/// Model slirp falls back to.
pub const MODEL_E1000: &str = "e1000";
pub const MODEL_RTL8139: &str = "rtl8139";
/// virtio model for guests that only speak pre-1.0 virtio.
pub const MODEL_VIRTIO_TRANSITIONAL: &str = "virtio-transitional";

/// Backend driver name for multi-queue virtio.
const VHOST_DRIVER: &str = "vhost";
/// Source type of vhost-user sockets.
const UNIX_SOURCE: &str = "unix";

/// Inputs from the host and pod the conversion depends on.
pub struct ConverterContext<'a> {
    pub config: &'a ConverterConfig,
    /// `/dev/vhost-net` is missing and software emulation is not allowed
    pub virtio_net_prohibited: bool,
    /// Render virtio NICs as `virtio-transitional`
    pub use_virtio_transitional: bool,
    /// Attachments reported by the CNI; required for vhost-user
    pub pod_net_interfaces: Option<&'a PodNetInterfaces>,
    /// Only read when a slirp interface is present
    pub resolv_conf: &'a dyn ResolvConfSource,
}

impl<'a> ConverterContext<'a> {
    pub fn new(config: &'a ConverterConfig, resolv_conf: &'a dyn ResolvConfSource) -> Self {
        Self {
            config,
            virtio_net_prohibited: false,
            use_virtio_transitional: false,
            pod_net_interfaces: None,
            resolv_conf,
        }
    }

    pub fn with_virtio_net_prohibited(mut self, prohibited: bool) -> Self {
        self.virtio_net_prohibited = prohibited;
        self
    }

    pub fn with_virtio_transitional(mut self, enabled: bool) -> Self {
        self.use_virtio_transitional = enabled;
        self
    }

    pub fn with_pod_net_interfaces(mut self, interfaces: &'a PodNetInterfaces) -> Self {
        self.pod_net_interfaces = Some(interfaces);
        self
    }
}

/// A non-fatal finding during conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionWarning {
    /// Slirp only works with e1000 and rtl8139.
    ModelDowngraded {
        interface: String,
        requested: Option<String>,
        effective: String,
    },
    /// More than one network uses this name; the last declaration is used.
    DuplicateNetworkName { network: String },
}

impl fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionWarning::ModelDowngraded {
                interface,
                requested,
                effective,
            } => write!(
                f,
                "the network interface type of {} was changed from {} to {} due to unsupported interface type by qemu slirp network",
                interface,
                requested.as_deref().unwrap_or(MODEL_VIRTIO),
                effective
            ),
            ConversionWarning::DuplicateNetworkName { network } => {
                write!(f, "network {} is declared more than once, using the last declaration", network)
            }
        }
    }
}

/// Result of a network conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkConversion {
    /// Domain interfaces in VMI declaration order
    pub interfaces: Vec<DomainInterface>,
    /// `-netdev` pairs to append to the QEMU command line
    pub qemu_args: Vec<QemuArg>,
    pub warnings: Vec<ConversionWarning>,
}

impl NetworkConversion {
    /// Emit every warning as a `warn!` event.
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!(warning = %warning, "Network conversion warning");
        }
    }
}

/// Convert the VMI's interfaces into domain interfaces and QEMU arguments.
#[instrument(skip_all, fields(vmi = %vmi.metadata.name))]
pub fn create_domain_interfaces(
    vmi: &VirtualMachineInstance,
    ctx: &ConverterContext<'_>,
) -> Result<NetworkConversion> {
    validate_networks_types(vmi.networks())?;

    let mut conversion = NetworkConversion::default();
    conversion.warnings.extend(
        duplicate_network_names(vmi.networks())
            .into_iter()
            .map(|network| ConversionWarning::DuplicateNetworkName { network }),
    );

    let networks = index_networks_by_name(vmi.networks());
    let mut search_domains: Option<Vec<String>> = None;

    for iface in vmi.interfaces() {
        let network = networks.get(&iface.name).ok_or_else(|| {
            ConverterError::Reference(format!("failed to find network {}", iface.name))
        })?;

        let Some(interface_type) = domain_interface_type(iface.binding) else {
            debug!(interface = %iface.name, "Skipping SR-IOV interface, attached as host device");
            continue;
        };

        let model = effective_model(iface, &mut conversion.warnings);
        let mut domain_iface =
            DomainInterface::new(interface_type, translate_model(&model, ctx), iface.name.as_str());

        if model == MODEL_VIRTIO {
            if ctx.virtio_net_prohibited {
                return Err(ConverterError::Capability(
                    "in-kernel virtio-net device emulation '/dev/vhost-net' not present".to_string(),
                ));
            }
            if vmi.multi_queue_requested() {
                let queues = calculate_network_queues(vmi, ctx.config.multi_queue_max_queues);
                domain_iface.driver = Some(InterfaceDriver {
                    name: Some(VHOST_DRIVER.to_string()),
                    queues: Some(queues),
                    ..Default::default()
                });
            }
        }

        if let Some(addr) = iface.pci_address.as_deref().filter(|a| !a.is_empty()) {
            let parsed: PciAddress = addr.parse().map_err(|e| {
                ConverterError::Configuration(format!("failed to configure interface {}: {}", iface.name, e))
            })?;
            domain_iface.address = Some(parsed);
        }

        match iface.binding {
            InterfaceBinding::Bridge {} | InterfaceBinding::Masquerade {} => {
                set_boot_order_or_disable_rom(&mut domain_iface, iface);
            }
            InterfaceBinding::Slirp {} => {
                if search_domains.is_none() {
                    search_domains = Some(ctx.resolv_conf.resolv_conf()?.search_domains);
                }
                let domains = search_domains.as_deref().unwrap_or_default();
                let args = create_slirp_network(iface, network, domains, ctx.config)?;
                conversion.qemu_args.extend(args);
            }
            InterfaceBinding::Macvtap {} => {
                if !network.is_secondary_multus() {
                    return Err(ConverterError::Configuration(format!(
                        "macvtap interface {} requires a secondary multus network",
                        iface.name
                    )));
                }
                set_boot_order_or_disable_rom(&mut domain_iface, iface);
            }
            InterfaceBinding::Vhostuser {} => {
                let pod_iface = pod_interface_name(vmi, &iface.name, ctx.config)?;
                let socket = vhostuser_info(&pod_iface, ctx.pod_net_interfaces)?;
                let (path, device) = socket_source_and_device(&socket.path, &ctx.config.vhostuser_socket_dir);

                domain_iface.source = Some(InterfaceSource {
                    source_type: UNIX_SOURCE.to_string(),
                    path,
                    mode: socket.mode,
                });
                domain_iface.target = Some(InterfaceTarget { device });
                domain_iface.driver = Some(InterfaceDriver {
                    rx_queue_size: Some(ctx.config.vhostuser_queue_size),
                    tx_queue_size: Some(ctx.config.vhostuser_queue_size),
                    ..Default::default()
                });
            }
            // Filtered out above.
            InterfaceBinding::Sriov {} => {}
        }

        debug!(
            interface = %iface.name,
            binding = iface.binding.as_str(),
            model = %domain_iface.model_type,
            "Converted interface"
        );
        conversion.interfaces.push(domain_iface);
    }

    Ok(conversion)
}

/// Domain interface type for a binding; `None` for SR-IOV.
fn domain_interface_type(binding: InterfaceBinding) -> Option<InterfaceType> {
    match binding {
        InterfaceBinding::Bridge {} | InterfaceBinding::Masquerade {} | InterfaceBinding::Macvtap {} => {
            Some(InterfaceType::Ethernet)
        }
        InterfaceBinding::Slirp {} => Some(InterfaceType::User),
        InterfaceBinding::Vhostuser {} => Some(InterfaceType::Vhostuser),
        InterfaceBinding::Sriov {} => None,
    }
}

/// NIC model to use, recording a warning when slirp forces e1000.
fn effective_model(iface: &Interface, warnings: &mut Vec<ConversionWarning>) -> String {
    let requested = iface.model.as_deref().filter(|m| !m.is_empty());

    if let InterfaceBinding::Slirp {} = iface.binding {
        return match requested {
            Some(model @ (MODEL_E1000 | MODEL_RTL8139)) => model.to_string(),
            _ => {
                warnings.push(ConversionWarning::ModelDowngraded {
                    interface: iface.name.clone(),
                    requested: requested.map(str::to_string),
                    effective: MODEL_E1000.to_string(),
                });
                MODEL_E1000.to_string()
            }
        };
    }

    requested.unwrap_or(MODEL_VIRTIO).to_string()
}

/// Model type written to the domain. Only the rendered name changes, the
/// interface is still virtio for capability and queue decisions.
fn translate_model<'m>(model: &'m str, ctx: &ConverterContext<'_>) -> &'m str {
    if model == MODEL_VIRTIO && ctx.use_virtio_transitional {
        MODEL_VIRTIO_TRANSITIONAL
    } else {
        model
    }
}

fn set_boot_order_or_disable_rom(domain_iface: &mut DomainInterface, iface: &Interface) {
    match iface.boot_order {
        Some(order) => domain_iface.boot_order = Some(order),
        None => domain_iface.rom = Some(Rom::disabled()),
    }
}
