//! Converter configuration.

use serde::{Deserialize, Serialize};

/// Name of the pod interface attached to the primary network.
pub const PRIMARY_POD_INTERFACE_NAME: &str = "eth0";

/// Maximum number of queues a tap device supports.
pub const MULTI_QUEUE_MAX_QUEUES: u32 = 256;

/// Directory vhost-user sockets live in when the CNI reports a bare file name.
pub const VHOSTUSER_SOCKET_DIR: &str = "/var/lib/cni/usrcni/";

/// Rx/tx ring size for vhost-user interfaces.
pub const VHOSTUSER_QUEUE_SIZE: u32 = 1024;

/// CIDR user-mode networking hands out when the network doesn't set one.
pub const DEFAULT_VM_CIDR: &str = "10.0.2.0/24";

/// Protocol used for forwarded ports without one.
pub const DEFAULT_PORT_PROTOCOL: &str = "TCP";

/// Resolver configuration read for DNS search domains.
pub const RESOLV_CONF_PATH: &str = "/etc/resolv.conf";

/// Tunables for a conversion. Every field has a default, so a partial YAML
/// document is enough to override one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Pod interface name for the primary network
    pub primary_pod_interface_name: String,
    /// Upper bound for virtio-net queues
    pub multi_queue_max_queues: u32,
    /// Prefix for vhost-user socket paths without a directory
    pub vhostuser_socket_dir: String,
    /// Rx/tx queue size for vhost-user interfaces
    pub vhostuser_queue_size: u32,
    /// Default guest CIDR for user-mode networking
    pub default_vm_cidr: String,
    /// Protocol for ports that leave it empty
    pub default_port_protocol: String,
    /// Path of the resolver configuration
    pub resolv_conf_path: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            primary_pod_interface_name: PRIMARY_POD_INTERFACE_NAME.to_string(),
            multi_queue_max_queues: MULTI_QUEUE_MAX_QUEUES,
            vhostuser_socket_dir: VHOSTUSER_SOCKET_DIR.to_string(),
            vhostuser_queue_size: VHOSTUSER_QUEUE_SIZE,
            default_vm_cidr: DEFAULT_VM_CIDR.to_string(),
            default_port_protocol: DEFAULT_PORT_PROTOCOL.to_string(),
            resolv_conf_path: RESOLV_CONF_PATH.to_string(),
        }
    }
}

impl ConverterConfig {
    /// Override the queue cap.
    pub fn with_max_queues(mut self, max: u32) -> Self {
        self.multi_queue_max_queues = max;
        self
    }

    /// Override the vhost-user socket directory.
    pub fn with_vhostuser_socket_dir(mut self, dir: impl Into<String>) -> Self {
        self.vhostuser_socket_dir = dir.into();
        self
    }
}
