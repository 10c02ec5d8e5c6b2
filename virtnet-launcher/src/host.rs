//! Host capability detection.

use std::path::Path;

use tracing::{debug, warn};

use crate::config::HostConfig;

/// Decide whether virtio-net must be refused on this host.
///
/// virtio-net needs the vhost-net device unless userland emulation is allowed.
pub fn virtio_net_prohibited(host: &HostConfig) -> bool {
    if Path::new(&host.vhost_net_device).exists() {
        debug!(device = %host.vhost_net_device, "vhost-net device available");
        return false;
    }

    if host.allow_emulation {
        warn!(
            device = %host.vhost_net_device,
            "vhost-net device missing, falling back to QEMU userland emulation for virtio-net"
        );
        false
    } else {
        debug!(device = %host.vhost_net_device, "vhost-net device missing, virtio-net prohibited");
        true
    }
}
