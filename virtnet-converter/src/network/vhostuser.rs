//! vhost-user socket lookup.

use crate::error::{ConverterError, Result};

use super::types::{PodNetInterfaces, DEVICE_INFO_TYPE_VHOST_USER};

/// Socket path and mode of a vhost-user attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VhostUserSocket {
    pub path: String,
    pub mode: String,
}

/// Find the vhost-user socket for a pod interface.
///
/// Matches vhost-user entries whose attachment name, without namespace prefix,
/// equals `pod_iface_name`.
pub fn vhostuser_info(pod_iface_name: &str, pod_interfaces: Option<&PodNetInterfaces>) -> Result<VhostUserSocket> {
    let pod_interfaces = pod_interfaces.ok_or_else(|| {
        ConverterError::Lookup("pod network interfaces are required for vhostuser interfaces".to_string())
    })?;

    pod_interfaces
        .interfaces
        .iter()
        .filter(|status| status.device_type() == Some(DEVICE_INFO_TYPE_VHOST_USER))
        .filter(|status| status.short_name() == pod_iface_name)
        .find_map(|status| status.device_info.as_ref()?.vhost_user.as_ref())
        .map(|vhu| VhostUserSocket {
            path: vhu.path.clone(),
            mode: vhu.mode.clone(),
        })
        .ok_or_else(|| {
            ConverterError::Lookup(format!(
                "unable to get vhostuser interface info for {}",
                pod_iface_name
            ))
        })
}

/// Split a reported socket path into the domain source path and target device.
///
/// The device is the last path segment. A bare file name is placed under `socket_dir`.
pub fn socket_source_and_device(path: &str, socket_dir: &str) -> (String, String) {
    match path.rsplit_once('/') {
        Some((_, device)) => (path.to_string(), device.to_string()),
        None => (format!("{}{}", socket_dir, path), path.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::types::NetworkStatus;

    fn pod_interfaces() -> PodNetInterfaces {
        PodNetInterfaces::new(vec![
            NetworkStatus {
                name: "kindnet".to_string(),
                interface: Some("eth0".to_string()),
                device_info: None,
            },
            NetworkStatus::vhost_user("default/net1", "/var/run/vhu/vhu1.sock", "server"),
            NetworkStatus::vhost_user("net2", "vhu2.sock", "client"),
        ])
    }

    #[test]
    fn test_lookup_strips_namespace() {
        let socket = vhostuser_info("net1", Some(&pod_interfaces())).unwrap();
        assert_eq!(socket.path, "/var/run/vhu/vhu1.sock");
        assert_eq!(socket.mode, "server");

        let socket = vhostuser_info("net2", Some(&pod_interfaces())).unwrap();
        assert_eq!(socket.mode, "client");
    }

    #[test]
    fn test_lookup_ignores_other_device_types() {
        let err = vhostuser_info("kindnet", Some(&pod_interfaces())).unwrap_err();
        assert!(matches!(err, ConverterError::Lookup(_)));
    }

    #[test]
    fn test_lookup_without_pod_interfaces() {
        let err = vhostuser_info("net1", None).unwrap_err();
        assert!(matches!(err, ConverterError::Lookup(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_socket_source_and_device() {
        let (path, device) = socket_source_and_device("/var/run/vhu/vhu1.sock", "/var/lib/cni/usrcni/");
        assert_eq!(path, "/var/run/vhu/vhu1.sock");
        assert_eq!(device, "vhu1.sock");

        let (path, device) = socket_source_and_device("vhu2.sock", "/var/lib/cni/usrcni/");
        assert_eq!(path, "/var/lib/cni/usrcni/vhu2.sock");
        assert_eq!(device, "vhu2.sock");
    }
}
