//! Pod network status reported by the CNI layer.
//!
//! Multus publishes the attachments it made as the `k8s.v1.cni.cncf.io/network-status`
//! pod annotation; the launcher hands that document to the converter.

use serde::{Deserialize, Serialize};

/// Device type of a vhost-user attachment.
pub const DEVICE_INFO_TYPE_VHOST_USER: &str = "vhost-user";

/// Network attachments discovered in the pod.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PodNetInterfaces {
    pub interfaces: Vec<NetworkStatus>,
}

impl PodNetInterfaces {
    pub fn new(interfaces: Vec<NetworkStatus>) -> Self {
        Self { interfaces }
    }

    /// Parse a multus `network-status` JSON array.
    pub fn from_network_status_json(json: &str) -> serde_json::Result<Self> {
        let interfaces: Vec<NetworkStatus> = serde_json::from_str(json)?;
        Ok(Self { interfaces })
    }
}

/// One entry of the network-status annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkStatus {
    /// `<namespace>/<attachment>` or just `<attachment>`
    pub name: String,
    /// Interface name inside the pod
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<String>,
    #[serde(default, rename = "device-info", skip_serializing_if = "Option::is_none")]
    pub device_info: Option<DeviceInfo>,
}

impl NetworkStatus {
    /// Attachment name without its namespace prefix.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Device type from the device info, if any.
    pub fn device_type(&self) -> Option<&str> {
        self.device_info.as_ref().map(|d| d.device_type.as_str())
    }
}

/// Device information attached by the CNI plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, rename = "vhost-user", skip_serializing_if = "Option::is_none")]
    pub vhost_user: Option<VhostUserDevice>,
}

/// vhost-user socket details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VhostUserDevice {
    /// `client` or `server`
    pub mode: String,
    /// Socket path, absolute or relative to the socket directory
    pub path: String,
}

impl NetworkStatus {
    /// A vhost-user attachment entry.
    pub fn vhost_user(name: impl Into<String>, path: impl Into<String>, mode: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            interface: None,
            device_info: Some(DeviceInfo {
                device_type: DEVICE_INFO_TYPE_VHOST_USER.to_string(),
                version: "1.0.0".to_string(),
                vhost_user: Some(VhostUserDevice {
                    mode: mode.into(),
                    path: path.into(),
                }),
            }),
        }
    }
}
