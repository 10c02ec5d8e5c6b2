//! Configuration management for the launcher.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use virtnet_converter::ConverterConfig;

use crate::cli::Args;

/// Character device backing in-kernel virtio-net acceleration.
pub const VHOST_NET_DEVICE: &str = "/dev/vhost-net";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Conversion tunables
    pub converter: ConverterConfig,
    /// Host capability configuration
    pub host: HostConfig,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).with_context(|| "Failed to parse config file")
    }

    /// Apply CLI argument overrides to the configuration.
    pub fn with_cli_overrides(mut self, args: &Args) -> Self {
        if let Some(ref resolv_conf) = args.resolv_conf {
            self.converter.resolv_conf_path = resolv_conf.clone();
        }

        if let Some(max_queues) = args.max_queues {
            self.converter = self.converter.with_max_queues(max_queues);
        }

        if args.allow_emulation {
            self.host.allow_emulation = true;
        }

        self
    }
}

/// Host capability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Use QEMU userland virtio-net when the vhost-net device is missing
    pub allow_emulation: bool,
    /// Path of the vhost-net device
    pub vhost_net_device: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            allow_emulation: false,
            vhost_net_device: VHOST_NET_DEVICE.to_string(),
        }
    }
}
