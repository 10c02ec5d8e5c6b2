//! Command-line argument parsing.

use clap::{Parser, ValueEnum};
use virtnet_common::LogFormat;

/// virtnet launcher - converts VMI networking into libvirt domain configuration
#[derive(Parser, Debug)]
#[command(name = "virtnet-launcher")]
#[command(about = "Converts VMI interfaces and networks into libvirt domain interfaces")]
#[command(version)]
pub struct Args {
    /// Path to the VirtualMachineInstance (YAML or JSON)
    #[arg(long)]
    pub vmi: String,

    /// Path to the pod's multus network-status document (JSON)
    #[arg(long)]
    pub network_status: Option<String>,

    /// Path to configuration file (optional, defaults used if not given)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    pub log_level: String,

    /// Log format (text, json)
    #[arg(long, default_value = "text", value_parser = parse_log_format)]
    pub log_format: LogFormat,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Xml)]
    pub output: OutputFormat,

    /// Resolver configuration to read DNS search domains from
    #[arg(long, env = "VIRTNET_RESOLV_CONF")]
    pub resolv_conf: Option<String>,

    /// Fall back to QEMU userland virtio-net emulation when /dev/vhost-net is missing
    #[arg(long)]
    pub allow_emulation: bool,

    /// Render virtio NICs as virtio-transitional for legacy guests
    #[arg(long)]
    pub virtio_transitional: bool,

    /// Maximum number of virtio-net queues
    #[arg(long)]
    pub max_queues: Option<u32>,
}

/// What to print on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// libvirt domain XML fragment
    Xml,
    /// Domain structure as JSON
    Json,
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    s.parse().map_err(|e: anyhow::Error| e.to_string())
}
