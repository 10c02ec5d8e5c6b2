//! # virtnet Launcher
//!
//! Reads a VirtualMachineInstance and the pod's network status, converts the
//! VMI networking into libvirt domain interfaces and prints the result.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use virtnet_converter::{
    create_domain_interfaces, ConverterContext, Domain, DomainXmlBuilder, FileResolvConf,
    PodNetInterfaces, VirtualMachineInstance,
};

mod cli;
mod config;
mod host;

use cli::{Args, OutputFormat};
use config::Config;

fn main() -> Result<()> {
    let args = Args::parse();

    virtnet_common::init_logging(&args.log_level, args.log_format)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting virtnet launcher"
    );

    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    }
    .with_cli_overrides(&args);

    let vmi = load_vmi(&args.vmi)?;
    let pod_interfaces = args
        .network_status
        .as_deref()
        .map(load_network_status)
        .transpose()?;

    let resolv = FileResolvConf::new(&config.converter.resolv_conf_path);
    let mut ctx = ConverterContext::new(&config.converter, &resolv)
        .with_virtio_net_prohibited(host::virtio_net_prohibited(&config.host))
        .with_virtio_transitional(args.virtio_transitional);
    if let Some(ref pod_interfaces) = pod_interfaces {
        ctx = ctx.with_pod_net_interfaces(pod_interfaces);
    }

    let conversion = create_domain_interfaces(&vmi, &ctx).map_err(|e| {
        error!(error = %e, retryable = e.is_retryable(), "Network conversion failed");
        e
    })?;
    conversion.log_warnings();

    info!(
        vmi = %vmi.metadata.name,
        interfaces = conversion.interfaces.len(),
        qemu_args = conversion.qemu_args.len(),
        "Network conversion complete"
    );

    let mut domain = Domain::new(domain_name(&vmi)).with_uuid(domain_uuid(&vmi));
    domain.apply_network(conversion.interfaces, conversion.qemu_args);

    match args.output {
        OutputFormat::Xml => println!("{}", DomainXmlBuilder::new(&domain).build()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&domain)?),
    }

    Ok(())
}

/// Load a VMI from YAML. JSON is accepted as a YAML subset.
fn load_vmi(path: &str) -> Result<VirtualMachineInstance> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read VMI: {}", path))?;
    serde_yaml::from_str(&content).with_context(|| format!("Failed to parse VMI: {}", path))
}

fn load_network_status(path: &str) -> Result<PodNetInterfaces> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read network status: {}", path))?;
    PodNetInterfaces::from_network_status_json(&content)
        .with_context(|| format!("Failed to parse network status: {}", path))
}

/// libvirt domain name for a VMI, `<namespace>_<name>`.
fn domain_name(vmi: &VirtualMachineInstance) -> String {
    let namespace = if vmi.metadata.namespace.is_empty() {
        "default"
    } else {
        vmi.metadata.namespace.as_str()
    };
    format!("{}_{}", namespace, vmi.metadata.name)
}

fn domain_uuid(vmi: &VirtualMachineInstance) -> String {
    match vmi.metadata.uid.as_deref() {
        Some(uid) if !uid.is_empty() => uid.to_string(),
        _ => uuid::Uuid::new_v4().to_string(),
    }
}
