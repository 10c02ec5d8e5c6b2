//! XML generation for the network parts of a libvirt domain.
//!
//! Renders the `<interface>` devices and the `<qemu:commandline>` block the
//! converter produces. Attribute values are escaped; everything else is built
//! with direct string generation.

use quick_xml::escape::escape;

use crate::domain::{Domain, DomainInterface};

/// Namespace for `<qemu:commandline>`.
const QEMU_NAMESPACE: &str = "http://libvirt.org/schemas/domain/qemu/1.0";

/// Prefix libvirt uses for user-defined device aliases.
const USER_ALIAS_PREFIX: &str = "ua-";

/// Builder for libvirt domain XML.
#[derive(Debug)]
pub struct DomainXmlBuilder<'a> {
    domain: &'a Domain,
}

impl<'a> DomainXmlBuilder<'a> {
    /// Create a new XML builder for the given domain.
    pub fn new(domain: &'a Domain) -> Self {
        Self { domain }
    }

    /// Build the domain XML string.
    pub fn build(&self) -> String {
        let mut xml = format!(
            "<domain type='kvm' xmlns:qemu='{}'>\n  <name>{}</name>\n",
            QEMU_NAMESPACE,
            escape(self.domain.name.as_str())
        );

        if let Some(uuid) = &self.domain.uuid {
            xml.push_str(&format!("  <uuid>{}</uuid>\n", escape(uuid.as_str())));
        }

        xml.push_str("  <devices>\n");
        for iface in &self.domain.interfaces {
            xml.push_str(&indent(&build_interface(iface), "    "));
        }
        xml.push_str("  </devices>\n");

        xml.push_str(&self.build_qemu_commandline());
        xml.push_str("</domain>\n");
        xml
    }

    fn build_qemu_commandline(&self) -> String {
        let cmd = match &self.domain.qemu_cmd {
            Some(cmd) if !cmd.args.is_empty() => cmd,
            _ => return String::new(),
        };

        let mut xml = String::from("  <qemu:commandline>\n");
        for arg in &cmd.args {
            xml.push_str(&format!("    <qemu:arg value='{}'/>\n", escape(arg.value.as_str())));
        }
        xml.push_str("  </qemu:commandline>\n");
        xml
    }
}

/// Render a single `<interface>` element, unindented.
pub fn build_interface(iface: &DomainInterface) -> String {
    let mut xml = format!("<interface type='{}'>\n", iface.interface_type.as_str());

    if let Some(source) = &iface.source {
        xml.push_str(&format!(
            "  <source type='{}' path='{}' mode='{}'/>\n",
            escape(source.source_type.as_str()),
            escape(source.path.as_str()),
            escape(source.mode.as_str())
        ));
    }

    if let Some(target) = &iface.target {
        xml.push_str(&format!("  <target dev='{}'/>\n", escape(target.device.as_str())));
    }

    xml.push_str(&format!("  <model type='{}'/>\n", escape(iface.model_type.as_str())));

    if let Some(driver) = &iface.driver {
        let mut attrs = String::new();
        if let Some(name) = &driver.name {
            attrs.push_str(&format!(" name='{}'", escape(name.as_str())));
        }
        if let Some(queues) = driver.queues {
            attrs.push_str(&format!(" queues='{}'", queues));
        }
        if let Some(rx) = driver.rx_queue_size {
            attrs.push_str(&format!(" rx_queue_size='{}'", rx));
        }
        if let Some(tx) = driver.tx_queue_size {
            attrs.push_str(&format!(" tx_queue_size='{}'", tx));
        }
        xml.push_str(&format!("  <driver{}/>\n", attrs));
    }

    xml.push_str(&format!(
        "  <alias name='{}{}'/>\n",
        USER_ALIAS_PREFIX,
        escape(iface.alias.as_str())
    ));

    if let Some(addr) = &iface.address {
        xml.push_str(&format!(
            "  <address type='pci' domain='{}' bus='{}' slot='{}' function='{}'/>\n",
            addr.domain, addr.bus, addr.slot, addr.function
        ));
    }

    if let Some(order) = iface.boot_order {
        xml.push_str(&format!("  <boot order='{}'/>\n", order));
    }

    if let Some(rom) = &iface.rom {
        xml.push_str(&format!("  <rom enabled='{}'/>\n", rom.enabled_str()));
    }

    xml.push_str("</interface>\n");
    xml
}

fn indent(block: &str, prefix: &str) -> String {
    block
        .lines()
        .map(|line| format!("{}{}\n", prefix, line))
        .collect()
}
