//! QEMU user-mode (slirp) networking arguments.
//!
//! A slirp interface becomes a `-netdev user,...` pair on the QEMU command line:
//!
//! ```text
//! user,id=<iface>,net=<cidr>[,dnssearch=<domain>]*[,hostfwd=<proto>::<port>-:<port>]*
//! ```

use std::collections::HashSet;
use std::net::IpAddr;

use crate::config::ConverterConfig;
use crate::domain::QemuArg;
use crate::error::{ConverterError, Result};
use crate::types::{Interface, Network};

/// Builds the value of one `-netdev user` argument.
#[derive(Debug, Clone)]
pub struct SlirpNetdev {
    value: String,
}

impl SlirpNetdev {
    pub fn new(iface_name: &str) -> Self {
        Self {
            value: format!("user,id={}", iface_name),
        }
    }

    /// Add the guest network, validating an explicit CIDR.
    pub fn with_vm_cidr(mut self, network: &Network, config: &ConverterConfig) -> Result<Self> {
        let explicit = network
            .pod
            .as_ref()
            .and_then(|pod| pod.vm_network_cidr.as_deref())
            .filter(|cidr| !cidr.is_empty());

        let cidr = match explicit {
            Some(cidr) => {
                if !is_valid_cidr(cidr) {
                    return Err(ConverterError::Configuration(format!(
                        "failed parsing CIDR {}",
                        cidr
                    )));
                }
                cidr
            }
            None => config.default_vm_cidr.as_str(),
        };

        self.value.push_str(&format!(",net={}", cidr));
        Ok(self)
    }

    /// Add one `dnssearch` clause per domain.
    pub fn with_dns_search(mut self, domains: &[String]) -> Self {
        for domain in domains {
            self.value.push_str(&format!(",dnssearch={}", domain));
        }
        self
    }

    /// Add `hostfwd` clauses, once per (protocol, port).
    ///
    /// QEMU refuses to start with the same forward listed twice.
    pub fn with_port_forwards(mut self, iface: &Interface, config: &ConverterConfig) -> Result<Self> {
        let mut configured: HashSet<(String, u16)> = HashSet::new();

        for port in &iface.ports {
            if port.port == 0 {
                return Err(ConverterError::Configuration(format!(
                    "port must be configured on interface {}",
                    iface.name
                )));
            }

            let protocol = if port.protocol.is_empty() {
                config.default_port_protocol.as_str()
            } else {
                port.protocol.as_str()
            };

            if configured.insert((protocol.to_uppercase(), port.port)) {
                self.value.push_str(&format!(
                    ",hostfwd={}::{}-:{}",
                    protocol.to_lowercase(),
                    port.port,
                    port.port
                ));
            }
        }
        Ok(self)
    }

    /// The `-netdev <value>` argument pair.
    pub fn into_args(self) -> Vec<QemuArg> {
        vec![QemuArg::new("-netdev"), QemuArg::new(self.value)]
    }
}

/// Build the QEMU arguments for a slirp interface.
pub fn create_slirp_network(
    iface: &Interface,
    network: &Network,
    search_domains: &[String],
    config: &ConverterConfig,
) -> Result<Vec<QemuArg>> {
    let netdev = SlirpNetdev::new(&iface.name)
        .with_vm_cidr(network, config)?
        .with_dns_search(search_domains)
        .with_port_forwards(iface, config)?;
    Ok(netdev.into_args())
}

/// `<ip>/<prefix>` with a prefix that fits the address family.
fn is_valid_cidr(cidr: &str) -> bool {
    let Some((addr, prefix)) = cidr.split_once('/') else {
        return false;
    };
    let Ok(addr) = addr.parse::<IpAddr>() else {
        return false;
    };
    if prefix.is_empty() || prefix.len() > 3 || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let Ok(prefix) = prefix.parse::<u8>() else {
        return false;
    };
    match addr {
        IpAddr::V4(_) => prefix <= 32,
        IpAddr::V6(_) => prefix <= 128,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InterfaceBinding, Port};

    fn slirp_iface() -> Interface {
        Interface::new("default", InterfaceBinding::Slirp {})
    }

    #[test]
    fn test_default_cidr() {
        let args = create_slirp_network(&slirp_iface(), &Network::pod("default"), &[], &ConverterConfig::default()).unwrap();
        assert_eq!(args.len(), 2);
        assert_eq!(args[0].value, "-netdev");
        assert_eq!(args[1].value, "user,id=default,net=10.0.2.0/24");
    }

    #[test]
    fn test_explicit_cidr() {
        let net = Network::pod("default").with_vm_cidr("192.168.100.0/24");
        let args = create_slirp_network(&slirp_iface(), &net, &[], &ConverterConfig::default()).unwrap();
        assert_eq!(args[1].value, "user,id=default,net=192.168.100.0/24");
    }

    #[test]
    fn test_invalid_cidr() {
        let net = Network::pod("default").with_vm_cidr("192.168.100.0/33");
        let err = create_slirp_network(&slirp_iface(), &net, &[], &ConverterConfig::default()).unwrap_err();
        assert!(matches!(err, ConverterError::Configuration(_)));
        assert!(err.to_string().contains("failed parsing CIDR 192.168.100.0/33"));
    }

    #[test]
    fn test_dns_search_and_ports() {
        let iface = slirp_iface()
            .with_port(Port::new(80))
            .with_port(Port::with_protocol(80, "TCP"))
            .with_port(Port::with_protocol(53, "UDP"))
            .with_port(Port::with_protocol(80, "UDP"));
        let domains = vec!["default.svc.cluster.local".to_string(), "cluster.local".to_string()];

        let args = create_slirp_network(&iface, &Network::pod("default"), &domains, &ConverterConfig::default()).unwrap();

        assert_eq!(
            args[1].value,
            "user,id=default,net=10.0.2.0/24,dnssearch=default.svc.cluster.local,dnssearch=cluster.local,\
             hostfwd=tcp::80-:80,hostfwd=udp::53-:53,hostfwd=udp::80-:80"
        );
    }

    #[test]
    fn test_duplicate_ports_emitted_once() {
        let iface = slirp_iface()
            .with_port(Port::with_protocol(80, ""))
            .with_port(Port::with_protocol(80, "TCP"));
        let args = create_slirp_network(&iface, &Network::pod("default"), &[], &ConverterConfig::default()).unwrap();
        assert_eq!(args[1].value.matches("hostfwd=tcp::80-:80").count(), 1);
    }

    #[test]
    fn test_port_zero_rejected() {
        let iface = slirp_iface().with_port(Port::new(0));
        let err = create_slirp_network(&iface, &Network::pod("default"), &[], &ConverterConfig::default()).unwrap_err();
        assert!(matches!(err, ConverterError::Configuration(_)));
    }

    #[test]
    fn test_cidr_validation() {
        assert!(is_valid_cidr("10.0.2.0/24"));
        assert!(is_valid_cidr("fd10:0:2::/120"));
        assert!(!is_valid_cidr("10.0.2.0"));
        assert!(!is_valid_cidr("10.0.2/24"));
        assert!(!is_valid_cidr("fd10::/129"));
        assert!(!is_valid_cidr("10.0.2.0/+24"));
        assert!(!is_valid_cidr("10.0.2.0/"));
        assert!(!is_valid_cidr("10.0.2.0/0024"));
    }

    #[test]
    fn test_signed_prefix_rejected() {
        let network = Network::pod("default").with_vm_cidr("10.0.2.0/+24");
        let err = create_slirp_network(&slirp_iface(), &network, &[], &ConverterConfig::default()).unwrap_err();
        assert!(matches!(err, ConverterError::Configuration(_)));
    }
}
