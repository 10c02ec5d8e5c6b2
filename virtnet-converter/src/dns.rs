//! Resolver configuration (`/etc/resolv.conf`) lookup.
//!
//! User-mode networking copies the pod's DNS search domains into the guest.
//! Nameservers are parsed too, for callers that hand them to a DHCP server.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use tracing::{debug, instrument};

use crate::error::Result;

/// Nameserver used when the resolver configuration lists none.
pub const DEFAULT_NAMESERVER: IpAddr = IpAddr::V4(Ipv4Addr::new(8, 8, 8, 8));

/// Parsed resolver configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvConf {
    pub nameservers: Vec<IpAddr>,
    pub search_domains: Vec<String>,
}

impl ResolvConf {
    /// Parse resolv.conf content.
    ///
    /// Unparseable nameserver addresses are skipped. Every `search` line
    /// contributes its domains, in file order.
    pub fn parse(content: &str) -> Self {
        let mut nameservers = Vec::new();
        let mut search_domains = Vec::new();

        for line in content.lines() {
            let mut fields = line.split_whitespace();
            match fields.next() {
                Some("nameserver") => {
                    if let Some(ip) = fields.next().and_then(|f| f.parse::<IpAddr>().ok()) {
                        nameservers.push(ip);
                    }
                }
                Some("search") => {
                    search_domains.extend(fields.map(str::to_string));
                }
                _ => {}
            }
        }

        if nameservers.is_empty() {
            nameservers.push(DEFAULT_NAMESERVER);
        }

        Self {
            nameservers,
            search_domains,
        }
    }
}

/// Source of the pod's resolver configuration.
pub trait ResolvConfSource {
    /// Read and parse the resolver configuration.
    fn resolv_conf(&self) -> Result<ResolvConf>;
}

/// Reads resolver configuration from a file on every call.
#[derive(Debug, Clone)]
pub struct FileResolvConf {
    path: PathBuf,
}

impl FileResolvConf {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResolvConfSource for FileResolvConf {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn resolv_conf(&self) -> Result<ResolvConf> {
        let content = std::fs::read_to_string(&self.path)?;
        let conf = ResolvConf::parse(&content);

        debug!(nameservers = ?conf.nameservers, "Found nameservers");
        debug!(search_domains = ?conf.search_domains, "Found search domains");

        Ok(conf)
    }
}

/// Fixed resolver configuration.
impl ResolvConfSource for ResolvConf {
    fn resolv_conf(&self) -> Result<ResolvConf> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const POD_RESOLV_CONF: &str = "search default.svc.cluster.local svc.cluster.local cluster.local\n\
                                   nameserver 10.96.0.10\n\
                                   options ndots:5\n";

    #[test]
    fn test_parse_pod_resolv_conf() {
        let conf = ResolvConf::parse(POD_RESOLV_CONF);
        assert_eq!(conf.nameservers, vec!["10.96.0.10".parse::<IpAddr>().unwrap()]);
        assert_eq!(
            conf.search_domains,
            vec!["default.svc.cluster.local", "svc.cluster.local", "cluster.local"]
        );
    }

    #[test]
    fn test_parse_defaults_nameserver() {
        let conf = ResolvConf::parse("nameserver not-an-ip\n# comment\n");
        assert_eq!(conf.nameservers, vec![DEFAULT_NAMESERVER]);
        assert!(conf.search_domains.is_empty());
    }

    #[test]
    fn test_parse_multiple_search_lines() {
        let conf = ResolvConf::parse("search a.example\nnameserver ::1\nsearch b.example c.example\n");
        assert_eq!(conf.search_domains, vec!["a.example", "b.example", "c.example"]);
        assert_eq!(conf.nameservers.len(), 1);
    }

    #[test]
    fn test_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(POD_RESOLV_CONF.as_bytes()).unwrap();

        let conf = FileResolvConf::new(file.path()).resolv_conf().unwrap();
        assert_eq!(conf.search_domains.len(), 3);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileResolvConf::new(dir.path().join("resolv.conf"))
            .resolv_conf()
            .unwrap_err();
        assert!(matches!(err, crate::error::ConverterError::Io(_)));
    }
}
