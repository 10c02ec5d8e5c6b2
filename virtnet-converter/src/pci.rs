//! Guest PCI address parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A PCI address could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid PCI address '{0}', expected DDDD:BB:SS.F")]
pub struct PciAddressError(pub String);

/// A libvirt `<address type='pci'>` element, fields already `0x`-prefixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PciAddress {
    pub domain: String,
    pub bus: String,
    pub slot: String,
    pub function: String,
}

impl FromStr for PciAddress {
    type Err = PciAddressError;

    /// Parse `DDDD:BB:SS.F` with hex domain, bus and slot and a function in 0-7.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PciAddressError(s.to_string());

        let mut parts = s.split(':');
        let (domain, bus, rest) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(d), Some(b), Some(r), None) => (d, b, r),
            _ => return Err(invalid()),
        };
        let (slot, function) = rest.split_once('.').ok_or_else(invalid)?;

        let is_hex = |field: &str, len: usize| {
            field.len() == len && field.chars().all(|c| c.is_ascii_hexdigit())
        };
        if !is_hex(domain, 4) || !is_hex(bus, 2) || !is_hex(slot, 2) {
            return Err(invalid());
        }
        if function.len() != 1 || !matches!(function.as_bytes()[0], b'0'..=b'7') {
            return Err(invalid());
        }

        Ok(Self {
            domain: format!("0x{}", domain),
            bus: format!("0x{}", bus),
            slot: format!("0x{}", slot),
            function: format!("0x{}", function),
        })
    }
}

impl fmt::Display for PciAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strip = |v: &str| v.trim_start_matches("0x").to_string();
        write!(
            f,
            "{}:{}:{}.{}",
            strip(&self.domain),
            strip(&self.bus),
            strip(&self.slot),
            strip(&self.function)
        )
    }
}
