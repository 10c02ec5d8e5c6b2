//! # virtnet Converter
//!
//! Turns the interfaces and networks of a VirtualMachineInstance into the
//! pieces of a libvirt domain that connect the guest to the network.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │       VMI spec (interfaces + networks)       │
//! └──────────────────────┬───────────────────────┘
//!                        ▼
//!          validate network types, index by name
//!                        │
//!                        ▼  per interface, in order
//! ┌──────────────────────────────────────────────┐
//! │             binding dispatcher               │
//! │ bridge/masquerade │ macvtap │ slirp │ vhost- │
//! │                   │         │       │ user   │
//! └─────────┬──────────────────────┬─────────────┘
//!           ▼                      ▼
//!   domain <interface>s     -netdev QEMU args
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use virtnet_converter::{
//!     create_domain_interfaces, ConverterConfig, ConverterContext, Interface,
//!     InterfaceBinding, Network, ResolvConf, VirtualMachineInstance,
//! };
//!
//! let vmi = VirtualMachineInstance::new("testvmi")
//!     .with_network(Network::pod("default"))
//!     .with_interface(Interface::new("default", InterfaceBinding::Masquerade {}));
//!
//! let config = ConverterConfig::default();
//! let resolv = ResolvConf::default();
//! let ctx = ConverterContext::new(&config, &resolv);
//!
//! let conversion = create_domain_interfaces(&vmi, &ctx).unwrap();
//! assert_eq!(conversion.interfaces[0].model_type, "virtio");
//! ```

pub mod config;
pub mod dns;
pub mod domain;
pub mod error;
pub mod network;
pub mod pci;
pub mod types;
pub mod vcpu;
pub mod xml;

pub use config::ConverterConfig;
pub use dns::{FileResolvConf, ResolvConf, ResolvConfSource};
pub use domain::*;
pub use error::{ConverterError, Result};
pub use network::{
    create_domain_interfaces, ConversionWarning, ConverterContext, NetworkConversion, PodNetInterfaces,
};
pub use pci::PciAddress;
pub use types::*;
pub use xml::{build_interface, DomainXmlBuilder};
