//! End-to-end tests for the network interface conversion.

use std::io::Write;

use virtnet_converter::{
    create_domain_interfaces, ConversionWarning, ConverterConfig, ConverterContext, ConverterError,
    Domain, DomainXmlBuilder, FileResolvConf, InterfaceType, PodNetInterfaces, ResolvConf,
    VirtualMachineInstance,
};

const VMI_YAML: &str = r#"
metadata:
  name: testvmi
  namespace: default
  uid: 5d307ca9-b3ef-428c-8861-06e72d69f223
spec:
  domain:
    cpu:
      sockets: 1
      cores: 2
      threads: 1
    devices:
      networkInterfaceMultiqueue: true
      interfaces:
        - name: default
          masquerade: {}
          bootOrder: 1
        - name: slirp-net
          slirp: {}
          model: virtio
          ports:
            - port: 80
            - port: 80
              protocol: TCP
            - port: 53
              protocol: UDP
        - name: sriov-net
          sriov: {}
        - name: vhu-net
          vhostuser: {}
        - name: macvtap-net
          macvtap: {}
          model: e1000
          pciAddress: "0000:81:01.0"
  networks:
    - name: default
      pod: {}
    - name: slirp-net
      pod:
        vmNetworkCIDR: 10.11.12.0/24
    - name: sriov-net
      multus:
        networkName: sriov
    - name: vhu-net
      multus:
        networkName: vhu
    - name: macvtap-net
      multus:
        networkName: macvtap
"#;

const NETWORK_STATUS_JSON: &str = r#"[
  {"name": "kindnet", "interface": "eth0", "default": true},
  {"name": "default/sriov", "interface": "net1",
   "device-info": {"type": "pci", "version": "1.0.0", "pci": {"pci-address": "0000:18:02.5"}}},
  {"name": "default/net2", "interface": "net2",
   "device-info": {"type": "vhost-user", "version": "1.0.0",
                   "vhost-user": {"mode": "server", "path": "/var/run/vhu/vhu1.sock"}}}
]"#;

fn resolv_conf_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "search default.svc.cluster.local svc.cluster.local").unwrap();
    writeln!(file, "nameserver 10.96.0.10").unwrap();
    file
}

/// Every non-SR-IOV interface yields one record, in declaration order.
#[test]
fn test_full_vmi_conversion() {
    let vmi: VirtualMachineInstance = serde_yaml::from_str(VMI_YAML).unwrap();
    let pod = PodNetInterfaces::from_network_status_json(NETWORK_STATUS_JSON).unwrap();
    let resolv_file = resolv_conf_file();
    let resolv = FileResolvConf::new(resolv_file.path());
    let config = ConverterConfig::default();
    let ctx = ConverterContext::new(&config, &resolv).with_pod_net_interfaces(&pod);

    let conv = create_domain_interfaces(&vmi, &ctx).unwrap();

    let aliases: Vec<&str> = conv.interfaces.iter().map(|i| i.alias.as_str()).collect();
    assert_eq!(aliases, vec!["default", "slirp-net", "vhu-net", "macvtap-net"]);

    let default = &conv.interfaces[0];
    assert_eq!(default.interface_type, InterfaceType::Ethernet);
    assert_eq!(default.boot_order, Some(1));
    assert_eq!(default.driver.as_ref().and_then(|d| d.queues), Some(2));

    let slirp = &conv.interfaces[1];
    assert_eq!(slirp.interface_type, InterfaceType::User);
    assert_eq!(slirp.model_type, "e1000");

    let vhu = &conv.interfaces[2];
    assert_eq!(vhu.interface_type, InterfaceType::Vhostuser);
    assert_eq!(vhu.target.as_ref().unwrap().device, "vhu1.sock");
    assert_eq!(vhu.source.as_ref().unwrap().path, "/var/run/vhu/vhu1.sock");

    let macvtap = &conv.interfaces[3];
    assert_eq!(macvtap.address.as_ref().unwrap().bus, "0x81");
    assert!(macvtap.driver.is_none());

    let args: Vec<&str> = conv.qemu_args.iter().map(|a| a.value.as_str()).collect();
    assert_eq!(
        args,
        vec![
            "-netdev",
            "user,id=slirp-net,net=10.11.12.0/24,dnssearch=default.svc.cluster.local,\
             dnssearch=svc.cluster.local,hostfwd=tcp::80-:80,hostfwd=udp::53-:53",
        ]
    );

    assert_eq!(conv.warnings.len(), 1);
    assert!(matches!(
        &conv.warnings[0],
        ConversionWarning::ModelDowngraded { interface, .. } if interface == "slirp-net"
    ));
}

#[test]
fn test_rendered_domain_xml() {
    let vmi: VirtualMachineInstance = serde_yaml::from_str(VMI_YAML).unwrap();
    let pod = PodNetInterfaces::from_network_status_json(NETWORK_STATUS_JSON).unwrap();
    let resolv = ResolvConf::parse("search cluster.local\n");
    let config = ConverterConfig::default();
    let ctx = ConverterContext::new(&config, &resolv).with_pod_net_interfaces(&pod);

    let conv = create_domain_interfaces(&vmi, &ctx).unwrap();
    let mut domain = Domain::new("default_testvmi");
    domain.apply_network(conv.interfaces, conv.qemu_args);
    let xml = DomainXmlBuilder::new(&domain).build();

    assert_eq!(xml.matches("<interface ").count(), 4);
    assert!(xml.contains("<alias name='ua-vhu-net'/>"));
    assert!(xml.contains("<qemu:arg value='-netdev'/>"));
    assert!(xml.contains("dnssearch=cluster.local"));
}

/// Missing resolver configuration aborts the whole conversion.
#[test]
fn test_resolv_conf_read_failure_is_fatal() {
    let vmi: VirtualMachineInstance = serde_yaml::from_str(VMI_YAML).unwrap();
    let pod = PodNetInterfaces::from_network_status_json(NETWORK_STATUS_JSON).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let resolv = FileResolvConf::new(dir.path().join("missing"));
    let config = ConverterConfig::default();
    let ctx = ConverterContext::new(&config, &resolv).with_pod_net_interfaces(&pod);

    let err = create_domain_interfaces(&vmi, &ctx).unwrap_err();
    assert!(matches!(err, ConverterError::Io(_)));
    assert!(err.is_retryable());
}

/// A network with both sources fails before any interface is processed.
#[test]
fn test_network_with_two_sources() {
    let yaml = r#"
spec:
  domain:
    devices:
      interfaces:
        - name: net1
          bridge: {}
  networks:
    - name: net1
      pod: {}
      multus:
        networkName: net1
        default: false
"#;
    let vmi: VirtualMachineInstance = serde_yaml::from_str(yaml).unwrap();
    let config = ConverterConfig::default();
    let resolv = ResolvConf::default();

    let err = create_domain_interfaces(&vmi, &ConverterContext::new(&config, &resolv)).unwrap_err();
    assert!(matches!(err, ConverterError::Configuration(_)));
}

#[test]
fn test_bridge_scenario() {
    let yaml = r#"
spec:
  domain:
    devices:
      interfaces:
        - name: eth1
          bridge: {}
  networks:
    - name: eth1
      pod: {}
"#;
    let vmi: VirtualMachineInstance = serde_yaml::from_str(yaml).unwrap();
    let config = ConverterConfig::default();
    let resolv = ResolvConf::default();

    let conv = create_domain_interfaces(&vmi, &ConverterContext::new(&config, &resolv)).unwrap();
    let iface = &conv.interfaces[0];

    assert_eq!(iface.interface_type, InterfaceType::Ethernet);
    assert_eq!(iface.model_type, "virtio");
    assert_eq!(iface.rom.map(|r| r.enabled_str()), Some("no"));
}

/// Vhost-user sockets reported without a directory land in the socket dir.
#[test]
fn test_vhostuser_relative_socket() {
    let yaml = r#"
spec:
  domain:
    devices:
      interfaces:
        - name: dpdk
          vhostuser: {}
  networks:
    - name: dpdk
      multus:
        networkName: dpdk-net
"#;
    let status = r#"[{"name": "net1", "device-info": {"type": "vhost-user",
                      "vhost-user": {"mode": "client", "path": "vhu-dpdk.sock"}}}]"#;
    let vmi: VirtualMachineInstance = serde_yaml::from_str(yaml).unwrap();
    let pod = PodNetInterfaces::from_network_status_json(status).unwrap();
    let config = ConverterConfig::default().with_vhostuser_socket_dir("/run/vhu/");
    let resolv = ResolvConf::default();
    let ctx = ConverterContext::new(&config, &resolv).with_pod_net_interfaces(&pod);

    let conv = create_domain_interfaces(&vmi, &ctx).unwrap();
    let iface = &conv.interfaces[0];

    assert_eq!(iface.source.as_ref().unwrap().path, "/run/vhu/vhu-dpdk.sock");
    assert_eq!(iface.source.as_ref().unwrap().mode, "client");
    assert_eq!(iface.target.as_ref().unwrap().device, "vhu-dpdk.sock");
}
