use std::fmt;

use serde::Serialize;

use crate::topology_ast::*;

/// An SVI with its display name (`vlan10` → `VLAN10`).
#[derive(Debug, Clone, PartialEq)]
pub struct SviView<'a> {
    pub name: String,
    pub config: &'a Properties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VrrpInterface {
    pub interface: String,
    pub group: Option<String>,
    pub priority: Option<String>,
    pub virtual_ip: Option<String>,
}

impl VrrpInterface {
    fn from_config(interface: String, config: &Properties) -> Option<Self> {
        if !has_value(config, "vrrp_group") && !has_value(config, "vrrp_priority") {
            return None;
        }
        Some(VrrpInterface {
            interface,
            group: config.get("vrrp_group").cloned(),
            priority: config.get("vrrp_priority").cloned(),
            virtual_ip: config.get("vrrp_virtual_ip").cloned(),
        })
    }
}

/// Present and non-empty; `key: ""` counts as unset.
fn has_value(config: &Properties, key: &str) -> bool {
    config.get(key).is_some_and(|v| !v.is_empty())
}

impl Topology {
    pub fn node(&self, id: &str) -> Option<&DeviceNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn interface(&self, key: &str) -> Option<&InterfaceRecord> {
        self.interfaces.get(key)
    }

    /// Interface record behind one end of a link.
    ///
    /// Tries the endpoint text as written, then `device.interface`.
    pub fn endpoint_interface(&self, link: &Connection, end: LinkEnd) -> Option<&InterfaceRecord> {
        let (key, device, interface) = match end {
            LinkEnd::Source => (
                &link.source_interface_key,
                &link.source,
                &link.source_interface,
            ),
            LinkEnd::Target => (
                &link.target_interface_key,
                &link.target,
                &link.target_interface,
            ),
        };
        self.interfaces
            .get(key)
            .or_else(|| self.interfaces.get(&interface_key(device, interface)))
    }

    pub fn device_interfaces<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a InterfaceRecord> {
        self.interfaces.values().filter(move |rec| rec.device == id)
    }

    pub fn layer3_interfaces<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a InterfaceRecord> {
        self.device_interfaces(id)
            .filter(|rec| has_value(&rec.config, "ip_address"))
    }

    pub fn device_svis(&self, id: &str) -> Vec<SviView<'_>> {
        self.node(id)
            .and_then(|node| node.svis.as_ref())
            .map(|svis| {
                svis.iter()
                    .map(|(name, config)| SviView {
                        name: name.to_uppercase(),
                        config,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// SVIs first, then physical interfaces.
    pub fn vrrp_interfaces(&self, id: &str) -> Vec<VrrpInterface> {
        let svis = self
            .device_svis(id)
            .into_iter()
            .filter_map(|svi| VrrpInterface::from_config(svi.name, svi.config));
        let physical = self
            .device_interfaces(id)
            .filter_map(|rec| VrrpInterface::from_config(rec.interface.clone(), &rec.config));
        svis.chain(physical).collect()
    }

    pub fn links_for<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Connection> {
        self.links
            .iter()
            .filter(move |link| link.source == id || link.target == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InterfaceMode {
    PortChannel,
    Member,
    Routed,
    Trunk,
    Access,
}

impl InterfaceMode {
    pub fn from_config(config: &Properties) -> Option<Self> {
        let get = |key: &str| config.get(key).map(String::as_str).filter(|v| !v.is_empty());
        let switchport = get("switchport_mode");

        if get("protocol") == Some("LACP") || has_value(config, "members") || get("port_channel") == Some("true") {
            return Some(InterfaceMode::PortChannel);
        }
        if has_value(config, "channel_group") {
            return Some(InterfaceMode::Member);
        }
        if switchport == Some("routed") {
            return Some(InterfaceMode::Routed);
        }
        if has_value(config, "ip_address") && switchport.is_none() {
            return Some(InterfaceMode::Routed);
        }
        match switchport {
            Some("trunk") => Some(InterfaceMode::Trunk),
            Some("access") => Some(InterfaceMode::Access),
            _ => None,
        }
    }

    pub fn indicator(self) -> &'static str {
        match self {
            InterfaceMode::PortChannel => "PC",
            InterfaceMode::Member => "M",
            InterfaceMode::Routed => "R",
            InterfaceMode::Trunk => "T",
            InterfaceMode::Access => "A",
        }
    }
}

impl fmt::Display for InterfaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.indicator())
    }
}

const ABBREVIATIONS: [(&str, &str); 10] = [
    ("GigabitEthernet", "Gi"),
    ("TenGigabitEthernet", "Te"),
    ("FastEthernet", "Fa"),
    ("Ethernet", "E"),
    ("Serial", "S"),
    ("Loopback", "Lo"),
    ("Vlan", "Vl"),
    ("Port-channel", "Po"),
    ("Tunnel", "Tu"),
    ("lag ", "LAG"),
];

/// Cisco/Aruba short form: `GigabitEthernet1/0/1` → `Gi1/0/1`.
pub fn abbreviate_interface_name(name: &str) -> String {
    ABBREVIATIONS
        .iter()
        .find_map(|(full, short)| name.strip_prefix(full).map(|tail| format!("{short}{tail}")))
        .unwrap_or_else(|| name.to_string())
}

pub fn subnet_mask_to_cidr(mask: &str) -> String {
    let bits = match mask {
        "255.255.255.255" => 32,
        "255.255.255.254" => 31,
        "255.255.255.252" => 30,
        "255.255.255.248" => 29,
        "255.255.255.240" => 28,
        "255.255.255.224" => 27,
        "255.255.255.192" => 26,
        "255.255.255.128" => 25,
        "255.255.255.0" => 24,
        "255.255.254.0" => 23,
        "255.255.252.0" => 22,
        "255.255.248.0" => 21,
        "255.255.240.0" => 20,
        "255.255.224.0" => 19,
        "255.255.192.0" => 18,
        "255.255.128.0" => 17,
        "255.255.0.0" => 16,
        "255.254.0.0" => 15,
        "255.252.0.0" => 14,
        "255.248.0.0" => 13,
        "255.240.0.0" => 12,
        "255.224.0.0" => 11,
        "255.192.0.0" => 10,
        "255.128.0.0" => 9,
        "255.0.0.0" => 8,
        other => return other.to_string(),
    };
    bits.to_string()
}

/// Number of non-empty entries in a comma-separated route list.
pub fn static_routes_count(routes: &str) -> usize {
    routes.split(',').filter(|r| !r.trim().is_empty()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(pairs: &[(&str, &str)]) -> Properties {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn abbreviate_known_prefixes() {
        assert_eq!(abbreviate_interface_name("GigabitEthernet1/0/1"), "Gi1/0/1");
        assert_eq!(abbreviate_interface_name("Port-channel10"), "Po10");
        assert_eq!(abbreviate_interface_name("lag 1"), "LAG1");
    }

    #[test]
    fn abbreviate_checks_prefixes_in_order() {
        // GigabitEthernet is checked first but is not a prefix here.
        assert_eq!(abbreviate_interface_name("TenGigabitEthernet1/1"), "Te1/1");
    }

    #[test]
    fn abbreviate_leaves_unknown_names() {
        assert_eq!(abbreviate_interface_name("eth0/1"), "eth0/1");
        assert_eq!(abbreviate_interface_name(""), "");
    }

    #[test]
    fn mode_port_channel_takes_priority() {
        let c = config(&[("protocol", "LACP"), ("switchport_mode", "trunk")]);
        assert_eq!(InterfaceMode::from_config(&c), Some(InterfaceMode::PortChannel));
        let c = config(&[("port_channel", "true")]);
        assert_eq!(InterfaceMode::from_config(&c), Some(InterfaceMode::PortChannel));
    }

    #[test]
    fn mode_member_before_switchport() {
        let c = config(&[("channel_group", "1"), ("switchport_mode", "access")]);
        assert_eq!(InterfaceMode::from_config(&c), Some(InterfaceMode::Member));
    }

    #[test]
    fn mode_routed_from_ip_without_switchport() {
        let c = config(&[("ip_address", "10.0.0.1")]);
        assert_eq!(InterfaceMode::from_config(&c), Some(InterfaceMode::Routed));
        let c = config(&[("ip_address", "10.0.0.1"), ("switchport_mode", "trunk")]);
        assert_eq!(InterfaceMode::from_config(&c), Some(InterfaceMode::Trunk));
    }

    #[test]
    fn mode_none_for_bare_config() {
        let c = config(&[("status", "up")]);
        assert_eq!(InterfaceMode::from_config(&c), None);
    }

    #[test]
    fn empty_values_count_as_unset() {
        let c = config(&[("members", ""), ("channel_group", "")]);
        assert_eq!(InterfaceMode::from_config(&c), None);
        let c = config(&[("ip_address", ""), ("switchport_mode", "")]);
        assert_eq!(InterfaceMode::from_config(&c), None);
        let c = config(&[("members", ""), ("switchport_mode", "access")]);
        assert_eq!(InterfaceMode::from_config(&c), Some(InterfaceMode::Access));
    }

    #[test]
    fn empty_ip_and_vrrp_fields_are_ignored() {
        let mut topo = Topology::default();
        for (name, pairs) in [
            ("Gi0/0", vec![("ip_address", ""), ("vrrp_group", "")]),
            ("Gi0/1", vec![("ip_address", "10.0.0.1"), ("vrrp_priority", "110")]),
        ] {
            topo.interfaces.insert(
                interface_key("r1", name),
                InterfaceRecord {
                    device: "r1".into(),
                    interface: name.into(),
                    config: config(&pairs),
                },
            );
        }
        let l3: Vec<&str> = topo.layer3_interfaces("r1").map(|r| r.interface.as_str()).collect();
        assert_eq!(l3, vec!["Gi0/1"]);
        let vrrp = topo.vrrp_interfaces("r1");
        assert_eq!(vrrp.len(), 1);
        assert_eq!(vrrp[0].interface, "Gi0/1");
    }

    #[test]
    fn cidr_lookup() {
        assert_eq!(subnet_mask_to_cidr("255.255.255.0"), "24");
        assert_eq!(subnet_mask_to_cidr("255.255.255.3"), "255.255.255.3");
    }

    #[test]
    fn count_static_routes() {
        assert_eq!(static_routes_count("10.0.0.0/8 via 1.1.1.1, ,0.0.0.0/0 via 2.2.2.2"), 2);
        assert_eq!(static_routes_count(""), 0);
    }

    #[test]
    fn endpoint_lookup_falls_back_to_device_and_interface() {
        let mut topo = Topology::default();
        topo.interfaces.insert(
            "sw1.eth0/1".into(),
            InterfaceRecord {
                device: "sw1".into(),
                interface: "eth0/1".into(),
                config: Properties::new(),
            },
        );
        let link = Connection {
            source: "sw1".into(),
            target: "sw2".into(),
            source_interface: "eth0/1".into(),
            target_interface: "eth0/2".into(),
            source_interface_key: "sw1 .eth0/1".into(),
            target_interface_key: "sw2.eth0/2".into(),
        };
        let found = topo.endpoint_interface(&link, LinkEnd::Source).unwrap();
        assert_eq!(found.key(), "sw1.eth0/1");
        assert!(topo.endpoint_interface(&link, LinkEnd::Target).is_none());
    }
}
