use std::collections::BTreeMap;

use serde::Serialize;

/// Free-form `key: value` configuration captured verbatim from the source.
pub type Properties = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Topology {
    pub nodes: Vec<DeviceNode>,
    pub links: Vec<Connection>,
    /// Keyed by `device.interface`.
    pub interfaces: BTreeMap<String, InterfaceRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub properties: Properties,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svis: Option<BTreeMap<String, Properties>>,
}

impl DeviceNode {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            device_type: UNKNOWN_TYPE.to_string(),
            properties: Properties::new(),
            svis: None,
        }
    }
}

pub const UNKNOWN_TYPE: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceRecord {
    pub device: String,
    pub interface: String,
    pub config: Properties,
}

impl InterfaceRecord {
    pub fn key(&self) -> String {
        interface_key(&self.device, &self.interface)
    }
}

pub fn interface_key(device: &str, interface: &str) -> String {
    format!("{device}.{interface}")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source: String,
    pub target: String,
    pub source_interface: String,
    pub target_interface: String,
    /// Endpoint text exactly as written, e.g. `sw1.Gi1/0/1`.
    pub source_interface_key: String,
    pub target_interface_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEnd {
    Source,
    Target,
}
