use std::collections::{BTreeMap, HashMap};

use tracing::{debug, trace};
use winnow::prelude::*;
use winnow::ascii::space0;
use winnow::combinator::{alt, delimited, opt, preceded};
use winnow::token::{rest, take_till, take_while};

use crate::topology_ast::*;

/// Substrings (lower-case) that mark a nested block as a physical or logical interface.
const INTERFACE_HINTS: [&str; 4] = ["port", "ethernet", "channel", "gigabit"];

/// Builds the device graph from topology text.
///
/// Never fails: lines that match no recognized shape are skipped.
pub fn parse_topology(input: &str) -> Topology {
    let mut builder = TopologyBuilder::default();
    for line in content_lines(input) {
        builder.state.depth += brace_delta(line);
        if let Some(parsed) = classify(line, &builder.state) {
            builder.collect_line(parsed);
        }
        builder.state.settle_scope();
    }
    builder.finish()
}

/// Trimmed lines with blanks and full-line `#` comments removed.
pub(crate) fn content_lines(input: &str) -> impl Iterator<Item = &str> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
}

fn brace_delta(line: &str) -> i64 {
    line.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

#[derive(Debug, Clone, Default, PartialEq)]
enum Scope {
    #[default]
    TopLevel,
    Device { device: String },
    Interface { device: String, interface: String },
    Svi { device: String, svi: String },
}

impl Scope {
    fn device(&self) -> Option<&str> {
        match self {
            Scope::TopLevel => None,
            Scope::Device { device }
            | Scope::Interface { device, .. }
            | Scope::Svi { device, .. } => Some(device),
        }
    }
}

#[derive(Debug, Default)]
struct ScanState {
    depth: i64,
    scope: Scope,
}

impl ScanState {
    /// Depth 0 leaves every block; depth 1 leaves interface and SVI blocks only.
    fn settle_scope(&mut self) {
        match self.depth {
            0 => self.scope = Scope::TopLevel,
            1 => {
                self.scope = match std::mem::take(&mut self.scope) {
                    Scope::Interface { device, .. } | Scope::Svi { device, .. } => {
                        Scope::Device { device }
                    }
                    other => other,
                }
            }
            _ => {}
        }
    }

    fn enclosing_device(&self) -> Option<&str> {
        self.scope.device().filter(|d| !d.is_empty())
    }
}

#[derive(Debug, PartialEq)]
struct Property<'s> {
    key: &'s str,
    /// Text after the first colon, untouched.
    raw: &'s str,
    /// Trimmed, with every `"` removed.
    value: String,
}

#[derive(Debug, PartialEq)]
enum TopologyLine<'s> {
    DeviceStart(&'s str),
    InterfaceStart(&'s str),
    SviStart(&'s str),
    DeviceProperty(Property<'s>),
    InterfaceProperty(Property<'s>),
    SviProperty(Property<'s>),
    Connection(Connection),
}

fn classify<'s>(line: &'s str, state: &ScanState) -> Option<TopologyLine<'s>> {
    let opens_block = line.contains(": {");
    let has_colon = line.contains(':');
    let has_brace = line.contains('{');

    if opens_block && state.depth == 1 && !line.contains("->") && !line.contains('/') {
        return block_header(line).map(TopologyLine::DeviceStart);
    }
    if opens_block && state.depth == 2 && state.enclosing_device().is_some() {
        if let Some(name) = block_header(line) {
            if is_interface_name(name) {
                return Some(TopologyLine::InterfaceStart(name));
            }
            if name.to_lowercase().starts_with("vlan") {
                return Some(TopologyLine::SviStart(name));
            }
        }
    }
    if has_colon && !has_brace {
        match state.scope {
            Scope::Device { .. } if state.depth >= 1 => {
                return property(line).map(TopologyLine::DeviceProperty);
            }
            Scope::Interface { .. } if state.depth >= 2 => {
                return property(line).map(TopologyLine::InterfaceProperty);
            }
            Scope::Svi { .. } if state.depth >= 2 => {
                return property(line).map(TopologyLine::SviProperty);
            }
            _ => {}
        }
    }
    if line.contains("->") && !has_brace && !has_colon {
        return connection(line).map(TopologyLine::Connection);
    }
    None
}

fn is_interface_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    name.contains('/') || INTERFACE_HINTS.iter().any(|hint| lower.contains(hint))
}

fn block_header(line: &str) -> Option<&str> {
    let mut input = line;
    block_id(&mut input).ok()
}

fn block_id<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    let id = take_till(0.., ':').parse_next(input)?;
    ':'.parse_next(input)?;
    Ok(id.trim())
}

fn property(line: &str) -> Option<Property<'_>> {
    let mut input = line;
    let (key, raw) = key_value(&mut input).ok()?;
    Some(Property {
        key,
        raw,
        value: clean_value(raw),
    })
}

/// Splits on the first colon only; later colons stay in the value.
fn key_value<'s>(input: &mut &'s str) -> winnow::Result<(&'s str, &'s str)> {
    let key = take_till(0.., ':').parse_next(input)?;
    ':'.parse_next(input)?;
    let value = rest.parse_next(input)?;
    Ok((key.trim(), value))
}

pub(crate) fn clean_value(raw: &str) -> String {
    raw.trim().replace('"', "")
}

/// `"quoted text"` or a leading bareword.
pub(crate) fn type_value<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    space0.parse_next(input)?;
    alt((
        delimited('"', take_till(1.., '"'), '"'),
        take_while(1.., |c: char| c.is_alphanumeric() || c == '_'),
    ))
    .parse_next(input)
}

fn endpoint<'s>(input: &mut &'s str) -> winnow::Result<(&'s str, &'s str)> {
    let device = take_till(0.., '.').parse_next(input)?;
    let interface = opt(preceded('.', rest)).parse_next(input)?;
    Ok((device, interface.unwrap_or_default()))
}

fn connection(line: &str) -> Option<Connection> {
    let mut sides = line.split("->").map(str::trim);
    let source = sides.next()?;
    let target = sides.next()?;
    if source.is_empty() || target.is_empty() {
        return None;
    }

    let mut input = source;
    let (source_device, source_interface) = endpoint(&mut input).ok()?;
    let mut input = target;
    let (target_device, target_interface) = endpoint(&mut input).ok()?;
    if source_device.is_empty() || target_device.is_empty() {
        return None;
    }

    Some(Connection {
        source: source_device.to_string(),
        target: target_device.to_string(),
        source_interface: source_interface.to_string(),
        target_interface: target_interface.to_string(),
        source_interface_key: source.to_string(),
        target_interface_key: target.to_string(),
    })
}

#[derive(Debug, Default)]
struct TopologyBuilder {
    state: ScanState,
    nodes: Vec<DeviceNode>,
    node_index: HashMap<String, usize>,
    links: Vec<Connection>,
    interfaces: BTreeMap<String, InterfaceRecord>,
}

impl TopologyBuilder {
    fn node_mut(&mut self, id: &str) -> Option<&mut DeviceNode> {
        let idx = *self.node_index.get(id)?;
        self.nodes.get_mut(idx)
    }

    fn collect_line(&mut self, line: TopologyLine<'_>) {
        match line {
            TopologyLine::DeviceStart(id) => {
                debug!(device = id, "found device definition");
                self.state.scope = Scope::Device {
                    device: id.to_string(),
                };
            }
            TopologyLine::InterfaceStart(name) => {
                let device = self.state.enclosing_device().unwrap_or_default().to_string();
                let key = interface_key(&device, name);
                debug!(interface = %key, "found interface definition");
                self.interfaces
                    .entry(key)
                    .or_insert_with(|| InterfaceRecord {
                        device: device.clone(),
                        interface: name.to_string(),
                        config: Properties::new(),
                    });
                self.state.scope = Scope::Interface {
                    device,
                    interface: name.to_string(),
                };
            }
            TopologyLine::SviStart(name) => {
                let device = self.state.enclosing_device().unwrap_or_default().to_string();
                match self.node_mut(&device) {
                    Some(node) => {
                        debug!(device = %device, svi = name, "found SVI definition");
                        node.svis
                            .get_or_insert_with(BTreeMap::new)
                            .insert(name.to_string(), Properties::new());
                    }
                    None => debug!(device = %device, svi = name, "SVI before device label, ignored"),
                }
                self.state.scope = Scope::Svi {
                    device,
                    svi: name.to_string(),
                };
            }
            TopologyLine::DeviceProperty(prop) => self.set_device_property(prop),
            TopologyLine::InterfaceProperty(prop) => {
                let Scope::Interface { device, interface } = &self.state.scope else {
                    return;
                };
                let key = interface_key(device, interface);
                if let Some(record) = self.interfaces.get_mut(&key) {
                    trace!(interface = %key, key = prop.key, value = %prop.value, "interface config");
                    record.config.insert(prop.key.to_string(), prop.value);
                }
            }
            TopologyLine::SviProperty(prop) => {
                let Scope::Svi { device, svi } = &self.state.scope else {
                    return;
                };
                let (device, svi) = (device.clone(), svi.clone());
                if let Some(node) = self.node_mut(&device) {
                    trace!(device = %device, svi = %svi, key = prop.key, value = %prop.value, "SVI config");
                    node.svis
                        .get_or_insert_with(BTreeMap::new)
                        .entry(svi)
                        .or_default()
                        .insert(prop.key.to_string(), prop.value);
                }
            }
            TopologyLine::Connection(link) => {
                debug!(
                    source = %link.source_interface_key,
                    target = %link.target_interface_key,
                    "found connection"
                );
                self.links.push(link);
            }
        }
    }

    fn set_device_property(&mut self, prop: Property<'_>) {
        let Some(device) = self.state.enclosing_device().map(str::to_string) else {
            return;
        };
        match prop.key {
            "label" => {
                if self.node_index.contains_key(&device) {
                    return;
                }
                let label = if prop.value.is_empty() {
                    device.as_str()
                } else {
                    prop.value.as_str()
                };
                debug!(device = %device, label, "creating device node");
                self.nodes.push(DeviceNode::new(&device, label));
                self.node_index.insert(device, self.nodes.len() - 1);
            }
            "type" => {
                let mut input = prop.raw;
                let device_type = type_value(&mut input).unwrap_or(UNKNOWN_TYPE).to_string();
                if let Some(node) = self.node_mut(&device) {
                    trace!(device = %node.id, device_type = %device_type, "device type");
                    node.device_type = device_type;
                }
            }
            key => {
                if let Some(node) = self.node_mut(&device) {
                    trace!(device = %node.id, key, value = %prop.value, "device property");
                    node.properties.insert(key.to_string(), prop.value);
                }
            }
        }
    }

    fn finish(self) -> Topology {
        debug!(
            devices = self.nodes.len(),
            connections = self.links.len(),
            interfaces = self.interfaces.len(),
            "parsed topology"
        );
        Topology {
            nodes: self.nodes,
            links: self.links,
            interfaces: self.interfaces,
        }
    }
}
