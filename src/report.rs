use serde::Serialize;

use crate::display_width::{column_widths, pad_right};
use crate::site_metadata::{SiteHierarchy, SiteMetadata};
use crate::site_summary::SiteSummary;
use crate::topology_ast::*;
use crate::topology_query::{InterfaceMode, abbreviate_interface_name};

/// Everything known about one site file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteReport {
    pub metadata: SiteMetadata,
    pub hierarchy: SiteHierarchy,
    pub summary: SiteSummary,
    pub topology: Topology,
}

pub fn render(report: &SiteReport, summary_only: bool) -> String {
    let mut out = String::new();
    render_header(&mut out, report);
    if summary_only {
        return out.trim_end().to_string();
    }

    out.push('\n');
    render_devices(&mut out, &report.topology);
    out.push('\n');
    render_links(&mut out, &report.topology);
    out.trim_end().to_string()
}

fn render_header(out: &mut String, report: &SiteReport) {
    let SiteReport {
        metadata,
        hierarchy,
        summary,
        ..
    } = report;
    let types: Vec<&str> = summary.device_types.iter().map(String::as_str).collect();

    let mut rows = vec![
        field("location", &metadata.location),
        field("site type", &metadata.site_type),
        field("profile", summary.location.as_str()),
        field("path", &hierarchy.breadcrumb),
        field(
            "devices",
            &format!("{} (est. {} APs)", summary.devices_count, summary.aps_count),
        ),
    ];
    if !types.is_empty() {
        rows.push(field("types", &types.join(", ")));
    }
    if let Some(description) = &metadata.description {
        rows.push(field("notes", description));
    }

    out.push_str(&summary.name);
    out.push('\n');
    for line in table_lines(&rows) {
        out.push_str("  ");
        out.push_str(&line);
        out.push('\n');
    }
}

fn field(name: &str, value: &str) -> Vec<String> {
    vec![format!("{name}:"), value.to_string()]
}

fn render_devices(out: &mut String, topology: &Topology) {
    if topology.nodes.is_empty() {
        out.push_str("(no devices)\n");
        return;
    }

    let mut rows = vec![vec![
        "DEVICE".to_string(),
        "LABEL".to_string(),
        "TYPE".to_string(),
        "INTERFACES".to_string(),
        "SVIS".to_string(),
    ]];
    for node in &topology.nodes {
        let svis = node.svis.as_ref().map_or(0, |s| s.len());
        rows.push(vec![
            node.id.clone(),
            node.label.clone(),
            node.device_type.clone(),
            topology.device_interfaces(&node.id).count().to_string(),
            svis.to_string(),
        ]);
    }
    for line in table_lines(&rows) {
        out.push_str(&line);
        out.push('\n');
    }
}

fn render_links(out: &mut String, topology: &Topology) {
    if topology.links.is_empty() {
        out.push_str("(no connections)\n");
        return;
    }

    out.push_str("CONNECTIONS\n");
    let rows: Vec<Vec<String>> = topology
        .links
        .iter()
        .map(|link| {
            vec![
                endpoint_label(topology, link, LinkEnd::Source),
                "---".to_string(),
                endpoint_label(topology, link, LinkEnd::Target),
            ]
        })
        .collect();
    for line in table_lines(&rows) {
        out.push_str(&line);
        out.push('\n');
    }
}

/// `sw1 Gi1/0/1 [T]`; the mode tag appears only for known interfaces.
fn endpoint_label(topology: &Topology, link: &Connection, end: LinkEnd) -> String {
    let (device, interface) = match end {
        LinkEnd::Source => (&link.source, &link.source_interface),
        LinkEnd::Target => (&link.target, &link.target_interface),
    };
    let mut label = device.clone();
    if !interface.is_empty() {
        label.push(' ');
        label.push_str(&abbreviate_interface_name(interface));
    }
    let mode = topology
        .endpoint_interface(link, end)
        .and_then(|rec| InterfaceMode::from_config(&rec.config));
    if let Some(mode) = mode {
        label.push_str(&format!(" [{mode}]"));
    }
    label
}

/// Columns separated by two spaces, trailing padding removed.
fn table_lines(rows: &[Vec<String>]) -> Vec<String> {
    let widths = column_widths(rows);
    rows.iter()
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, &w)| pad_right(cell, w))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect()
}
