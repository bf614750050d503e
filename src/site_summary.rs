use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use tracing::debug;
use winnow::prelude::*;
use winnow::token::{rest, take_until};

use crate::topology_parser::{content_lines, type_value};

/// Access points assumed per wireless controller. A sizing heuristic, not a measurement.
pub const APS_PER_WIRELESS_CONTROLLER: usize = 12;

/// How many leading lines are searched for a site-name comment.
pub const HEADER_LINES: usize = 10;

const NAME_SUFFIX: &str = " - Complete Connection Data";

const WIRELESS_CONTROLLER: &str = "wireless_controller";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteSummary {
    pub name: String,
    pub location: SiteLocation,
    pub devices_count: usize,
    pub aps_count: usize,
    pub device_types: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SiteLocation {
    #[serde(rename = "Primary Data Center")]
    PrimaryDataCenter,
    #[serde(rename = "Main Campus")]
    MainCampus,
    #[serde(rename = "Remote Branch Office")]
    RemoteBranchOffice,
    Unknown,
}

impl SiteLocation {
    pub fn infer(device_types: &BTreeSet<String>, wireless_controllers: usize, devices: usize) -> Self {
        if device_types.contains("router") && device_types.contains("firewall") && devices > 10 {
            SiteLocation::PrimaryDataCenter
        } else if wireless_controllers > 1 && devices > 8 {
            SiteLocation::MainCampus
        } else if devices < 8 {
            SiteLocation::RemoteBranchOffice
        } else {
            SiteLocation::Unknown
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SiteLocation::PrimaryDataCenter => "Primary Data Center",
            SiteLocation::MainCampus => "Main Campus",
            SiteLocation::RemoteBranchOffice => "Remote Branch Office",
            SiteLocation::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for SiteLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cheap textual survey of a site, independent of [`crate::parse_topology`].
///
/// Device counting ignores nesting: any `: {` line without `->` or `/`
/// counts, so nested blocks of that shape are counted too.
pub fn extract_site_summary(input: &str, default_name: &str) -> SiteSummary {
    let mut devices_count = 0;
    let mut wireless_controllers = 0;
    let mut device_types = BTreeSet::new();

    for line in content_lines(input) {
        if line.contains(": {") && !line.contains("->") && !line.contains('/') {
            devices_count += 1;
        }
        if let Some(device_type) = line.strip_prefix("type:").and_then(parse_type) {
            if device_type == WIRELESS_CONTROLLER {
                wireless_controllers += 1;
            }
            device_types.insert(device_type.to_string());
        }
    }

    let name = site_name(input).unwrap_or_else(|| default_name.to_string());
    let location = SiteLocation::infer(&device_types, wireless_controllers, devices_count);
    debug!(
        site = %name,
        devices = devices_count,
        wireless_controllers,
        %location,
        "extracted site summary"
    );

    SiteSummary {
        name,
        location,
        devices_count,
        aps_count: wireless_controllers * APS_PER_WIRELESS_CONTROLLER,
        device_types,
    }
}

fn parse_type(value: &str) -> Option<&str> {
    let mut input = value;
    type_value(&mut input).ok()
}

/// Last `# ...` comment among the leading non-blank lines that mentions `Site` or `Network`.
///
/// Both full-line and trailing comments (`core: { # Austin Site`) count.
fn site_name(input: &str) -> Option<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(HEADER_LINES)
        .filter(|line| line.contains("Site") || line.contains("Network"))
        .filter_map(|line| {
            let mut input = line;
            comment_text(&mut input).ok()
        })
        .last()
        .map(|text| text.replace(NAME_SUFFIX, "").trim().to_string())
        .filter(|name| !name.is_empty())
}

fn comment_text<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    take_until(0.., "# ").parse_next(input)?;
    "# ".parse_next(input)?;
    rest.parse_next(input)
}
