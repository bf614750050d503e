pub mod display_width;
pub mod error;
pub mod report;
pub mod site_metadata;
pub mod site_summary;
pub mod topology_ast;
pub mod topology_parser;
pub mod topology_query;

use std::path::Path;

pub use error::{Error, Result};
pub use report::SiteReport;
pub use site_summary::{SiteLocation, SiteSummary, extract_site_summary};
pub use topology_ast::{Connection, DeviceNode, InterfaceRecord, LinkEnd, Properties, Topology};
pub use topology_parser::parse_topology;

/// Name used when input has no file name to derive one from.
pub const DEFAULT_SITE_NAME: &str = "Network";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Path the text was read from; drives the default name and hierarchy.
    pub source: Option<String>,
    /// Site name used verbatim when the text has no header comment.
    pub name: Option<String>,
    pub format: OutputFormat,
    pub summary_only: bool,
}

/// `name` overrides the file-derived default name; type and hierarchy still follow `source`.
pub fn analyze(input: &str, source: Option<&str>, name: Option<&str>) -> SiteReport {
    let filename = source
        .and_then(|s| Path::new(s).file_name())
        .and_then(|f| f.to_str())
        .unwrap_or(DEFAULT_SITE_NAME);
    let metadata = match name {
        Some(name) => site_metadata::extract_site_metadata_named(input, filename, name),
        None => site_metadata::extract_site_metadata(input, filename),
    };
    let hierarchy = source
        .map(site_metadata::SiteHierarchy::from_path)
        .unwrap_or_else(|| site_metadata::SiteHierarchy::from_path(""));

    SiteReport {
        summary: extract_site_summary(input, &metadata.name),
        topology: parse_topology(input),
        metadata,
        hierarchy,
    }
}

pub fn render(input: &str) -> String {
    report::render(&analyze(input, None, None), false)
}

pub fn render_with_options(input: &str, options: &Options) -> Result<String> {
    let report = analyze(input, options.source.as_deref(), options.name.as_deref());
    match options.format {
        OutputFormat::Text => Ok(report::render(&report, options.summary_only)),
        OutputFormat::Json if options.summary_only => Ok(serde_json::to_string_pretty(&report.summary)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&report)?),
    }
}
