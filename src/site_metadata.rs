//! Descriptive metadata for a site file: header comments, file name, and
//! the directory hierarchy the file sits in.

use serde::Serialize;

use crate::site_summary::HEADER_LINES;

const EXTENSION: &str = ".d2";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteMetadata {
    pub name: String,
    pub location: String,
    pub site_type: String,
    pub description: Option<String>,
}

/// Reads `# ...` header comments from the first lines, filling gaps from the file name.
///
/// Recognized comment content (case-insensitive):
/// - anything mentioning `site` or `network` becomes the description (last one wins)
/// - `location: <text>` sets the location
/// - `type: <text>` sets the site type (lower-cased)
pub fn extract_site_metadata(input: &str, filename: &str) -> SiteMetadata {
    extract_site_metadata_named(input, filename, &name_from_filename(filename))
}

/// Like [`extract_site_metadata`], with a caller-chosen site name kept verbatim.
pub fn extract_site_metadata_named(input: &str, filename: &str, name: &str) -> SiteMetadata {
    let mut description = None;
    let mut location = None;
    let mut site_type = None;

    for line in input.lines().take(HEADER_LINES).map(str::trim) {
        let Some(comment) = line.strip_prefix('#').map(str::trim) else {
            continue;
        };
        let lower = comment.to_lowercase();
        if lower.contains("site") || lower.contains("network") {
            description = Some(comment.to_string());
        }
        if lower.contains("location:") {
            location = second_field(comment).or(location);
        }
        if lower.contains("type:") {
            site_type = second_field(comment).map(|t| t.to_lowercase()).or(site_type);
        }
    }

    let name = name.to_string();
    SiteMetadata {
        location: location.unwrap_or_else(|| name.clone()),
        site_type: site_type.unwrap_or_else(|| site_type_from_filename(filename).to_string()),
        description,
        name,
    }
}

/// Text between the first and second colon, trimmed.
fn second_field(comment: &str) -> Option<String> {
    comment.split(':').nth(1).map(|s| s.trim().to_string())
}

/// `east_campus-core.d2` → `East Campus Core`.
pub fn name_from_filename(filename: &str) -> String {
    let base = filename.replace(EXTENSION, "").replace(['-', '_'], " ");
    let mut name = String::with_capacity(base.len());
    let mut at_word_start = true;
    for c in base.chars() {
        if at_word_start {
            name.extend(c.to_uppercase());
        } else {
            name.push(c);
        }
        at_word_start = !(c.is_alphanumeric() || c == '_');
    }
    name
}

/// `East Campus.d2` → `east_campus`.
pub fn site_key(filename: &str) -> String {
    filename
        .replace(EXTENSION, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

pub fn site_type_from_filename(filename: &str) -> &'static str {
    let lower = filename.to_lowercase();
    if lower.contains("branch") {
        "branch"
    } else if lower.contains("campus") {
        "campus"
    } else if lower.contains("datacenter") || lower.contains("dc") {
        "datacenter"
    } else if lower.contains("headquarters") || lower.contains("hq") {
        "headquarters"
    } else {
        "site"
    }
}

/// Position of a site file in a `region/country/state/city/file.d2` tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SiteHierarchy {
    pub region: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub depth: usize,
    pub breadcrumb: String,
}

impl SiteHierarchy {
    pub fn from_path(path: &str) -> Self {
        let parts: Vec<&str> = path
            .split(['/', '\\'])
            .filter(|part| !part.is_empty() && *part != ".")
            .collect();
        let dirs = match parts.split_last() {
            Some((_, dirs)) => dirs,
            None => &[][..],
        };
        let level = |i: usize| dirs.get(i).map(|s| s.to_string());

        SiteHierarchy {
            region: level(0),
            country: level(1),
            state: level(2),
            city: level(3),
            depth: dirs.len(),
            breadcrumb: if dirs.is_empty() {
                "Root".to_string()
            } else {
                dirs.join(" / ")
            },
        }
    }
}
