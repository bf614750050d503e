use pretty_assertions::assert_eq;

use topo::{SiteLocation, extract_site_summary, site_summary::APS_PER_WIRELESS_CONTROLLER};

fn devices(count: usize, device_type: &str) -> String {
    (0..count)
        .map(|i| format!("{device_type}{i}: {{\n  label: \"{device_type} {i}\"\n  type: \"{device_type}\"\n}}\n"))
        .collect()
}

#[test]
fn wireless_controllers_drive_ap_estimate() {
    let input = "\
wlc1: {
  type: \"wireless_controller\"
}
wlc2: {
  type: wireless_controller
}
core: {
  type: \"router\"
}
";
    let summary = extract_site_summary(input, "Fallback");
    assert_eq!(summary.devices_count, 3);
    assert_eq!(summary.aps_count, 2 * APS_PER_WIRELESS_CONTROLLER);
    assert_eq!(summary.aps_count, 24);
    assert_eq!(summary.location, SiteLocation::RemoteBranchOffice);
    assert_eq!(summary.name, "Fallback");
    let types: Vec<&str> = summary.device_types.iter().map(String::as_str).collect();
    assert_eq!(types, vec!["router", "wireless_controller"]);
}

#[test]
fn device_count_ignores_nesting() {
    let input = "\
sw1: {
  label: S1
  vlan10: {
    ip_address: 10.0.0.1
  }
  eth0/1: {
    status: up
  }
}
sw1.eth0/1 -> r1.eth0
";
    let summary = extract_site_summary(input, "x");
    assert_eq!(summary.devices_count, 2, "vlan10 block counts, eth0/1 does not");
}

#[test]
fn seven_devices_is_a_branch() {
    let summary = extract_site_summary(&devices(7, "switch"), "x");
    assert_eq!(summary.devices_count, 7);
    assert_eq!(summary.location, SiteLocation::RemoteBranchOffice);
}

#[test]
fn eight_devices_is_unknown() {
    let summary = extract_site_summary(&devices(8, "switch"), "x");
    assert_eq!(summary.location, SiteLocation::Unknown);
}

#[test]
fn nine_devices_with_two_controllers_is_a_campus() {
    let input = devices(7, "switch") + &devices(2, "wireless_controller");
    let summary = extract_site_summary(&input, "x");
    assert_eq!(summary.devices_count, 9);
    assert_eq!(summary.location, SiteLocation::MainCampus);
}

#[test]
fn eight_devices_with_two_controllers_is_unknown() {
    let input = devices(6, "switch") + &devices(2, "wireless_controller");
    let summary = extract_site_summary(&input, "x");
    assert_eq!(summary.location, SiteLocation::Unknown);
}

#[test]
fn ten_devices_with_router_and_firewall_is_not_a_data_center() {
    let input = devices(5, "router") + &devices(5, "firewall");
    let summary = extract_site_summary(&input, "x");
    assert_eq!(summary.devices_count, 10);
    assert_eq!(summary.location, SiteLocation::Unknown);
}

#[test]
fn eleven_devices_with_router_and_firewall_is_a_data_center() {
    let input = devices(6, "router") + &devices(5, "firewall");
    let summary = extract_site_summary(&input, "x");
    assert_eq!(summary.devices_count, 11);
    assert_eq!(summary.location, SiteLocation::PrimaryDataCenter);
}

#[test]
fn site_name_from_header_comment() {
    let input = "\
# Denver Network - Complete Connection Data
r1: {
  type: router
}
";
    let summary = extract_site_summary(input, "Fallback");
    assert_eq!(summary.name, "Denver Network");
}

#[test]
fn empty_input() {
    let summary = extract_site_summary("", "Empty");
    assert_eq!(summary.devices_count, 0);
    assert_eq!(summary.aps_count, 0);
    assert!(summary.device_types.is_empty());
    assert_eq!(summary.name, "Empty");
    assert_eq!(summary.location, SiteLocation::RemoteBranchOffice);
}

#[test]
fn site_name_from_trailing_comment() {
    let input = "\
core: { # Austin Site - Complete Connection Data
  label: R1
  type: router
}
";
    let summary = extract_site_summary(input, "Fallback");
    assert_eq!(summary.name, "Austin Site");
    assert_eq!(summary.devices_count, 1);
}
