use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use colored::*;
use lanprobe_common::event::EventKind;
use lanprobe_common::network::device::DeviceRecord;
use lanprobe_core::{DiscoveryReport, DiscoveryService};
use tracing::{info_span, warn};

use crate::terminal::{colors, format, print, spinner};

pub fn discover(quiet: bool) -> anyhow::Result<()> {
    let span = info_span!("discovery");
    let guard = span.enter();

    let service = DiscoveryService::system();
    watch_progress(&service, quiet);

    let report: DiscoveryReport = service.discover()?;
    spinner::finish();
    drop(guard);

    discovery_ends(&service.registry().snapshot(), &report, quiet);
    Ok(())
}

/// Streams the host count to the spinner while the run is in progress.
fn watch_progress(service: &DiscoveryService, quiet: bool) {
    if quiet {
        return;
    }
    spinner::get_spinner().set_message("Probing private ranges...".to_string());

    let found = Arc::new(AtomicUsize::new(0));
    service.bus().subscribe(EventKind::HostFound, move |_| {
        let count = found.fetch_add(1, Ordering::Relaxed) + 1;
        spinner::report_discovery_progress(count);
        Ok(())
    });
}

fn discovery_ends(devices: &BTreeMap<Ipv4Addr, DeviceRecord>, report: &DiscoveryReport, quiet: bool) {
    for failure in &report.failures {
        warn!("{failure}");
    }

    if devices.is_empty() {
        print::header("zero hosts detected", quiet);
        print::no_results();
        return;
    }

    print::header("network discovery", quiet);
    print_devices(devices);
    print_summary(devices.len(), report, quiet);
}

fn print_devices(devices: &BTreeMap<Ipv4Addr, DeviceRecord>) {
    let headers = ["IP Address", "Open Ports", "MAC Address"];
    let rows: Vec<[ColoredString; 3]> = devices.values().map(format::device_row).collect();
    print::table(headers, &rows);
}

fn print_summary(hosts_len: usize, report: &DiscoveryReport, quiet: bool) {
    let active_hosts: ColoredString = format!("{hosts_len} active hosts").bold().green();
    let total_time: ColoredString = format!("{:.2}s", report.elapsed.as_secs_f64()).bold().yellow();
    let output: ColoredString = format!("Discovery Complete: {active_hosts} identified in {total_time}")
        .color(colors::TEXT_DEFAULT);

    if quiet {
        print::print(&output.to_string());
        return;
    }

    print::fat_separator();
    print::centerln(&output.to_string());
    if !report.is_complete() {
        let classes: Vec<String> = report.failed_classes().iter().map(|c| c.to_string()).collect();
        print::print_status(format!("Incomplete classes: {}", classes.join(", ").red()));
    }
}
