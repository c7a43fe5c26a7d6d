use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};

use lanprobe_common::config::Config;
use lanprobe_common::error::DiscoveryError;
use lanprobe_common::event::{Event, EventKind, ScannerId};
use lanprobe_common::network::device::DeviceRecord;
use lanprobe_common::network::plan::AddressClass;
use lanprobe_core::{DiscoveryService, DiscoveryState};
use pnet::util::MacAddr;

use crate::fakes::FakeNetwork;

const HOST_A: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 5);
const HOST_B: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 9);
const MAC_A: MacAddr = MacAddr(0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff);

fn service_for(network: FakeNetwork) -> (DiscoveryService, Arc<FakeNetwork>) {
    let network = Arc::new(network);
    let config = Config {
        probe_ports: vec![22, 80, 443],
        ..Config::default()
    };
    (DiscoveryService::new(config, network.probes()), network)
}

fn small_network() -> FakeNetwork {
    FakeNetwork::new()
        .host(HOST_A)
        .host(HOST_B)
        .open_port(HOST_A, 22)
        .mac(HOST_A, MAC_A)
}

/// Every subnet of every class has `.5` alive with port 80 open.
fn one_host_per_subnet() -> FakeNetwork {
    AddressClass::ALL
        .into_iter()
        .flat_map(AddressClass::ranges)
        .fold(FakeNetwork::new(), |net, range| {
            let [a, b, c, _] = range.base().octets();
            net.open_port(Ipv4Addr::new(a, b, c, 5), 80)
        })
}

#[test]
fn discovers_hosts_ports_and_macs() {
    let (service, _) = service_for(small_network());

    let report = service.discover().unwrap();
    assert!(report.is_complete());

    let devices = service.registry().snapshot();
    assert_eq!(devices.len(), 2);
    assert_eq!(
        devices[&HOST_A],
        DeviceRecord { address: HOST_A, ports: vec![22], mac: Some(MAC_A) }
    );
    assert_eq!(
        devices[&HOST_B],
        DeviceRecord { address: HOST_B, ports: vec![], mac: None }
    );
}

#[test]
fn repeated_runs_produce_identical_registries() {
    let (service, _) = service_for(small_network());

    service.discover().unwrap();
    let first = format!("{:?}", service.registry().snapshot());
    service.discover().unwrap();
    let second = format!("{:?}", service.registry().snapshot());

    assert_eq!(first, second);
}

#[test]
fn failing_class_leaves_other_classes_intact() {
    let (service, _) = service_for(one_host_per_subnet());
    service.bus().subscribe(EventKind::HostFound, |event| {
        let [a, _, c, _] = event.address().octets();
        anyhow::ensure!(!(a == 10 && c == 7), "refusing {}", event.address());
        Ok(())
    });

    let report = service.discover().unwrap();
    assert_eq!(report.failed_classes(), vec![AddressClass::A]);
    assert!(format!("{:#}", report.failures[0].error).contains("10.0.7.5"));

    let devices = service.registry().snapshot();
    assert_eq!(devices.len(), 8 + 16 + 255);
    for i in 0..16 {
        assert_eq!(devices[&Ipv4Addr::new(172, 16, i, 5)].ports, vec![80]);
    }
    for i in 0..255 {
        assert_eq!(devices[&Ipv4Addr::new(192, 168, i, 5)].ports, vec![80]);
    }
    assert_eq!(devices[&Ipv4Addr::new(10, 0, 6, 5)].ports, vec![80]);
    // Recorded before the failing subscriber ran, never port-scanned.
    assert!(devices[&Ipv4Addr::new(10, 0, 7, 5)].ports.is_empty());
    assert!(!devices.contains_key(&Ipv4Addr::new(10, 0, 8, 5)));
}

#[test]
fn panicking_subscriber_fails_only_its_class() {
    let (service, _) = service_for(one_host_per_subnet());
    service.bus().subscribe(EventKind::HostFound, |event| {
        if event.address() == Ipv4Addr::new(10, 0, 7, 5) {
            panic!("subscriber blew up on {}", event.address());
        }
        Ok(())
    });

    let report = service.discover().unwrap();
    assert_eq!(report.failed_classes(), vec![AddressClass::A]);
    assert!(format!("{:#}", report.failures[0].error).contains("subscriber blew up on 10.0.7.5"));
    assert_eq!(service.state(), DiscoveryState::Done);
    assert!(!service.is_scanning());
    assert_eq!(service.registry().len(), 8 + 16 + 255);

    // The service is usable again afterwards.
    let again = service.discover().unwrap();
    assert_eq!(again.failed_classes(), vec![AddressClass::A]);
    assert_eq!(service.state(), DiscoveryState::Done);
}

#[test]
fn findings_follow_their_host_on_the_stream() {
    let (service, _) = service_for(small_network());
    let events: Arc<Mutex<Vec<Event>>> = Arc::default();
    for kind in [EventKind::HostFound, EventKind::PortFound, EventKind::MacFound] {
        let sink = events.clone();
        service.bus().subscribe(kind, move |event| {
            sink.lock().unwrap().push(event.clone());
            Ok(())
        });
    }

    service.discover().unwrap();

    let kinds: Vec<(EventKind, Ipv4Addr)> = events
        .lock()
        .unwrap()
        .iter()
        .map(|e| (e.kind(), e.address()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (EventKind::HostFound, HOST_A),
            (EventKind::PortFound, HOST_A),
            (EventKind::MacFound, HOST_A),
            (EventKind::HostFound, HOST_B),
        ]
    );
}

#[test]
fn progress_indicator_is_on_while_events_stream() {
    let (service, _) = service_for(small_network());
    let service = Arc::new(service);
    let observed: Arc<Mutex<Vec<(bool, DiscoveryState)>>> = Arc::default();

    let watcher = Arc::downgrade(&service);
    let sink = observed.clone();
    service.bus().subscribe(EventKind::PortFound, move |_| {
        if let Some(service) = watcher.upgrade() {
            sink.lock().unwrap().push((service.is_scanning(), service.state()));
        }
        Ok(())
    });

    service.discover().unwrap();

    let observed = observed.lock().unwrap();
    assert_eq!(observed.len(), 1);
    assert!(observed[0].0);
    assert!(matches!(observed[0].1, DiscoveryState::Scanning | DiscoveryState::Draining));
    assert!(!service.is_scanning());
    assert_eq!(service.state(), DiscoveryState::Done);
}

#[test]
fn overlapping_runs_are_rejected() {
    let (service, _) = service_for(small_network());
    let service = Arc::new(service);
    let nested: Arc<Mutex<Option<bool>>> = Arc::default();

    let watcher = Arc::downgrade(&service);
    let sink = nested.clone();
    service.bus().subscribe(EventKind::MacFound, move |_| {
        if let Some(service) = watcher.upgrade() {
            let rejected = matches!(service.discover(), Err(DiscoveryError::AlreadyRunning));
            *sink.lock().unwrap() = Some(rejected);
        }
        Ok(())
    });

    service.discover().unwrap();
    assert_eq!(*nested.lock().unwrap(), Some(true));
}

#[test]
fn hosts_from_foreign_scanners_are_not_probed() {
    let (service, network) = service_for(small_network());
    service.discover().unwrap();
    let probes_after_run = network.port_probes();

    let stranger = Ipv4Addr::new(192, 168, 50, 50);
    service
        .bus()
        .publish(&Event::HostFound { address: stranger, scanner_id: ScannerId::next() })
        .unwrap();

    assert_eq!(network.port_probes(), probes_after_run);
    assert_eq!(
        service.registry().get(stranger),
        Some(DeviceRecord::new(stranger))
    );
}

#[test]
fn bad_sizing_is_reported_before_any_probe() {
    let network = Arc::new(small_network());
    let mut config = Config::default();
    config.sizing.compute_time = -1.0;
    let service = DiscoveryService::new(config, network.probes());

    assert!(matches!(service.discover(), Err(DiscoveryError::Sizing(_))));
    assert_eq!(network.port_probes(), 0);
    assert!(service.registry().is_empty());
}
