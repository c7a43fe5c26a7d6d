//! # Network Discovery Service
//!
//! Implements the "discover every device on the private ranges" use case.
//!
//! A run walks `Idle → PoolSizing → Scanning → Draining → Done`:
//! 1. **PoolSizing**: the sizing law turns the configured I/O estimate into a
//!    worker count. Bad parameters end the run here, before any probe.
//! 2. **Scanning**: a fresh liveness scanner is created, the host pipeline is
//!    pointed at it and one task per address class is submitted to the pool.
//!    Every live host is port-scanned then MAC-resolved inline, on the thread
//!    that found it.
//! 3. **Draining**: the caller blocks until every class task, and every nested
//!    probe it triggered, has finished.
//!
//! There is no cancellation; probe timeouts bound how long a run can take.

use std::any::Any;
use std::net::Ipv4Addr;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::{Duration, Instant};

use anyhow::{Context, anyhow};
use lanprobe_common::config::Config;
use lanprobe_common::error::{ClassFailure, DiscoveryError};
use lanprobe_common::event::{Event, EventKind, ScannerId};
use lanprobe_common::network::plan::AddressClass;
use rayon::ThreadPoolBuilder;
use tracing::{debug, error, info};

use crate::bus::EventBus;
use crate::registry::DeviceRegistry;
use crate::scanner::{IpScanner, MacResolver, PortScanner, Probes};
use crate::sizing;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    Idle,
    PoolSizing,
    Scanning,
    Draining,
    Done,
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct DiscoveryReport {
    /// Size given by the sizing law.
    pub pool_size: usize,
    /// Threads actually started: never more than there are class tasks.
    pub workers: usize,
    /// Class tasks that ended early, in no particular order.
    pub failures: Vec<ClassFailure>,
    pub elapsed: Duration,
}

impl DiscoveryReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_classes(&self) -> Vec<AddressClass> {
        let mut classes: Vec<AddressClass> = self.failures.iter().map(|f| f.class).collect();
        classes.sort();
        classes
    }
}

pub struct DiscoveryService {
    config: Config,
    probes: Probes,
    bus: Arc<EventBus>,
    registry: Arc<DeviceRegistry>,
    pipeline: Arc<HostPipeline>,
    state: Mutex<DiscoveryState>,
    scanning: AtomicBool,
}

impl DiscoveryService {
    /// A service probing the real network with the compiled-in settings.
    pub fn system() -> Self {
        let config = Config::default();
        let probes = Probes::system(&config);
        Self::new(config, probes)
    }

    pub fn new(config: Config, probes: Probes) -> Self {
        let bus = Arc::new(EventBus::new());
        let registry = Arc::new(DeviceRegistry::new());
        registry.subscribe_to(&bus);
        let pipeline = HostPipeline::subscribe_to(&bus, &config, &probes);

        Self {
            config,
            probes,
            bus,
            registry,
            pipeline,
            state: Mutex::new(DiscoveryState::Idle),
            scanning: AtomicBool::new(false),
        }
    }

    /// The bus findings are published on. Subscribe here to stream results
    /// while [`discover`](Self::discover) is still running.
    pub fn bus(&self) -> &Arc<EventBus> {
        &self.bus
    }

    pub fn registry(&self) -> &Arc<DeviceRegistry> {
        &self.registry
    }

    pub fn state(&self) -> DiscoveryState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Progress indicator: true while class tasks may still be publishing.
    pub fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::Acquire)
    }

    /// Runs a full sweep of the three private classes and blocks until done.
    ///
    /// The registry is emptied first, so after returning it holds exactly what
    /// this run found. A failing subscriber only aborts its own class task; it
    /// shows up in [`DiscoveryReport::failures`] while the others complete.
    pub fn discover(&self) -> Result<DiscoveryReport, DiscoveryError> {
        self.begin()?;
        let result = self.run();
        self.scanning.store(false, Ordering::Release);
        match &result {
            Ok(_) => self.transition(DiscoveryState::Done),
            Err(_) => self.transition(DiscoveryState::Idle),
        }
        result
    }

    fn run(&self) -> Result<DiscoveryReport, DiscoveryError> {
        let started = Instant::now();

        let params = self.config.sizing;
        let pool_size = sizing::compute_size(params.target_utilization, params.wait_time, params.compute_time)?;
        let workers = pool_size.min(AddressClass::ALL.len());
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|idx| format!("lanprobe-worker-{idx}"))
            .build()
            .map_err(|e| DiscoveryError::ThreadPool(e.to_string()))?;
        debug!("pool sized at {pool_size}, starting {workers} worker(s)");

        self.transition(DiscoveryState::Scanning);
        self.registry.clear();
        let ip_scanner = IpScanner::new(self.bus.clone(), self.probes.reachability.clone());
        self.pipeline.follow(Some(ip_scanner.id()));
        self.scanning.store(true, Ordering::Release);

        let failures: Mutex<Vec<ClassFailure>> = Mutex::new(Vec::new());
        pool.in_place_scope(|scope| {
            for class in AddressClass::ALL {
                let ip_scanner = &ip_scanner;
                let failures = &failures;
                scope.spawn(move |_| {
                    // A panicking subscriber fails its class like an erroring one.
                    let outcome = panic::catch_unwind(AssertUnwindSafe(|| scan_class(ip_scanner, class)))
                        .unwrap_or_else(|payload| {
                            Err(anyhow!("worker panicked: {}", panic_message(&*payload)))
                        });
                    if let Err(error) = outcome {
                        error!("class {class} aborted: {error:#}");
                        failures
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .push(ClassFailure { class, error });
                    }
                });
            }
            self.transition(DiscoveryState::Draining);
        });

        self.pipeline.follow(None);

        let failures = failures.into_inner().unwrap_or_else(PoisonError::into_inner);
        let elapsed = started.elapsed();
        info!(
            "discovery finished: {} device(s) in {:.2}s",
            self.registry.len(),
            elapsed.as_secs_f64()
        );

        Ok(DiscoveryReport {
            pool_size,
            workers,
            failures,
            elapsed,
        })
    }

    fn begin(&self) -> Result<(), DiscoveryError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match *state {
            DiscoveryState::Idle | DiscoveryState::Done => {
                *state = DiscoveryState::PoolSizing;
                debug!("discovery state: PoolSizing");
                Ok(())
            }
            _ => Err(DiscoveryError::AlreadyRunning),
        }
    }

    fn transition(&self, next: DiscoveryState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
        debug!("discovery state: {next:?}");
    }
}

/// Port scan then MAC resolution behind every host the current run's
/// liveness scanner reports.
///
/// Subscribed once per service. It holds the bus weakly so that dropping the
/// service frees the bus along with its handlers.
struct HostPipeline {
    bus: Weak<EventBus>,
    probes: Probes,
    ports: Vec<u16>,
    current: Mutex<Option<ScannerId>>,
}

impl HostPipeline {
    fn subscribe_to(bus: &Arc<EventBus>, config: &Config, probes: &Probes) -> Arc<Self> {
        let pipeline = Arc::new(Self {
            bus: Arc::downgrade(bus),
            probes: probes.clone(),
            ports: config.probe_ports.clone(),
            current: Mutex::new(None),
        });
        let handler = pipeline.clone();
        bus.subscribe(EventKind::HostFound, move |event| match event {
            Event::HostFound { address, scanner_id } => handler.on_host_found(*address, *scanner_id),
            _ => Ok(()),
        });
        pipeline
    }

    /// Sets the scanner whose findings are followed up; `None` between runs.
    fn follow(&self, scanner: Option<ScannerId>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = scanner;
    }

    fn on_host_found(&self, address: Ipv4Addr, scanner_id: ScannerId) -> anyhow::Result<()> {
        if *self.current.lock().unwrap_or_else(PoisonError::into_inner) != Some(scanner_id) {
            return Ok(());
        }
        let Some(bus) = self.bus.upgrade() else {
            return Ok(());
        };
        info!("found host {address}");
        PortScanner::new(bus.clone(), self.probes.ports.clone(), self.ports.clone()).scan(address)?;
        MacResolver::new(bus, self.probes.neighbors.clone()).scan(address)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown cause"
    }
}

/// Walks the subnets of `class` one after another.
fn scan_class(ip_scanner: &IpScanner, class: AddressClass) -> anyhow::Result<()> {
    let mut live = 0;
    for (idx, range) in class.ranges().enumerate() {
        live += ip_scanner
            .scan(&range)
            .with_context(|| format!("subnet {idx} ({})", range.base()))?;
    }
    debug!("class {class} done, {live} live host(s)");
    Ok(())
}
