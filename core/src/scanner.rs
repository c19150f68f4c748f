// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Orchestration logic for port scanning.
//!
//! Every host gets its own task that resolves the name and then spawns one
//! task per port. Results travel back over a channel sized to the host count
//! and are tagged with their input index, so the returned sequence always
//! follows the input host order and each host's ports stay ascending, no
//! matter which probe finishes first.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use netscan_common::models::network::Network;
use netscan_common::models::port::PortSet;
use netscan_common::models::scan::{PortState, PortStatus, ScanResult};
use netscan_common::{debug, error, info};
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinHandle;

mod probe;

pub use probe::ConnectProber;

pub const DEFAULT_CONCURRENCY: usize = 512;

pub static PROBED_PORT_COUNT: AtomicUsize = AtomicUsize::new(0);

pub fn increment_probe_count() {
    PROBED_PORT_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn get_probe_count() -> usize {
    PROBED_PORT_COUNT.load(Ordering::Relaxed)
}

/// Resolves hosts and classifies single connection attempts.
///
/// [`ConnectProber`] is the real implementation; the seam exists so the
/// dispatcher can be driven with scripted latencies.
#[async_trait]
pub trait Prober: Send + Sync + 'static {
    /// Returns `false` when the name does not resolve at all.
    async fn resolve(&self, host: &str) -> bool;

    async fn probe(&self, host: &str, port: u16) -> PortState;
}

/// Validated inputs of a scan run.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub ports: PortSet,
    pub network: Network,
    pub timeout: Duration,
    /// Upper bound on simultaneous connection attempts across all hosts.
    pub concurrency: usize,
}

/// Scans every port in `settings.ports` on every host.
///
/// Never fails: unresolvable hosts come back as `NotFound` and every probe
/// failure is classified into a [`PortState`].
pub async fn scan(hosts: &[String], settings: &ScanSettings) -> Vec<ScanResult> {
    let prober = Arc::new(ConnectProber::new(settings.network, settings.timeout));
    dispatch(hosts, &settings.ports, settings.concurrency, prober).await
}

/// Fans `hosts` out over `prober` and gathers the results in input order.
pub async fn dispatch<P: Prober>(
    hosts: &[String],
    ports: &PortSet,
    concurrency: usize,
    prober: Arc<P>,
) -> Vec<ScanResult> {
    info!(
        verbosity = 1,
        "Scanning {} ports on {} hosts ({} probes in flight max)",
        ports.len(),
        hosts.len(),
        concurrency.max(1)
    );

    let limiter = Arc::new(Semaphore::new(concurrency.max(1)));
    let ports: Arc<[u16]> = ports.as_slice().into();
    let (tx, mut rx) = mpsc::channel::<(usize, ScanResult)>(hosts.len().max(1));

    for (idx, host) in hosts.iter().enumerate() {
        let tx = tx.clone();
        let host = host.clone();
        let ports = Arc::clone(&ports);
        let prober = Arc::clone(&prober);
        let limiter = Arc::clone(&limiter);

        tokio::spawn(async move {
            let result = scan_host(host, ports, prober, limiter).await;
            let _ = tx.send((idx, result)).await;
        });
    }
    drop(tx);

    let mut slots: Vec<Option<ScanResult>> = vec![None; hosts.len()];
    while let Some((idx, result)) = rx.recv().await {
        slots[idx] = Some(result);
    }

    slots
        .into_iter()
        .zip(hosts)
        .map(|(slot, host)| {
            slot.unwrap_or_else(|| {
                error!("Scan task for {host} ended without a result");
                ScanResult::not_found(host.as_str())
            })
        })
        .collect()
}

async fn scan_host<P: Prober>(
    host: String,
    ports: Arc<[u16]>,
    prober: Arc<P>,
    limiter: Arc<Semaphore>,
) -> ScanResult {
    if !prober.resolve(&host).await {
        debug!(verbosity = 1, "{host} could not be resolved");
        return ScanResult::not_found(host);
    }

    // A probe task only exists once it holds a permit, so the limit also
    // caps how many tasks are alive at once.
    let mut handles: Vec<(u16, JoinHandle<PortState>)> = Vec::with_capacity(ports.len());
    for &port in ports.iter() {
        let permit = Arc::clone(&limiter).acquire_owned().await.ok();
        let host = host.clone();
        let prober = Arc::clone(&prober);
        let handle = tokio::spawn(async move {
            let _permit = permit;
            let state = prober.probe(&host, port).await;
            increment_probe_count();
            state
        });
        handles.push((port, handle));
    }

    let mut states = Vec::with_capacity(handles.len());
    for (port, handle) in handles {
        let state = match handle.await {
            Ok(state) => state,
            Err(e) => {
                error!("Probe of {host}:{port} panicked: {e}");
                PortState::Closed
            }
        };
        states.push(PortStatus::new(port, state));
    }

    ScanResult::probed(host, states)
}

// ╔══════════════════════════════════════════════╗
// ║                    TESTS                     ║
// ╚══════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Scripted prober: per-host latency, unknown hosts fail to resolve,
    /// port 443 times out and other even ports are open.
    struct ScriptedProber {
        latency: HashMap<String, Duration>,
        completions: Mutex<Vec<String>>,
    }

    impl ScriptedProber {
        fn new(latency: &[(&str, u64)]) -> Self {
            Self {
                latency: latency
                    .iter()
                    .map(|(h, ms)| (h.to_string(), Duration::from_millis(*ms)))
                    .collect(),
                completions: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Prober for ScriptedProber {
        async fn resolve(&self, host: &str) -> bool {
            self.latency.contains_key(host)
        }

        async fn probe(&self, host: &str, port: u16) -> PortState {
            tokio::time::sleep(self.latency[host]).await;
            self.completions.lock().unwrap().push(host.to_string());
            match port {
                443 => PortState::Timeout,
                p if p % 2 == 0 => PortState::Open,
                _ => PortState::Closed,
            }
        }
    }

    fn hosts(names: &[&str]) -> Vec<String> {
        names.iter().map(|h| h.to_string()).collect()
    }

    #[tokio::test]
    async fn results_follow_input_order_when_middle_host_is_slow() {
        let prober = Arc::new(ScriptedProber::new(&[("h1", 5), ("h2", 150), ("h3", 5)]));
        let ports = PortSet::resolve(&[1, 2, 3], None).unwrap();

        let results = dispatch(&hosts(&["h1", "h2", "h3"]), &ports, 64, prober.clone()).await;

        let order: Vec<&str> = results.iter().map(|r| r.host.as_str()).collect();
        assert_eq!(order, vec!["h1", "h2", "h3"]);

        let completions = prober.completions.lock().unwrap();
        assert_eq!(
            completions.last().map(String::as_str),
            Some("h2"),
            "h2 should have finished last for this test to mean anything"
        );
    }

    #[tokio::test]
    async fn ports_stay_ascending_and_complete() {
        let prober = Arc::new(ScriptedProber::new(&[("h1", 1)]));
        let ports = PortSet::resolve(&[443, 22], Some("1-10")).unwrap();

        let results = dispatch(&hosts(&["h1"]), &ports, 4, prober).await;

        let probed: Vec<u16> = results[0].ports().iter().map(|s| s.port).collect();
        assert_eq!(probed, ports.as_slice());
        assert_eq!(results[0].ports()[1], PortStatus::new(2, PortState::Open));
        assert_eq!(results[0].ports()[0], PortStatus::new(1, PortState::Closed));
        assert_eq!(
            results[0].ports().last(),
            Some(&PortStatus::new(443, PortState::Timeout))
        );
    }

    #[tokio::test]
    async fn live_probe_tasks_never_exceed_the_limit() {
        struct GatedProber {
            live: AtomicUsize,
            peak: AtomicUsize,
        }

        #[async_trait]
        impl Prober for GatedProber {
            async fn resolve(&self, _host: &str) -> bool {
                true
            }

            async fn probe(&self, _host: &str, _port: u16) -> PortState {
                let now = self.live.fetch_add(1, Ordering::SeqCst) + 1;
                self.peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                self.live.fetch_sub(1, Ordering::SeqCst);
                PortState::Closed
            }
        }

        let prober = Arc::new(GatedProber {
            live: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let ports = PortSet::resolve(&[], Some("1-200")).unwrap();

        let results = dispatch(&hosts(&["h1", "h2"]), &ports, 3, prober.clone()).await;

        assert!(results.iter().all(|r| r.ports().len() == 200));
        assert!(prober.peak.load(Ordering::SeqCst) <= 3);
    }

    #[tokio::test]
    async fn unresolved_host_is_not_found_and_does_not_abort_batch() {
        let prober = Arc::new(ScriptedProber::new(&[("h1", 1), ("h3", 1)]));
        let ports = PortSet::resolve(&[80, 81], None).unwrap();

        let results = dispatch(&hosts(&["h1", "ghost", "h3"]), &ports, 8, prober).await;

        assert_eq!(results.len(), 3);
        assert!(results[1].is_not_found());
        assert!(results[1].ports().is_empty());
        assert_eq!(results[0].ports().len(), 2);
        assert_eq!(results[2].ports().len(), 2);
    }

    #[tokio::test]
    async fn single_permit_still_finishes() {
        let prober = Arc::new(ScriptedProber::new(&[("h1", 1), ("h2", 1)]));
        let ports = PortSet::resolve(&[], Some("1-20")).unwrap();

        let results = dispatch(&hosts(&["h1", "h2"]), &ports, 1, prober).await;

        assert!(results.iter().all(|r| r.ports().len() == 20));
    }

    #[tokio::test]
    async fn empty_host_list_yields_no_results() {
        let prober = Arc::new(ScriptedProber::new(&[]));
        let ports = PortSet::resolve(&[80], None).unwrap();
        assert!(dispatch(&[], &ports, 8, prober).await.is_empty());
    }
}
