// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

#![cfg(test)]
use std::time::Duration;

use netscan_common::models::network::Network;
use netscan_common::models::port::PortSet;
use netscan_common::models::scan::{HostOutcome, PortState};
use netscan_core::scanner::{self, ScanSettings};
use tokio::net::TcpListener;

use crate::utils::released_port;

fn settings(ports: PortSet, network: Network) -> ScanSettings {
    ScanSettings {
        ports,
        network,
        timeout: Duration::from_millis(500),
        concurrency: 64,
    }
}

#[tokio::test]
async fn open_and_closed_loopback_ports() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let open = listener.local_addr().unwrap().port();
    let closed = released_port();

    let ports = PortSet::resolve(&[i64::from(open), i64::from(closed)], None).unwrap();
    let results = scanner::scan(&["127.0.0.1".to_string()], &settings(ports, Network::Tcp)).await;

    assert_eq!(results.len(), 1);
    for status in results[0].ports() {
        let expected = if status.port == open {
            PortState::Open
        } else {
            PortState::Closed
        };
        assert_eq!(status.state, expected, "port {}", status.port);
    }
}

#[tokio::test]
async fn every_resolved_port_gets_exactly_one_state() {
    let ports = PortSet::resolve(&[1], Some("40000-40019")).unwrap();
    let expected: Vec<u16> = ports.iter().collect();

    let results = scanner::scan(
        &["127.0.0.1".to_string(), "::1".to_string()],
        &settings(ports, Network::Tcp),
    )
    .await;

    for result in &results {
        let seen: Vec<u16> = result.ports().iter().map(|s| s.port).collect();
        assert_eq!(seen, expected, "{}", result.host);
    }
}

#[tokio::test]
async fn unresolvable_host_keeps_its_slot() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let open = listener.local_addr().unwrap().port();
    let ports = PortSet::resolve(&[i64::from(open)], None).unwrap();

    let hosts = vec![
        "127.0.0.1".to_string(),
        "no-such-host.invalid".to_string(),
        "localhost".to_string(),
    ];
    let results = scanner::scan(&hosts, &settings(ports, Network::Tcp4)).await;

    let order: Vec<&str> = results.iter().map(|r| r.host.as_str()).collect();
    assert_eq!(order, ["127.0.0.1", "no-such-host.invalid", "localhost"]);
    assert_eq!(results[1].outcome, HostOutcome::NotFound);
    assert_eq!(results[0].ports()[0].state, PortState::Open);
    assert_eq!(results[2].ports()[0].state, PortState::Open);
}

#[tokio::test]
async fn family_restricted_network_skips_other_family() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let open = listener.local_addr().unwrap().port();
    let ports = PortSet::resolve(&[i64::from(open)], None).unwrap();

    let results = scanner::scan(&["127.0.0.1".to_string()], &settings(ports, Network::Tcp6)).await;
    assert_eq!(results[0].ports()[0].state, PortState::Closed);
}

#[cfg(unix)]
#[tokio::test]
async fn unix_socket_path_is_dialled_per_port() {
    let dir = std::env::temp_dir().join(format!("net-scan-it-unix-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let base = dir.join("sock");
    let _ = std::fs::remove_file(dir.join("sock:1"));
    let _ = std::fs::remove_file(dir.join("sock:2"));
    let _listener = tokio::net::UnixListener::bind(dir.join("sock:1")).unwrap();

    let ports = PortSet::resolve(&[1, 2], None).unwrap();
    let host = base.to_string_lossy().into_owned();
    let results = scanner::scan(&[host], &settings(ports, Network::Unix)).await;

    assert!(!results[0].is_not_found());
    let states: Vec<PortState> = results[0].ports().iter().map(|s| s.state).collect();
    assert_eq!(states, [PortState::Open, PortState::Closed]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[tokio::test]
#[ignore = "needs a route that drops packets to TEST-NET-1"]
async fn blackholed_address_times_out() {
    let ports = PortSet::resolve(&[80], None).unwrap();
    let mut settings = settings(ports, Network::Tcp);
    settings.timeout = Duration::from_millis(200);

    let results = scanner::scan(&["192.0.2.1".to_string()], &settings).await;
    assert_eq!(results[0].ports()[0].state, PortState::Timeout);
}
