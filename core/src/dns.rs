// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # DNS Dispatcher
//!
//! Looks up the requested record kinds for every host concurrently. Kinds
//! that were not requested are never queried. Results are collected over a
//! channel sized to the host count and returned sorted by hostname, so the
//! output does not depend on resolver latency.

use std::collections::BTreeSet;
use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use netscan_common::models::dns::{Answer, DnsRecordResult, MxRecord, RecordKind};
use netscan_common::{debug, error, info};
use tokio::sync::mpsc;

mod resolver;

pub use resolver::HickoryLookup;

/// One method per query the dispatcher can issue.
#[async_trait]
pub trait DnsLookup: Send + Sync + 'static {
    /// Canonical name of `host`. Fails when the name does not exist.
    async fn cname(&self, host: &str) -> anyhow::Result<String>;

    /// A and AAAA answers in one call.
    async fn ips(&self, host: &str) -> anyhow::Result<Vec<IpAddr>>;

    async fn ns(&self, host: &str) -> anyhow::Result<Vec<String>>;

    async fn mx(&self, host: &str) -> anyhow::Result<Vec<MxRecord>>;

    async fn txt(&self, host: &str) -> anyhow::Result<Vec<String>>;
}

/// Runs the lookup against the system-configured resolver.
pub async fn lookup(hosts: &[String], kinds: &BTreeSet<RecordKind>) -> Vec<DnsRecordResult> {
    let resolver = Arc::new(HickoryLookup::from_system_conf());
    dispatch(hosts, kinds, resolver).await
}

/// Fans `hosts` out over `resolver`, then sorts the collected results by host.
pub async fn dispatch<L: DnsLookup>(
    hosts: &[String],
    kinds: &BTreeSet<RecordKind>,
    resolver: Arc<L>,
) -> Vec<DnsRecordResult> {
    let requested: Vec<&str> = kinds.iter().map(RecordKind::as_str).collect();
    info!(
        verbosity = 1,
        "Looking up [{}] for {} hosts",
        requested.join(", "),
        hosts.len()
    );

    let kinds = Arc::new(kinds.clone());
    let (tx, mut rx) = mpsc::channel::<DnsRecordResult>(hosts.len().max(1));

    for host in hosts {
        let tx = tx.clone();
        let host = host.clone();
        let kinds = Arc::clone(&kinds);
        let resolver = Arc::clone(&resolver);

        tokio::spawn(async move {
            let result = resolve_records(host, &kinds, resolver.as_ref()).await;
            let _ = tx.send(result).await;
        });
    }
    drop(tx);

    let mut results = Vec::with_capacity(hosts.len());
    while let Some(result) = rx.recv().await {
        results.push(result);
    }

    if results.len() != hosts.len() {
        error!(
            "{} of {} DNS tasks ended without a result",
            hosts.len() - results.len(),
            hosts.len()
        );
    }

    results.sort_by(|a, b| a.host.cmp(&b.host));
    results
}

async fn resolve_records<L: DnsLookup>(
    host: String,
    kinds: &BTreeSet<RecordKind>,
    resolver: &L,
) -> DnsRecordResult {
    let mut res = DnsRecordResult::new(host.as_str());

    if kinds.contains(&RecordKind::Cname) {
        match resolver.cname(&host).await {
            Ok(cname) => res.cname = Some(cname),
            Err(e) => {
                debug!(verbosity = 1, "CNAME lookup for {host} failed: {e}");
                return DnsRecordResult::not_found(host);
            }
        }
    }

    let want_v4 = kinds.contains(&RecordKind::Ip4);
    let want_v6 = kinds.contains(&RecordKind::Ip6);
    if want_v4 || want_v6 {
        let ips = resolver.ips(&host).await.unwrap_or_else(|e| {
            debug!(verbosity = 1, "IP lookup for {host} failed: {e}");
            Vec::new()
        });

        let mut v4 = Vec::new();
        let mut v6 = Vec::new();
        for ip in ips {
            match ip {
                IpAddr::V4(addr) => v4.push(addr),
                IpAddr::V6(addr) => v6.push(addr),
            }
        }
        res.ipv4 = want_v4.then(|| Answer::records(v4));
        res.ipv6 = want_v6.then(|| Answer::records(v6));
    }

    if kinds.contains(&RecordKind::Ns) {
        res.ns = Some(match resolver.ns(&host).await {
            Ok(records) => Answer::records(records),
            Err(e) => Answer::failed(e.to_string()),
        });
    }

    if kinds.contains(&RecordKind::Mx) {
        res.mx = Some(match resolver.mx(&host).await {
            Ok(records) => Answer::records(records),
            Err(e) => Answer::failed(e.to_string()),
        });
    }

    if kinds.contains(&RecordKind::Txt) {
        res.txt = Some(match resolver.txt(&host).await {
            Ok(records) => Answer::records(records),
            Err(e) => {
                debug!(verbosity = 1, "TXT lookup for {host} failed: {e}");
                Answer::empty()
            }
        });
    }

    res
}

// ╔══════════════════════════════════════════════╗
// ║                    TESTS                     ║
// ╚══════════════════════════════════════════════╝
