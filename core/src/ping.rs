// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # ICMP Prober
//!
//! Sends echo requests to a single host through `surge-ping` and reports
//! every reply and the final statistics through a [`PingHandler`].

use std::net::IpAddr;
use std::time::Duration;

use netscan_common::error::NetScanError;
use netscan_common::{debug, warn};
use surge_ping::{Client, ICMP, IcmpPacket, PingIdentifier, PingSequence, SurgeError};
use tokio::net::lookup_host;
use tokio::time::Instant;

pub const MAX_PAYLOAD: usize = 65500;

#[derive(Debug, Clone)]
pub struct PingSettings {
    /// Stop after this many echo requests; 0 runs until interrupted or timed out.
    pub count: u32,
    pub size: usize,
    pub interval: Duration,
    /// Overall deadline for one host, regardless of how many replies arrived.
    pub timeout: Duration,
    pub ttl: u32,
    pub interface: Option<String>,
    pub privileged: bool,
}

impl Default for PingSettings {
    fn default() -> Self {
        Self {
            count: 4,
            size: 56,
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(10),
            ttl: 64,
            interface: None,
            privileged: false,
        }
    }
}

impl PingSettings {
    pub fn validate(&self) -> Result<(), NetScanError> {
        if self.size > MAX_PAYLOAD {
            return Err(NetScanError::InvalidValue(format!(
                "packet size must be between 0 and {MAX_PAYLOAD}"
            )));
        }
        if self.interval.is_zero() {
            return Err(NetScanError::InvalidValue("interval must be > 0".into()));
        }
        if self.timeout.is_zero() {
            return Err(NetScanError::InvalidValue("timeout must be > 0".into()));
        }
        if !(1..=255).contains(&self.ttl) {
            return Err(NetScanError::InvalidValue("ttl must be in range 1-255".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PingReply {
    pub bytes: usize,
    pub addr: IpAddr,
    pub seq: u16,
    pub rtt: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PingStatistics {
    pub addr: IpAddr,
    pub sent: u32,
    pub received: u32,
    pub min_rtt: Duration,
    pub avg_rtt: Duration,
    pub max_rtt: Duration,
    pub stddev_rtt: Duration,
}

impl PingStatistics {
    pub fn from_rtts(addr: IpAddr, sent: u32, rtts: &[Duration]) -> Self {
        let received = rtts.len() as u32;
        if rtts.is_empty() {
            return Self {
                addr,
                sent,
                received,
                min_rtt: Duration::ZERO,
                avg_rtt: Duration::ZERO,
                max_rtt: Duration::ZERO,
                stddev_rtt: Duration::ZERO,
            };
        }

        let secs: Vec<f64> = rtts.iter().map(Duration::as_secs_f64).collect();
        let mean = secs.iter().sum::<f64>() / secs.len() as f64;
        let variance = secs.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / secs.len() as f64;

        Self {
            addr,
            sent,
            received,
            min_rtt: rtts.iter().copied().min().unwrap_or_default(),
            avg_rtt: Duration::from_secs_f64(mean),
            max_rtt: rtts.iter().copied().max().unwrap_or_default(),
            stddev_rtt: Duration::from_secs_f64(variance.sqrt()),
        }
    }

    pub fn packet_loss(&self) -> f64 {
        if self.sent == 0 {
            return 0.0;
        }
        f64::from(self.sent - self.received.min(self.sent)) / f64::from(self.sent) * 100.0
    }
}

/// Receives the events of one ping run.
///
/// `surge-ping` matches each reply to its request and drops late copies, so
/// there is no duplicate event.
pub trait PingHandler {
    fn on_start(&mut self, host: &str, addr: IpAddr);
    fn on_recv(&mut self, reply: &PingReply);
    fn on_finish(&mut self, stats: &PingStatistics);
}

/// Request counter and reply RTTs of one run.
///
/// Sequence numbers wrap at `u16::MAX`; every matched reply counts, even when
/// its sequence number was used before the wrap.
#[derive(Debug, Default)]
struct Tally {
    sent: u32,
    next_seq: u16,
    rtts: Vec<Duration>,
}

impl Tally {
    fn next_request(&mut self) -> u16 {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.sent = self.sent.saturating_add(1);
        seq
    }

    fn record(&mut self, rtt: Duration) {
        self.rtts.push(rtt);
    }

    fn statistics(&self, addr: IpAddr) -> PingStatistics {
        PingStatistics::from_rtts(addr, self.sent, &self.rtts)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PingOutcome {
    NotFound,
    Finished(PingStatistics),
}

/// Pings `host` until `count` requests were sent, the overall timeout
/// elapses or Ctrl-C is pressed.
pub async fn run<H: PingHandler>(
    host: &str,
    settings: &PingSettings,
    handler: &mut H,
) -> anyhow::Result<PingOutcome> {
    let Some(addr) = resolve(host).await else {
        return Ok(PingOutcome::NotFound);
    };

    let kind = if addr.is_ipv4() { ICMP::V4 } else { ICMP::V6 };
    let mut builder = surge_ping::Config::builder().kind(kind).ttl(settings.ttl);
    if let Some(iface) = &settings.interface {
        builder = builder.interface(iface);
    }
    if settings.privileged {
        builder = builder.sock_type_hint(socket2::Type::RAW);
    }
    let client = Client::new(&builder.build())
        .map_err(|e| anyhow::anyhow!("failed to open ICMP socket: {e}"))?;
    let mut pinger = client.pinger(addr, PingIdentifier(rand::random())).await;

    handler.on_start(host, addr);

    let payload = vec![0u8; settings.size];
    let deadline = Instant::now() + settings.timeout;
    let mut tally = Tally::default();

    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    loop {
        if settings.count != 0 && tally.sent >= settings.count {
            break;
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }

        let seq = tally.next_request();
        pinger.timeout(remaining.min(settings.interval.max(Duration::from_secs(1))));

        let started = Instant::now();
        tokio::select! {
            _ = &mut interrupt => break,
            res = pinger.ping(PingSequence(seq), &payload) => match res {
                Ok((packet, rtt)) => {
                    tally.record(rtt);
                    handler.on_recv(&PingReply { bytes: packet_size(&packet), addr, seq, rtt });
                }
                Err(SurgeError::Timeout { seq }) => {
                    debug!(verbosity = 1, "Request icmp_seq={} to {addr} timed out", seq.0);
                }
                Err(e) => warn!("Ping to {addr} failed: {e}"),
            },
        }

        let done = settings.count != 0 && tally.sent >= settings.count;
        if !done {
            let pause = settings.interval.saturating_sub(started.elapsed());
            tokio::select! {
                _ = &mut interrupt => break,
                _ = tokio::time::sleep_until((Instant::now() + pause).min(deadline)) => {}
            }
        }
    }

    let stats = tally.statistics(addr);
    handler.on_finish(&stats);
    Ok(PingOutcome::Finished(stats))
}

async fn resolve(host: &str) -> Option<IpAddr> {
    match lookup_host((host, 0)).await {
        Ok(mut addrs) => addrs.next().map(|addr| addr.ip()),
        Err(e) => {
            debug!(verbosity = 1, "Lookup of {host} failed: {e}");
            None
        }
    }
}

fn packet_size(packet: &IcmpPacket) -> usize {
    match packet {
        IcmpPacket::V4(packet) => packet.get_size(),
        IcmpPacket::V6(packet) => packet.get_size(),
    }
}
