// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # HTTP Prober
//!
//! Polls a single host with `GET` requests at a fixed frequency and hands
//! every response (or request error) to an [`HttpHandler`].

use std::time::Duration;

use netscan_common::debug;
use netscan_common::error::NetScanError;
use tokio::net::lookup_host;
use tokio::time::{Instant, MissedTickBehavior};

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub secure: bool,
    pub call_frequency: Duration,
    pub timeout: Duration,
    /// Number of requests per host; 0 polls until interrupted.
    pub count: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            secure: true,
            call_frequency: Duration::from_secs(1),
            timeout: Duration::from_secs(5),
            count: 0,
        }
    }
}

impl HttpSettings {
    pub fn validate(&self) -> Result<(), NetScanError> {
        if self.call_frequency.is_zero() {
            return Err(NetScanError::InvalidValue(
                "call-frequency must be > 0".into(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(NetScanError::InvalidValue("timeout must be > 0".into()));
        }
        Ok(())
    }

    pub fn url_for(&self, host: &str) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{scheme}://{host}")
    }
}

pub trait HttpHandler {
    fn on_response(&mut self, status: u16, latency: Duration);
    fn on_error(&mut self, error: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpOutcome {
    NotFound,
    Finished { requests: u64 },
}

/// Strips an optional `:port` so the name can be resolved on its own.
fn host_part(host: &str) -> &str {
    if host.starts_with('[') {
        return host
            .split_once(']')
            .map_or(host, |(addr, _)| addr.trim_start_matches('['));
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !name.contains(':') && port.parse::<u16>().is_ok() => name,
        _ => host,
    }
}

pub async fn run<H: HttpHandler>(
    host: &str,
    settings: &HttpSettings,
    handler: &mut H,
) -> anyhow::Result<HttpOutcome> {
    if let Err(e) = lookup_host((host_part(host), 0)).await {
        debug!(verbosity = 1, "Lookup of {host} failed: {e}");
        return Ok(HttpOutcome::NotFound);
    }

    let client = reqwest::Client::builder()
        .timeout(settings.timeout)
        .build()?;
    let url = settings.url_for(host);

    let mut ticker = tokio::time::interval(settings.call_frequency);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);

    let mut requests: u64 = 0;
    while settings.count == 0 || requests < settings.count {
        tokio::select! {
            _ = &mut interrupt => break,
            _ = ticker.tick() => {}
        }

        let started = Instant::now();
        requests += 1;
        tokio::select! {
            _ = &mut interrupt => break,
            res = client.get(&url).send() => match res {
                Ok(resp) => handler.on_response(resp.status().as_u16(), started.elapsed()),
                Err(e) => handler.on_error(&e.to_string()),
            },
        }
    }

    Ok(HttpOutcome::Finished { requests })
}
