// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::time::{Duration, Instant};

use colored::*;
use netscan_common::config::{Config, ScanSection};
use netscan_common::error::NetScanError;
use netscan_common::models::network::Network;
use netscan_common::models::port::PortSet;
use netscan_common::models::scan::StateFilter;
use netscan_core::scanner::{self, DEFAULT_CONCURRENCY, ScanSettings};
use tracing::info_span;

use crate::commands::{ScanArgs, load_existing_hosts};
use crate::terminal::{colors, format, print::Print, spinner::SpinnerGuard};

pub const DEFAULT_TIMEOUT_MS: i64 = 1000;

pub async fn scan(args: &ScanArgs, file: &ScanSection, cfg: &Config) -> anyhow::Result<()> {
    let (settings, filter) = resolve_settings(args, file)?;
    let hosts = load_existing_hosts(cfg)?;

    Print::header("scanning ports");
    let start_time = Instant::now();
    let results = {
        let _guard = (cfg.quiet == 0).then(run_spinner);
        scanner::scan(hosts.hosts(), &settings).await
    };

    print!("{}", format::render_scan(&results, settings.network, filter));
    Print::summary("hosts scanned", results.len(), start_time.elapsed());
    Ok(())
}

/// Merges flags over the config file and validates the outcome.
pub fn resolve_settings(
    args: &ScanArgs,
    file: &ScanSection,
) -> Result<(ScanSettings, StateFilter), NetScanError> {
    let explicit: &[i64] = if args.ports.is_empty() {
        file.ports.as_deref().unwrap_or_default()
    } else {
        &args.ports
    };
    let range = args.port_range.as_deref().or(file.port_range.as_deref());
    let ports = PortSet::resolve(explicit, range)?;

    let network: Network = match args.network.as_deref().or(file.network.as_deref()) {
        Some(name) => name.parse()?,
        None => Network::default(),
    };

    let timeout_ms = args.timeout.or(file.timeout).unwrap_or(DEFAULT_TIMEOUT_MS);
    if timeout_ms < 1 {
        return Err(NetScanError::InvalidValue(format!(
            "timeout must be at least 1ms, got {timeout_ms}"
        )));
    }

    let filter: StateFilter = args
        .filter_state
        .as_deref()
        .or(file.filter_state.as_deref())
        .unwrap_or_default()
        .parse()?;

    let concurrency = args
        .concurrency
        .or(file.concurrency)
        .unwrap_or(DEFAULT_CONCURRENCY);
    if concurrency == 0 {
        return Err(NetScanError::InvalidValue(
            "concurrency must be at least 1".to_string(),
        ));
    }

    let settings = ScanSettings {
        ports,
        network,
        timeout: Duration::from_millis(timeout_ms as u64),
        concurrency,
    };
    Ok((settings, filter))
}

fn run_spinner() -> SpinnerGuard {
    let span = info_span!("scan", indicatif.pb_show = true);
    let _enter = span.enter();

    SpinnerGuard::with_status(span.clone(), || {
        let count = scanner::get_probe_count();
        let label = if count == 1 { "port" } else { "ports" };
        format!("Probed {} {} so far...", count.to_string().green().bold(), label)
            .color(colors::TEXT_DEFAULT)
            .italic()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use netscan_common::models::scan::PortState;

    #[test]
    fn flags_override_config_file() {
        let args = ScanArgs {
            ports: vec![443],
            network: Some("udp".into()),
            ..Default::default()
        };
        let file = ScanSection {
            ports: Some(vec![22]),
            port_range: Some("80-81".into()),
            network: Some("tcp6".into()),
            timeout: Some(250),
            ..Default::default()
        };

        let (settings, filter) = resolve_settings(&args, &file).unwrap();
        assert_eq!(settings.ports.as_slice(), &[80, 81, 443]);
        assert_eq!(settings.network, Network::Udp);
        assert_eq!(settings.timeout, Duration::from_millis(250));
        assert_eq!(settings.concurrency, DEFAULT_CONCURRENCY);
        assert!(filter.matches(PortState::Timeout));
    }

    #[test]
    fn missing_ports_is_empty_error() {
        let err = resolve_settings(&ScanArgs::default(), &ScanSection::default()).unwrap_err();
        assert!(matches!(err, NetScanError::Empty(_)));
    }

    #[test]
    fn invalid_values_are_rejected_before_scanning() {
        let base = || ScanArgs {
            ports: vec![80],
            ..Default::default()
        };
        let cases = [
            ScanArgs {
                timeout: Some(0),
                ..base()
            },
            ScanArgs {
                filter_state: Some("filtered".into()),
                ..base()
            },
            ScanArgs {
                network: Some("sctp".into()),
                ..base()
            },
            ScanArgs {
                concurrency: Some(0),
                ..base()
            },
        ];
        for args in cases {
            let err = resolve_settings(&args, &ScanSection::default()).unwrap_err();
            assert!(matches!(err, NetScanError::InvalidValue(_)), "{args:?}");
        }
    }
}
