// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::io::{self, Write};
use std::net::IpAddr;
use std::time::Duration;

use netscan_common::config::{Config, PingSection};
use netscan_common::error::NetScanError;
use netscan_core::ping::{
    self, MAX_PAYLOAD, PingHandler, PingOutcome, PingReply, PingSettings, PingStatistics,
};

use crate::commands::{PingArgs, load_required_hosts};
use crate::terminal::print::Print;

pub async fn ping(args: &PingArgs, file: &PingSection, cfg: &Config) -> anyhow::Result<()> {
    let settings = resolve_settings(args, file)?;
    let hosts = load_required_hosts(cfg)?;

    Print::header("pinging hosts");
    let mut printer = ReplyPrinter { out: io::stdout() };
    for host in &hosts {
        if let PingOutcome::NotFound = ping::run(host, &settings, &mut printer).await? {
            printer.line(format_args!("{host}:\n\tNot Found\n"));
        }
    }
    Ok(())
}

pub fn resolve_settings(args: &PingArgs, file: &PingSection) -> Result<PingSettings, NetScanError> {
    let defaults = PingSettings::default();

    let size = args.size.or(file.size).unwrap_or(defaults.size as i64);
    if !(0..=MAX_PAYLOAD as i64).contains(&size) {
        return Err(NetScanError::InvalidValue(format!(
            "size must be between 0 and {MAX_PAYLOAD}, got {size}"
        )));
    }
    let ttl = args.ttl.or(file.ttl).unwrap_or(i64::from(defaults.ttl));
    if !(1..=255).contains(&ttl) {
        return Err(NetScanError::InvalidValue(format!(
            "ttl must be between 1 and 255, got {ttl}"
        )));
    }

    let settings = PingSettings {
        count: args.count.or(file.count).unwrap_or(defaults.count),
        size: size as usize,
        interval: args
            .interval
            .or(file.interval_ms.map(Duration::from_millis))
            .unwrap_or(defaults.interval),
        timeout: args
            .timeout
            .or(file.timeout_ms.map(Duration::from_millis))
            .unwrap_or(defaults.timeout),
        ttl: ttl as u32,
        interface: args.iface.clone().or_else(|| file.iface.clone()),
        privileged: args.privileged || file.privileged.unwrap_or(false),
    };
    settings.validate()?;
    Ok(settings)
}

struct ReplyPrinter<W: Write> {
    out: W,
}

impl<W: Write> ReplyPrinter<W> {
    fn line(&mut self, args: std::fmt::Arguments<'_>) {
        let _ = writeln!(self.out, "{args}");
    }
}

impl<W: Write> PingHandler for ReplyPrinter<W> {
    fn on_start(&mut self, host: &str, addr: IpAddr) {
        self.line(format_args!("PING {host} ({addr}):"));
    }

    fn on_recv(&mut self, reply: &PingReply) {
        self.line(format_args!(
            "\t{} bytes from {}: icmp_seq={} time={:?}",
            reply.bytes, reply.addr, reply.seq, reply.rtt
        ));
    }

    fn on_finish(&mut self, stats: &PingStatistics) {
        self.line(format_args!("\n\t--- {} ping statistics ---", stats.addr));
        self.line(format_args!(
            "\t{} packets transmitted, {} packets received, {:.1}% packet loss",
            stats.sent,
            stats.received,
            stats.packet_loss()
        ));
        self.line(format_args!(
            "\tround-trip min/avg/max/stddev = {:?}/{:?}/{:?}/{:?}\n",
            stats.min_rtt, stats.avg_rtt, stats.max_rtt, stats.stddev_rtt
        ));
        let _ = self.out.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn config_file_fills_missing_flags() {
        let args = PingArgs {
            count: Some(2),
            ..Default::default()
        };
        let file = PingSection {
            count: Some(9),
            interval_ms: Some(200),
            ttl: Some(32),
            ..Default::default()
        };
        let settings = resolve_settings(&args, &file).unwrap();
        assert_eq!(settings.count, 2);
        assert_eq!(settings.interval, Duration::from_millis(200));
        assert_eq!(settings.ttl, 32);
        assert_eq!(settings.size, 56);
    }

    #[test]
    fn out_of_range_values_fail() {
        for args in [
            PingArgs {
                size: Some(-1),
                ..Default::default()
            },
            PingArgs {
                size: Some(65501),
                ..Default::default()
            },
            PingArgs {
                ttl: Some(256),
                ..Default::default()
            },
            PingArgs {
                interval: Some(Duration::ZERO),
                ..Default::default()
            },
        ] {
            assert!(resolve_settings(&args, &PingSection::default()).is_err());
        }
    }

    #[test]
    fn statistics_block_layout() {
        let mut printer = ReplyPrinter { out: Vec::new() };
        let addr = IpAddr::V4(Ipv4Addr::LOCALHOST);
        printer.on_start("localhost", addr);
        printer.on_recv(&PingReply {
            bytes: 64,
            addr,
            seq: 0,
            rtt: Duration::from_millis(1),
        });
        printer.on_finish(&PingStatistics::from_rtts(addr, 2, &[Duration::from_millis(1)]));

        let text = String::from_utf8(printer.out).unwrap();
        assert!(text.starts_with(
            "PING localhost (127.0.0.1):\n\t64 bytes from 127.0.0.1: icmp_seq=0 time=1ms\n"
        ));
        assert!(text.contains("\n\t--- 127.0.0.1 ping statistics ---\n"));
        assert!(
            text.contains("\t2 packets transmitted, 1 packets received, 50.0% packet loss\n")
        );
    }
}
