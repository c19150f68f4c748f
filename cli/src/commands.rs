// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Command Line Interface Definitions
//!
//! The argument schema lives here; each subcommand's execution lives in its
//! own submodule. Every value a config file may also provide is an `Option`
//! so that a missing flag falls through to the file and then to the built-in
//! default.

pub mod dns;
pub mod host;
pub mod http;
pub mod ping;
pub mod scan;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use netscan_common::config::{Config, DEFAULT_HOST_FILE, FileConfig};
use netscan_common::error::NetScanError;
use netscan_common::models::host::HostList;

#[derive(Parser)]
#[command(name = "net-scan", version)]
#[command(about = "Port scans, DNS lookups, pings and HTTP checks over a list of hosts.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Host file to read and write [default: net-scan.hosts]
    #[arg(short = 'f', long = "file", global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// TOML config file [default: $HOME/.net-scan.toml]
    #[arg(long = "config", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Keep logs and colors but hide the banner
    #[arg(long = "no-banner", global = true)]
    pub no_banner: bool,

    /// Hide banner, headers and the spinner
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Increase logging detail
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan ports on every host in the host file
    #[command(alias = "s")]
    Scan(ScanArgs),

    /// Look up DNS records of every host in the host file
    Dns(DnsArgs),

    /// Send ICMP echo requests to every host in the host file
    Ping(PingArgs),

    /// Poll every host in the host file over HTTP(S)
    Http(HttpArgs),

    /// Manage the host file
    Host {
        #[command(subcommand)]
        action: HostAction,
    },
}

impl Commands {
    /// Prefix of the error line printed when the command fails.
    pub fn error_prefix(&self) -> &'static str {
        match self {
            Self::Scan(_) => "Scan Error:",
            Self::Dns(_) => "DNS Error:",
            Self::Ping(_) => "Ping Error:",
            Self::Http(_) => "HTTP Error:",
            Self::Host { .. } => "Host Error:",
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    /// Ports to scan, comma separated
    #[arg(short = 'p', long = "ports", value_delimiter = ',', allow_negative_numbers = true)]
    pub ports: Vec<i64>,

    /// Inclusive port range, e.g. 20-25
    #[arg(short = 'r', long = "port-range", value_name = "START-END")]
    pub port_range: Option<String>,

    /// tcp, tcp4, tcp6, udp, udp4, udp6, ip, ip4, ip6, unix, unixgram, unixpacket [default: tcp]
    #[arg(short = 'n', long = "network")]
    pub network: Option<String>,

    /// Connection timeout in milliseconds [default: 1000]
    #[arg(short = 't', long = "timeout", allow_negative_numbers = true)]
    pub timeout: Option<i64>,

    /// Only print ports in this state: open, closed or timeout
    #[arg(short = 's', long = "filter-state")]
    pub filter_state: Option<String>,

    /// Maximum number of simultaneous connection attempts [default: 512]
    #[arg(long = "concurrency")]
    pub concurrency: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub struct DnsArgs {
    /// Record kinds to query: cname, ip4, ip6, ns, mx, txt [default: all]
    #[arg(short = 's', long = "search", value_delimiter = ',')]
    pub search: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub struct PingArgs {
    /// Overall time limit per host, e.g. 10s [default: 10s]
    #[arg(short = 't', long = "timeout", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Wait between echo requests [default: 1s]
    #[arg(short = 'i', long = "interval", value_parser = parse_duration)]
    pub interval: Option<Duration>,

    /// Echo requests per host, 0 runs until interrupted [default: 4]
    #[arg(short = 'c', long = "count")]
    pub count: Option<u32>,

    /// Payload size in bytes [default: 56]
    #[arg(short = 's', long = "size", allow_negative_numbers = true)]
    pub size: Option<i64>,

    /// Time to live [default: 64]
    #[arg(short = 'l', long = "ttl", allow_negative_numbers = true)]
    pub ttl: Option<i64>,

    /// Interface to send from
    #[arg(short = 'I', long = "iface")]
    pub iface: Option<String>,

    /// Use a raw socket instead of an unprivileged datagram socket
    #[arg(long = "privileged")]
    pub privileged: bool,
}

#[derive(Args, Debug, Default)]
pub struct HttpArgs {
    /// Time between requests per host [default: 1s]
    #[arg(short = 'r', long = "call-frequency", value_parser = parse_duration)]
    pub call_frequency: Option<Duration>,

    /// Request timeout [default: 5s]
    #[arg(short = 't', long = "timeout", value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Use https:// instead of http:// [default: true]
    #[arg(short = 's', long = "secure", num_args = 0..=1, default_missing_value = "true")]
    pub secure: Option<bool>,

    /// Requests per host, 0 polls until interrupted [default: 0]
    #[arg(short = 'c', long = "count")]
    pub count: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum HostAction {
    /// Add hosts (also reads one per line from piped stdin)
    #[command(alias = "a")]
    Add {
        #[arg(value_name = "HOSTS")]
        hosts: Vec<String>,
    },
    /// Delete hosts (also reads one per line from piped stdin)
    #[command(alias = "d")]
    Delete {
        #[arg(value_name = "HOSTS")]
        hosts: Vec<String>,
    },
    /// Print every stored host
    #[command(alias = "l")]
    List,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Builds the global [`Config`]; the host file comes from `--file`, then
    /// the config file, then the default name.
    pub fn to_config(&self, file_cfg: &FileConfig) -> Config {
        Config {
            hosts_file: self
                .file
                .clone()
                .or_else(|| file_cfg.file.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HOST_FILE)),
            no_banner: self.no_banner,
            quiet: self.quiet,
        }
    }
}

/// Accepts `500ms`, `10s`, `2m` or a bare number of seconds.
pub fn parse_duration(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    let split = raw.find(|c: char| !c.is_ascii_digit() && c != '.').unwrap_or(raw.len());
    let (number, unit) = raw.split_at(split);
    let value: f64 = number
        .parse()
        .map_err(|_| format!("invalid duration '{raw}'"))?;

    let secs = match unit {
        "ms" => value / 1000.0,
        "" | "s" => value,
        "m" => value * 60.0,
        "h" => value * 3600.0,
        _ => return Err(format!("unknown duration unit '{unit}' in '{raw}'")),
    };
    Duration::try_from_secs_f64(secs).map_err(|e| format!("invalid duration '{raw}': {e}"))
}

/// Loads the host file, failing when it does not exist.
pub fn load_existing_hosts(cfg: &Config) -> anyhow::Result<HostList> {
    if !cfg.hosts_file.is_file() {
        return Err(NetScanError::HostFileMissing(cfg.hosts_file.clone()).into());
    }
    let mut hosts = HostList::new();
    hosts
        .load(&cfg.hosts_file)
        .with_context(|| format!("loading {}", cfg.hosts_file.display()))?;
    Ok(hosts)
}

/// Like [`load_existing_hosts`] but also rejects an empty list.
pub fn load_required_hosts(cfg: &Config) -> anyhow::Result<HostList> {
    let hosts = load_existing_hosts(cfg)?;
    if hosts.is_empty() {
        return Err(NetScanError::EmptyHostFile(cfg.hosts_file.clone()).into());
    }
    Ok(hosts)
}

/// True when stdin is a pipe or file rather than an interactive terminal.
pub fn stdin_is_piped() -> bool {
    !std::io::stdin().is_terminal()
}
