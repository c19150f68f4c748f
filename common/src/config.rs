// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Configuration
//!
//! [`Config`] holds the process-wide UI options and the host file location.
//! [`FileConfig`] is the optional TOML file that supplies defaults for any
//! flag the user did not pass on the command line.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::{debug, info};

pub const DEFAULT_HOST_FILE: &str = "net-scan.hosts";
pub const DEFAULT_CONFIG_NAME: &str = ".net-scan.toml";

/// Global configuration options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct Config {
    /// File the host list is loaded from and saved to.
    pub hosts_file: PathBuf,

    /// Toggles the display of the startup banner.
    pub no_banner: bool,

    /// Controls the visual density of decorations written to stderr.
    ///
    /// # Levels
    /// * **0** (Default): Banner, headers and spinner.
    /// * **1+**: Results only. Logs still appear.
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hosts_file: PathBuf::from(DEFAULT_HOST_FILE),
            no_banner: false,
            quiet: 0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub file: Option<PathBuf>,
    pub scan: ScanSection,
    pub dns: DnsSection,
    pub ping: PingSection,
    pub http: HttpSection,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScanSection {
    pub ports: Option<Vec<i64>>,
    pub port_range: Option<String>,
    pub network: Option<String>,
    pub timeout: Option<i64>,
    pub filter_state: Option<String>,
    pub concurrency: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DnsSection {
    pub search: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PingSection {
    pub count: Option<u32>,
    pub size: Option<i64>,
    pub interval_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub ttl: Option<i64>,
    pub iface: Option<String>,
    pub privileged: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HttpSection {
    pub call_frequency_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub secure: Option<bool>,
    pub count: Option<u64>,
}

impl FileConfig {
    /// Loads the config file.
    ///
    /// An explicit `path` must exist. Without one, `$HOME/.net-scan.toml` is
    /// used when present and an empty config otherwise.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            return Self::read(path);
        }

        let Some(home) = std::env::var_os("HOME") else {
            return Ok(Self::default());
        };
        let default_path = PathBuf::from(home).join(DEFAULT_CONFIG_NAME);
        if !default_path.is_file() {
            debug!(verbosity = 1, "No config file at {}", default_path.display());
            return Ok(Self::default());
        }
        Self::read(&default_path)
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let cfg = Self::parse(&raw).with_context(|| format!("parsing {}", path.display()))?;
        info!("Using config file: {}", path.display());
        Ok(cfg)
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }
}
