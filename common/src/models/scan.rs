// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Scan Result Model
//!
//! A scan produces one [`ScanResult`] per host. A host either failed name
//! resolution ([`HostOutcome::NotFound`]) or carries exactly one
//! [`PortStatus`] per probed port, in ascending port order.

use std::fmt;
use std::str::FromStr;

use crate::error::NetScanError;

/// Classification of a single connection attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortState {
    /// The connection was established (and immediately released).
    Open,
    /// The peer refused, or the dial failed for a reason other than the deadline.
    Closed,
    /// The attempt did not complete before the deadline.
    Timeout,
}

impl PortState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PortState::Open => "open",
            PortState::Closed => "closed",
            PortState::Timeout => "timeout",
        }
    }
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional restriction of the printed port lines to one state.
///
/// An empty string means "no filter".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateFilter(Option<PortState>);

impl StateFilter {
    pub fn only(state: PortState) -> Self {
        Self(Some(state))
    }

    pub fn matches(&self, state: PortState) -> bool {
        self.0.is_none_or(|wanted| wanted == state)
    }
}

impl FromStr for StateFilter {
    type Err = NetScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(Self(None)),
            "open" => Ok(Self::only(PortState::Open)),
            "closed" => Ok(Self::only(PortState::Closed)),
            "timeout" => Ok(Self::only(PortState::Timeout)),
            other => Err(NetScanError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortStatus {
    pub port: u16,
    pub state: PortState,
}

impl PortStatus {
    pub fn new(port: u16, state: PortState) -> Self {
        Self { port, state }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOutcome {
    NotFound,
    Probed(Vec<PortStatus>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub host: String,
    pub outcome: HostOutcome,
}

impl ScanResult {
    pub fn not_found(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            outcome: HostOutcome::NotFound,
        }
    }

    pub fn probed(host: impl Into<String>, ports: Vec<PortStatus>) -> Self {
        Self {
            host: host.into(),
            outcome: HostOutcome::Probed(ports),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.outcome, HostOutcome::NotFound)
    }

    /// Port states of a resolved host; empty for `NotFound`.
    pub fn ports(&self) -> &[PortStatus] {
        match &self.outcome {
            HostOutcome::NotFound => &[],
            HostOutcome::Probed(ports) => ports,
        }
    }
}
