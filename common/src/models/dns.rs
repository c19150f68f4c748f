// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # DNS Result Model
//!
//! A record field is `None` when its kind was not requested, and `Some` when
//! it was, even if the answer came back empty or with an error.

use std::collections::BTreeSet;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::error::NetScanError;

/// Record categories the DNS dispatcher can be asked for.
///
/// The declaration order is the order records are printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordKind {
    Cname,
    Ip4,
    Ip6,
    Ns,
    Mx,
    Txt,
}

impl RecordKind {
    pub const ALL: [RecordKind; 6] = [
        RecordKind::Cname,
        RecordKind::Ip4,
        RecordKind::Ip6,
        RecordKind::Ns,
        RecordKind::Mx,
        RecordKind::Txt,
    ];

    /// Name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Cname => "cname",
            RecordKind::Ip4 => "ip4",
            RecordKind::Ip6 => "ip6",
            RecordKind::Ns => "ns",
            RecordKind::Mx => "mx",
            RecordKind::Txt => "txt",
        }
    }

    /// Record type label used in output.
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Cname => "CNAME",
            RecordKind::Ip4 => "A",
            RecordKind::Ip6 => "AAAA",
            RecordKind::Ns => "NS",
            RecordKind::Mx => "MX",
            RecordKind::Txt => "TXT",
        }
    }

    /// Parses a list such as `["cname", "mx,txt"]` into a set.
    pub fn parse_search<S: AsRef<str>>(inputs: &[S]) -> Result<BTreeSet<RecordKind>, NetScanError> {
        let mut kinds = BTreeSet::new();
        for part in inputs
            .iter()
            .flat_map(|input| input.as_ref().split(','))
            .map(str::trim)
            .filter(|part| !part.is_empty())
        {
            kinds.insert(part.parse()?);
        }

        if kinds.is_empty() {
            return Err(NetScanError::Empty(
                "--search needs at least one record kind".to_string(),
            ));
        }
        Ok(kinds)
    }
}

impl FromStr for RecordKind {
    type Err = NetScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        RecordKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| NetScanError::InvalidValue(s.to_string()))
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxRecord {
    pub host: String,
    pub preference: u16,
}

impl fmt::Display for MxRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.host, self.preference)
    }
}

/// Records of one kind plus the lookup error, if it was kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer<T> {
    pub records: Vec<T>,
    pub error: Option<String>,
}

impl<T> Answer<T> {
    pub fn records(records: Vec<T>) -> Self {
        Self {
            records,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            error: Some(error.into()),
        }
    }

    /// An answer whose error is dropped on purpose.
    pub fn empty() -> Self {
        Self::records(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DnsRecordResult {
    pub host: String,
    pub not_found: bool,
    pub cname: Option<String>,
    pub ipv4: Option<Answer<Ipv4Addr>>,
    pub ipv6: Option<Answer<Ipv6Addr>>,
    pub ns: Option<Answer<String>>,
    pub mx: Option<Answer<MxRecord>>,
    pub txt: Option<Answer<String>>,
}

impl DnsRecordResult {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn not_found(host: impl Into<String>) -> Self {
        Self {
            not_found: true,
            ..Self::new(host)
        }
    }
}
