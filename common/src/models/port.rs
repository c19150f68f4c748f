// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Port Set Resolution
//!
//! Merges an explicit port list and an optional `start-end` range into one
//! deduplicated, ascending [`PortSet`].

use std::collections::BTreeSet;

use crate::debug;
use crate::error::NetScanError;

pub const MIN_PORT: i64 = 1;
pub const MAX_PORT: i64 = u16::MAX as i64;

/// A deduplicated, strictly ascending collection of ports in `1..=65535`.
///
/// The only way to obtain a non-empty set is [`PortSet::resolve`], so every
/// value of this type upholds the invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortSet {
    ports: Vec<u16>,
}

/// An inclusive port range parsed from `"<start>-<end>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    pub start: u16,
    pub end: u16,
}

impl PortRange {
    pub fn iter(&self) -> impl Iterator<Item = u16> {
        self.start..=self.end
    }

    pub fn len(&self) -> usize {
        usize::from(self.end - self.start) + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl std::str::FromStr for PortRange {
    type Err = NetScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // Skip the first char so a leading minus stays part of the start value.
        let split_at = s
            .char_indices()
            .skip(1)
            .find(|(_, c)| *c == '-')
            .map(|(idx, _)| idx)
            .ok_or_else(|| NetScanError::InvalidFormat(s.to_string()))?;

        let parse = |part: &str| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| NetScanError::InvalidFormat(s.to_string()))
        };
        let start = parse(&s[..split_at])?;
        let end = parse(&s[split_at + 1..])?;

        if start < MIN_PORT || end < MIN_PORT || start >= end || end > MAX_PORT {
            return Err(NetScanError::InvalidValue(s.to_string()));
        }

        Ok(Self {
            start: start as u16,
            end: end as u16,
        })
    }
}

impl PortSet {
    /// Builds the union of `explicit` and the inclusive range in `range_spec`.
    ///
    /// # Errors
    /// * [`NetScanError::Empty`] if neither source yields anything to scan.
    /// * [`NetScanError::InvalidValue`] for a port outside `1..=65535` or a
    ///   range with `start >= end`.
    /// * [`NetScanError::InvalidFormat`] for a range that isn't `<int>-<int>`.
    pub fn resolve(explicit: &[i64], range_spec: Option<&str>) -> Result<Self, NetScanError> {
        let range_spec = range_spec.map(str::trim).filter(|spec| !spec.is_empty());

        if explicit.is_empty() && range_spec.is_none() {
            return Err(NetScanError::Empty(
                "either --ports or --port-range must be set".to_string(),
            ));
        }

        let mut unique: BTreeSet<u16> = BTreeSet::new();
        for &port in explicit {
            if !(MIN_PORT..=MAX_PORT).contains(&port) {
                return Err(NetScanError::InvalidValue(port.to_string()));
            }
            unique.insert(port as u16);
        }

        if let Some(spec) = range_spec {
            let range: PortRange = spec.parse()?;
            debug!(
                verbosity = 2,
                "Adding port range {} - {} ({} ports)",
                range.start,
                range.end,
                range.len()
            );
            unique.extend(range.iter());
        }

        Ok(Self {
            ports: unique.into_iter().collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.ports
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.ports.iter().copied()
    }
}

impl<'a> IntoIterator for &'a PortSet {
    type Item = &'a u16;
    type IntoIter = std::slice::Iter<'a, u16>;

    fn into_iter(self) -> Self::IntoIter {
        self.ports.iter()
    }
}

// ╔══════════════════════════════════════════════╗
// ║                    TESTS                     ║
// ╚══════════════════════════════════════════════╝
