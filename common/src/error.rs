// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Error Taxonomy
//!
//! Validation and host-list errors shared by every subcommand.
//!
//! Network failures while probing are *not* represented here: they are
//! classified into a [`PortState`](crate::models::scan::PortState) or a
//! `NotFound` flag and never abort a batch.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetScanError {
    /// A required input or flag was not provided.
    #[error("flag not set: {0}")]
    Empty(String),

    /// A value lies outside of its allowed domain.
    #[error("invalid flag value: {0}")]
    InvalidValue(String),

    /// A value could not be parsed at all (e.g. a malformed port range).
    #[error("invalid flag value format: {0}")]
    InvalidFormat(String),

    #[error("host already in the list: {0}")]
    HostExists(String),

    #[error("host does not exist in the list: {0}")]
    HostNotExists(String),

    #[error("host file not found: {}", .0.display())]
    HostFileMissing(PathBuf),

    #[error("host file is empty: {}", .0.display())]
    EmptyHostFile(PathBuf),
}

/// Checks whether an `anyhow` error chain carries the given domain error.
pub fn is(err: &anyhow::Error, expected: &NetScanError) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<NetScanError>())
        .any(|found| std::mem::discriminant(found) == std::mem::discriminant(expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_matches_variant_regardless_of_payload() {
        let err = anyhow::Error::new(NetScanError::InvalidValue("70000".into()));
        assert!(is(&err, &NetScanError::InvalidValue(String::new())));
        assert!(!is(&err, &NetScanError::Empty(String::new())));
    }

    #[test]
    fn is_looks_through_context() {
        let err = anyhow::Error::new(NetScanError::HostExists("a".into())).context("adding host");
        assert!(is(&err, &NetScanError::HostExists(String::new())));
    }
}
