// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

#![cfg(test)]
use std::fs;

use netscan_common::error::{self, NetScanError};
use netscan_common::models::host::HostList;

use crate::utils::TempHostFile;

#[test]
fn saved_hosts_load_back_sorted() {
    let file = TempHostFile::new("roundtrip");

    let mut list = HostList::new();
    list.add("b.example").unwrap();
    list.add("a.example").unwrap();
    list.save(file.path()).unwrap();

    let mut reloaded = HostList::new();
    reloaded.load(file.path()).unwrap();
    assert_eq!(reloaded.hosts(), ["a.example", "b.example"]);
    assert_eq!(
        fs::read_to_string(file.path()).unwrap(),
        "a.example\nb.example\n"
    );
}

#[test]
fn missing_file_loads_as_empty_list() {
    let file = TempHostFile::new("missing");
    let mut list = HostList::new();
    list.load(file.path()).unwrap();
    assert!(list.is_empty());
}

#[test]
fn hand_written_file_is_deduplicated() {
    let file = TempHostFile::new("handwritten");
    fs::write(file.path(), "zeta\n\nalpha\nzeta\n  \nbeta").unwrap();

    let mut list = HostList::new();
    list.load(file.path()).unwrap();
    assert_eq!(list.hosts(), ["alpha", "beta", "zeta"]);
}

#[test]
fn mutation_conflicts_surface_domain_errors() {
    let mut list = HostList::new();
    list.add("a").unwrap();

    let dup = anyhow::Error::from(list.add("a").unwrap_err());
    assert!(error::is(&dup, &NetScanError::HostExists(String::new())));

    let mut empty = HostList::new();
    let missing = anyhow::Error::from(empty.remove("z").unwrap_err());
    assert!(error::is(&missing, &NetScanError::HostNotExists(String::new())));
}
