// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::collections::BTreeSet;
use std::time::Instant;

use netscan_common::config::{Config, DnsSection};
use netscan_common::error::NetScanError;
use netscan_common::models::dns::RecordKind;
use netscan_common::models::host::HostList;
use netscan_core::dns;

use crate::commands::DnsArgs;
use crate::terminal::{format, print::Print};

pub async fn dns(args: &DnsArgs, file: &DnsSection, cfg: &Config) -> anyhow::Result<()> {
    let kinds = resolve_kinds(args, file)?;

    let mut hosts = HostList::new();
    hosts.load(&cfg.hosts_file)?;

    Print::header("resolving records");
    let start_time = Instant::now();
    let results = dns::lookup(hosts.hosts(), &kinds).await;

    print!("{}", format::render_dns(&results));
    Print::summary("hosts resolved", results.len(), start_time.elapsed());
    Ok(())
}

/// `--search` wins over the config file; with neither, every kind is queried.
pub fn resolve_kinds(
    args: &DnsArgs,
    file: &DnsSection,
) -> Result<BTreeSet<RecordKind>, NetScanError> {
    if !args.search.is_empty() {
        return RecordKind::parse_search(&args.search);
    }
    match &file.search {
        Some(search) => RecordKind::parse_search(search),
        None => Ok(RecordKind::ALL.into_iter().collect()),
    }
}
