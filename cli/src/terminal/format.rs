// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Plain-text rendering of scan and DNS results.
//!
//! The renderers never reorder: blocks come out in the order the dispatchers
//! returned them. Output is uncoloured so it can be piped and diffed.

use std::fmt::{Display, Write};

use netscan_common::models::dns::{Answer, DnsRecordResult, RecordKind};
use netscan_common::models::network::Network;
use netscan_common::models::scan::{HostOutcome, ScanResult, StateFilter};

const NOT_FOUND: &str = "\tNot Found\n";
const LABEL_WIDTH: usize = 8;
const VALUE_WIDTH: usize = 40;
const PLACEHOLDER: &str = "-";

/// `<host>:` followed by one `<tab><port>/<network>: <state>` line per
/// port that passes `filter`, then a blank line.
pub fn render_scan(results: &[ScanResult], network: Network, filter: StateFilter) -> String {
    let mut out = String::new();
    for result in results {
        let _ = writeln!(out, "{}:", result.host);
        match &result.outcome {
            HostOutcome::NotFound => out.push_str(NOT_FOUND),
            HostOutcome::Probed(ports) => {
                for status in ports.iter().filter(|s| filter.matches(s.state)) {
                    let _ = writeln!(out, "\t{}/{}: {}", status.port, network, status.state);
                }
            }
        }
        out.push('\n');
    }
    out
}

/// `Host: <host>` followed by the requested records in kind order.
///
/// Kinds that were not requested produce no line. A requested kind without
/// records produces a single placeholder line carrying the lookup error, if
/// there was one.
pub fn render_dns(results: &[DnsRecordResult]) -> String {
    let mut out = String::new();
    for result in results {
        let _ = writeln!(out, "Host: {}", result.host);
        if result.not_found {
            out.push_str(NOT_FOUND);
            out.push('\n');
            continue;
        }

        if let Some(cname) = &result.cname {
            push_record(&mut out, RecordKind::Cname, cname, None);
        }
        push_answer(&mut out, RecordKind::Ip4, result.ipv4.as_ref());
        push_answer(&mut out, RecordKind::Ip6, result.ipv6.as_ref());
        push_answer(&mut out, RecordKind::Ns, result.ns.as_ref());
        push_answer(&mut out, RecordKind::Mx, result.mx.as_ref());
        push_answer(&mut out, RecordKind::Txt, result.txt.as_ref());
        out.push('\n');
    }
    out
}

fn push_answer<T: Display>(out: &mut String, kind: RecordKind, answer: Option<&Answer<T>>) {
    let Some(answer) = answer else {
        return;
    };
    if answer.records.is_empty() {
        push_record(out, kind, &PLACEHOLDER, answer.error.as_deref());
        return;
    }
    for record in &answer.records {
        push_record(out, kind, record, answer.error.as_deref());
    }
}

fn push_record(out: &mut String, kind: RecordKind, value: &dyn Display, error: Option<&str>) {
    let suffix = error.map(|e| format!("error: {e}")).unwrap_or_default();
    let line = format!(
        "\t{:<LABEL_WIDTH$}{:<VALUE_WIDTH$}{suffix}",
        kind.label(),
        value.to_string()
    );
    out.push_str(line.trim_end());
    out.push('\n');
}
