// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::io::{self, Write};
use std::time::Duration;

use netscan_common::config::{Config, HttpSection};
use netscan_common::error::NetScanError;
use netscan_core::http::{self, HttpHandler, HttpOutcome, HttpSettings};

use crate::commands::{HttpArgs, load_required_hosts};
use crate::terminal::print::Print;

pub async fn http(args: &HttpArgs, file: &HttpSection, cfg: &Config) -> anyhow::Result<()> {
    let settings = resolve_settings(args, file)?;
    let hosts = load_required_hosts(cfg)?;

    Print::header("polling hosts");
    let mut printer = ResponsePrinter { out: io::stdout() };
    for host in &hosts {
        let _ = writeln!(printer.out, "{}:", settings.url_for(host));
        match http::run(host, &settings, &mut printer).await? {
            HttpOutcome::NotFound => {
                let _ = writeln!(printer.out, "\tNot Found\n");
            }
            HttpOutcome::Finished { .. } => {
                let _ = writeln!(printer.out);
            }
        }
    }
    Ok(())
}

pub fn resolve_settings(args: &HttpArgs, file: &HttpSection) -> Result<HttpSettings, NetScanError> {
    let defaults = HttpSettings::default();
    let settings = HttpSettings {
        secure: args.secure.or(file.secure).unwrap_or(defaults.secure),
        call_frequency: args
            .call_frequency
            .or(file.call_frequency_ms.map(Duration::from_millis))
            .unwrap_or(defaults.call_frequency),
        timeout: args
            .timeout
            .or(file.timeout_ms.map(Duration::from_millis))
            .unwrap_or(defaults.timeout),
        count: args.count.or(file.count).unwrap_or(defaults.count),
    };
    settings.validate()?;
    Ok(settings)
}

struct ResponsePrinter<W: Write> {
    out: W,
}

impl<W: Write> HttpHandler for ResponsePrinter<W> {
    fn on_response(&mut self, status: u16, latency: Duration) {
        let _ = writeln!(
            self.out,
            "\tgot resp, status code: {status}, latency: {latency:?}"
        );
    }

    fn on_error(&mut self, error: &str) {
        let _ = writeln!(self.out, "\trequest failed: {error}");
    }
}
