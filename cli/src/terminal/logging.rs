// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Event formatting for the terminal.

use std::fmt;

use colored::*;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{self, Writer};
use tracing_subscriber::fmt::{FmtContext, FormatEvent};
use tracing_subscriber::registry::LookupSpan;

/// Target used by [`crate::rawln!`] for undecorated lines.
pub const RAW_TARGET: &str = "net_scan::raw";

/// Renders events as `[glyph] message` lines.
///
/// Events emitted by [`crate::rawln!`] are written verbatim, everything else
/// gets a coloured status glyph picked from the level and the `status` field.
/// Events tagged with a `verbosity` above `max_verbosity` are dropped.
pub struct NetScanFormatter {
    pub max_verbosity: u8,
}

impl<S, N> FormatEvent<S, N> for NetScanFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> format::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut fields = EventFields::default();
        event.record(&mut fields);

        if event.metadata().target() == RAW_TARGET {
            return write!(writer, "{}\r\n", fields.raw.replace('\n', "\r\n"));
        }

        if fields.verbosity > self.max_verbosity {
            return Ok(());
        }

        let glyph = glyph(event.metadata().level(), fields.status.as_deref());
        write!(writer, "{glyph} {}", fields.message)?;
        for (name, value) in &fields.extra {
            write!(writer, " {}={value}", name.italic())?;
        }
        write!(writer, "\r\n")
    }
}

fn glyph(level: &Level, status: Option<&str>) -> ColoredString {
    match (*level, status) {
        (Level::ERROR, _) => "[-]".red().bold(),
        (Level::WARN, _) => "[*]".yellow().bold(),
        (Level::INFO, Some("success")) => "[+]".green().bold(),
        (Level::INFO, _) => "[»]".cyan().bold(),
        (Level::DEBUG, _) => "[?]".blue(),
        (Level::TRACE, _) => "[ ]".dimmed(),
    }
}

#[derive(Default)]
struct EventFields {
    message: String,
    raw: String,
    status: Option<String>,
    verbosity: u8,
    extra: Vec<(&'static str, String)>,
}

impl Visit for EventFields {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "raw_msg" => self.raw = format!("{value:?}"),
            "status" => self.status = Some(format!("{value:?}").trim_matches('"').to_string()),
            "verbosity" => {}
            name => self.extra.push((name, format!("{value:?}"))),
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "status" => self.status = Some(value.to_string()),
            "raw_msg" => self.raw = value.to_string(),
            "message" => self.message = value.to_string(),
            _ => self.record_debug(field, &value),
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        if field.name() == "verbosity" {
            self.verbosity = u8::try_from(value).unwrap_or(u8::MAX);
        } else {
            self.record_debug(field, &value);
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        if field.name() == "verbosity" {
            self.verbosity = u8::try_from(value).unwrap_or(0);
        } else {
            self.record_debug(field, &value);
        }
    }
}
