// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Decorations written to stderr around the command results.
//!
//! Results themselves go to stdout through the command modules so they can be
//! piped; everything in here is chrome and disappears with `-q`.

use std::sync::OnceLock;
use std::time::Duration;

use colored::*;
use netscan_common::{config::Config, success};
use unicode_width::UnicodeWidthStr;

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;

static PRINT: OnceLock<Print> = OnceLock::new();

/// Emits an undecorated line on stderr, above the spinner.
#[macro_export]
macro_rules! rawln {
    () => {
        $crate::rawln!("");
    };
    ($($arg:tt)*) => {
        tracing::info!(
            target: $crate::terminal::logging::RAW_TARGET,
            raw_msg = %format_args!($($arg)*)
        );
    };
}

#[derive(Debug)]
pub struct Print {
    no_banner: bool,
    q_level: u8,
}

impl Print {
    pub fn init(cfg: &Config) -> anyhow::Result<()> {
        let term = Self {
            no_banner: cfg.no_banner,
            q_level: cfg.quiet,
        };
        if PRINT.set(term).is_err() {
            anyhow::bail!("terminal has already been initialized")
        }
        Ok(())
    }

    fn get() -> &'static Self {
        static FALLBACK: Print = Print {
            no_banner: false,
            q_level: 0,
        };
        PRINT.get().unwrap_or(&FALLBACK)
    }

    pub fn banner() {
        let p = Self::get();
        if p.no_banner || p.q_level > 0 {
            return;
        }

        let text_content = format!("⟦ NET-SCAN v{} ⟧", env!("CARGO_PKG_VERSION"));
        let text_width = UnicodeWidthStr::width(text_content.as_str());
        let sep = "═"
            .repeat(TOTAL_WIDTH.saturating_sub(text_width) / 2)
            .color(colors::SEPARATOR);

        rawln!("{}{}{}", sep, text_content.bright_green().bold(), sep);
    }

    pub fn header(msg: &str) {
        if Self::get().q_level > 0 {
            return;
        }
        rawln!("{}", header_line(msg));
    }

    /// One line summary after a batch, e.g. `3 hosts scanned in 0.42s`.
    pub fn summary(noun: &str, count: usize, elapsed: Duration) {
        if Self::get().q_level > 0 {
            return;
        }
        let count = format!("{count} {noun}").bold().color(colors::HOSTNAME);
        let elapsed = format!("{:.2}s", elapsed.as_secs_f64()).bold().yellow();
        success!("{count} done in {elapsed}");
    }

    pub fn end_of_program() {
        if Self::get().q_level > 0 {
            return;
        }
        rawln!("{}", "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR));
    }
}

fn header_line(msg: &str) -> String {
    let formatted = format!("⟦ {} ⟧", msg.to_uppercase());
    let dash_count = TOTAL_WIDTH.saturating_sub(console::measure_text_width(&formatted));
    let left = dash_count / 2;
    let right = dash_count - left;

    format!(
        "{}{}{}",
        "─".repeat(left).color(colors::SEPARATOR),
        formatted.bright_green(),
        "─".repeat(right).color(colors::SEPARATOR)
    )
}
