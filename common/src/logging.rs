// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! Thin wrappers around the `tracing` macros.
//!
//! Every event carries a `status` field that the terminal formatter turns
//! into a glyph. Pass `verbosity = N` to hide an event below `-v` level `N`.

/// Emits a `tracing` event at `$level` tagged with `status = $status`.
#[doc(hidden)]
#[macro_export]
macro_rules! status_event {
    ($level:ident, $status:literal, $($arg:tt)+) => {
        tracing::$level!(status = $status, $($arg)+)
    };
}

/// Progress or context line, shown as `[»]`.
///
/// ```ignore
/// info!("Using config file: {}", path.display());
/// info!(verbosity = 1, "Scanning {} ports", n); // only with -v
/// ```
#[macro_export]
macro_rules! info {
    ($($arg:tt)+) => {
        $crate::status_event!(info, "info", $($arg)+)
    };
}

/// Completed step, shown as `[+]`. Accepts `verbosity = N` like [`info!`].
#[macro_export]
macro_rules! success {
    ($($arg:tt)+) => {
        $crate::status_event!(info, "success", $($arg)+)
    };
}

/// Diagnostic detail, shown as `[?]`.
///
/// Usually paired with `verbosity = N`: level 1 for per-host notes, level 2
/// for per-probe notes.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)+) => {
        $crate::status_event!(debug, "debug", $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)+) => {
        $crate::status_event!(error, "error", $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)+) => {
        $crate::status_event!(warn, "warn", $($arg)+)
    };
}
