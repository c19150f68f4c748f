// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # net-scan CLI Entry Point
//!
//! Bootstraps the runtime, installs logging, merges the optional config file
//! under the command-line flags and routes to the subcommand. Any error that
//! reaches this level is logged with the subcommand's prefix and turned into
//! exit code 1.

mod commands;
mod terminal;

use std::process::ExitCode;

use netscan_common::{config::FileConfig, error};

use crate::{
    commands::{CommandLine, Commands, dns, host, http, ping, scan},
    terminal::{print::Print, spinner},
};

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();
    spinner::init_logging(commands.verbosity);

    let prefix = commands.command.error_prefix();
    let file_cfg = match FileConfig::load(commands.config.as_deref()) {
        Ok(file_cfg) => file_cfg,
        Err(e) => {
            error!("{prefix} {e:#}");
            return ExitCode::FAILURE;
        }
    };
    let cfg = commands.to_config(&file_cfg);

    let _ = Print::init(&cfg);
    Print::banner();

    let result = match &commands.command {
        Commands::Scan(args) => scan::scan(args, &file_cfg.scan, &cfg).await,
        Commands::Dns(args) => dns::dns(args, &file_cfg.dns, &cfg).await,
        Commands::Ping(args) => ping::ping(args, &file_cfg.ping, &cfg).await,
        Commands::Http(args) => http::http(args, &file_cfg.http, &cfg).await,
        Commands::Host { action } => host::host(action, &cfg),
    };

    let exit_code = match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{prefix} {e:#}");
            ExitCode::FAILURE
        }
    };

    Print::end_of_program();

    exit_code
}
