// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! `host add|delete|list`: edits the host file.
//!
//! Names come from the arguments and, when stdin is piped, from stdin one per
//! line. The file is written once, and only if every name was applied.

use std::io::{self, BufRead};

use anyhow::Context;
use netscan_common::config::Config;
use netscan_common::models::host::HostList;
use netscan_common::{debug, success};

use crate::commands::{HostAction, stdin_is_piped};

pub fn host(action: &HostAction, cfg: &Config) -> anyhow::Result<()> {
    let mut list = HostList::new();
    list.load(&cfg.hosts_file)?;

    match action {
        HostAction::List => {
            print!("{list}");
            Ok(())
        }
        HostAction::Add { hosts } => {
            let names = collect_names(hosts)?;
            add(&mut list, &names)?;
            list.save(&cfg.hosts_file)
        }
        HostAction::Delete { hosts } => {
            let names = collect_names(hosts)?;
            delete(&mut list, &names)?;
            list.save(&cfg.hosts_file)
        }
    }
}

pub fn add(list: &mut HostList, names: &[String]) -> anyhow::Result<()> {
    for name in names {
        list.add(name)?;
        println!("Added host: {name}");
    }
    success!("{} hosts in list", list.len());
    Ok(())
}

pub fn delete(list: &mut HostList, names: &[String]) -> anyhow::Result<()> {
    for name in names {
        list.remove(name)?;
        println!("Deleted host: {name}");
    }
    success!("{} hosts in list", list.len());
    Ok(())
}

fn collect_names(args: &[String]) -> anyhow::Result<Vec<String>> {
    let mut names: Vec<String> = args.to_vec();
    if stdin_is_piped() {
        let from_stdin = read_names(io::stdin().lock()).context("reading hosts from stdin")?;
        debug!(verbosity = 1, "Read {} hosts from stdin", from_stdin.len());
        names.extend(from_stdin);
    }
    Ok(names)
}

/// One name per line; surrounding whitespace and blank lines are dropped.
pub fn read_names<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let name = line.trim();
        if !name.is_empty() {
            names.push(name.to_string());
        }
    }
    Ok(names)
}
