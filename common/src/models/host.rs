// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

//! # Host Store
//!
//! The persisted list of scan targets. Hosts are kept unique (case-sensitive)
//! and in ascending order, and are saved as one hostname per line.

use std::fmt;
use std::fs;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use anyhow::Context;

use crate::debug;
use crate::error::NetScanError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostList {
    hosts: Vec<String>,
}

impl HostList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `host`, failing with [`NetScanError::HostExists`] on a duplicate.
    pub fn add(&mut self, host: &str) -> Result<(), NetScanError> {
        match self.search(host) {
            Ok(_) => Err(NetScanError::HostExists(host.to_string())),
            Err(idx) => {
                self.hosts.insert(idx, host.to_string());
                Ok(())
            }
        }
    }

    /// Removes `host`, failing with [`NetScanError::HostNotExists`] if absent.
    pub fn remove(&mut self, host: &str) -> Result<(), NetScanError> {
        let idx = self
            .search(host)
            .map_err(|_| NetScanError::HostNotExists(host.to_string()))?;
        self.hosts.remove(idx);
        Ok(())
    }

    /// Reads hosts from `path`, one per line.
    ///
    /// A missing file leaves the list untouched. Duplicates and blank lines
    /// are skipped silently.
    pub fn load(&mut self, path: &Path) -> anyhow::Result<()> {
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(verbosity = 1, "{} does not exist yet", path.display());
                return Ok(());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("opening {}", path.display()));
            }
        };

        for line in BufReader::new(file).lines() {
            let line = line.with_context(|| format!("reading {}", path.display()))?;
            let host = line.trim();
            if host.is_empty() {
                continue;
            }
            if self.add(host).is_err() {
                debug!(verbosity = 2, "{host} listed twice in {}", path.display());
            }
        }

        Ok(())
    }

    /// Overwrites `path` with the current hosts, one per line.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        fs::write(path, self.to_string()).with_context(|| format!("writing {}", path.display()))
    }

    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    pub fn contains(&self, host: &str) -> bool {
        self.search(host).is_ok()
    }

    fn search(&self, host: &str) -> Result<usize, usize> {
        self.hosts.binary_search_by(|probe| probe.as_str().cmp(host))
    }
}

impl fmt::Display for HostList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for host in &self.hosts {
            writeln!(f, "{host}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a HostList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.hosts.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "net-scan-{}-{}.hosts",
            name,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn add_rejects_duplicates() {
        let mut hl = HostList::new();
        hl.add("a").unwrap();
        assert_eq!(hl.add("a"), Err(NetScanError::HostExists("a".into())));
        assert_eq!(hl.len(), 1);
    }

    #[test]
    fn uniqueness_is_case_sensitive() {
        let mut hl = HostList::new();
        hl.add("example.com").unwrap();
        hl.add("Example.com").unwrap();
        assert_eq!(hl.len(), 2);
    }

    #[test]
    fn remove_missing_host_fails() {
        let mut hl = HostList::new();
        assert_eq!(hl.remove("z"), Err(NetScanError::HostNotExists("z".into())));
    }

    #[test]
    fn remove_existing_host() {
        let mut hl = HostList::new();
        hl.add("a").unwrap();
        hl.add("b").unwrap();
        hl.remove("a").unwrap();
        assert_eq!(hl.hosts(), &["b".to_string()]);
    }

    #[test]
    fn hosts_stay_sorted() {
        let mut hl = HostList::new();
        for h in ["c", "a", "b"] {
            hl.add(h).unwrap();
        }
        assert_eq!(hl.to_string(), "a\nb\nc\n");
    }

    #[test]
    fn load_missing_file_yields_empty_list() {
        let mut hl = HostList::new();
        hl.load(&temp_file("missing")).unwrap();
        assert!(hl.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = temp_file("roundtrip");
        let mut hl = HostList::new();
        hl.add("b").unwrap();
        hl.add("a").unwrap();
        hl.save(&path).unwrap();

        let mut loaded = HostList::new();
        loaded.load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.hosts(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn load_skips_duplicates_and_blank_lines() {
        let path = temp_file("dupes");
        fs::write(&path, "host1\n\nhost2\nhost1\n  \n").unwrap();

        let mut hl = HostList::new();
        hl.load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(hl.hosts(), &["host1".to_string(), "host2".to_string()]);
    }
}
