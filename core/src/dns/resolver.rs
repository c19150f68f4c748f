// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::net::IpAddr;

use async_trait::async_trait;
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::system_conf::read_system_conf;
use hickory_resolver::{Resolver, TokioResolver};
use netscan_common::models::dns::MxRecord;
use netscan_common::{debug, warn};

use super::DnsLookup;

/// [`DnsLookup`] backed by `hickory-resolver`.
pub struct HickoryLookup {
    resolver: TokioResolver,
}

impl HickoryLookup {
    /// Uses the name servers from the system configuration, or Cloudflare if
    /// that configuration can't be read.
    pub fn from_system_conf() -> Self {
        let builder = match read_system_conf() {
            Ok((config, options)) => {
                Resolver::builder_with_config(config, TokioConnectionProvider::default())
                    .with_options(options)
            }
            Err(e) => {
                warn!("Could not read system DNS configuration ({e}), using 1.1.1.1");
                Resolver::builder_with_config(
                    ResolverConfig::cloudflare(),
                    TokioConnectionProvider::default(),
                )
            }
        };

        Self {
            resolver: builder.build(),
        }
    }
}

#[async_trait]
impl DnsLookup for HickoryLookup {
    async fn cname(&self, host: &str) -> anyhow::Result<String> {
        let alias = match self.resolver.lookup(host, RecordType::CNAME).await {
            Ok(lookup) => lookup.iter().find_map(|rdata| match rdata {
                RData::CNAME(cname) => Some(cname.to_string()),
                _ => None,
            }),
            Err(e) => {
                debug!(verbosity = 2, "No CNAME record for {host}: {e}");
                None
            }
        };

        if let Some(alias) = alias {
            return Ok(alias);
        }

        // Without an alias the name is its own canonical name, as long as it exists.
        self.resolver.lookup_ip(host).await?;
        Ok(format!("{}.", host.trim_end_matches('.')))
    }

    async fn ips(&self, host: &str) -> anyhow::Result<Vec<IpAddr>> {
        Ok(self.resolver.lookup_ip(host).await?.iter().collect())
    }

    async fn ns(&self, host: &str) -> anyhow::Result<Vec<String>> {
        Ok(self
            .resolver
            .ns_lookup(host)
            .await?
            .iter()
            .map(|ns| ns.to_string())
            .collect())
    }

    async fn mx(&self, host: &str) -> anyhow::Result<Vec<MxRecord>> {
        Ok(self
            .resolver
            .mx_lookup(host)
            .await?
            .iter()
            .map(|mx| MxRecord {
                host: mx.exchange().to_string(),
                preference: mx.preference(),
            })
            .collect())
    }

    async fn txt(&self, host: &str) -> anyhow::Result<Vec<String>> {
        Ok(self
            .resolver
            .txt_lookup(host)
            .await?
            .iter()
            .map(|txt| {
                txt.txt_data()
                    .iter()
                    .map(|chunk| String::from_utf8_lossy(chunk))
                    .collect::<String>()
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore]
    async fn resolves_public_name_servers() {
        let lookup = HickoryLookup::from_system_conf();
        let ns = lookup.ns("example.com").await.unwrap();
        assert!(!ns.is_empty());
    }

    #[tokio::test]
    #[ignore]
    async fn missing_name_has_no_canonical_name() {
        let lookup = HickoryLookup::from_system_conf();
        assert!(lookup.cname("does-not-exist.invalid").await.is_err());
    }
}
