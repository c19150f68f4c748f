// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::NetScanError;

/// The transport a port probe dials over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Network {
    #[default]
    Tcp,
    Tcp4,
    Tcp6,
    Udp,
    Udp4,
    Udp6,
    Ip,
    Ip4,
    Ip6,
    Unix,
    UnixGram,
    UnixPacket,
}

/// Address families a network is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Any,
    V4,
    V6,
}

impl Family {
    pub fn accepts(&self, addr: &SocketAddr) -> bool {
        match self {
            Family::Any => true,
            Family::V4 => addr.is_ipv4(),
            Family::V6 => addr.is_ipv6(),
        }
    }
}

impl Network {
    pub const ALL: [Network; 12] = [
        Network::Tcp,
        Network::Tcp4,
        Network::Tcp6,
        Network::Udp,
        Network::Udp4,
        Network::Udp6,
        Network::Ip,
        Network::Ip4,
        Network::Ip6,
        Network::Unix,
        Network::UnixGram,
        Network::UnixPacket,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Tcp => "tcp",
            Network::Tcp4 => "tcp4",
            Network::Tcp6 => "tcp6",
            Network::Udp => "udp",
            Network::Udp4 => "udp4",
            Network::Udp6 => "udp6",
            Network::Ip => "ip",
            Network::Ip4 => "ip4",
            Network::Ip6 => "ip6",
            Network::Unix => "unix",
            Network::UnixGram => "unixgram",
            Network::UnixPacket => "unixpacket",
        }
    }

    pub fn family(&self) -> Family {
        match self {
            Network::Tcp4 | Network::Udp4 | Network::Ip4 => Family::V4,
            Network::Tcp6 | Network::Udp6 | Network::Ip6 => Family::V6,
            _ => Family::Any,
        }
    }

    /// Socket-path networks address a filesystem entry instead of a host.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Network::Unix | Network::UnixGram | Network::UnixPacket
        )
    }
}

impl FromStr for Network {
    type Err = NetScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|network| network.as_str() == s)
            .ok_or_else(|| NetScanError::InvalidValue(s.to_string()))
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_round_trips() {
        for network in Network::ALL {
            assert_eq!(network.as_str().parse::<Network>(), Ok(network));
        }
    }

    #[test]
    fn unknown_network_is_invalid_value() {
        assert_eq!(
            "khu".parse::<Network>(),
            Err(NetScanError::InvalidValue("khu".into()))
        );
        assert!("TCP".parse::<Network>().is_err());
    }

    #[test]
    fn family_restricts_addresses() {
        let v4: SocketAddr = "127.0.0.1:80".parse().unwrap();
        let v6: SocketAddr = "[::1]:80".parse().unwrap();
        assert!(Network::Tcp4.family().accepts(&v4));
        assert!(!Network::Tcp4.family().accepts(&v6));
        assert!(Network::Udp6.family().accepts(&v6));
        assert!(Network::Tcp.family().accepts(&v6));
    }
}
