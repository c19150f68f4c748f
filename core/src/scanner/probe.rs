// Copyright (c) 2026 OverTheFlow and Contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file, You can obtain one at
// https://mozilla.org/MPL/2.0/.

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use netscan_common::debug;
use netscan_common::models::network::Network;
use netscan_common::models::scan::PortState;
use tokio::net::{TcpStream, UdpSocket, lookup_host};
use tokio::time::timeout;

use super::Prober;

/// Classifies a port by trying to connect to it once over `network`.
#[derive(Debug, Clone, Copy)]
pub struct ConnectProber {
    network: Network,
    timeout: Duration,
}

impl ConnectProber {
    pub fn new(network: Network, timeout: Duration) -> Self {
        Self { network, timeout }
    }

    async fn dial(&self, host: &str, port: u16) -> io::Result<()> {
        match self.network {
            Network::Tcp | Network::Tcp4 | Network::Tcp6 => {
                let addrs = self.addresses(host, port).await?;
                // Dropping the stream closes it again.
                TcpStream::connect(addrs.as_slice()).await.map(drop)
            }
            Network::Udp | Network::Udp4 | Network::Udp6 => {
                let addrs = self.addresses(host, port).await?;
                let target = addrs[0];
                let local: SocketAddr = if target.is_ipv4() {
                    (Ipv4Addr::UNSPECIFIED, 0).into()
                } else {
                    (Ipv6Addr::UNSPECIFIED, 0).into()
                };
                let socket = UdpSocket::bind(local).await?;
                socket.connect(target).await
            }
            Network::Ip | Network::Ip4 | Network::Ip6 => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("network {} needs a protocol to dial", self.network),
            )),
            Network::Unix => dial_unix_stream(&socket_path(host, port)).await,
            Network::UnixGram => dial_unix_datagram(&socket_path(host, port)),
            Network::UnixPacket => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "unixpacket sockets are not supported",
            )),
        }
    }

    /// Resolved addresses of `host` that match the network's address family.
    async fn addresses(&self, host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
        let family = self.network.family();
        let addrs: Vec<SocketAddr> = lookup_host((host, port))
            .await?
            .filter(|addr| family.accepts(addr))
            .collect();

        if addrs.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("no suitable address for {host} on {}", self.network),
            ));
        }
        Ok(addrs)
    }
}

#[async_trait]
impl Prober for ConnectProber {
    async fn resolve(&self, host: &str) -> bool {
        // Socket paths are dialled per port; there is no name to look up.
        if self.network.is_local() {
            return true;
        }
        match lookup_host((host, 0)).await {
            Ok(mut addrs) => addrs.next().is_some(),
            Err(e) => {
                debug!(verbosity = 2, "Lookup of {host} failed: {e}");
                false
            }
        }
    }

    async fn probe(&self, host: &str, port: u16) -> PortState {
        match timeout(self.timeout, self.dial(host, port)).await {
            Ok(Ok(())) => PortState::Open,
            Ok(Err(e)) if e.kind() == io::ErrorKind::TimedOut => PortState::Timeout,
            Ok(Err(e)) => {
                debug!(verbosity = 2, "{host}:{port}/{}: {e}", self.network);
                PortState::Closed
            }
            Err(_elapsed) => PortState::Timeout,
        }
    }
}

fn socket_path(host: &str, port: u16) -> String {
    format!("{host}:{port}")
}

#[cfg(unix)]
async fn dial_unix_stream(path: &str) -> io::Result<()> {
    tokio::net::UnixStream::connect(path).await.map(drop)
}

#[cfg(unix)]
fn dial_unix_datagram(path: &str) -> io::Result<()> {
    let socket = tokio::net::UnixDatagram::unbound()?;
    socket.connect(path)
}

#[cfg(not(unix))]
async fn dial_unix_stream(_path: &str) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "unix sockets are not available on this platform",
    ))
}

#[cfg(not(unix))]
fn dial_unix_datagram(_path: &str) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "unix sockets are not available on this platform",
    ))
}

// ╔══════════════════════════════════════════════╗
// ║                    TESTS                     ║
// ╚══════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    fn tcp_prober() -> ConnectProber {
        ConnectProber::new(Network::Tcp, Duration::from_millis(500))
    }

    #[tokio::test]
    async fn listening_port_is_open() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        assert_eq!(tcp_prober().probe("127.0.0.1", port).await, PortState::Open);
    }

    #[tokio::test]
    async fn released_port_is_closed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        assert_eq!(tcp_prober().probe("127.0.0.1", port).await, PortState::Closed);
    }

    #[tokio::test]
    async fn family_mismatch_is_closed() {
        let prober = ConnectProber::new(Network::Tcp6, Duration::from_millis(200));
        assert_eq!(prober.probe("127.0.0.1", 80).await, PortState::Closed);
    }

    #[tokio::test]
    async fn udp_connect_counts_as_open() {
        let prober = ConnectProber::new(Network::Udp4, Duration::from_millis(200));
        assert_eq!(prober.probe("127.0.0.1", 53).await, PortState::Open);
    }

    #[tokio::test]
    async fn raw_ip_without_protocol_is_closed() {
        let prober = ConnectProber::new(Network::Ip, Duration::from_millis(200));
        assert_eq!(prober.probe("127.0.0.1", 80).await, PortState::Closed);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn missing_unix_socket_is_closed() {
        let prober = ConnectProber::new(Network::Unix, Duration::from_millis(200));
        assert_eq!(
            prober.probe("/nonexistent/net-scan", 1).await,
            PortState::Closed
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn socket_path_skips_name_resolution() {
        let prober = ConnectProber::new(Network::UnixGram, Duration::from_millis(200));
        assert!(prober.resolve("/nonexistent/net-scan").await);
    }

    #[tokio::test]
    async fn ip_literal_resolves() {
        assert!(tcp_prober().resolve("127.0.0.1").await);
    }

    #[tokio::test]
    #[ignore]
    async fn reserved_tld_does_not_resolve() {
        assert!(!tcp_prober().resolve("host.invalid").await);
    }

    #[tokio::test]
    #[ignore]
    async fn unroutable_address_times_out() {
        let prober = ConnectProber::new(Network::Tcp, Duration::from_millis(300));
        assert_eq!(prober.probe("192.0.2.1", 80).await, PortState::Timeout);
    }
}
