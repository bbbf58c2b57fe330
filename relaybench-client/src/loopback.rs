use std::{
    io,
    net::{IpAddr, Ipv4Addr, SocketAddr},
};

use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{Credentials, RelayClient, RelayConnector, RelayedConn};

/// In-process stand-in for a relay server.
///
/// [`allocate`](RelayClient::allocate) binds a fresh loopback UDP socket in
/// place of a server-side relayed transport, and
/// [`discover_mapped_addr`](RelayClient::discover_mapped_addr) reports the
/// control socket's own address. Traffic sent toward the "relayed" address
/// therefore lands directly on the allocated socket, which is the exact echo
/// path the benchmark exercises, minus the server in the middle.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopbackRelay;

impl LoopbackRelay {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl RelayConnector for LoopbackRelay {
    type Client = LoopbackRelayClient;
    type Error = io::Error;

    async fn connect(
        &self,
        server: SocketAddr,
        control: UdpSocket,
        credentials: Credentials,
    ) -> Result<Self::Client, Self::Error> {
        debug!(%server, user = %credentials.username, realm = %credentials.realm, "loopback relay client connected");

        Ok(LoopbackRelayClient {
            server,
            control,
            credentials,
        })
    }
}

/// Client half of [`LoopbackRelay`]. Owns the control socket for the lifetime
/// of the connection.
#[derive(Debug)]
pub struct LoopbackRelayClient {
    server: SocketAddr,
    control: UdpSocket,
    credentials: Credentials,
}

#[async_trait::async_trait]
impl RelayClient for LoopbackRelayClient {
    type Conn = LoopbackConn;
    type Error = io::Error;

    async fn listen(&self) -> Result<(), io::Error> {
        // No control protocol to service in process.
        debug!(server = %self.server, user = %self.credentials.username, "loopback relay client listening");
        Ok(())
    }

    async fn allocate(&self) -> Result<LoopbackConn, io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;

        debug!(%addr, "allocated loopback relayed transport");

        Ok(LoopbackConn {
            socket,
            addr,
            shutdown: CancellationToken::new(),
        })
    }

    async fn discover_mapped_addr(&self) -> Result<SocketAddr, io::Error> {
        let mut addr = self.control.local_addr()?;
        // The control socket binds the wildcard address; rewrite it so the
        // reported mapping is actually routable in process.
        if addr.ip().is_unspecified() {
            addr.set_ip(IpAddr::V4(Ipv4Addr::LOCALHOST));
        }

        Ok(addr)
    }

    async fn close(&self) -> Result<(), io::Error> {
        debug!(server = %self.server, "loopback relay client closed");
        Ok(())
    }
}

/// Relayed transport handle produced by [`LoopbackRelayClient::allocate`].
///
/// Closing cancels the internal shutdown token, so a receive pending on the
/// handle unblocks with an error instead of waiting on platform socket
/// semantics.
#[derive(Debug)]
pub struct LoopbackConn {
    socket: UdpSocket,
    addr: SocketAddr,
    shutdown: CancellationToken,
}

#[async_trait::async_trait]
impl RelayedConn for LoopbackConn {
    fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    async fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        if self.shutdown.is_cancelled() {
            return Err(closed());
        }

        self.socket.send_to(buf, target).await
    }

    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        tokio::select! {
            _ = self.shutdown.cancelled() => Err(closed()),
            res = self.socket.recv_from(buf) => res,
        }
    }

    async fn close(&self) -> io::Result<()> {
        self.shutdown.cancel();
        Ok(())
    }
}

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "relayed transport closed")
}
