use std::{io, net::SocketAddr};

use tokio::net::UdpSocket;

mod loopback;
pub use loopback::{LoopbackConn, LoopbackRelay, LoopbackRelayClient};

/// Credentials presented to the relay server when connecting.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub realm: String,
}

/// Entry point into a relay-protocol client implementation.
///
/// The connector is shared by every session in a fleet; each call to
/// [`connect`](RelayConnector::connect) produces an independent client bound
/// to the caller's own control socket.
#[async_trait::async_trait]
pub trait RelayConnector: Send + Sync + 'static {
    type Client: RelayClient;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Connects to the relay server at `server`, taking ownership of the
    /// local `control` socket for all protocol control traffic.
    async fn connect(
        &self,
        server: SocketAddr,
        control: UdpSocket,
        credentials: Credentials,
    ) -> Result<Self::Client, Self::Error>;
}

/// A connected relay-protocol client.
#[async_trait::async_trait]
pub trait RelayClient: Send + Sync + 'static {
    type Conn: RelayedConn;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Starts servicing incoming control traffic on the control socket.
    async fn listen(&self) -> Result<(), Self::Error>;

    /// Requests a relayed transport from the server. The returned handle's
    /// local address is the transport address assigned on the server.
    async fn allocate(&self) -> Result<Self::Conn, Self::Error>;

    /// Learns the caller's externally mapped address through a binding
    /// exchange on the control socket.
    async fn discover_mapped_addr(&self) -> Result<SocketAddr, Self::Error>;

    /// Tears down the client.
    async fn close(&self) -> Result<(), Self::Error>;
}

/// A relayed transport handle obtained from [`RelayClient::allocate`].
///
/// Datagram I/O mirrors [`UdpSocket`]: sends carry an explicit target and
/// receives report the sender. [`close`](RelayedConn::close) must unblock any
/// receive pending on the handle.
#[async_trait::async_trait]
pub trait RelayedConn: Send + Sync + 'static {
    /// The transport address assigned on the relay server.
    fn local_addr(&self) -> SocketAddr;

    async fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize>;

    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)>;

    async fn close(&self) -> io::Result<()>;
}
