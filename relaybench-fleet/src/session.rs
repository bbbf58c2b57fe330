use std::{io, sync::Arc};

use thiserror::Error;
use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use relaybench_client::{Credentials, RelayClient, RelayConnector, RelayedConn};

use crate::{
    config::BenchConfig,
    loops::{echo_loop, sink_loop},
    payload::random_payload,
    stats::SessionStats,
    traffic,
};

/// Payload seeded toward the mapped address to punch the relay path open.
const PUNCH_PAYLOAD: &[u8] = b"Hello";

/// Errors that terminate a single session. Siblings are unaffected.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("socket error: {0:?}")]
    Socket(#[from] io::Error),
    #[error("relay client error: {0:?}")]
    Relay(#[from] Box<dyn std::error::Error + Send + Sync>),
    #[error("hole punch failed: {0:?}")]
    Punch(io::Error),
    #[error("send failed: {0:?}")]
    Send(io::Error),
}

/// Outcome of a session that ran its traffic loop to completion.
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// Index of the session within the fleet.
    pub index: usize,
    /// Traffic batches completed before the ceiling.
    pub batches: u64,
    /// Final counters for the session.
    pub stats: Arc<SessionStats>,
}

/// A single benchmark client.
///
/// Runs the full lifecycle against one relay server: bind a control socket
/// and connect, allocate a relayed transport, punch the path toward the
/// mapped address, then exchange traffic until the send ceiling elapses.
/// Teardown closes the relayed transport and the client on every exit path,
/// so an abort at any stage still releases the session's resources.
pub struct Session<C: RelayConnector> {
    /// Index of this session within the fleet.
    index: usize,
    connector: Arc<C>,
    credentials: Credentials,
    config: Arc<BenchConfig>,
    stats: Arc<SessionStats>,
}

impl<C: RelayConnector> Session<C> {
    /// Creates a session ready to run.
    pub fn new(
        index: usize,
        connector: Arc<C>,
        credentials: Credentials,
        config: Arc<BenchConfig>,
    ) -> Self {
        Self {
            index,
            connector,
            credentials,
            config,
            stats: Arc::new(SessionStats::default()),
        }
    }

    /// Returns a handle to the session's counters.
    pub fn stats(&self) -> Arc<SessionStats> {
        Arc::clone(&self.stats)
    }

    /// Drives the session to completion.
    pub async fn run(self) -> Result<SessionReport, SessionError> {
        let control = UdpSocket::bind("0.0.0.0:0").await?;

        let client = self
            .connector
            .connect(self.config.server, control, self.credentials.clone())
            .await
            .map_err(|e| SessionError::Relay(Box::new(e)))?;

        let result = self.drive(&client).await;

        if let Err(err) = client.close().await {
            debug!(session = self.index, "error closing relay client: {:?}", err);
        }

        result
    }

    /// Listen, allocate and exchange. Split out of [`run`](Self::run) so the
    /// client is closed on every exit path.
    async fn drive(&self, client: &C::Client) -> Result<SessionReport, SessionError> {
        client
            .listen()
            .await
            .map_err(|e| SessionError::Relay(Box::new(e)))?;

        let conn = client
            .allocate()
            .await
            .map_err(|e| SessionError::Relay(Box::new(e)))?;
        let conn = Arc::new(conn);

        // The handle's local address is the transport address assigned on
        // the relay server.
        info!(session = self.index, "relayed-address={}", conn.local_addr());

        let result = self.exchange(client, Arc::clone(&conn)).await;

        if let Err(err) = conn.close().await {
            debug!(session = self.index, "error closing relayed transport: {:?}", err);
        }

        result
    }

    /// Punches the relay path, starts the read loops and runs the traffic
    /// generator against the relayed address.
    async fn exchange<Cl: RelayClient>(
        &self,
        client: &Cl,
        conn: Arc<Cl::Conn>,
    ) -> Result<SessionReport, SessionError> {
        let mapped = client
            .discover_mapped_addr()
            .await
            .map_err(|e| SessionError::Relay(Box::new(e)))?;

        let probe = Arc::new(UdpSocket::bind("0.0.0.0:0").await?);

        // Seed the path toward the mapped address twice; the first send is
        // best effort in case of a dropped datagram, only the second must
        // succeed.
        let _ = conn.send_to(PUNCH_PAYLOAD, mapped).await;
        conn.send_to(PUNCH_PAYLOAD, mapped)
            .await
            .map_err(SessionError::Punch)?;

        debug!(session = self.index, %mapped, "punched relay path");

        let shutdown = CancellationToken::new();

        tokio::spawn(sink_loop(
            Arc::clone(&probe),
            self.config.recv_buffer_size,
            Arc::clone(&self.stats),
            shutdown.clone(),
        ));
        tokio::spawn(echo_loop(
            Arc::clone(&conn),
            self.config.recv_buffer_size,
            Arc::clone(&self.stats),
            shutdown.clone(),
        ));

        let payload = random_payload(self.config.payload_size);
        let sent = traffic::generate(
            &probe,
            conn.local_addr(),
            &payload,
            self.config.packets,
            self.config.quiescence,
            self.config.send_ceiling,
            &self.stats,
        )
        .await;

        // The read loops stop with the session.
        shutdown.cancel();

        let batches = sent.map_err(SessionError::Send)?;

        Ok(SessionReport {
            index: self.index,
            batches,
            stats: Arc::clone(&self.stats),
        })
    }
}
