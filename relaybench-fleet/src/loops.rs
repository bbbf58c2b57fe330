use std::sync::Arc;

use tokio::net::UdpSocket;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use relaybench_client::RelayedConn;

use crate::stats::SessionStats;

/// Echoes every datagram received on the relayed transport back to its
/// sender.
///
/// Exits silently when the transport errors (the expected teardown signal
/// once the handle is closed) or when `shutdown` fires.
pub(crate) async fn echo_loop<C: RelayedConn>(
    conn: Arc<C>,
    buffer_size: usize,
    stats: Arc<SessionStats>,
    shutdown: CancellationToken,
) {
    let mut buf = vec![0u8; buffer_size];

    loop {
        let (n, from) = tokio::select! {
            _ = shutdown.cancelled() => break,
            res = conn.recv_from(&mut buf) => match res {
                Ok(recv) => recv,
                Err(_) => break,
            },
        };

        trace!(bytes = n, %from, "echoing datagram");

        if conn.send_to(&buf[..n], from).await.is_err() {
            break;
        }

        stats.increment_echoed();
    }
}

/// Sinks every datagram received on the probe socket, recording byte count
/// and sender.
///
/// Exits silently on receive error or when `shutdown` fires.
pub(crate) async fn sink_loop(
    socket: Arc<UdpSocket>,
    buffer_size: usize,
    stats: Arc<SessionStats>,
    shutdown: CancellationToken,
) {
    let mut buf = vec![0u8; buffer_size];

    loop {
        let (n, from) = tokio::select! {
            _ = shutdown.cancelled() => break,
            res = socket.recv_from(&mut buf) => match res {
                Ok(recv) => recv,
                Err(_) => break,
            },
        };

        debug!("{} bytes from {}", n, from);
        stats.increment_probe_rx(n);
    }
}
