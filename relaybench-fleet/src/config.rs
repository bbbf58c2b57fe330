use std::{net::SocketAddr, time::Duration};

/// Default size in bytes of the generated benchmark payload.
pub const DEFAULT_PAYLOAD_SIZE: usize = 1000;

/// Default size in bytes of the read-loop receive buffers. Larger than the
/// payload to tolerate framing overhead added by the relay path.
pub const DEFAULT_RECV_BUFFER_SIZE: usize = 1600;

const DEFAULT_QUIESCENCE: Duration = Duration::from_millis(500);

// The advisory `duration` flag does not bound the send loop; only this
// ceiling does.
const DEFAULT_SEND_CEILING: Duration = Duration::from_secs(600);

/// Immutable benchmark configuration, captured once at startup and shared
/// read-only by every session.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Address of the relay server.
    pub server: SocketAddr,
    /// Number of concurrent sessions to run.
    pub clients: usize,
    /// Payloads sent per millisecond per session.
    pub packets: usize,
    /// Advisory bench duration in seconds. Parsed and logged; the send loop
    /// runs to `send_ceiling` instead.
    pub duration_secs: u64,
    /// Size of the per-session random payload.
    pub payload_size: usize,
    /// Receive buffer size for the echo and sink loops.
    pub recv_buffer_size: usize,
    /// Settle delay between hole punching and the first traffic batch.
    pub quiescence: Duration,
    /// Hard wall-clock ceiling on the send loop.
    pub send_ceiling: Duration,
}

impl BenchConfig {
    /// Creates a configuration targeting `server` with the default knobs.
    pub fn new(server: SocketAddr) -> Self {
        Self {
            server,
            clients: 1,
            packets: 10,
            duration_secs: 60,
            payload_size: DEFAULT_PAYLOAD_SIZE,
            recv_buffer_size: DEFAULT_RECV_BUFFER_SIZE,
            quiescence: DEFAULT_QUIESCENCE,
            send_ceiling: DEFAULT_SEND_CEILING,
        }
    }

    /// Sets the number of concurrent sessions.
    pub fn with_clients(mut self, clients: usize) -> Self {
        self.clients = clients;
        self
    }

    /// Sets the per-millisecond packet rate.
    pub fn with_packets(mut self, packets: usize) -> Self {
        self.packets = packets;
        self
    }

    /// Sets the advisory bench duration.
    pub fn with_duration_secs(mut self, secs: u64) -> Self {
        self.duration_secs = secs;
        self
    }

    /// Sets the settle delay before traffic generation starts.
    pub fn with_quiescence(mut self, quiescence: Duration) -> Self {
        self.quiescence = quiescence;
        self
    }

    /// Sets the send-loop ceiling. Tests shorten this to keep runs bounded.
    pub fn with_send_ceiling(mut self, ceiling: Duration) -> Self {
        self.send_ceiling = ceiling;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BenchConfig::new("127.0.0.1:3478".parse().unwrap());

        assert_eq!(config.clients, 1);
        assert_eq!(config.packets, 10);
        assert_eq!(config.duration_secs, 60);
        assert_eq!(config.payload_size, 1000);
        assert_eq!(config.recv_buffer_size, 1600);
        assert_eq!(config.quiescence, Duration::from_millis(500));
        assert_eq!(config.send_ceiling, Duration::from_secs(600));
    }

    #[test]
    fn test_builders() {
        let config = BenchConfig::new("127.0.0.1:3478".parse().unwrap())
            .with_clients(8)
            .with_packets(2)
            .with_send_ceiling(Duration::from_millis(50));

        assert_eq!(config.clients, 8);
        assert_eq!(config.packets, 2);
        assert_eq!(config.send_ceiling, Duration::from_millis(50));
    }
}
