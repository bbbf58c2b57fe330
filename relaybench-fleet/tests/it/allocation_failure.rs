use std::{
    io,
    net::SocketAddr,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::{net::UdpSocket, time::timeout};

use relaybench_client::{
    Credentials, LoopbackConn, LoopbackRelay, LoopbackRelayClient, RelayClient, RelayConnector,
};
use relaybench_fleet::{BenchConfig, Fleet, FleetSummary};

fn credentials() -> Credentials {
    Credentials {
        username: "bench".to_string(),
        password: "secret".to_string(),
        realm: "trtc.one".to_string(),
    }
}

/// Delegates to the loopback relay but refuses the first allocation.
struct FailOnceRelay {
    inner: LoopbackRelay,
    fail_next: Arc<AtomicBool>,
}

#[async_trait::async_trait]
impl RelayConnector for FailOnceRelay {
    type Client = FailOnceClient;
    type Error = io::Error;

    async fn connect(
        &self,
        server: SocketAddr,
        control: UdpSocket,
        credentials: Credentials,
    ) -> Result<Self::Client, Self::Error> {
        let inner = self.inner.connect(server, control, credentials).await?;

        Ok(FailOnceClient {
            inner,
            fail: self.fail_next.swap(false, Ordering::SeqCst),
        })
    }
}

struct FailOnceClient {
    inner: LoopbackRelayClient,
    fail: bool,
}

#[async_trait::async_trait]
impl RelayClient for FailOnceClient {
    type Conn = LoopbackConn;
    type Error = io::Error;

    async fn listen(&self) -> Result<(), Self::Error> {
        self.inner.listen().await
    }

    async fn allocate(&self) -> Result<Self::Conn, Self::Error> {
        if self.fail {
            return Err(io::Error::new(io::ErrorKind::Other, "allocation refused"));
        }

        self.inner.allocate().await
    }

    async fn discover_mapped_addr(&self) -> Result<SocketAddr, Self::Error> {
        self.inner.discover_mapped_addr().await
    }

    async fn close(&self) -> Result<(), Self::Error> {
        self.inner.close().await
    }
}

#[tokio::test]
async fn test_allocation_failure_does_not_strand_the_join() {
    let _ = tracing_subscriber::fmt::try_init();

    let connector = FailOnceRelay {
        inner: LoopbackRelay::new(),
        fail_next: Arc::new(AtomicBool::new(true)),
    };

    let config = BenchConfig::new("127.0.0.1:3478".parse().unwrap())
        .with_clients(3)
        .with_packets(1)
        .with_quiescence(Duration::from_millis(10))
        .with_send_ceiling(Duration::from_millis(30));

    let fleet = Fleet::new(connector, credentials(), config);

    // The failing session must still signal completion; the join is bounded
    // by the surviving sessions' ceiling, not by a hang.
    let summary = timeout(Duration::from_secs(5), fleet.run())
        .await
        .expect("fleet join did not unblock after an allocation failure");

    assert_eq!(
        summary,
        FleetSummary {
            completed: 2,
            failed: 1
        }
    );
}
