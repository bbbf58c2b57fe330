use std::{io, net::SocketAddr, time::Duration};

use tokio::{
    net::UdpSocket,
    time::{sleep, Instant},
};

use crate::stats::SessionStats;

/// Runs the timed send loop: after the quiescence delay, sends `packets`
/// copies of `payload` from `probe` to `target`, sleeps one millisecond, and
/// repeats until `ceiling` elapses.
///
/// Returns the number of completed batches. Any send error aborts the loop
/// and propagates as the session's terminal error.
pub(crate) async fn generate(
    probe: &UdpSocket,
    target: SocketAddr,
    payload: &[u8],
    packets: usize,
    quiescence: Duration,
    ceiling: Duration,
    stats: &SessionStats,
) -> io::Result<u64> {
    sleep(quiescence).await;

    let start = Instant::now();
    let mut batches = 0u64;

    loop {
        for _ in 0..packets {
            probe.send_to(payload, target).await?;
            stats.increment_tx();
        }
        batches += 1;

        sleep(Duration::from_millis(1)).await;

        if start.elapsed() > ceiling {
            break;
        }
    }

    Ok(batches)
}
