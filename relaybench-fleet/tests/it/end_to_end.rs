use std::{sync::Arc, time::Duration};

use tokio::{task::JoinSet, time::timeout};

use relaybench_client::{Credentials, LoopbackRelay};
use relaybench_fleet::{BenchConfig, Fleet, FleetSummary, Session};

fn credentials() -> Credentials {
    Credentials {
        username: "bench".to_string(),
        password: "secret".to_string(),
        realm: "trtc.one".to_string(),
    }
}

fn config() -> BenchConfig {
    BenchConfig::new("127.0.0.1:3478".parse().unwrap())
        .with_clients(2)
        .with_packets(1)
        .with_duration_secs(1)
        .with_quiescence(Duration::from_millis(10))
        .with_send_ceiling(Duration::from_millis(50))
}

#[tokio::test]
async fn test_two_client_fleet_completes() {
    let _ = tracing_subscriber::fmt::try_init();

    let fleet = Fleet::new(LoopbackRelay::new(), credentials(), config());

    let summary = timeout(Duration::from_secs(10), fleet.run())
        .await
        .expect("fleet join did not unblock");

    assert_eq!(
        summary,
        FleetSummary {
            completed: 2,
            failed: 0
        }
    );
}

#[tokio::test]
async fn test_sessions_observe_their_echoes() {
    let _ = tracing_subscriber::fmt::try_init();

    let connector = Arc::new(LoopbackRelay::new());
    let config = Arc::new(config());

    let mut tasks = JoinSet::new();
    let mut stats = Vec::new();

    for index in 0..2 {
        let session = Session::new(
            index,
            Arc::clone(&connector),
            credentials(),
            Arc::clone(&config),
        );
        stats.push(session.stats());
        tasks.spawn(session.run());
    }

    while let Some(joined) = tasks.join_next().await {
        let report = joined.expect("session panicked").expect("session failed");
        assert!(
            report.batches >= 1,
            "session {} never reached the traffic stage",
            report.index
        );
    }

    // Give the read loops a moment to drain in-flight echoes.
    tokio::time::sleep(Duration::from_millis(50)).await;

    for (index, stats) in stats.iter().enumerate() {
        assert!(stats.payloads_tx() >= 1, "session {} sent nothing", index);
        assert!(
            stats.probe_rx() >= 1,
            "session {} observed no echoes",
            index
        );
        assert_eq!(
            stats.probe_bytes_rx(),
            stats.probe_rx() * 1000,
            "session {} echoes were not payload-sized",
            index
        );
    }
}
