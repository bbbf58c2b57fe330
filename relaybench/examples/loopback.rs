//! Two-client bench against the in-process loopback relay.
//!
//! Run with: `cargo run --example loopback`

use std::time::Duration;

use relaybench::{BenchConfig, Credentials, Fleet, LoopbackRelay};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let config = BenchConfig::new("127.0.0.1:3478".parse().unwrap())
        .with_clients(2)
        .with_packets(1)
        .with_send_ceiling(Duration::from_millis(100));

    let credentials = Credentials {
        username: "bench".to_string(),
        password: "bench".to_string(),
        realm: "trtc.one".to_string(),
    };

    let summary = Fleet::new(LoopbackRelay::new(), credentials, config)
        .run()
        .await;

    println!("completed: {} failed: {}", summary.completed, summary.failed);
}
