use std::{io, net::SocketAddr, process::ExitCode};

use clap::{builder::NonEmptyStringValueParser, Parser};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use relaybench::{BenchConfig, Credentials, Fleet, LoopbackRelay};

/// Concurrent load generator for TURN-style relay servers.
#[derive(Debug, Parser)]
#[command(name = "relaybench", version, about)]
struct Args {
    /// Relay server host name.
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    host: String,

    /// Relay server port.
    #[arg(long, default_value_t = 3478)]
    port: u16,

    /// Username presented to the relay server.
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    user: String,

    /// Password presented to the relay server.
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    password: String,

    /// Authentication realm.
    #[arg(long, default_value = "trtc.one")]
    realm: String,

    /// Number of concurrent client sessions.
    #[arg(long, default_value_t = 1)]
    clients: usize,

    /// Payloads sent per millisecond per client.
    #[arg(long, default_value_t = 10)]
    packets: usize,

    /// Bench duration in seconds. Advisory: the send loop runs to its own
    /// fixed ceiling.
    #[arg(long, default_value_t = 60)]
    duration: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let server = match resolve(&args.host, args.port).await {
        Ok(addr) => addr,
        Err(err) => {
            error!("failed to resolve {}:{}: {}", args.host, args.port, err);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "run clients {} duration {} {} packets per client per millisecond",
        args.clients, args.duration, args.packets
    );

    let config = BenchConfig::new(server)
        .with_clients(args.clients)
        .with_packets(args.packets)
        .with_duration_secs(args.duration);

    let credentials = Credentials {
        username: args.user,
        password: args.password,
        realm: args.realm,
    };

    let summary = Fleet::new(LoopbackRelay::new(), credentials, config)
        .run()
        .await;

    info!(
        completed = summary.completed,
        failed = summary.failed,
        "bench done"
    );

    if summary.failed > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn resolve(host: &str, port: u16) -> io::Result<SocketAddr> {
    tokio::net::lookup_host((host, port))
        .await?
        .next()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no address found for {host}:{port}"),
            )
        })
}
