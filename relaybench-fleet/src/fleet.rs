use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, info};

use relaybench_client::{Credentials, RelayConnector};

use crate::{config::BenchConfig, session::Session};

/// Launches the configured number of concurrent sessions and joins them all.
///
/// Completion signaling is structural: every spawned session yields exactly
/// one result through the join set, whether it returns or panics, so a failed
/// session can never strand the final join.
pub struct Fleet<C: RelayConnector> {
    connector: Arc<C>,
    credentials: Credentials,
    config: Arc<BenchConfig>,
}

/// Aggregate outcome of one benchmark run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FleetSummary {
    /// Sessions that ran their traffic loop to completion.
    pub completed: usize,
    /// Sessions that aborted with an error or panicked.
    pub failed: usize,
}

impl<C: RelayConnector> Fleet<C> {
    /// Creates a fleet over `connector`.
    pub fn new(connector: C, credentials: Credentials, config: BenchConfig) -> Self {
        Self {
            connector: Arc::new(connector),
            credentials,
            config: Arc::new(config),
        }
    }

    /// Runs every session to completion and returns the summary.
    pub async fn run(self) -> FleetSummary {
        debug!(
            clients = self.config.clients,
            packets = self.config.packets,
            duration_secs = self.config.duration_secs,
            "starting fleet"
        );

        let mut sessions = JoinSet::new();

        for index in 0..self.config.clients {
            let session = Session::new(
                index,
                Arc::clone(&self.connector),
                self.credentials.clone(),
                Arc::clone(&self.config),
            );

            sessions.spawn(async move { (index, session.run().await) });
        }

        let mut summary = FleetSummary {
            completed: 0,
            failed: 0,
        };

        while let Some(joined) = sessions.join_next().await {
            match joined {
                Ok((index, Ok(report))) => {
                    info!(session = index, batches = report.batches, "session completed");
                    summary.completed += 1;
                }
                Ok((index, Err(err))) => {
                    error!(session = index, "session failed: {}", err);
                    summary.failed += 1;
                }
                Err(err) => {
                    error!("session task panicked: {}", err);
                    summary.failed += 1;
                }
            }
        }

        summary
    }
}
