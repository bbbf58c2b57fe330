mod config;
mod fleet;
mod loops;
mod payload;
mod session;
mod stats;
mod traffic;

pub use config::{BenchConfig, DEFAULT_PAYLOAD_SIZE, DEFAULT_RECV_BUFFER_SIZE};
pub use fleet::{Fleet, FleetSummary};
pub use payload::random_payload;
pub use session::{Session, SessionError, SessionReport};
pub use stats::SessionStats;
