use std::sync::atomic::{AtomicUsize, Ordering};

/// Per-session counters, shared between the session and its read loops.
///
/// These back the per-datagram log lines and the test assertions; there is no
/// aggregation or reporting across sessions.
#[derive(Debug, Default)]
pub struct SessionStats {
    /// Payloads sent by the traffic generator.
    payloads_tx: AtomicUsize,
    /// Datagrams observed by the probe sink loop.
    probe_rx: AtomicUsize,
    /// Total bytes observed by the probe sink loop.
    probe_bytes_rx: AtomicUsize,
    /// Datagrams echoed back by the relayed-transport loop.
    echoed: AtomicUsize,
}

impl SessionStats {
    #[inline]
    pub(crate) fn increment_tx(&self) {
        self.payloads_tx.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_probe_rx(&self, bytes: usize) {
        self.probe_rx.fetch_add(1, Ordering::Relaxed);
        self.probe_bytes_rx.fetch_add(bytes, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_echoed(&self) {
        self.echoed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn payloads_tx(&self) -> usize {
        self.payloads_tx.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn probe_rx(&self) -> usize {
        self.probe_rx.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn probe_bytes_rx(&self) -> usize {
        self.probe_bytes_rx.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn echoed(&self) -> usize {
        self.echoed.load(Ordering::Relaxed)
    }
}
