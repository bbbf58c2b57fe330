use bytes::Bytes;
use rand::RngCore;

/// Generates a pseudo-random payload of `size` bytes.
///
/// Each session generates its payload once before the timed send phase and
/// reuses it unmodified for every send; per-packet uniqueness is not needed.
pub fn random_payload(size: usize) -> Bytes {
    let mut buf = vec![0u8; size];
    rand::thread_rng().fill_bytes(&mut buf);

    Bytes::from(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_size() {
        assert_eq!(random_payload(1000).len(), 1000);
        assert_eq!(random_payload(0).len(), 0);
    }

    #[test]
    fn test_payloads_differ() {
        // 32 random bytes colliding would point at a broken generator.
        assert_ne!(random_payload(32), random_payload(32));
    }
}
