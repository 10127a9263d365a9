//! Set of key images already spent on a counted vote.
use curve25519_dalek::ristretto::RistrettoPoint;
use std::collections::HashSet;

/// The double-vote guard: every counted vote records its key image here,
/// and a key image is only ever counted once. The set grows monotonically
/// for the life of a round.
///
/// The registry stores compressed images, so membership is exact point
/// equality regardless of how the point was computed.
#[derive(Debug, Default, Clone)]
pub struct KeyImageRegistry {
    seen: HashSet<[u8; 32]>,
}

impl KeyImageRegistry {
    pub fn new() -> KeyImageRegistry {
        KeyImageRegistry::default()
    }

    /// Whether this key image was already recorded.
    pub fn contains(&self, image: &RistrettoPoint) -> bool {
        self.seen.contains(image.compress().as_bytes())
    }

    /// Record a key image. Returns false if it was already present; the
    /// insert is idempotent either way.
    pub fn record(&mut self, image: &RistrettoPoint) -> bool {
        self.seen.insert(image.compress().to_bytes())
    }

    /// Number of distinct key images recorded so far.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::group::gen_keypair;
    use crate::registry::*;
    use rand::rngs::OsRng;

    #[test]
    fn record_is_idempotent() {
        let (_, image) = gen_keypair(&mut OsRng);
        let mut registry = KeyImageRegistry::new();

        assert!(!registry.contains(&image));
        assert!(registry.record(&image));
        assert!(registry.contains(&image));
        assert!(!registry.record(&image));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn distinct_images_accumulate() {
        let mut registry = KeyImageRegistry::new();
        let images: Vec<RistrettoPoint> =
            (0..8).map(|_| gen_keypair(&mut OsRng).1).collect();
        for image in &images {
            assert!(registry.record(image));
        }
        assert_eq!(registry.len(), images.len());
        for image in &images {
            assert!(registry.contains(image));
        }
    }
}
