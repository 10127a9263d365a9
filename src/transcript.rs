//! Defines a `TranscriptProtocol` trait for using a Merlin transcript.
use crate::errors::{VoteError, VoteResult};

use curve25519_dalek::ristretto::CompressedRistretto;
use curve25519_dalek::scalar::Scalar;

use merlin::Transcript;

pub trait TranscriptProtocol {
    /// Append a domain separator for a ballot signature over an `n` key ring.
    fn ring_sig_domain_sep(&mut self, n: u64);

    /// Append the round's context-binding identity. Signatures minted for
    /// one round never verify under another.
    fn append_context(&mut self, context: &[u8]);

    /// Append a `point` with the given `label`.
    fn append_point(&mut self, label: &'static [u8], point: &CompressedRistretto);

    /// Check that a point is not the identity, then append it to the
    /// transcript.  Otherwise, return an error.
    fn validate_and_append_point(
        &mut self,
        label: &'static [u8],
        point: &CompressedRistretto,
    ) -> VoteResult<()>;

    /// Compute a `label`ed challenge variable.
    fn challenge_scalar(&mut self, label: &'static [u8]) -> Scalar;
}

impl TranscriptProtocol for Transcript {
    fn ring_sig_domain_sep(&mut self, n: u64) {
        self.append_message(b"dom-sep", b"ring-vote sig v1");
        self.append_u64(b"n", n);
    }

    fn append_context(&mut self, context: &[u8]) {
        self.append_message(b"context", context);
    }

    fn append_point(&mut self, label: &'static [u8], point: &CompressedRistretto) {
        self.append_message(label, point.as_bytes());
    }

    fn validate_and_append_point(
        &mut self,
        label: &'static [u8],
        point: &CompressedRistretto,
    ) -> VoteResult<()> {
        use curve25519_dalek::traits::IsIdentity;

        if point.is_identity() {
            Err(VoteError::MalformedSignature)
        } else {
            Ok(self.append_message(label, point.as_bytes()))
        }
    }

    fn challenge_scalar(&mut self, label: &'static [u8]) -> Scalar {
        let mut buf = [0u8; 64];
        self.challenge_bytes(label, &mut buf);

        Scalar::from_bytes_mod_order_wide(&buf)
    }
}
