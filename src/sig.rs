#![allow(non_snake_case)]
//! Linkable ring signatures over ristretto255.
//!
//! A [`Ring`] is the fixed, ordered set of eligible public keys for a voting
//! round. Any member can [`sign`](Ring::sign) a ballot message without
//! revealing which key was used, and anyone can [`verify`](Ring::verify) that
//! *some* member signed it. Every signature by the same member carries the
//! same key image, so repeated signing is detectable without identifying the
//! signer.
//!
//! The construction is the classic LSAG hash chain: verification walks every
//! ring position in order, recomputing a challenge from the position's
//! commitments, and succeeds iff the chain wraps around to the signature's
//! initial challenge `c0`.
use crate::errors::{VoteError, VoteResult};
use crate::group::{self, ELEMENT_BYTES};
use crate::transcript::TranscriptProtocol;
use curve25519_dalek::constants;
use curve25519_dalek::ristretto::RistrettoPoint;
use curve25519_dalek::scalar::Scalar;
use merlin::Transcript;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

/// The ordered ring of eligible voter keys for one round, plus the
/// key-image base point derived from them. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ring {
    keys: Vec<RistrettoPoint>,
    H: RistrettoPoint,
}

/// A linkable ring signature: the initial challenge, the signer's key
/// image, and one response scalar per ring position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub c0: Scalar,
    pub key_image: RistrettoPoint,
    pub responses: Vec<Scalar>,
}

impl Ring {
    /// Build a ring from the round's eligible public keys. The key order is
    /// part of the ring's identity: two rings with the same keys in a
    /// different order produce unrelated signatures and key images.
    ///
    /// The key-image base is derived by hashing the serialized ring to a
    /// point, so it has no known discrete log relation to the basepoint or
    /// to any member key.
    pub fn new(keys: Vec<RistrettoPoint>) -> VoteResult<Ring> {
        if keys.len() < 2 {
            return Err(VoteError::RingTooSmall);
        }
        let mut bytes = Vec::with_capacity(keys.len() * ELEMENT_BYTES);
        for key in &keys {
            bytes.extend_from_slice(key.compress().as_bytes());
        }
        let H = group::hash_to_point(&bytes);
        Ok(Ring { keys, H })
    }

    /// Number of keys in the ring.
    pub fn size(&self) -> usize {
        self.keys.len()
    }

    /// The eligible public keys, in ring order.
    pub fn keys(&self) -> &[RistrettoPoint] {
        &self.keys
    }

    /// The point every member's key image is computed against.
    pub fn key_image_base(&self) -> &RistrettoPoint {
        &self.H
    }

    /// Transcript binding everything a challenge depends on besides the
    /// per-step commitments: domain separator, ring size, round context,
    /// the ring keys in order, the key image, and the ballot message.
    fn base_transcript(
        &self,
        context: &[u8],
        message: &[u8],
        key_image: &RistrettoPoint,
    ) -> VoteResult<Transcript> {
        let mut t = Transcript::new(b"ring-vote ballot");
        t.ring_sig_domain_sep(self.size() as u64);
        t.append_context(context);
        for key in &self.keys {
            t.append_point(b"ring-key", &key.compress());
        }
        t.validate_and_append_point(b"key-image", &key_image.compress())?;
        t.append_message(b"msg", message);
        Ok(t)
    }

    /// Sign `message` for this ring with the member key at `index`.
    ///
    /// The produced signature verifies under the same ring, context and
    /// message, and its key image depends only on the secret key and the
    /// ring, not on the message. Every position is processed by the same
    /// operations; the only secret-dependent values are scalars drawn from
    /// a witness-rekeyed transcript RNG.
    pub fn sign<R: RngCore + CryptoRng>(
        &self,
        context: &[u8],
        message: &[u8],
        index: usize,
        secret: &Scalar,
        rng: &mut R,
    ) -> VoteResult<Signature> {
        let n = self.size();
        if index >= n {
            return Err(VoteError::IndexOutOfBounds);
        }

        let key_image = secret * self.H;
        let base = self.base_transcript(context, message, &key_image)?;

        // Create a `TranscriptRng` from the high-level witness data
        let mut rng = {
            let mut builder = base.build_rng();
            builder = builder.rekey_with_witness_bytes(b"secret", secret.as_bytes());
            builder = builder
                .rekey_with_witness_bytes(b"index", Scalar::from(index as u64).as_bytes());
            builder.finalize(rng)
        };

        let G = constants::RISTRETTO_BASEPOINT_POINT;
        let mut c = vec![Scalar::zero(); n];
        let mut s = vec![Scalar::zero(); n];

        // Seed the chain at the signer's position, then walk the remaining
        // positions in ring order, wrapping around to just before the
        // signer.
        let u = Scalar::random(&mut rng);
        c[(index + 1) % n] = step_challenge(&base, &(u * G), &(u * self.H));
        for off in 1..n {
            let i = (index + off) % n;
            s[i] = Scalar::random(&mut rng);
            let L = s[i] * G + c[i] * self.keys[i];
            let R = s[i] * self.H + c[i] * key_image;
            c[(i + 1) % n] = step_challenge(&base, &L, &R);
        }

        // Close the ring: the signer's response folds the secret into the
        // chain so that verification at `index` reproduces u*G and u*H.
        s[index] = u - secret * c[index];

        Ok(Signature {
            c0: c[0],
            key_image,
            responses: s,
        })
    }

    /// Verify a candidate signature over `message` for this ring.
    ///
    /// Structural faults (wrong response count, non-canonical scalars, an
    /// identity key image) reject with [`VoteError::MalformedSignature`]
    /// before any chain computation. A chain that fails to close rejects
    /// with [`VoteError::InvalidSignature`]. All positions are processed
    /// identically, so the result reveals nothing about which member
    /// signed.
    pub fn verify(&self, context: &[u8], message: &[u8], sig: &Signature) -> VoteResult<()> {
        if sig.responses.len() != self.size() {
            return Err(VoteError::MalformedSignature);
        }
        if !sig.c0.is_canonical() {
            return Err(VoteError::MalformedSignature);
        }
        for s in &sig.responses {
            if !s.is_canonical() {
                return Err(VoteError::MalformedSignature);
            }
        }
        let base = self.base_transcript(context, message, &sig.key_image)?;

        let G = constants::RISTRETTO_BASEPOINT_POINT;
        let mut c = sig.c0;
        for (i, s_i) in sig.responses.iter().enumerate() {
            let L = s_i * G + c * self.keys[i];
            let R = s_i * self.H + c * sig.key_image;
            c = step_challenge(&base, &L, &R);
        }

        if c == sig.c0 {
            Ok(())
        } else {
            Err(VoteError::InvalidSignature)
        }
    }
}

/// One step of the hash chain: fold the step commitments into a clone of
/// the base transcript and draw the next challenge.
fn step_challenge(base: &Transcript, L: &RistrettoPoint, R: &RistrettoPoint) -> Scalar {
    let mut t = base.clone();
    t.append_point(b"L", &L.compress());
    t.append_point(b"R", &R.compress());
    t.challenge_scalar(b"chain")
}

impl Signature {
    /// Decode a signature from `c0 ‖ key_image ‖ s[0] ‖ … ‖ s[n-1]`, each
    /// element a fixed-width 32-byte string. Non-canonical scalars and
    /// invalid point encodings fail with [`VoteError::InvalidEncoding`].
    pub fn from_bytes(bytes: &[u8]) -> VoteResult<Signature> {
        if bytes.len() % ELEMENT_BYTES != 0 || bytes.len() < 3 * ELEMENT_BYTES {
            return Err(VoteError::InvalidEncoding);
        }
        let mut chunks = bytes.chunks(ELEMENT_BYTES);
        let c0 = group::decode_scalar(chunks.next().unwrap())?;
        let key_image = group::decode_point(chunks.next().unwrap())?;
        let responses = chunks.map(group::decode_scalar).collect::<VoteResult<_>>()?;
        Ok(Signature {
            c0,
            key_image,
            responses,
        })
    }

    /// Serialize to the fixed-width wire form read by [`from_bytes`].
    ///
    /// [`from_bytes`]: Signature::from_bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((2 + self.responses.len()) * ELEMENT_BYTES);
        bytes.extend_from_slice(self.c0.as_bytes());
        bytes.extend_from_slice(self.key_image.compress().as_bytes());
        for s in &self.responses {
            bytes.extend_from_slice(s.as_bytes());
        }
        bytes
    }
}
