//! Group arithmetic primitives shared by the signer and the verifier.
//!
//! Scalar and point arithmetic is curve25519-dalek's ristretto255 group;
//! this module adds the pieces the balloting scheme layers on top: the
//! hash-to-point function used to derive key-image bases, keypair
//! generation for ring members, and the fixed-width wire codecs with
//! strict canonicality checks.
use crate::errors::{VoteError, VoteResult};
use curve25519_dalek::constants;
use curve25519_dalek::ristretto::{CompressedRistretto, RistrettoPoint};
use curve25519_dalek::scalar::Scalar;
use rand::{CryptoRng, RngCore};
use sha3::Sha3_512;

/// Width of an encoded scalar or compressed point, in bytes.
pub const ELEMENT_BYTES: usize = 32;

/// Hash arbitrary bytes to a curve point with no known discrete log
/// relation to the basepoint. Used to derive the key-image base from a
/// ring's serialized public keys.
pub fn hash_to_point(bytes: &[u8]) -> RistrettoPoint {
    RistrettoPoint::hash_from_bytes::<Sha3_512>(bytes)
}

/// Generate a voter keypair: a secret scalar and its public point.
pub fn gen_keypair<R: RngCore + CryptoRng>(rng: &mut R) -> (Scalar, RistrettoPoint) {
    let secret = Scalar::random(rng);
    let public = secret * constants::RISTRETTO_BASEPOINT_POINT;
    (secret, public)
}

/// Decode a 32-byte string as a canonical (fully reduced) scalar.
pub fn decode_scalar(bytes: &[u8]) -> VoteResult<Scalar> {
    if bytes.len() != ELEMENT_BYTES {
        return Err(VoteError::InvalidEncoding);
    }
    let mut buf = [0u8; ELEMENT_BYTES];
    buf.copy_from_slice(bytes);
    Scalar::from_canonical_bytes(buf).ok_or(VoteError::InvalidEncoding)
}

/// Decode a 32-byte string as a compressed ristretto point.
pub fn decode_point(bytes: &[u8]) -> VoteResult<RistrettoPoint> {
    if bytes.len() != ELEMENT_BYTES {
        return Err(VoteError::InvalidEncoding);
    }
    CompressedRistretto::from_slice(bytes)
        .decompress()
        .ok_or(VoteError::InvalidEncoding)
}

#[cfg(test)]
mod tests {
    use crate::group::*;
    use rand::rngs::OsRng;

    #[test]
    fn keypair_is_consistent() {
        let (secret, public) = gen_keypair(&mut OsRng);
        assert_eq!(public, secret * constants::RISTRETTO_BASEPOINT_POINT);
    }

    #[test]
    fn scalar_codec_rejects_non_canonical() {
        let s = Scalar::random(&mut OsRng);
        assert_eq!(decode_scalar(s.as_bytes()), Ok(s));

        // The group order is not canonical (reduces to zero)
        let ell = [
            0xed, 0xd3, 0xf5, 0x5c, 0x1a, 0x63, 0x12, 0x58, 0xd6, 0x9c, 0xf7, 0xa2, 0xde, 0xf9,
            0xde, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x10,
        ];
        assert_eq!(decode_scalar(&ell), Err(VoteError::InvalidEncoding));
        assert_eq!(decode_scalar(&[0u8; 16]), Err(VoteError::InvalidEncoding));
    }

    #[test]
    fn point_codec_rejects_bad_encodings() {
        let (_, public) = gen_keypair(&mut OsRng);
        assert_eq!(decode_point(public.compress().as_bytes()), Ok(public));
        assert_eq!(decode_point(&[0xffu8; 32]), Err(VoteError::InvalidEncoding));
        assert_eq!(decode_point(&[0u8; 31]), Err(VoteError::InvalidEncoding));
    }

    #[test]
    fn hash_to_point_is_deterministic() {
        assert_eq!(hash_to_point(b"ring a"), hash_to_point(b"ring a"));
        assert_ne!(hash_to_point(b"ring a"), hash_to_point(b"ring b"));
    }
}
