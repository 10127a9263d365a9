//! Errors which may occur while verifying signatures or recording votes.
use thiserror::Error;

/// Represents an error during ballot verification or tallying.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum VoteError {
    /// Byte string is not a canonical scalar or a valid curve point
    #[error("encoding is not a canonical scalar or a valid curve point")]
    InvalidEncoding,
    /// Signature is structurally unusable: wrong response count,
    /// non-canonical scalar, or an identity key image
    #[error("signature is malformed")]
    MalformedSignature,
    /// The recomputed hash chain does not close over the ring
    #[error("ring signature does not verify")]
    InvalidSignature,
    /// The signature's key image was already recorded this round
    #[error("key image already recorded; one vote per round")]
    DuplicateVote,
    /// Proposal id is not part of the pre-registered set
    #[error("unknown proposal id")]
    UnknownProposal,
    /// A ring needs at least two members to hide the signer
    #[error("ring is too small")]
    RingTooSmall,
    /// Signer index lies outside the ring
    #[error("signer index out of bounds")]
    IndexOutOfBounds,
    /// A round must register at least one proposal
    #[error("no proposals registered")]
    NoProposals,
}

/// Results returned from this crate's fallible operations.
pub type VoteResult<T> = Result<T, VoteError>;
