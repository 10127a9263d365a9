//! Anonymous, double-vote-resistant balloting built on
//! [linkable ring signatures](https://eprint.iacr.org/2004/027).
//!
//! A fixed set of eligible voters, each holding a keypair, cast votes for
//! proposals. Any observer can check that a ballot was signed by *some*
//! eligible voter without learning which one, and no voter can get more
//! than one counted vote: every signature by the same voter carries the
//! same key image, and the ledger refuses a key image it has seen before.
//!
//! # Examples
//! Run a small round end to end:
//! ```
//! # use rand::rngs::OsRng; // You should use a more secure RNG
//! # use ring_vote::group::gen_keypair;
//! # use ring_vote::sig::Ring;
//! # use ring_vote::ballot::{Election, VoteOutcome};
//! #
//! // Five eligible voters, each holding a keypair
//! let (secrets, keys): (Vec<_>, Vec<_>) =
//!     (0..5).map(|_| gen_keypair(&mut OsRng)).unzip();
//!
//! // Set up the round: the ring of voter keys, three proposals, and a
//! // context identity that scopes every ballot to this deployment
//! let ring = Ring::new(keys).unwrap();
//! let mut election = Election::new(ring, &[1, 2, 3]).unwrap();
//! election.bind_context(b"community budget, spring round");
//!
//! // Voter 3 signs a ballot for proposal 2 and submits it
//! let message = 2u32.to_be_bytes();
//! let sig = election
//!     .ring()
//!     .sign(election.context(), &message, 3, &secrets[3], &mut OsRng)
//!     .unwrap();
//! assert_eq!(election.submit_vote(2, &message, &sig), VoteOutcome::Accepted);
//! assert_eq!(election.leader(), (2, 1));
//!
//! // A fresh signature from the same voter carries the same key image,
//! // so the ledger links it and refuses to count it again
//! let again = election
//!     .ring()
//!     .sign(election.context(), &message, 3, &secrets[3], &mut OsRng)
//!     .unwrap();
//! assert!(matches!(
//!     election.submit_vote(2, &message, &again),
//!     VoteOutcome::Rejected(_)
//! ));
//! assert_eq!(election.leader(), (2, 1));
//! ```
//! Verify a signature directly, without the ledger:
//! ```
//! # use rand::rngs::OsRng; // You should use a more secure RNG
//! # use ring_vote::group::gen_keypair;
//! # use ring_vote::sig::Ring;
//! #
//! let (secrets, keys): (Vec<_>, Vec<_>) =
//!     (0..4).map(|_| gen_keypair(&mut OsRng)).unzip();
//! let ring = Ring::new(keys).unwrap();
//!
//! let sig = ring.sign(b"round", b"Hello, World!", 1, &secrets[1], &mut OsRng).unwrap();
//! assert!(ring.verify(b"round", b"Hello, World!", &sig).is_ok());
//!
//! // Verification fails for any other message
//! assert!(ring.verify(b"round", b"Goodbye, World!", &sig).is_err());
//! ```
//!
//! # References
//! * [Linkable Spontaneous Anonymous Group Signature for Ad Hoc Groups](https://eprint.iacr.org/2004/027)
//! * [Ring Confidential Transactions](https://eprint.iacr.org/2015/1098)

//-----------------------------------------------------------------------------
// Public modules
//-----------------------------------------------------------------------------
pub mod ballot;
pub mod errors;
pub mod group;
pub mod registry;
pub mod sig;
pub mod tally;

//-----------------------------------------------------------------------------
// Internal modules
//-----------------------------------------------------------------------------
pub(crate) mod transcript;
