//! The voting state machine: verify, link-check, tally.
//!
//! An [`Election`] owns everything one round needs: the fixed [`Ring`] of
//! eligible voter keys, the context identity that scopes ballot messages,
//! and the mutable ledger (key-image registry plus tally) behind a single
//! lock. Each vote submission either fully completes or leaves the ledger
//! untouched; there is no observable in-between state.
use crate::errors::{VoteError, VoteResult};
use crate::registry::KeyImageRegistry;
use crate::sig::{Ring, Signature};
use crate::tally::Tally;
use std::sync::{Mutex, MutexGuard};

/// Result of one vote submission, returned to the caller and never
/// persisted. Every rejection names its reason so the caller can tell a
/// voter "resubmit" apart from "you already voted".
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum VoteOutcome {
    /// Signature verified, key image fresh, tally incremented.
    Accepted,
    /// Nothing was recorded; the reason says why.
    Rejected(VoteError),
}

/// Registry and tally live behind one lock so that check-and-record and
/// the tally increment form a single unit of work.
#[derive(Debug)]
struct Ledger {
    images: KeyImageRegistry,
    tally: Tally,
}

/// One voting round over a fixed ring of eligible voters and a fixed set
/// of proposal ids.
#[derive(Debug)]
pub struct Election {
    ring: Ring,
    context: Vec<u8>,
    ledger: Mutex<Ledger>,
}

impl Election {
    /// Set up a round. The ring and proposal list are immutable from here
    /// on; duplicate proposal ids collapse to one counter.
    pub fn new(ring: Ring, proposal_ids: &[u32]) -> VoteResult<Election> {
        let tally = Tally::new(proposal_ids)?;
        Ok(Election {
            ring,
            context: Vec::new(),
            ledger: Mutex::new(Ledger {
                images: KeyImageRegistry::new(),
                tally,
            }),
        })
    }

    /// Bind the round to an identity (a deployment address, round label,
    /// or similar). Administrative, pre-round: all ballot hashing is
    /// scoped by it, so signatures minted for one deployment cannot be
    /// replayed against another. Takes `&mut self` and therefore cannot
    /// race with in-flight submissions.
    pub fn bind_context(&mut self, identity: &[u8]) {
        self.context = identity.to_vec();
    }

    /// The ring of eligible voter keys for this round.
    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    /// The bound context identity (empty until [`bind_context`] is called).
    ///
    /// [`bind_context`]: Election::bind_context
    pub fn context(&self) -> &[u8] {
        &self.context
    }

    /// Submit one vote: a proposal id, the ballot message the signature
    /// was minted over, and the ring signature itself.
    ///
    /// Processing order matches the rejection taxonomy: unknown proposal
    /// ids are refused before any work, malformed signatures before any
    /// chain arithmetic, a non-closing chain after full verification, and
    /// a duplicate key image after verification but with the tally left
    /// untouched. A voter gets one counted vote per round, not per
    /// proposal: the key image is independent of the message, so a second
    /// submission is rejected even for a different proposal id.
    pub fn submit_vote(&self, proposal_id: u32, message: &[u8], sig: &Signature) -> VoteOutcome {
        if let Err(e) = self.check_vote(proposal_id, message, sig) {
            return VoteOutcome::Rejected(e);
        }
        VoteOutcome::Accepted
    }

    fn check_vote(&self, proposal_id: u32, message: &[u8], sig: &Signature) -> VoteResult<()> {
        // Cheap structural check first; no verification work for a
        // proposal that was never registered.
        {
            let ledger = self.lock_ledger();
            if !ledger.tally.is_registered(proposal_id) {
                return Err(VoteError::UnknownProposal);
            }
        }

        // Pure computation; deliberately outside the ledger lock.
        self.ring.verify(&self.context, message, sig)?;

        // Check-and-record and the increment under one lock acquisition:
        // no other submission can observe the registry between this
        // call's membership check and its insert.
        let mut ledger = self.lock_ledger();
        if ledger.images.contains(&sig.key_image) {
            return Err(VoteError::DuplicateVote);
        }
        ledger.images.record(&sig.key_image);
        ledger.tally.increment(proposal_id)?;
        Ok(())
    }

    /// The current leading proposal and its count. Ties break to the
    /// lowest proposal id; with no votes cast this is the lowest id at
    /// zero.
    pub fn leader(&self) -> (u32, u64) {
        self.lock_ledger().tally.leader()
    }

    /// Current count for one proposal, if registered.
    pub fn vote_count(&self, proposal_id: u32) -> Option<u64> {
        self.lock_ledger().tally.count(proposal_id)
    }

    /// Number of counted votes this round (equals the registry size).
    pub fn votes_cast(&self) -> usize {
        self.lock_ledger().images.len()
    }

    fn lock_ledger(&self) -> MutexGuard<'_, Ledger> {
        // No code path panics while holding the lock, so a poisoned
        // ledger is still consistent.
        self.ledger.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use crate::ballot::*;
    use crate::errors::*;
    use crate::group::gen_keypair;
    use crate::sig::Ring;
    use curve25519_dalek::ristretto::RistrettoPoint;
    use curve25519_dalek::scalar::Scalar;
    use rand::rngs::OsRng;
    use std::sync::Arc;

    fn test_election(n: usize, proposals: &[u32]) -> (Vec<Scalar>, Election) {
        let (secrets, keys): (Vec<Scalar>, Vec<RistrettoPoint>) =
            (0..n).map(|_| gen_keypair(&mut OsRng)).unzip();
        let mut election = Election::new(Ring::new(keys).unwrap(), proposals).unwrap();
        election.bind_context(b"test round");
        (secrets, election)
    }

    fn cast(election: &Election, secrets: &[Scalar], index: usize, proposal: u32) -> VoteOutcome {
        let message = proposal.to_be_bytes();
        let sig = election
            .ring()
            .sign(election.context(), &message, index, &secrets[index], &mut OsRng)
            .unwrap();
        election.submit_vote(proposal, &message, &sig)
    }

    #[test]
    fn valid_vote_is_accepted_and_tallied() {
        let (secrets, election) = test_election(5, &[1, 2, 3]);
        assert_eq!(cast(&election, &secrets, 2, 1), VoteOutcome::Accepted);
        assert_eq!(election.leader(), (1, 1));
        assert_eq!(election.vote_count(1), Some(1));
        assert_eq!(election.votes_cast(), 1);
    }

    #[test]
    fn resubmitting_a_signature_is_a_duplicate() {
        let (secrets, election) = test_election(5, &[1, 2]);
        let message = 1u32.to_be_bytes();
        let sig = election
            .ring()
            .sign(election.context(), &message, 0, &secrets[0], &mut OsRng)
            .unwrap();

        assert_eq!(election.submit_vote(1, &message, &sig), VoteOutcome::Accepted);
        assert_eq!(
            election.submit_vote(1, &message, &sig),
            VoteOutcome::Rejected(VoteError::DuplicateVote)
        );
        assert_eq!(election.leader(), (1, 1));
        assert_eq!(election.votes_cast(), 1);
    }

    #[test]
    fn one_vote_per_round_not_per_proposal() {
        let (secrets, election) = test_election(5, &[1, 2]);
        assert_eq!(cast(&election, &secrets, 3, 1), VoteOutcome::Accepted);
        // Fresh signature, different proposal, same voter: still linked
        // by the key image.
        assert_eq!(
            cast(&election, &secrets, 3, 2),
            VoteOutcome::Rejected(VoteError::DuplicateVote)
        );
        assert_eq!(election.vote_count(2), Some(0));
        assert_eq!(election.votes_cast(), 1);
    }

    #[test]
    fn distinct_voters_both_count() {
        let (secrets, election) = test_election(5, &[1, 2]);
        assert_eq!(cast(&election, &secrets, 0, 1), VoteOutcome::Accepted);
        assert_eq!(cast(&election, &secrets, 4, 1), VoteOutcome::Accepted);
        assert_eq!(election.leader(), (1, 2));
        assert_eq!(election.votes_cast(), 2);
    }

    #[test]
    fn invalid_signature_leaves_ledger_untouched() {
        let (secrets, election) = test_election(5, &[1]);
        let message = 1u32.to_be_bytes();
        let mut sig = election
            .ring()
            .sign(election.context(), &message, 1, &secrets[1], &mut OsRng)
            .unwrap();
        sig.c0 += Scalar::one();

        assert_eq!(
            election.submit_vote(1, &message, &sig),
            VoteOutcome::Rejected(VoteError::InvalidSignature)
        );
        assert_eq!(election.leader(), (1, 0));
        assert_eq!(election.votes_cast(), 0);
    }

    #[test]
    fn malformed_signature_is_rejected() {
        let (secrets, election) = test_election(5, &[1]);
        let message = 1u32.to_be_bytes();
        let mut sig = election
            .ring()
            .sign(election.context(), &message, 1, &secrets[1], &mut OsRng)
            .unwrap();
        sig.responses.pop();

        assert_eq!(
            election.submit_vote(1, &message, &sig),
            VoteOutcome::Rejected(VoteError::MalformedSignature)
        );
        assert_eq!(election.votes_cast(), 0);
    }

    #[test]
    fn unknown_proposal_is_rejected_before_any_state_change() {
        let (secrets, election) = test_election(5, &[1, 2]);
        let message = 9u32.to_be_bytes();
        let sig = election
            .ring()
            .sign(election.context(), &message, 1, &secrets[1], &mut OsRng)
            .unwrap();

        assert_eq!(
            election.submit_vote(9, &message, &sig),
            VoteOutcome::Rejected(VoteError::UnknownProposal)
        );
        assert_eq!(election.votes_cast(), 0);
        assert_eq!(election.leader(), (1, 0));

        // The same voter can still cast a real vote afterwards
        assert_eq!(cast(&election, &secrets, 1, 2), VoteOutcome::Accepted);
    }

    #[test]
    fn context_binding_prevents_cross_round_replay() {
        // Same ring, independently deployed rounds with different bound
        // identities.
        let (secrets, election) = test_election(5, &[1]);
        let mut other = Election::new(election.ring().clone(), &[1]).unwrap();
        other.bind_context(b"a different round");

        let message = 1u32.to_be_bytes();
        let sig = election
            .ring()
            .sign(election.context(), &message, 0, &secrets[0], &mut OsRng)
            .unwrap();
        assert_eq!(
            other.submit_vote(1, &message, &sig),
            VoteOutcome::Rejected(VoteError::InvalidSignature)
        );
    }

    #[test]
    fn concurrent_duplicates_count_exactly_once() {
        let (secrets, election) = test_election(5, &[1, 2]);
        let election = Arc::new(election);

        let message = 1u32.to_be_bytes();
        let sig = election
            .ring()
            .sign(election.context(), &message, 2, &secrets[2], &mut OsRng)
            .unwrap();

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let election = Arc::clone(&election);
                let sig = sig.clone();
                std::thread::spawn(move || election.submit_vote(1, &message, &sig))
            })
            .collect();
        let outcomes: Vec<VoteOutcome> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        let accepted = outcomes
            .iter()
            .filter(|o| **o == VoteOutcome::Accepted)
            .count();
        assert_eq!(accepted, 1);
        assert!(outcomes.contains(&VoteOutcome::Rejected(VoteError::DuplicateVote)));
        assert_eq!(election.leader(), (1, 1));
        assert_eq!(election.votes_cast(), 1);
    }
}
