//! Per-proposal vote counters with a deterministic leader query.
use crate::errors::{VoteError, VoteResult};
use std::collections::BTreeMap;

/// Vote counts for the round's pre-registered proposals. Only proposals
/// seeded at construction can be incremented; counts start at zero and
/// never decrease.
#[derive(Debug, Clone)]
pub struct Tally {
    counts: BTreeMap<u32, u64>,
}

impl Tally {
    /// Seed the tally with the round's proposal ids, all at zero.
    /// Duplicate ids collapse to one counter.
    pub fn new(proposal_ids: &[u32]) -> VoteResult<Tally> {
        if proposal_ids.is_empty() {
            return Err(VoteError::NoProposals);
        }
        Ok(Tally {
            counts: proposal_ids.iter().map(|&id| (id, 0)).collect(),
        })
    }

    /// Whether `id` was registered for this round.
    pub fn is_registered(&self, id: u32) -> bool {
        self.counts.contains_key(&id)
    }

    /// Add one vote for `id`, returning the new count.
    pub fn increment(&mut self, id: u32) -> VoteResult<u64> {
        let count = self
            .counts
            .get_mut(&id)
            .ok_or(VoteError::UnknownProposal)?;
        *count += 1;
        Ok(*count)
    }

    /// Current count for `id`, if registered.
    pub fn count(&self, id: u32) -> Option<u64> {
        self.counts.get(&id).copied()
    }

    /// The proposal with the strictly greatest count. Ties break to the
    /// lowest id: the map iterates in ascending id order and a later entry
    /// only takes the lead with a strictly greater count. Well defined
    /// with every count at zero (the lowest id wins).
    pub fn leader(&self) -> (u32, u64) {
        let mut leader = None;
        for (&id, &count) in &self.counts {
            match leader {
                Some((_, best)) if count <= best => {}
                _ => leader = Some((id, count)),
            }
        }
        leader.expect("tally is constructed with at least one proposal")
    }
}
