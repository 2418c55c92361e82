use crate::*;
use ed25519_dalek::PublicKey;
use log::{debug, info};

/// The transaction host.
///
/// Owns the public store, the ledger-global nullifier set and the block
/// counter, and provides the atomic commit boundary: a transaction's
/// nullifier insertion and its staged public mutations commit as a
/// single unit or not at all. Callers serialize submissions (`&mut
/// self`); there is no internal concurrency.
pub struct Ledger<S: PublicStore = MemStore> {
    store: S,
    nullifiers: NullifierSet,
    block_height: u64,
}

impl Default for Ledger<MemStore> {
    fn default() -> Self {
        Ledger::new(MemStore::default())
    }
}

impl<S: PublicStore> Ledger<S> {
    pub fn new(store: S) -> Self {
        Ledger {
            store,
            nullifiers: NullifierSet::default(),
            block_height: 0,
        }
    }

    pub fn block_height(&self) -> u64 {
        self.block_height
    }

    pub fn advance_block(&mut self) {
        self.block_height += 1;
    }

    /// Deploy a new ballot at a fresh random address, writing its state
    /// slots at the current block height. Construction runs once per
    /// address; nothing can re-run it later.
    pub fn deploy(&mut self, admin: PublicKey) -> BallotAddress {
        let ballot = BallotAddress::generate();
        init_ballot(&mut self.store, &ballot, &admin, self.block_height);
        info!("deployed ballot {} at block {}", ballot, self.block_height);
        ballot
    }

    /// Execute one transaction against the ledger.
    ///
    /// All of the transaction's effects commit atomically; on any error
    /// nothing is observable afterward, including the nullifier insert.
    pub fn submit(&mut self, transaction: BallotTransaction) -> Result<(), BallotError> {
        match transaction {
            BallotTransaction::Vote(envelope) => self.apply_vote(&envelope),
            BallotTransaction::EndVote(signed) => self.apply_end_vote(&signed),
        }
    }

    fn apply_vote(&mut self, envelope: &VoteEnvelope) -> Result<(), BallotError> {
        envelope.validate()?;
        if !ballot_exists(&self.store, &envelope.ballot) {
            return Err(BallotError::BallotNotFound(envelope.ballot));
        }

        // Insert-if-absent is the sole double-vote defense
        if !self.nullifiers.insert_if_absent(envelope.nullifier) {
            return Err(BallotError::DuplicateVote);
        }

        let mut session = StoreSession::new(&self.store);
        for call in envelope.staged.iter() {
            let applied = match call {
                PublicCall::AddToTally { ballot, candidate } => {
                    crate::ballot::add_to_tally_public(&mut session, ballot, *candidate)
                }
            };

            if let Err(err) = applied {
                // The staged writes die with the session; the nullifier
                // inserted above must go with them, or a rejected vote
                // would disenfranchise the voter.
                self.nullifiers.remove(&envelope.nullifier);
                debug!("vote on {} rolled back: {}", envelope.ballot, err);
                return Err(err);
            }
        }

        for (slot, value) in session.into_writes() {
            self.store.set_slot(&slot, value);
        }
        debug!("vote committed on {}", envelope.ballot);
        Ok(())
    }

    fn apply_end_vote(&mut self, signed: &Signed<EndVoteTransaction>) -> Result<(), BallotError> {
        signed.verify_signature()?;

        let mut session = StoreSession::new(&self.store);
        crate::ballot::end_vote(&mut session, &signed.tx.ballot, &signed.tx.admin_public_key)?;

        for (slot, value) in session.into_writes() {
            self.store.set_slot(&slot, value);
        }
        info!("voting ended on ballot {}", signed.tx.ballot);
        Ok(())
    }

    // View accessors: pure reads, no authentication, safe outside any
    // committing transaction.

    pub fn get_vote(
        &self,
        ballot: &BallotAddress,
        candidate: CandidateId,
    ) -> Result<u64, BallotError> {
        crate::ballot::get_vote(&self.store, ballot, candidate)
    }

    pub fn get_vote_ended(&self, ballot: &BallotAddress) -> Result<bool, BallotError> {
        crate::ballot::get_vote_ended(&self.store, ballot)
    }

    pub fn get_admin(&self, ballot: &BallotAddress) -> Result<PublicKey, BallotError> {
        crate::ballot::get_admin(&self.store, ballot)
    }

    pub fn get_active_at_block(&self, ballot: &BallotAddress) -> Result<u64, BallotError> {
        crate::ballot::get_active_at_block(&self.store, ballot)
    }

    /// Whether a nullifier has been consumed by a committed vote.
    pub fn nullifier_spent(&self, nullifier: &Nullifier) -> bool {
        self.nullifiers.contains(nullifier)
    }
}
