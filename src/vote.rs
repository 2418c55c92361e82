use crate::*;

/// A public mutation staged by a private phase, applied at commit.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "call")]
#[serde(rename_all = "snake_case")]
pub enum PublicCall {
    AddToTally {
        ballot: BallotAddress,
        candidate: CandidateId,
    },
}

impl PublicCall {
    pub fn ballot(&self) -> BallotAddress {
        match self {
            PublicCall::AddToTally { ballot, .. } => *ballot,
        }
    }
}

/// The output of a vote's private phase.
///
/// Carries no voter-identifying material and no signature: the nullifier
/// is the only credential, and nothing in the envelope links it back to
/// the voter.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VoteEnvelope {
    pub ballot: BallotAddress,
    pub nullifier: Nullifier,
    pub staged: Vec<PublicCall>,
}

impl VoteEnvelope {
    /// Structural checks run before execution.
    pub fn validate(&self) -> Result<(), BallotError> {
        if self.staged.len() != 1 {
            return Err(BallotError::WrongStagedCallCount(self.staged.len()));
        }
        for call in self.staged.iter() {
            if call.ballot() != self.ballot {
                return Err(BallotError::BallotMismatch);
            }
        }
        Ok(())
    }
}

/// The private phase of casting a vote.
///
/// Derives the voter's nullifier for this ballot and stages exactly one
/// public tally increment. Nothing here touches public state - the
/// envelope becomes effective only when the ledger commits it, and the
/// nullifier insertion commits or rolls back with the staged call.
pub fn cast_vote(voter: &Voter, ballot: BallotAddress, candidate: CandidateId) -> VoteEnvelope {
    let nullifier = voter.nullifier(&ballot);

    VoteEnvelope {
        ballot,
        nullifier,
        staged: vec![PublicCall::AddToTally { ballot, candidate }],
    }
}
