use crate::*;

use thiserror::Error;

/// Infrastructure error types
#[derive(Debug, Error)]
pub enum Error {
    #[error("privote: signature error: {0}")]
    SignatureError(#[from] ed25519_dalek::SignatureError),

    #[error("privote: mismatched public keys")]
    MismatchedPublicKeys,

    #[error("privote: invalid ballot address - invalid hexidecimal")]
    AddressBadHex,

    #[error("privote: invalid ballot address - wrong length")]
    AddressBadLen,

    #[error("privote: invalid nullifier - invalid hexidecimal")]
    NullifierBadHex,

    #[error("privote: invalid nullifier - wrong length")]
    NullifierBadLen,

    #[error("privote: CBOR error deserializing transaction: {0}")]
    CBORDeserialization(#[from] serde_cbor::Error),

    #[error("privote: JSON error deserializing transaction: {0}")]
    JSONDeserialization(#[from] serde_json::Error),

    #[error("privote: error deserializing transaction: unknown format")]
    DeserializationUnknownFormat,
}

/// Transaction-fatal errors
///
/// Any of these aborts the enclosing transaction; all of its effects,
/// including the nullifier insertion, are discarded.
#[derive(Debug, Error)]
pub enum BallotError {
    #[error("privote ballot: caller is not the ballot admin")]
    Unauthorized,

    #[error("privote ballot: voting has ended")]
    VotingEnded,

    #[error("privote ballot: nullifier already used - this voter has already cast a vote")]
    DuplicateVote,

    #[error("privote ballot: no ballot deployed at {0}")]
    BallotNotFound(BallotAddress),

    #[error("privote ballot: staged call targets a different ballot")]
    BallotMismatch,

    #[error("privote ballot: vote must stage exactly one public call, found {0}")]
    WrongStagedCallCount(usize),

    #[error("privote ballot: signature error: {0}")]
    SignatureError(#[from] ed25519_dalek::SignatureError),

    #[error("privote ballot: {0}")]
    Internal(#[from] Error),
}
