use crate::*;
use ed25519_dalek::PublicKey;

/// Admin transaction closing a ballot
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EndVoteTransaction {
    pub ballot: BallotAddress,

    #[serde(with = "EdPublicKeyHex")]
    pub admin_public_key: PublicKey,
}

impl EndVoteTransaction {
    /// Create a new EndVoteTransaction for the given ballot
    pub fn new(ballot: BallotAddress, admin_public_key: PublicKey) -> Self {
        EndVoteTransaction {
            ballot,
            admin_public_key,
        }
    }
}

impl Signable for EndVoteTransaction {
    fn public(&self) -> PublicKey {
        self.admin_public_key
    }
}
