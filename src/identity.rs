use crate::*;
use ed25519_dalek::Keypair;
use ed25519_dalek::PublicKey;
use ed25519_dalek::SecretKey;

/// A voting identity: an ed25519 keypair held by a voter or an admin.
///
/// The public key is the identity used in admin checks. The secret key
/// feeds nullifier derivation and never appears in anything the ledger
/// stores or a transaction carries.
pub struct Voter {
    pub public_key: PublicKey,
    secret: SecretKey,
}

impl Voter {
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng {};
        let Keypair { public, secret } = Keypair::generate(&mut csprng);
        Voter {
            public_key: public,
            secret,
        }
    }

    /// The public identity presented to admin gates.
    pub fn identity(&self) -> PublicKey {
        self.public_key
    }

    /// The signing key, for transactions that carry a signature.
    pub fn secret_key(&self) -> &SecretKey {
        &self.secret
    }

    /// Derive this voter's nullifier for the given ballot.
    ///
    /// One value per (voter, ballot) pair - the candidate never enters
    /// the derivation.
    pub fn nullifier(&self, ballot: &BallotAddress) -> Nullifier {
        Nullifier::derive(self.secret.as_bytes(), ballot)
    }
}
