use crate::*;
use content_inspector::ContentType;
use ed25519_dalek::ExpandedSecretKey;
use ed25519_dalek::PublicKey;
use ed25519_dalek::SecretKey;
use ed25519_dalek::Signature;
use ed25519_dalek::Verifier;
use num_enum::TryFromPrimitive;
use serde::Serialize;
use std::convert::AsRef;
use std::ops::Deref;

/// A transaction submitted to the ledger
///
/// Votes carry no signature - a voter signature would link the nullifier
/// to an identity. The end-vote transaction is signed because the admin
/// gate needs an authenticated caller.
#[derive(Serialize, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum BallotTransaction {
    Vote(VoteEnvelope),
    EndVote(Signed<EndVoteTransaction>),
}

impl BallotTransaction {
    /// Get the transaction type
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            BallotTransaction::Vote(_) => TransactionType::Vote,
            BallotTransaction::EndVote(_) => TransactionType::EndVote,
        }
    }

    /// Get the ballot this transaction targets
    pub fn ballot(&self) -> BallotAddress {
        match self {
            BallotTransaction::Vote(envelope) => envelope.ballot,
            BallotTransaction::EndVote(signed) => signed.tx.ballot,
        }
    }

    /// Pack into bytes
    pub fn as_bytes(&self) -> Vec<u8> {
        serde_cbor::to_vec(self).expect("privote: Unexpected error packing transaction")
    }

    /// Unpack from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        match content_inspector::inspect(&bytes) {
            ContentType::UTF_8 => Ok(serde_json::from_slice(&bytes)?),
            ContentType::BINARY => Ok(serde_cbor::from_slice(&bytes)?),
            _ => Err(Error::DeserializationUnknownFormat),
        }
    }
}

impl From<VoteEnvelope> for BallotTransaction {
    fn from(envelope: VoteEnvelope) -> Self {
        BallotTransaction::Vote(envelope)
    }
}

impl From<Signed<EndVoteTransaction>> for BallotTransaction {
    fn from(signed: Signed<EndVoteTransaction>) -> Self {
        BallotTransaction::EndVote(signed)
    }
}

/// A transaction type
#[derive(Serialize, Deserialize, TryFromPrimitive, Copy, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum TransactionType {
    Vote = 1,
    EndVote = 2,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            TransactionType::Vote => "vote",
            TransactionType::EndVote => "end_vote",
        };
        write!(f, "{}", name)
    }
}

/// This trait should be considered sealed and should not be implemented outside this crate
#[doc(hidden)]
pub trait Signable: Serialize {
    fn public(&self) -> PublicKey;

    fn as_bytes(&self) -> Vec<u8> {
        serde_cbor::to_vec(&self).expect("privote: Unexpected error serializing transaction")
    }
}

/// A generic signed transaction
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Signed<T: Signable + Serialize> {
    pub tx: T,

    #[serde(with = "EdSignatureHex")]
    pub sig: Signature,
}

impl<T: Signable + Serialize> Signed<T> {
    /// Sign a transaction, producing a Signed<T>
    pub fn sign(secret: &SecretKey, transaction: T) -> Result<Self, Error> {
        let public_key = PublicKey::from(secret);
        if public_key != transaction.public() {
            return Err(Error::MismatchedPublicKeys);
        }

        let serialized = transaction.as_bytes();

        let expanded: ExpandedSecretKey = secret.into();
        let signature = expanded.sign(&serialized, &public_key);

        Ok(Signed {
            tx: transaction,
            sig: signature,
        })
    }

    /// Verify the signature on a signed transaction
    pub fn verify_signature(&self) -> Result<(), BallotError> {
        let serialized = self.tx.as_bytes();
        Ok(self.tx.public().verify(&serialized, &self.sig)?)
    }

    /// Get the inner unsigned transaction
    pub fn inner(&self) -> &T {
        &self.tx
    }
}

impl<T: Signable + Serialize> AsRef<T> for Signed<T> {
    fn as_ref(&self) -> &T {
        &self.tx
    }
}

impl<T: Signable + Serialize> Deref for Signed<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::convert::TryFrom;

    #[test]
    fn test_transaction_type() {
        assert!(TransactionType::Vote as u8 == 1);
        assert!(TransactionType::EndVote as u8 == 2);
        assert!(TransactionType::try_from(2u8).unwrap() == TransactionType::EndVote);
        assert_eq!(format!("{}", TransactionType::EndVote), "end_vote");
    }

    #[test]
    fn test_sign_and_tamper() {
        let admin = Voter::generate();
        let intruder = Voter::generate();
        let ballot = BallotAddress::generate();

        let end = EndVoteTransaction::new(ballot, admin.identity());

        // Signing with the wrong key should fail
        assert!(Signed::sign(intruder.secret_key(), end.clone()).is_err());

        let signed = Signed::sign(admin.secret_key(), end).unwrap();
        signed.verify_signature().unwrap();

        // A tampered payload must not verify
        let mut tampered = signed.clone();
        tampered.tx.ballot = BallotAddress::generate();
        assert!(tampered.verify_signature().is_err());
    }
}
