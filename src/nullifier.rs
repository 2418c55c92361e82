use crate::*;
use digest::Digest;
use indexmap::IndexSet;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha512;
use std::convert::TryInto;
use std::str::FromStr;

pub const NULLIFIER_LEN: usize = 32;

/// A one-time-use tag proving "this secret has already voted on this ballot"
/// without revealing the secret or its owner.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Nullifier([u8; NULLIFIER_LEN]);

impl Nullifier {
    /// Derive the nullifier for a (voter secret, ballot) pair.
    ///
    /// Deterministic: the same pair always produces the same value, and
    /// nothing per-call (candidate, time, randomness) enters the hash.
    pub fn derive(secret_material: &[u8], ballot: &BallotAddress) -> Self {
        let mut hasher = Sha512::new();
        hasher.update(&ballot.to_bytes());
        hasher.update(secret_material);
        let digest = hasher.finalize();

        // This unwrap is OK - the digest is always long enough
        let bytes: [u8; NULLIFIER_LEN] = digest[0..NULLIFIER_LEN].try_into().unwrap();
        Nullifier(bytes)
    }

    pub fn to_bytes(&self) -> [u8; NULLIFIER_LEN] {
        self.0
    }

    pub fn from_bytes(bytes: [u8; NULLIFIER_LEN]) -> Self {
        Nullifier(bytes)
    }
}

impl FromStr for Nullifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| Error::NullifierBadHex)?;
        let bytes: [u8; NULLIFIER_LEN] = bytes.try_into().map_err(|_| Error::NullifierBadLen)?;
        Ok(Nullifier(bytes))
    }
}

impl std::fmt::Display for Nullifier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for Nullifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        std::str::FromStr::from_str(&s).map_err(de::Error::custom)
    }
}

impl Serialize for Nullifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// The ledger-global set of spent nullifiers.
///
/// Scoped to the whole ledger, not to one ballot: values from different
/// ballots never collide because the ballot address is part of the
/// derivation. Insertion is insert-if-absent; removal exists only for
/// transaction rollback.
///
/// Backed by an IndexSet - hash sets with unstable ordering lead to
/// non-determinism when the set is walked or packed.
#[derive(Default, Clone, Debug)]
pub struct NullifierSet {
    inner: IndexSet<Nullifier>,
}

impl NullifierSet {
    /// Insert the nullifier if it is not already present.
    ///
    /// Returns false (and leaves the set unchanged) when the value was
    /// already spent.
    pub fn insert_if_absent(&mut self, nullifier: Nullifier) -> bool {
        self.inner.insert(nullifier)
    }

    /// Undo an insertion made earlier in the same transaction.
    pub(crate) fn remove(&mut self, nullifier: &Nullifier) -> bool {
        self.inner.shift_remove(nullifier)
    }

    pub fn contains(&self, nullifier: &Nullifier) -> bool {
        self.inner.contains(nullifier)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
