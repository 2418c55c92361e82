use crate::*;
use digest::Digest;
use ed25519_dalek::PublicKey;
use lazy_static::lazy_static;
use num_enum::TryFromPrimitive;
use rand::Rng;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha512;
use std::convert::TryInto;
use std::str::FromStr;

/// Candidate identifiers are opaque integer keys.
pub type CandidateId = u64;

lazy_static! {
    static ref SLOT_PREFIX: String = {
        let digest = Sha512::digest(b"privote");
        hex::encode(&digest[..3])
    };
}

/// The address of a deployed ballot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BallotAddress([u8; 16]);

impl BallotAddress {
    /// Assign a fresh random address.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng {};
        let address: [u8; 16] = csprng.gen();
        BallotAddress(address)
    }

    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        BallotAddress(bytes)
    }

    pub fn to_bytes(&self) -> [u8; 16] {
        self.0
    }
}

impl FromStr for BallotAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| Error::AddressBadHex)?;
        let bytes: [u8; 16] = bytes.try_into().map_err(|_| Error::AddressBadLen)?;
        Ok(BallotAddress(bytes))
    }
}

impl std::fmt::Display for BallotAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for BallotAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        std::str::FromStr::from_str(&s).map_err(de::Error::custom)
    }
}

impl Serialize for BallotAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// The four logical state slots of a ballot.
#[derive(TryFromPrimitive, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SlotTag {
    Admin = 1,
    Tally = 2,
    VoteEnded = 3,
    ActiveAtBlock = 4,
}

/// A fully-derived slot identifier.
///
/// Two implementations using the same derivation scheme address the same
/// storage, so the scheme is fixed: sha512 over the ballot address and
/// slot tag, truncated to 32 bytes. Candidate counts hang off the tally
/// slot (map-slot derivation) rather than the ballot address directly.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId([u8; 32]);

impl SlotId {
    pub fn for_slot(ballot: &BallotAddress, tag: SlotTag) -> Self {
        let mut hasher = Sha512::new();
        hasher.update(&ballot.to_bytes());
        hasher.update(&[tag as u8]);
        let digest = hasher.finalize();

        // This unwrap is OK - the digest is always long enough
        let bytes: [u8; 32] = digest[0..32].try_into().unwrap();
        SlotId(bytes)
    }

    pub fn for_tally_key(ballot: &BallotAddress, candidate: CandidateId) -> Self {
        let tally_slot = SlotId::for_slot(ballot, SlotTag::Tally);

        let mut hasher = Sha512::new();
        hasher.update(&tally_slot.0);
        hasher.update(&candidate.to_le_bytes());
        let digest = hasher.finalize();

        // This unwrap is OK - the digest is always long enough
        let bytes: [u8; 32] = digest[0..32].try_into().unwrap();
        SlotId(bytes)
    }

    /// The namespaced store key for this slot.
    pub fn to_address(&self) -> String {
        format!("{}{}", SLOT_PREFIX.as_str(), hex::encode(&self.0))
    }
}

fn read_slot<T, S>(store: &S, slot: &SlotId) -> Result<Option<T>, Error>
where
    T: serde::de::DeserializeOwned,
    S: PublicStore,
{
    match store.get_slot(slot) {
        Some(packed) => Ok(Some(serde_cbor::from_slice(&packed)?)),
        None => Ok(None),
    }
}

fn write_slot<T, S>(store: &mut S, slot: &SlotId, value: &T)
where
    T: Serialize,
    S: PublicStore,
{
    let packed = serde_cbor::to_vec(value).expect("privote: Unexpected error packing slot value");
    store.set_slot(slot, packed);
}

/// Write the state slots for a newly deployed ballot.
///
/// Admin and ActiveAtBlock are immutable after this; VoteEnded starts
/// false; tally slots are created lazily by the first vote for each
/// candidate.
pub(crate) fn init_ballot<S: PublicStore>(
    store: &mut S,
    ballot: &BallotAddress,
    admin: &PublicKey,
    block: u64,
) {
    write_slot(store, &SlotId::for_slot(ballot, SlotTag::Admin), admin);
    write_slot(store, &SlotId::for_slot(ballot, SlotTag::VoteEnded), &false);
    write_slot(
        store,
        &SlotId::for_slot(ballot, SlotTag::ActiveAtBlock),
        &block,
    );
}

pub(crate) fn ballot_exists<S: PublicStore>(store: &S, ballot: &BallotAddress) -> bool {
    store
        .get_slot(&SlotId::for_slot(ballot, SlotTag::Admin))
        .is_some()
}

/// Increment the tally for a candidate.
///
/// Internal-only: reachable solely as the staged effect of a submitted
/// vote envelope, never by external callers. Fails with `VotingEnded`
/// once the ballot is closed, which aborts the enclosing transaction.
pub(crate) fn add_to_tally_public<S: PublicStore>(
    store: &mut S,
    ballot: &BallotAddress,
    candidate: CandidateId,
) -> Result<(), BallotError> {
    if get_vote_ended(store, ballot)? {
        return Err(BallotError::VotingEnded);
    }

    let slot = SlotId::for_tally_key(ballot, candidate);
    let count: u64 = read_slot(store, &slot)?
        .unwrap_or(0);
    write_slot(store, &slot, &(count + 1));
    Ok(())
}

/// Close voting. Caller must be the stored admin.
///
/// A second close attempt fails with `VotingEnded` rather than silently
/// succeeding; the transition is one-shot.
pub(crate) fn end_vote<S: PublicStore>(
    store: &mut S,
    ballot: &BallotAddress,
    caller: &PublicKey,
) -> Result<(), BallotError> {
    let admin = get_admin(store, ballot)?;
    if &admin != caller {
        return Err(BallotError::Unauthorized);
    }
    if get_vote_ended(store, ballot)? {
        return Err(BallotError::VotingEnded);
    }

    write_slot(store, &SlotId::for_slot(ballot, SlotTag::VoteEnded), &true);
    Ok(())
}

/// Current count for a candidate; 0 for candidates nobody has voted for.
pub fn get_vote<S: PublicStore>(
    store: &S,
    ballot: &BallotAddress,
    candidate: CandidateId,
) -> Result<u64, BallotError> {
    // Distinguish an unknown ballot from an unseen candidate
    if !ballot_exists(store, ballot) {
        return Err(BallotError::BallotNotFound(*ballot));
    }

    let count = read_slot(store, &SlotId::for_tally_key(ballot, candidate))?
        .unwrap_or(0);
    Ok(count)
}

pub fn get_vote_ended<S: PublicStore>(
    store: &S,
    ballot: &BallotAddress,
) -> Result<bool, BallotError> {
    let ended = read_slot(store, &SlotId::for_slot(ballot, SlotTag::VoteEnded))?
        .ok_or(BallotError::BallotNotFound(*ballot))?;
    Ok(ended)
}

pub fn get_admin<S: PublicStore>(
    store: &S,
    ballot: &BallotAddress,
) -> Result<PublicKey, BallotError> {
    let admin = read_slot(store, &SlotId::for_slot(ballot, SlotTag::Admin))?
        .ok_or(BallotError::BallotNotFound(*ballot))?;
    Ok(admin)
}

pub fn get_active_at_block<S: PublicStore>(
    store: &S,
    ballot: &BallotAddress,
) -> Result<u64, BallotError> {
    let block = read_slot(store, &SlotId::for_slot(ballot, SlotTag::ActiveAtBlock))?
        .ok_or(BallotError::BallotNotFound(*ballot))?;
    Ok(block)
}
