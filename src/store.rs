use crate::*;
use std::collections::BTreeMap;

/// The host ledger's public key-value store.
///
/// Keys are fully-derived slot identifiers (see `SlotId`), values are
/// CBOR-packed slot contents. Transactions never write here directly;
/// their public phase goes through a `StoreSession` so the whole write
/// set lands atomically or not at all.
pub trait PublicStore {
    /// Get the raw contents of a slot
    fn get_slot(&self, slot: &SlotId) -> Option<Vec<u8>>;

    /// Set the raw contents of a slot
    fn set_slot(&mut self, slot: &SlotId, value: Vec<u8>);
}

/// A simple store that uses an in-memory BTreeMap
#[derive(Default, Clone)]
pub struct MemStore {
    inner: BTreeMap<String, Vec<u8>>,
}

impl MemStore {
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl PublicStore for MemStore {
    fn get_slot(&self, slot: &SlotId) -> Option<Vec<u8>> {
        self.inner.get(&slot.to_address()).cloned()
    }

    fn set_slot(&mut self, slot: &SlotId, value: Vec<u8>) {
        self.inner.insert(slot.to_address(), value);
    }
}

/// Buffered writes for one transaction's public phase.
///
/// Reads see the transaction's own staged writes layered over the base
/// store; nothing reaches the base until the caller applies
/// `into_writes`. Dropping the session discards the staged writes.
pub struct StoreSession<'a, S: PublicStore> {
    base: &'a S,
    staged: BTreeMap<SlotId, Vec<u8>>,
}

impl<'a, S: PublicStore> StoreSession<'a, S> {
    pub fn new(base: &'a S) -> Self {
        StoreSession {
            base,
            staged: BTreeMap::new(),
        }
    }

    /// Consume the session, yielding the write set to commit.
    pub fn into_writes(self) -> BTreeMap<SlotId, Vec<u8>> {
        self.staged
    }
}

impl<'a, S: PublicStore> PublicStore for StoreSession<'a, S> {
    fn get_slot(&self, slot: &SlotId) -> Option<Vec<u8>> {
        match self.staged.get(slot) {
            Some(value) => Some(value.clone()),
            None => self.base.get_slot(slot),
        }
    }

    fn set_slot(&mut self, slot: &SlotId, value: Vec<u8>) {
        self.staged.insert(*slot, value);
    }
}
