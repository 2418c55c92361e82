#[macro_use]
extern crate serde;

mod ballot;
mod error;
mod identity;
mod ledger;
mod nullifier;
mod serde_hex;
mod store;
mod transaction;
mod vote;
mod voting_end;

pub use ballot::*;
pub use error::*;
pub use identity::*;
pub use ledger::*;
pub use nullifier::*;
pub use serde_hex::*;
pub use store::*;
pub use transaction::*;
pub use vote::*;
pub use voting_end::*;

#[cfg(test)]
mod tests;
