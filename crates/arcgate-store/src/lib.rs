//! Identity records and the pending whitelist for Arcgate.
//!
//! Arcgate does not ship a database. It defines the [`UserRecordStore`]
//! contract the verification pipeline relies on and an in-memory engine,
//! [`MemoryUserStore`], that honours it. Production gateways implement the
//! trait over their own storage.
//!
//! # Key types
//!
//! - [`UserRecord`] — the durable remote → local identity binding
//! - [`UserRecordStore`] — lookups plus compare-and-swap insert
//! - [`MemoryUserStore`] — in-process implementation
//! - [`WhitelistCache`] — identifiers approved before their first login

#![allow(async_fn_in_trait)]

mod error;
mod memory;
mod record;
mod store;
mod whitelist;

pub use error::StoreError;
pub use memory::MemoryUserStore;
pub use record::UserRecord;
pub use store::UserRecordStore;
pub use whitelist::WhitelistCache;
