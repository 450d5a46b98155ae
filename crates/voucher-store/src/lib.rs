//! Dedup store backends shared by the Voucher binaries.

pub mod memory;
pub mod moka;

pub use self::memory::InMemoryDedupStore;
pub use self::moka::MokaDedupStore;
pub use voucher_core::{Admission, DedupStore, StoreError};
