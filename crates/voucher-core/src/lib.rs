//! Core types and traits for the Voucher unique-code generator.
//!
//! This crate provides the shared vocabulary used by the generation
//! engine, the dedup store backends and the command-line front end.

pub mod alphabet;
pub mod code;
pub mod error;
pub mod store;

pub use alphabet::Alphabet;
pub use code::{Code, DedupKey};
pub use error::{CoreError, StoreError};
pub use store::{Admission, DedupStore};
