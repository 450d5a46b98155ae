//! Unique-code generation engine.
//!
//! The engine gates each request on the capacity of the code space, samples
//! candidates without modulo bias, and resolves them concurrently against a
//! [`DedupStore`](voucher_core::DedupStore) in shrinking rounds until the
//! requested number of unique codes has been accepted.

pub mod error;
pub mod feasibility;
pub mod pipeline;
pub mod random;
pub mod round;
pub mod sampler;
pub mod service;

pub use error::{Error, Result};
pub use feasibility::Capacity;
pub use pipeline::Pipeline;
pub use random::RandomCodeGenerator;
pub use round::{RoundState, Transition};
pub use sampler::{EntropySource, OsEntropy, Sampler};
pub use service::{GenerationRequest, UniqueCodeService, DEFAULT_NAMESPACE};

use voucher_core::Code;

/// Trait for producing candidate codes.
///
/// Implementations are pure generators that don't interact with storage;
/// uniqueness is resolved afterwards by the pipeline.
pub trait Generator: Send + Sync + 'static {
    /// Produces the next candidate code.
    fn generate(&self) -> Result<Code>;
}
