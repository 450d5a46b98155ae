use crate::error::{Error, Result};
use crate::feasibility;
use crate::pipeline::{Pipeline, DEFAULT_CHANNEL_CAPACITY};
use crate::random::RandomCodeGenerator;
use crate::sampler::{EntropySource, OsEntropy, Sampler};
use std::sync::Arc;
use tracing::info;
use typed_builder::TypedBuilder;
use voucher_core::{Alphabet, Code, DedupStore};

/// Namespace used for dedup keys when none is given.
pub const DEFAULT_NAMESPACE: &str = "prefix";

/// Parameters of one generation run.
#[derive(Debug, Clone, TypedBuilder)]
pub struct GenerationRequest {
    /// Length of every code in characters, prefix included.
    pub size: usize,
    /// Number of unique codes to produce.
    pub quantity: u64,
    /// Literal prefix; must be shorter than `size`.
    #[builder(default, setter(into))]
    pub prefix: String,
    /// Namespace of the dedup keys (`<namespace>:<code>`).
    #[builder(default = DEFAULT_NAMESPACE.to_string(), setter(into))]
    pub namespace: String,
}

impl GenerationRequest {
    fn validate(&self) -> Result<()> {
        let prefix_len = self.prefix.chars().count();
        if prefix_len >= self.size {
            return Err(Error::InvalidRequest(format!(
                "prefix length {} must be smaller than size {}",
                prefix_len, self.size
            )));
        }
        Ok(())
    }
}

/// Entry point of the engine: validates a request, checks it against the
/// capacity of the code space, then runs the generation pipeline.
///
/// Nothing is returned unless the whole run succeeds, so callers never see
/// a partial result.
#[derive(Debug, Clone)]
pub struct UniqueCodeService<S, E = OsEntropy> {
    alphabet: Alphabet,
    store: Arc<S>,
    entropy: E,
    channel_capacity: usize,
    stall_retries: u32,
}

impl<S: DedupStore> UniqueCodeService<S, OsEntropy> {
    /// Creates a service drawing entropy from the operating system.
    pub fn new(alphabet: Alphabet, store: Arc<S>) -> Self {
        Self::with_entropy(alphabet, store, OsEntropy)
    }
}

impl<S: DedupStore, E: EntropySource + Clone> UniqueCodeService<S, E> {
    pub fn with_entropy(alphabet: Alphabet, store: Arc<S>, entropy: E) -> Self {
        Self {
            alphabet,
            store,
            entropy,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            stall_retries: 0,
        }
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// See [`Pipeline::with_stall_retries`].
    pub fn with_stall_retries(mut self, retries: u32) -> Self {
        self.stall_retries = retries;
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Generates `request.quantity` unique codes.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<Vec<Code>> {
        request.validate()?;

        let capacity = feasibility::ensure_feasible(
            self.alphabet.len(),
            request.size,
            request.quantity,
        )?;

        info!(
            size = request.size,
            quantity = request.quantity,
            prefix = %request.prefix,
            namespace = %request.namespace,
            %capacity,
            "starting generation"
        );

        let sampler = Sampler::new(self.alphabet.clone(), self.entropy.clone())?;
        let generator = RandomCodeGenerator::new(sampler, request.prefix.clone(), request.size)?;

        Pipeline::new(
            Arc::clone(&self.store),
            generator,
            request.namespace.as_str(),
        )
        .with_channel_capacity(self.channel_capacity)
        .with_stall_retries(self.stall_retries)
        .run(request.quantity)
        .await
    }
}
