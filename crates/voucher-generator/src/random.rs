use crate::error::{Error, Result};
use crate::sampler::{EntropySource, Sampler};
use crate::Generator;
use voucher_core::Code;

/// Generates candidates as `prefix` followed by uniformly sampled symbols.
///
/// Every candidate is exactly `size` characters long, prefix included.
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator<E> {
    sampler: Sampler<E>,
    prefix: String,
    sampled_len: usize,
}

impl<E: EntropySource> RandomCodeGenerator<E> {
    /// Creates a generator for codes of `size` characters.
    ///
    /// The prefix must be strictly shorter than `size` so that at least one
    /// symbol is sampled.
    pub fn new(sampler: Sampler<E>, prefix: impl Into<String>, size: usize) -> Result<Self> {
        let prefix = prefix.into();
        let prefix_len = prefix.chars().count();
        if prefix_len >= size {
            return Err(Error::InvalidRequest(format!(
                "prefix '{}' ({} chars) must be shorter than the code size {}",
                prefix, prefix_len, size
            )));
        }

        Ok(Self {
            sampler,
            prefix,
            sampled_len: size - prefix_len,
        })
    }
}

impl<E: EntropySource> Generator for RandomCodeGenerator<E> {
    fn generate(&self) -> Result<Code> {
        let sampled = self.sampler.sample(self.sampled_len)?;
        let mut code = String::with_capacity(self.prefix.len() + sampled.len());
        code.push_str(&self.prefix);
        code.push_str(&sampled);
        Ok(Code::new_unchecked(code))
    }
}
