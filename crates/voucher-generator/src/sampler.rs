//! Unbiased sampling of alphabet symbols from a secure byte source.
//!
//! Each random byte is masked down to the smallest bit width that can index
//! the alphabet. Masked values that land past the end of the alphabet are
//! discarded and the next byte is tried (rejection sampling). With 36
//! symbols a 6-bit mask yields indices up to 63; folding those back with a
//! modulo would favour the first 28 symbols.

use crate::error::{Error, Result};
use rand::rngs::OsRng;
use rand::TryRngCore;
use voucher_core::alphabet::MAX_ALPHABET_LEN;
use voucher_core::Alphabet;

/// A source of cryptographically secure random bytes.
///
/// This abstraction allows plugging in the OS generator or a scripted
/// source in tests.
pub trait EntropySource: Send + Sync + 'static {
    /// Fills `buf` entirely with random bytes.
    fn fill_bytes(&self, buf: &mut [u8]) -> Result<()>;
}

/// An `EntropySource` backed by the operating system's secure generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill_bytes(&self, buf: &mut [u8]) -> Result<()> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| Error::RandomSourceExhausted(e.to_string()))
    }
}

/// Returns the mask `2^b - 1` for the smallest `b` with `2^b >= alphabet_len`.
pub fn bit_mask(alphabet_len: usize) -> Result<u8> {
    if alphabet_len == 0 || alphabet_len > MAX_ALPHABET_LEN {
        return Err(Error::InvalidAlphabet(format!(
            "alphabet length must be in 1..={}, got {}",
            MAX_ALPHABET_LEN, alphabet_len
        )));
    }

    let bits = usize::BITS - (alphabet_len - 1).leading_zeros();
    Ok(((1u16 << bits) - 1) as u8)
}

/// Number of random bytes fetched per refill for a string of `length` symbols.
///
/// A third more than the requested length absorbs most rejections without
/// a second fetch.
pub fn batch_size(length: usize) -> usize {
    (length + length / 3).max(1)
}

/// Draws uniformly distributed strings over an [`Alphabet`].
#[derive(Debug, Clone)]
pub struct Sampler<E> {
    alphabet: Alphabet,
    mask: u8,
    entropy: E,
}

impl<E: EntropySource> Sampler<E> {
    pub fn new(alphabet: Alphabet, entropy: E) -> Result<Self> {
        let mask = bit_mask(alphabet.len())?;
        Ok(Self {
            alphabet,
            mask,
            entropy,
        })
    }

    /// Samples `length` symbols, each independently and uniformly.
    pub fn sample(&self, length: usize) -> Result<String> {
        let mut result = String::with_capacity(length);
        if length == 0 {
            return Ok(result);
        }

        let alphabet_len = self.alphabet.len();
        let mut batch = vec![0u8; batch_size(length)];
        let mut accepted = 0;

        while accepted < length {
            self.entropy.fill_bytes(&mut batch)?;

            for byte in &batch {
                let index = usize::from(byte & self.mask);
                if index >= alphabet_len {
                    continue;
                }
                result.push(self.alphabet.symbols()[index]);
                accepted += 1;
                if accepted == length {
                    break;
                }
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
pub(crate) mod test_entropy {
    use super::EntropySource;
    use crate::error::{Error, Result};
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// Replays a fixed byte script, then reports exhaustion.
    #[derive(Clone, Default)]
    pub(crate) struct ScriptedEntropy {
        bytes: Arc<Mutex<VecDeque<u8>>>,
        fetches: Arc<Mutex<usize>>,
    }

    impl ScriptedEntropy {
        pub(crate) fn new(bytes: impl IntoIterator<Item = u8>) -> Self {
            Self {
                bytes: Arc::new(Mutex::new(bytes.into_iter().collect())),
                fetches: Arc::new(Mutex::new(0)),
            }
        }

        pub(crate) fn fetches(&self) -> usize {
            *self.fetches.lock()
        }
    }

    impl EntropySource for ScriptedEntropy {
        fn fill_bytes(&self, buf: &mut [u8]) -> Result<()> {
            let mut bytes = self.bytes.lock();
            if bytes.len() < buf.len() {
                return Err(Error::RandomSourceExhausted(
                    "script ran out of bytes".to_string(),
                ));
            }
            for slot in buf.iter_mut() {
                *slot = bytes.pop_front().unwrap_or_default();
            }
            *self.fetches.lock() += 1;
            Ok(())
        }
    }
}
