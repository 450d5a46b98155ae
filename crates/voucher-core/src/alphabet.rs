use crate::error::{CoreError, Result};
use std::collections::HashSet;
use std::fmt::Display;

/// The symbol set codes are drawn from when no alphabet is configured.
pub const DEFAULT_SYMBOLS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

/// Upper bound on the alphabet size: a sampled index must fit in one byte.
pub const MAX_ALPHABET_LEN: usize = 256;

/// An ordered, fixed set of distinct characters used for sampling.
///
/// An alphabet always holds between 1 and [`MAX_ALPHABET_LEN`] symbols.
/// Repeated symbols are rejected since they would weight the sampled
/// distribution towards the repeated character.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    /// Creates a new `Alphabet` after validating the symbols.
    pub fn new(symbols: impl AsRef<str>) -> Result<Self> {
        let symbols: Vec<char> = symbols.as_ref().chars().collect();

        if symbols.is_empty() {
            return Err(CoreError::InvalidAlphabet(
                "alphabet must contain at least one symbol".to_string(),
            ));
        }

        if symbols.len() > MAX_ALPHABET_LEN {
            return Err(CoreError::InvalidAlphabet(format!(
                "alphabet must contain at most {} symbols, got {}",
                MAX_ALPHABET_LEN,
                symbols.len()
            )));
        }

        let mut seen = HashSet::with_capacity(symbols.len());
        if let Some(repeated) = symbols.iter().find(|symbol| !seen.insert(**symbol)) {
            return Err(CoreError::InvalidAlphabet(format!(
                "symbol '{}' appears more than once",
                repeated
            )));
        }

        Ok(Self { symbols })
    }

    /// Number of symbols in the alphabet.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if the alphabet has no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the symbol at `index`, or `None` when the index is out of range.
    pub fn get(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.symbols.contains(&symbol)
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.chars().collect(),
        }
    }
}

impl Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.symbols.iter().try_for_each(|symbol| write!(f, "{}", symbol))
    }
}
