//! Combinatorial capacity of the code space.
//!
//! Capacity is modelled as permutations without repetition,
//! `P(n, k) = n! / (n - k)!`. That undercounts what the sampler can actually
//! produce (it draws with repetition), so the gate errs on the safe side.

use crate::error::{Error, Result};
use std::fmt::Display;

/// Number of distinct codes in a space, or a marker that it exceeds `u128`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capacity {
    Exact(u128),
    /// Larger than `u128::MAX`, and therefore larger than any request.
    Overflow,
}

impl Capacity {
    /// Returns `true` when the capacity is at most `limit`.
    pub fn at_most(self, limit: u128) -> bool {
        match self {
            Capacity::Exact(value) => value <= limit,
            Capacity::Overflow => false,
        }
    }
}

impl Display for Capacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capacity::Exact(value) => write!(f, "{}", value),
            Capacity::Overflow => write!(f, "more than {}", u128::MAX),
        }
    }
}

/// Computes `P(n, k) = n! / (n - k)!`.
///
/// `k > n` yields zero: there is no way to arrange more distinct items
/// than the alphabet holds.
pub fn permutations(n: usize, k: usize) -> Capacity {
    if k > n {
        return Capacity::Exact(0);
    }

    let mut product: u128 = 1;
    for factor in (n - k + 1)..=n {
        match product.checked_mul(factor as u128) {
            Some(next) => product = next,
            None => return Capacity::Overflow,
        }
    }
    Capacity::Exact(product)
}

/// Rejects requests that would consume more than half of the code space.
///
/// A request is infeasible when `P(n, k) <= quantity / 2` (integer
/// division). `size` is the full code length, prefix included. On success
/// the computed capacity is returned.
pub fn ensure_feasible(alphabet_len: usize, size: usize, quantity: u64) -> Result<Capacity> {
    let capacity = permutations(alphabet_len, size);
    if capacity.at_most(u128::from(quantity / 2)) {
        return Err(Error::InfeasibleRequest {
            quantity,
            size,
            capacity,
        });
    }
    Ok(capacity)
}
