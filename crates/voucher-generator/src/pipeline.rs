//! Concurrent generate / deduplicate / retry loop.
//!
//! Each round spawns one task per chunk. Workers generate candidates, resolve
//! them through [`DedupStore::check_and_insert`] and report every outcome on
//! a bounded channel. The coordinator is the only writer of the round
//! counters and of the accepted set, so the counts it uses to end a round
//! are never stale.
//!
//! A round produces exactly its shortfall in candidates, so every key the
//! store accepts ends up in the returned codes.

use crate::error::{Error, Result};
use crate::round::{RoundState, Transition};
use crate::Generator;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, trace, warn};
use voucher_core::{Admission, Code, DedupStore};

/// Default capacity of the worker-to-coordinator channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// What a worker reports for each candidate it produced.
#[derive(Debug)]
enum Outcome {
    Accepted(Code),
    Duplicate(Code),
    Failed(Error),
}

/// Drives rounds of concurrent workers until `quantity` unique codes exist.
pub struct Pipeline<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
    namespace: Arc<str>,
    channel_capacity: usize,
    stall_retries: u32,
}

impl<S: DedupStore, G: Generator> Pipeline<S, G> {
    pub fn new(store: Arc<S>, generator: G, namespace: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            generator: Arc::new(generator),
            namespace: namespace.into(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            stall_retries: 0,
        }
    }

    /// Overrides the bound of the outcome channel (minimum 1).
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    /// Allows up to `retries` consecutive rounds without acceptances before
    /// the run fails with [`Error::NoProgress`]. The default of zero fails
    /// on the first such round.
    pub fn with_stall_retries(mut self, retries: u32) -> Self {
        self.stall_retries = retries;
        self
    }

    /// Runs rounds until exactly `quantity` unique codes have been accepted.
    ///
    /// Codes are returned in acceptance order, which is not deterministic
    /// across workers.
    pub async fn run(&self, quantity: u64) -> Result<Vec<Code>> {
        let mut accepted = Vec::new();
        if quantity == 0 {
            return Ok(accepted);
        }

        let mut round = RoundState::plan(1, quantity);
        let mut stalled = 0;
        loop {
            self.run_round(&mut round, &mut accepted).await?;

            match round.conclude(accepted.len() as u64, quantity) {
                Transition::Terminal => break,
                Transition::Shrink(next) => {
                    stalled = 0;
                    debug!(
                        round = next.index,
                        shortfall = next.shortfall,
                        "shrinking to cover remaining shortfall"
                    );
                    round = next;
                }
                Transition::Stalled {
                    round: index,
                    shortfall,
                } => {
                    if stalled >= self.stall_retries {
                        warn!(round = index, shortfall, "round accepted no codes");
                        return Err(Error::NoProgress {
                            round: index,
                            shortfall,
                        });
                    }
                    stalled += 1;
                    debug!(round = index, shortfall, stalled, "round accepted no codes, retrying");
                    round = RoundState::plan(index + 1, shortfall);
                }
            }
        }

        info!(
            quantity,
            rounds = round.index,
            "generated all requested codes"
        );
        Ok(accepted)
    }

    async fn run_round(&self, round: &mut RoundState, accepted: &mut Vec<Code>) -> Result<()> {
        debug!(
            round = round.index,
            shortfall = round.shortfall,
            workers = round.workers,
            chunk_size = round.chunk_size,
            "spawning round"
        );

        let capacity = usize::try_from(round.shortfall)
            .unwrap_or(usize::MAX)
            .clamp(1, self.channel_capacity);
        let (tx, mut rx) = mpsc::channel(capacity);

        let mut workers = JoinSet::new();
        for worker in 0..round.workers {
            workers.spawn(produce_chunk(
                Arc::clone(&self.store),
                Arc::clone(&self.generator),
                Arc::clone(&self.namespace),
                round.chunk_for(worker),
                tx.clone(),
            ));
        }
        // Once every worker has dropped its sender the channel closes.
        drop(tx);

        while let Some(outcome) = rx.recv().await {
            match outcome {
                Outcome::Accepted(code) => {
                    round.record(Admission::Accepted);
                    accepted.push(code);
                    if round.is_drained() {
                        break;
                    }
                }
                Outcome::Duplicate(code) => {
                    trace!(round = round.index, code = %code, "duplicate candidate");
                    round.record(Admission::Duplicate);
                }
                Outcome::Failed(err) => {
                    workers.abort_all();
                    return Err(err);
                }
            }
        }

        drop(rx);
        while let Some(joined) = workers.join_next().await {
            if let Err(err) = joined {
                if err.is_panic() {
                    return Err(Error::WorkerFailed(err.to_string()));
                }
            }
        }

        debug!(
            round = round.index,
            accepted = round.accepted,
            duplicates = round.duplicates,
            "round drained"
        );
        Ok(())
    }
}

/// Produces `chunk_size` candidates and reports each resolution in order.
async fn produce_chunk<S: DedupStore, G: Generator>(
    store: Arc<S>,
    generator: Arc<G>,
    namespace: Arc<str>,
    chunk_size: u64,
    tx: mpsc::Sender<Outcome>,
) {
    for _ in 0..chunk_size {
        let outcome = match resolve(store.as_ref(), generator.as_ref(), &namespace).await {
            Ok(outcome) => outcome,
            Err(err) => Outcome::Failed(err),
        };
        let failed = matches!(outcome, Outcome::Failed(_));

        // A closed channel means the coordinator has stopped reading.
        if tx.send(outcome).await.is_err() || failed {
            return;
        }
    }
}

async fn resolve<S: DedupStore, G: Generator>(
    store: &S,
    generator: &G,
    namespace: &str,
) -> Result<Outcome> {
    let code = generator.generate()?;
    let admission = store.check_and_insert(&code.key(namespace)).await?;
    Ok(match admission {
        Admission::Accepted => Outcome::Accepted(code),
        Admission::Duplicate => Outcome::Duplicate(code),
    })
}
