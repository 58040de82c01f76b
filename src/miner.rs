//! Proof-of-work search with optional parallelism and background jobs.
//!
//! [`Miner`] always finds the same nonce as [`Block::mine`]: the smallest one whose
//! digest is valid. Nonces are scanned in fixed-size batches; with more than one
//! thread each batch is split across a rayon pool and the lowest hit wins.

use crate::blockchain::{Block, Blockchain};
use crate::config::MinerConfig;
use crate::crypto::Digest;
use crate::error::ChainError;
use crossbeam_channel::{bounded, Receiver};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct Miner {
    threads: usize,
    batch_size: u64,
    pool: Option<Arc<ThreadPool>>,
}

impl Miner {
    pub fn new(config: &MinerConfig) -> Result<Self, ChainError> {
        if config.threads == 0 || config.batch_size == 0 {
            return Err(ChainError::Miner(
                "threads and batch_size must be at least 1".to_string(),
            ));
        }
        let pool = if config.threads > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(config.threads)
                .thread_name(|i| format!("duochain-pow-{}", i))
                .build()
                .map_err(|e| ChainError::Miner(format!("Failed to build thread pool: {}", e)))?;
            Some(Arc::new(pool))
        } else {
            None
        };
        Ok(Miner {
            threads: config.threads,
            batch_size: config.batch_size,
            pool,
        })
    }

    /// Single-threaded miner with default batching.
    pub fn sequential() -> Self {
        Miner {
            threads: 1,
            batch_size: MinerConfig::default().batch_size,
            pool: None,
        }
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Blocks until a valid nonce is found.
    pub fn mine(&self, index: u32, amount: i32, previous_digest: Option<Digest>) -> Block {
        let started = Instant::now();
        let mut start: u64 = 0;
        loop {
            if let Some(nonce) = self.search_batch(start, index, amount, previous_digest.as_ref()) {
                debug!(
                    index,
                    amount,
                    nonce,
                    threads = self.threads,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "mined block"
                );
                return Block::reconstruct(index, amount, previous_digest, nonce);
            }
            start = start.wrapping_add(self.batch_size);
        }
    }

    /// Mines the next candidate for `chain` without appending it.
    pub fn mine_next(&self, chain: &Blockchain, amount: i32) -> Block {
        self.mine(chain.next_index(), amount, Some(chain.tail_digest().clone()))
    }

    /// Runs the search on a worker thread. Dropping the job cancels it.
    pub fn spawn(
        &self,
        index: u32,
        amount: i32,
        previous_digest: Option<Digest>,
    ) -> Result<MiningJob, ChainError> {
        let (sender, receiver) = bounded(1);
        let cancelled = Arc::new(AtomicBool::new(false));
        let miner = self.clone();
        let flag = Arc::clone(&cancelled);

        thread::Builder::new()
            .name("duochain-miner".to_string())
            .spawn(move || {
                let mut start: u64 = 0;
                while !flag.load(Ordering::Relaxed) {
                    if let Some(nonce) =
                        miner.search_batch(start, index, amount, previous_digest.as_ref())
                    {
                        let block = Block::reconstruct(index, amount, previous_digest, nonce);
                        // receiver may already be gone
                        let _ = sender.send(block);
                        return;
                    }
                    start = start.wrapping_add(miner.batch_size);
                }
                debug!(index, amount, searched_up_to = start, "mining job cancelled");
            })?;

        Ok(MiningJob {
            receiver,
            cancelled,
        })
    }

    pub fn spawn_next(&self, chain: &Blockchain, amount: i32) -> Result<MiningJob, ChainError> {
        self.spawn(chain.next_index(), amount, Some(chain.tail_digest().clone()))
    }

    fn search_batch(
        &self,
        start: u64,
        index: u32,
        amount: i32,
        previous_digest: Option<&Digest>,
    ) -> Option<u64> {
        let end = start.saturating_add(self.batch_size);
        trace!(start, end, "searching nonce batch");
        let hits = |nonce: &u64| {
            Block::compute_digest(index, amount, previous_digest, *nonce).is_valid()
        };
        match &self.pool {
            Some(pool) => pool.install(|| (start..end).into_par_iter().find_first(hits)),
            None => (start..end).find(hits),
        }
    }
}

impl Default for Miner {
    fn default() -> Self {
        Self::sequential()
    }
}

/// Handle to a mining search running on its own thread.
#[derive(Debug)]
pub struct MiningJob {
    receiver: Receiver<Block>,
    cancelled: Arc<AtomicBool>,
}

impl MiningJob {
    /// Asks the worker to stop after its current batch.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// The mined block if it is ready, without waiting.
    pub fn try_result(&self) -> Option<Block> {
        self.receiver.try_recv().ok()
    }

    pub fn wait_timeout(&self, timeout: Duration) -> Option<Block> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Waits for the worker. `None` means the job was cancelled first.
    pub fn wait(self) -> Option<Block> {
        self.receiver.recv().ok()
    }
}

impl Drop for MiningJob {
    fn drop(&mut self) {
        self.cancel();
    }
}
