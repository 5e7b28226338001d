//! Bounded ingestion queue in front of the detection loop.
//!
//! Producers on any thread push without blocking. When full, the oldest
//! sample is dropped and counted. A poisoned lock surfaces as
//! [`EngineError::LockPoisoned`] from every accessor that reads shared state.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use keel_types::{KeelError, Sample};
use tracing::warn;

use crate::error::{EngineError, EngineResult};

#[derive(Debug)]
struct QueueState {
    samples: VecDeque<Sample>,
    dropped: u64,
}

/// Cloneable producer/consumer handle over one shared bounded queue.
#[derive(Debug, Clone)]
pub struct SampleQueue {
    inner: Arc<Mutex<QueueState>>,
    capacity: usize,
}

impl SampleQueue {
    pub fn new(capacity: usize) -> EngineResult<Self> {
        if capacity == 0 {
            return Err(KeelError::InvalidConfiguration(
                "queue_capacity must be at least 1".into(),
            )
            .into());
        }
        Ok(Self {
            inner: Arc::new(Mutex::new(QueueState {
                samples: VecDeque::with_capacity(capacity),
                dropped: 0,
            })),
            capacity,
        })
    }

    /// Enqueue a sample. Returns `true` if the oldest sample was dropped.
    pub fn push(&self, sample: Sample) -> EngineResult<bool> {
        let mut state = self.lock()?;
        let overflow = state.samples.len() >= self.capacity;
        if overflow {
            state.samples.pop_front();
            state.dropped += 1;
            warn!(
                capacity = self.capacity,
                dropped = state.dropped,
                "Sample queue full, dropped oldest sample"
            );
        }
        state.samples.push_back(sample);
        Ok(overflow)
    }

    /// Take every queued sample in FIFO order.
    pub fn drain(&self) -> EngineResult<Vec<Sample>> {
        let mut state = self.lock()?;
        Ok(state.samples.drain(..).collect())
    }

    pub fn len(&self) -> EngineResult<usize> {
        Ok(self.lock()?.samples.len())
    }

    pub fn is_empty(&self) -> EngineResult<bool> {
        Ok(self.lock()?.samples.is_empty())
    }

    /// Samples dropped on overflow since creation.
    pub fn dropped(&self) -> EngineResult<u64> {
        Ok(self.lock()?.dropped)
    }

    /// Fixed at construction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> EngineResult<MutexGuard<'_, QueueState>> {
        self.inner.lock().map_err(|_| EngineError::LockPoisoned)
    }
}
