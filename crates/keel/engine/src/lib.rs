#![deny(unsafe_code)]
//! # keel-engine
//!
//! The detection facade composes stability tracking, correlation, prediction,
//! cascade control and pattern matching into one per-sample cycle. The
//! worker hosts a facade on a tokio task behind a bounded, drop-oldest
//! sample queue.
//!
//! ```rust,no_run
//! use keel_engine::{DetectionFacade, DetectionWorker, SampleQueue};
//! use keel_types::{EngineConfig, Sample};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = EngineConfig::with_dimensions(3);
//! let queue = SampleQueue::new(config.queue_capacity)?;
//! let worker = DetectionWorker::spawn(DetectionFacade::new(config)?, queue.clone());
//!
//! queue.push(Sample::new(vec![0.9, 0.8, 0.95]))?;
//! let facade = worker.stop().await?;
//! println!("{:?}", facade.snapshot());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod facade;
pub mod queue;
pub mod worker;

pub use error::{EngineError, EngineResult};
pub use facade::{DetectionFacade, EngineSnapshot};
pub use queue::SampleQueue;
pub use worker::{CycleOutcome, DetectionWorker, WorkerHandle};
