use keel_types::KeelError;
use thiserror::Error;

/// Errors from the engine host.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Keel(#[from] KeelError),

    #[error("detection worker stopped unexpectedly")]
    WorkerStopped,

    #[error("lock acquisition failed")]
    LockPoisoned,
}

impl EngineError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            EngineError::Keel(e) => e.is_recoverable(),
            EngineError::WorkerStopped | EngineError::LockPoisoned => false,
        }
    }
}

/// Convenience type alias for engine results.
pub type EngineResult<T> = Result<T, EngineError>;
