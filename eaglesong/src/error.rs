use thiserror::Error;

use crate::sponge::SpongeState;

/// Rejected generator parameters or constant tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("round count must be positive")]
    ZeroRounds,
    #[error("constant generation seed must not be empty")]
    EmptySeed,
    #[error("round count {0} exceeds the supported maximum")]
    TooManyRounds(usize),
    #[error("expected {expected} round constants, got {actual}")]
    ConstantCount { expected: usize, actual: usize },
}

/// Sponge methods called out of the init -> absorb -> squeeze order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpongeError {
    #[error("cannot {operation} a sponge in state {state:?}")]
    InvalidState {
        operation: &'static str,
        state: SpongeState,
    },
}

/// Either error class; the wrapped error is exposed as the source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EaglesongError {
    #[error("invalid configuration")]
    InvalidConfiguration(#[from] ParameterError),
    #[error("invalid state")]
    InvalidState(#[from] SpongeError),
}
