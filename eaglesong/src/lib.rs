// Documentation

// Main Introduction
#![forbid(unsafe_code)]
#![deny(clippy::as_conversions)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![doc = include_str!("../doc/mainpage-doc.md")]

pub mod constants;

pub mod error;

pub mod params;

pub mod permutation;

pub mod sponge;

pub mod xof;

pub use constants::{generate_constants, injection_constants, RoundConstants};
pub use error::{EaglesongError, ParameterError, SpongeError};
pub use params::{EaglesongParams, DIGEST_LENGTH};
pub use sponge::{hash, hash_into, Sponge, SpongeState};
pub use xof::{Shake256Xof, Xof};
