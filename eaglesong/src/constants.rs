//! Injection constants for the Eaglesong permutation.
//!
//! The table is not hard-coded: it is expanded from a seed message through an
//! extendable-output function, one little-endian `u32` per 4 output bytes,
//! 16 constants per round.

use std::sync::OnceLock;

use zerocopy::byteorder::{LittleEndian, U32};
use zerocopy::FromBytes;

use crate::error::ParameterError;
use crate::params::{EaglesongParams, CONSTANTS_PER_ROUND, NUM_ROUNDS, REFERENCE_SEED};
use crate::xof::{Shake256Xof, Xof};

const ROUND_BYTES: usize = CONSTANTS_PER_ROUND * 4;
const TABLE_COLUMNS: usize = 8;

/// Immutable table of injection constants, grouped per round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundConstants {
    rounds: Box<[[u32; CONSTANTS_PER_ROUND]]>,
}

impl RoundConstants {
    /// Builds a table from a flat list of constants.
    pub fn new(constants: &[u32], num_rounds: usize) -> Result<Self, ParameterError> {
        if num_rounds == 0 {
            return Err(ParameterError::ZeroRounds);
        }
        let expected = num_rounds
            .checked_mul(CONSTANTS_PER_ROUND)
            .ok_or(ParameterError::TooManyRounds(num_rounds))?;
        if constants.len() != expected {
            return Err(ParameterError::ConstantCount {
                expected,
                actual: constants.len(),
            });
        }

        let rounds = constants
            .chunks_exact(CONSTANTS_PER_ROUND)
            .map(|chunk| {
                let mut round = [0u32; CONSTANTS_PER_ROUND];
                round.copy_from_slice(chunk);
                round
            })
            .collect();
        Ok(Self { rounds })
    }

    /// Packs XOF output into constants. Only whole rounds are kept.
    fn from_le_bytes(bytes: &[u8]) -> Self {
        let rounds = bytes
            .chunks_exact(ROUND_BYTES)
            .filter_map(|chunk| {
                <[U32<LittleEndian>; CONSTANTS_PER_ROUND]>::read_from_bytes(chunk).ok()
            })
            .map(|words| words.map(|word| word.get()))
            .collect();
        Self { rounds }
    }

    pub fn num_rounds(&self) -> usize {
        self.rounds.len()
    }

    pub fn len(&self) -> usize {
        self.rounds.len() * CONSTANTS_PER_ROUND
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// All constants in injection order.
    pub fn as_slice(&self) -> &[u32] {
        self.rounds.as_flattened()
    }

    /// The 16 constants injected in round `round`.
    ///
    /// # Panics
    ///
    /// If `round` is not below [`Self::num_rounds`].
    pub fn round(&self, round: usize) -> &[u32; CONSTANTS_PER_ROUND] {
        assert!(
            round < self.rounds.len(),
            "round index {round} out of range for {} rounds",
            self.rounds.len()
        );
        &self.rounds[round]
    }

    /// Renders the table as a source-code array literal, eight constants per
    /// line.
    pub fn to_source_table(&self) -> String {
        let constants = self.as_slice();
        let mut table = String::from("injection_constants = [\n");
        for (line_index, line) in constants.chunks(TABLE_COLUMNS).enumerate() {
            let is_last_line = (line_index + 1) * TABLE_COLUMNS >= constants.len();
            let literals: Vec<String> = line.iter().map(|c| format!("0x{c:08x}")).collect();
            table.push_str("    ");
            table.push_str(&literals.join(", "));
            table.push_str(if is_last_line { "\n" } else { ",\n" });
        }
        table.push(']');
        table
    }
}

/// Expands `seed` into `16 * num_rounds` injection constants.
#[tracing::instrument(level = "debug", skip_all, fields(num_rounds = num_rounds))]
pub fn generate_constants<X: Xof + ?Sized>(
    xof: &X,
    seed: &[u8],
    num_rounds: usize,
) -> Result<RoundConstants, ParameterError> {
    let params = EaglesongParams::new(seed, num_rounds)?;
    let randomness = xof.xof(&params.seed, params.num_bytes()?);

    let constants = RoundConstants::from_le_bytes(&randomness);
    if constants.num_rounds() != num_rounds {
        return Err(ParameterError::ConstantCount {
            expected: params.num_constants()?,
            actual: constants.len(),
        });
    }
    tracing::debug!(count = constants.len(), "generated injection constants");
    Ok(constants)
}

/// Reference table: SHAKE256 over [`REFERENCE_SEED`], 43 rounds.
///
/// Computed on first call and shared read-only for the rest of the process.
pub fn injection_constants() -> &'static RoundConstants {
    static CONSTANTS: OnceLock<RoundConstants> = OnceLock::new();
    CONSTANTS.get_or_init(|| {
        match generate_constants(&Shake256Xof, REFERENCE_SEED, NUM_ROUNDS) {
            Ok(constants) => {
                tracing::debug!(
                    rounds = constants.num_rounds(),
                    "initialized reference injection constants"
                );
                constants
            }
            Err(err) => {
                tracing::error!(%err, "reference parameters rejected");
                unreachable!("reference parameters are valid: {err}")
            }
        }
    })
}
