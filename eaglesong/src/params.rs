use crate::error::ParameterError;

/// Number of 32-bit words in the permutation state.
pub const STATE_WORDS: usize = 16;
/// Words of the state exposed to input and output.
pub const RATE_WORDS: usize = 8;
pub const RATE_BYTES: usize = RATE_WORDS * 4;
pub const CAPACITY_WORDS: usize = STATE_WORDS - RATE_WORDS;

pub const NUM_ROUNDS: usize = 43;
/// Largest round count the constant generator accepts.
pub const MAX_ROUNDS: usize = 1 << 16;
/// One injection constant per state word, per round.
pub const CONSTANTS_PER_ROUND: usize = STATE_WORDS;

pub const DIGEST_LENGTH: usize = 32;
/// End-of-message marker written right after the last message byte.
pub const DELIMITER: u8 = 0x06;

/// Seed fed through SHAKE256 to derive the reference injection constants.
pub const REFERENCE_SEED: &[u8] = b"The various ways in which the knowledge on which people base their plan is communicated to them is the crucial problem for any theory explaining the economic process, and the problem of what is the best way to utilizing knowledge initially dispersed among all the people is at least one of the main problems of economic policy - or of designing an efficient economic system.";

/// Inputs of the constant generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EaglesongParams {
    pub seed: Vec<u8>,
    pub num_rounds: usize,
}

impl EaglesongParams {
    pub fn new(seed: impl Into<Vec<u8>>, num_rounds: usize) -> Result<Self, ParameterError> {
        let params = Self {
            seed: seed.into(),
            num_rounds,
        };
        params.validate()?;
        Ok(params)
    }

    /// Number of `u32` constants the generator must produce.
    pub fn num_constants(&self) -> Result<usize, ParameterError> {
        self.num_rounds
            .checked_mul(CONSTANTS_PER_ROUND)
            .ok_or(ParameterError::TooManyRounds(self.num_rounds))
    }

    /// Number of XOF bytes behind [`Self::num_constants`].
    pub fn num_bytes(&self) -> Result<usize, ParameterError> {
        self.num_constants()?
            .checked_mul(4)
            .ok_or(ParameterError::TooManyRounds(self.num_rounds))
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.num_rounds == 0 {
            return Err(ParameterError::ZeroRounds);
        }
        if self.seed.is_empty() {
            return Err(ParameterError::EmptySeed);
        }
        if self.num_rounds > MAX_ROUNDS {
            return Err(ParameterError::TooManyRounds(self.num_rounds));
        }
        self.num_bytes().map(|_| ())
    }
}

impl Default for EaglesongParams {
    fn default() -> Self {
        Self {
            seed: REFERENCE_SEED.to_vec(),
            num_rounds: NUM_ROUNDS,
        }
    }
}
