use crate::constants::RoundConstants;
use crate::params::STATE_WORDS;

/// Rows of the 16x16 binary diffusion matrix. Bit `k` of row `j` selects
/// input word `k` for output word `j`.
const BIT_MATRIX: [u16; STATE_WORDS] = [
    0b1001000011110001,
    0b1011000100010011,
    0b1111001011010111,
    0b0111010101011111,
    0b1110101010111110,
    0b0100010110001101,
    0b1000101100011010,
    0b1000011011000101,
    0b1001110101111011,
    0b1010101000000111,
    0b1100010011111111,
    0b0001100100001111,
    0b0011001000011110,
    0b0110010000111100,
    0b1100100001111000,
    0b1000111110101111,
];

/// Rotation amounts of the circulant step: `x ^ rotl(x, a) ^ rotl(x, b)`.
const CIRCULANT_ROTATIONS: [[u32; 2]; STATE_WORDS] = [
    [2, 4],
    [13, 22],
    [4, 19],
    [3, 14],
    [27, 31],
    [3, 8],
    [17, 26],
    [3, 12],
    [18, 22],
    [12, 18],
    [4, 7],
    [4, 31],
    [12, 27],
    [7, 17],
    [7, 8],
    [1, 13],
];

/// The Eaglesong permutation over a 16-word state.
#[derive(Clone, Debug)]
pub struct EaglesongPermutation<'c> {
    pub state: [u32; STATE_WORDS],
    constants: &'c RoundConstants,
}

impl<'c> EaglesongPermutation<'c> {
    pub fn new(constants: &'c RoundConstants) -> Self {
        Self {
            state: [0; STATE_WORDS],
            constants,
        }
    }

    pub fn num_rounds(&self) -> usize {
        self.constants.num_rounds()
    }

    pub fn apply_bit_matrix(&mut self) {
        let mut new_state = [0u32; STATE_WORDS];
        for (new_word, row) in new_state.iter_mut().zip(BIT_MATRIX) {
            for (k, word) in self.state.iter().enumerate() {
                // all-ones when bit k of the row is set
                let mask = u32::from((row >> k) & 1).wrapping_neg();
                *new_word ^= word & mask;
            }
        }
        self.state = new_state;
    }

    pub fn apply_circulant(&mut self) {
        for (word, [a, b]) in self.state.iter_mut().zip(CIRCULANT_ROTATIONS) {
            *word ^= word.rotate_left(a) ^ word.rotate_left(b);
        }
    }

    /// # Panics
    ///
    /// If `round_num` is not below [`Self::num_rounds`].
    pub fn apply_round_constants(&mut self, round_num: usize) {
        for (word, constant) in self.state.iter_mut().zip(self.constants.round(round_num)) {
            *word ^= constant;
        }
    }

    /// Add, rotate, add on each pair of neighbouring words.
    pub fn apply_addition_rotation(&mut self) {
        for pair in self.state.chunks_exact_mut(2) {
            pair[0] = pair[0].wrapping_add(pair[1]).rotate_left(8);
            pair[1] = pair[1].rotate_left(24);
            pair[1] = pair[0].wrapping_add(pair[1]);
        }
    }

    /// One full round.
    ///
    /// # Panics
    ///
    /// If `round_num` is not below [`Self::num_rounds`].
    pub fn apply_round(&mut self, round_num: usize) {
        self.apply_bit_matrix();
        self.apply_circulant();
        self.apply_round_constants(round_num);
        self.apply_addition_rotation();
    }

    pub fn permute(&mut self) {
        for round_num in 0..self.num_rounds() {
            self.apply_round(round_num);
        }
    }

    /// Runs the permutation and returns the state after every round.
    pub fn permute_with_trace(&mut self) -> Vec<[u32; STATE_WORDS]> {
        let mut traces = Vec::with_capacity(self.num_rounds());
        for round_num in 0..self.num_rounds() {
            self.apply_round(round_num);
            traces.push(self.state);
        }
        traces
    }
}
