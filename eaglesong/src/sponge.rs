//! Eaglesong sponge: 512-bit state, 256-bit rate, 256-bit capacity.
//!
//! Message bytes enter the rate as big-endian words. The message is closed by
//! the delimiter byte `0x06` and zero-filled to the next block boundary; in the
//! word that holds the delimiter the remaining message bytes and the delimiter
//! are right-aligned, so the zero fill occupies the high-order bytes. Output
//! leaves the rate as little-endian words.

use zerocopy::byteorder::{BigEndian, LittleEndian, U32};

use crate::constants::{injection_constants, RoundConstants};
use crate::error::SpongeError;
use crate::params::{DELIMITER, DIGEST_LENGTH, RATE_BYTES, RATE_WORDS};
use crate::permutation::EaglesongPermutation;

/// Position of a [`Sponge`] in its init -> absorb -> squeeze lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpongeState {
    /// Zeroed, nothing absorbed yet
    Fresh,
    /// Accepting message bytes
    Absorbing,
    /// Padded and fully absorbed
    ReadyToSqueeze,
    /// Output taken; terminal
    Squeezed,
}

/// A single hash computation. Not meant to be shared between threads or
/// reused across messages.
#[derive(Clone, Debug)]
pub struct Sponge<'c> {
    permutation: EaglesongPermutation<'c>,
    buffer: [u8; RATE_BYTES],
    buffered: usize,
    blocks_absorbed: usize,
    state: SpongeState,
}

impl<'c> Sponge<'c> {
    pub fn new(constants: &'c RoundConstants) -> Self {
        Self {
            permutation: EaglesongPermutation::new(constants),
            buffer: [0; RATE_BYTES],
            buffered: 0,
            blocks_absorbed: 0,
            state: SpongeState::Fresh,
        }
    }

    pub fn state(&self) -> SpongeState {
        self.state
    }

    /// Absorbs message bytes. May be called any number of times before
    /// [`Self::finish_absorbing`]; the split does not affect the digest.
    pub fn absorb(&mut self, input: &[u8]) -> Result<(), SpongeError> {
        self.expect_absorbing("absorb")?;
        self.absorb_bytes(input);
        self.state = SpongeState::Absorbing;
        Ok(())
    }

    /// Pads the message and absorbs the final block.
    pub fn finish_absorbing(&mut self) -> Result<(), SpongeError> {
        self.expect_absorbing("finish absorbing")?;
        self.pad_and_absorb();
        self.state = SpongeState::ReadyToSqueeze;
        tracing::trace!(blocks = self.blocks_absorbed, "absorbed padded message");
        Ok(())
    }

    /// Fills `output`, permuting between successive rate-sized blocks.
    pub fn squeeze(&mut self, output: &mut [u8]) -> Result<(), SpongeError> {
        if self.state != SpongeState::ReadyToSqueeze {
            return Err(SpongeError::InvalidState {
                operation: "squeeze",
                state: self.state,
            });
        }
        self.squeeze_blocks(output);
        self.state = SpongeState::Squeezed;
        Ok(())
    }

    /// Pads, absorbs and squeezes a 256-bit digest.
    pub fn finalize(mut self) -> Result<[u8; DIGEST_LENGTH], SpongeError> {
        self.finish_absorbing()?;
        let mut digest = [0u8; DIGEST_LENGTH];
        self.squeeze(&mut digest)?;
        Ok(digest)
    }

    fn expect_absorbing(&self, operation: &'static str) -> Result<(), SpongeError> {
        match self.state {
            SpongeState::Fresh | SpongeState::Absorbing => Ok(()),
            state => Err(SpongeError::InvalidState { operation, state }),
        }
    }

    fn absorb_bytes(&mut self, mut input: &[u8]) {
        if self.buffered > 0 {
            let take = input.len().min(RATE_BYTES - self.buffered);
            self.buffer[self.buffered..self.buffered + take].copy_from_slice(&input[..take]);
            self.buffered += take;
            input = &input[take..];
            if self.buffered < RATE_BYTES {
                return;
            }
            let block = self.buffer;
            self.absorb_block(&block);
            self.buffered = 0;
        }

        let mut blocks = input.chunks_exact(RATE_BYTES);
        for block in &mut blocks {
            let mut full = [0u8; RATE_BYTES];
            full.copy_from_slice(block);
            self.absorb_block(&full);
        }
        let tail = blocks.remainder();
        self.buffer[..tail.len()].copy_from_slice(tail);
        self.buffered = tail.len();
    }

    fn absorb_block(&mut self, block: &[u8; RATE_BYTES]) {
        let words: [U32<BigEndian>; RATE_WORDS] = zerocopy::transmute!(*block);
        for (state_word, word) in self.permutation.state.iter_mut().zip(words) {
            *state_word ^= word.get();
        }
        self.permutation.permute();
        self.blocks_absorbed += 1;
    }

    /// The buffered tail is always shorter than a block, so the padded tail
    /// is exactly one block.
    fn pad_and_absorb(&mut self) {
        let tail_len = self.buffered;
        let word_start = tail_len - tail_len % 4;
        let word_end = word_start + 4;
        let in_word = tail_len - word_start;

        let mut block = [0u8; RATE_BYTES];
        block[..word_start].copy_from_slice(&self.buffer[..word_start]);
        block[word_end - 1 - in_word..word_end - 1]
            .copy_from_slice(&self.buffer[word_start..tail_len]);
        block[word_end - 1] = DELIMITER;

        self.absorb_block(&block);
        self.buffer = [0; RATE_BYTES];
        self.buffered = 0;
    }

    fn squeeze_blocks(&mut self, output: &mut [u8]) {
        for (index, chunk) in output.chunks_mut(RATE_BYTES).enumerate() {
            if index > 0 {
                self.permutation.permute();
            }
            let words: [U32<LittleEndian>; RATE_WORDS] =
                std::array::from_fn(|i| U32::new(self.permutation.state[i]));
            let bytes: [u8; RATE_BYTES] = zerocopy::transmute!(words);
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

impl Default for Sponge<'static> {
    fn default() -> Self {
        Self::new(injection_constants())
    }
}

/// Eaglesong-256 of `input`.
pub fn hash(input: &[u8]) -> [u8; DIGEST_LENGTH] {
    let mut digest = [0u8; DIGEST_LENGTH];
    hash_into(input, &mut digest);
    digest
}

/// Eaglesong of `input` with output length `output.len()`.
pub fn hash_into(input: &[u8], output: &mut [u8]) {
    let mut sponge = Sponge::default();
    sponge.absorb_bytes(input);
    sponge.pad_and_absorb();
    sponge.squeeze_blocks(output);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn digest_hex(input: &[u8]) -> String {
        hex::encode(hash(input))
    }

    fn flipped_bits(a: &[u8], b: &[u8]) -> u32 {
        a.iter().zip(b).map(|(x, y)| (x ^ y).count_ones()).sum()
    }

    #[test]
    fn test_empty_message_vector() {
        assert_eq!(
            digest_hex(b""),
            "9e4452fc7aed93d7240b7b55263792befd1be09252b456401122ba71a56f62a0"
        );
    }

    #[test]
    fn test_abc_vector() {
        assert_eq!(
            digest_hex(b"abc"),
            "1e93baa3ff9f8afa381430b7811d428c5b4514f39f6a78d00511b20305067b68"
        );
    }

    #[test]
    fn test_two_block_vectors() {
        assert_eq!(
            digest_hex(b"1111111111111111111111111111111111\n"),
            "a50a3310f78cbaeadcffe2d46262119eeeda9d6568b4df1b636399742c867aca"
        );
        assert_eq!(
            digest_hex(b"1111111111111111111111111111111122\n"),
            "d7b68a8ba4cfc606e86ed7e2ca3244ff27b28bb24c28ee09af4b1f47af9b9236"
        );
    }

    #[test]
    fn test_delimiter_only_final_block_vector() {
        assert_eq!(
            digest_hex(&[b'a'; 32]),
            "0dba4265fe45fe6fe705e320cc1242d3907d4ff0188c039b6a6bf019e85d1aff"
        );
    }

    #[test]
    fn test_empty_message_padding_word() {
        // Arrange: the padded empty message is a single block with word 0 = 0x00000006
        let mut expected = EaglesongPermutation::new(injection_constants());
        expected.state[0] = 0x0000_0006;
        expected.permute();

        // Act
        let mut sponge = Sponge::default();
        sponge.finish_absorbing().unwrap();

        // Assert
        assert_eq!(sponge.permutation.state, expected.state);
        assert_eq!(sponge.blocks_absorbed, 1);
    }

    #[test]
    fn test_partial_word_is_right_aligned() {
        // "abcde": word 0 = "abcd", word 1 = 0x00 0x00 'e' 0x06
        let mut expected = EaglesongPermutation::new(injection_constants());
        expected.state[0] = u32::from_be_bytes(*b"abcd");
        expected.state[1] = u32::from_be_bytes([0, 0, b'e', DELIMITER]);
        expected.permute();

        let mut sponge = Sponge::default();
        sponge.absorb(b"abcde").unwrap();
        sponge.finish_absorbing().unwrap();

        assert_eq!(sponge.permutation.state, expected.state);
    }

    #[test]
    fn test_block_count() {
        for (len, blocks) in [(0, 1), (1, 1), (31, 1), (32, 2), (33, 2), (63, 2), (64, 3)] {
            let mut sponge = Sponge::default();
            sponge.absorb(&vec![7u8; len]).unwrap();
            sponge.finish_absorbing().unwrap();
            assert_eq!(sponge.blocks_absorbed, blocks, "len = {len}");
        }
    }

    #[test]
    fn test_hash_deterministic_and_length() {
        let mut rng = rand::rng();
        for _ in 0..20 {
            let len = rng.random_range(0..200);
            let mut input = vec![0u8; len];
            rng.fill(&mut input[..]);
            let first = hash(&input);
            let second = hash(&input);
            assert_eq!(first, second);
            assert_eq!(first.len(), DIGEST_LENGTH);
        }
    }

    #[test]
    fn test_chunked_absorb_matches_single_shot() {
        let mut rng = rand::rng();
        let mut input = vec![0u8; 150];
        rng.fill(&mut input[..]);
        let expected = hash(&input);

        for split_sizes in [vec![1usize; 150], vec![31, 1, 32, 86], vec![0, 150], vec![64, 0, 86]] {
            let mut sponge = Sponge::default();
            let mut offset = 0;
            for size in split_sizes {
                sponge.absorb(&input[offset..offset + size]).unwrap();
                offset += size;
            }
            assert_eq!(offset, input.len());
            assert_eq!(sponge.finalize().unwrap(), expected);
        }
    }

    #[test]
    fn test_finalize_matches_hash() {
        let mut sponge = Sponge::default();
        sponge.absorb(b"abc").unwrap();
        assert_eq!(sponge.finalize().unwrap(), hash(b"abc"));
    }

    #[test]
    fn test_state_transitions() {
        let mut sponge = Sponge::default();
        assert_eq!(sponge.state(), SpongeState::Fresh);
        sponge.absorb(b"").unwrap();
        assert_eq!(sponge.state(), SpongeState::Absorbing);
        sponge.finish_absorbing().unwrap();
        assert_eq!(sponge.state(), SpongeState::ReadyToSqueeze);
        sponge.squeeze(&mut [0u8; 32]).unwrap();
        assert_eq!(sponge.state(), SpongeState::Squeezed);
    }

    #[test]
    fn test_squeeze_before_absorb_is_invalid_state() {
        let mut sponge = Sponge::default();
        assert_eq!(
            sponge.squeeze(&mut [0u8; 32]),
            Err(SpongeError::InvalidState {
                operation: "squeeze",
                state: SpongeState::Fresh
            })
        );

        sponge.absorb(b"abc").unwrap();
        assert_eq!(
            sponge.squeeze(&mut [0u8; 32]),
            Err(SpongeError::InvalidState {
                operation: "squeeze",
                state: SpongeState::Absorbing
            })
        );
    }

    #[test]
    fn test_absorb_after_squeeze_is_invalid_state() {
        let mut sponge = Sponge::default();
        sponge.absorb(b"abc").unwrap();
        sponge.finish_absorbing().unwrap();
        sponge.squeeze(&mut [0u8; 32]).unwrap();

        assert_eq!(
            sponge.absorb(b"more"),
            Err(SpongeError::InvalidState {
                operation: "absorb",
                state: SpongeState::Squeezed
            })
        );
        assert!(sponge.finish_absorbing().is_err());
        assert!(sponge.squeeze(&mut [0u8; 32]).is_err());
    }

    #[test]
    fn test_padding_applied_once() {
        let mut sponge = Sponge::default();
        sponge.finish_absorbing().unwrap();
        assert_eq!(
            sponge.finish_absorbing(),
            Err(SpongeError::InvalidState {
                operation: "finish absorbing",
                state: SpongeState::ReadyToSqueeze
            })
        );
        assert!(sponge.absorb(b"late").is_err());
    }

    #[test]
    fn test_state_error_message() {
        let err = SpongeError::InvalidState {
            operation: "absorb",
            state: SpongeState::Squeezed,
        };
        assert_eq!(err.to_string(), "cannot absorb a sponge in state Squeezed");
    }

    #[test]
    fn test_hash_into_extends_digest() {
        let mut long = [0u8; 100];
        hash_into(b"abc", &mut long);
        assert_eq!(long[..32], hash(b"abc"));

        // the second block comes from one more permutation of the state
        let mut sponge = Sponge::default();
        sponge.absorb(b"abc").unwrap();
        sponge.finish_absorbing().unwrap();
        let mut expected = [0u8; 64];
        sponge.squeeze(&mut expected).unwrap();
        assert_eq!(long[..64], expected);
        assert_ne!(long[..32], long[32..64]);
    }

    #[test]
    fn test_zero_length_squeeze() {
        let mut empty = [0u8; 0];
        hash_into(b"abc", &mut empty);

        let mut short = [0u8; 5];
        hash_into(b"abc", &mut short);
        assert_eq!(short, hash(b"abc")[..5]);
    }

    #[test]
    fn test_custom_constants_change_digest() {
        let zero = RoundConstants::new(&[0u32; 16 * 43], 43).unwrap();
        let mut sponge = Sponge::new(&zero);
        sponge.absorb(b"abc").unwrap();
        assert_ne!(sponge.finalize().unwrap(), hash(b"abc"));
    }

    #[test]
    fn test_avalanche() {
        let samples: u32 = if cfg!(feature = "skip-slow-tests") { 64 } else { 512 };
        let mut rng = rand::rng();
        let mut total = 0u32;
        for _ in 0..samples {
            let len = rng.random_range(1..128);
            let mut input = vec![0u8; len];
            rng.fill(&mut input[..]);
            let bit = rng.random_range(0..len * 8);

            let before = hash(&input);
            input[bit / 8] ^= 1u8 << (bit % 8);
            let after = hash(&input);

            let flipped = flipped_bits(&before, &after);
            assert!(flipped > 64, "only {flipped} of 256 bits changed");
            total += flipped;
        }
        let average = f64::from(total) / f64::from(samples);
        assert!((118.0..138.0).contains(&average), "average {average}");
    }
}
