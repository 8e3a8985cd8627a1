use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256,
};

/// Extendable-output function used to expand a seed into constant material.
///
/// The constant table, and therefore every digest, depends on which XOF is
/// plugged in here. The reference table uses [`Shake256Xof`].
pub trait Xof {
    /// Returns the first `n` bytes of the output stream for `seed`.
    fn xof(&self, seed: &[u8], n: usize) -> Vec<u8>;
}

/// SHAKE256 from FIPS 202.
#[derive(Debug, Default, Clone, Copy)]
pub struct Shake256Xof;

impl Xof for Shake256Xof {
    fn xof(&self, seed: &[u8], n: usize) -> Vec<u8> {
        let mut hasher = Shake256::default();
        hasher.update(seed);
        let mut reader = hasher.finalize_xof();
        let mut output_buffer = vec![u8::default(); n];
        reader.read(&mut output_buffer);
        output_buffer
    }
}
