use crate::compress::{self, MessageSchedule};
use crate::consts::{BLOCK_LEN, DIGEST_LEN, IV, STATE_LEN};
use crate::hash::Hash256;
use crate::wire;

/// The running chaining value `V`.
///
/// Words are kept in wire order and converted to native order only while a
/// block is being compressed. A state is created at `IV`; absorbing a block
/// replaces it with `CF(V, block)`. `finalize` reads it without resetting.
#[derive(Clone)]
pub struct HashState {
    v: [u32; STATE_LEN],
}

impl HashState {
    pub fn new() -> HashState {
        let mut state = HashState { v: [0; STATE_LEN] };
        state.reset();
        state
    }

    /// Restores the standard initial value.
    pub fn reset(&mut self) {
        for (v, iv) in self.v.iter_mut().zip(IV.iter()) {
            *v = wire::to_wire32(*iv);
        }
    }

    /// Compresses one 64-byte block into the state.
    ///
    /// # Panics
    ///
    /// If `block` is not exactly [`BLOCK_LEN`] bytes.
    pub fn absorb(&mut self, block: &[u8]) {
        let schedule = MessageSchedule::expand(block);
        let registers = compress::rounds(&self.native_words(), &schedule);
        for (v, r) in self.v.iter_mut().zip(registers.iter()) {
            *v ^= wire::to_wire32(*r);
        }
    }

    /// Absorbs a run of whole blocks.
    ///
    /// # Panics
    ///
    /// If `data` is not a multiple of [`BLOCK_LEN`] bytes.
    pub fn absorb_blocks(&mut self, data: &[u8]) {
        assert_eq!(data.len() % BLOCK_LEN, 0, "input is not block aligned");
        for block in data.chunks_exact(BLOCK_LEN) {
            self.absorb(block);
        }
    }

    pub fn finalize(&self) -> Hash256 {
        let mut out = [0u8; DIGEST_LEN];
        wire::write_words(&self.native_words(), &mut out);
        Hash256::from(out)
    }

    fn native_words(&self) -> [u32; STATE_LEN] {
        let mut words = [0u32; STATE_LEN];
        for (n, v) in words.iter_mut().zip(self.v.iter()) {
            *n = wire::from_wire32(*v);
        }
        words
    }
}

impl Default for HashState {
    fn default() -> Self {
        HashState::new()
    }
}
