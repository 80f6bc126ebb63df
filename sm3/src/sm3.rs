use block_buffer::byteorder::BE;
use block_buffer::BlockBuffer;
use digest::generic_array::typenum::{U32, U64};
use digest::generic_array::GenericArray;
use digest::{BlockInput, FixedOutput, Input, Reset};

use crate::hash::Hash256;
use crate::state::HashState;

type BlockSize = U64;

#[derive(Clone)]
struct Engine {
    len: u64,
    buffer: BlockBuffer<BlockSize>,
    state: HashState,
}

impl Engine {
    fn new() -> Engine {
        Engine {
            len: 0,
            buffer: Default::default(),
            state: HashState::new(),
        }
    }

    fn input(&mut self, input: &[u8]) {
        // Assumes that input.len() can be converted to u64 without overflow
        self.len += (input.len() as u64) << 3;
        let self_state = &mut self.state;
        self.buffer
            .input(input, |block| self_state.absorb(block.as_slice()));
    }

    fn finish(&mut self) -> Hash256 {
        let self_state = &mut self.state;
        let l = self.len;
        self.buffer
            .len64_padding::<BE, _>(l, |block| self_state.absorb(block.as_slice()));
        self.state.finalize()
    }

    fn reset(&mut self) {
        self.len = 0;
        self.buffer.reset();
        self.state.reset();
    }
}

/// Incremental SM3 hasher for in-memory input, usable through [`digest::Digest`].
#[derive(Clone)]
pub struct Sm3 {
    engine: Engine,
}

impl Sm3 {
    /// Pads, finishes, and returns the digest as a [`Hash256`].
    pub fn finalize_hash(mut self) -> Hash256 {
        self.engine.finish()
    }
}

impl Default for Sm3 {
    fn default() -> Self {
        Sm3 {
            engine: Engine::new(),
        }
    }
}

impl BlockInput for Sm3 {
    type BlockSize = BlockSize;
}

impl Input for Sm3 {
    fn input<B: AsRef<[u8]>>(&mut self, input: B) {
        self.engine.input(input.as_ref());
    }
}

impl FixedOutput for Sm3 {
    type OutputSize = U32;

    fn fixed_result(mut self) -> GenericArray<u8, Self::OutputSize> {
        let hash = self.engine.finish();
        GenericArray::clone_from_slice(hash.as_ref())
    }
}

impl Reset for Sm3 {
    fn reset(&mut self) {
        self.engine.reset();
    }
}
