//! Message padding (GM/T 0004-2012 §5.2).
//!
//! A message of `l` bits is followed by a single `1` bit, `k` zero bits with
//! `l + 1 + k ≡ 448 (mod 512)`, and the 64-bit big-endian encoding of `l`.

use crate::consts::BLOCK_LEN;
use crate::wire;

/// Blocks a scratch buffer must reserve beyond the unpadded tail.
pub const MAX_PAD_BLOCKS: usize = 2;

const BLOCK_BITS: u64 = (BLOCK_LEN * 8) as u64;
const LENGTH_OFFSET_BITS: u64 = BLOCK_BITS - 64;

/// Bit length of a message of `bit_len` bits once padded.
pub fn padded_bits(bit_len: u64) -> u64 {
    let used = bit_len + 1;
    let blocks = if used % BLOCK_BITS <= LENGTH_OFFSET_BITS {
        used / BLOCK_BITS + 1
    } else {
        used / BLOCK_BITS + 2
    };
    blocks * BLOCK_BITS
}

/// Pads the final bytes of a message in place and returns the padded length
/// in bytes, always a multiple of [`BLOCK_LEN`].
///
/// `buf` starts on a block boundary of the message and holds `content_bits`
/// bits of it. `total_bits` is the length of the whole message, including
/// blocks already absorbed. Everything in `buf` past the content, up to the
/// returned length, is overwritten.
///
/// # Panics
///
/// If `buf` is too short for the padded output.
pub fn pad(buf: &mut [u8], content_bits: usize, total_bits: u64) -> usize {
    debug_assert_eq!(content_bits as u64 % BLOCK_BITS, total_bits % BLOCK_BITS);

    let padded = (padded_bits(content_bits as u64) / 8) as usize;
    assert!(
        buf.len() >= padded,
        "padding needs {} bytes, buffer holds {}",
        padded,
        buf.len()
    );

    let byte = content_bits / 8;
    let bit = content_bits % 8;
    // keep the live high bits of a partial byte, then set the marker after them
    buf[byte] = (buf[byte] & !(0xffu8 >> bit)) | (0x80 >> bit);
    for b in buf[byte + 1..padded - 8].iter_mut() {
        *b = 0;
    }
    buf[padded - 8..padded].copy_from_slice(&wire::to_wire64(total_bits).to_ne_bytes());
    padded
}
