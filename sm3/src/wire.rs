//! Byte order adapter.
//!
//! SM3 defines every word and the message length field in big-endian
//! ("wire") order. Arithmetic happens on native words; these helpers are the
//! only place the two meet. The host order is fixed at compile time, so each
//! conversion is either a byte swap or the identity.

use block_buffer::byteorder::{ByteOrder, BE};

#[inline(always)]
pub fn to_wire32(x: u32) -> u32 {
    x.to_be()
}

#[inline(always)]
pub fn from_wire32(x: u32) -> u32 {
    u32::from_be(x)
}

#[inline(always)]
pub fn to_wire64(x: u64) -> u64 {
    x.to_be()
}

#[inline(always)]
pub fn from_wire64(x: u64) -> u64 {
    u64::from_be(x)
}

/// Decodes wire-order bytes into native words. `src.len()` must be `4 * dst.len()`.
pub fn read_words(src: &[u8], dst: &mut [u32]) {
    BE::read_u32_into(src, dst);
}

/// Encodes native words as wire-order bytes. `dst.len()` must be `4 * src.len()`.
pub fn write_words(src: &[u32], dst: &mut [u8]) {
    BE::write_u32_into(src, dst);
}
