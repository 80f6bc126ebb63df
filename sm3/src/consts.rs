pub const STATE_LEN: usize = 8;

/// Bytes per message block.
pub const BLOCK_LEN: usize = 64;

/// Bytes per digest.
pub const DIGEST_LEN: usize = 32;

pub const IV: [u32; STATE_LEN] = [
    0x7380_166f,
    0x4914_b2b9,
    0x1724_42d7,
    0xda8a_0600,
    0xa96f_30bc,
    0x1631_38aa,
    0xe38d_ee4d,
    0xb0fb_0e4e,
];

pub const T_0: u32 = 0x79cc_4519;
pub const T_1: u32 = 0x7a87_9d8a;
