use crate::consts::{BLOCK_LEN, STATE_LEN, T_0, T_1};
use crate::wire;

/// `FF_j`: parity for the first 16 rounds, majority after.
#[inline(always)]
fn ff(x: u32, y: u32, z: u32, j: usize) -> u32 {
    if j < 16 {
        x ^ y ^ z
    } else {
        (x & y) | (x & z) | (y & z)
    }
}

/// `GG_j`: parity for the first 16 rounds, choice after.
#[inline(always)]
fn gg(x: u32, y: u32, z: u32, j: usize) -> u32 {
    if j < 16 {
        x ^ y ^ z
    } else {
        (x & y) | (!x & z)
    }
}

#[inline(always)]
fn p0(x: u32) -> u32 {
    x ^ x.rotate_left(9) ^ x.rotate_left(17)
}

#[inline(always)]
fn p1(x: u32) -> u32 {
    x ^ x.rotate_left(15) ^ x.rotate_left(23)
}

/// `T_j <<< j`. The round index goes up to 63, so the amount is taken mod 32.
#[inline(always)]
pub(crate) fn rotated_constant(j: usize) -> u32 {
    let t = if j < 16 { T_0 } else { T_1 };
    t.rotate_left((j % 32) as u32)
}

/// 5.3.2 Message Expansion: `W[0..68]` and `W'[0..64]` for one block, native order.
pub(crate) struct MessageSchedule {
    pub(crate) w: [u32; 68],
    pub(crate) w_prime: [u32; 64],
}

impl MessageSchedule {
    pub(crate) fn expand(block: &[u8]) -> MessageSchedule {
        assert_eq!(block.len(), BLOCK_LEN, "SM3 absorbs exactly one 64-byte block");

        let mut w = [0u32; 68];
        let mut w_prime = [0u32; 64];

        wire::read_words(block, &mut w[..16]);
        for j in 16..=67 {
            w[j] = p1(w[j - 16] ^ w[j - 9] ^ w[j - 3].rotate_left(15))
                ^ w[j - 13].rotate_left(7)
                ^ w[j - 6];
        }
        for j in 0..=63 {
            w_prime[j] = w[j] ^ w[j + 4];
        }

        MessageSchedule { w, w_prime }
    }
}

/// Runs the 64 rounds of CF starting from `v` (native order) and returns the
/// final `A..H` registers. The caller folds them back into the chaining value.
pub(crate) fn rounds(v: &[u32; STATE_LEN], schedule: &MessageSchedule) -> [u32; STATE_LEN] {
    let MessageSchedule { w, w_prime } = schedule;
    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *v;
    for j in 0..64 {
        let a12 = a.rotate_left(12);
        let ss1 = a12
            .wrapping_add(e)
            .wrapping_add(rotated_constant(j))
            .rotate_left(7);
        let ss2 = ss1 ^ a12;
        let tt1 = ff(a, b, c, j)
            .wrapping_add(d)
            .wrapping_add(ss2)
            .wrapping_add(w_prime[j]);
        let tt2 = gg(e, f, g, j)
            .wrapping_add(h)
            .wrapping_add(ss1)
            .wrapping_add(w[j]);
        d = c;
        c = b.rotate_left(9);
        b = a;
        a = tt1;
        h = g;
        g = f.rotate_left(19);
        f = e;
        e = p0(tt2);
    }
    [a, b, c, d, e, f, g, h]
}
