//! SM3 cryptographic hash (GM/T 0004-2012).
//!
//! [`Sm3`] hashes in-memory data through the [`Digest`] trait. With the
//! `std` feature, [`StreamDriver`] digests files and pipes of any size.
#![no_std]

#[cfg(any(feature = "std", test))]
extern crate std;

mod compress;
mod consts;
mod hash;
pub mod pad;
mod sm3;
mod state;
pub mod wire;

#[cfg(feature = "std")]
mod error;
#[cfg(feature = "std")]
pub mod stream;

pub use digest::Digest;

pub use crate::consts::{BLOCK_LEN, DIGEST_LEN};
pub use crate::hash::Hash256;
pub use crate::sm3::Sm3;
pub use crate::state::HashState;

#[cfg(feature = "std")]
pub use crate::error::{Error, Result};
#[cfg(feature = "std")]
pub use crate::stream::{compute_digest, Source, StreamConfig, StreamDriver};
