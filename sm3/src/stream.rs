//! Drives the compression engine over `Read` sources.
//!
//! Two paths exist. When the length is known up front (a regular file), the
//! source is read in batches of whole blocks while at least one more block
//! remains after the batch. The tail is then read in one go and padded. When
//! the length is unknown (standard input), bytes are pulled one at a time
//! into a single block buffer, and a full block is absorbed only once a
//! one-byte lookahead proves it is not the last.

use std::io::{self, BufReader, Read};
use std::num::NonZeroUsize;
use std::vec;

use tracing::{debug, trace};

use crate::consts::BLOCK_LEN;
use crate::error::{Error, Result};
use crate::hash::Hash256;
use crate::pad::{self, MAX_PAD_BLOCKS};
use crate::state::HashState;

/// Blocks read per batch when no other size is configured (64 KiB).
pub const DEFAULT_BATCH_BLOCKS: usize = 1024;

/// Largest accepted batch (64 MiB).
pub const MAX_BATCH_BLOCKS: usize = 1 << 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamConfig {
    batch_blocks: NonZeroUsize,
}

impl StreamConfig {
    /// Fails with [`Error::BatchTooLarge`] above [`MAX_BATCH_BLOCKS`].
    pub fn with_batch_blocks(batch_blocks: NonZeroUsize) -> Result<StreamConfig> {
        if batch_blocks.get() > MAX_BATCH_BLOCKS {
            return Err(Error::BatchTooLarge {
                blocks: batch_blocks.get(),
                max: MAX_BATCH_BLOCKS,
            });
        }
        Ok(StreamConfig { batch_blocks })
    }

    /// Whole blocks read and absorbed per batch on the known-size path.
    pub fn batch_blocks(&self) -> NonZeroUsize {
        self.batch_blocks
    }

    /// Batch size in bytes and the scratch length it needs.
    fn buffer_sizes(&self) -> Result<(usize, usize)> {
        let blocks = self.batch_blocks.get();
        let too_large = || Error::BatchTooLarge {
            blocks,
            max: MAX_BATCH_BLOCKS,
        };
        let batch = blocks.checked_mul(BLOCK_LEN).ok_or_else(too_large)?;
        let scratch = batch
            .checked_add(MAX_PAD_BLOCKS * BLOCK_LEN)
            .ok_or_else(too_large)?;
        Ok((batch, scratch))
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        StreamConfig {
            batch_blocks: NonZeroUsize::new(DEFAULT_BATCH_BLOCKS).expect("nonzero constant"),
        }
    }
}

/// A byte source to digest.
pub enum Source<R> {
    /// A source that yields exactly `len` bytes.
    Sized { reader: R, len: u64 },
    /// A source read until end of input.
    Unsized(R),
}

/// Digests `source` with a state of its own.
pub fn compute_digest<R: Read>(source: Source<R>, config: &StreamConfig) -> Result<Hash256> {
    let mut driver = StreamDriver::new(*config);
    match source {
        Source::Sized { reader, len } => driver.digest_sized(reader, len),
        Source::Unsized(reader) => driver.digest_unsized(reader),
    }
}

/// Owns one [`HashState`] and reuses it across sources, resetting it at the
/// start of every digest.
pub struct StreamDriver {
    state: HashState,
    config: StreamConfig,
}

impl StreamDriver {
    pub fn new(config: StreamConfig) -> StreamDriver {
        StreamDriver {
            state: HashState::new(),
            config,
        }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Digests a source declared to hold exactly `len` bytes.
    ///
    /// A source that ends early fails with [`Error::ShortRead`]. Bytes past
    /// `len` are never read.
    pub fn digest_sized<R: Read>(&mut self, mut reader: R, len: u64) -> Result<Hash256> {
        self.state.reset();

        let (batch, scratch) = self.config.buffer_sizes()?;
        let mut buf = vec![0u8; scratch];
        let mut consumed: u64 = 0;

        // leave at least one block behind so the final block is padded
        while consumed + (batch + BLOCK_LEN) as u64 <= len {
            read_full(&mut reader, &mut buf[..batch], consumed)?;
            self.state.absorb_blocks(&buf[..batch]);
            consumed += batch as u64;
            trace!(consumed, "absorbed batch");
        }

        let tail = (len - consumed) as usize;
        read_full(&mut reader, &mut buf[..tail], consumed)?;
        let padded = pad::pad(&mut buf, tail * 8, len * 8);
        self.state.absorb_blocks(&buf[..padded]);

        debug!(len, tail, padded, "sized digest complete");
        Ok(self.state.finalize())
    }

    /// Digests a source of unknown length, reading until end of input.
    pub fn digest_unsized<R: Read>(&mut self, reader: R) -> Result<Hash256> {
        self.state.reset();

        let mut block = [0u8; MAX_PAD_BLOCKS * BLOCK_LEN];
        let mut pos = 0usize;
        let mut total: u64 = 0;

        let mut bytes = BufReader::new(reader).bytes().peekable();
        while let Some(byte) = bytes.next() {
            block[pos] = byte?;
            pos += 1;
            total += 1;
            if pos == BLOCK_LEN && bytes.peek().is_some() {
                self.state.absorb(&block[..BLOCK_LEN]);
                pos = 0;
                trace!(total, "absorbed block");
            }
        }

        let padded = pad::pad(&mut block, pos * 8, total * 8);
        self.state.absorb_blocks(&block[..padded]);

        debug!(len = total, padded, "unsized digest complete");
        Ok(self.state.finalize())
    }
}

impl Default for StreamDriver {
    fn default() -> Self {
        StreamDriver::new(StreamConfig::default())
    }
}

/// Fills `buf` completely. Running out of input first is a [`Error::ShortRead`].
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8], offset: u64) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(Error::ShortRead {
                    offset,
                    expected: buf.len(),
                    got: filled,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn config(batch_blocks: usize) -> StreamConfig {
        StreamConfig::with_batch_blocks(NonZeroUsize::new(batch_blocks).unwrap()).unwrap()
    }

    /// Hands out at most `chunk` bytes per read, failing every other call
    /// with `Interrupted`.
    struct Trickle<'a> {
        data: &'a [u8],
        chunk: usize,
        interrupt: bool,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "again"));
            }
            let n = self.chunk.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "device gone"))
        }
    }

    #[test]
    fn oversized_batch_is_refused() {
        assert!(StreamConfig::with_batch_blocks(NonZeroUsize::new(MAX_BATCH_BLOCKS).unwrap()).is_ok());
        let err = StreamConfig::with_batch_blocks(NonZeroUsize::new(usize::MAX).unwrap()).unwrap_err();
        assert!(matches!(
            err,
            Error::BatchTooLarge {
                blocks: usize::MAX,
                max: MAX_BATCH_BLOCKS
            }
        ));
    }

    #[test]
    fn overflowing_batch_fails_without_panicking() {
        // only reachable by bypassing the constructor
        let config = StreamConfig {
            batch_blocks: NonZeroUsize::new(usize::MAX).unwrap(),
        };
        let err = StreamDriver::new(config)
            .digest_sized(Cursor::new(&b"abc"[..]), 3)
            .unwrap_err();
        assert!(matches!(err, Error::BatchTooLarge { .. }));
    }

    #[test]
    fn short_source_is_an_error() {
        let data = [7u8; 100];
        let err = StreamDriver::new(config(1))
            .digest_sized(Cursor::new(&data[..]), 300)
            .unwrap_err();
        match err {
            Error::ShortRead {
                offset,
                expected,
                got,
            } => {
                assert_eq!(offset, 64);
                assert_eq!(expected, 64);
                assert_eq!(got, 36);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn short_tail_is_an_error() {
        let data = [7u8; 10];
        let err = StreamDriver::default()
            .digest_sized(Cursor::new(&data[..]), 11)
            .unwrap_err();
        assert!(matches!(err, Error::ShortRead { offset: 0, expected: 11, got: 10 }));
    }

    #[test]
    fn bytes_past_declared_length_are_ignored() {
        let data = [3u8; 200];
        let mut driver = StreamDriver::new(config(1));
        let declared = driver.digest_sized(Cursor::new(&data[..]), 130).unwrap();
        let exact = driver.digest_sized(Cursor::new(&data[..130]), 130).unwrap();
        assert_eq!(declared, exact);
    }

    #[test]
    fn partial_and_interrupted_reads_are_retried() {
        let data: std::vec::Vec<u8> = (0..1000u32).map(|i| i as u8).collect();
        let mut driver = StreamDriver::new(config(2));
        let trickled = driver
            .digest_sized(
                Trickle {
                    data: &data,
                    chunk: 7,
                    interrupt: false,
                },
                data.len() as u64,
            )
            .unwrap();
        let direct = driver
            .digest_sized(Cursor::new(&data), data.len() as u64)
            .unwrap();
        assert_eq!(trickled, direct);
    }

    #[test]
    fn io_error_message_is_passed_through() {
        let err = StreamDriver::default().digest_sized(Broken, 10).unwrap_err();
        assert_eq!(std::format!("{}", err), "device gone");
    }

    #[test]
    fn io_errors_propagate() {
        assert!(matches!(
            StreamDriver::default().digest_sized(Broken, 10),
            Err(Error::Io(_))
        ));
        assert!(matches!(
            StreamDriver::default().digest_unsized(Broken),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn smallest_batch_leaves_room_for_padding() {
        // tail of 127 bytes with one-block batches pads to three blocks
        let data = [0xa5u8; 191];
        let mut driver = StreamDriver::new(config(1));
        let sized = driver
            .digest_sized(Cursor::new(&data[..]), data.len() as u64)
            .unwrap();
        let unsized_ = driver.digest_unsized(Cursor::new(&data[..])).unwrap();
        assert_eq!(sized, unsized_);
    }
}
