use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;
use sm3::stream::{DEFAULT_BATCH_BLOCKS, MAX_BATCH_BLOCKS};
use sm3::StreamConfig;

use crate::format::{LineFormat, OutputStyle};
use crate::verify::VerifyOptions;

#[derive(Debug, Parser)]
#[command(
    name = "sm3sum",
    version,
    about = "Print or check SM3 (256-bit) checksums.",
    after_help = "With no FILE, or when FILE is -, read standard input.\n\
                  The sums are computed as described in GM/T 0004-2012.\n\
                  When checking, the input should be a former output of this program."
)]
pub struct Cli {
    /// read in binary mode
    #[arg(short = 'b', long, overrides_with = "text")]
    pub binary: bool,

    /// read SM3 sums from the FILEs and check them
    #[arg(short = 'c', long)]
    pub check: bool,

    /// create a BSD-style checksum
    #[arg(long)]
    pub tag: bool,

    /// read in text mode (default)
    #[arg(short = 't', long, overrides_with = "binary")]
    pub text: bool,

    /// end each output line with NUL, not newline
    #[arg(short = 'z', long)]
    pub zero: bool,

    /// don't fail or report status for missing files
    #[arg(long, requires = "check")]
    pub ignore_missing: bool,

    /// don't print OK for each successfully verified file
    #[arg(long, requires = "check")]
    pub quiet: bool,

    /// don't output anything, status code shows success
    #[arg(long, requires = "check")]
    pub status: bool,

    /// blocks of 64 bytes read per batch from regular files
    #[arg(
        long,
        value_name = "N",
        env = "SM3SUM_BATCH_BLOCKS",
        value_parser = parse_batch_blocks,
        default_value_t = NonZeroUsize::new(DEFAULT_BATCH_BLOCKS).expect("nonzero constant")
    )]
    pub batch_blocks: NonZeroUsize,

    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

fn parse_batch_blocks(s: &str) -> Result<NonZeroUsize, String> {
    let blocks: NonZeroUsize = s.parse().map_err(|e| format!("{}", e))?;
    if blocks.get() > MAX_BATCH_BLOCKS {
        return Err(format!("must be at most {}", MAX_BATCH_BLOCKS));
    }
    Ok(blocks)
}

impl Cli {
    pub fn stream_config(&self) -> sm3::Result<StreamConfig> {
        StreamConfig::with_batch_blocks(self.batch_blocks)
    }

    pub fn line_format(&self) -> LineFormat {
        LineFormat {
            style: if self.tag {
                OutputStyle::Tag
            } else {
                OutputStyle::Classic {
                    binary: self.binary,
                }
            },
            zero_terminated: self.zero,
        }
    }

    pub fn verify_options(&self) -> VerifyOptions {
        VerifyOptions {
            ignore_missing: self.ignore_missing,
            quiet: self.quiet,
            status: self.status,
        }
    }

    /// Operands, with standard input standing in when none are given.
    pub fn inputs(&self) -> Vec<PathBuf> {
        if self.files.is_empty() {
            vec![PathBuf::from("-")]
        } else {
            self.files.clone()
        }
    }
}
