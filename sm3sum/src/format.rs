//! Digest line output.

use std::io::{self, Write};
use std::path::Path;

use sm3::Hash256;

use crate::name::write_name;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputStyle {
    /// `<hex> <mode><name>`, where the mode marker is `*` for binary reads
    Classic { binary: bool },
    /// `SM3 (<name>) = <hex>`
    Tag,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineFormat {
    pub style: OutputStyle,
    pub zero_terminated: bool,
}

impl LineFormat {
    pub fn write_line<W: Write>(&self, out: &mut W, hash: &Hash256, name: &Path) -> io::Result<()> {
        match self.style {
            OutputStyle::Classic { binary } => {
                let mode = if binary { '*' } else { ' ' };
                write!(out, "{} {}", hash, mode)?;
                write_name(out, name)?;
            }
            OutputStyle::Tag => {
                out.write_all(b"SM3 (")?;
                write_name(out, name)?;
                write!(out, ") = {}", hash)?;
            }
        }
        out.write_all(if self.zero_terminated { b"\0" } else { b"\n" })
    }
}
