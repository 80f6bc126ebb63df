//! File names as raw bytes.
//!
//! Names are written and parsed byte for byte, so a name that is not UTF-8
//! still verifies from the listing it was printed into.

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[cfg(unix)]
pub fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
pub fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(unix)]
pub fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    use std::os::unix::ffi::OsStrExt;

    Cow::Borrowed(path.as_os_str().as_bytes())
}

#[cfg(not(unix))]
pub fn path_bytes(path: &Path) -> Cow<'_, [u8]> {
    match path.to_string_lossy() {
        Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
        Cow::Owned(s) => Cow::Owned(s.into_bytes()),
    }
}

pub fn write_name<W: Write>(out: &mut W, path: &Path) -> io::Result<()> {
    out.write_all(&path_bytes(path))
}

/// Writes `<name>: <status>` and a newline.
pub fn write_status<W: Write>(out: &mut W, path: &Path, status: &str) -> io::Result<()> {
    write_name(out, path)?;
    writeln!(out, ": {}", status)
}
