use std::fs::File;
use std::io;
use std::path::Path;

use sm3::{Hash256, StreamDriver};
use tracing::debug;

/// Digests the file at `path`, or standard input when `path` is `-`.
///
/// Regular files go through the known-size path using the length reported
/// by the file system; standard input is read until it ends.
pub fn digest_path(driver: &mut StreamDriver, path: &Path) -> sm3::Result<Hash256> {
    if path == Path::new("-") {
        let stdin = io::stdin();
        return driver.digest_unsized(stdin.lock());
    }

    let file = File::open(path)?;
    let metadata = file.metadata()?;
    if !metadata.is_file() {
        debug!(path = %path.display(), "not a regular file, reading to end");
        return driver.digest_unsized(file);
    }
    debug!(path = %path.display(), len = metadata.len(), "digesting file");
    driver.digest_sized(file, metadata.len())
}
