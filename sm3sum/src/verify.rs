use std::io::{self, Write};

use sm3::StreamDriver;
use tracing::debug;

use crate::checklist::ChecklistEntry;
use crate::input::digest_path;
use crate::name::write_status;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Skip listed files that do not exist.
    pub ignore_missing: bool,
    /// Don't print a line for files that match.
    pub quiet: bool,
    /// Print nothing; the outcome is only in the report.
    pub status: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub checked: usize,
    pub mismatched: usize,
    pub unreadable: usize,
}

impl VerifyReport {
    pub fn is_success(&self) -> bool {
        self.mismatched == 0 && self.unreadable == 0
    }
}

pub struct Verifier {
    options: VerifyOptions,
}

impl Verifier {
    pub fn new(options: VerifyOptions) -> Verifier {
        Verifier { options }
    }

    /// Recomputes the digest of every entry and compares it with the listing.
    ///
    /// Per-file results go to `out`, diagnostics and the closing warnings to
    /// `err`. A file that cannot be read is counted and skipped.
    pub fn verify<O: Write, E: Write>(
        &self,
        entries: &[ChecklistEntry],
        driver: &mut StreamDriver,
        out: &mut O,
        err: &mut E,
    ) -> io::Result<VerifyReport> {
        let mut report = VerifyReport::default();

        for entry in entries {
            let name = entry.file_name.as_path();
            let actual = match digest_path(driver, name) {
                Ok(hash) => hash,
                Err(sm3::Error::Io(ref e))
                    if self.options.ignore_missing && e.kind() == io::ErrorKind::NotFound =>
                {
                    debug!(file = %name.display(), "ignoring missing file");
                    continue;
                }
                Err(e) => {
                    debug!(file = %name.display(), error = %e, "cannot digest listed file");
                    report.unreadable += 1;
                    if !self.options.status {
                        err.write_all(b"sm3sum: ")?;
                        write_status(err, name, &e.to_string())?;
                        write_status(out, name, "FAILED open or read")?;
                    }
                    continue;
                }
            };

            report.checked += 1;
            if actual == entry.expected {
                if !self.options.status && !self.options.quiet {
                    write_status(out, name, "OK")?;
                }
            } else {
                report.mismatched += 1;
                if !self.options.status {
                    write_status(out, name, "FAILED")?;
                }
            }
        }

        if !self.options.status {
            if report.unreadable > 0 {
                writeln!(
                    err,
                    "sm3sum: WARNING: {} listed {} could not be read",
                    report.unreadable,
                    plural(report.unreadable, "file", "files")
                )?;
            }
            if report.mismatched > 0 {
                writeln!(
                    err,
                    "sm3sum: WARNING: {} computed {} did NOT match",
                    report.mismatched,
                    plural(report.mismatched, "checksum", "checksums")
                )?;
            }
        }

        Ok(report)
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}
