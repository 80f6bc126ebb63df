//! `sm3sum`: print or check SM3 checksums, in the manner of coreutils' `*sum` tools.

pub mod checklist;
pub mod cli;
pub mod format;
pub mod input;
pub mod name;
pub mod verify;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::Path;

use anyhow::{Context, Result};
use sm3::StreamDriver;
use tracing::debug;

use crate::checklist::{read_checklist, ChecklistEntry};
use crate::cli::Cli;
use crate::input::digest_path;
use crate::name::write_status;
use crate::verify::Verifier;

/// How a run ended, short of a fatal error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// Some file failed to read or verify; the rest were processed.
    Failure,
}

/// Runs one invocation against the given output streams.
///
/// Errors returned from here stop the whole run: a malformed checklist, or
/// being unable to write output.
pub fn run<O: Write, E: Write>(cli: &Cli, out: &mut O, err: &mut E) -> Result<Outcome> {
    let mut driver = StreamDriver::new(cli.stream_config().context("invalid --batch-blocks")?);
    debug!(config = ?driver.config(), check = cli.check, "starting");
    if cli.check {
        check(cli, &mut driver, out, err)
    } else {
        print_sums(cli, &mut driver, out, err)
    }
}

fn print_sums<O: Write, E: Write>(
    cli: &Cli,
    driver: &mut StreamDriver,
    out: &mut O,
    err: &mut E,
) -> Result<Outcome> {
    let format = cli.line_format();
    let mut outcome = Outcome::Success;
    for path in cli.inputs() {
        match digest_path(driver, &path) {
            Ok(hash) => format
                .write_line(out, &hash, &path)
                .context("writing output")?,
            Err(e) => {
                err.write_all(b"sm3sum: ")?;
                write_status(err, &path, &e.to_string())?;
                outcome = Outcome::Failure;
            }
        }
    }
    out.flush().context("writing output")?;
    Ok(outcome)
}

fn check<O: Write, E: Write>(
    cli: &Cli,
    driver: &mut StreamDriver,
    out: &mut O,
    err: &mut E,
) -> Result<Outcome> {
    let mut entries: Vec<ChecklistEntry> = Vec::new();
    let mut outcome = Outcome::Success;
    for path in cli.inputs() {
        let name = path.display().to_string();
        let mut listed = if path == Path::new("-") {
            let stdin = io::stdin();
            read_checklist(stdin.lock(), &name)?
        } else {
            match File::open(&path) {
                Ok(file) => read_checklist(BufReader::new(file), &name)?,
                Err(e) => {
                    err.write_all(b"sm3sum: ")?;
                    write_status(err, &path, &e.to_string())?;
                    outcome = Outcome::Failure;
                    continue;
                }
            }
        };
        debug!(checklist = %name, entries = listed.len(), "loaded checksum list");
        entries.append(&mut listed);
    }

    let report = Verifier::new(cli.verify_options())
        .verify(&entries, driver, out, err)
        .context("writing output")?;
    debug!(?report, "verification finished");
    out.flush().context("writing output")?;

    if report.is_success() && outcome == Outcome::Success {
        Ok(Outcome::Success)
    } else {
        Ok(Outcome::Failure)
    }
}
