//! Askpass-style entrypoint: prompt on stderr, read with the chosen echo mode, secret on stdout.
//!
//! Exit codes: 0 on success, 130 when the user pressed Ctrl-C, 1 on any other failure.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{execute, style::Print};
use passread::{telemetry::init_tracing, ReadError, SecretReader, StdinSource, StdinTerminal};
use std::io::{self, Write};
use std::process::ExitCode;

use crate::cli::ReadpassConfig;

const EXIT_INTERRUPTED: u8 = 130;

fn main() -> ExitCode {
    let config = ReadpassConfig::parse();
    match run(&config) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("readpass: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &ReadpassConfig) -> Result<ExitCode> {
    config.app.validate()?;
    init_tracing(&config.app);
    tracing::debug!(mode = ?config.mode, "readpass starting");

    let mut stderr = io::stderr();
    execute!(stderr, Print(&config.prompt)).context("failed to write prompt")?;

    let terminal = StdinTerminal::new(config.app.stty_command());
    let mut reader = SecretReader::new(StdinSource::default(), io::stderr(), terminal)
        .with_config(config.app.reader_config());

    let secret = match reader.read_secret(config.mode.into()) {
        Ok(secret) => secret,
        Err(failure) if failure.is_interrupted() => return Ok(ExitCode::from(EXIT_INTERRUPTED)),
        Err(failure) => {
            let (error, _partial) = failure.into_parts();
            return Err(match error {
                ReadError::Io(err) => anyhow::Error::new(err).context("failed to read secret"),
                other => anyhow::Error::new(other),
            });
        }
    };

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(secret.as_bytes())
        .and_then(|()| stdout.write_all(b"\n"))
        .and_then(|()| stdout.flush())
        .context("failed to write secret to stdout")?;
    Ok(ExitCode::SUCCESS)
}
