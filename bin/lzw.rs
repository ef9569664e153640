#![forbid(unsafe_code)]
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::{env, ffi, fs};

use anyhow::Context;
use clap::builder::RangedU64ValueParser;
use clap::{Arg, ArgAction, ArgGroup};
use parlzw::{Archive, Strategy};
use tracing_subscriber::EnvFilter;

fn main() -> CodingResult {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    CodingResult::catch_panic(|| {
        let flags = Flags::from_args(env::args_os());
        run_coding(flags)
    })
}

fn run_coding(flags: Flags) -> anyhow::Result<()> {
    let data = match &flags.input {
        Input::File(path) => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
        }
        Input::Stdin => {
            let mut data = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut data)
                .context("failed to read stdin")?;
            data
        }
    };

    let output = match flags.operation {
        Operation::Encode => {
            let archive = Archive::compress(&data, flags.segments, flags.strategy)?;
            let bytes = archive.to_bytes();
            tracing::info!(
                input = data.len(),
                output = bytes.len(),
                segments = flags.segments,
                strategy = ?flags.strategy,
                "compressed"
            );
            bytes
        }
        Operation::Decode => {
            let archive = Archive::from_bytes(&data).context("input is not an archive")?;
            let bytes = archive.decompress().context("archive is corrupt")?;
            tracing::info!(
                input = data.len(),
                output = bytes.len(),
                segments = archive.header().len(),
                "decompressed"
            );
            bytes
        }
    };

    let out = io::stdout();
    let mut out = out.lock();
    out.write_all(&output)?;
    out.flush()?;
    Ok(())
}

struct Flags {
    input: Input,
    operation: Operation,
    segments: usize,
    strategy: Strategy,
}

#[derive(Debug)]
enum Input {
    File(PathBuf),
    Stdin,
}

#[derive(Debug)]
enum Operation {
    Encode,
    Decode,
}

fn command() -> clap::Command {
    clap::Command::new("lzw")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compress data into, or restore it from, a segmented LZW archive")
        .arg(
            Arg::new("decode")
                .short('d')
                .long("decode")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("encode")
                .short('e')
                .long("encode")
                .action(ArgAction::SetTrue),
        )
        .group(
            ArgGroup::new("operation")
                .args(["decode", "encode"])
                .multiple(false)
                .required(true),
        )
        .arg(
            Arg::new("segments")
                .short('j')
                .long("segments")
                .help("Number of independently compressed segments")
                .default_value("1")
                .value_parser(RangedU64ValueParser::<usize>::new().range(1..=65536)),
        )
        .arg(
            Arg::new("strategy")
                .short('s')
                .long("strategy")
                .help("Dictionary lookup used while compressing")
                .default_value("hashed")
                .value_parser(["hashed", "scan"]),
        )
        .arg(
            Arg::new("file")
                .help("Input path, or '-' for stdin")
                .default_value("-")
                .value_parser(clap::value_parser!(PathBuf)),
        )
}

impl Flags {
    fn from_args(args: impl Iterator<Item = ffi::OsString>) -> Self {
        let matches = command().get_matches_from(args);

        let operation = if matches.get_flag("decode") {
            Operation::Decode
        } else {
            Operation::Encode
        };

        let segments = matches.get_one::<usize>("segments").copied().unwrap_or(1);

        let strategy = match matches.get_one::<String>("strategy").map(String::as_str) {
            Some("scan") => Strategy::Scan,
            Some("hashed") | None => Strategy::Hashed,
            Some(_) => unreachable!("unparsed strategy"),
        };

        let input = match matches.get_one::<PathBuf>("file") {
            None => Input::Stdin,
            Some(p) if *p == PathBuf::from("-") => Input::Stdin,
            Some(p) => Input::File(p.clone()),
        };

        Flags {
            input,
            operation,
            segments,
            strategy,
        }
    }
}

enum CodingResult {
    Ok,
    Err(anyhow::Error),
    Panic,
}

impl CodingResult {
    fn catch_panic(op: fn() -> anyhow::Result<()>) -> Self {
        std::panic::catch_unwind(|| match op() {
            Ok(()) => CodingResult::Ok,
            Err(err) => CodingResult::Err(err),
        })
        .unwrap_or(CodingResult::Panic)
    }
}

impl std::process::Termination for CodingResult {
    fn report(self) -> std::process::ExitCode {
        match self {
            CodingResult::Ok => std::process::ExitCode::SUCCESS,
            CodingResult::Err(err) => {
                eprintln!("lzw: {:#}", err);
                std::process::ExitCode::FAILURE
            }
            CodingResult::Panic => {
                eprintln!(
                    "The process failed irrecoverably! This should never happen and is a bug."
                );
                std::process::ExitCode::from(128)
            }
        }
    }
}
