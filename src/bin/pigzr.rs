//! Command-line driver for `pigzr`.
//!
//! This binary is the "external collaborator" named but left out of
//! scope by the core pipeline's design: argument parsing, file
//! open/close and suffix handling, and the `-1`..`-9` compression-level
//! shorthand that `clap` expands for us. The core itself only ever sees
//! `(input, output, Options)`.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use pigzr::{compress, decompress, Options, PigzError};

/// A parallel gzip-format compressor.
#[derive(Parser, Debug)]
#[command(name = "pigzr", version, about, long_about = None)]
struct Cli {
    /// Files to process. With none given, reads standard input.
    files: Vec<PathBuf>,

    /// Write to standard output, keep original files unchanged.
    #[arg(short = 'c', long = "stdout")]
    stdout: bool,

    /// Keep (don't delete) input files after processing.
    #[arg(short = 'k', long = "keep")]
    keep: bool,

    /// Force overwrite of output files and compression of symbolic links.
    #[arg(short = 'f', long = "force")]
    force: bool,

    /// Decompress instead of compress.
    #[arg(short = 'd', long = "decompress")]
    decompress: bool,

    /// Block size in 128-byte units. The core always receives plain
    /// bytes; this flag is converted before building `Options`.
    #[arg(short = 'b', long = "blocksize", value_name = "N")]
    block_size: Option<usize>,

    /// Suffix to use on compressed files.
    #[arg(short = 'S', long = "suffix", default_value = ".gz")]
    suffix: String,

    /// Number of compression worker threads. Defaults to the number of
    /// available cores.
    #[arg(short = 'p', long = "processes")]
    workers: Option<usize>,

    /// Display the software license.
    #[arg(short = 'L', long = "license")]
    license: bool,

    /// Suppress warnings.
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Report the percentage reduction for each file processed.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// Compression level 1 (fastest) through 9 (best).
    #[arg(short = '1', long = "fast", overrides_with_all = ["fast", "best"])]
    fast: bool,
    #[arg(short = '9', long = "best", overrides_with_all = ["fast", "best"])]
    best: bool,
    #[arg(long = "level", hide = true, value_parser = clap::value_parser!(u8).range(1..=9))]
    explicit_level: Option<u8>,
}

const LICENSE_TEXT: &str = "pigzr is distributed under the terms of the MIT license.";

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.license {
        println!("{LICENSE_TEXT}");
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("pigzr: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), PigzError> {
    let level = resolve_level(cli);

    if cli.files.is_empty() {
        let stdin = io::stdin();
        let stdout = io::stdout();
        return run_one_named(cli, level, stdin.lock(), stdout.lock(), None);
    }

    for path in &cli.files {
        process_file(cli, level, path)?;
    }
    Ok(())
}

fn resolve_level(cli: &Cli) -> u8 {
    if let Some(level) = cli.explicit_level {
        level
    } else if cli.fast {
        1
    } else if cli.best {
        9
    } else {
        pigzr::options::DEFAULT_LEVEL
    }
}

fn process_file(cli: &Cli, level: u8, path: &Path) -> Result<(), PigzError> {
    if cli.decompress {
        let input = File::open(path)?;
        if cli.stdout {
            return run_one_named(cli, level, input, io::stdout().lock(), None);
        }
        let out_path = output_path_for_decompress(path, &cli.suffix);
        let output = File::create(&out_path)?;
        run_one_named(cli, level, input, output, None)?;
        if !cli.keep {
            std::fs::remove_file(path)?;
        }
        Ok(())
    } else {
        let input = File::open(path)?;
        let name = path.file_name().and_then(|n| n.to_str()).map(|s| s.to_string());
        if cli.stdout {
            return run_one_named(cli, level, input, io::stdout().lock(), name);
        }
        let out_path = output_path_for_compress(path, &cli.suffix);
        let output = File::create(&out_path)?;
        run_one_named(cli, level, input, output, name)?;
        if !cli.keep {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

fn run_one_named<R: Read, W: Write>(
    cli: &Cli,
    level: u8,
    mut input: R,
    mut output: W,
    name: Option<String>,
) -> Result<(), PigzError> {
    if cli.decompress {
        decompress(&mut input, &mut output)?;
        return Ok(());
    }

    let mut builder = Options::builder().level(level)?;
    if let Some(block_size) = cli.block_size {
        builder = builder.block_size(block_size * 128)?;
    }
    if let Some(workers) = cli.workers {
        builder = builder.workers(workers)?;
    }
    if let Some(name) = name {
        builder = builder.name(name);
    }
    let options = builder.build();

    let ulen = compress(&options, &mut input, &mut output)?;
    if cli.verbose && !cli.quiet {
        eprintln!("{ulen} bytes in");
    }
    Ok(())
}

fn output_path_for_compress(path: &Path, suffix: &str) -> PathBuf {
    let mut out = path.as_os_str().to_owned();
    out.push(suffix);
    PathBuf::from(out)
}

fn output_path_for_decompress(path: &Path, suffix: &str) -> PathBuf {
    match path.to_str() {
        Some(s) if s.ends_with(suffix) => PathBuf::from(&s[..s.len() - suffix.len()]),
        _ => path.with_extension(""),
    }
}
