use anyhow::{bail, Context};
use blake2b_portable::{HashContext, Input, Params, OUTBYTES};
use clap::Parser;
use std::convert::TryFrom;
use std::ffi::OsString;
use std::fs::File;
use std::io;
use std::io::prelude::*;
use std::path::{Path, PathBuf};
use std::process::exit;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
struct Args {
    /// Any number of filepaths, or empty for standard input.
    inputs: Vec<PathBuf>,

    #[arg(long = "text")]
    /// Hash the UTF-8 bytes of this string instead of reading input. May be repeated.
    text: Vec<OsString>,

    #[arg(long = "mmap")]
    /// Read input files with memory mapping.
    mmap: bool,

    #[arg(long = "length", default_value_t = OUTBYTES)]
    /// Set the length of the output in bytes, from 1 to 64.
    length: usize,

    #[arg(long = "key")]
    /// Set the key parameter with a hex string of 1 to 64 bytes.
    key: Option<String>,
}

fn read_write_all<R: Read>(mut reader: R, state: &mut HashContext) -> anyhow::Result<()> {
    // Why not just use std::io::copy? Because it uses an 8192 byte buffer, and
    // using a larger buffer is measurably faster. 32768 (2^15) is just what
    // coreutils uses.
    let mut buf = [0; 32768];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return Ok(()),
            Ok(n) => {
                state.update(&buf[..n])?;
            }
            Err(e) => {
                if e.kind() != io::ErrorKind::Interrupted {
                    return Err(e.into());
                }
            }
        }
    }
}

fn make_params(args: &Args) -> anyhow::Result<Params> {
    if !args.text.is_empty() && !args.inputs.is_empty() {
        bail!("--text and input files can't be used together");
    }
    if !args.text.is_empty() && args.mmap {
        bail!("--mmap not supported with --text");
    }
    let mut params = Params::new();
    params.hash_length(args.length);
    if let Some(ref key) = args.key {
        let key_bytes = hex::decode(key).context("--key is not valid hex")?;
        params.key(&key_bytes);
    }
    // Surface bad parameters once, before touching any input.
    params.to_state()?;
    Ok(params)
}

fn hash_text(params: &Params, text: &OsString) -> anyhow::Result<String> {
    let input = Input::try_from(text.as_os_str())?;
    let mut state = params.to_state()?;
    state.update(blake2b_portable::bytes::normalize(input))?;
    Ok(state.finalize()?.to_hex().to_string())
}

fn hash_file(args: &Args, params: &Params, path: &Path) -> anyhow::Result<String> {
    let mut state = params.to_state()?;
    let mut file = File::open(path)?;
    if args.mmap {
        let mmap = unsafe { memmap2::Mmap::map(&file)? };
        state.update(&mmap)?;
    } else {
        read_write_all(&mut file, &mut state)?;
    }
    Ok(state.finalize()?.to_hex().to_string())
}

fn hash_stdin(args: &Args, params: &Params) -> anyhow::Result<String> {
    if args.mmap {
        bail!("--mmap not supported for stdin");
    }
    let mut state = params.to_state()?;
    read_write_all(std::io::stdin().lock(), &mut state)?;
    Ok(state.finalize()?.to_hex().to_string())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let params = match make_params(&args) {
        Ok(params) => params,
        Err(e) => {
            eprintln!("blake2: {:#}", e);
            exit(1);
        }
    };

    let mut failed = false;
    if !args.text.is_empty() {
        for text in &args.text {
            match hash_text(&params, text) {
                Ok(hash) => println!("{}", hash),
                Err(e) => {
                    eprintln!("blake2: {}: {:#}", text.to_string_lossy(), e);
                    failed = true;
                }
            }
        }
    } else if args.inputs.is_empty() {
        match hash_stdin(&args, &params) {
            Ok(hash) => println!("{}", hash),
            Err(e) => {
                eprintln!("blake2: stdin: {:#}", e);
                failed = true;
            }
        }
    } else {
        for input in &args.inputs {
            match hash_file(&args, &params, input) {
                Ok(hash) => {
                    if args.inputs.len() > 1 {
                        println!("{}  {}", hash, input.to_string_lossy());
                    } else {
                        println!("{}", hash);
                    }
                }
                Err(e) => {
                    eprintln!("blake2: {}: {:#}", input.to_string_lossy(), e);
                    failed = true;
                }
            }
        }
    }
    if failed {
        exit(1);
    }
}
