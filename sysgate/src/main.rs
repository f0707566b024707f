// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Gustavo Noronha Silva <gustavo@noronha.dev.br>

use std::{
    ffi::CString,
    os::unix::ffi::OsStrExt as _,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use log::debug;
use sysgate::{
    files::COPY_CHUNK_SIZE,
    sinks::LogMode,
    trampoline::architecture_info,
    RawFs, LOG_TAG,
};
use sysgate_common::kernel_types::Stat;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Where log lines go. Defaults to $SYSGATE_LOG_MODE, then `stdio`.
    #[arg(long = "log-mode", value_enum)]
    log_mode: Option<LogMode>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Describe the syscall convention this build uses
    Arch,
    /// Print a file to stdout
    Cat { path: PathBuf },
    /// Create or truncate a file and write text to it
    Write {
        path: PathBuf,
        text: String,
        /// Permission bits for a newly created file, in octal
        #[arg(long, default_value = "644", value_parser = parse_mode)]
        mode: u32,
    },
    /// Copy a file
    Copy { src: PathBuf, dst: PathBuf },
    /// Show size and permission bits
    Stat { path: PathBuf },
    /// Exit with 0 if the path exists, 1 otherwise
    Exists { path: PathBuf },
    /// Print the size of a file in bytes, 0 if it cannot be stat'ed
    Size { path: PathBuf },
    /// Create a directory
    Mkdir {
        path: PathBuf,
        /// Permission bits, in octal
        #[arg(long, default_value = "755", value_parser = parse_mode)]
        mode: u32,
    },
    /// Remove a file
    Rm { path: PathBuf },
}

fn parse_mode(value: &str) -> Result<u32, String> {
    let digits = value.strip_prefix("0o").unwrap_or(value);
    match u32::from_str_radix(digits, 8) {
        Ok(mode) if mode <= 0o7777 => Ok(mode),
        _ => Err(format!("{value} is not an octal permission mode")),
    }
}

fn c_path(path: &Path) -> Result<CString> {
    CString::new(path.as_os_str().as_bytes())
        .map_err(|_| anyhow!("path {} contains a NUL byte", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mode = args
        .log_mode
        .or_else(LogMode::from_env)
        .unwrap_or_default();
    debug!("logging through {mode}");

    let fs = RawFs::new(mode.logger(LOG_TAG));

    run(&fs, args.command)
}

fn run(fs: &RawFs, command: Command) -> Result<()> {
    match command {
        Command::Arch => architecture_info(fs.logger()),
        Command::Cat { path } => cat(fs, &c_path(&path)?)?,
        Command::Write { path, text, mode } => {
            let path = c_path(&path)?;
            let fd = fs.open(&path, libc::O_CREAT | libc::O_WRONLY | libc::O_TRUNC, mode);
            if fd < 0 {
                bail!("could not open {}", path.to_string_lossy());
            }
            let written = write_all(fs, fd, text.as_bytes());
            fs.close(fd);
            written?;
        }
        Command::Copy { src, dst } => {
            if fs.copy_file(&c_path(&src)?, &c_path(&dst)?) != 0 {
                bail!("copying {} to {} failed", src.display(), dst.display());
            }
        }
        Command::Stat { path } => {
            let mut stat = Stat::default();
            if fs.stat(&c_path(&path)?, &mut stat) != 0 {
                bail!("could not stat {}", path.display());
            }
            println!("size: {} bytes", stat.st_size);
            println!("mode: {:o}", stat.permissions());
        }
        Command::Exists { path } => {
            if !fs.file_exists(&c_path(&path)?) {
                std::process::exit(1);
            }
        }
        Command::Size { path } => println!("{}", fs.file_size(&c_path(&path)?)),
        Command::Mkdir { path, mode } => {
            if fs.mkdir(&c_path(&path)?, mode) != 0 {
                bail!("could not create directory {}", path.display());
            }
        }
        Command::Rm { path } => {
            if fs.unlink(&c_path(&path)?) != 0 {
                bail!("could not remove {}", path.display());
            }
        }
    }

    Ok(())
}

fn cat(fs: &RawFs, path: &CString) -> Result<()> {
    let fd = fs.open(path, libc::O_RDONLY, 0);
    if fd < 0 {
        bail!("could not open {}", path.to_string_lossy());
    }

    let mut buffer = [0u8; COPY_CHUNK_SIZE];
    let result = loop {
        let bytes_read = fs.read(fd, &mut buffer);
        if bytes_read < 0 {
            break Err(anyhow!("reading {} failed", path.to_string_lossy()));
        }
        if bytes_read == 0 {
            break Ok(());
        }
        if let Err(e) = write_all(fs, libc::STDOUT_FILENO, &buffer[..bytes_read as usize]) {
            break Err(e);
        }
    };

    fs.close(fd);
    result
}

/// The wrappers never retry short writes, so loop here until everything is out.
fn write_all(fs: &RawFs, fd: i32, mut data: &[u8]) -> Result<()> {
    while !data.is_empty() {
        let written = fs.write(fd, data);
        if written <= 0 {
            bail!("write to fd {fd} failed");
        }
        data = &data[written as usize..];
    }
    Ok(())
}
