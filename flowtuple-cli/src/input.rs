//! Opening flowtuple files, plain or gzip-compressed.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use clap::ValueEnum;
use flate2::bufread::MultiGzDecoder;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Compression {
    /// Detect gzip from the first bytes of the file.
    Auto,
    Gzip,
    None,
}

impl FromStr for Compression {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Compression::Auto),
            "gzip" => Ok(Compression::Gzip),
            "none" => Ok(Compression::None),
            other => Err(anyhow!("unknown compression mode '{other}'")),
        }
    }
}

pub type Input = Box<dyn Read + Send>;

/// Opens `path` for decoding.
pub fn open_input(path: &Path, compression: Compression, buffer_size: usize) -> anyhow::Result<Input> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    wrap(BufReader::with_capacity(buffer_size, file), compression, buffer_size)
        .with_context(|| format!("reading {}", path.display()))
}

/// Puts a gzip decoder in front of `reader` when needed.
pub fn wrap<R>(mut reader: R, compression: Compression, buffer_size: usize) -> io::Result<Input>
where
    R: BufRead + Send + 'static,
{
    let gzip = match compression {
        Compression::Gzip => true,
        Compression::None => false,
        Compression::Auto => reader.fill_buf()?.starts_with(&GZIP_MAGIC),
    };

    if gzip {
        tracing::debug!("reading gzip-compressed input");
        let decoder = MultiGzDecoder::new(reader);
        Ok(Box::new(BufReader::with_capacity(buffer_size, decoder)))
    } else {
        Ok(Box::new(reader))
    }
}
