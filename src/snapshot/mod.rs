//! Grid snapshots for reproducing or resuming a run.
//!
//! # File Format
//!
//! The `.evlf` format stores one generation as raw cell words:
//!
//! ```text
//! Header (32 bytes):
//!   Magic: "EVLF" (4 bytes)
//!   Version: u16
//!   Flags: u16 (compression)
//!   Width: u32
//!   Height: u32
//!   Tick: u64
//!   Reserved: 8 bytes
//!
//! Grid data:
//!   width * height little-endian u32 words, row-major
//!   Optionally LZ4 compressed
//! ```

mod format;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

pub use format::{CompressionType, SNAPSHOT_MAGIC, SNAPSHOT_VERSION, SnapshotHeader};
use format::{compress_lz4, decode_words, decompress_lz4, encode_words};

/// Immutable copy of one generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub width: usize,
    pub height: usize,
    pub tick: u64,
    /// Row-major cell words.
    pub words: Vec<u32>,
}

impl Snapshot {
    pub fn new(width: usize, height: usize, tick: u64, words: Vec<u32>) -> Self {
        debug_assert_eq!(words.len(), width * height);
        Self {
            width,
            height,
            tick,
            words,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u32 {
        self.words[y * self.width + x]
    }

    /// Write the snapshot, compressing the grid when `compression` asks for it.
    ///
    /// Without the `lz4` feature the grid is always stored raw.
    pub fn write_to<W: Write>(&self, w: &mut W, compression: CompressionType) -> io::Result<()> {
        let compression = if cfg!(feature = "lz4") {
            compression
        } else {
            CompressionType::None
        };
        let header = SnapshotHeader {
            width: dimension(self.width)?,
            height: dimension(self.height)?,
            tick: self.tick,
            compression,
        };
        header.write_to(w)?;

        let bytes = encode_words(&self.words);
        match compression {
            CompressionType::None => w.write_all(&bytes),
            CompressionType::Lz4 => w.write_all(&compress_lz4(&bytes)),
        }
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let header = SnapshotHeader::read_from(r)?;
        let expected_len = header.payload_len()?;

        // Nothing is sized from the header until the payload is in hand.
        let mut bytes = Vec::new();
        r.read_to_end(&mut bytes)?;
        if header.compression == CompressionType::Lz4 {
            bytes = decompress_lz4(&bytes, expected_len)?;
        }
        let words = decode_words(&bytes, expected_len)?;

        Ok(Self {
            width: header.width as usize,
            height: header.height as usize,
            tick: header.tick,
            words,
        })
    }

    /// Save to a file. Compressed when built with the `lz4` feature.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write_to(&mut writer, CompressionType::Lz4)?;
        writer.flush()?;
        log::debug!(
            "Saved {}x{} snapshot at tick {} to {}",
            self.width,
            self.height,
            self.tick,
            path.as_ref().display()
        );
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read_from(&mut reader)
    }
}

fn dimension(v: usize) -> io::Result<u32> {
    u32::try_from(v).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Grid dimension {} does not fit the snapshot header", v),
        )
    })
}
