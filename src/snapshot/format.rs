//! Binary format definitions for EvoLife snapshot files.

use std::io::{self, Read, Write};

/// Magic bytes identifying an EvoLife snapshot file.
pub const SNAPSHOT_MAGIC: &[u8; 4] = b"EVLF";

/// Current format version.
pub const SNAPSHOT_VERSION: u16 = 1;

/// Compression type for the word array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum CompressionType {
    /// Raw little-endian words.
    #[default]
    None = 0,
    /// LZ4 fast compression.
    Lz4 = 1,
}

impl CompressionType {
    pub fn from_u16(v: u16) -> Option<Self> {
        match v & 0x0F {
            0 => Some(CompressionType::None),
            1 => Some(CompressionType::Lz4),
            _ => None,
        }
    }
}

/// File header for EvoLife snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub width: u32,
    pub height: u32,
    /// Generation the grid belongs to.
    pub tick: u64,
    pub compression: CompressionType,
}

impl SnapshotHeader {
    /// Magic(4) + Version(2) + Flags(2) + Width(4) + Height(4) + Tick(8) + Reserved(8) = 32
    pub const SIZE: usize = 32;

    /// Number of cells in the grid, `None` if it cannot be addressed.
    pub fn cell_count(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }

    /// Size of the uncompressed word array in bytes.
    pub fn payload_len(&self) -> io::Result<usize> {
        self.cell_count()
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("EVLF grid {}x{} is too large", self.width, self.height),
                )
            })
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(SNAPSHOT_MAGIC)?;
        w.write_all(&SNAPSHOT_VERSION.to_le_bytes())?;
        w.write_all(&(self.compression as u16).to_le_bytes())?;
        w.write_all(&self.width.to_le_bytes())?;
        w.write_all(&self.height.to_le_bytes())?;
        w.write_all(&self.tick.to_le_bytes())?;
        // Reserved bytes
        w.write_all(&[0u8; 8])?;
        Ok(())
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if &magic != SNAPSHOT_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Invalid EVLF magic bytes",
            ));
        }

        let mut buf2 = [0u8; 2];
        let mut buf4 = [0u8; 4];
        let mut buf8 = [0u8; 8];

        r.read_exact(&mut buf2)?;
        let version = u16::from_le_bytes(buf2);
        if version != SNAPSHOT_VERSION {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unsupported EVLF version: {}", version),
            ));
        }

        r.read_exact(&mut buf2)?;
        let compression = CompressionType::from_u16(u16::from_le_bytes(buf2)).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidData, "Unknown EVLF compression")
        })?;

        r.read_exact(&mut buf4)?;
        let width = u32::from_le_bytes(buf4);

        r.read_exact(&mut buf4)?;
        let height = u32::from_le_bytes(buf4);

        r.read_exact(&mut buf8)?;
        let tick = u64::from_le_bytes(buf8);

        // Skip reserved bytes
        r.read_exact(&mut buf8)?;

        Ok(Self {
            width,
            height,
            tick,
            compression,
        })
    }
}

/// Encode words as little-endian bytes.
pub fn encode_words(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

/// Decode exactly `expected_len` little-endian bytes into words.
pub fn decode_words(bytes: &[u8], expected_len: usize) -> io::Result<Vec<u32>> {
    if bytes.len() != expected_len {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "Grid size mismatch: {} bytes, header expects {}",
                bytes.len(),
                expected_len
            ),
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// Compress data using LZ4.
#[cfg(feature = "lz4")]
pub fn compress_lz4(data: &[u8]) -> Vec<u8> {
    lz4_flex::compress_prepend_size(data)
}

/// Decompress LZ4 data whose prepended size must equal `expected_len`.
#[cfg(feature = "lz4")]
pub fn decompress_lz4(data: &[u8], expected_len: usize) -> io::Result<Vec<u8>> {
    let declared = data
        .get(..4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]) as usize);
    if declared != Some(expected_len) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "LZ4 block size does not match the EVLF header",
        ));
    }
    lz4_flex::decompress_size_prepended(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Fallback when LZ4 is not available. Never selected by `Snapshot::write_to`.
#[cfg(not(feature = "lz4"))]
pub fn compress_lz4(data: &[u8]) -> Vec<u8> {
    data.to_vec()
}

#[cfg(not(feature = "lz4"))]
pub fn decompress_lz4(_data: &[u8], _expected_len: usize) -> io::Result<Vec<u8>> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "Snapshot is LZ4-compressed; rebuild with the `lz4` feature",
    ))
}
