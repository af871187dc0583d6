//! Decoder for a single `RBXH` framed cache record.
//!
//! # Frame layout
//!
//! All integers are unsigned little-endian.
//!
//! | size          | field                                   |
//! |---------------|-----------------------------------------|
//! | 4             | magic, `RBXH`                           |
//! | 4             | header size (ignored)                   |
//! | 4             | link length `L`                         |
//! | `L`           | link                                    |
//! | 1             | reserved byte                           |
//! | 4             | HTTP status                             |
//! | 4             | header block length `H`                 |
//! | 4             | content digest (ignored)                |
//! | 4             | content length `C`                      |
//! | 8 + `H`       | digest, reserved, raw headers (ignored) |
//! | `C`           | payload                                 |
//!
//! # Example
//!
//! ```no_run
//! use bloxdump::cache::CacheRecordParser;
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! let mut parser = CacheRecordParser::new();
//! let file = File::open("cache/0a1b2c").unwrap();
//! match parser.parse(BufReader::new(file)) {
//!     Ok(record) => println!("{}: {} bytes", record.link, record.payload.len()),
//!     Err(reason) => println!("skipped: {}", reason),
//! }
//! ```

use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use super::dedup::DedupSet;
use super::record::{CacheRecord, ParseFailure, RecordField};

/// Tag every cache record starts with.
pub const MAGIC: &[u8; 4] = b"RBXH";

/// Records with a status at or above this are not extracted.
pub const REJECTED_STATUS_FLOOR: u32 = 300;

/// Size of the content digest between header length and content length.
const CONTENT_DIGEST_SIZE: u64 = 4;

/// Second digest plus reserved bytes that precede the raw header block.
const PRE_HEADER_SKIP: u64 = 8;

/// Stateful cache record parser.
///
/// Owns the run's [`DedupSet`]: once a link has produced a record, later
/// records carrying the same link fail with [`ParseFailure::DuplicateLink`].
#[derive(Debug, Default)]
pub struct CacheRecordParser {
    known_links: DedupSet,
}

impl CacheRecordParser {
    /// Create a parser with an empty dedup scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser continuing an existing dedup scope.
    #[must_use]
    pub fn with_dedup(known_links: DedupSet) -> Self {
        Self { known_links }
    }

    /// Links accepted so far.
    #[must_use]
    pub fn known_links(&self) -> &DedupSet {
        &self.known_links
    }

    /// Give back the dedup scope.
    #[must_use]
    pub fn into_known_links(self) -> DedupSet {
        self.known_links
    }

    /// Decode one record from `reader`.
    ///
    /// On failure the reader is left at an unspecified position and should
    /// not be reused for another record.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseFailure`] describing why the input yields no record.
    pub fn parse<R: Read>(&mut self, mut reader: R) -> Result<CacheRecord, ParseFailure> {
        parse_record(&mut reader, &mut self.known_links)
    }
}

/// Decode one record from `reader`, checking and updating `known_links`.
///
/// The link is only added to `known_links` when the whole record, payload
/// included, was read successfully.
///
/// # Errors
///
/// Returns a [`ParseFailure`] describing why the input yields no record.
pub fn parse_record<R: Read>(
    reader: &mut R,
    known_links: &mut DedupSet,
) -> Result<CacheRecord, ParseFailure> {
    let mut magic = [0u8; 4];
    reader
        .read_exact(&mut magic)
        .map_err(|e| ParseFailure::from_io(RecordField::Magic, e))?;
    if &magic != MAGIC {
        return Err(ParseFailure::NotACacheRecord {
            magic: String::from_utf8_lossy(&magic).into_owned(),
        });
    }

    read_u32(reader, RecordField::HeaderSize)?;

    let link_len = read_u32(reader, RecordField::LinkLength)?;
    let link = read_bytes(reader, u64::from(link_len), RecordField::Link)?;
    let link = String::from_utf8_lossy(&link).into_owned();

    if known_links.contains(&link) {
        return Err(ParseFailure::DuplicateLink { link });
    }

    reader
        .read_u8()
        .map_err(|e| ParseFailure::from_io(RecordField::ReservedByte, e))?;

    let status = read_u32(reader, RecordField::Status)?;
    if status >= REJECTED_STATUS_FLOOR {
        return Err(ParseFailure::RejectedStatus { status });
    }

    let header_len = read_u32(reader, RecordField::HeaderLength)?;
    skip(reader, CONTENT_DIGEST_SIZE, RecordField::ContentDigest)?;
    let content_len = read_u32(reader, RecordField::ContentLength)?;
    skip(
        reader,
        PRE_HEADER_SKIP + u64::from(header_len),
        RecordField::HeaderBlock,
    )?;

    let payload = read_bytes(reader, u64::from(content_len), RecordField::Payload)?;

    known_links.insert(link.clone());
    Ok(CacheRecord { link, payload })
}

fn read_u32<R: Read>(reader: &mut R, field: RecordField) -> Result<u32, ParseFailure> {
    reader
        .read_u32::<LittleEndian>()
        .map_err(|e| ParseFailure::from_io(field, e))
}

/// Read exactly `len` bytes. The buffer grows with the data actually read,
/// so a corrupt length cannot trigger a huge allocation up front.
fn read_bytes<R: Read>(reader: &mut R, len: u64, field: RecordField) -> Result<Vec<u8>, ParseFailure> {
    let mut buf = Vec::new();
    reader
        .by_ref()
        .take(len)
        .read_to_end(&mut buf)
        .map_err(|e| ParseFailure::from_io(field, e))?;
    if (buf.len() as u64) < len {
        return Err(ParseFailure::Truncated { field });
    }
    Ok(buf)
}

fn skip<R: Read>(reader: &mut R, len: u64, field: RecordField) -> Result<(), ParseFailure> {
    let skipped = io::copy(&mut reader.by_ref().take(len), &mut io::sink())
        .map_err(|e| ParseFailure::from_io(field, e))?;
    if skipped < len {
        return Err(ParseFailure::Truncated { field });
    }
    Ok(())
}
