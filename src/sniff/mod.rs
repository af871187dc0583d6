//! Content sniffing: classify a payload by its leading bytes.
//!
//! Cached bodies carry no file name and the stored headers are not
//! consulted, so the only evidence is the first few bytes of the payload.
//! [`identify`] looks at a window of at most [`SNIFF_WINDOW`] bytes and
//! applies a fixed list of signature rules, first match wins:
//!
//! 1. starts with `OggS` -> OGG
//! 2. contains `<roblox!` -> RBXM
//! 3. contains `PNG\r\n` -> PNG
//! 4. starts with `GIF87a` / `GIF89a` -> GIF
//! 5. contains `JFIF` or `Exif` -> JFIF
//! 6. starts with `ID3`, or MPEG frame sync in the first two bytes -> MP3
//! 7. starts with `RIFF` and contains `WEBP` -> WebP
//!
//! The frame-sync check in rule 6 (`0xFF` followed by a byte with the top
//! three bits set) matches plenty of arbitrary binary data. It is kept as
//! is; callers that only extract OGG are unaffected by it.
//!
//! # Example
//!
//! ```
//! use bloxdump::sniff::{identify, MediaFormat};
//!
//! let class = identify(b"OggS\x00\x02rest-of-page");
//! assert_eq!(class.format(), Some(&MediaFormat::OGG));
//! ```

pub mod format;

use memchr::memmem;

pub use format::{Category, MediaFormat};

/// Maximum number of leading bytes inspected.
pub const SNIFF_WINDOW: usize = 48;

/// Result of sniffing a payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// No rule matched. Holds the inspected window for diagnostics.
    Unclassified {
        /// Leading bytes that were inspected.
        window: Vec<u8>,
    },
    /// Recognised but deliberately not extracted.
    Ignored,
    /// A recognised format that is written out as is.
    NonConvertible(MediaFormat),
}

impl Classification {
    /// The recognised format, if any.
    #[must_use]
    pub fn format(&self) -> Option<&MediaFormat> {
        match self {
            Self::NonConvertible(format) => Some(format),
            Self::Unclassified { .. } | Self::Ignored => None,
        }
    }

    /// Printable rendering of the inspected window, for debug logs.
    #[must_use]
    pub fn window_preview(&self) -> Option<String> {
        match self {
            Self::Unclassified { window } => Some(window.escape_ascii().to_string()),
            _ => None,
        }
    }
}

/// Classify `payload` by its leading bytes.
///
/// Pure: the same input always yields the same classification.
#[must_use]
pub fn identify(payload: &[u8]) -> Classification {
    if payload.is_empty() {
        return Classification::Unclassified { window: Vec::new() };
    }

    let window = &payload[..payload.len().min(SNIFF_WINDOW)];

    let format = if window.starts_with(b"OggS") {
        MediaFormat::OGG
    } else if contains(window, b"<roblox!") {
        MediaFormat::RBXM
    } else if contains(window, b"PNG\r\n") {
        MediaFormat::PNG
    } else if window.starts_with(b"GIF87a") || window.starts_with(b"GIF89a") {
        MediaFormat::GIF
    } else if contains(window, b"JFIF") || contains(window, b"Exif") {
        MediaFormat::JFIF
    } else if window.starts_with(b"ID3") || has_mpeg_frame_sync(payload) {
        MediaFormat::MP3
    } else if window.starts_with(b"RIFF") && contains(window, b"WEBP") {
        MediaFormat::WEBP
    } else {
        return Classification::Unclassified {
            window: window.to_vec(),
        };
    };

    Classification::NonConvertible(format)
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    memmem::find(haystack, needle).is_some()
}

fn has_mpeg_frame_sync(payload: &[u8]) -> bool {
    payload.len() > 2 && payload[0] == 0xFF && payload[1] & 0xE0 == 0xE0
}
