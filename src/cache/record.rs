//! Parsed cache records and the ways a parse can fail.

use std::fmt;

/// A single decoded cache entry: where it came from and the cached body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRecord {
    /// Origin URL of the cached response. May be empty.
    pub link: String,
    /// Raw response body, exactly `contentLen` bytes.
    pub payload: Vec<u8>,
}

impl CacheRecord {
    /// Create a new record.
    #[must_use]
    pub fn new(link: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            link: link.into(),
            payload,
        }
    }

    /// Final `/`-separated segment of the link, if non-empty.
    #[must_use]
    pub fn link_tail(&self) -> Option<&str> {
        self.link.rsplit('/').next().filter(|s| !s.is_empty())
    }
}

/// Frame field being read when a record ran out of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Magic,
    HeaderSize,
    LinkLength,
    Link,
    ReservedByte,
    Status,
    HeaderLength,
    ContentDigest,
    ContentLength,
    HeaderBlock,
    Payload,
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Magic => "magic",
            Self::HeaderSize => "header size",
            Self::LinkLength => "link length",
            Self::Link => "link",
            Self::ReservedByte => "reserved byte",
            Self::Status => "status",
            Self::HeaderLength => "header length",
            Self::ContentDigest => "content digest",
            Self::ContentLength => "content length",
            Self::HeaderBlock => "header block",
            Self::Payload => "payload",
        };
        f.write_str(name)
    }
}

/// Reasons a byte stream yielded no record.
///
/// None of these are fatal to a run: each one means "skip this input".
#[derive(thiserror::Error, Debug)]
pub enum ParseFailure {
    /// The stream does not start with the `RBXH` tag.
    #[error("not a cache record (magic {magic:?})")]
    NotACacheRecord {
        /// The four bytes found instead, lossily decoded.
        magic: String,
    },

    /// The stream ended before a field was fully read.
    #[error("record truncated while reading {field}")]
    Truncated {
        /// Field that could not be read in full.
        field: RecordField,
    },

    /// A record with this link was already accepted earlier in the run.
    #[error("duplicate link: {link}")]
    DuplicateLink {
        /// The repeated link.
        link: String,
    },

    /// The cached response was not a success (status >= 300).
    #[error("rejected status {status}")]
    RejectedStatus {
        /// HTTP status stored in the record.
        status: u32,
    },

    /// The underlying reader failed for a reason other than end of stream.
    #[error("I/O error while reading {field}: {source}")]
    Io {
        /// Field being read.
        field: RecordField,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ParseFailure {
    /// Map an I/O error from reading `field`; end of stream becomes [`Self::Truncated`].
    pub(crate) fn from_io(field: RecordField, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::UnexpectedEof {
            Self::Truncated { field }
        } else {
            Self::Io {
                field,
                source: error,
            }
        }
    }

    /// Short machine-friendly name of the failure kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotACacheRecord { .. } => "not_a_cache_record",
            Self::Truncated { .. } => "truncated",
            Self::DuplicateLink { .. } => "duplicate_link",
            Self::RejectedStatus { .. } => "rejected_status",
            Self::Io { .. } => "io",
        }
    }
}
