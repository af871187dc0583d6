//! Roblox HTTP cache record decoding.
//!
//! Each file in the client's `http` cache directory holds one framed
//! record: a small fixed header, the origin link, the response status and
//! headers, and the response body.
//!
//! # Architecture
//!
//! * [`parser`]: decodes one frame from any [`std::io::Read`].
//! * [`record`]: the decoded [`CacheRecord`] and [`ParseFailure`] kinds.
//! * [`dedup`]: the run-scoped [`DedupSet`] that keeps one record per link.
//!
//! # Dedup invariant
//!
//! Within one [`DedupSet`] scope a link produces at most one successful
//! parse. The same resource is frequently cached under several file names,
//! and only the first copy encountered is extracted.

pub mod dedup;
pub mod parser;
pub mod record;

pub use dedup::DedupSet;
pub use parser::{parse_record, CacheRecordParser, MAGIC, REJECTED_STATUS_FLOOR};
pub use record::{CacheRecord, ParseFailure, RecordField};
