//! Extraction pipeline: walk -> parse -> sniff -> write.
//!
//! # Overview
//!
//! [`Extractor`] drives the two core stages over every file the
//! [`Walker`] yields:
//!
//! 1. [`CacheRecordParser`] decodes the file into a record (or a reason to
//!    skip it).
//! 2. [`identify`] classifies the payload.
//!
//! Payloads whose format is one of the configured targets (OGG by default)
//! are written to `<output_dir>/<category>/<name>.<ext>`.
//!
//! Per-file problems never stop a run. Only a failure to enumerate the
//! cache directory does, surfacing as [`ExtractError::DirectoryWalk`].
//!
//! # Example
//!
//! ```no_run
//! use bloxdump::extract::Extractor;
//! use bloxdump::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/path/to/Roblox/http"), WalkerConfig::default());
//! let mut extractor = Extractor::new(Path::new("./output"));
//! let summary = extractor.run(&walker).unwrap();
//! println!("{}", summary.render_text());
//! ```

pub mod naming;
pub mod summary;
pub mod writer;

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cache::{CacheRecordParser, ParseFailure};
use crate::logging::{LogFacadeSink, LogSink};
use crate::progress::{ProgressCallback, SCAN_PHASE};
use crate::scanner::{ScanError, Walker};
use crate::sniff::{identify, Classification, MediaFormat};

pub use naming::{output_file_name, output_path};
pub use summary::ExtractSummary;
pub use writer::write_atomic;

/// Errors surfaced by the extraction pipeline.
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    /// The cache directory could not be enumerated. Aborts the run.
    #[error("Failed to walk cache directory {path}: {source}")]
    DirectoryWalk {
        /// Root of the walk
        path: PathBuf,
        /// The underlying scan error
        #[source]
        source: ScanError,
    },

    /// A payload could not be written. The run continues.
    #[error("Failed to write {path}: {source}")]
    FileWrite {
        /// Destination that was being written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// What happened to one cache file.
#[derive(Debug)]
pub enum FileOutcome {
    /// The payload was written to `path`.
    Extracted {
        /// Destination file
        path: PathBuf,
        /// Detected format
        format: MediaFormat,
        /// Payload size
        bytes: u64,
    },
    /// The file yielded no record.
    Rejected(ParseFailure),
    /// The file could not be opened.
    Unreadable(io::Error),
    /// The payload matched no signature.
    Unclassified,
    /// The payload was recognised and deliberately skipped.
    Ignored,
    /// The payload's format is not one of the targets.
    NotTargeted(MediaFormat),
    /// The payload was a target but writing it failed.
    WriteFailed(ExtractError),
}

impl FileOutcome {
    /// Whether a file was written.
    #[must_use]
    pub fn is_extracted(&self) -> bool {
        matches!(self, Self::Extracted { .. })
    }
}

/// Cache extractor.
///
/// Owns the record parser, and with it the dedup scope: a link extracted
/// once is not extracted again by the same extractor.
pub struct Extractor<S: LogSink = LogFacadeSink> {
    output_dir: PathBuf,
    targets: Vec<MediaFormat>,
    parser: CacheRecordParser,
    sink: S,
    progress: Option<Arc<dyn ProgressCallback>>,
    summary: ExtractSummary,
}

impl Extractor<LogFacadeSink> {
    /// Create an extractor writing under `output_dir`, extracting OGG only
    /// and logging through the `log` facade.
    #[must_use]
    pub fn new(output_dir: &Path) -> Self {
        Self::with_sink(output_dir, LogFacadeSink)
    }
}

impl<S: LogSink> Extractor<S> {
    /// Create an extractor reporting through `sink`.
    #[must_use]
    pub fn with_sink(output_dir: &Path, sink: S) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            targets: vec![MediaFormat::OGG],
            parser: CacheRecordParser::new(),
            sink,
            progress: None,
            summary: ExtractSummary::default(),
        }
    }

    /// Replace the set of formats that get written out.
    #[must_use]
    pub fn with_targets(mut self, targets: Vec<MediaFormat>) -> Self {
        self.targets = targets;
        self
    }

    /// Use `parser`, and its dedup scope, instead of a fresh one.
    #[must_use]
    pub fn with_parser(mut self, parser: CacheRecordParser) -> Self {
        self.parser = parser;
        self
    }

    /// Report progress to `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Formats currently extracted.
    #[must_use]
    pub fn targets(&self) -> &[MediaFormat] {
        &self.targets
    }

    /// Counters so far.
    #[must_use]
    pub fn summary(&self) -> &ExtractSummary {
        &self.summary
    }

    /// The parser, for inspecting the dedup scope.
    #[must_use]
    pub fn parser(&self) -> &CacheRecordParser {
        &self.parser
    }

    /// Process every file under the walker's root.
    ///
    /// Counters start from zero on every run. The dedup scope carries over,
    /// so a second run over the same tree extracts nothing new.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::DirectoryWalk`] on the first walk error.
    /// Files processed before that point stay extracted.
    pub fn run(&mut self, walker: &Walker) -> Result<ExtractSummary, ExtractError> {
        let root = walker.root().to_path_buf();
        self.summary = ExtractSummary::default();
        self.sink
            .info(&format!("Scanning cache directory: {}", root.display()));
        self.sink
            .info(&format!("Output directory: {}", self.output_dir.display()));

        if let Some(progress) = &self.progress {
            progress.on_phase_start(SCAN_PHASE, 0);
        }

        let result = self.process_walk(walker, &root);

        if let Some(progress) = &self.progress {
            progress.on_phase_end(SCAN_PHASE);
        }

        result?;
        self.sink.info("Cache processing completed!");
        Ok(self.summary.clone())
    }

    fn process_walk(&mut self, walker: &Walker, root: &Path) -> Result<(), ExtractError> {
        for (index, entry) in walker.walk().enumerate() {
            let entry = entry.map_err(|source| ExtractError::DirectoryWalk {
                path: root.to_path_buf(),
                source,
            })?;

            self.process_file(&entry.path);

            if let Some(progress) = &self.progress {
                progress.on_progress(index + 1, &entry.path.to_string_lossy());
            }
        }
        Ok(())
    }

    /// Open and process a single cache file.
    pub fn process_file(&mut self, path: &Path) -> FileOutcome {
        let outcome = match File::open(path) {
            Ok(file) => self.handle_reader(path, BufReader::new(file)),
            Err(e) => {
                self.sink
                    .warn(&format!("Cannot open cache file {}: {}", path.display(), e));
                FileOutcome::Unreadable(e)
            }
        };
        self.finish(outcome)
    }

    /// Process one record read from `reader`. `origin` is only used in
    /// diagnostics.
    pub fn process_reader<R: Read>(&mut self, origin: &Path, reader: R) -> FileOutcome {
        let outcome = self.handle_reader(origin, reader);
        self.finish(outcome)
    }

    /// Counters consumed; the extractor keeps its dedup scope.
    #[must_use]
    pub fn take_summary(&mut self) -> ExtractSummary {
        std::mem::take(&mut self.summary)
    }

    fn finish(&mut self, outcome: FileOutcome) -> FileOutcome {
        self.summary.record(&outcome);
        if let (FileOutcome::Extracted { bytes, .. }, Some(progress)) = (&outcome, &self.progress) {
            progress.on_item_completed(*bytes);
        }
        outcome
    }

    fn handle_reader<R: Read>(&mut self, origin: &Path, reader: R) -> FileOutcome {
        let record = match self.parser.parse(reader) {
            Ok(record) => record,
            Err(failure) => {
                self.report_rejection(origin, &failure);
                return FileOutcome::Rejected(failure);
            }
        };

        let format = match identify(&record.payload) {
            Classification::NonConvertible(format) => format,
            Classification::Ignored => {
                self.sink
                    .debug(&format!("Ignoring payload of {}", record.link));
                return FileOutcome::Ignored;
            }
            unclassified @ Classification::Unclassified { .. } => {
                self.sink.debug(&format!(
                    "Unclassified payload from {} (begins {})",
                    record.link,
                    unclassified.window_preview().unwrap_or_default()
                ));
                return FileOutcome::Unclassified;
            }
        };

        if !self.targets.contains(&format) {
            self.sink.debug(&format!(
                "Skipping {} payload from {}",
                format.format_name, record.link
            ));
            return FileOutcome::NotTargeted(format);
        }

        self.sink
            .info(&format!("Found {} file: {}", format.format_name, record.link));

        let path = output_path(&self.output_dir, &record.link, &format);
        match write_atomic(&path, &record.payload) {
            Ok(()) => {
                self.sink.info(&format!(
                    "Saved {} file: {}",
                    format.format_name,
                    path.display()
                ));
                FileOutcome::Extracted {
                    path,
                    format,
                    bytes: record.payload.len() as u64,
                }
            }
            Err(source) => {
                let err = ExtractError::FileWrite { path, source };
                self.sink.error(&format!("Error processing {} file: {}", format.format_name, err));
                FileOutcome::WriteFailed(err)
            }
        }
    }

    fn report_rejection(&self, origin: &Path, failure: &ParseFailure) {
        match failure {
            ParseFailure::NotACacheRecord { magic } => self.sink.debug(&format!(
                "Ignoring non-RBXH magic {:?}: {}",
                magic,
                origin.display()
            )),
            ParseFailure::Io { .. } => self.sink.warn(&format!(
                "Failed reading {}: {}",
                origin.display(),
                failure
            )),
            _ => self
                .sink
                .debug(&format!("Skipping {}: {}", origin.display(), failure)),
        }
    }
}
