//! Per-run counters.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use bytesize::ByteSize;
use serde::Serialize;

use super::FileOutcome;
use crate::cache::ParseFailure;

/// What happened to the files of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractSummary {
    /// Cache files handed to the extractor.
    pub files_scanned: usize,
    /// Files that decoded into a record.
    pub records_parsed: usize,
    /// Files without the `RBXH` tag.
    pub not_cache_records: usize,
    /// Records cut short.
    pub truncated: usize,
    /// Records whose link was already extracted.
    pub duplicate_links: usize,
    /// Records with status >= 300.
    pub rejected_status: usize,
    /// Files that could not be opened or read.
    pub read_errors: usize,
    /// Payloads no signature matched.
    pub unclassified: usize,
    /// Payloads recognised but deliberately skipped.
    pub ignored: usize,
    /// Payloads of a recognised format that was not selected for extraction.
    pub not_targeted: usize,
    /// Files written.
    pub extracted: usize,
    /// Writes that failed.
    pub write_failures: usize,
    /// Total payload bytes written.
    pub bytes_written: u64,
    /// Files written, keyed by extension.
    pub extracted_by_format: BTreeMap<String, usize>,
}

impl ExtractSummary {
    /// Count one file outcome.
    pub fn record(&mut self, outcome: &FileOutcome) {
        self.files_scanned += 1;

        match outcome {
            FileOutcome::Rejected(failure) => match failure {
                ParseFailure::NotACacheRecord { .. } => self.not_cache_records += 1,
                ParseFailure::Truncated { .. } => self.truncated += 1,
                ParseFailure::DuplicateLink { .. } => self.duplicate_links += 1,
                ParseFailure::RejectedStatus { .. } => self.rejected_status += 1,
                ParseFailure::Io { .. } => self.read_errors += 1,
            },
            FileOutcome::Unreadable(_) => self.read_errors += 1,
            FileOutcome::Unclassified => {
                self.records_parsed += 1;
                self.unclassified += 1;
            }
            FileOutcome::Ignored => {
                self.records_parsed += 1;
                self.ignored += 1;
            }
            FileOutcome::NotTargeted(_) => {
                self.records_parsed += 1;
                self.not_targeted += 1;
            }
            FileOutcome::Extracted { format, bytes, .. } => {
                self.records_parsed += 1;
                self.extracted += 1;
                self.bytes_written += bytes;
                *self
                    .extracted_by_format
                    .entry(format.extension.to_string())
                    .or_insert(0) += 1;
            }
            FileOutcome::WriteFailed(_) => {
                self.records_parsed += 1;
                self.write_failures += 1;
            }
        }
    }

    /// Multi-line human-readable report.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Cache files scanned:   {}", self.files_scanned);
        let _ = writeln!(out, "Records parsed:        {}", self.records_parsed);
        let _ = writeln!(
            out,
            "Skipped:               {} not cache, {} truncated, {} duplicate, {} bad status, {} unreadable",
            self.not_cache_records,
            self.truncated,
            self.duplicate_links,
            self.rejected_status,
            self.read_errors
        );
        let _ = writeln!(
            out,
            "Not extracted:         {} unclassified, {} ignored, {} other formats",
            self.unclassified, self.ignored, self.not_targeted
        );
        let _ = write!(
            out,
            "Extracted:             {} files ({})",
            self.extracted,
            ByteSize::b(self.bytes_written)
        );
        for (extension, count) in &self.extracted_by_format {
            let _ = write!(out, "\n  .{:<6} {}", extension, count);
        }
        if self.write_failures > 0 {
            let _ = write!(out, "\nWrite failures:        {}", self.write_failures);
        }
        out
    }
}
