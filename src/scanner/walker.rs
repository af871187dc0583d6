//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a cache
//! directory and yielding every regular file in it. The walk is
//! single-threaded and depth-first, with directory entries sorted by file
//! name so runs over the same tree see files in the same order (which
//! matters: the first copy of a duplicated link wins).
//!
//! # Features
//!
//! - Depth-first traversal with deterministic ordering
//! - Optional symlink following with loop detection; unfollowed links to
//!   files are still yielded
//! - Hidden file filtering
//! - Maximum size filtering
//!
//! # Example
//!
//! ```no_run
//! use bloxdump::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/path/to/Roblox/http"), WalkerConfig::default());
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} cache files", files.len());
//! ```

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::{FileEntry, ScanError, WalkerConfig};

/// Directory walker for cache file discovery.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Root directory being walked.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if a file passes the size filter.
    fn passes_size_filter(&self, size: u64) -> bool {
        self.config.max_size.map_or(true, |max| size <= max)
    }

    /// Walk the directory tree, yielding file entries.
    ///
    /// Errors are yielded as [`ScanError`] values; a root that does not
    /// exist or is not a directory yields a single error.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let skip_hidden = self.config.skip_hidden;

        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !(skip_hidden && entry.depth() > 0 && is_hidden(entry)))
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => self.process_entry(entry),
                Err(e) => Some(Err(self.handle_walkdir_error(e))),
            })
    }

    /// Turn a walkdir entry into a [`FileEntry`] if it is a file we want.
    fn process_entry(&self, entry: DirEntry) -> Option<Result<FileEntry, ScanError>> {
        let file_type = entry.file_type();

        if entry.depth() == 0 {
            if file_type.is_dir() {
                return None;
            }
            log::warn!("Cache path is not a directory: {}", entry.path().display());
            return Some(Err(ScanError::NotADirectory(entry.into_path())));
        }

        if file_type.is_dir() {
            return None;
        }

        if file_type.is_symlink() {
            // Only reached when links are not followed.
            return self.process_unfollowed_link(entry);
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => return Some(Err(self.handle_walkdir_error(e))),
        };

        if !metadata.is_file() {
            return None;
        }

        let size = metadata.len();
        if !self.passes_size_filter(size) {
            log::debug!(
                "Skipping file due to size filter ({}): {}",
                size,
                entry.path().display()
            );
            return None;
        }

        Some(Ok(FileEntry::new(entry.into_path(), size)))
    }

    /// A link that is not followed still names a cache file when it points
    /// at one. Linked directories are never descended into. A dangling link
    /// is yielded so that opening it is reported like any unreadable file.
    fn process_unfollowed_link(&self, entry: DirEntry) -> Option<Result<FileEntry, ScanError>> {
        match std::fs::metadata(entry.path()) {
            Ok(target) if target.is_dir() => {
                log::trace!("Not descending into linked directory: {}", entry.path().display());
                None
            }
            Ok(target) if target.is_file() => {
                let size = target.len();
                if !self.passes_size_filter(size) {
                    log::debug!(
                        "Skipping file due to size filter ({}): {}",
                        size,
                        entry.path().display()
                    );
                    return None;
                }
                Some(Ok(FileEntry::new(entry.into_path(), size)))
            }
            Ok(_) => None,
            Err(e) => {
                log::debug!("Broken symlink {}: {}", entry.path().display(), e);
                Some(Ok(FileEntry::new(entry.into_path(), 0)))
            }
        }
    }

    /// Handle walkdir errors.
    fn handle_walkdir_error(&self, error: walkdir::Error) -> ScanError {
        use std::io::ErrorKind;

        let path = error
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if error.loop_ancestor().is_some() {
            log::warn!("Symlink loop: {}", path.display());
            return ScanError::Loop(path);
        }

        match error.io_error().map(std::io::Error::kind) {
            Some(ErrorKind::PermissionDenied) => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path)
            }
            Some(ErrorKind::NotFound) => {
                log::debug!("Path not found: {}", path.display());
                ScanError::NotFound(path)
            }
            _ => {
                log::warn!("Walker error for {}: {}", path.display(), error);
                let source = error
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
                ScanError::Io { path, source }
            }
        }
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
