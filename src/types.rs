/*!
 * Core types and data structures for filescopier
 */

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::utils::absolutize;

/// A read-only view of one filesystem node
///
/// The aggregator only ever reads through this trait. Implementations other
/// than [`FsEntry`] exist in tests to simulate unreadable files.
pub trait Entry: Sized {
    /// Absolute path of the node
    fn path(&self) -> &Path;

    /// Whether the node is a directory
    fn is_dir(&self) -> bool;

    /// Read the full content of a file
    fn read_bytes(&self) -> io::Result<Vec<u8>>;

    /// List the direct children of a directory
    fn children(&self) -> io::Result<Vec<Self>>;

    /// Normalized absolute path used as the deduplication key
    fn canonical_path(&self) -> PathBuf {
        self.path().to_path_buf()
    }

    /// Size of the file in bytes, if cheaply known
    fn size_hint(&self) -> Option<u64> {
        None
    }

    /// Final path component, or the whole path when there is none
    fn file_name(&self) -> String {
        self.path()
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path().to_string_lossy().to_string())
    }

    /// Lowercased file extension
    fn extension(&self) -> Option<String> {
        self.path()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }
}

/// An [`Entry`] backed by the local filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEntry {
    path: PathBuf,
    is_dir: bool,
}

impl FsEntry {
    /// Create an entry for a caller-selected path
    ///
    /// Relative paths are resolved against the current directory and symbolic
    /// links are followed.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = absolutize(path.as_ref());
        let is_dir = path.is_dir();
        Self { path, is_dir }
    }

    fn listed(entry: &walkdir::DirEntry) -> Option<Self> {
        let path = entry.path().to_path_buf();

        if entry.path_is_symlink() {
            // Links are never descended into; only links to files are kept
            return match fs::metadata(&path) {
                Ok(meta) if meta.is_dir() => {
                    debug!("Skipping symlinked directory {}", path.display());
                    None
                }
                _ => Some(Self {
                    path,
                    is_dir: false,
                }),
            };
        }

        Some(Self {
            is_dir: entry.file_type().is_dir(),
            path,
        })
    }
}

impl Entry for FsEntry {
    fn path(&self) -> &Path {
        &self.path
    }

    fn is_dir(&self) -> bool {
        self.is_dir
    }

    fn read_bytes(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }

    fn children(&self) -> io::Result<Vec<Self>> {
        let mut children = Vec::new();

        for entry in WalkDir::new(&self.path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            match entry {
                Ok(entry) => children.extend(Self::listed(&entry)),
                // The directory itself could not be read
                Err(e) if e.depth() == 0 => return Err(io::Error::from(e)),
                Err(e) => warn!("Skipping entry in {}: {}", self.path.display(), e),
            }
        }

        Ok(children)
    }

    fn canonical_path(&self) -> PathBuf {
        fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone())
    }

    fn size_hint(&self) -> Option<u64> {
        fs::metadata(&self.path).ok().map(|meta| meta.len())
    }
}

/// The root set of one aggregation plus the base used for display paths
#[derive(Debug, Clone)]
pub struct AggregationRequest<E> {
    /// Selected entries, in the order the caller gave them
    pub roots: Vec<E>,
    /// Project base path stripped from file paths in headers
    pub base_path: PathBuf,
}

impl<E: Entry> AggregationRequest<E> {
    pub fn new(roots: Vec<E>, base_path: impl Into<PathBuf>) -> Self {
        Self {
            roots,
            base_path: base_path.into(),
        }
    }
}

impl AggregationRequest<FsEntry> {
    /// Build a request over filesystem paths
    pub fn from_paths<P: AsRef<Path>>(paths: &[P], base_path: impl AsRef<Path>) -> Self {
        Self {
            roots: paths.iter().map(|path| FsEntry::new(path)).collect(),
            base_path: absolutize(base_path.as_ref()),
        }
    }
}

/// Statistics for one file that made it into the output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludedFile {
    /// Path as shown in the fragment header
    pub display_path: String,
    /// Number of lines in the body
    pub lines: usize,
    /// Number of characters in the body
    pub chars: usize,
    /// Whether the body is a placeholder instead of the file content
    pub placeholder: bool,
}

/// Outcome of one aggregation
#[derive(Debug, Clone, Default)]
pub struct AggregationResult {
    text: String,
    files: Vec<IncludedFile>,
}

impl AggregationResult {
    pub(crate) fn new(text: String, files: Vec<IncludedFile>) -> Self {
        Self { text, files }
    }

    /// The concatenated document
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of files that produced a fragment
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Per-file statistics, in output order
    pub fn files(&self) -> &[IncludedFile] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
