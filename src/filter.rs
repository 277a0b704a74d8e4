/*!
 * Inclusion policy applied to each file before formatting
 */

use std::collections::HashSet;
use std::path::PathBuf;

use glob_match::glob_match;
use tracing::debug;

use crate::config::{DedupPolicy, FilterMode};
use crate::types::Entry;

/// OS metadata file rejected in strict mode, compared case-insensitively
pub const OS_METADATA_FILE: &str = ".DS_Store";

/// Suffix editors leave on backup copies
pub const BACKUP_SUFFIX: char = '~';

/// Canonical paths already emitted during one aggregation
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: HashSet<PathBuf>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path`, returning whether it was not seen before
    pub fn insert(&mut self, path: PathBuf) -> bool {
        self.seen.insert(path)
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Decides which traversed files end up in the output
///
/// The default-deny rules and deduplication are independent switches. A
/// policy is meant to live for exactly one aggregation, since the visited set
/// it carries must not leak into the next one.
#[derive(Debug)]
pub struct FilterPolicy {
    mode: FilterMode,
    ignore_patterns: Vec<String>,
    visited: Option<VisitedSet>,
}

impl FilterPolicy {
    pub fn new(mode: FilterMode, dedup: DedupPolicy, ignore_patterns: Vec<String>) -> Self {
        Self {
            mode,
            ignore_patterns,
            visited: match dedup {
                DedupPolicy::On => Some(VisitedSet::new()),
                DedupPolicy::Off => None,
            },
        }
    }

    /// Check whether `file` should be formatted
    ///
    /// With deduplication on, an accepted file is recorded and any later
    /// occurrence of the same canonical path is rejected.
    pub fn is_included<E: Entry>(&mut self, file: &E) -> bool {
        let name = file.file_name();

        if self.mode == FilterMode::Strict && is_default_denied(&name) {
            debug!("Excluding {} (default-deny rule)", file.path().display());
            return false;
        }

        if self.should_ignore(&name) {
            debug!("Excluding {} (ignore pattern)", file.path().display());
            return false;
        }

        if let Some(visited) = self.visited.as_mut() {
            if !visited.insert(file.canonical_path()) {
                debug!("Skipping duplicate {}", file.path().display());
                return false;
            }
        }

        true
    }

    /// Check the file name against the user-supplied glob patterns
    pub fn should_ignore(&self, file_name: &str) -> bool {
        self.ignore_patterns
            .iter()
            .any(|pattern| glob_match(pattern, file_name))
    }
}

/// Strict-mode rules: OS metadata files, backup files and dotfiles
pub fn is_default_denied(file_name: &str) -> bool {
    file_name.eq_ignore_ascii_case(OS_METADATA_FILE)
        || file_name.ends_with(BACKUP_SUFFIX)
        || file_name.starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::Path;

    struct NamedFile(PathBuf);

    impl Entry for NamedFile {
        fn path(&self) -> &Path {
            &self.0
        }

        fn is_dir(&self) -> bool {
            false
        }

        fn read_bytes(&self) -> io::Result<Vec<u8>> {
            Ok(Vec::new())
        }

        fn children(&self) -> io::Result<Vec<Self>> {
            Ok(Vec::new())
        }
    }

    fn file(path: &str) -> NamedFile {
        NamedFile(PathBuf::from(path))
    }

    fn strict() -> FilterPolicy {
        FilterPolicy::new(FilterMode::Strict, DedupPolicy::Off, vec![])
    }

    fn permissive() -> FilterPolicy {
        FilterPolicy::new(FilterMode::Permissive, DedupPolicy::Off, vec![])
    }

    #[test]
    fn test_ds_store_any_case() {
        for name in ["/p/.DS_Store", "/p/.ds_store", "/p/.DS_STORE"] {
            assert!(!strict().is_included(&file(name)), "{} should be excluded", name);
            assert!(permissive().is_included(&file(name)), "{} should be included", name);
        }
    }

    #[test]
    fn test_backup_file_excluded() {
        assert!(!strict().is_included(&file("/p/foo.txt~")));
        assert!(permissive().is_included(&file("/p/foo.txt~")));
    }

    #[test]
    fn test_dotfile_excluded() {
        assert!(!strict().is_included(&file("/p/.env")));
        assert!(permissive().is_included(&file("/p/.env")));
    }

    #[test]
    fn test_regular_file_included() {
        assert!(strict().is_included(&file("/p/src/main.rs")));
        // A dot inside a directory name does not make the file hidden
        assert!(strict().is_included(&file("/p/.config/settings.toml")));
    }

    #[test]
    fn test_dedup_by_canonical_path() {
        let mut policy = FilterPolicy::new(FilterMode::Permissive, DedupPolicy::On, vec![]);
        assert!(policy.is_included(&file("/p/a.txt")));
        assert!(!policy.is_included(&file("/p/a.txt")));
        assert!(policy.is_included(&file("/p/b.txt")));

        let mut no_dedup = permissive();
        assert!(no_dedup.is_included(&file("/p/a.txt")));
        assert!(no_dedup.is_included(&file("/p/a.txt")));
    }

    #[test]
    fn test_rejected_files_do_not_consume_dedup_slot() {
        let mut policy = FilterPolicy::new(
            FilterMode::Permissive,
            DedupPolicy::On,
            vec!["*.log".to_string()],
        );
        assert!(!policy.is_included(&file("/p/app.log")));
        assert!(policy.visited.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_ignore_patterns_apply_in_both_modes() {
        let patterns = vec!["*.lock".to_string()];
        let mut strict = FilterPolicy::new(FilterMode::Strict, DedupPolicy::Off, patterns.clone());
        let mut permissive = FilterPolicy::new(FilterMode::Permissive, DedupPolicy::Off, patterns);

        assert!(!strict.is_included(&file("/p/Cargo.lock")));
        assert!(!permissive.is_included(&file("/p/Cargo.lock")));
        assert!(permissive.is_included(&file("/p/Cargo.toml")));
    }
}
