/*!
 * Breadth-first traversal of a selection of filesystem entries
 */

use std::collections::VecDeque;

use tracing::{trace, warn};

use crate::types::Entry;

/// Lazy breadth-first iterator over the files reachable from a root set
///
/// Roots are visited in the order given. Popping a directory appends its
/// children to the back of the queue, so every file at depth `n` below a root
/// is emitted before anything at depth `n + 1` from that same queue.
/// Directories that cannot be listed are logged and contribute nothing.
///
/// All roots share one queue. Given roots `[dir, b.txt]`, `b.txt` is emitted
/// before the children of `dir`.
pub struct Traversal<E> {
    queue: VecDeque<E>,
}

impl<E: Entry> Traversal<E> {
    /// Start a traversal seeded with `roots`
    pub fn new(roots: impl IntoIterator<Item = E>) -> Self {
        Self {
            queue: roots.into_iter().collect(),
        }
    }
}

impl<E: Entry> Iterator for Traversal<E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        while let Some(entry) = self.queue.pop_front() {
            if !entry.is_dir() {
                return Some(entry);
            }

            match entry.children() {
                Ok(children) => {
                    trace!(
                        "Expanding {} ({} children)",
                        entry.path().display(),
                        children.len()
                    );
                    self.queue.extend(children);
                }
                Err(e) => warn!("Failed to list directory {}: {}", entry.path().display(), e),
            }
        }

        None
    }
}

/// Traverse `roots` breadth-first, yielding only files
pub fn traverse<E: Entry>(roots: impl IntoIterator<Item = E>) -> Traversal<E> {
    Traversal::new(roots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FsEntry;
    use std::fs::{self, File};
    use std::io;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    /// In-memory tree; a directory with `None` children fails to list
    #[derive(Clone)]
    enum MemEntry {
        File(PathBuf),
        Dir(PathBuf, Option<Vec<MemEntry>>),
    }

    impl MemEntry {
        fn file(path: &str) -> Self {
            MemEntry::File(PathBuf::from(path))
        }

        fn dir(path: &str, children: Vec<MemEntry>) -> Self {
            MemEntry::Dir(PathBuf::from(path), Some(children))
        }

        fn unlistable(path: &str) -> Self {
            MemEntry::Dir(PathBuf::from(path), None)
        }
    }

    impl Entry for MemEntry {
        fn path(&self) -> &Path {
            match self {
                MemEntry::File(path) | MemEntry::Dir(path, _) => path,
            }
        }

        fn is_dir(&self) -> bool {
            matches!(self, MemEntry::Dir(..))
        }

        fn read_bytes(&self) -> io::Result<Vec<u8>> {
            Ok(Vec::new())
        }

        fn children(&self) -> io::Result<Vec<Self>> {
            match self {
                MemEntry::File(_) => Ok(Vec::new()),
                MemEntry::Dir(_, Some(children)) => Ok(children.clone()),
                MemEntry::Dir(path, None) => Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    format!("cannot open {}", path.display()),
                )),
            }
        }
    }

    fn emitted(files: Traversal<MemEntry>) -> Vec<String> {
        files.map(|f| f.path().to_string_lossy().into_owned()).collect()
    }

    fn relative_paths(root: &Path, files: Traversal<FsEntry>) -> Vec<String> {
        files
            .map(|f| {
                f.path()
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_empty_root_set() {
        let roots: Vec<FsEntry> = Vec::new();
        assert_eq!(traverse(roots).count(), 0);
    }

    #[test]
    fn test_single_file_root() -> io::Result<()> {
        let temp_dir = tempdir()?;
        File::create(temp_dir.path().join("only.txt"))?;

        let files: Vec<PathBuf> = traverse(vec![FsEntry::new(temp_dir.path().join("only.txt"))])
            .map(|f| f.path().to_path_buf())
            .collect();
        assert_eq!(files, vec![temp_dir.path().join("only.txt")]);

        Ok(())
    }

    #[test]
    fn test_empty_directory_contributes_nothing() -> io::Result<()> {
        let temp_dir = tempdir()?;
        fs::create_dir(temp_dir.path().join("empty"))?;

        let roots = vec![FsEntry::new(temp_dir.path().join("empty"))];
        assert_eq!(traverse(roots).count(), 0);

        Ok(())
    }

    #[test]
    fn test_level_order_emission() -> io::Result<()> {
        // root/
        //   a/
        //     b/
        //       c/deep.txt
        //     mid.txt
        //   top.txt
        //   z/zz.txt
        let temp_dir = tempdir()?;
        let root = temp_dir.path().join("root");
        fs::create_dir_all(root.join("a").join("b").join("c"))?;
        fs::create_dir_all(root.join("z"))?;
        File::create(root.join("a").join("b").join("c").join("deep.txt"))?;
        File::create(root.join("a").join("mid.txt"))?;
        File::create(root.join("top.txt"))?;
        File::create(root.join("z").join("zz.txt"))?;

        let files = relative_paths(&root, traverse(vec![FsEntry::new(&root)]));
        assert_eq!(
            files,
            vec!["top.txt", "a/mid.txt", "z/zz.txt", "a/b/c/deep.txt"]
        );

        Ok(())
    }

    #[test]
    fn test_roots_keep_caller_order() -> io::Result<()> {
        let temp_dir = tempdir()?;
        let root = temp_dir.path();
        fs::create_dir(root.join("dir"))?;
        File::create(root.join("dir").join("inner.txt"))?;
        File::create(root.join("second.txt"))?;

        let roots = vec![FsEntry::new(root.join("second.txt")), FsEntry::new(root.join("dir"))];
        let files = relative_paths(root, traverse(roots));
        assert_eq!(files, vec!["second.txt", "dir/inner.txt"]);

        Ok(())
    }

    #[test]
    fn test_unlistable_directory_is_skipped() {
        let root = MemEntry::dir(
            "root",
            vec![
                MemEntry::file("root/a.txt"),
                MemEntry::unlistable("root/locked"),
                MemEntry::dir("root/open", vec![MemEntry::file("root/open/c.txt")]),
                MemEntry::file("root/b.txt"),
            ],
        );

        assert_eq!(
            emitted(traverse(vec![root])),
            vec!["root/a.txt", "root/b.txt", "root/open/c.txt"]
        );
    }

    #[test]
    fn test_unlistable_root_does_not_stop_later_roots() {
        let roots = vec![
            MemEntry::unlistable("locked"),
            MemEntry::file("after.txt"),
        ];

        assert_eq!(emitted(traverse(roots)), vec!["after.txt"]);
    }

    #[test]
    fn test_file_root_after_directory_root_comes_first() {
        let roots = vec![
            MemEntry::dir("dirA", vec![MemEntry::file("dirA/x.kt")]),
            MemEntry::file("b.txt"),
        ];

        assert_eq!(emitted(traverse(roots)), vec!["b.txt", "dirA/x.kt"]);
    }

    #[test]
    fn test_overlapping_roots_visit_twice() -> io::Result<()> {
        let temp_dir = tempdir()?;
        let root = temp_dir.path();
        fs::create_dir(root.join("dir"))?;
        File::create(root.join("dir").join("x.txt"))?;

        let roots = vec![FsEntry::new(root.join("dir")), FsEntry::new(root.join("dir").join("x.txt"))];
        let files = relative_paths(root, traverse(roots));
        assert_eq!(files, vec!["dir/x.txt", "dir/x.txt"]);

        Ok(())
    }
}
