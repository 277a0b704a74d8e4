/*!
 * Fragment formatting: header, optional fence and body for one file
 */

use std::collections::HashMap;
use std::path::{Path, MAIN_SEPARATOR};

use once_cell::sync::Lazy;
use tracing::{debug, warn};

use crate::config::{Config, HeaderStyle};
use crate::types::Entry;
use crate::utils::format_file_size;

/// Extension to fence language hint
pub static LANGUAGE_HINTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("kt", "kotlin"),
        ("java", "java"),
        ("js", "javascript"),
        ("ts", "typescript"),
        ("py", "python"),
        ("rb", "ruby"),
        ("go", "go"),
        ("cpp", "cpp"),
        ("cc", "cpp"),
        ("cxx", "cpp"),
        ("c", "c"),
        ("cs", "csharp"),
        ("php", "php"),
        ("html", "html"),
        ("htm", "html"),
        ("css", "css"),
        ("json", "json"),
        ("xml", "xml"),
        ("md", "markdown"),
        ("sh", "bash"),
        ("yml", "yaml"),
        ("yaml", "yaml"),
    ])
});

/// Look up the fence language for a file extension, ignoring case
pub fn language_hint(extension: &str) -> Option<&'static str> {
    LANGUAGE_HINTS
        .get(extension.to_lowercase().as_str())
        .copied()
}

/// Path shown in a header: `path` with `base` and one separator removed
///
/// Falls back to the full path when `path` does not live under `base`. An
/// empty base strips a leading separator.
pub fn relative_path(path: &Path, base: &Path) -> String {
    let path = path.to_string_lossy();
    let base = base.to_string_lossy();
    let base = base.trim_end_matches(['/', MAIN_SEPARATOR]);

    let native = format!("{}{}", base, MAIN_SEPARATOR);
    let slash = format!("{}/", base);
    path.strip_prefix(native.as_str())
        .or_else(|| path.strip_prefix(slash.as_str()))
        .unwrap_or(&*path)
        .to_string()
}

/// One formatted file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Path shown in the header
    pub display_path: String,
    /// Header, body and trailer
    pub text: String,
    /// Body text on its own
    pub body: String,
    /// The body is a placeholder rather than the file content
    pub placeholder: bool,
}

/// Formats files into fragments
#[derive(Debug, Clone)]
pub struct Formatter {
    style: HeaderStyle,
    lossy: bool,
    max_file_size: Option<u64>,
}

impl Formatter {
    pub fn new(style: HeaderStyle) -> Self {
        Self {
            style,
            lossy: false,
            max_file_size: None,
        }
    }

    /// Build a formatter from the header and decoding settings of `config`
    pub fn from_config(config: &Config) -> Self {
        Self {
            style: config.header_style,
            lossy: config.lossy,
            max_file_size: config.max_file_size,
        }
    }

    /// Decode invalid UTF-8 with replacement characters
    pub fn lossy(mut self, lossy: bool) -> Self {
        self.lossy = lossy;
        self
    }

    /// Skip the content of files larger than `limit` bytes
    pub fn max_file_size(mut self, limit: Option<u64>) -> Self {
        self.max_file_size = limit;
        self
    }

    /// Format one file
    ///
    /// Never fails: unreadable, undecodable or oversized files get a
    /// placeholder body.
    pub fn format<E: Entry>(&self, file: &E, base: &Path) -> Fragment {
        let display_path = relative_path(file.path(), base);
        let (body, placeholder) = match self.read_body(file) {
            Ok(body) => body,
            Err(reason) => {
                warn!("Failed to read {}: {}", file.path().display(), reason);
                (format!("// [Failed to read: {}]\n", reason), true)
            }
        };

        let mut text = String::with_capacity(body.len() + display_path.len() + 32);
        match self.style {
            HeaderStyle::Markdown => {
                let hint = file
                    .extension()
                    .and_then(|ext| language_hint(&ext))
                    .unwrap_or("");
                text.push_str("### ");
                text.push_str(&display_path);
                text.push('\n');
                text.push_str("```");
                text.push_str(hint);
                text.push('\n');
                text.push_str(&body);
                text.push_str("\n```\n\n");
            }
            HeaderStyle::Bracket => {
                text.push('[');
                text.push_str(&display_path);
                text.push_str("]\n");
                text.push_str(&body);
                text.push_str("\n\n\n");
            }
        }

        Fragment {
            display_path,
            text,
            body,
            placeholder,
        }
    }

    /// Body text and whether it is a placeholder
    fn read_body<E: Entry>(&self, file: &E) -> Result<(String, bool), String> {
        if let Some(limit) = self.max_file_size {
            match file.size_hint() {
                Some(size) if size > limit => {
                    debug!("Skipping content of {}: {} bytes", file.path().display(), size);
                    let note = format!(
                        "// [File too large to include content. Size: {}]\n",
                        format_file_size(size)
                    );
                    return Ok((note, true));
                }
                _ => {}
            }
        }

        let bytes = file.read_bytes().map_err(|e| e.to_string())?;
        if self.lossy {
            return Ok((String::from_utf8_lossy(&bytes).into_owned(), false));
        }

        String::from_utf8(bytes)
            .map(|body| (body, false))
            .map_err(|e| e.utf8_error().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    struct MemFile {
        path: PathBuf,
        content: io::Result<Vec<u8>>,
    }

    impl MemFile {
        fn new(path: &str, content: &str) -> Self {
            Self {
                path: PathBuf::from(path),
                content: Ok(content.as_bytes().to_vec()),
            }
        }

        fn bytes(path: &str, content: &[u8]) -> Self {
            Self {
                path: PathBuf::from(path),
                content: Ok(content.to_vec()),
            }
        }
    }

    impl Entry for MemFile {
        fn path(&self) -> &Path {
            &self.path
        }

        fn is_dir(&self) -> bool {
            false
        }

        fn read_bytes(&self) -> io::Result<Vec<u8>> {
            match &self.content {
                Ok(bytes) => Ok(bytes.clone()),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }

        fn children(&self) -> io::Result<Vec<Self>> {
            Ok(Vec::new())
        }

        fn size_hint(&self) -> Option<u64> {
            self.content.as_ref().ok().map(|b| b.len() as u64)
        }
    }

    #[test]
    fn test_language_hints() {
        assert_eq!(language_hint("py"), Some("python"));
        assert_eq!(language_hint("KT"), Some("kotlin"));
        assert_eq!(language_hint("cxx"), Some("cpp"));
        assert_eq!(language_hint("yml"), Some("yaml"));
        assert_eq!(language_hint("unknownext"), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_relative_path() {
        let base = Path::new("/proj");
        assert_eq!(relative_path(Path::new("/proj/src/a.py"), base), "src/a.py");
        assert_eq!(relative_path(Path::new("/proj/src/a.py"), Path::new("/proj/")), "src/a.py");
        // Only whole path components are stripped
        assert_eq!(relative_path(Path::new("/project/a.py"), base), "/project/a.py");
        assert_eq!(relative_path(Path::new("/other/a.py"), base), "/other/a.py");
        // An empty base strips the leading separator
        assert_eq!(relative_path(Path::new("/other/a.py"), Path::new("")), "other/a.py");
        assert_eq!(relative_path(Path::new("/a/b.py"), Path::new("/")), "a/b.py");
    }

    #[cfg(unix)]
    #[test]
    fn test_markdown_fragment() {
        let fragment = Formatter::new(HeaderStyle::Markdown)
            .format(&MemFile::new("/proj/src/a.py", "print(1)"), Path::new("/proj"));

        assert_eq!(fragment.display_path, "src/a.py");
        assert_eq!(fragment.text, "### src/a.py\n```python\nprint(1)\n```\n\n");
        assert!(!fragment.placeholder);
    }

    #[cfg(unix)]
    #[test]
    fn test_markdown_unknown_extension_has_bare_fence() {
        let fragment = Formatter::new(HeaderStyle::Markdown)
            .format(&MemFile::new("/proj/data.unknownext", "x"), Path::new("/proj"));

        assert_eq!(fragment.text, "### data.unknownext\n```\nx\n```\n\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_bracket_fragment() {
        let fragment = Formatter::new(HeaderStyle::Bracket)
            .format(&MemFile::new("/proj/src/a.py", "print(1)\n"), Path::new("/proj"));

        assert_eq!(fragment.text, "[src/a.py]\nprint(1)\n\n\n\n");
    }

    #[test]
    fn test_invalid_utf8_placeholder() {
        let file = MemFile::bytes("/proj/blob.bin", &[0x66, 0xff, 0xfe]);

        let strict = Formatter::new(HeaderStyle::Bracket).format(&file, Path::new("/proj"));
        assert!(strict.placeholder);
        assert!(strict.body.starts_with("// [Failed to read: "));
        assert!(strict.body.ends_with("]\n"));

        let lossy = Formatter::new(HeaderStyle::Bracket)
            .lossy(true)
            .format(&file, Path::new("/proj"));
        assert!(!lossy.placeholder);
        assert!(lossy.body.starts_with('f'));
        assert!(lossy.body.contains('\u{FFFD}'));
    }

    #[test]
    fn test_read_error_placeholder_carries_reason() {
        let file = MemFile {
            path: PathBuf::from("/proj/locked.txt"),
            content: Err(io::Error::new(io::ErrorKind::PermissionDenied, "access denied")),
        };

        let fragment = Formatter::new(HeaderStyle::Markdown).format(&file, Path::new("/proj"));
        assert!(fragment.placeholder);
        assert_eq!(fragment.body, "// [Failed to read: access denied]\n");
    }

    #[test]
    fn test_max_file_size() {
        let file = MemFile::new("/proj/big.txt", &"x".repeat(4096));

        let fragment = Formatter::new(HeaderStyle::Bracket)
            .max_file_size(Some(1024))
            .format(&file, Path::new("/proj"));
        assert!(fragment.placeholder);
        assert_eq!(
            fragment.body,
            "// [File too large to include content. Size: 4.00 KB]\n"
        );

        let fragment = Formatter::new(HeaderStyle::Bracket)
            .max_file_size(Some(8192))
            .format(&file, Path::new("/proj"));
        assert!(!fragment.placeholder);
        assert_eq!(fragment.body.len(), 4096);
    }
}
