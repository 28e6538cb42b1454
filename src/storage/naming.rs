//! Remote name parsing and sanitizing.
//!
//! Names are path-like strings with `/` separators. A name splits into a
//! directory part and a file name, and the file name into a root and an
//! extension (the extension keeps its leading dot).

use crate::{BoardError, Result};

/// A requested name, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteName {
    /// Directory part, empty for names at the storage root.
    pub directory: String,
    /// File name without extension.
    pub root: String,
    /// Extension including the leading `.`, or empty.
    pub extension: String,
}

impl RemoteName {
    /// Parse a name, rejecting `..` segments in its directory part.
    pub fn parse(name: &str) -> Result<Self> {
        let normalized = normalize_separators(name);
        let (directory, file_name) = split_path(&normalized);

        if directory.split('/').any(|segment| segment == "..") {
            return Err(BoardError::PathTraversal(directory.to_string()));
        }

        let (root, extension) = split_extension(file_name);
        Ok(Self {
            directory: directory.to_string(),
            root: root.to_string(),
            extension: extension.to_string(),
        })
    }

    /// File name (root plus extension).
    pub fn file_name(&self) -> String {
        format!("{}{}", self.root, self.extension)
    }

    /// Full name with the directory joined back.
    pub fn full_name(&self) -> String {
        join_path(&self.directory, &self.file_name())
    }

    /// Full name for `{root}_{suffix}{extension}` in the same directory.
    pub fn with_suffix(&self, suffix: &str) -> String {
        let file_name = format!("{}_{}{}", self.root, suffix, self.extension);
        join_path(&self.directory, &file_name)
    }

    /// Drop `count` characters from the end of the root.
    pub fn truncate_root(&mut self, count: usize) {
        let keep = char_len(&self.root).saturating_sub(count);
        self.root = self.root.chars().take(keep).collect();
    }
}

/// Replace backslashes with forward slashes.
pub fn normalize_separators(name: &str) -> String {
    name.replace('\\', "/")
}

/// Split a `/`-separated path into `(directory, file_name)`.
///
/// Trailing slashes are stripped from the directory unless it is the
/// filesystem root itself.
pub fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => {
            let head = &path[..=idx];
            let tail = &path[idx + 1..];
            let trimmed = head.trim_end_matches('/');
            if trimmed.is_empty() {
                (head, tail)
            } else {
                (trimmed, tail)
            }
        }
        None => ("", path),
    }
}

/// Join a directory and a file name with a single `/`.
pub fn join_path(directory: &str, file_name: &str) -> String {
    if directory.is_empty() {
        file_name.to_string()
    } else if directory.ends_with('/') {
        format!("{directory}{file_name}")
    } else {
        format!("{directory}/{file_name}")
    }
}

/// Split a file name into `(root, extension)` at the last dot.
///
/// Leading dots do not start an extension, so `.hidden` has none.
pub fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(idx) if file_name[..idx].chars().any(|c| c != '.') => {
            (&file_name[..idx], &file_name[idx..])
        }
        _ => (file_name, ""),
    }
}

/// Length in characters.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Reduce an uploaded file name to a safe, flat ASCII name.
///
/// Non-ASCII characters are dropped, path separators become spaces,
/// whitespace runs become `_`, anything outside `[A-Za-z0-9_.-]` is removed
/// and leading/trailing `.` and `_` are stripped. The result may be empty.
pub fn secure_filename(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let name = RemoteName::parse("report.pdf").unwrap();
        assert_eq!(name.directory, "");
        assert_eq!(name.root, "report");
        assert_eq!(name.extension, ".pdf");
        assert_eq!(name.full_name(), "report.pdf");
    }

    #[test]
    fn test_parse_with_directory() {
        let name = RemoteName::parse("uploads/2024/photo.jpeg").unwrap();
        assert_eq!(name.directory, "uploads/2024");
        assert_eq!(name.file_name(), "photo.jpeg");
    }

    #[test]
    fn test_parse_normalizes_backslashes() {
        let name = RemoteName::parse(r"a\b\c.txt").unwrap();
        assert_eq!(name.directory, "a/b");
        assert_eq!(name.full_name(), "a/b/c.txt");
    }

    #[test]
    fn test_parse_rejects_traversal() {
        for input in ["../x.txt", "a/../x.txt", r"..\x.txt", "a/b/../../c", "/../x"] {
            let result = RemoteName::parse(input);
            assert!(
                matches!(result, Err(BoardError::PathTraversal(_))),
                "expected traversal error for {input}"
            );
        }
    }

    #[test]
    fn test_parse_allows_dots_in_file_name() {
        // Only the directory part is checked.
        let name = RemoteName::parse("dir/..").unwrap();
        assert_eq!(name.directory, "dir");
        assert_eq!(name.root, "..");

        let name = RemoteName::parse("a..b/c.txt").unwrap();
        assert_eq!(name.directory, "a..b");
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("a/b.txt"), ("a", "b.txt"));
        assert_eq!(split_path("b.txt"), ("", "b.txt"));
        assert_eq!(split_path("/b.txt"), ("/", "b.txt"));
        assert_eq!(split_path("a//b.txt"), ("a", "b.txt"));
        assert_eq!(split_path("a/"), ("a", ""));
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("", "b.txt"), "b.txt");
        assert_eq!(join_path("a", "b.txt"), "a/b.txt");
        assert_eq!(join_path("/", "b.txt"), "/b.txt");
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("report.pdf"), ("report", ".pdf"));
        assert_eq!(split_extension("archive.tar.gz"), ("archive.tar", ".gz"));
        assert_eq!(split_extension("README"), ("README", ""));
        assert_eq!(split_extension(".hidden"), (".hidden", ""));
        assert_eq!(split_extension("..x"), ("..x", ""));
        assert_eq!(split_extension(".env.local"), (".env", ".local"));
        assert_eq!(split_extension("trailing."), ("trailing", "."));
    }

    #[test]
    fn test_with_suffix() {
        let name = RemoteName::parse("docs/report.pdf").unwrap();
        assert_eq!(name.with_suffix("ABC1234"), "docs/report_ABC1234.pdf");

        let name = RemoteName::parse("Makefile").unwrap();
        assert_eq!(name.with_suffix("ABC1234"), "Makefile_ABC1234");
    }

    #[test]
    fn test_truncate_root() {
        let mut name = RemoteName::parse("abcdef.txt").unwrap();
        name.truncate_root(2);
        assert_eq!(name.root, "abcd");

        name.truncate_root(10);
        assert_eq!(name.root, "");
    }

    #[test]
    fn test_truncate_root_multibyte() {
        let mut name = RemoteName::parse("日本語ファイル.txt").unwrap();
        name.truncate_root(3);
        assert_eq!(name.root, "日本語フ");
    }

    #[test]
    fn test_char_len() {
        assert_eq!(char_len("abc"), 3);
        assert_eq!(char_len("日本"), 2);
    }

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("My cool movie.mov"), "My_cool_movie.mov");
        assert_eq!(secure_filename("../../../etc/passwd"), "etc_passwd");
        assert_eq!(
            secure_filename(r"C:\Users\bob\report final.pdf"),
            "C_Users_bob_report_final.pdf"
        );
        assert_eq!(secure_filename("i contain cool \u{fc}ml\u{e4}uts.txt"), "i_contain_cool_mluts.txt");
        assert_eq!(secure_filename("..hidden"), "hidden");
        assert_eq!(secure_filename("a<b>c|d?.txt"), "abcd.txt");
    }

    #[test]
    fn test_secure_filename_empty() {
        assert_eq!(secure_filename(""), "");
        assert_eq!(secure_filename("..."), "");
        assert_eq!(secure_filename("日本語"), "");
    }
}
