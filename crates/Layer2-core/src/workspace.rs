//! Workspace - sandboxed file operations
//!
//! All paths are given relative to an immutable root fixed at construction.
//! Any path that resolves outside the root is rejected through the normal
//! result channel; no operation touches the filesystem after a rejection.

use ember_foundation::DEFAULT_IGNORE_PATTERNS;
use regex::RegexBuilder;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Failure channel for workspace operations. These are values, not control
/// flow: callers report them and continue.
#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Path is outside workspace: {0}")]
    OutsideRoot(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single search hit: workspace-relative path, 1-based line number, and
/// the trimmed line text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    pub path: PathBuf,
    pub line: usize,
    pub text: String,
}

/// Line statistics over a set of files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStats {
    pub total_files: usize,
    pub total_lines: usize,
    pub code_lines: usize,
    pub comment_lines: usize,
    pub blank_lines: usize,
}

/// Basic metadata for a single file
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub path: String,
    pub size: u64,
    pub is_file: bool,
    pub extension: String,
}

/// Manages file operations within a workspace
pub struct Workspace {
    root: PathBuf,
    ignore_patterns: Vec<String>,
}

impl Workspace {
    /// Create a workspace rooted at `root`. User-supplied ignore patterns
    /// come first; the common defaults are appended when not already present.
    pub fn new(root: impl Into<PathBuf>, ignore_patterns: &[String]) -> std::io::Result<Self> {
        let root = root.into().canonicalize()?;
        let mut patterns: Vec<String> = ignore_patterns.to_vec();
        for default in DEFAULT_IGNORE_PATTERNS {
            if !patterns.iter().any(|p| p == default) {
                patterns.push(default.to_string());
            }
        }
        Ok(Self {
            root,
            ignore_patterns: patterns,
        })
    }

    /// Workspace root (absolute)
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a relative path against the root and reject anything that
    /// lands outside it. Resolution is lexical so that paths which do not
    /// exist yet (e.g. a file about to be created) can still be checked.
    fn resolve(&self, filepath: &str) -> Result<PathBuf, WorkspaceError> {
        let joined = self.root.join(filepath);
        let mut normalized = PathBuf::new();
        for component in joined.components() {
            match component {
                Component::ParentDir => {
                    normalized.pop();
                }
                Component::CurDir => {}
                other => normalized.push(other.as_os_str()),
            }
        }
        if normalized.starts_with(&self.root) {
            Ok(normalized)
        } else {
            Err(WorkspaceError::OutsideRoot(filepath.to_string()))
        }
    }

    /// Check if a workspace-relative path matches any ignore pattern.
    ///
    /// Three rules, any one of which excludes the entry:
    /// - patterns ending in `/` match a path component exactly
    /// - glob patterns match against the relative path string
    /// - plain substring containment
    pub fn should_ignore(&self, relative: &Path) -> bool {
        let path_str = relative.to_string_lossy();
        let file_name = relative
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        for pattern in &self.ignore_patterns {
            if let Some(dir) = pattern.strip_suffix('/') {
                if relative.components().any(|c| c.as_os_str() == dir) {
                    return true;
                }
            } else if glob::Pattern::new(pattern)
                .map(|p| p.matches(&path_str) || p.matches(&file_name))
                .unwrap_or(false)
            {
                return true;
            } else if path_str.contains(pattern.as_str()) {
                return true;
            }
        }
        false
    }

    /// List files matching a glob pattern, sorted, as workspace-relative
    /// paths. Patterns containing a separator match against the full
    /// relative path; bare patterns match the file name.
    pub fn list_files(&self, pattern: &str, recursive: bool) -> Vec<PathBuf> {
        let matcher = match glob::Pattern::new(pattern) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Invalid glob pattern '{}': {}", pattern, e);
                return Vec::new();
            }
        };
        let match_full_path = pattern.contains('/');
        let mut files = Vec::new();
        self.collect_files(&self.root, &matcher, match_full_path, recursive, &mut files);
        files.sort();
        files
    }

    fn collect_files(
        &self,
        dir: &Path,
        matcher: &glob::Pattern,
        match_full_path: bool,
        recursive: bool,
        out: &mut Vec<PathBuf>,
    ) {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let relative = match path.strip_prefix(&self.root) {
                Ok(r) => r.to_path_buf(),
                Err(_) => continue,
            };
            if self.should_ignore(&relative) {
                continue;
            }
            if path.is_dir() {
                if recursive {
                    self.collect_files(&path, matcher, match_full_path, recursive, out);
                }
            } else if path.is_file() {
                let candidate = if match_full_path {
                    relative.to_string_lossy().into_owned()
                } else {
                    entry.file_name().to_string_lossy().into_owned()
                };
                if matcher.matches(&candidate) {
                    out.push(relative);
                }
            }
        }
    }

    /// Read a file as text. UTF-8 first; non-UTF-8 content degrades to a
    /// Latin-1 decoding instead of failing outright.
    pub fn read_file(&self, filepath: &str) -> Result<String, WorkspaceError> {
        let full_path = self.resolve(filepath)?;
        let bytes = std::fs::read(&full_path)
            .map_err(|_| WorkspaceError::NotFound(filepath.to_string()))?;
        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(err) => Ok(err.into_bytes().iter().map(|&b| b as char).collect()),
        }
    }

    /// Write content to a file, creating intermediate directories as needed.
    /// Overwrite semantics; there is no merge.
    pub fn write_file(&self, filepath: &str, content: &str) -> Result<(), WorkspaceError> {
        let full_path = self.resolve(filepath)?;
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full_path, content)?;
        Ok(())
    }

    /// Delete a file. A missing target is reported as a failure.
    pub fn delete_file(&self, filepath: &str) -> Result<(), WorkspaceError> {
        let full_path = self.resolve(filepath)?;
        if !full_path.is_file() {
            return Err(WorkspaceError::NotFound(filepath.to_string()));
        }
        std::fs::remove_file(&full_path)?;
        Ok(())
    }

    /// Check if a file exists inside the workspace
    pub fn file_exists(&self, filepath: &str) -> bool {
        self.resolve(filepath)
            .map(|p| p.is_file())
            .unwrap_or(false)
    }

    /// Line-oriented search over every file selected by `file_pattern`.
    /// An invalid regex aborts the whole search with zero results rather
    /// than returning partial matches.
    pub fn search_in_files(
        &self,
        pattern: &str,
        file_pattern: &str,
        case_sensitive: bool,
        use_regex: bool,
    ) -> Vec<SearchMatch> {
        let compiled = if use_regex {
            match RegexBuilder::new(pattern)
                .case_insensitive(!case_sensitive)
                .build()
            {
                Ok(re) => Some(re),
                Err(e) => {
                    tracing::warn!("Invalid regex pattern: {}", e);
                    return Vec::new();
                }
            }
        } else {
            None
        };
        let needle = if case_sensitive {
            pattern.to_string()
        } else {
            pattern.to_lowercase()
        };

        let mut results = Vec::new();
        for relative in self.list_files(file_pattern, true) {
            let content = match self.read_file(&relative.to_string_lossy()) {
                Ok(content) => content,
                Err(_) => continue,
            };
            for (i, line) in content.lines().enumerate() {
                let matched = match &compiled {
                    Some(re) => re.is_match(line),
                    None => {
                        if case_sensitive {
                            line.contains(needle.as_str())
                        } else {
                            line.to_lowercase().contains(needle.as_str())
                        }
                    }
                };
                if matched {
                    results.push(SearchMatch {
                        path: relative.clone(),
                        line: i + 1,
                        text: line.trim().to_string(),
                    });
                }
            }
        }
        results
    }

    /// Depth-bounded directory tree, directories sorted before files and
    /// alphabetically within each group. Honors the ignore rules.
    pub fn get_tree(&self, max_depth: usize) -> String {
        let mut lines = vec![self.root.display().to_string()];
        self.build_tree(&self.root, "", 0, max_depth, &mut lines);
        lines.join("\n")
    }

    fn build_tree(
        &self,
        dir: &Path,
        prefix: &str,
        depth: usize,
        max_depth: usize,
        lines: &mut Vec<String>,
    ) {
        if depth >= max_depth {
            return;
        }
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };
        let mut items: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.strip_prefix(&self.root)
                    .map(|r| !self.should_ignore(r))
                    .unwrap_or(false)
            })
            .collect();
        items.sort_by_key(|p| (!p.is_dir(), p.file_name().map(|n| n.to_os_string())));

        let count = items.len();
        for (i, item) in items.iter().enumerate() {
            let is_last = i == count - 1;
            let connector = if is_last { "└── " } else { "├── " };
            let child_prefix = if is_last { "    " } else { "│   " };
            let name = item
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            lines.push(format!("{}{}{}", prefix, connector, name));
            if item.is_dir() {
                self.build_tree(
                    item,
                    &format!("{}{}", prefix, child_prefix),
                    depth + 1,
                    max_depth,
                    lines,
                );
            }
        }
    }

    /// Count lines in files matching the pattern. A line is blank if empty
    /// after trimming, a comment if it starts with the language's line
    /// comment marker, otherwise code.
    pub fn count_lines(&self, file_pattern: &str) -> LineStats {
        let mut stats = LineStats::default();

        for relative in self.list_files(file_pattern, true) {
            let content = match self.read_file(&relative.to_string_lossy()) {
                Ok(content) => content,
                Err(_) => continue,
            };
            let marker = comment_marker(&relative);
            stats.total_files += 1;
            for line in content.lines() {
                stats.total_lines += 1;
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    stats.blank_lines += 1;
                } else if trimmed.starts_with(marker) {
                    stats.comment_lines += 1;
                } else {
                    stats.code_lines += 1;
                }
            }
        }
        stats
    }

    /// Basic metadata for a file or directory inside the workspace
    pub fn file_info(&self, filepath: &str) -> Result<FileInfo, WorkspaceError> {
        let full_path = self.resolve(filepath)?;
        if !full_path.exists() {
            return Err(WorkspaceError::NotFound(filepath.to_string()));
        }
        let metadata = std::fs::metadata(&full_path)?;
        Ok(FileInfo {
            path: filepath.to_string(),
            size: metadata.len(),
            is_file: metadata.is_file(),
            extension: full_path
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default(),
        })
    }
}

/// Line comment marker by file extension
fn comment_marker(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        "rs" | "c" | "h" | "cpp" | "hpp" | "cc" | "js" | "jsx" | "ts" | "tsx" | "go" | "java"
        | "kt" | "swift" | "cs" | "scala" => "//",
        _ => "#",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn workspace(dir: &Path) -> Workspace {
        Workspace::new(dir, &[]).unwrap()
    }

    #[test]
    fn test_traversal_rejected_without_touching_filesystem() {
        let dir = tempdir().unwrap();
        let ws = workspace(dir.path());

        for path in ["../../etc/passwd", "../escape.txt", "a/../../escape.txt"] {
            assert!(matches!(
                ws.read_file(path),
                Err(WorkspaceError::OutsideRoot(_))
            ));
            assert!(matches!(
                ws.write_file(path, "x"),
                Err(WorkspaceError::OutsideRoot(_))
            ));
            assert!(matches!(
                ws.delete_file(path),
                Err(WorkspaceError::OutsideRoot(_))
            ));
        }
        // Nothing was created next to the workspace
        assert!(!dir.path().parent().unwrap().join("escape.txt").exists());
    }

    #[test]
    fn test_dotdot_within_root_is_allowed() {
        let dir = tempdir().unwrap();
        let ws = workspace(dir.path());
        ws.write_file("sub/../inside.txt", "ok").unwrap();
        assert_eq!(ws.read_file("inside.txt").unwrap(), "ok");
    }

    #[test]
    fn test_write_read_roundtrip() {
        let dir = tempdir().unwrap();
        let ws = workspace(dir.path());

        let content = "fn main() {\n    println!(\"héllo, wörld\");\n}\n";
        ws.write_file("src/main.rs", content).unwrap();
        assert_eq!(ws.read_file("src/main.rs").unwrap(), content);
        // Intermediate directory was created
        assert!(dir.path().join("src").is_dir());
    }

    #[test]
    fn test_read_latin1_fallback() {
        let dir = tempdir().unwrap();
        let ws = workspace(dir.path());

        // 0xE9 is 'é' in Latin-1 but invalid UTF-8
        fs::write(dir.path().join("legacy.txt"), b"caf\xe9").unwrap();
        assert_eq!(ws.read_file("legacy.txt").unwrap(), "café");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let ws = workspace(dir.path());
        assert!(matches!(
            ws.read_file("nope.txt"),
            Err(WorkspaceError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_file() {
        let dir = tempdir().unwrap();
        let ws = workspace(dir.path());

        ws.write_file("temp.txt", "x").unwrap();
        ws.delete_file("temp.txt").unwrap();
        assert!(!ws.file_exists("temp.txt"));
        // Deleting again is a reported failure, not a no-op success
        assert!(matches!(
            ws.delete_file("temp.txt"),
            Err(WorkspaceError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_files_applies_ignore_rules() {
        let dir = tempdir().unwrap();
        let ws = workspace(dir.path());

        ws.write_file("src/main.rs", "").unwrap();
        ws.write_file("src/lib.rs", "").unwrap();
        ws.write_file("notes.txt", "").unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git/config"), "").unwrap();
        fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        fs::write(dir.path().join("node_modules/pkg/index.js"), "").unwrap();
        fs::write(dir.path().join("src/old.pyc"), "").unwrap();

        let files = ws.list_files("*.rs", true);
        assert_eq!(
            files,
            vec![PathBuf::from("src/lib.rs"), PathBuf::from("src/main.rs")]
        );

        let all = ws.list_files("*", true);
        assert!(all.iter().all(|p| !p.starts_with(".git")));
        assert!(all.iter().all(|p| !p.starts_with("node_modules")));
        // The *.pyc glob applies to nested files by name too
        assert!(all.iter().all(|p| p.extension().map_or(true, |e| e != "pyc")));
    }

    #[test]
    fn test_list_files_non_recursive() {
        let dir = tempdir().unwrap();
        let ws = workspace(dir.path());

        ws.write_file("top.rs", "").unwrap();
        ws.write_file("nested/inner.rs", "").unwrap();

        let files = ws.list_files("*.rs", false);
        assert_eq!(files, vec![PathBuf::from("top.rs")]);
    }

    #[test]
    fn test_directory_ignore_pattern() {
        let dir = tempdir().unwrap();
        let ws = Workspace::new(dir.path(), &["build/".to_string()]).unwrap();

        ws.write_file("build/out.txt", "").unwrap();
        ws.write_file("keep.txt", "").unwrap();

        assert_eq!(ws.list_files("*.txt", true), vec![PathBuf::from("keep.txt")]);
    }

    #[test]
    fn test_search_substring_case_insensitive() {
        let dir = tempdir().unwrap();
        let ws = workspace(dir.path());

        ws.write_file("a.rs", "fn main() {}\nlet TODO_LIST = 1;\n")
            .unwrap();

        let hits = ws.search_in_files("todo", "*.rs", false, false);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].path, PathBuf::from("a.rs"));
        assert_eq!(hits[0].line, 2);
        assert_eq!(hits[0].text, "let TODO_LIST = 1;");
    }

    #[test]
    fn test_search_regex() {
        let dir = tempdir().unwrap();
        let ws = workspace(dir.path());

        ws.write_file("a.rs", "fn alpha() {}\nfn beta() {}\n").unwrap();

        let hits = ws.search_in_files(r"fn \w+\(\)", "*.rs", true, true);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_search_invalid_regex_returns_nothing() {
        let dir = tempdir().unwrap();
        let ws = workspace(dir.path());

        // The literal text would match by substring; the broken regex must
        // abort the whole search instead.
        ws.write_file("a.txt", "an [unclosed bracket\n").unwrap();
        let hits = ws.search_in_files("[unclosed", "*.txt", false, true);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_tree_orders_directories_first() {
        let dir = tempdir().unwrap();
        let ws = workspace(dir.path());

        ws.write_file("zeta.txt", "").unwrap();
        ws.write_file("alpha/inner.txt", "").unwrap();

        let tree = ws.get_tree(3);
        let lines: Vec<&str> = tree.lines().collect();
        assert!(lines[1].contains("alpha"));
        assert!(lines[2].contains("inner.txt"));
        assert!(lines[3].contains("zeta.txt"));
    }

    #[test]
    fn test_tree_respects_max_depth() {
        let dir = tempdir().unwrap();
        let ws = workspace(dir.path());

        ws.write_file("a/b/c/deep.txt", "").unwrap();
        let tree = ws.get_tree(2);
        assert!(tree.contains("b"));
        assert!(!tree.contains("deep.txt"));
    }

    #[test]
    fn test_count_lines() {
        let dir = tempdir().unwrap();
        let ws = workspace(dir.path());

        ws.write_file("a.rs", "// header\n\nfn main() {}\n").unwrap();
        ws.write_file("b.py", "# comment\nprint('hi')\n").unwrap();

        let stats = ws.count_lines("*");
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.total_lines, 5);
        assert_eq!(stats.comment_lines, 2);
        assert_eq!(stats.blank_lines, 1);
        assert_eq!(stats.code_lines, 2);
    }

    #[test]
    fn test_file_info() {
        let dir = tempdir().unwrap();
        let ws = workspace(dir.path());

        ws.write_file("doc.md", "hello").unwrap();
        let info = ws.file_info("doc.md").unwrap();
        assert_eq!(info.size, 5);
        assert!(info.is_file);
        assert_eq!(info.extension, "md");

        assert!(matches!(
            ws.file_info("missing.md"),
            Err(WorkspaceError::NotFound(_))
        ));
    }
}
