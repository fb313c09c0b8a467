//! Source scanning helpers for layering rules.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// One offending source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub file: String,
    pub line: usize,
    pub text: String,
}

impl fmt::Display for Hit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.line, self.text.trim())
    }
}

fn root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn display_path(path: &Path) -> String {
    path.strip_prefix(root())
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn push_sources(dir: &Path, out: &mut Vec<PathBuf>) {
    let entries =
        fs::read_dir(dir).unwrap_or_else(|e| panic!("failed to read dir {}: {e}", dir.display()));
    for entry in entries {
        let path = entry
            .unwrap_or_else(|e| panic!("failed to read dir entry: {e}"))
            .path();
        if path.is_dir() {
            push_sources(&path, out);
        } else if path.extension().is_some_and(|ext| ext == "rs") {
            out.push(path);
        }
    }
}

/// Every `.rs` file under a directory relative to the crate root, sorted.
pub fn rust_sources(relative_dir: &str) -> Vec<PathBuf> {
    let mut files = Vec::new();
    push_sources(&root().join(relative_dir), &mut files);
    files.sort();
    files
}

/// Scan lines of every source file, keeping those `matches` accepts.
fn scan(files: &[PathBuf], mut matches: impl FnMut(&str) -> bool) -> Vec<Hit> {
    files
        .iter()
        .flat_map(|file| {
            let content = fs::read_to_string(file)
                .unwrap_or_else(|e| panic!("failed to read {}: {e}", file.display()));
            let name = display_path(file);
            content
                .lines()
                .enumerate()
                .map(|(idx, text)| Hit {
                    file: name.clone(),
                    line: idx + 1,
                    text: text.to_string(),
                })
                .collect::<Vec<_>>()
        })
        .filter(|hit| matches(&hit.text))
        .collect()
}

/// Lines under `relative_dir` containing any of `patterns`.
pub fn find_lines_containing(relative_dir: &str, patterns: &[&str]) -> Vec<Hit> {
    scan(&rust_sources(relative_dir), |line| {
        patterns.iter().any(|p| line.contains(p))
    })
}

pub fn path_exists(relative_path: &str) -> bool {
    root().join(relative_path).exists()
}

pub fn read_relative(relative_path: &str) -> String {
    fs::read_to_string(root().join(relative_path))
        .unwrap_or_else(|e| panic!("failed to read {relative_path}: {e}"))
}

/// Lines in `mod.rs` files that are not module declarations, re-exports,
/// attributes or comments.
pub fn find_non_export_lines_in_mod_files(relative_dir: &str) -> Vec<Hit> {
    let mod_files: Vec<PathBuf> = rust_sources(relative_dir)
        .into_iter()
        .filter(|f| f.file_name().is_some_and(|n| n == "mod.rs"))
        .collect();

    // Tracks continuation lines of a multi-line `pub use a::{...};`.
    let mut in_use_list = false;
    scan(&mod_files, |raw| {
        let line = raw.trim();
        if in_use_list {
            in_use_list = !line.ends_with(';');
            return false;
        }
        if line.starts_with("pub use ") {
            in_use_list = !line.ends_with(';');
            return false;
        }
        !(line.is_empty()
            || line.starts_with("//")
            || line.starts_with("pub mod ")
            || line.starts_with("mod ")
            || line.starts_with("#[cfg"))
    })
}
