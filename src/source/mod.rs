//! Script inputs for a scan.
//!
//! A scan consumes an ordered list of [`ScriptSource`] values. How they were
//! obtained (a browser session, a crawler, files on disk) does not matter to the
//! analyzers; this module only provides the disk-based loaders the CLI uses.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use scriptscope::source::load_paths;
//!
//! let scripts = load_paths(&[PathBuf::from("./dump")])?;
//! println!("Loaded {} scripts", scripts.len());
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tree_sitter::Language;
use walkdir::WalkDir;

use crate::analysis::{AnalysisError, AnalysisResult};

/// A single script handed to the scanner: where it came from plus its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSource {
    /// URL or path identifying the script. Used for naming-convention checks and messages.
    pub identifier: String,
    /// Full source text.
    pub source_text: String,
}

impl ScriptSource {
    /// Create a new script source.
    pub fn new(identifier: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            source_text: source_text.into(),
        }
    }

    /// Create a source for the `index`-th inline `<script>` of a page.
    pub fn inline(page_url: &str, index: usize, source_text: impl Into<String>) -> Self {
        Self::new(format!("{}#inline-{}", page_url, index), source_text)
    }

    /// The grammar this script should be parsed with.
    pub fn language(&self) -> SourceLanguage {
        SourceLanguage::from_identifier(&self.identifier)
    }
}

/// Language type for script parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceLanguage {
    JavaScript,
    TypeScript,
    Tsx,
}

impl SourceLanguage {
    /// All languages a pattern must be compiled for.
    pub const ALL: [SourceLanguage; 3] = [
        SourceLanguage::JavaScript,
        SourceLanguage::TypeScript,
        SourceLanguage::Tsx,
    ];

    /// Determine language from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "js" | "mjs" | "cjs" | "jsx" => Some(SourceLanguage::JavaScript),
            "ts" | "mts" | "cts" => Some(SourceLanguage::TypeScript),
            "tsx" => Some(SourceLanguage::Tsx),
            _ => None,
        }
    }

    /// Determine language from a URL or path, defaulting to JavaScript.
    ///
    /// Query strings and fragments are ignored, so `app.ts?v=3` is TypeScript
    /// and `https://example.com/#inline-0` is JavaScript.
    pub fn from_identifier(identifier: &str) -> Self {
        let path = identifier
            .split(['?', '#'])
            .next()
            .unwrap_or(identifier);
        let file_name = path.rsplit('/').next().unwrap_or(path);

        file_name
            .rsplit_once('.')
            .and_then(|(_, ext)| Self::from_extension(ext))
            .unwrap_or(SourceLanguage::JavaScript)
    }

    /// Get tree-sitter language for this source language.
    pub fn tree_sitter_language(&self) -> Language {
        match self {
            SourceLanguage::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            SourceLanguage::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            SourceLanguage::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Load a single script file. The identifier is the path as given.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn load_file(path: &Path) -> AnalysisResult<ScriptSource> {
    let bytes = fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes).into_owned();
    Ok(ScriptSource::new(path.display().to_string(), content))
}

/// Load scripts from a list of files and directories.
///
/// Files are loaded as-is, whatever their extension. Directories are walked
/// in file-name order and only script extensions are kept. Unreadable files
/// inside a directory are logged and skipped; an unreadable top-level path is
/// an error.
pub fn load_paths(paths: &[PathBuf]) -> AnalysisResult<Vec<ScriptSource>> {
    let mut scripts = Vec::new();

    for path in paths {
        if path.is_dir() {
            scripts.extend(load_dir(path)?);
        } else if path.exists() {
            scripts.push(load_file(path)?);
        } else {
            return Err(AnalysisError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no such file or directory: {}", path.display()),
            )));
        }
    }

    Ok(scripts)
}

/// Load every script file beneath `root`.
pub fn load_dir(root: &Path) -> AnalysisResult<Vec<ScriptSource>> {
    let mut scripts = Vec::new();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_ignored_dir(e))
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if path.is_dir() {
            continue;
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if SourceLanguage::from_extension(ext).is_none() {
            continue;
        }

        match load_file(path) {
            Ok(script) => scripts.push(script),
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
            }
        }
    }

    tracing::debug!("Loaded {} script(s) from {}", scripts.len(), root.display());
    Ok(scripts)
}

/// Check if a directory should be ignored during traversal.
fn is_ignored_dir(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }

    let name = entry.file_name().to_string_lossy();
    matches!(name.as_ref(), "node_modules" | ".git")
}
