use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

use crate::translation::core::INCLUDES_DIR;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed; a concurrent creator is fine
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {:?}", path))
    }

    // @generates: Mirrored output path `<root>/<lang>/<relative>`
    pub fn output_path_for<P1: AsRef<Path>, P2: AsRef<Path>>(
        source_root: P1,
        source_file: P2,
        lang_code: &str,
    ) -> Result<PathBuf> {
        let source_root = source_root.as_ref();
        let relative = Self::relative_path(source_root, source_file)?;
        Ok(source_root.join(lang_code).join(relative))
    }

    // @generates: Where an include fragment lives after relocation
    // `<root>/includes/<rest>` -> `<root>/includes/<lang>/<rest>`
    pub fn relocated_include_path<P: AsRef<Path>>(source_root: P, relative: &Path, lang_code: &str) -> Option<PathBuf> {
        let rest = relative.strip_prefix(INCLUDES_DIR).ok()?;
        Some(source_root.as_ref().join(INCLUDES_DIR).join(lang_code).join(rest))
    }

    /// Path of `file` relative to `root`
    pub fn relative_path<P1: AsRef<Path>, P2: AsRef<Path>>(root: P1, file: P2) -> Result<PathBuf> {
        let (root, file) = (root.as_ref(), file.as_ref());
        file.strip_prefix(root)
            .map(Path::to_path_buf)
            .with_context(|| format!("{:?} is not under {:?}", file, root))
    }

    /// Relative path rendered with `/` separators on every platform
    pub fn slash_path(relative: &Path) -> String {
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Whether a relative path matches one of the exclusion patterns
    ///
    /// A pattern matches at the start of the path or right after a `/`, so
    /// `ref/` excludes `ref/api.md` and `guide/ref/x.md` but not `xref/x.md`.
    pub fn is_excluded(relative: &Path, patterns: &[String]) -> bool {
        let path = Self::slash_path(relative);
        patterns.iter().any(|pattern| {
            path.starts_with(pattern.as_str()) || path.contains(&format!("/{}", pattern))
        })
    }

    /// Whether the file has the `.md` extension
    pub fn is_markdown<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().extension().is_some_and(|ext| ext == "md")
    }

    /// Find Markdown files under `dir`, never descending into `pruned` directories
    pub fn find_markdown_files<P: AsRef<Path>>(dir: P, pruned: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        let walker = WalkDir::new(dir.as_ref())
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !(entry.file_type().is_dir() && pruned.iter().any(|p| p == entry.path())));

        for entry in walker {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if entry.file_type().is_file() && Self::is_markdown(path) {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Last modification time of a file
    pub fn modified_time<P: AsRef<Path>>(path: P) -> Result<SystemTime> {
        let path = path.as_ref();
        fs::metadata(path)
            .and_then(|m| m.modified())
            .with_context(|| format!("Failed to read modification time: {:?}", path))
    }

    /// An output is up to date when it exists and is not older than its source
    ///
    /// Equal timestamps count as up to date.
    pub fn is_up_to_date<P1: AsRef<Path>, P2: AsRef<Path>>(source: P1, output: P2) -> Result<bool> {
        let output = output.as_ref();
        if !output.is_file() {
            return Ok(false);
        }
        Ok(Self::modified_time(output)? >= Self::modified_time(source)?)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
