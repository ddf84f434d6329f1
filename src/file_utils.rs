use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file, creating parent directories as needed
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Find markdown files under a directory tree, sorted for stable order
    pub fn find_markdown_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case("md") {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    // @generates: Output path for a translated document
    // @params: input_file, output_dir, target_language
    //
    // README.md + "ko" -> <output_dir>/README.ko.md
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        target_language: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let output_dir = output_dir.as_ref();

        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(target_language);
        output_filename.push_str(".md");

        output_dir.join(output_filename)
    }

    /// Catalog path for an output document: same location, `.po` extension
    pub fn catalog_path_for<P: AsRef<Path>>(output_file: P) -> PathBuf {
        output_file.as_ref().with_extension("po")
    }

    /// Map a source file to its mirrored path under another root.
    ///
    /// Used by directory mode: output and catalog trees mirror the source
    /// tree structure.
    pub fn mirror_path<P1: AsRef<Path>, P2: AsRef<Path>, P3: AsRef<Path>>(
        source_file: P1,
        source_root: P2,
        target_root: P3,
    ) -> Result<PathBuf> {
        let relative = source_file
            .as_ref()
            .strip_prefix(source_root.as_ref())
            .with_context(|| {
                format!(
                    "File {:?} is not under source root {:?}",
                    source_file.as_ref(),
                    source_root.as_ref()
                )
            })?;
        Ok(target_root.as_ref().join(relative))
    }
}
