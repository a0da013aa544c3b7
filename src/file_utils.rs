use anyhow::{Result, Context};
use std::fs;
use std::path::Path;

// @module: File utilities for line-oriented text files

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
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

    /// Read a file as an ordered sequence of lines.
    ///
    /// Malformed byte sequences are replaced rather than aborting the read.
    /// CRLF endings are normalized and a final newline does not produce a
    /// trailing empty line. Blank lines in the body are preserved.
    pub fn read_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let bytes = fs::read(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(text.lines().map(|line| line.to_string()).collect())
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }

    /// Overwrite a file with the given lines joined by newlines plus one
    /// trailing newline. Full rewrite, never an append: a partial file from a
    /// prior crash is replaced wholesale by a complete snapshot.
    pub fn write_lines<P: AsRef<Path>>(path: P, lines: &[String]) -> Result<()> {
        let mut content = lines.join("\n");
        content.push('\n');
        Self::write_to_file(path, &content)
    }
}
