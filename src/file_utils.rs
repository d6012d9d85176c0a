use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

// @module: File and directory utilities

/// Base name of the source media inside a session directory
pub const SESSION_VIDEO_STEM: &str = "video";

/// Media extensions a session video may carry, in lookup order
pub const VIDEO_EXTENSIONS: [&str; 3] = ["mp4", "mkv", "webm"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write content through a temporary file in the target directory, then
    /// rename it over the target. Readers see either the old or the new file.
    pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
        let target = path.as_ref();
        let parent = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        fs::write(temp.path(), content)?;
        temp.as_file().sync_all()?;
        temp.persist(target).map_err(|e| e.error)?;
        Ok(())
    }

    /// Copy a file from one location to another, ensuring the target directory exists
    pub fn copy_file<P1: AsRef<Path>, P2: AsRef<Path>>(from: P1, to: P2) -> Result<()> {
        let from = from.as_ref();
        let to = to.as_ref();

        if !from.is_file() {
            return Err(anyhow::anyhow!("Source file does not exist: {:?}", from));
        }

        // Ensure the target directory exists
        if let Some(parent) = to.parent() {
            Self::ensure_dir(parent)?;
        }

        fs::copy(from, to)
            .with_context(|| format!("Failed to copy {:?} to {:?}", from, to))?;

        Ok(())
    }

    /// Remove a file, treating an already missing file as removed
    pub fn remove_file<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => {
                Err(e).with_context(|| format!("Failed to remove {:?}", path))
            }
            _ => Ok(()),
        }
    }

    /// Whether the path carries one of the session video extensions
    pub fn is_video_file<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                VIDEO_EXTENSIONS.contains(&ext.as_str())
            })
            .unwrap_or(false)
    }

    /// Locate the source media inside a session directory.
    ///
    /// Tries `video.mp4`, `video.mkv`, `video.webm` in order, then any file
    /// starting with `video` that has one of those extensions.
    pub fn find_session_video<P: AsRef<Path>>(session_dir: P) -> Result<Option<PathBuf>> {
        let session_dir = session_dir.as_ref();

        for ext in VIDEO_EXTENSIONS {
            let candidate = session_dir.join(format!("{}.{}", SESSION_VIDEO_STEM, ext));
            if candidate.is_file() {
                return Ok(Some(candidate));
            }
        }

        if !session_dir.is_dir() {
            return Ok(None);
        }

        let mut fallback: Vec<PathBuf> = fs::read_dir(session_dir)
            .with_context(|| format!("Failed to list session directory: {}", session_dir.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && Self::is_video_file(path)
                    && path
                        .file_name()
                        .map(|name| name.to_string_lossy().starts_with(SESSION_VIDEO_STEM))
                        .unwrap_or(false)
            })
            .collect();

        // Directory order is unspecified
        fallback.sort();
        Ok(fallback.into_iter().next())
    }
}
