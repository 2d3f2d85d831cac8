//! File access for game resources
//!
//! Games address files with virtual, `/`-separated paths relative to the
//! mounted game directory. Reads fall through the write directory first so
//! saved files shadow shipped ones.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FsError {
    #[error("file not found: {0}")]
    NotFound(String),

    /// Absolute paths and `..` components are rejected
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Read/write access to game files.
pub trait FileSystem {
    fn read(&self, path: &str) -> Result<Vec<u8>, FsError>;

    fn write(&mut self, path: &str, data: &[u8]) -> Result<(), FsError>;

    fn exists(&self, path: &str) -> bool;
}

/// Normalize a virtual path into its components.
///
/// Leading `/` and `.` components are dropped; `..` is rejected.
pub fn normalize(path: &str) -> Result<Vec<&str>, FsError> {
    let mut parts = Vec::new();
    for part in path.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => return Err(FsError::InvalidPath(path.to_string())),
            p if p.contains(':') => return Err(FsError::InvalidPath(path.to_string())),
            p => parts.push(p),
        }
    }
    if parts.is_empty() {
        return Err(FsError::InvalidPath(path.to_string()));
    }
    Ok(parts)
}

/// Game directory on disk, optionally with a separate write directory.
#[derive(Debug, Clone)]
pub struct DirFileSystem {
    root: PathBuf,
    write_dir: Option<PathBuf>,
}

impl DirFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_dir: None,
        }
    }

    /// Send writes to `dir` instead of the game directory.
    pub fn with_write_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.write_dir = Some(dir.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory writes land in.
    pub fn write_root(&self) -> &Path {
        self.write_dir.as_deref().unwrap_or(&self.root)
    }

    fn resolve(base: &Path, path: &str) -> Result<PathBuf, FsError> {
        let mut full = base.to_path_buf();
        full.extend(normalize(path)?);
        Ok(full)
    }
}

impl FileSystem for DirFileSystem {
    fn read(&self, path: &str) -> Result<Vec<u8>, FsError> {
        let bases = self.write_dir.iter().chain(std::iter::once(&self.root));
        for base in bases {
            let full = Self::resolve(base, path)?;
            match fs::read(&full) {
                Ok(data) => return Ok(data),
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(source) => {
                    return Err(FsError::Io {
                        path: path.to_string(),
                        source,
                    });
                }
            }
        }
        Err(FsError::NotFound(path.to_string()))
    }

    fn write(&mut self, path: &str, data: &[u8]) -> Result<(), FsError> {
        let full = Self::resolve(self.write_root(), path)?;
        let io_err = |source| FsError::Io {
            path: path.to_string(),
            source,
        };
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&full, data).map_err(io_err)?;
        debug!("wrote {} bytes to {}", data.len(), full.display());
        Ok(())
    }

    fn exists(&self, path: &str) -> bool {
        self.write_dir
            .iter()
            .chain(std::iter::once(&self.root))
            .filter_map(|base| Self::resolve(base, path).ok())
            .any(|full| full.is_file())
    }
}

/// In-memory file system.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, replacing any previous contents.
    pub fn insert(&mut self, path: &str, data: impl Into<Vec<u8>>) -> Result<(), FsError> {
        self.files.insert(Self::key(path)?, data.into());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn key(path: &str) -> Result<String, FsError> {
        Ok(normalize(path)?.join("/"))
    }
}

impl FileSystem for MemoryFileSystem {
    fn read(&self, path: &str) -> Result<Vec<u8>, FsError> {
        self.files
            .get(&Self::key(path)?)
            .cloned()
            .ok_or_else(|| FsError::NotFound(path.to_string()))
    }

    fn write(&mut self, path: &str, data: &[u8]) -> Result<(), FsError> {
        self.insert(path, data)
    }

    fn exists(&self, path: &str) -> bool {
        Self::key(path).is_ok_and(|key| self.files.contains_key(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // =============================================================
    // Path normalization
    // =============================================================

    #[test]
    fn test_normalize_strips_root_and_dots() {
        assert_eq!(normalize("/gfx/./player.png").unwrap(), ["gfx", "player.png"]);
        assert_eq!(normalize("a\\b").unwrap(), ["a", "b"]);
    }

    #[test]
    fn test_normalize_rejects_escapes() {
        assert!(matches!(normalize("../secret"), Err(FsError::InvalidPath(_))));
        assert!(matches!(normalize("a/../../b"), Err(FsError::InvalidPath(_))));
        assert!(matches!(normalize("C:/windows"), Err(FsError::InvalidPath(_))));
        assert!(matches!(normalize("/"), Err(FsError::InvalidPath(_))));
    }

    // =============================================================
    // Directory file system
    // =============================================================

    #[test]
    fn test_dir_read_and_missing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("hello.txt"), b"hi").unwrap();
        let fs = DirFileSystem::new(dir.path());

        assert_eq!(fs.read("/hello.txt").unwrap(), b"hi");
        assert!(fs.exists("hello.txt"));
        assert!(matches!(fs.read("nope.txt"), Err(FsError::NotFound(_))));
        assert!(!fs.exists("nope.txt"));
    }

    #[test]
    fn test_dir_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let mut fs = DirFileSystem::new(dir.path());

        fs.write("shots/one.bmp", b"data").unwrap();
        assert_eq!(
            std::fs::read(dir.path().join("shots").join("one.bmp")).unwrap(),
            b"data"
        );
    }

    #[test]
    fn test_write_dir_shadows_game_dir() {
        let game = TempDir::new().unwrap();
        let save = TempDir::new().unwrap();
        std::fs::write(game.path().join("level.txt"), b"shipped").unwrap();

        let mut fs = DirFileSystem::new(game.path()).with_write_dir(save.path());
        assert_eq!(fs.read("level.txt").unwrap(), b"shipped");

        fs.write("level.txt", b"edited").unwrap();
        assert_eq!(fs.read("level.txt").unwrap(), b"edited");
        // The game directory is never written
        assert_eq!(
            std::fs::read(game.path().join("level.txt")).unwrap(),
            b"shipped"
        );
    }

    #[test]
    fn test_dir_write_rejects_escape() {
        let dir = TempDir::new().unwrap();
        let mut fs = DirFileSystem::new(dir.path());
        assert!(matches!(
            fs.write("../outside.txt", b"x"),
            Err(FsError::InvalidPath(_))
        ));
    }

    // =============================================================
    // Memory file system
    // =============================================================

    #[test]
    fn test_memory_paths_are_normalized() {
        let mut fs = MemoryFileSystem::new();
        fs.write("/a/b.txt", b"1").unwrap();
        assert_eq!(fs.read("a/./b.txt").unwrap(), b"1");
        assert!(fs.exists("a/b.txt"));
        assert!(!fs.exists("b.txt"));
        assert_eq!(fs.len(), 1);
    }
}
