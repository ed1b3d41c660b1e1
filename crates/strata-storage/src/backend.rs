//! Injectable file operations.
//!
//! All persistence goes through a [`StorageBackend`] with paths relative to
//! the backend's root, so the world can be saved to a real directory or kept
//! entirely in memory for tests.

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

/// Minimal filesystem surface used by world persistence.
pub trait StorageBackend {
    /// Reads a whole file. Returns `Ok(None)` if it does not exist.
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>>;

    /// Creates or truncates a file. The parent directory must already exist.
    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()>;

    /// Creates a directory and all of its parents. Succeeds if it exists.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

// ---------------------------------------------------------------------------
// Disk
// ---------------------------------------------------------------------------

/// Real filesystem under a root directory.
#[derive(Clone, Debug)]
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl StorageBackend for DiskStorage {
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        match std::fs::read(self.root.join(path)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        std::fs::write(self.root.join(path), data)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(self.root.join(path))
    }
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct MemoryFs {
    files: FxHashMap<PathBuf, Vec<u8>>,
    dirs: FxHashSet<PathBuf>,
}

/// In-memory filesystem. Clones share the same contents.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    fs: Rc<RefCell<MemoryFs>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files written so far.
    pub fn file_count(&self) -> usize {
        self.fs.borrow().files.len()
    }

    /// Returns a copy of a stored file, if present.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.fs.borrow().files.get(path.as_ref()).cloned()
    }

    /// Overwrites or creates a file directly, bypassing the directory check.
    pub fn put_file(&self, path: impl Into<PathBuf>, data: Vec<u8>) {
        self.fs.borrow_mut().files.insert(path.into(), data);
    }

    /// Drops a file, as if it were deleted on disk.
    pub fn remove_file(&self, path: impl AsRef<Path>) -> bool {
        self.fs.borrow_mut().files.remove(path.as_ref()).is_some()
    }
}

impl StorageBackend for MemoryStorage {
    fn read(&self, path: &Path) -> io::Result<Option<Vec<u8>>> {
        Ok(self.fs.borrow().files.get(path).cloned())
    }

    fn write(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        let mut fs = self.fs.borrow_mut();
        let parent = path.parent().unwrap_or(Path::new(""));
        if !parent.as_os_str().is_empty() && !fs.dirs.contains(parent) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory {} does not exist", parent.display()),
            ));
        }
        fs.files.insert(path.to_path_buf(), data.to_vec());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut fs = self.fs.borrow_mut();
        for ancestor in path.ancestors() {
            if !ancestor.as_os_str().is_empty() {
                fs.dirs.insert(ancestor.to_path_buf());
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
