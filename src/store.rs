// Directory-scoped file store backing the /files routes
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file not found")]
    NotFound,
    #[error("filesystem error: {0}")]
    Io(#[from] io::Error),
}

/// Resolves relative names under a single served root directory. The root is
/// fixed at startup and shared read-only across connections.
#[derive(Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileStore { root: root.into() }
    }

    fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.resolve(name).exists()
    }

    pub fn read(&self, name: &str) -> std::result::Result<Vec<u8>, StoreError> {
        match fs::read(self.resolve(name)) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Overwrites any existing file, fixed 0755 mode.
    pub fn write(&self, name: &str, contents: &[u8]) -> std::result::Result<(), StoreError> {
        let path = self.resolve(name);
        fs::write(&path, contents)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        }
        Ok(())
    }
}
