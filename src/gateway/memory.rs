use std::collections::HashMap;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::encoding::{detect_encoding, TextEncoding};
use crate::error::Result;
use crate::gateway::FileDataGateway;

/// In-memory gateway for testing without touching the filesystem
#[derive(Debug, Default)]
pub struct MemoryGateway {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
}

impl MemoryGateway {
    /// Create a new empty gateway
    pub fn new() -> Self {
        MemoryGateway {
            files: Mutex::new(HashMap::new()),
        }
    }

    /// Store raw bytes at a path
    pub fn insert_bytes(&self, path: impl Into<PathBuf>, bytes: Vec<u8>) {
        self.lock().insert(path.into(), bytes);
    }

    /// Store text encoded with `encoding`; a leading `U+FEFF` becomes a BOM
    pub fn insert_text(&self, path: impl Into<PathBuf>, text: &str, encoding: TextEncoding) {
        self.insert_bytes(path, encoding.encode(text));
    }

    /// Raw bytes currently stored at a path
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.lock().get(path.as_ref()).cloned()
    }

    /// Stored text, decoded with the encoding its BOM implies
    pub fn text(&self, path: impl AsRef<Path>) -> Option<String> {
        let bytes = self.contents(path)?;
        let values = detect_encoding(Cursor::new(&bytes)).ok()?;
        values.encoding.decode(&bytes).ok()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Vec<u8>>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bytes_at(&self, path: &Path) -> Result<Vec<u8>> {
        self.contents(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )
            .into()
        })
    }
}

impl FileDataGateway for MemoryGateway {
    fn open_for_read(&self, path: &Path) -> Result<Box<dyn Read + '_>> {
        let bytes = self.bytes_at(path)?;
        Ok(Box::new(Cursor::new(bytes)))
    }

    fn read_text(&self, path: &Path, encoding: TextEncoding) -> Result<String> {
        encoding.decode(&self.bytes_at(path)?)
    }

    fn write_text(&self, path: &Path, text: &str, encoding: TextEncoding) -> Result<()> {
        self.insert_bytes(path, encoding.encode(text));
        Ok(())
    }
}
