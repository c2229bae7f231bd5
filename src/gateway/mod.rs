//! Storage abstraction for version files
//!
//! Every version file strategy reads and writes through the [FileDataGateway]
//! trait, so tests can swap the filesystem for an in-memory store.
//!
//! # Overview
//!
//! - [fs::FsGateway]: the real filesystem
//! - [memory::MemoryGateway]: an in-memory fake for tests
//! - [DryRunGateway]: reads through another gateway and discards writes
//!
//! ```rust
//! # use revstamp::gateway::{FileDataGateway, MemoryGateway};
//! # use revstamp::encoding::{detect_encoding, TextEncoding};
//! # use std::path::Path;
//! # fn example() -> revstamp::Result<()> {
//! let gateway = MemoryGateway::new();
//! gateway.insert_text("package.json", "{\"version\": \"1.0.0\"}", TextEncoding::Utf8);
//! let values = detect_encoding(gateway.open_for_read(Path::new("package.json"))?)?;
//! let text = gateway.read_text(Path::new("package.json"), values.encoding)?;
//! # assert!(text.contains("1.0.0"));
//! # Ok(())
//! # }
//! ```

pub mod fs;
pub mod memory;

pub use fs::FsGateway;
pub use memory::MemoryGateway;

use std::io::Read;
use std::path::Path;

use crate::encoding::TextEncoding;
use crate::error::Result;
use crate::ui;

/// Read/write boundary between the rewrite engine and storage.
pub trait FileDataGateway {
    /// Opens a stream over the start of a file.
    ///
    /// Only the first two bytes are significant; implementations may return
    /// a stream limited to them.
    fn open_for_read(&self, path: &Path) -> Result<Box<dyn Read + '_>>;

    /// Reads the whole file as text in the given encoding.
    ///
    /// A BOM at the start of the file is kept as a leading `U+FEFF`.
    fn read_text(&self, path: &Path, encoding: TextEncoding) -> Result<String>;

    /// Replaces the file contents with `text` in the given encoding.
    fn write_text(&self, path: &Path, text: &str, encoding: TextEncoding) -> Result<()>;
}

impl<T: FileDataGateway + ?Sized> FileDataGateway for &T {
    fn open_for_read(&self, path: &Path) -> Result<Box<dyn Read + '_>> {
        (**self).open_for_read(path)
    }

    fn read_text(&self, path: &Path, encoding: TextEncoding) -> Result<String> {
        (**self).read_text(path, encoding)
    }

    fn write_text(&self, path: &Path, text: &str, encoding: TextEncoding) -> Result<()> {
        (**self).write_text(path, text, encoding)
    }
}

/// Gateway that reads through `inner` but only reports writes.
pub struct DryRunGateway<G> {
    inner: G,
}

impl<G: FileDataGateway> DryRunGateway<G> {
    pub fn new(inner: G) -> Self {
        DryRunGateway { inner }
    }
}

impl<G: FileDataGateway> FileDataGateway for DryRunGateway<G> {
    fn open_for_read(&self, path: &Path) -> Result<Box<dyn Read + '_>> {
        self.inner.open_for_read(path)
    }

    fn read_text(&self, path: &Path, encoding: TextEncoding) -> Result<String> {
        self.inner.read_text(path, encoding)
    }

    fn write_text(&self, path: &Path, _text: &str, encoding: TextEncoding) -> Result<()> {
        ui::display_status(&format!(
            "Dry run: would write {} ({})",
            path.display(),
            encoding.label()
        ));
        Ok(())
    }
}
