use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use crate::encoding::TextEncoding;
use crate::error::Result;
use crate::gateway::FileDataGateway;

/// Gateway backed by the real filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsGateway;

impl FsGateway {
    pub fn new() -> Self {
        FsGateway
    }
}

impl FileDataGateway for FsGateway {
    fn open_for_read(&self, path: &Path) -> Result<Box<dyn Read + '_>> {
        let file = File::open(path)?;
        Ok(Box::new(file.take(2)))
    }

    fn read_text(&self, path: &Path, encoding: TextEncoding) -> Result<String> {
        let bytes = fs::read(path)?;
        encoding.decode(&bytes)
    }

    fn write_text(&self, path: &Path, text: &str, encoding: TextEncoding) -> Result<()> {
        fs::write(path, encoding.encode(text))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::detect_encoding;
    use tempfile::TempDir;

    #[test]
    fn test_round_trip_utf16le() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.rc");
        let gateway = FsGateway::new();

        gateway
            .write_text(&path, "\u{feff}FILEVERSION 1,0,0,1\r\n", TextEncoding::Utf16Le)
            .unwrap();

        let values = detect_encoding(gateway.open_for_read(&path).unwrap()).unwrap();
        assert_eq!(values.encoding, TextEncoding::Utf16Le);
        assert_eq!(
            gateway.read_text(&path, values.encoding).unwrap(),
            "\u{feff}FILEVERSION 1,0,0,1\r\n"
        );
    }

    #[test]
    fn test_open_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = FsGateway::new()
            .open_for_read(&dir.path().join("missing.json"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("I/O error"));
    }
}
