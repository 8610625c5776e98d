use std::path::Path;

use tracing::{debug, warn};

use crate::TransferError;

/// Validates that `file_path` names an existing regular file and returns its size.
///
/// Rejects:
/// - Empty paths
/// - Paths that do not exist
/// - Directories and other non-regular files
pub fn validate_upload_file(file_path: &Path) -> Result<u64, TransferError> {
    if file_path.as_os_str().is_empty() {
        return Err(TransferError::InvalidPath("empty path".into()));
    }

    let metadata = match std::fs::metadata(file_path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(TransferError::InvalidPath(format!(
                "file not found: {}",
                file_path.display()
            )));
        }
        Err(e) => return Err(e.into()),
    };

    if !metadata.is_file() {
        return Err(TransferError::InvalidPath(format!(
            "not a regular file: {}",
            file_path.display()
        )));
    }

    let size = metadata.len();
    if size == 0 {
        warn!(path = %file_path.display(), "upload file is empty");
    }
    debug!(path = %file_path.display(), bytes = size, "upload file validated");
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rejects_empty_path() {
        let result = validate_upload_file(Path::new(""));
        assert!(matches!(result, Err(TransferError::InvalidPath(_))));
    }

    #[test]
    fn rejects_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = validate_upload_file(&dir.path().join("firmware.bin")).unwrap_err();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn rejects_directory() {
        let dir = TempDir::new().unwrap();
        let err = validate_upload_file(dir.path()).unwrap_err();
        assert!(err.to_string().contains("not a regular file"));
    }

    #[test]
    fn accepts_regular_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("firmware.bin");
        std::fs::write(&path, b"\x7fELF....").unwrap();
        assert_eq!(validate_upload_file(&path).unwrap(), 8);
    }

    #[test]
    fn accepts_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.bin");
        std::fs::write(&path, b"").unwrap();
        assert_eq!(validate_upload_file(&path).unwrap(), 0);
    }
}
