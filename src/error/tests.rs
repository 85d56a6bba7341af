//! Tests for error types.

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("empty owner");
        assert_eq!(err.to_string(), "configuration error: empty owner");
    }

    #[test]
    fn test_storage_error_conversion() {
        let storage_err = StorageError::Unavailable("connection refused".to_string());
        let err: Error = storage_err.into();
        assert!(matches!(err, Error::Storage(_)));
    }

    #[test]
    fn test_scan_error_conversion() {
        let scan_err = ScanError::ReadDir {
            path: "/tmp/tree".to_string(),
            reason: "permission denied".to_string(),
        };
        let err: Error = scan_err.into();
        assert!(matches!(err, Error::Scan(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_storage_error_codec() {
        let err = StorageError::codec("VersionInfo", "missing field `size`");
        assert_eq!(
            err.to_string(),
            "codec error for VersionInfo: missing field `size`"
        );
    }

    #[test]
    fn test_storage_error_database() {
        let err = StorageError::Database("connection timeout".to_string());
        assert_eq!(err.to_string(), "database error: connection timeout");
    }

    #[test]
    fn test_storage_error_migration() {
        let err = StorageError::Migration("migration 001 failed".to_string());
        assert_eq!(err.to_string(), "migration error: migration 001 failed");
    }

    #[test]
    fn test_scan_error_read_file() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ScanError::read_file(std::path::Path::new("/tree/a.txt"), &io_err);
        assert_eq!(err.to_string(), "failed to read file '/tree/a.txt': denied");
    }

    #[test]
    fn test_scan_error_outside_root() {
        let err = ScanError::OutsideRoot {
            path: "/elsewhere".to_string(),
            root: "/tree".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "path '/elsewhere' is not under scan root '/tree'"
        );
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_ok() -> Result<i32> {
            Ok(42)
        }

        fn returns_err() -> Result<i32> {
            Err(Error::config("test error"))
        }

        assert!(returns_ok().is_ok());
        assert!(returns_err().is_err());
    }

    #[test]
    fn test_error_debug_format() {
        let err = Error::Internal("something went wrong".to_string());
        let debug_str = format!("{err:?}");
        assert!(debug_str.contains("Internal"));
        assert!(debug_str.contains("something went wrong"));
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn inner() -> Result<i32> {
            Err(Error::config("inner error"))
        }

        fn outer() -> Result<i32> {
            let _ = inner()?;
            Ok(0)
        }

        let result = outer();
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "configuration error: inner error"
        );
    }
}
