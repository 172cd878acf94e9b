use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarkerError {
    #[error("validation marker {} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("unable to create validation marker {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Whether an earlier stage of this run already recorded a confirmation.
pub fn marker_exists(path: &Path) -> bool {
    path.exists()
}

/// Record a confirmation. Creating the same marker twice is an error.
pub fn create_marker(path: &Path) -> Result<(), MarkerError> {
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            Err(MarkerError::AlreadyExists(path.to_path_buf()))
        }
        Err(source) => Err(MarkerError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_is_created_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("validated");

        assert!(!marker_exists(&path));
        create_marker(&path).expect("first create");
        assert!(marker_exists(&path));

        let err = create_marker(&path).unwrap_err();
        assert!(matches!(err, MarkerError::AlreadyExists(_)));
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nope").join("validated");

        let err = create_marker(&path).unwrap_err();
        assert!(matches!(err, MarkerError::Io { .. }));
    }
}
