// Application state module
// Shared, read-mostly state handed to every connection

use std::io;
use std::path::PathBuf;

use super::types::Config;
use crate::server::ShutdownSignal;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical serving root
    pub root: PathBuf,
    /// Owned by the listener; handlers may only request shutdown
    pub shutdown: ShutdownSignal,
}

impl AppState {
    /// Create state, resolving the serving root
    ///
    /// Fails when the root does not exist or is not a directory.
    pub fn new(config: Config) -> io::Result<Self> {
        let configured = config.serve.root.clone();
        let root = configured.canonicalize().map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("Serving root '{}': {e}", configured.display()),
            )
        })?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Serving root '{}' is not a directory", root.display()),
            ));
        }

        Ok(Self {
            config,
            root,
            shutdown: ShutdownSignal::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_canonicalized() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir(dir.path().join("web")).expect("mkdir");

        let mut config = Config::default();
        config.serve.root = dir.path().join("web/../web");
        let state = AppState::new(config).expect("state");
        assert_eq!(state.root, dir.path().canonicalize().expect("canon").join("web"));
        assert!(!state.shutdown.is_requested());
    }

    #[test]
    fn test_invalid_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("file.txt");
        std::fs::write(&file, b"x").expect("write");

        let mut config = Config::default();
        config.serve.root = dir.path().join("missing");
        assert!(AppState::new(config.clone()).is_err());

        config.serve.root = file;
        let err = AppState::new(config).err().expect("not a directory");
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
