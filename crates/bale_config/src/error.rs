//! Error types for configuration loading.

use std::path::PathBuf;

/// Errors that can occur while discovering or parsing configuration files.
///
/// A candidate file that simply does not exist is not an error; the
/// loader reports that as `Ok(None)`. These variants cover files that
/// exist but cannot be read or parsed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading a configuration file.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration file exists but could not be parsed.
    #[error("failed to parse config file {path}: {reason}")]
    Parse {
        /// The file that could not be parsed.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_display() {
        let err = ConfigError::Io {
            path: PathBuf::from("/project/.balerc"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains(".balerc"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn parse_display() {
        let err = ConfigError::Parse {
            path: PathBuf::from("bale.toml"),
            reason: "unexpected eof".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("bale.toml"));
        assert!(msg.contains("unexpected eof"));
    }
}
