use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The file could not be opened or scanned while building the index
    #[error("failed to index {}: {source}", path.display())]
    Build {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file could not be opened, seeked or read while looking up a line
    #[error("failed to read line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: io::Error,
    },

    /// The file changed after indexing and the recorded offset no longer points to the line
    #[error("line {line} no longer matches the index, the file was modified or truncated")]
    Truncated { line: usize },

    #[error("line {line} is not valid UTF-8")]
    InvalidUtf8 { line: usize },

    /// On request for a non existing index entry
    #[error("no index entry for line {0}")]
    OutOfBounds(usize),
}

impl Error {
    /// Returns `true` for errors raised by a lookup on an already built index.
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Error::Read { .. } | Error::Truncated { .. } | Error::InvalidUtf8 { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let build = Error::Build {
            path: PathBuf::from("missing.txt"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(!build.is_lookup_failure());
        assert!(build.to_string().contains("missing.txt"));

        assert!(Error::Truncated { line: 3 }.is_lookup_failure());
        assert!(Error::InvalidUtf8 { line: 0 }.is_lookup_failure());
        assert!(!Error::OutOfBounds(7).is_lookup_failure());
    }
}
