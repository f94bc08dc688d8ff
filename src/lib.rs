//!Serve single lines of large files using a line index built once at startup

pub mod config;
pub mod error;
/// A line index over a file on disk
pub mod file;
/// The index of files
pub mod index;
/// HTTP routes exposing a `ReadByLine` store
pub mod server;
/// An indexed in-memory reader
pub mod string;

pub use error::Error;
pub use file::LineFile;
pub use index::Index;
pub use string::IndexedString;

use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, error::Error>;

pub trait Indexable {
    /// Returns a reference to the index.
    fn get_index(&self) -> &Index;

    /// Returns the total amount of lines.
    #[inline]
    fn total_lines(&self) -> usize {
        self.get_index().len()
    }
}

/// A trait defining behavior for reading certain lines directly from indexed data. Reads take
/// `&self` so a single store can serve any amount of concurrent lookups.
#[async_trait]
pub trait ReadByLine: Indexable + Sync {
    /// Appends the given line to `buf`, omitting the trailing \n. Returns the amount of bytes
    /// appended.
    async fn read_line_raw(&self, line: usize, buf: &mut Vec<u8>) -> Result<usize>;

    /// Reads the given line
    async fn read_line(&self, line: usize) -> Result<String> {
        let mut read_data = Vec::new();
        self.read_line_raw(line, &mut read_data).await?;
        String::from_utf8(read_data).map_err(|_| error::Error::InvalidUtf8 { line })
    }

    /// Reads the given line, returning `None` if `line` is negative or not smaller than
    /// `total_lines()`.
    async fn get_line(&self, line: i64) -> Result<Option<String>> {
        let line = match usize::try_from(line) {
            Ok(line) if line < self.total_lines() => line,
            _ => return Ok(None),
        };
        self.read_line(line).await.map(Some)
    }
}
