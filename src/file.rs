use std::{
    io::SeekFrom,
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use async_std::{
    fs,
    io::{self, prelude::*, BufReader},
};
use async_trait::async_trait;
use memchr::memchr;
use tracing::{info, warn};

use crate::{error::Error, index::Index, Indexable, ReadByLine, Result};

/// A line index over a file on disk which implements `ReadByLine`.
///
/// The file is scanned once by `open`. It is not kept open afterwards: every lookup opens its own
/// handle, seeks to the recorded offset and reads exactly the indexed line, so lookups never share
/// a cursor and can run concurrently.
#[derive(Debug, Clone)]
pub struct LineFile {
    path: PathBuf,
    index: Arc<Index>,
}

impl LineFile {
    /// Open a file and build its line index.
    ///
    /// Returns `Error::Build` if the file can't be opened or read.
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<LineFile> {
        let path = path.as_ref().to_path_buf();
        let start = Instant::now();

        let index = Self::build_index(&path)
            .await
            .map_err(|source| Error::Build {
                path: path.clone(),
                source,
            })?;

        info!(
            path = %path.display(),
            lines = index.len(),
            bytes = index.len_bytes(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "built line index"
        );

        Ok(Self {
            path,
            index: Arc::new(index),
        })
    }

    async fn build_index(path: &Path) -> io::Result<Index> {
        let mut reader = BufReader::new(fs::File::open(path.as_os_str()).await?);
        Index::build(&mut reader).await
    }

    /// Path of the indexed file
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Indexable for LineFile {
    #[inline]
    fn get_index(&self) -> &Index {
        &self.index
    }
}

#[async_trait]
impl ReadByLine for LineFile {
    async fn read_line_raw(&self, line: usize, buf: &mut Vec<u8>) -> Result<usize> {
        let (start, next) = self.index.span(line)?;
        let end = next.unwrap_or_else(|| self.index.len_bytes());
        // Get space between current start index and next lines start index. The result is the
        // amount of bytes we have to read.
        let need_read = (end - start) as usize;

        let read_err = |source: io::Error| Error::Read { line, source };

        let mut file = fs::File::open(self.path.as_os_str())
            .await
            .map_err(read_err)?;
        file.seek(SeekFrom::Start(start)).await.map_err(read_err)?;

        let before = buf.len();
        buf.resize(before + need_read, 0);

        if let Err(e) = file.read_exact(&mut buf[before..]).await {
            buf.truncate(before);
            if e.kind() == io::ErrorKind::UnexpectedEof {
                warn!(line, path = %self.path.display(), "file is shorter than its index");
                return Err(Error::Truncated { line });
            }
            return Err(read_err(e));
        }

        let read = &buf[before..];
        let ends_with_newline = read.last() == Some(&b'\n');
        let content = if ends_with_newline {
            &read[..read.len() - 1]
        } else {
            read
        };

        // Every line but the last one has to end where the next one starts, and a \n may only
        // appear as the very last byte of the span
        if memchr(b'\n', content).is_some() || (next.is_some() && !ends_with_newline) {
            buf.truncate(before);
            warn!(line, path = %self.path.display(), "line no longer ends at its indexed offset");
            return Err(Error::Truncated { line });
        }

        if ends_with_newline {
            buf.pop();
        } else {
            // An unterminated last line has to still end the file
            let mut extra = [0u8; 1];
            match file.read(&mut extra).await {
                Ok(0) => {}
                Ok(_) => {
                    buf.truncate(before);
                    warn!(line, path = %self.path.display(), "file grew past its last indexed line");
                    return Err(Error::Truncated { line });
                }
                Err(e) => {
                    buf.truncate(before);
                    return Err(read_err(e));
                }
            }
        }

        Ok(buf.len() - before)
    }
}
