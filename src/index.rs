use async_std::io::{self, prelude::*, BufRead};

use crate::{error::Error, Result};

/// Contains an in-memory line-index
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Index {
    /// Maps line to seek position in order to seek efficiently. The index within the Vec represents
    /// the line-index in the file
    inner: Vec<u64>,
    /// Amount of bytes scanned while building the index
    len_bytes: u64,
}

impl Index {
    /// Create a new Index from already known line offsets. `len_bytes` is the length of the
    /// indexed data and has to be at least the last offset.
    pub fn new(lines: Vec<u64>, len_bytes: u64) -> Index {
        debug_assert!(lines.windows(2).all(|w| w[0] <= w[1]));
        debug_assert!(lines.last().map_or(true, |last| *last <= len_bytes));
        Self {
            inner: lines,
            len_bytes,
        }
    }

    /// Build a new index for text within `reader` in a single pass. Every line start gets recorded,
    /// including a last line which isn't terminated by a `\n`.
    pub async fn build<R: BufRead + Unpin>(reader: &mut R) -> io::Result<Self> {
        let mut line_index: Vec<u64> = Vec::new();
        let mut curr_offset: u64 = 0;

        let mut buff = Vec::with_capacity(1000);

        loop {
            let last_offset = curr_offset;

            buff.clear();
            let n = reader.read_until(b'\n', &mut buff).await?;

            if n == 0 {
                break;
            }

            // Only push after reading so we don't record a line start at EOF
            line_index.push(last_offset);

            curr_offset += n as u64;
        }

        Ok(Self {
            inner: line_index,
            len_bytes: curr_offset,
        })
    }

    /// Build an index for data which is already in memory.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut line_index = Vec::new();
        let mut curr_offset: u64 = 0;

        for line in data.split_inclusive(|b| *b == b'\n') {
            line_index.push(curr_offset);
            curr_offset += line.len() as u64;
        }

        Self {
            inner: line_index,
            len_bytes: curr_offset,
        }
    }

    /// Get the Index value
    #[inline]
    pub fn get(&self, pos: usize) -> Result<u64> {
        self.inner.get(pos).copied().ok_or(Error::OutOfBounds(pos))
    }

    /// Returns the start offset of line `pos` and, unless it's the last line, the start offset of
    /// the following line.
    #[inline]
    pub fn span(&self, pos: usize) -> Result<(u64, Option<u64>)> {
        let start = self.get(pos)?;
        Ok((start, self.inner.get(pos + 1).copied()))
    }

    /// Returns the amount of items of the index. On a properly built index, this represents the
    /// amount of lines in the file.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the index has no lines
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Length in bytes of the data the index was built from
    #[inline]
    pub fn len_bytes(&self) -> u64 {
        self.len_bytes
    }

    pub fn offsets(&self) -> &[u64] {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use async_std::io::Cursor;

    use super::*;

    async fn build(data: &str) -> Index {
        Index::build(&mut Cursor::new(data.as_bytes())).await.unwrap()
    }

    #[async_std::test]
    async fn test_build_offsets() {
        let index = build("Line 1\nLine 2\nLine 3\n").await;
        assert_eq!(index.offsets(), &[0, 7, 14]);
        assert_eq!(index.len_bytes(), 21);
    }

    #[async_std::test]
    async fn test_build_empty() {
        let index = build("").await;
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.len_bytes(), 0);
    }

    #[async_std::test]
    async fn test_build_no_trailing_newline() {
        let index = build("a\nbc").await;
        assert_eq!(index.offsets(), &[0, 2]);
        assert_eq!(index.len_bytes(), 4);
    }

    #[async_std::test]
    async fn test_build_empty_lines() {
        let index = build("\n\n\n").await;
        assert_eq!(index.offsets(), &[0, 1, 2]);

        let index = build("First\n\nThird\n").await;
        assert_eq!(index.offsets(), &[0, 6, 7]);
    }

    #[async_std::test]
    async fn test_build_crlf() {
        // Only \n delimits lines
        let index = build("A\r\nB\rC\r\n").await;
        assert_eq!(index.offsets(), &[0, 3]);
    }

    #[async_std::test]
    async fn test_build_long_line() {
        let line = "x".repeat(100_000);
        let index = build(&format!("{}\nshort\n", line)).await;
        assert_eq!(index.offsets(), &[0, 100_001]);
    }

    #[async_std::test]
    async fn test_from_bytes_matches_build() {
        let inputs = ["", "\n", "a", "a\n", "a\nb", "First\n\nThird\n", "x\r\ny\r\n\n\nz"];
        for input in &inputs {
            assert_eq!(Index::from_bytes(input.as_bytes()), build(input).await);
        }
    }

    #[test]
    fn test_span() {
        let index = Index::new(vec![0, 5, 10], 12);
        assert_eq!(index.span(0).unwrap(), (0, Some(5)));
        assert_eq!(index.span(2).unwrap(), (10, None));
        assert!(matches!(index.span(3), Err(Error::OutOfBounds(3))));
        assert!(matches!(index.get(usize::MAX), Err(Error::OutOfBounds(_))));
    }
}
