use std::sync::Arc;

use async_trait::async_trait;

use crate::{index::Index, Indexable, ReadByLine, Result};

/// Indexed bytes held in memory which implement `ReadByLine`. Cloning is cheap since both the
/// data and the index are reference counted.
#[derive(Debug, Clone)]
pub struct IndexedString {
    data: Arc<[u8]>,
    index: Arc<Index>,
}

impl IndexedString {
    /// Create a new `IndexedString` from unindexed text and builds an index.
    pub fn new<T: AsRef<[u8]>>(s: T) -> IndexedString {
        let data: Arc<[u8]> = Arc::from(s.as_ref());
        let index = Index::from_bytes(&data);
        Self {
            data,
            index: Arc::new(index),
        }
    }
}

impl Indexable for IndexedString {
    #[inline]
    fn get_index(&self) -> &Index {
        &self.index
    }
}

#[async_trait]
impl ReadByLine for IndexedString {
    async fn read_line_raw(&self, line: usize, buf: &mut Vec<u8>) -> Result<usize> {
        let (start, next) = self.index.span(line)?;
        let end = next.unwrap_or_else(|| self.index.len_bytes());

        let mut content = &self.data[start as usize..end as usize];
        if let Some(stripped) = content.strip_suffix(b"\n") {
            content = stripped;
        }

        buf.extend_from_slice(content);
        Ok(content.len())
    }
}
