//! [ByteSource] over an owned byte buffer.

use crate::parser::byte_source::ByteSource;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;

// =#========================================================================#=
// IN MEMORY BYTE SOURCE
// =#========================================================================$=
/// Byte source holding the whole text, e.g. a string or a file read
/// up front. Rewinding is free, so format detection always works.
pub struct InMemoryByteSource {
    bytes: Vec<u8>,
    /// Index of the next byte handed out
    next: usize,
}

impl InMemoryByteSource {
    /// Takes ownership of `bytes`.
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self { bytes, next: 0 }
    }

    /// Copies the bytes of a string.
    pub fn from_str(input: &str) -> Self {
        Self::from_vec(input.as_bytes().to_vec())
    }

    /// Reads the entire file at `path` into memory.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be opened or read.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let mut bytes = Vec::new();
        File::open(path)?.read_to_end(&mut bytes)?;
        Ok(Self::from_vec(bytes))
    }
}

impl ByteSource for InMemoryByteSource {
    #[inline(always)]
    fn next_byte(&mut self) -> Option<u8> {
        let byte = *self.bytes.get(self.next)?;
        self.next += 1;
        Some(byte)
    }

    #[inline]
    fn position(&self) -> usize {
        self.next
    }

    fn is_seekable(&self) -> bool {
        true
    }

    fn rewind(&mut self) -> io::Result<()> {
        self.next = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewind_restarts_from_first_byte() {
        let mut source = InMemoryByteSource::from_str("ab");
        assert_eq!(source.next_byte(), Some(b'a'));
        assert_eq!(source.next_byte(), Some(b'b'));
        assert_eq!(source.next_byte(), None);
        assert_eq!(source.position(), 2);

        source.rewind().unwrap();
        assert_eq!(source.position(), 0);
        assert_eq!(source.next_byte(), Some(b'a'));
    }
}
