//! Buffered reader implementations of byte source for parser.
//!
//! This module provides [BufferedByteSource], which wraps a seekable reader
//! (typically a [File]) in a [BufReader] for efficient streaming I/O, and
//! [StreamByteSource] for forward-only readers such as stdin or sockets.
//! Use these for large files where loading everything into memory would be
//! impractical.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use crate::parser::byte_source::ByteSource;

/// Reads one byte from a buffered reader. A failed read ends the data and
/// is kept in `error` until taken.
fn read_buffered_byte<R: Read>(
    reader: &mut BufReader<R>,
    error: &mut Option<io::Error>,
) -> Option<u8> {
    if error.is_some() {
        return None;
    }
    let byte = loop {
        match reader.fill_buf() {
            Ok(buf) => break *buf.first()?,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => {
                tracing::warn!("Reading input failed: {err}");
                *error = Some(err);
                return None;
            }
        }
    };
    reader.consume(1);
    Some(byte)
}

// =#========================================================================#=
// BUFFERED BYTE SOURCE
// =#========================================================================$=
/// A buffered byte source over a seekable reader.
///
/// Uses [BufReader] for efficient disk I/O. Seeking back to the start is
/// supported, which is what makes format auto-detection possible.
pub struct BufferedByteSource<R: Read + Seek> {
    /// Underlying reader, handles getting chunks from file
    reader: BufReader<R>,

    /// Current absolute position in the stream
    pos: usize,

    /// Read failure that ended the data
    error: Option<io::Error>,
}

impl BufferedByteSource<File> {
    /// Creates a new buffered byte source from a file path.
    ///
    /// # Arguments
    /// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read + Seek> BufferedByteSource<R> {
    /// Wraps any seekable reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            pos: 0,
            error: None,
        }
    }
}

impl<R: Read + Seek> ByteSource for BufferedByteSource<R> {
    fn next_byte(&mut self) -> Option<u8> {
        let byte = read_buffered_byte(&mut self.reader, &mut self.error)?;
        self.pos += 1;
        Some(byte)
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn is_seekable(&self) -> bool {
        true
    }

    fn rewind(&mut self) -> io::Result<()> {
        self.reader.seek(SeekFrom::Start(0))?;
        self.pos = 0;
        self.error = None;
        Ok(())
    }

    fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

// =#========================================================================#=
// STREAM BYTE SOURCE
// =#========================================================================$=
/// A buffered, forward-only byte source.
///
/// Accepted everywhere tokens are read, but cannot be rewound, so callers
/// must know the format up front (see [TreeIter::newick](crate::reader::TreeIter::newick)).
pub struct StreamByteSource<R: Read> {
    reader: BufReader<R>,
    pos: usize,
    error: Option<io::Error>,
}

impl<R: Read> StreamByteSource<R> {
    /// Wraps any reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            pos: 0,
            error: None,
        }
    }
}

impl<R: Read> ByteSource for StreamByteSource<R> {
    fn next_byte(&mut self) -> Option<u8> {
        let byte = read_buffered_byte(&mut self.reader, &mut self.error)?;
        self.pos += 1;
        Some(byte)
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn is_seekable(&self) -> bool {
        false
    }

    fn rewind(&mut self) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "stream source cannot be rewound",
        ))
    }

    fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }
}

// =#========================================================================#=
// TESTS - BUFFERED BYTE SOURCE
// =#========================================================================$=
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Hands out `data`, then fails every further read.
    struct FailingReader {
        data: &'static [u8],
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                return Err(io::Error::other("disk on fire"));
            }
            let n = self.data.len().min(buf.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_buffered_source_rewinds() {
        let mut source = BufferedByteSource::new(Cursor::new(b"xyz".to_vec()));
        assert_eq!(source.next_byte(), Some(b'x'));
        assert_eq!(source.next_byte(), Some(b'y'));
        source.rewind().unwrap();
        assert_eq!(source.position(), 0);
        assert_eq!(source.next_byte(), Some(b'x'));
    }

    #[test]
    fn test_stream_source_refuses_rewind() {
        let mut source = StreamByteSource::new(&b"xyz"[..]);
        assert!(!source.is_seekable());
        assert_eq!(source.next_byte(), Some(b'x'));
        let err = source.rewind().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
        assert_eq!(source.next_byte(), Some(b'y'));
    }

    #[test]
    fn test_read_failure_is_kept() {
        let mut source = StreamByteSource::new(FailingReader { data: b"ab" });
        assert_eq!(source.next_byte(), Some(b'a'));
        assert_eq!(source.next_byte(), Some(b'b'));
        assert_eq!(source.next_byte(), None);
        assert_eq!(source.position(), 2);
        let err = source.take_error().unwrap();
        assert_eq!(err.to_string(), "disk on fire");
        assert!(source.take_error().is_none());
    }
}
