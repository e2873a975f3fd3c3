//! Byte source abstractions for parser.
//!
//! This module provides the [ByteSource] trait, the single seam between the
//! [Scanner](crate::parser::scanner::Scanner) and the underlying text:
//! in-memory buffers, seekable files, or forward-only streams.

use std::io;

// =#========================================================================#=
// BYTE SOURCE (Trait)
// =#========================================================================T=
/// Trait defining the interface for different byte sources used by the
/// [Scanner](crate::parser::scanner::Scanner).
///
/// This trait abstracts over different ways of accessing byte data:
/// - In-memory byte buffers ([InMemoryByteSource](crate::parser::InMemoryByteSource))
/// - Buffered reading from seekable files ([BufferedByteSource](crate::parser::BufferedByteSource))
/// - Forward-only streams such as stdin ([StreamByteSource](crate::parser::StreamByteSource))
///
/// Consumption is irreversible except through [rewind](ByteSource::rewind),
/// which only seekable sources support.
pub trait ByteSource {
    /// Get the current byte and advance the position (consume it).
    ///
    /// # Returns
    /// * `Some(u8)` - The next byte if available
    /// * `None` - If at end of data (EOF)
    fn next_byte(&mut self) -> Option<u8>;

    /// Returns the number of bytes consumed so far.
    fn position(&self) -> usize;

    /// Whether [rewind](ByteSource::rewind) can succeed on this source.
    fn is_seekable(&self) -> bool;

    /// Moves back to the very first byte of the source.
    ///
    /// # Errors
    /// Returns an error of kind [io::ErrorKind::Unsupported] for
    /// forward-only sources, or any I/O error raised while seeking.
    fn rewind(&mut self) -> io::Result<()>;

    /// Takes the I/O error that ended reading, if any.
    ///
    /// [next_byte](ByteSource::next_byte) reports a failed read as end of
    /// data; callers check here to tell the two apart.
    fn take_error(&mut self) -> Option<io::Error> {
        None
    }
}
