//! bounds-checked reads over the RFC 4251 scalar types this crate needs:
//! `uint32`, `uint64`, and length-prefixed `string` (which `mpint` reuses
//! verbatim). everything here is zero-copy: `read_string` and `read_mpint`
//! hand back a slice of the original buffer, never an owned copy.

use byteorder::{BigEndian, ByteOrder};

use crate::errors::*;

/// reads `uint32`/`uint64`/`string` values off the front of a byte slice,
/// the way `ssh-rsa`/`ssh-ed25519` etc. are laid out on the wire
/// (https://tools.ietf.org/html/rfc4251#section-5).
///
/// a `Reader` never owns its data; it just tracks how far into `buf` it has
/// read so far. every accessor either advances `pos` and returns a slice of
/// `buf`, or leaves `pos` untouched and returns an error.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Reader { buf, pos: 0 }
    }

    /// bytes not yet consumed.
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// how many bytes have been read so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// true once every byte of `buf` has been consumed.
    pub fn is_finished(&self) -> bool {
        self.pos == self.buf.len()
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let v = read_u32(self.remaining())?;
        self.pos += 4;
        Ok(v)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let v = read_u64(self.remaining())?;
        self.pos += 8;
        Ok(v)
    }

    /// reads a length-prefixed `string` and returns a slice borrowed from
    /// the reader's underlying buffer.
    pub fn read_string(&mut self) -> Result<&'a [u8]> {
        let (consumed, slice) = read_string(self.remaining())?;
        self.pos += consumed;
        Ok(slice)
    }

    /// an `mpint` is framed identically to `string`; this is just a more
    /// readable name at call sites that read a multi-precision integer.
    pub fn read_mpint(&mut self) -> Result<&'a [u8]> {
        self.read_string()
    }

    /// reads a length-prefixed string and validates it as UTF-8. used for
    /// the magic string, which must be plain ASCII.
    pub fn read_str(&mut self) -> Result<&'a str> {
        let bytes = self.read_string()?;
        Ok(::std::str::from_utf8(bytes)?)
    }
}

/// consumes a big-endian `uint32` from the front of `buf`.
pub fn read_u32(buf: &[u8]) -> Result<u32> {
    if buf.len() < 4 {
        return Err(ErrorKind::MalformedInteger.into());
    }
    Ok(BigEndian::read_u32(&buf[..4]))
}

/// consumes a big-endian `uint64` from the front of `buf`.
pub fn read_u64(buf: &[u8]) -> Result<u64> {
    if buf.len() < 8 {
        return Err(ErrorKind::MalformedInteger.into());
    }
    Ok(BigEndian::read_u64(&buf[..8]))
}

/// consumes a length-prefixed `string`: a `uint32` length `L` followed by
/// `L` opaque bytes. returns `(4 + L, &buf[4..4+L])`; `L = 0` is valid and
/// yields an empty slice.
pub fn read_string(buf: &[u8]) -> Result<(usize, &[u8])> {
    let len = read_u32(buf)? as usize;
    if 4 + len > buf.len() {
        return Err(ErrorKind::MalformedString.into());
    }
    Ok((4 + len, &buf[4..4 + len]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_u32_exact() {
        let buf = [0x00, 0x00, 0x00, 0x2a];
        assert_eq!(read_u32(&buf).unwrap(), 42);
    }

    #[test]
    fn read_u32_short() {
        let buf = [0x00, 0x00, 0x00];
        assert!(read_u32(&buf).is_err());
    }

    #[test]
    fn read_u64_exact() {
        let buf = [0, 0, 0, 0, 0, 0, 0, 7];
        assert_eq!(read_u64(&buf).unwrap(), 7);
    }

    #[test]
    fn read_string_empty_is_valid() {
        let buf = [0x00, 0x00, 0x00, 0x00];
        let (consumed, slice) = read_string(&buf).unwrap();
        assert_eq!(consumed, 4);
        assert!(slice.is_empty());
    }

    #[test]
    fn read_string_overrun() {
        // declares length 1000 but only 4 bytes remain after the prefix.
        let mut buf = vec![0x00, 0x00, 0x03, 0xe8];
        buf.extend_from_slice(&[0u8; 4]);
        assert!(read_string(&buf).is_err());
    }

    #[test]
    fn reader_sequences_reads() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&[0, 0, 0, 3]);
        buf.extend_from_slice(b"abc");
        buf.extend_from_slice(&[0, 0, 0, 0, 0, 0, 0, 9]);
        let mut r = Reader::new(&buf);
        assert_eq!(r.read_string().unwrap(), b"abc");
        assert_eq!(r.read_u64().unwrap(), 9);
        assert!(r.is_finished());
    }
}
