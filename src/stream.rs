//! Stream access helpers.
//!
//! The binary walkers read fixed-size structures and need to distinguish a
//! clean end of directory from a genuine failure; the textual walkers (Lynx,
//! LBR) consume CR-terminated fields with scanf-like tokenizing.

use std::io::{self, Read, Seek, SeekFrom};

use crate::error::Error;

/// Fill `buf` completely. `Ok(false)` means end of stream arrived first,
/// which self-delimiting formats treat as the end of the directory.
pub(crate) fn read_struct<S: Read>(stream: &mut S, buf: &mut [u8]) -> Result<bool, Error> {
    let mut filled = 0;
    while filled < buf.len() {
        match stream.read(&mut buf[filled..]) {
            Ok(0) => return Ok(false),
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(Error::Io(err)),
        }
    }
    Ok(true)
}

/// Like [`read_struct`], but a short read is an error.
pub(crate) fn read_required<S: Read>(
    stream: &mut S,
    buf: &mut [u8],
    what: &'static str,
) -> Result<(), Error> {
    if read_struct(stream, buf)? {
        Ok(())
    } else {
        Err(Error::Truncated(what))
    }
}

pub(crate) fn seek_to<S: Seek>(stream: &mut S, pos: u64) -> Result<(), Error> {
    stream.seek(SeekFrom::Start(pos))?;
    Ok(())
}

pub(crate) fn stream_len<S: Seek>(stream: &mut S) -> Result<u64, Error> {
    Ok(stream.seek(SeekFrom::End(0))?)
}

const CR: u8 = b'\r';

fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\x0B' | b'\x0C' | b'\r')
}

/// One-byte-lookahead reader for the CR-delimited directory formats.
pub(crate) struct TextReader<'s, S> {
    stream: &'s mut S,
    peeked: Option<u8>,
}

impl<'s, S: Read + Seek> TextReader<'s, S> {
    pub(crate) fn new(stream: &'s mut S) -> Self {
        Self { stream, peeked: None }
    }

    fn next(&mut self) -> Result<Option<u8>, Error> {
        if let Some(byte) = self.peeked.take() {
            return Ok(Some(byte));
        }
        let mut buf = [0u8; 1];
        Ok(read_struct(self.stream, &mut buf)?.then_some(buf[0]))
    }

    fn peek(&mut self) -> Result<Option<u8>, Error> {
        if self.peeked.is_none() {
            self.peeked = self.next()?;
        }
        Ok(self.peeked)
    }

    /// Offset of the next unread byte.
    pub(crate) fn position(&mut self) -> Result<u64, Error> {
        let pos = self.stream.stream_position()?;
        Ok(pos - u64::from(self.peeked.is_some()))
    }

    pub(crate) fn skip_ws(&mut self) -> Result<(), Error> {
        while let Some(byte) = self.peek()? {
            if !is_space(byte) {
                break;
            }
            self.peeked = None;
        }
        Ok(())
    }

    /// Skip whitespace and one whitespace-delimited token.
    pub(crate) fn skip_token(&mut self) -> Result<(), Error> {
        self.skip_ws()?;
        while let Some(byte) = self.peek()? {
            if is_space(byte) {
                break;
            }
            self.peeked = None;
        }
        Ok(())
    }

    /// Skip whitespace and read a token of at most `max` bytes; longer
    /// tokens are cut short with the remainder left unread.
    pub(crate) fn token(&mut self, max: usize) -> Result<Vec<u8>, Error> {
        self.skip_ws()?;
        let mut out = Vec::new();
        while out.len() < max {
            match self.peek()? {
                Some(byte) if !is_space(byte) => {
                    out.push(byte);
                    self.peeked = None;
                }
                _ => break,
            }
        }
        if out.is_empty() {
            return Err(Error::Text("directory text"));
        }
        Ok(out)
    }

    /// Match `literal` exactly at the current position.
    pub(crate) fn expect(&mut self, literal: &[u8]) -> Result<(), Error> {
        for &want in literal {
            if self.next()? != Some(want) {
                return Err(Error::Text("directory text"));
            }
        }
        Ok(())
    }

    /// Skip whitespace and parse a decimal number with optional sign.
    pub(crate) fn number(&mut self) -> Result<i64, Error> {
        self.skip_ws()?;
        let negative = match self.peek()? {
            Some(b'-') => {
                self.peeked = None;
                true
            }
            Some(b'+') => {
                self.peeked = None;
                false
            }
            _ => false,
        };
        let mut value: i64 = 0;
        let mut digits = 0;
        while let Some(byte) = self.peek()? {
            if !byte.is_ascii_digit() {
                break;
            }
            value = value
                .saturating_mul(10)
                .saturating_add(i64::from(byte - b'0'));
            digits += 1;
            self.peeked = None;
        }
        if digits == 0 {
            return Err(Error::Text("directory number"));
        }
        Ok(if negative { -value } else { value })
    }

    /// Skip whitespace and read a single character.
    pub(crate) fn letter(&mut self) -> Result<u8, Error> {
        self.skip_ws()?;
        self.next()?.ok_or(Error::Text("directory text"))
    }

    /// Read up to `max` bytes of a CR-terminated field, leaving the CR
    /// unread. An empty field is a format error.
    pub(crate) fn field(&mut self, max: usize) -> Result<Vec<u8>, Error> {
        let mut out = Vec::new();
        while out.len() < max {
            match self.peek()? {
                Some(CR) | None => break,
                Some(byte) => {
                    out.push(byte);
                    self.peeked = None;
                }
            }
        }
        if out.is_empty() {
            return Err(Error::Text("directory text"));
        }
        Ok(out)
    }

    /// Consume everything up to (not including) the next CR.
    pub(crate) fn skip_to_cr(&mut self) -> Result<(), Error> {
        while let Some(byte) = self.peek()? {
            if byte == CR {
                break;
            }
            self.peeked = None;
        }
        Ok(())
    }

    /// Consume exactly one byte, normally the CR ending a field.
    pub(crate) fn consume_one(&mut self) -> Result<(), Error> {
        let _ = self.next()?;
        Ok(())
    }
}
