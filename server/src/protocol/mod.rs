/*
 * Created on Sun Feb 09 2025
 *
 * This file is a part of Coral
 * Coral is a free and open-source in-memory data structure server that
 * speaks the Redis RESP2 protocol, written by Ishan Kapoor ("the Author")
 * with the vision to provide a small, predictable and easily auditable
 * caching and queueing layer
 *
 * Copyright (c) 2025, Ishan Kapoor <ishan@coraldb.io>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! # The RESP2 protocol
//!
//! ## Introduction
//! RESP2 is the serialization protocol that Redis clients speak: a
//! length-prefixed, CRLF-terminated framing with five type symbols. This
//! module contains the [`Parser`] for the protocol. It is enough to pass a
//! byte buffer to it; the parser will either hand back exactly one command
//! frame along with the number of bytes it consumed, or ask for more bytes.
//!
//! ## Important note
//!
//! All developers willing to modify the deserializer must keep this in mind:
//! the cursor is always Ahead-Of-Position, that is the cursor should always
//! point at the next byte that can be read.

// modules
pub mod element;
pub mod responses;
#[cfg(test)]
mod tests;
// endof modules

use {self::element::Element, crate::corestore::Data};

#[derive(Debug, PartialEq)]
/// # Parser Errors
///
/// Several errors can arise during parsing and this enum accounts for them
pub enum ParseError {
    /// Didn't get the number of expected bytes. Not fatal: read more bytes
    /// off the stream and try again
    NotEnough,
    /// The buffer contains an unexpected byte: an unknown type symbol, a
    /// negative length other than `-1`, or broken CRLF framing
    UnexpectedByte,
    /// The frame is structurally invalid for a command: an empty or nil
    /// array, or an element that is not a bulk string
    BadPacket,
    /// A length or integer line failed to parse
    DatatypeParseFailure,
}

/// A generic result to indicate parsing errors through the [`ParseError`] enum
pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, PartialEq)]
/// A fully parsed command frame: the command name followed by its arguments,
/// each an arbitrary byte blob. No UTF-8 is assumed anywhere
pub struct Query {
    args: Vec<Data>,
}

impl Query {
    pub fn args(&self) -> &[Data] {
        &self.args
    }
}

/// A parsed query along with the number of bytes consumed from the buffer
pub type QueryWithAdvance = (Query, usize);

#[derive(Debug)]
/// # RESP2 Deserializer (Parser)
///
/// The parser is pessimistic about everything except truncation: a short
/// buffer yields [`ParseError::NotEnough`] so the caller can read more bytes
/// and retry, while any structural damage is reported as a fatal error
pub struct Parser<'a> {
    /// the buffer
    buffer: &'a [u8],
    /// the position of the next byte that can be read
    cursor: usize,
}

impl<'a> Parser<'a> {
    const fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }
    /// Returns what we have left
    fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }
    fn exhausted(&self) -> bool {
        self.cursor >= self.buffer.len()
    }
    /// Read one byte, moving the cursor past it
    fn next_byte(&mut self) -> ParseResult<u8> {
        if self.exhausted() {
            Err(ParseError::NotEnough)
        } else {
            let byte = self.buffer[self.cursor];
            self.cursor += 1;
            Ok(byte)
        }
    }
    /// Read a CRLF terminated line, placing the cursor just past the LF.
    /// The returned slice does not include the terminator
    fn read_line(&mut self) -> ParseResult<&'a [u8]> {
        let start = self.cursor;
        let mut pos = self.cursor;
        while pos < self.buffer.len() {
            if self.buffer[pos] == b'\r' {
                if pos + 1 >= self.buffer.len() {
                    // we have the CR but not the LF
                    return Err(ParseError::NotEnough);
                }
                if self.buffer[pos + 1] != b'\n' {
                    return Err(ParseError::UnexpectedByte);
                }
                self.cursor = pos + 2;
                return Ok(&self.buffer[start..pos]);
            }
            pos += 1;
        }
        Err(ParseError::NotEnough)
    }
    /// Read exactly `until` bytes which must be followed by a CRLF. The
    /// cursor is placed past the terminator
    fn read_until_crlf(&mut self, until: usize) -> ParseResult<&'a [u8]> {
        if self.remaining() < until + 2 {
            return Err(ParseError::NotEnough);
        }
        let start = self.cursor;
        let end = start + until;
        if !(self.buffer[end] == b'\r' && self.buffer[end + 1] == b'\n') {
            return Err(ParseError::UnexpectedByte);
        }
        self.cursor = end + 2;
        Ok(&self.buffer[start..end])
    }
}

impl<'a> Parser<'a> {
    /// Parse a stream of bytes into an [`i64`], with overflow checks
    fn parse_into_i64(bytes: &[u8]) -> ParseResult<i64> {
        let (negative, digits) = match bytes.split_first() {
            Some((b'-', rest)) => (true, rest),
            Some(_) => (false, bytes),
            None => return Err(ParseError::NotEnough),
        };
        if digits.is_empty() {
            return Err(ParseError::DatatypeParseFailure);
        }
        let mut int = 0i64;
        for dig in digits {
            if !dig.is_ascii_digit() {
                // dig has to be an ASCII digit
                return Err(ParseError::DatatypeParseFailure);
            }
            let curdig = (dig - b'0') as i64;
            int = match int.checked_mul(10).and_then(|int| int.checked_add(curdig)) {
                Some(int) => int,
                None => return Err(ParseError::DatatypeParseFailure),
            };
        }
        Ok(if negative { -int } else { int })
    }
    /// Read a length line. `-1` maps to `None` (the nil sentinel); any other
    /// negative length is a protocol violation
    fn read_length(&mut self) -> ParseResult<Option<usize>> {
        let line = self.read_line()?;
        let int = Self::parse_into_i64(line)?;
        if int == -1 {
            Ok(None)
        } else if int < 0 {
            Err(ParseError::UnexpectedByte)
        } else {
            Ok(Some(int as usize))
        }
    }
    /// Lines behind `+` and `-` symbols carry text
    fn read_text_line(&mut self) -> ParseResult<String> {
        let line = self.read_line()?;
        String::from_utf8(line.to_owned()).map_err(|_| ParseError::DatatypeParseFailure)
    }
    /// Parse the next element. **The cursor should be at the type symbol
    /// (_not_ passed)**
    fn next_element(&mut self) -> ParseResult<Element> {
        let tsymbol = self.next_byte()?;
        let ret = match tsymbol {
            b'+' => Element::SimpleString(self.read_text_line()?),
            b'-' => Element::Error(self.read_text_line()?),
            b':' => Element::Integer(Self::parse_into_i64(self.read_line()?)?),
            b'$' => match self.read_length()? {
                Some(len) => Element::BulkString(Data::copy_from_slice(self.read_until_crlf(len)?)),
                None => Element::NilBulk,
            },
            b'*' => match self.read_length()? {
                Some(count) => {
                    let mut elements = Vec::with_capacity(count);
                    for _ in 0..count {
                        elements.push(self.next_element()?);
                    }
                    Element::Array(elements)
                }
                None => Element::NilArray,
            },
            _ => return Err(ParseError::UnexpectedByte),
        };
        Ok(ret)
    }
}

impl<'a> Parser<'a> {
    /// Parse one command frame off the front of the buffer: an array of at
    /// least one bulk string. Nil arrays, nil bulks and non-bulk elements
    /// have no meaning inside a command and are rejected
    pub fn parse(buffer: &[u8]) -> ParseResult<QueryWithAdvance> {
        let mut slf = Parser::new(buffer);
        if slf.next_byte()? != b'*' {
            return Err(ParseError::UnexpectedByte);
        }
        let count = match slf.read_length()? {
            Some(0) | None => return Err(ParseError::BadPacket),
            Some(count) => count,
        };
        let mut args = Vec::with_capacity(count);
        for _ in 0..count {
            match slf.next_element()? {
                Element::BulkString(blob) => args.push(blob),
                _ => return Err(ParseError::BadPacket),
            }
        }
        Ok((Query { args }, slf.cursor))
    }
    #[cfg(test)]
    /// Parse one full element (any of the five types) off the front of the
    /// buffer. This is the decoding half of the encoder round-trip
    pub fn parse_element(buffer: &[u8]) -> ParseResult<(Element, usize)> {
        let mut slf = Parser::new(buffer);
        let element = slf.next_element()?;
        Ok((element, slf.cursor))
    }
}
