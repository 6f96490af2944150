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

use crate::corestore::Data;

#[derive(Debug, Clone, PartialEq)]
/// A reply element. This is the complete RESP2 universe: note that the two
/// nil sentinels are distinct variants and **not** the same thing as an
/// empty bulk or an empty array; `GET` on a missing key replies
/// [`Element::NilBulk`] while `BLPOP` on timeout replies
/// [`Element::NilArray`]
pub enum Element {
    /// `+<text>\r\n`
    SimpleString(String),
    /// `-<message>\r\n`
    Error(String),
    /// `:<int>\r\n`
    Integer(i64),
    /// `$<len>\r\n<bytes>\r\n`
    BulkString(Data),
    /// `$-1\r\n`
    NilBulk,
    /// `*<n>\r\n<elements ...>`
    Array(Vec<Element>),
    /// `*-1\r\n`
    NilArray,
}

impl Element {
    /// Encode self into the exact wire form, appending to the buffer
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        match self {
            Self::SimpleString(text) => {
                buf.push(b'+');
                buf.extend_from_slice(text.as_bytes());
                buf.extend_from_slice(b"\r\n");
            }
            Self::Error(message) => {
                buf.push(b'-');
                buf.extend_from_slice(message.as_bytes());
                buf.extend_from_slice(b"\r\n");
            }
            Self::Integer(int) => {
                buf.push(b':');
                buf.extend_from_slice(int.to_string().as_bytes());
                buf.extend_from_slice(b"\r\n");
            }
            Self::BulkString(blob) => {
                buf.push(b'$');
                buf.extend_from_slice(blob.len().to_string().as_bytes());
                buf.extend_from_slice(b"\r\n");
                buf.extend_from_slice(blob.as_slice());
                buf.extend_from_slice(b"\r\n");
            }
            Self::NilBulk => buf.extend_from_slice(b"$-1\r\n"),
            Self::Array(elements) => {
                buf.push(b'*');
                buf.extend_from_slice(elements.len().to_string().as_bytes());
                buf.extend_from_slice(b"\r\n");
                for element in elements {
                    element.encode_into(buf);
                }
            }
            Self::NilArray => buf.extend_from_slice(b"*-1\r\n"),
        }
    }
    /// Encode self into a fresh buffer
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.encode_into(&mut buf);
        buf
    }
}
