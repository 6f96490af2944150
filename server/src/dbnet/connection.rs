/*
 * Created on Fri Mar 21 2025
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

//! # Client connections
//!
//! A [`Connection`] owns its socket, its read buffer and its (buffered)
//! write half exclusively; nothing here is shared. Replies are buffered by
//! the [`BufWriter`] and flushed once per processed frame by the
//! connection handler.

use {
    super::{BufferedSocketStream, QueryResult},
    crate::{
        protocol::{ParseError, Parser},
        resp::Writable,
        IoResult,
    },
    bytes::{Buf, BytesMut},
    std::io::{Error as IoError, ErrorKind},
    tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter},
};

/// A client connection
pub struct Connection<C> {
    /// the writer half, buffered
    stream: BufWriter<C>,
    /// the read buffer
    buffer: BytesMut,
}

impl<C> Connection<C>
where
    C: BufferedSocketStream,
{
    pub fn new(stream: C) -> Self {
        Self {
            stream: BufWriter::new(stream),
            buffer: BytesMut::with_capacity(libcoral::BUF_CAP),
        }
    }
    /// Read one complete frame off the stream. This asynchronously fills
    /// the buffer for as long as the parser keeps asking for more bytes.
    /// The consumed bytes are drained from the buffer before returning, so
    /// a pipelined tail stays intact for the next call
    pub async fn read_query(&mut self) -> IoResult<QueryResult> {
        loop {
            match Parser::parse(&self.buffer) {
                Ok((query, forward_by)) => {
                    self.buffer.advance(forward_by);
                    return Ok(QueryResult::Q(query));
                }
                Err(ParseError::NotEnough) => {}
                Err(_) => return Ok(QueryResult::ProtocolError),
            }
            if self.stream.read_buf(&mut self.buffer).await? == 0 {
                return if self.buffer.is_empty() {
                    Ok(QueryResult::Disconnected)
                } else {
                    // EOF in the middle of a frame
                    Err(IoError::from(ErrorKind::ConnectionReset))
                };
            }
        }
    }
    /// Write a response to the stream
    pub async fn write_response(&mut self, response: impl Writable) -> IoResult<()> {
        response.write(&mut self.stream).await
    }
    pub async fn flush_stream(&mut self) -> IoResult<()> {
        self.stream.flush().await
    }
}
