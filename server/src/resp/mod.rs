/*
 * Created on Sat Feb 15 2025
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

//! Utilities for writing responses to the client stream

use {
    crate::{protocol::element::Element, util::FutureResult},
    std::io::Error as IoError,
    tokio::io::AsyncWriteExt,
};

type FutureIoResult<'s> = FutureResult<'s, Result<(), IoError>>;

/// # The `Writable` trait
/// All trait implementors are given access to an asynchronous stream to
/// which they must write a response.
///
/// Every `write()` call makes a call to the [`IsConnection`]'s
/// `write_lowlevel` function, which in turn writes something to the
/// underlying stream.
///
/// Do note that this write **doesn't guarantee immediate completion** as the
/// underlying stream might use buffering. So, the best idea would be to use
/// the `flush()` call on the stream once the reply is complete.
pub trait Writable {
    /*
    HACK(@ishan): Since `async` is not supported in traits just yet, we will
    have to use explicit declarations for asynchronous functions
    */
    fn write<'s>(self, con: &'s mut impl IsConnection) -> FutureIoResult<'s>;
}

pub trait IsConnection: std::marker::Sync + std::marker::Send {
    fn write_lowlevel<'s>(&'s mut self, bytes: &'s [u8]) -> FutureIoResult<'s>;
}

impl<T> IsConnection for T
where
    T: AsyncWriteExt + Unpin + Send + Sync,
{
    fn write_lowlevel<'s>(&'s mut self, bytes: &'s [u8]) -> FutureIoResult<'s> {
        Box::pin(self.write_all(bytes))
    }
}

impl Writable for Element {
    fn write<'s>(self, con: &'s mut impl IsConnection) -> FutureIoResult<'s> {
        Box::pin(async move {
            // reply elements serialize into a scratch buffer first so that
            // nested arrays land on the stream in one write
            let buf = self.encode();
            con.write_lowlevel(&buf).await
        })
    }
}

impl Writable for &'static [u8] {
    fn write<'s>(self, con: &'s mut impl IsConnection) -> FutureIoResult<'s> {
        Box::pin(async move { con.write_lowlevel(self).await })
    }
}

impl Writable for Vec<u8> {
    fn write<'s>(self, con: &'s mut impl IsConnection) -> FutureIoResult<'s> {
        Box::pin(async move { con.write_lowlevel(&self).await })
    }
}

impl Writable for usize {
    fn write<'s>(self, con: &'s mut impl IsConnection) -> FutureIoResult<'s> {
        Box::pin(async move {
            let mut buf = Vec::with_capacity(24);
            buf.push(b':');
            buf.extend_from_slice(self.to_string().as_bytes());
            buf.extend_from_slice(b"\r\n");
            con.write_lowlevel(&buf).await
        })
    }
}
