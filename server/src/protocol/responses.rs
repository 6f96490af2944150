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

//! Pre-encoded responses that don't depend on request contents

pub mod groups {
    //! Response groups: the full wire form of every static reply the
    //! server can produce

    /// The `+OK` status
    pub const OKAY: &[u8] = b"+OK\r\n";
    /// The `+PONG` status
    pub const PONG: &[u8] = b"+PONG\r\n";
    /// The nil bulk string (missing value)
    pub const NIL: &[u8] = b"$-1\r\n";
    /// The nil array (e.g. a timed out `BLPOP`)
    pub const NIL_ARRAY: &[u8] = b"*-1\r\n";
    /// `TYPE` reply for a string key
    pub const TYPE_STRING: &[u8] = b"+string\r\n";
    /// `TYPE` reply for a list key
    pub const TYPE_LIST: &[u8] = b"+list\r\n";
    /// `TYPE` reply for a stream key
    pub const TYPE_STREAM: &[u8] = b"+stream\r\n";
    /// `TYPE` reply for a missing key
    pub const TYPE_NONE: &[u8] = b"+none\r\n";
    /// The kind at the key doesn't match the kind of the operation
    pub const WRONGTYPE_ERR: &[u8] =
        b"-WRONGTYPE Operation against a key holding the wrong kind of value\r\n";
    /// A malformed sub-option (for example an unknown `SET` flag)
    pub const SYNTAX_ERR: &[u8] = b"-ERR syntax error\r\n";
    /// The `PX` payload was not a strictly positive integer
    pub const INVALID_EXPIRE_ERR: &[u8] = b"-ERR invalid expire time in 'set' command\r\n";
    /// An argument had to be an integer but wasn't
    pub const NOT_AN_INT_ERR: &[u8] = b"-ERR value is not an integer or out of range\r\n";
    /// The `BLPOP` timeout failed to parse as a float
    pub const TIMEOUT_NOT_FLOAT_ERR: &[u8] = b"-ERR timeout is not a float or out of range\r\n";
    /// The `BLPOP` timeout was negative
    pub const TIMEOUT_NEGATIVE_ERR: &[u8] = b"-ERR timeout is negative\r\n";
    /// The `XADD` entry ID spec failed to parse
    pub const STREAM_ID_INVALID_ERR: &[u8] = b"-ERR Invalid stream ID specified\r\n";
    /// The literal `0-0` entry ID
    pub const STREAM_ID_FLOOR_ERR: &[u8] =
        b"-ERR The ID specified in XADD must be greater than 0-0\r\n";
    /// The entry ID did not land above the stream's top entry
    pub const STREAM_ID_TOP_ERR: &[u8] =
        b"-ERR The ID specified in XADD is equal or smaller than the target stream top item\r\n";
    /// Broken RESP2 framing. This one is fatal: the connection is closed
    /// right after it is sent
    pub const PROTOCOL_ERR: &[u8] = b"-ERR Protocol error\r\n";
}
