/*
 * Created on Sat Apr 12 2025
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

/// Send raw command bytes down the pipe and assert the exact reply bytes
macro_rules! assert_wire {
    ($con:expr, $query:expr => $reply:expr) => {{
        tokio::io::AsyncWriteExt::write_all(&mut $con, $query)
            .await
            .unwrap();
        let mut ret = vec![0u8; $reply.len()];
        tokio::io::AsyncReadExt::read_exact(&mut $con, &mut ret)
            .await
            .unwrap();
        assert_eq!(ret.as_slice(), &$reply[..]);
    }};
}
