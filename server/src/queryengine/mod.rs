/*
 * Created on Sun Mar 16 2025
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

//! # The Query Engine
//!
//! Resolves the first element of a frame against the action registry
//! (case-insensitively) and hands the remaining elements to the matched
//! action as an [`ActionIter`].

use crate::{
    actions,
    corestore::{Corestore, Data},
    dbnet::{connection::Connection, BufferedSocketStream},
    protocol::{responses::groups, Query},
};

/// An iterator over an action's arguments
pub struct ActionIter<'a> {
    iter: core::slice::Iter<'a, Data>,
}

impl<'a> ActionIter<'a> {
    pub fn new(args: &'a [Data]) -> Self {
        Self { iter: args.iter() }
    }
    /// The number of arguments that haven't been consumed yet
    pub fn len(&self) -> usize {
        self.iter.len()
    }
}

impl<'a> Iterator for ActionIter<'a> {
    type Item = &'a Data;
    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

/// Execute a simple query
pub async fn execute_simple<C: BufferedSocketStream>(
    db: &Corestore,
    con: &mut Connection<C>,
    query: Query,
) -> actions::ActionResult<()> {
    let (name, args) = match query.args().split_first() {
        Some(parts) => parts,
        // the parser rejects empty frames, so this is belt-and-braces
        None => return crate::util::err(groups::PROTOCOL_ERR),
    };
    let action = name.to_ascii_uppercase();
    let act = ActionIter::new(args);
    gen_match!(
        action.as_slice(),
        name,
        db,
        con,
        act,
        b"PING" => actions::ping::ping,
        b"ECHO" => actions::echo::echo,
        b"GET" => actions::get::get,
        b"SET" => actions::set::set,
        b"RPUSH" => actions::lists::rpush,
        b"LPUSH" => actions::lists::lpush,
        b"LPOP" => actions::lists::lpop,
        b"LRANGE" => actions::lists::lrange,
        b"LLEN" => actions::lists::llen,
        b"BLPOP" => actions::lists::blpop::blpop,
        b"XADD" => actions::xadd::xadd,
        b"TYPE" => actions::keytype::keytype,
        b"FLUSHDB" => actions::flushdb::flushdb,
    );
    Ok(())
}
