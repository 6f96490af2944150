/*
 * Created on Sun Mar 23 2025
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

//! # `FLUSHDB` queries

use crate::dbnet::prelude::*;

action! {
    /// Run a `FLUSHDB` query: drops every key and kind binding
    fn flushdb(handle: &Corestore, con: &mut Connection<C>, act: ActionIter<'a>) {
        ensure_length("flushdb", act.len(), |len| len == 0)?;
        handle.flushdb();
        con.write_response(groups::OKAY).await?;
        Ok(())
    }
}
