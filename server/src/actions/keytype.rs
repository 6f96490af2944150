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

//! # `TYPE` queries

use crate::{corestore::KeyKind, dbnet::prelude::*};

action! {
    /// Run a `TYPE` query: the declared kind of the key, `none` if absent.
    /// An expired string key reads as `none`
    fn keytype(handle: &Corestore, con: &mut Connection<C>, mut act: ActionIter<'a>) {
        ensure_length("type", act.len(), |len| len == 1)?;
        let key = act
            .next()
            .unwrap_or_custom_aerr(wrong_number_of_arguments("type"))?;
        let ret = match handle.kind_of(key) {
            Some(KeyKind::Str) => groups::TYPE_STRING,
            Some(KeyKind::List) => groups::TYPE_LIST,
            Some(KeyKind::Stream) => groups::TYPE_STREAM,
            None => groups::TYPE_NONE,
        };
        con.write_response(ret).await?;
        Ok(())
    }
}
