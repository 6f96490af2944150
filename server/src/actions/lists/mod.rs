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

//! # List actions

pub mod blpop;

use crate::{
    actions::ActionResult,
    corestore::{Data, ListSide},
    dbnet::prelude::*,
};

action! {
    /// Run an `LPUSH` query
    fn lpush(handle: &Corestore, con: &mut Connection<C>, act: ActionIter<'a>) {
        push(handle, con, act, "lpush", ListSide::Head).await
    }
    /// Run an `RPUSH` query
    fn rpush(handle: &Corestore, con: &mut Connection<C>, act: ActionIter<'a>) {
        push(handle, con, act, "rpush", ListSide::Tail).await
    }
}

/// The shared push body: append, then reply with the post-append length
async fn push<'a, C: BufferedSocketStream>(
    handle: &Corestore,
    con: &mut Connection<C>,
    mut act: ActionIter<'a>,
    action: &'static str,
    side: ListSide,
) -> ActionResult<()> {
    ensure_length(action, act.len(), |len| len >= 2)?;
    let key = act
        .next()
        .unwrap_or_custom_aerr(wrong_number_of_arguments(action))?;
    let values: Vec<Data> = act.cloned().collect();
    let len = translate_keyspace_error(handle.list_push(key, values, side))?;
    con.write_response(len).await?;
    Ok(())
}

action! {
    /// Run an `LLEN` query
    fn llen(handle: &Corestore, con: &mut Connection<C>, mut act: ActionIter<'a>) {
        ensure_length("llen", act.len(), |len| len == 1)?;
        let key = act
            .next()
            .unwrap_or_custom_aerr(wrong_number_of_arguments("llen"))?;
        let len = translate_keyspace_error(handle.list_len(key))?;
        con.write_response(len).await?;
        Ok(())
    }
    /// Run an `LRANGE` query: `LRANGE key start stop`, indices inclusive,
    /// negatives counting from the tail
    fn lrange(handle: &Corestore, con: &mut Connection<C>, mut act: ActionIter<'a>) {
        ensure_length("lrange", act.len(), |len| len == 3)?;
        let key = act
            .next()
            .unwrap_or_custom_aerr(wrong_number_of_arguments("lrange"))?;
        let start = parse_int(act.next().unwrap_or_custom_aerr(groups::NOT_AN_INT_ERR)?)?;
        let stop = parse_int(act.next().unwrap_or_custom_aerr(groups::NOT_AN_INT_ERR)?)?;
        let values = translate_keyspace_error(handle.list_range(key, start, stop))?;
        con.write_response(Element::Array(
            values.into_iter().map(Element::BulkString).collect(),
        ))
        .await?;
        Ok(())
    }
    /// Run an `LPOP` query: `LPOP key [count]`. Without a count the reply
    /// is a single bulk (nil bulk when missing); with a count it is an
    /// array, possibly empty
    fn lpop(handle: &Corestore, con: &mut Connection<C>, mut act: ActionIter<'a>) {
        ensure_length("lpop", act.len(), |len| len == 1 || len == 2)?;
        let key = act
            .next()
            .unwrap_or_custom_aerr(wrong_number_of_arguments("lpop"))?;
        match act.next() {
            None => match translate_keyspace_error(handle.list_pop(key))? {
                Some(value) => con.write_response(Element::BulkString(value)).await?,
                None => con.write_response(groups::NIL).await?,
            },
            Some(raw) => {
                let count = parse_int(raw)?;
                let values = if count <= 0 {
                    // a non-positive count never mutates, but the kind of
                    // the key is still enforced
                    translate_keyspace_error(handle.list_len(key))?;
                    Vec::new()
                } else {
                    translate_keyspace_error(handle.list_pop_count(key, count as usize))?
                };
                con.write_response(Element::Array(
                    values.into_iter().map(Element::BulkString).collect(),
                ))
                .await?;
            }
        }
        Ok(())
    }
}

/// Parse a signed integer argument (an index or a count)
fn parse_int(raw: &Data) -> ActionResult<i64> {
    core::str::from_utf8(raw.as_slice())
        .ok()
        .and_then(|st| st.parse::<i64>().ok())
        .unwrap_or_custom_aerr(groups::NOT_AN_INT_ERR)
}
