/*
 * Created on Sun Mar 30 2025
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

//! # `BLPOP` queries
//!
//! The only suspending action. The suspension happens inside
//! [`Corestore::blpop`]; while it is pending this connection processes no
//! further frames, which is exactly the head-of-line behaviour blocking
//! pops are supposed to have.

use crate::{actions::ActionResult, corestore::Data, dbnet::prelude::*};

action! {
    /// Run a `BLPOP` query: `BLPOP key [key ...] timeout`. Replies with a
    /// `[key, value]` array, or the nil array on timeout
    fn blpop(handle: &Corestore, con: &mut Connection<C>, act: ActionIter<'a>) {
        ensure_length("blpop", act.len(), |len| len >= 2)?;
        let mut args: Vec<&Data> = act.collect();
        let timeout_ms = parse_timeout(
            args.pop()
                .unwrap_or_custom_aerr(wrong_number_of_arguments("blpop"))?,
        )?;
        let keys: Vec<Data> = args.into_iter().cloned().collect();
        match translate_keyspace_error(handle.blpop(&keys, timeout_ms).await)? {
            Some((key, value)) => {
                con.write_response(Element::Array(vec![
                    Element::BulkString(key),
                    Element::BulkString(value),
                ]))
                .await?
            }
            None => con.write_response(groups::NIL_ARRAY).await?,
        }
        Ok(())
    }
}

/// Parse the timeout: non-negative seconds, fractions allowed, converted
/// to milliseconds. `0` means wait forever
fn parse_timeout(raw: &Data) -> ActionResult<u64> {
    let secs = match core::str::from_utf8(raw.as_slice())
        .ok()
        .and_then(|st| st.parse::<f64>().ok())
    {
        Some(secs) if secs.is_finite() => secs,
        _ => return util::err(groups::TIMEOUT_NOT_FLOAT_ERR),
    };
    if secs < 0.0 {
        return util::err(groups::TIMEOUT_NEGATIVE_ERR);
    }
    Ok((secs * 1000.0) as u64)
}
