/*
 * Created on Sat Mar 22 2025
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

//! # `SET` queries

use crate::{actions::ActionResult, corestore::Data, dbnet::prelude::*};

action! {
    /// Run a `SET` query: `SET key value [PX milliseconds]`. A successful
    /// set replaces whatever was at the key before, whatever its kind
    fn set(handle: &Corestore, con: &mut Connection<C>, mut act: ActionIter<'a>) {
        ensure_length("set", act.len(), |len| len >= 2)?;
        let key = act
            .next()
            .unwrap_or_custom_aerr(wrong_number_of_arguments("set"))?;
        let value = act
            .next()
            .unwrap_or_custom_aerr(wrong_number_of_arguments("set"))?;
        let ttl_ms = match act.len() {
            0 => None,
            2 => {
                let option = act
                    .next()
                    .unwrap_or_custom_aerr(groups::SYNTAX_ERR)?;
                if !option.as_slice().eq_ignore_ascii_case(b"PX") {
                    return util::err(groups::SYNTAX_ERR);
                }
                let raw = act.next().unwrap_or_custom_aerr(groups::SYNTAX_ERR)?;
                Some(parse_expiry(raw)?)
            }
            _ => return util::err(groups::SYNTAX_ERR),
        };
        handle.string_set(key, value.clone(), ttl_ms);
        con.write_response(groups::OKAY).await?;
        Ok(())
    }
}

/// Parse the `PX` payload: a strictly positive count of milliseconds
fn parse_expiry(raw: &Data) -> ActionResult<u64> {
    let parsed = core::str::from_utf8(raw.as_slice())
        .ok()
        .and_then(|st| st.parse::<i64>().ok());
    match parsed {
        Some(ms) if ms > 0 => Ok(ms as u64),
        _ => util::err(groups::INVALID_EXPIRE_ERR),
    }
}
