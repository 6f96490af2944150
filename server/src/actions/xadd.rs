/*
 * Created on Sat Mar 29 2025
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

//! # `XADD` queries

use crate::{
    corestore::{Data, StreamError},
    dbnet::prelude::*,
};

action! {
    /// Run an `XADD` query: `XADD key id field value [field value ...]`.
    /// Replies with the canonical text of the appended entry's ID
    fn xadd(handle: &Corestore, con: &mut Connection<C>, mut act: ActionIter<'a>) {
        // an odd field/value tail is an arity error, exactly like a
        // missing one
        ensure_length("xadd", act.len(), |len| len >= 4 && len % 2 == 0)?;
        let key = act
            .next()
            .unwrap_or_custom_aerr(wrong_number_of_arguments("xadd"))?;
        let id_spec = act
            .next()
            .unwrap_or_custom_aerr(wrong_number_of_arguments("xadd"))?;
        let mut fields = Vec::with_capacity(act.len() / 2);
        while let (Some(field), Some(value)) = (act.next(), act.next()) {
            fields.push((field.clone(), value.clone()));
        }
        match handle.stream_add(key, id_spec.as_slice(), fields) {
            Ok(id) => {
                con.write_response(Element::BulkString(Data::from_string(id.to_string())))
                    .await?
            }
            Err(StreamError::WrongType) => return util::err(groups::WRONGTYPE_ERR),
            Err(StreamError::InvalidId) => return util::err(groups::STREAM_ID_INVALID_ERR),
            Err(StreamError::IdBelowFloor) => return util::err(groups::STREAM_ID_FLOOR_ERR),
            Err(StreamError::IdNotGreaterThanTop) => return util::err(groups::STREAM_ID_TOP_ERR),
        }
        Ok(())
    }
}
