/*
 * Created on Fri Mar 21 2025
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

//! A 'prelude' for actions that interface with the engine and the client
//!
//! This module is hollow itself, it only re-exports from across the crate

pub use {
    super::{connection::Connection, BufferedSocketStream},
    crate::{
        actions::{ensure_length, translate_keyspace_error, wrong_number_of_arguments},
        corestore::Corestore,
        protocol::{element::Element, responses::groups},
        queryengine::ActionIter,
        util::{self, UnwrapActionError},
    },
};
