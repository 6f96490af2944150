/*
 * Created on Sat Mar 01 2025
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

//! # List storage
//!
//! Lists are double-ended byte-blob sequences. An important invariant lives
//! here: a list key present in the keyspace is never empty. The pop that
//! drains a list also drops the key, and a push onto a missing key creates
//! it.

use {
    super::{
        keyspace::{Keyspace, KeyspaceError, KeyspaceResult, Value},
        Data,
    },
    std::collections::VecDeque,
};

#[derive(Debug, Clone, Copy)]
/// The end of the list a push lands on
pub enum ListSide {
    Head,
    Tail,
}

impl Keyspace {
    /// Verify that `key` is either absent or bound to a list
    pub fn ensure_list(&mut self, key: &Data, now: u64) -> KeyspaceResult<()> {
        self.evict_if_expired(key, now);
        match self.table.get(key) {
            Some(Value::List(_)) | None => Ok(()),
            Some(_) => Err(KeyspaceError::WrongType),
        }
    }
    /// Append the values on the given side, creating the list if needed.
    /// Returns the post-append length. Head pushes prepend the values one
    /// by one in argument order, so the *last* argument becomes the new
    /// head
    pub fn list_push(
        &mut self,
        key: &Data,
        values: Vec<Data>,
        side: ListSide,
        now: u64,
    ) -> KeyspaceResult<usize> {
        self.evict_if_expired(key, now);
        let list = match self
            .table
            .entry(key.clone())
            .or_insert_with(|| Value::List(VecDeque::new()))
        {
            Value::List(list) => list,
            _ => return Err(KeyspaceError::WrongType),
        };
        for value in values {
            match side {
                ListSide::Tail => list.push_back(value),
                ListSide::Head => list.push_front(value),
            }
        }
        Ok(list.len())
    }
    /// Pop the head value without a kind check, dropping the key if the
    /// list drains. Callers must have verified the kind
    pub(super) fn list_pop_head(&mut self, key: &Data) -> Option<Data> {
        let (ret, emptied) = match self.table.get_mut(key) {
            Some(Value::List(list)) => {
                let ret = list.pop_front();
                (ret, list.is_empty())
            }
            _ => return None,
        };
        if emptied {
            self.remove(key);
        }
        ret
    }
    /// Reinstate a value at the head. Used when a rendezvous hand-off found
    /// no live waiter after the value had already been taken
    pub(super) fn list_unpop_head(&mut self, key: &Data, value: Data) {
        if let Value::List(list) = self
            .table
            .entry(key.clone())
            .or_insert_with(|| Value::List(VecDeque::new()))
        {
            list.push_front(value);
        }
    }
    /// `LPOP` without a count
    pub fn list_pop(&mut self, key: &Data, now: u64) -> KeyspaceResult<Option<Data>> {
        self.ensure_list(key, now)?;
        Ok(self.list_pop_head(key))
    }
    /// `LPOP` with a count: up to `count` values off the head
    pub fn list_pop_count(
        &mut self,
        key: &Data,
        count: usize,
        now: u64,
    ) -> KeyspaceResult<Vec<Data>> {
        self.ensure_list(key, now)?;
        let mut ret = Vec::new();
        while ret.len() < count {
            match self.list_pop_head(key) {
                Some(value) => ret.push(value),
                None => break,
            }
        }
        Ok(ret)
    }
    /// List length; 0 for a missing key
    pub fn list_len(&mut self, key: &Data, now: u64) -> KeyspaceResult<usize> {
        self.evict_if_expired(key, now);
        match self.table.get(key) {
            Some(Value::List(list)) => Ok(list.len()),
            Some(_) => Err(KeyspaceError::WrongType),
            None => Ok(0),
        }
    }
    /// `LRANGE` with the usual index normalization: negative indices count
    /// from the tail, then `start` is clamped to 0 and `stop` to the last
    /// index; an inverted or out-of-range window is empty
    pub fn list_range(
        &mut self,
        key: &Data,
        start: i64,
        stop: i64,
        now: u64,
    ) -> KeyspaceResult<Vec<Data>> {
        self.evict_if_expired(key, now);
        let list = match self.table.get(key) {
            Some(Value::List(list)) => list,
            Some(_) => return Err(KeyspaceError::WrongType),
            None => return Ok(Vec::new()),
        };
        let len = list.len() as i64;
        let mut start = if start < 0 { start + len } else { start };
        let mut stop = if stop < 0 { stop + len } else { stop };
        if start < 0 {
            start = 0;
        }
        if stop > len - 1 {
            stop = len - 1;
        }
        if start > stop || start >= len {
            return Ok(Vec::new());
        }
        Ok(list
            .iter()
            .skip(start as usize)
            .take((stop - start + 1) as usize)
            .cloned()
            .collect())
    }
}
