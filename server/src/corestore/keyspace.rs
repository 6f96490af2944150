/*
 * Created on Sun Feb 23 2025
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

//! # The keyspace
//!
//! One namespace, one map. Every key is bound to exactly one [`Value`] and
//! the tag of that value *is* the declared kind of the key: there is no
//! separate kind table to fall out of sync with the stores. Operations of
//! one kind against a key of another kind fail with
//! [`KeyspaceError::WrongType`].

use {
    super::{streams::StreamEntry, Data},
    std::collections::{HashMap, VecDeque},
};

pub type KeyspaceResult<T> = Result<T, KeyspaceError>;

#[derive(Debug, PartialEq)]
/// Errors produced when routing a typed operation through the keyspace
pub enum KeyspaceError {
    /// The key is bound to a different kind
    WrongType,
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// The declared kind of a key
pub enum KeyKind {
    Str,
    List,
    Stream,
}

#[derive(Debug)]
/// A string entry along with its optional absolute expiry (epoch ms)
pub(super) struct StringEntry {
    pub(super) blob: Data,
    pub(super) expires_at: Option<u64>,
}

#[derive(Debug)]
/// The stored value of a key. The tag is the kind
pub(super) enum Value {
    Str(StringEntry),
    List(VecDeque<Data>),
    Stream(Vec<StreamEntry>),
}

impl Value {
    const fn kind(&self) -> KeyKind {
        match self {
            Value::Str(_) => KeyKind::Str,
            Value::List(_) => KeyKind::List,
            Value::Stream(_) => KeyKind::Stream,
        }
    }
}

/// The namespace router: holds at most one kind per key name and the value
/// bound under that kind
pub struct Keyspace {
    pub(super) table: HashMap<Data, Value>,
}

impl Keyspace {
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
        }
    }
    /// Lazily evict the key if it holds an expired string. Every typed
    /// operation funnels through this first so that a dead string key can
    /// be immediately rebound at any kind
    pub(super) fn evict_if_expired(&mut self, key: &Data, now: u64) {
        if let Some(Value::Str(entry)) = self.table.get(key) {
            if entry.expires_at.map_or(false, |at| now > at) {
                self.remove(key);
            }
        }
    }
    /// Drop a key along with its kind binding
    pub(super) fn remove(&mut self, key: &Data) -> bool {
        self.table.remove(key).is_some()
    }
    /// The declared kind of the key, honouring lazy expiry. `None` means
    /// the key doesn't exist
    pub fn kind_of(&mut self, key: &Data, now: u64) -> Option<KeyKind> {
        self.evict_if_expired(key, now);
        self.table.get(key).map(Value::kind)
    }
    /// Clear every key and kind binding
    pub fn flush(&mut self) {
        self.table.clear();
    }
    #[cfg(test)]
    pub fn contains(&self, key: &Data) -> bool {
        self.table.contains_key(key)
    }
}

// string ops
impl Keyspace {
    /// Bind `key` to a string, replacing a prior entry of *any* kind. With
    /// no expiry given, any prior expiry dies with the prior entry
    pub fn string_set(&mut self, key: &Data, blob: Data, expires_at: Option<u64>) {
        self.table
            .insert(key.clone(), Value::Str(StringEntry { blob, expires_at }));
    }
    /// Fetch the string at `key`. An expired entry is removed on this read
    /// and observed as absent
    pub fn string_get(&mut self, key: &Data, now: u64) -> KeyspaceResult<Option<Data>> {
        self.evict_if_expired(key, now);
        match self.table.get(key) {
            Some(Value::Str(entry)) => Ok(Some(entry.blob.clone())),
            Some(_) => Err(KeyspaceError::WrongType),
            None => Ok(None),
        }
    }
}
