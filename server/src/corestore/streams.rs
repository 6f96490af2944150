/*
 * Created on Sun Mar 09 2025
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

//! # Stream storage
//!
//! Streams are append-only entry logs. Entry IDs are `(ms, seq)` pairs with
//! strict lexicographic monotonicity within a key; `0-0` is never stored.
//! The ID grammar accepted here is `<ms>-<seq>`, `<ms>-*` (auto-sequence)
//! and the bare `*` (fully automatic, resolved against the clock).

use {
    super::{
        keyspace::{Keyspace, Value},
        Data,
    },
    core::fmt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
/// A stream entry identifier. The derived ordering is lexicographic on
/// `(ms, seq)`, which is exactly the stream ordering
pub struct EntryId {
    pub ms: u64,
    pub seq: u64,
}

impl EntryId {
    /// The disallowed bottom element
    const FLOOR: EntryId = EntryId { ms: 0, seq: 0 };
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.ms, self.seq)
    }
}

#[derive(Debug)]
/// A single entry: its ID plus the field/value pairs in argument order
pub(super) struct StreamEntry {
    pub(super) id: EntryId,
    pub(super) fields: Vec<(Data, Data)>,
}

#[derive(Debug, PartialEq)]
/// Everything that can go wrong while appending to a stream
pub enum StreamError {
    /// The key is bound to another kind
    WrongType,
    /// The ID spec failed to parse
    InvalidId,
    /// The literal `0-0` was specified
    IdBelowFloor,
    /// The (resolved) ID is not strictly above the stream's top entry
    IdNotGreaterThanTop,
}

#[derive(Debug, PartialEq)]
/// A parsed ID spec, before resolution against the stream
enum IdSpec {
    Explicit(EntryId),
    AutoSeq(u64),
    Auto,
}

/// Parse one side of an `<ms>-<seq>` spec. Strict: digits only, so forms
/// like `+1` or `1_0` that `u64::from_str` would tolerate stay out
fn parse_part(part: &str) -> Result<u64, StreamError> {
    if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(StreamError::InvalidId);
    }
    part.parse().map_err(|_| StreamError::InvalidId)
}

fn parse_id_spec(spec: &[u8]) -> Result<IdSpec, StreamError> {
    let spec = core::str::from_utf8(spec).map_err(|_| StreamError::InvalidId)?;
    if spec == "*" {
        return Ok(IdSpec::Auto);
    }
    let (ms, seq) = spec.split_once('-').ok_or(StreamError::InvalidId)?;
    let ms = parse_part(ms)?;
    if seq == "*" {
        return Ok(IdSpec::AutoSeq(ms));
    }
    let seq = parse_part(seq)?;
    Ok(IdSpec::Explicit(EntryId { ms, seq }))
}

/// Resolve the sequence for a given `ms`: fresh streams and fresh
/// timestamps start at 0 (1 when `ms` is 0, so that `0-0` is never
/// produced); an equal timestamp continues from the top sequence
fn resolve_seq(ms: u64, top: Option<EntryId>) -> Result<u64, StreamError> {
    let seq = match top {
        Some(top) if ms < top.ms => return Err(StreamError::IdNotGreaterThanTop),
        Some(top) if ms == top.ms => match top.seq.checked_add(1) {
            Some(seq) => seq,
            None => return Err(StreamError::IdNotGreaterThanTop),
        },
        _ => {
            if ms == 0 {
                1
            } else {
                0
            }
        }
    };
    Ok(seq)
}

/// Resolve a parsed spec into a concrete ID. The fully automatic spec takes
/// the clock's timestamp unless the stream top is already ahead of it
fn resolve_id(spec: IdSpec, top: Option<EntryId>, now: u64) -> Result<EntryId, StreamError> {
    let id = match spec {
        IdSpec::Explicit(id) => id,
        IdSpec::AutoSeq(ms) => EntryId {
            ms,
            seq: resolve_seq(ms, top)?,
        },
        IdSpec::Auto => {
            let ms = match top {
                Some(top) if top.ms > now => top.ms,
                _ => now,
            };
            EntryId {
                ms,
                seq: resolve_seq(ms, top)?,
            }
        }
    };
    Ok(id)
}

impl Keyspace {
    /// Append an entry to the stream at `key`, creating the key if absent.
    /// Returns the canonical ID of the new entry
    pub fn stream_add(
        &mut self,
        key: &Data,
        id_spec: &[u8],
        fields: Vec<(Data, Data)>,
        now: u64,
    ) -> Result<EntryId, StreamError> {
        let spec = parse_id_spec(id_spec)?;
        if spec == IdSpec::Explicit(EntryId::FLOOR) {
            return Err(StreamError::IdBelowFloor);
        }
        self.evict_if_expired(key, now);
        let top = match self.table.get(key) {
            Some(Value::Stream(entries)) => entries.last().map(|entry| entry.id),
            Some(_) => return Err(StreamError::WrongType),
            None => None,
        };
        let id = resolve_id(spec, top, now)?;
        if let Some(top) = top {
            if id <= top {
                return Err(StreamError::IdNotGreaterThanTop);
            }
        }
        if let Value::Stream(entries) = self
            .table
            .entry(key.clone())
            .or_insert_with(|| Value::Stream(Vec::new()))
        {
            entries.push(StreamEntry { id, fields });
        }
        Ok(id)
    }
    #[cfg(test)]
    /// The entry IDs currently in the stream, in append order
    pub fn stream_ids(&self, key: &Data) -> Vec<EntryId> {
        match self.table.get(key) {
            Some(Value::Stream(entries)) => entries.iter().map(|entry| entry.id).collect(),
            _ => Vec::new(),
        }
    }
}
