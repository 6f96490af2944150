/*
 * Created on Sat Feb 22 2025
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

//! # The core in-memory engine
//!
//! [`Corestore`] is the cloneable handle every connection task holds. The
//! backing state is one [`parking_lot::Mutex`] over the keyspace *and* the
//! blocking rendezvous tables: a push and the notification it triggers
//! happen inside a single critical section, so a woken `BLPOP` can never
//! race a concurrent pop for its value. All store operations are
//! synchronous and non-blocking; the only suspension point in here is
//! [`Corestore::blpop`] waiting on its rendezvous channel.

pub mod clock;
mod keyspace;
mod lists;
mod streams;

pub use self::{
    keyspace::{KeyKind, KeyspaceError, KeyspaceResult},
    lists::ListSide,
    streams::{EntryId, StreamError},
};

use {
    self::{clock::Clock, keyspace::Keyspace},
    crate::blocking::BlockingManager,
    bytes::Bytes,
    core::{ops::Deref, time::Duration},
    parking_lot::{Mutex, MutexGuard},
    std::sync::Arc,
    tokio::time,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// An immutable shared byte blob: the currency for keys, values and
/// arguments across the engine. Clones are reference bumps
pub struct Data {
    blob: Bytes,
}

impl Data {
    /// Create a new `Data` by copying the provided slice
    pub fn copy_from_slice(slice: &[u8]) -> Self {
        Self {
            blob: Bytes::copy_from_slice(slice),
        }
    }
    /// Take ownership of a string's buffer
    pub fn from_string(st: String) -> Self {
        Self {
            blob: Bytes::from(st.into_bytes()),
        }
    }
    pub fn as_slice(&self) -> &[u8] {
        &self.blob
    }
}

impl Deref for Data {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.blob
    }
}

impl AsRef<[u8]> for Data {
    fn as_ref(&self) -> &[u8] {
        &self.blob
    }
}

impl From<&'static str> for Data {
    fn from(st: &'static str) -> Self {
        Self {
            blob: Bytes::from_static(st.as_bytes()),
        }
    }
}

/// The shared backing state
struct Shared {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
}

/// Everything under the single state lock
struct State {
    keyspace: Keyspace,
    blocking: BlockingManager,
}

#[derive(Clone)]
/// An atomic reference to the shared in-memory engine
pub struct Corestore {
    shared: Arc<Shared>,
}

impl Corestore {
    /// Create an engine driven by the provided clock
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    keyspace: Keyspace::new(),
                    blocking: BlockingManager::new(),
                }),
                clock,
            }),
        }
    }
    /// Create an engine on the system clock
    pub fn new_system() -> Self {
        Self::new(Arc::new(clock::SystemClock))
    }
    fn lock(&self) -> MutexGuard<'_, State> {
        self.shared.state.lock()
    }
    fn now(&self) -> u64 {
        self.shared.clock.now_ms()
    }
}

// strings
impl Corestore {
    pub fn string_get(&self, key: &Data) -> KeyspaceResult<Option<Data>> {
        let now = self.now();
        self.lock().keyspace.string_get(key, now)
    }
    pub fn string_set(&self, key: &Data, blob: Data, ttl_ms: Option<u64>) {
        let expires_at = ttl_ms.map(|ttl| self.now().saturating_add(ttl));
        self.lock().keyspace.string_set(key, blob, expires_at);
    }
}

// lists
impl Corestore {
    /// Append and rendezvous. The append happens first; then, still inside
    /// the same critical section, one value per appended element is handed
    /// to a live waiter in FIFO order, each value popped off the head right
    /// before the hand-off. The returned length is the post-append length,
    /// before any waiter consumed its share
    pub fn list_push(&self, key: &Data, values: Vec<Data>, side: ListSide) -> KeyspaceResult<usize> {
        let now = self.now();
        let mut state = self.lock();
        let State { keyspace, blocking } = &mut *state;
        let appended = values.len();
        let len = keyspace.list_push(key, values, side, now)?;
        for _ in 0..appended {
            if !blocking.has_live_waiter(key) {
                break;
            }
            let value = match keyspace.list_pop_head(key) {
                Some(value) => value,
                None => break,
            };
            if let Err(value) = blocking.deliver(key, value) {
                // every waiter died between the liveness check and the
                // hand-off; the value goes back where it came from
                keyspace.list_unpop_head(key, value);
                break;
            }
        }
        Ok(len)
    }
    pub fn list_pop(&self, key: &Data) -> KeyspaceResult<Option<Data>> {
        let now = self.now();
        self.lock().keyspace.list_pop(key, now)
    }
    pub fn list_pop_count(&self, key: &Data, count: usize) -> KeyspaceResult<Vec<Data>> {
        let now = self.now();
        self.lock().keyspace.list_pop_count(key, count, now)
    }
    pub fn list_len(&self, key: &Data) -> KeyspaceResult<usize> {
        let now = self.now();
        self.lock().keyspace.list_len(key, now)
    }
    pub fn list_range(&self, key: &Data, start: i64, stop: i64) -> KeyspaceResult<Vec<Data>> {
        let now = self.now();
        self.lock().keyspace.list_range(key, start, stop, now)
    }
}

// streams
impl Corestore {
    pub fn stream_add(
        &self,
        key: &Data,
        id_spec: &[u8],
        fields: Vec<(Data, Data)>,
    ) -> Result<EntryId, StreamError> {
        let now = self.now();
        self.lock().keyspace.stream_add(key, id_spec, fields, now)
    }
}

// namespace
impl Corestore {
    pub fn kind_of(&self, key: &Data) -> Option<KeyKind> {
        let now = self.now();
        self.lock().keyspace.kind_of(key, now)
    }
    pub fn flushdb(&self) {
        self.lock().keyspace.flush();
    }
}

// blocking
impl Corestore {
    /// `BLPOP`: try every key in order under the lock; if nothing pops,
    /// register on all of them and suspend until a push hands over a
    /// `(key, value)` pair, the timeout elapses, or the operation is
    /// cancelled. A timeout of 0 waits forever
    pub async fn blpop(
        &self,
        keys: &[Data],
        timeout_ms: u64,
    ) -> KeyspaceResult<Option<(Data, Data)>> {
        let now = self.now();
        let (id, waitrx) = {
            let mut state = self.lock();
            for key in keys {
                state.keyspace.ensure_list(key, now)?;
            }
            for key in keys {
                if let Some(value) = state.keyspace.list_pop_head(key) {
                    return Ok(Some((key.clone(), value)));
                }
            }
            state.blocking.register(keys)
        };
        // the guard unregisters us on every exit path: delivery (no-op by
        // then), timeout, client disconnect and task teardown
        let _guard = WaitGuard {
            shared: &*self.shared,
            id,
            keys,
        };
        let ret = if timeout_ms == 0 {
            waitrx.await.ok()
        } else {
            match time::timeout(Duration::from_millis(timeout_ms), waitrx).await {
                Ok(ret) => ret.ok(),
                Err(_elapsed) => None,
            }
        };
        Ok(ret)
    }
    /// Cancel every outstanding blocking operation. Their `BLPOP` calls
    /// resolve to the nil array
    pub fn cancel_all_waiters(&self) {
        self.lock().blocking.cancel_all();
    }
}

#[cfg(test)]
impl Corestore {
    pub fn contains_key(&self, key: &Data) -> bool {
        self.lock().keyspace.contains(key)
    }
    pub fn stream_entry_ids(&self, key: &Data) -> Vec<EntryId> {
        self.lock().keyspace.stream_ids(key)
    }
}

/// Removes a blocking operation from every key it registered on, whether
/// it completed, timed out or its task was dropped mid-wait
struct WaitGuard<'a> {
    shared: &'a Shared,
    id: u64,
    keys: &'a [Data],
}

impl Drop for WaitGuard<'_> {
    fn drop(&mut self) {
        self.shared
            .state
            .lock()
            .blocking
            .unregister(self.id, self.keys);
    }
}
