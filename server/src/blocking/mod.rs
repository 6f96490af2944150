/*
 * Created on Sat Mar 15 2025
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

//! # Blocking rendezvous
//!
//! The waiter layer behind `BLPOP`. Every suspended consumer is one entry
//! in the central `active` table, referenced by id from the FIFO queue of
//! every key it watches. The manager itself is plain data: all mutation
//! happens under the corestore state lock, which is what makes
//! push-then-notify atomic with respect to every other pop.
//!
//! Delivery semantics:
//! - FIFO fairness: queues are walked front to back, so waiters wake in
//!   registration order
//! - at-most-once: the winner is pulled from the `active` table and purged
//!   from every queue *before* it is signalled
//! - progress under cancellation: dead ids found on a queue are skipped and
//!   discarded; a hand-off that finds its receiver already gone recovers
//!   the value and tries the next waiter

use {
    crate::corestore::Data,
    std::collections::{HashMap, VecDeque},
    tokio::sync::oneshot,
};

/// What a woken waiter receives: the key that fired and the value that was
/// popped for it
pub type WaitPayload = (Data, Data);

/// A single pending blocking operation
struct PendingOp {
    tx: oneshot::Sender<WaitPayload>,
    keys: Vec<Data>,
}

/// Per-key FIFO queues plus the central table of active operations
pub struct BlockingManager {
    waiting: HashMap<Data, VecDeque<u64>>,
    active: HashMap<u64, PendingOp>,
    next_id: u64,
}

impl BlockingManager {
    pub fn new() -> Self {
        Self {
            waiting: HashMap::new(),
            active: HashMap::new(),
            next_id: 0,
        }
    }
    /// Enqueue a new operation at the tail of every key's FIFO. Returns the
    /// operation id and the receiving half of the rendezvous channel
    pub fn register(&mut self, keys: &[Data]) -> (u64, oneshot::Receiver<WaitPayload>) {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        let (tx, rx) = oneshot::channel();
        self.active.insert(
            id,
            PendingOp {
                tx,
                keys: keys.to_vec(),
            },
        );
        for key in keys {
            self.waiting.entry(key.clone()).or_default().push_back(id);
        }
        (id, rx)
    }
    /// Does this key have at least one waiter that can still be woken?
    pub fn has_live_waiter(&self, key: &Data) -> bool {
        self.waiting
            .get(key)
            .map_or(false, |queue| queue.iter().any(|id| self.active.contains_key(id)))
    }
    /// Hand `(key, value)` to the oldest live waiter on `key`. If nobody
    /// takes it, the value comes back through `Err` so the caller can
    /// reinstate it
    pub fn deliver(&mut self, key: &Data, value: Data) -> Result<(), Data> {
        let mut value = value;
        while let Some(id) = self.pop_front_waiter(key) {
            let op = match self.active.remove(&id) {
                Some(op) => op,
                None => continue,
            };
            self.purge(id, &op.keys);
            match op.tx.send((key.clone(), value)) {
                Ok(()) => return Ok(()),
                // the receiver was dropped between our liveness check and
                // the send; recover the value, try the next in line
                Err((_key, recovered)) => value = recovered,
            }
        }
        Err(value)
    }
    /// Remove an operation (timeout, disconnect, task teardown). A no-op if
    /// the operation was already delivered to
    pub fn unregister(&mut self, id: u64, keys: &[Data]) {
        if self.active.remove(&id).is_some() {
            self.purge(id, keys);
        }
    }
    /// Drop every pending operation; each receiver resolves to "cancelled"
    pub fn cancel_all(&mut self) {
        self.active.clear();
        self.waiting.clear();
    }
    /// Pop the next queued id off the key's FIFO, skipping ids whose
    /// operation is already gone
    fn pop_front_waiter(&mut self, key: &Data) -> Option<u64> {
        let queue = self.waiting.get_mut(key)?;
        let ret = loop {
            match queue.pop_front() {
                Some(id) if self.active.contains_key(&id) => break Some(id),
                Some(_) => continue,
                None => break None,
            }
        };
        if self.waiting.get(key).map_or(false, VecDeque::is_empty) {
            self.waiting.remove(key);
        }
        ret
    }
    /// Remove the id from every key FIFO it sits in
    fn purge(&mut self, id: u64, keys: &[Data]) {
        for key in keys {
            if let Some(queue) = self.waiting.get_mut(key) {
                queue.retain(|this| *this != id);
                if queue.is_empty() {
                    self.waiting.remove(key);
                }
            }
        }
    }
}
