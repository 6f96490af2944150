/*
 * Created on Sun Mar 16 2025
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

use {
    self::connection::Connection,
    crate::{
        actions::ActionError, corestore::Corestore, protocol::responses::groups, queryengine,
        IoResult,
    },
    std::{cell::Cell, sync::Arc, time::Duration},
    tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        sync::{broadcast, mpsc, Semaphore},
        time,
    },
};

pub use self::{listener::connect, tcp::Listener};

pub mod connection;
#[macro_use]
mod macros;
mod listener;
pub mod prelude;
mod tcp;

/// The default ceiling on concurrent connections
pub const MAXIMUM_CONNECTION_LIMIT: usize = 50000;

/// This is a "marker trait" that ensures that no silly types are
/// passed into the [`Connection`] type
pub trait BufferedSocketStream: AsyncReadExt + AsyncWriteExt + Unpin + Send + Sync {}

/// Result of [`Connection::read_query`]
pub enum QueryResult {
    /// A parsed frame, ready to dispatch
    Q(crate::protocol::Query),
    /// The client closed the connection cleanly
    Disconnected,
    /// The stream carried a malformed frame. Fatal
    ProtocolError,
}

/// A backoff implementation that is meant to be used in connection loops
pub(self) struct NetBackoff {
    c: Cell<u8>,
}

impl NetBackoff {
    /// The maximum backoff duration
    const MAX_BACKOFF: u8 = 64;
    /// Create a new [`NetBackoff`] instance
    pub const fn new() -> Self {
        Self { c: Cell::new(1) }
    }
    /// Wait for the current backoff duration
    pub async fn spin(&self) {
        time::sleep(Duration::from_secs(self.c.get() as _)).await;
        self.c.set(self.c.get() << 1);
    }
    /// Should we disconnect the stream?
    pub fn should_disconnect(&self) -> bool {
        self.c.get() > Self::MAX_BACKOFF
    }
}

/// A generic connection handler: read a frame, dispatch it, write the
/// reply, watch for the termination signal
pub struct ConnectionHandler<C> {
    /// an atomic reference to the shared in-memory engine
    db: Corestore,
    /// the connection
    con: Connection<C>,
    /// the semaphore used to impose limits on the number of connections
    climit: Arc<Semaphore>,
    /// check for termination signals
    termination_signal: broadcast::Receiver<()>,
    /// the sender we drop when we're done with handling a connection
    /// (used for graceful exit)
    _term_sig_tx: mpsc::Sender<()>,
}

impl<C> ConnectionHandler<C>
where
    C: BufferedSocketStream,
{
    /// Create a new connection handler
    pub fn new(
        db: Corestore,
        con: Connection<C>,
        climit: Arc<Semaphore>,
        termination_signal: broadcast::Receiver<()>,
        _term_sig_tx: mpsc::Sender<()>,
    ) -> Self {
        Self {
            db,
            con,
            climit,
            termination_signal,
            _term_sig_tx,
        }
    }
    pub async fn run(&mut self) -> IoResult<()> {
        loop {
            let packet = tokio::select! {
                pkt = self.con.read_query() => pkt,
                _ = self.termination_signal.recv() => {
                    return Ok(());
                }
            };
            match packet? {
                QueryResult::Q(query) => {
                    match queryengine::execute_simple(&self.db, &mut self.con, query).await {
                        Ok(()) => {}
                        Err(ActionError::ActionError(e)) => self.con.write_response(e).await?,
                        Err(ActionError::ActionErrorOwned(e)) => self.con.write_response(e).await?,
                        Err(ActionError::IoError(e)) => return Err(e),
                    }
                    self.con.flush_stream().await?;
                }
                QueryResult::ProtocolError => {
                    // broken framing is fatal: reply, flush and hang up
                    self.con.write_response(groups::PROTOCOL_ERR).await?;
                    self.con.flush_stream().await?;
                    return Ok(());
                }
                QueryResult::Disconnected => return Ok(()),
            }
        }
    }
}

impl<C> Drop for ConnectionHandler<C> {
    fn drop(&mut self) {
        // Make sure that the permit is returned to the semaphore
        // in the case that there is a panic inside
        self.climit.add_permits(1);
    }
}
