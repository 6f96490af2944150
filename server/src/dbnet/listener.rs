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

use {
    crate::{
        corestore::Corestore,
        dbnet::tcp::Listener,
        util::error::{CoralResult, Error},
    },
    std::{net::IpAddr, sync::Arc},
    tokio::{
        net::TcpListener,
        sync::{broadcast, mpsc, Semaphore},
    },
};

/// The base TCP listener
pub struct BaseListener {
    /// An atomic reference to the shared engine
    pub db: Corestore,
    /// The incoming connection listener (binding)
    pub listener: TcpListener,
    /// The maximum number of connections
    pub climit: Arc<Semaphore>,
    /// The shutdown broadcaster
    pub signal: broadcast::Sender<()>,
    // When all `Sender`s are dropped - the `Receiver` gets a `None` value;
    // we send a clone of `terminate_tx` to each connection handler
    pub terminate_tx: mpsc::Sender<()>,
    pub terminate_rx: mpsc::Receiver<()>,
}

impl BaseListener {
    pub async fn init(
        db: &Corestore,
        host: IpAddr,
        port: u16,
        semaphore: Arc<Semaphore>,
        signal: broadcast::Sender<()>,
    ) -> CoralResult<Self> {
        let (terminate_tx, terminate_rx) = mpsc::channel(1);
        let listener = TcpListener::bind((host, port))
            .await
            .map_err(|e| Error::ioerror_extra(e, format!("binding to port {port}")))?;
        Ok(Self {
            db: db.clone(),
            listener,
            climit: semaphore,
            signal,
            terminate_tx,
            terminate_rx,
        })
    }
    /// Wait for every connection task to drop its drain-channel sender
    pub async fn release_self(self) {
        let Self {
            mut terminate_rx,
            terminate_tx,
            signal,
            ..
        } = self;
        drop(signal);
        drop(terminate_tx);
        let _ = terminate_rx.recv().await;
    }
}

/// Initialize the server networking
pub async fn connect(
    host: IpAddr,
    port: u16,
    maxcon: usize,
    db: Corestore,
    signal: broadcast::Sender<()>,
) -> CoralResult<Listener> {
    let climit = Arc::new(Semaphore::new(maxcon));
    let base = BaseListener::init(&db, host, port, climit, signal).await?;
    let server = Listener::new(base);
    log::info!("Server started on coral://{host}:{port}");
    Ok(server)
}
