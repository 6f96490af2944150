/*
 * Created on Sun Apr 06 2025
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
    crate::{config::ServerConfig, corestore::Corestore, dbnet, util::error::CoralResult},
    tokio::sync::broadcast,
};

#[cfg(unix)]
use {
    core::{future::Future, pin::Pin, task::Context, task::Poll},
    tokio::signal::unix::{signal as fnsignal, Signal, SignalKind},
};

#[cfg(unix)]
/// Object to bind to unix-specific signals
pub struct UnixTerminationSignal {
    sigterm: Signal,
}

#[cfg(unix)]
impl UnixTerminationSignal {
    pub fn init() -> CoralResult<Self> {
        let sigterm = fnsignal(SignalKind::terminate())?;
        Ok(Self { sigterm })
    }
}

#[cfg(unix)]
impl Future for UnixTerminationSignal {
    type Output = Option<()>;

    fn poll(mut self: Pin<&mut Self>, ctx: &mut Context<'_>) -> Poll<Self::Output> {
        self.sigterm.poll_recv(ctx)
    }
}

/// Start the server and wait for incoming connections or a termsig
pub async fn run(config: ServerConfig) -> CoralResult<()> {
    // initialize the broadcast channel
    let (signal, _) = broadcast::channel(1);
    let db = Corestore::new_system();

    // bind the ctrlc handler
    let sig = tokio::signal::ctrl_c();

    // bind the listener
    let mut server = dbnet::connect(
        config.host,
        config.port,
        config.maxcon,
        db.clone(),
        signal.clone(),
    )
    .await?;

    #[cfg(not(unix))]
    {
        // Non-unix, usually Windows specific signal handling
        tokio::select! {
            _ = server.run() => {}
            _ = sig => {}
        }
    }
    #[cfg(unix)]
    {
        let sigterm = UnixTerminationSignal::init()?;
        // apart from CTRL+C, the only other thing we care about is SIGTERM
        tokio::select! {
            _ = server.run() => {},
            _ = sig => {},
            _ = sigterm => {}
        }
    }

    log::info!("Signalling all workers to shut down");
    // drop the signal and let the connection tasks exit
    drop(signal);
    // wake every suspended BLPOP so its connection can observe termination
    db.cancel_all_waiters();
    server.finish_with_termsig().await;
    Ok(())
}
