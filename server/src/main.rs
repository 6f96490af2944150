/*
 * Created on Sat Feb 08 2025
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

//! # Coral
//!
//! The `corald` crate (or the `server` folder) is Coral's database server and
//! maybe is the most important part of the project. There are several modules
//! within this crate; see the modules for their respective documentation.

#[macro_use]
pub mod util;
mod actions;
mod arbiter;
mod blocking;
mod config;
mod corestore;
mod dbnet;
mod protocol;
mod queryengine;
mod resp;
#[cfg(test)]
mod tests;

use {
    env_logger::Builder,
    libcoral::{util::terminal, URL, VERSION},
    std::{env, process},
};

/// A generic I/O result
pub type IoResult<T> = std::io::Result<T>;

#[cfg(not(target_env = "msvc"))]
use jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
/// Jemallocator - this is the default memory allocator for platforms other than msvc
static GLOBAL: Jemalloc = Jemalloc;

fn main() {
    Builder::new()
        .parse_filters(&env::var("CORAL_LOG").unwrap_or_else(|_| "info".to_owned()))
        .init();
    // evaluate the command line before we touch the network
    let cfg = match config::get_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            log::error!("{}", e);
            process::exit(0x100);
        }
    };
    println!("Coral v{} | {}", VERSION, URL);
    // Start the server which asynchronously waits for a CTRL+C signal
    // which will safely shut down the server
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("server")
        .enable_all()
        .build()
        .unwrap();
    let result = runtime.block_on(arbiter::run(cfg));
    // Make sure all workers terminate
    drop(runtime);
    if let Err(e) = result {
        log::error!("{}", e);
        process::exit(0x100);
    }
    log::info!("Stopped accepting incoming connections");
    terminal::write_info("Goodbye :)\n").unwrap();
}
