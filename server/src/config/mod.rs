/*
 * Created on Sat Apr 05 2025
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

//! # Server configuration
//!
//! The configuration surface is deliberately small: a listen address, a
//! port and a connection ceiling, all off the command line. Anything that
//! fails validation is reported before we touch the network.

use {
    crate::dbnet::MAXIMUM_CONNECTION_LIMIT,
    clap::Parser,
    core::{fmt, str::FromStr},
    std::net::IpAddr,
};

// server defaults
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 6379;

#[derive(Parser, Debug)]
#[command(
    name = "corald",
    version,
    about = "Coral: an in-memory data structure server speaking RESP2"
)]
struct Cli {
    #[arg(
        short = 'H',
        long,
        default_value = DEFAULT_HOST,
        help = "Sets the address to which the server binds"
    )]
    host: String,
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_PORT,
        help = "Sets the port to which the server binds"
    )]
    port: u16,
    #[arg(
        long,
        default_value_t = MAXIMUM_CONNECTION_LIMIT,
        help = "Sets the maximum number of concurrent connections"
    )]
    maxcon: usize,
}

/// The evaluated server configuration
#[derive(Debug, PartialEq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub maxcon: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    BadHost(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadHost(host) => {
                write!(f, "Configuration error: `{host}` is not a valid bind address")
            }
        }
    }
}

/// Evaluate the command line into a [`ServerConfig`]
pub fn get_config() -> Result<ServerConfig, ConfigError> {
    evaluate(Cli::parse())
}

fn evaluate(cli: Cli) -> Result<ServerConfig, ConfigError> {
    let host = IpAddr::from_str(&cli.host).map_err(|_| ConfigError::BadHost(cli.host.clone()))?;
    Ok(ServerConfig {
        host,
        port: cli.port,
        maxcon: cli.maxcon,
    })
}
