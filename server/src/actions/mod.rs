/*
 * Created on Sat Mar 22 2025
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

//! # Actions
//!
//! Actions are like shell commands: you provide arguments, they write a
//! reply. This module contains a collection of the actions supported by
//! Coral

pub mod echo;
pub mod flushdb;
pub mod get;
pub mod keytype;
pub mod lists;
pub mod ping;
pub mod set;
pub mod xadd;

use {
    crate::{
        corestore::{Data, KeyspaceError, KeyspaceResult},
        protocol::responses::groups,
        util,
    },
    std::io::Error as IoError,
};

/// A generic result for actions
pub type ActionResult<T> = Result<T, ActionError>;

/// Errors that can occur while running actions. The first two variants
/// carry a complete pre-encoded error reply; only the I/O variant
/// terminates the connection
#[derive(Debug)]
pub enum ActionError {
    ActionError(&'static [u8]),
    ActionErrorOwned(Vec<u8>),
    IoError(IoError),
}

impl PartialEq for ActionError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::ActionError(a1), Self::ActionError(a2)) => a1 == a2,
            (Self::ActionErrorOwned(a1), Self::ActionErrorOwned(a2)) => a1 == a2,
            (Self::IoError(ioe1), Self::IoError(ioe2)) => ioe1.to_string() == ioe2.to_string(),
            _ => false,
        }
    }
}

impl From<&'static [u8]> for ActionError {
    fn from(e: &'static [u8]) -> Self {
        Self::ActionError(e)
    }
}

impl From<Vec<u8>> for ActionError {
    fn from(e: Vec<u8>) -> Self {
        Self::ActionErrorOwned(e)
    }
}

impl From<IoError> for ActionError {
    fn from(e: IoError) -> Self {
        Self::IoError(e)
    }
}

/// The canonical arity error for an action
pub fn wrong_number_of_arguments(action: &'static str) -> ActionError {
    ActionError::ActionErrorOwned(
        format!("-ERR wrong number of arguments for '{action}' command\r\n").into_bytes(),
    )
}

/// The reply for a name that isn't in the registry
pub fn unknown_command(name: &Data) -> ActionError {
    let name = String::from_utf8_lossy(name);
    ActionError::ActionErrorOwned(format!("-ERR unknown command '{name}'\r\n").into_bytes())
}

/// Validate the argument count before an action body runs
pub fn ensure_length(
    action: &'static str,
    len: usize,
    is_valid: fn(usize) -> bool,
) -> ActionResult<()> {
    if util::compiler::likely(is_valid(len)) {
        Ok(())
    } else {
        util::err(wrong_number_of_arguments(action))
    }
}

#[cold]
#[inline(never)]
fn map_keyspace_error(e: KeyspaceError) -> ActionError {
    let KeyspaceError::WrongType = e;
    ActionError::ActionError(groups::WRONGTYPE_ERR)
}

/// Translate a keyspace error into its wire reply
#[inline(always)]
pub fn translate_keyspace_error<T>(r: KeyspaceResult<T>) -> Result<T, ActionError> {
    match r {
        Ok(r) => Ok(r),
        Err(e) => Err(map_keyspace_error(e)),
    }
}
