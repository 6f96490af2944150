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

#[macro_use]
mod macros;
pub mod compiler;
pub mod error;

use {
    crate::actions::{ActionError, ActionResult},
    core::{future::Future, pin::Pin},
};

/// A boxed future bound to the caller's lifetime
pub type FutureResult<'s, T> = Pin<Box<dyn Future<Output = T> + Send + 's>>;

/// Returns a Result with the provided error
#[inline(never)]
#[cold]
pub fn err<T, E>(e: impl Into<E>) -> Result<T, E> {
    Err(e.into())
}

pub trait UnwrapActionError<T> {
    fn unwrap_or_custom_aerr(self, e: impl Into<ActionError>) -> ActionResult<T>;
}

impl<T> UnwrapActionError<T> for Option<T> {
    fn unwrap_or_custom_aerr(self, e: impl Into<ActionError>) -> ActionResult<T> {
        self.ok_or_else(|| e.into())
    }
}
