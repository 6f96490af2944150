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

#[macro_export]
/// ## The action macro
///
/// A macro for adding all the _fuss_ to an action. Implementing actions should be simple
/// and should not require us to repeatedly specify generic parameters and/or trait bounds.
/// This is exactly what this macro does: does all the _magic_ behind the scenes for you,
/// including adding generic parameters, handling docs (if any), adding the correct
/// trait bounds and finally making your function async. Rest knowing that all your
/// action requirements have been happily addressed with this macro and that you don't have
/// to write a lot of code to do the exact same thing
///
///
/// ## Limitations
///
/// This macro can only handle mutable parameters for a fixed number of arguments (three)
///
macro_rules! action {
    (
        $($(#[$attr:meta])*
        fn $fname:ident($($argname:ident: $argty:ty),*)
        $block:block)*
    ) => {
            $($(#[$attr])*
            pub async fn $fname<'a, C: crate::dbnet::BufferedSocketStream>(
                $($argname: $argty,)*
            ) -> crate::actions::ActionResult<()>
            $block)*
    };
    (
        $($(#[$attr:meta])*
        fn $fname:ident($argone:ident: $argonety:ty,
            $argtwo:ident: $argtwoty:ty,
            mut $argthree:ident: $argthreety:ty)
        $block:block)*
    ) => {
            $($(#[$attr])*
            pub async fn $fname<'a, C: crate::dbnet::BufferedSocketStream>(
                $argone: $argonety,
                $argtwo: $argtwoty,
                mut $argthree: $argthreety,
            ) -> crate::actions::ActionResult<()>
            $block)*
    };
}

#[macro_export]
/// A match generator macro built specifically for the
/// `crate::queryengine::execute_simple` function
///
/// **NOTE:** This macro needs _paths_ for the right side of every $x => $y
/// pattern, to produce something sensible
macro_rules! gen_match {
    ($pre:expr, $raw:ident, $db:ident, $con:ident, $act:ident, $($x:pat => $y:path),* $(,)?) => {
        match $pre {
            // First repeat over all the $x => $y patterns, passing in the
            // variables and adding .await calls and the `?`
            $(
                $x => $y($db, $con, $act).await?,
            )*
            // Now add the final case where no action is matched
            _ => return crate::util::err(crate::actions::unknown_command($raw)),
        }
    };
}
