/*
 * Copyright (C) 2024 taylor.fish <contact@taylor.fish>
 *
 * This file is part of Cbreak.
 *
 * Cbreak is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Cbreak is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Cbreak. If not, see <https://www.gnu.org/licenses/>.
 */

use nix::sys::termios::{LocalFlags, Termios};

/// Puts `t` into cbreak mode by clearing canonical input processing.
///
/// Unlike `cfmakeraw`, every other setting is left alone: echo, signal
/// generation, and output processing keep their current values. Only line
/// buffering goes away.
pub fn cfmakecbreak(t: &mut Termios) {
    t.local_flags &= !LocalFlags::ICANON;
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::pty::openpty;
    use nix::sys::termios::tcgetattr;

    #[test]
    fn clears_only_icanon() {
        let pty = openpty(None, None).unwrap();
        let before = tcgetattr(&pty.slave).unwrap();
        let mut after = before.clone();
        cfmakecbreak(&mut after);
        assert!(!after.local_flags.contains(LocalFlags::ICANON));
        assert_eq!(
            after.local_flags | LocalFlags::ICANON,
            before.local_flags | LocalFlags::ICANON,
        );
        assert_eq!(after.input_flags, before.input_flags);
        assert_eq!(after.output_flags, before.output_flags);
        assert_eq!(after.control_flags, before.control_flags);
        assert_eq!(after.control_chars, before.control_chars);
    }
}
