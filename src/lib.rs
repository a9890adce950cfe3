/*
 * Copyright (C) 2024-2025 taylor.fish <contact@taylor.fish>
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

//! Toggle a terminal's cbreak (non-canonical) input mode.
//!
//! [`TermMode`] captures a terminal's line-discipline attributes, clears
//! canonical input processing so that reads see bytes as they are typed
//! rather than after a line terminator, and later reapplies the captured
//! attributes verbatim. Restoration can be explicit ([`TermMode::restore`])
//! or scoped ([`TermMode::guard`]), covering early returns and error paths:
//!
//! ```no_run
//! # fn main() -> Result<(), cbreak::Error> {
//! let mut mode = cbreak::TermMode::on_stdout();
//! {
//!     let _guard = mode.guard()?;
//!     // read input byte-by-byte...
//! }
//! // original attributes are back
//! # Ok(())
//! # }
//! ```

use std::io::{self, Stdout};
use std::mem::MaybeUninit;
use std::os::unix::io::{AsFd, AsRawFd, RawFd};

use log::{debug, error, trace};
use nix::libc;
use nix::sys::termios::{tcgetattr, tcsetattr, SetArg, Termios};

mod cbreak;
pub mod error;

pub use cbreak::cfmakecbreak;
pub use error::{CallName, Error, ErrorKind};

fn get_winsize(fd: RawFd) -> nix::Result<libc::winsize> {
    nix::ioctl_read_bad!(tiocgwinsz, libc::TIOCGWINSZ, libc::winsize);
    let mut size = MaybeUninit::uninit();
    unsafe { tiocgwinsz(fd, size.as_mut_ptr()) }?;
    Ok(unsafe { size.assume_init() })
}

/// Terminal dimensions in character cells.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TermSize {
    pub rows: usize,
    pub cols: usize,
}

/// Switches one terminal in and out of cbreak mode.
///
/// [`enter_cbreak`][Self::enter_cbreak] saves the terminal's current
/// attributes and disables canonical input processing;
/// [`restore`][Self::restore] reapplies the saved attributes. Each
/// successful enter overwrites the saved attributes with whatever is live
/// at that moment, so if something else reconfigured the terminal in
/// between, that intermediate state is what a later restore brings back.
///
/// The `&mut self` methods keep a single `TermMode` race-free, but nothing
/// stops two instances (or another process) from driving the same terminal;
/// callers that share a terminal must serialize access themselves.
#[derive(Debug)]
pub struct TermMode<F> {
    target: F,
    saved: Option<Termios>,
}

impl TermMode<Stdout> {
    /// A mode switcher for the process's standard output.
    pub fn on_stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<F: AsFd> TermMode<F> {
    /// Creates a mode switcher for `target`, which should refer to a
    /// terminal device. No attributes are read or changed until
    /// [`enter_cbreak`][Self::enter_cbreak] is called.
    pub fn new(target: F) -> Self {
        Self {
            target,
            saved: None,
        }
    }

    /// Whether original attributes have been captured by a successful
    /// [`enter_cbreak`][Self::enter_cbreak].
    pub fn is_prepared(&self) -> bool {
        self.saved.is_some()
    }

    /// Saves the terminal's current attributes, then disables canonical
    /// input processing.
    ///
    /// The new attributes are applied with `TCSAFLUSH`, so pending input
    /// and output are flushed before the change takes effect. On success,
    /// reads on the terminal return as soon as bytes are available.
    ///
    /// If reading the current attributes fails (e.g. the target is not a
    /// terminal), nothing is saved or changed. If reading succeeds but
    /// applying fails, the saved attributes are kept so that a later
    /// [`restore`][Self::restore] can still undo a partial switch.
    pub fn enter_cbreak(&mut self) -> Result<(), Error> {
        debug!("entering cbreak mode");
        let saved = tcgetattr(self.target.as_fd())
            .map_err(ErrorKind::GetAttrFailed.with("tcgetattr"))?;
        let mut attrs = saved.clone();
        // Saved before the apply; a failed tcsetattr may already have
        // changed some of the settings.
        self.saved = Some(saved);
        cfmakecbreak(&mut attrs);
        tcsetattr(self.target.as_fd(), SetArg::TCSAFLUSH, &attrs)
            .map_err(ErrorKind::SetAttrFailed.with("tcsetattr"))?;
        Ok(())
    }

    /// Reapplies the attributes saved by the most recent successful
    /// [`enter_cbreak`][Self::enter_cbreak], with the same `TCSAFLUSH`
    /// semantics.
    ///
    /// The saved attributes are kept, so calling this repeatedly reapplies
    /// the same configuration each time. Fails with
    /// [`ErrorKind::NotPrepared`] if nothing has been saved yet; no system
    /// call is made in that case.
    pub fn restore(&mut self) -> Result<(), Error> {
        debug!("restoring saved terminal attributes");
        let saved = self
            .saved
            .as_ref()
            .ok_or_else(|| Error::from_kind(ErrorKind::NotPrepared))?;
        tcsetattr(self.target.as_fd(), SetArg::TCSAFLUSH, saved)
            .map_err(ErrorKind::RestoreFailed.with("tcsetattr"))?;
        Ok(())
    }

    /// The terminal's current size.
    pub fn size(&self) -> Result<TermSize, Error> {
        trace!("querying terminal size");
        let size = get_winsize(self.target.as_fd().as_raw_fd()).map_err(
            ErrorKind::GetSizeFailed.with(CallName::Ioctl("TIOCGWINSZ")),
        )?;
        Ok(TermSize {
            rows: size.ws_row as usize,
            cols: size.ws_col as usize,
        })
    }

    /// Enters cbreak mode and returns a guard that restores the saved
    /// attributes when dropped.
    pub fn guard(&mut self) -> Result<CbreakGuard<'_, F>, Error> {
        self.enter_cbreak()?;
        Ok(CbreakGuard {
            mode: self,
        })
    }
}

/// Restores the saved terminal attributes when dropped.
///
/// Created by [`TermMode::guard`]. A restore failure during drop is logged
/// rather than propagated; call [`TermMode::restore`] directly when the
/// result matters.
#[derive(Debug)]
pub struct CbreakGuard<'a, F: AsFd> {
    mode: &'a mut TermMode<F>,
}

impl<F: AsFd> Drop for CbreakGuard<'_, F> {
    fn drop(&mut self) {
        match self.mode.restore() {
            Ok(()) => {
                trace!("restored terminal mode");
            }
            Err(e) => {
                error!("could not restore terminal mode: {e}");
            }
        }
    }
}
