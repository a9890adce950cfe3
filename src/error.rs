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

//! Error types.

use nix::errno::Errno;
use std::fmt::{self, Display, Formatter};
use std::io;

/// The kind of error that occurred.
#[non_exhaustive]
#[derive(Debug)]
pub enum ErrorKind {
    /// Could not get terminal attributes.
    #[non_exhaustive]
    GetAttrFailed,
    /// Could not set terminal attributes.
    #[non_exhaustive]
    SetAttrFailed,
    /// Could not restore the saved terminal attributes.
    #[non_exhaustive]
    RestoreFailed,
    /// A restore was requested before any attributes had been saved.
    ///
    /// This is a sequencing error on the caller's part; no system call is
    /// made and [`Error::io_error`] is `None`.
    #[non_exhaustive]
    NotPrepared,
    /// Could not get terminal size.
    #[non_exhaustive]
    GetSizeFailed,
}

use ErrorKind::*;

impl ErrorKind {
    pub(crate) fn with(
        self,
        name: impl Into<CallName>,
    ) -> impl FnOnce(Errno) -> Error {
        let name = name.into();
        |errno| Error {
            kind: self,
            call: Some(name),
            io_error: Some(errno.into()),
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GetAttrFailed => write!(f, "could not get terminal attributes"),
            SetAttrFailed => write!(f, "could not set terminal attributes"),
            RestoreFailed => {
                write!(f, "could not restore terminal attributes")
            }
            NotPrepared => {
                write!(f, "restore called before any attributes were saved")
            }
            GetSizeFailed => write!(f, "could not get terminal size"),
        }
    }
}

/// The name of the function or `ioctl()` request that produced an error.
#[non_exhaustive]
#[derive(Debug)]
pub enum CallName {
    /// The name of the function that produced an error.
    #[non_exhaustive]
    Func(&'static str),
    /// The name of the `ioctl()` request that produced an error.
    #[non_exhaustive]
    Ioctl(&'static str),
}

impl Display for CallName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Func(name) => write!(f, "{name}()"),
            Self::Ioctl(name) => write!(f, "ioctl {name}"),
        }
    }
}

impl From<&'static str> for CallName {
    fn from(func: &'static str) -> Self {
        Self::Func(func)
    }
}

/// Returned by [`TermMode`](crate::TermMode) operations when an error
/// occurs.
///
/// Whether the failure came from the operating system can be read off
/// [`io_error`](Self::io_error): it is `Some` exactly when a system call
/// failed, and `None` for sequencing errors like [`ErrorKind::NotPrepared`].
#[non_exhaustive]
#[derive(Debug)]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// The name of the function or `ioctl()` request (if any) that produced
    /// an error.
    pub call: Option<CallName>,
    /// The underlying system error (if any) that occurred.
    pub io_error: Option<io::Error>,
}

impl Error {
    pub(crate) fn from_kind(kind: impl Into<ErrorKind>) -> Self {
        Self {
            kind: kind.into(),
            call: None,
            io_error: None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let errno = self
            .io_error
            .as_ref()
            .and_then(|e| e.raw_os_error())
            .map(Errno::from_raw);
        write!(f, "{}", self.kind)?;
        match (&self.call, errno) {
            (Some(call), Some(e)) => {
                write!(f, " ({call} returned {e})")
            }
            (Some(call), None) => {
                write!(f, " (from {call})")
            }
            (None, Some(e)) => {
                write!(f, " (got {e})")
            }
            (None, None) => Ok(()),
        }
    }
}

impl std::error::Error for Error {}
