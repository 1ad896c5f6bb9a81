//! Error values.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.
//!
//! The legacy hash itself never fails; errors are only produced by the
//! strict entry points which refuse to create new hashes with a malformed
//! salt.
use std::fmt;
use std::error::Error as StdError;

/// Possible errors.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// The salt contains a character outside of `[./0-9A-Za-z]`.
    EncodingError,
    /// The salt is shorter than two characters.
    InsufficientLength,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::EncodingError => write!(f, "Invalid salt encoding"),
            Error::InsufficientLength => write!(f, "Salt is too short"),
        }
    }
}

impl StdError for Error {}
