//! The traditional DES-based Unix password hash.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.
//!
//! This crate reproduces __crypt__(3) as found on Seventh Edition Unix and
//! its descendants: a password and a two-character salt yield a
//! 13-character hash. The output is bit-for-bit compatible with the
//! historical algorithm, quirks included, so that stored hashes can be
//! verified or migrated. It is not suitable for protecting new passwords.
//!
//! # Getting Started
//!
//! Add the following to the `[dependencies]` section of your `Cargo.toml`:
//!
//! ```toml
//! descrypt = "0.1"
//! ```
//!
//! # Examples
//!
//! To hash a password with a known salt:
//!
//! ```
//! assert_eq!(descrypt::crypt("password", "ab"), "abJnggxhB/yWI");
//! ```
//!
//! To verify a password against a stored hash:
//!
//! ```
//! use descrypt::unix_crypt;
//!
//! assert_eq!(unix_crypt::verify("test", "aZGJuE6EXrjEE"), true);
//! ```
//!
//! The [unix_crypt](unix_crypt) module also has functions for hashing with
//! a random salt, and for hashing with a salt which is checked for validity
//! instead of being accepted as-is.

#![warn(missing_docs)]

mod enc_dec;
pub mod error;
mod des_tables;
mod des_crypt;
pub mod unix_crypt;

pub use unix_crypt::crypt;

/// Type alias for the Result type.
pub type Result<T> = std::result::Result<T, error::Error>;

fn consteq(hash: &str, calchash: Result<String>) -> bool {
    let hstr = match calchash {
	Ok(hstr) => hstr,
	Err(_) => return false,
    };
    if hstr.is_empty() || hash.len() != hstr.len() {
	return false;
    }
    0 == hash.bytes().zip(hstr.bytes()).fold(0, |xs, (h1, h2)| xs | h1 ^ h2)
}

mod random {
    use rand::Rng;
    use rand::rngs::OsRng;
    use crate::enc_dec::encode_val;

    /// Generate a salt string of `chars` alphabet characters.
    pub fn gen_salt_str(chars: usize) -> String {
	let chars = chars.min(5);
	let bits = 6 * chars as u32;
	let val = OsRng.gen::<u32>() & ((1 << bits) - 1);
	encode_val(val, chars)
    }

    #[cfg(test)]
    mod tests {
	use super::gen_salt_str;
	use crate::enc_dec::hash64_index;

	#[test]
	fn salt_shape() {
	    for _ in 0..16 {
		let s = gen_salt_str(2);
		assert_eq!(s.len(), 2);
		assert!(s.chars().all(|c| hash64_index(c).is_some()));
	    }
	}
    }
}

#[cfg(test)]
mod tests {
    use super::consteq;
    use crate::error::Error;

    #[test]
    fn consteq_compares_whole_hash() {
	assert!(consteq("abJnggxhB/yWI", Ok("abJnggxhB/yWI".to_owned())));
	assert!(!consteq("abJnggxhB/yWJ", Ok("abJnggxhB/yWI".to_owned())));
	assert!(!consteq("abJnggxhB/yW", Ok("abJnggxhB/yWI".to_owned())));
	assert!(!consteq("", Ok(String::new())));
	assert!(!consteq("ab", Err(Error::EncodingError)));
    }
}
