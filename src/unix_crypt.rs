//! Seventh Edition Unix DES-based hash.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.
//!
//! The original Unix password-hashing algorithm, extremely weak by
//! today's standards. It should be used for backward compatibility only.
//!
//! # Example
//!
//! ```
//! use descrypt::unix_crypt;
//!
//! assert_eq!(unix_crypt::crypt("password", "ab"), "abJnggxhB/yWI");
//! assert_eq!(unix_crypt::verify("password", "abJnggxhB/yWI"), true);
//! ```
//!
//! # Parameters
//!
//! * __Password length__: effectively eight 7-bit characters; anything
//! longer is ignored.
//!
//! * __Salt length__: 2 characters (12 bits).
//!
//! * __Rounds__: 25 (fixed).
//!
//! # Hash Format
//!
//! The format of the hash is *`{salt}`*_`{checksum}`_, where:
//!
//! * *`{salt}`* is the 2-character salt, copied verbatim.
//!
//! * *`{checksum}`* is a 11-character Base64 encoding of the checksum.
//!
//! # Legacy Salts
//!
//! [`crypt`](fn.crypt.html) accepts any salt, as historical implementations
//! did: an empty salt produces an empty string, a single character is used
//! twice, and characters outside `[./0-9A-Za-z]` are mixed in through the
//! salt table instead of being rejected. Use [`hash_with`](fn.hash_with.html)
//! to refuse such salts when creating new hashes.

use super::{Result, consteq};
use crate::des_crypt::unix_crypt;
use crate::enc_dec::decode_val;
use crate::random;

/// Salt length.
pub const SALT_LEN: usize = 2;
/// Length of a complete hash, salt included.
pub const HASH_LEN: usize = 13;

/// Hash a password with a salt, the way __crypt__(3) does.
///
/// Only the first eight bytes of the password are significant, and only
/// the first two characters of the salt; a full hash may be passed as the
/// salt. The result is empty if and only if the salt is empty.
pub fn crypt<B: AsRef<[u8]>>(pass: B, salt: &str) -> String {
    unix_crypt(pass.as_ref(), salt)
}

/// Hash a password with a randomly generated salt.
#[deprecated(since="0.1.0", note="don't use this algorithm for new passwords")]
pub fn hash<B: AsRef<[u8]>>(pass: B) -> Result<String> {
    let saltstr = random::gen_salt_str(SALT_LEN);
    Ok(unix_crypt(pass.as_ref(), &saltstr))
}

/// Hash a password with a user-provided salt.
///
/// An error is returned if the salt is too short or contains an invalid
/// character.
#[deprecated(since="0.1.0", note="don't use this algorithm for new passwords")]
pub fn hash_with<B: AsRef<[u8]>>(salt: &str, pass: B) -> Result<String> {
    decode_val(salt, SALT_LEN)?;
    Ok(unix_crypt(pass.as_ref(), salt))
}

/// Verify that the hash corresponds to a password.
pub fn verify<B: AsRef<[u8]>>(pass: B, hash: &str) -> bool {
    consteq(hash, Ok(unix_crypt(pass.as_ref(), hash)))
}

#[cfg(test)]
mod tests {
    use super::{crypt, verify, HASH_LEN};
    use crate::enc_dec::hash64_index;
    use crate::error::Error;

    const VECTORS: &[(&str, &str, &str)] = &[
	("password", "ab", "abJnggxhB/yWI"),
	("test", "aZ", "aZGJuE6EXrjEE"),
	("password", "xO", "xOAFZqRz5RduI"),
	("", "..", "..X8NBuQ4l6uQ"),
	("a", "zz", "zzJZ5PtvFqi9o"),
	("a", "ab", "abxxB7HlIeckU"),
	("foob", "ar", "arlEKn0OzVJn."),
	("Hello", "99", "99vWQB0EzsRMg"),
	("secret", "/.", "/.4WmlAsvgZlI"),
	("abcdefgh", "XY", "XYmSk.T1Jmlp2"),
	("ZZZZZZZZ", "zZ", "zZee6sYSm.FqU"),
	("hello world", "./", "./KCkU8uoC6eg"),
	("correct horse", "cH", "cHbXJrt60EtuA"),
	("12345678901", "Ab", "AblUWF9Hc6PgQ"),
    ];

    #[test]
    fn conformance() {
	for &(pass, salt, expected) in VECTORS {
	    assert_eq!(crypt(pass, salt), expected, "pass {:?} salt {:?}", pass, salt);
	}
    }

    #[test]
    #[allow(deprecated)]
    fn custom() {
	assert_eq!("aZGJuE6EXrjEE", super::hash_with("aZ", "test").unwrap());
	assert_eq!("aZGJuE6EXrjEE", super::hash_with("aZGJuE6EXrjEE", "test").unwrap());
	assert_eq!(super::verify("test", "aZGJuE6EXrjEE"), true);
	assert_eq!(super::verify("test", "aZFJuE6EXrjEE"), false);
	assert_eq!(super::verify("test", "!!"), false);
    }

    #[test]
    #[allow(deprecated)]
    fn bad_salt_chars() {
	assert_eq!(super::hash_with("!!", "test"), Err(Error::EncodingError));
	assert_eq!(super::hash_with("a\u{e9}", "test"), Err(Error::EncodingError));
    }

    #[test]
    #[allow(deprecated)]
    fn short_salt() {
	assert_eq!(super::hash_with("Z", "test"), Err(Error::InsufficientLength));
	assert_eq!(super::hash_with("", "test"), Err(Error::InsufficientLength));
    }

    #[test]
    #[allow(deprecated)]
    fn random_salt() {
	let h = super::hash("password").unwrap();
	assert_eq!(h.len(), HASH_LEN);
	assert!(h.chars().all(|c| hash64_index(c).is_some()));
	assert!(verify("password", &h));
    }

    #[test]
    fn deterministic() {
	assert_eq!(crypt("determinism", "dT"), crypt("determinism", "dT"));
	assert_eq!(crypt(b"\xff\x80abc".to_vec(), "Zz"), crypt(b"\xff\x80abc", "Zz"));
    }

    #[test]
    fn empty_salt() {
	assert_eq!(crypt("", ""), "");
	assert_eq!(crypt("password", ""), "");
	assert_eq!(crypt("a much longer password", ""), "");
    }

    #[test]
    fn empty_hash_never_verifies() {
	assert_eq!(verify("", ""), false);
	assert_eq!(verify("password", ""), false);
    }

    #[test]
    fn single_char_salt() {
	for c in "./09AZaz".chars() {
	    let single = c.to_string();
	    let double = format!("{}{}", c, c);
	    assert_eq!(crypt("password", &single), crypt("password", &double));
	}
	assert_eq!(crypt("test", "a"), crypt("test", "aa"));
    }

    #[test]
    fn salt_echo_and_shape() {
	for salt in &["ab", "..", "zz", "9/", "Qx", "!!", "a\u{e9}"] {
	    let h = crypt("password", salt);
	    assert_eq!(h.chars().count(), HASH_LEN);
	    assert!(h.starts_with(salt));
	    assert!(h.chars().skip(2).all(|c| hash64_index(c).is_some()));
	}
    }

    #[test]
    fn truncation() {
	assert_eq!(crypt("toolongpassword", "ab"), "abE5rBYmyFy.g");
	assert_eq!(crypt("toolongp", "ab"), "abE5rBYmyFy.g");
	assert_eq!(crypt("12345678", "Ab"), crypt("12345678901", "Ab"));
	assert_eq!(verify("toolongpXXXX", "abE5rBYmyFy.g"), true);
    }

    #[test]
    fn out_of_alphabet_salt() {
	assert_eq!(crypt("test", "!!"), "!!9sjyf8zL76k");
	assert_eq!(&crypt("test", "!!")[2..], &crypt("test", "..")[2..]);
	assert_eq!(verify("test", "!!9sjyf8zL76k"), true);
    }

    #[test]
    fn salt_sensitivity() {
	let salts = ["ab", "ac", "ba", "..", "./", "zz", "zy", "Aa", "aA", "09"];
	let mut suffixes = salts.iter().map(|s| crypt("password", s)[2..].to_owned()).collect::<Vec<_>>();
	suffixes.sort();
	suffixes.dedup();
	assert_eq!(suffixes.len(), salts.len());
    }
}
