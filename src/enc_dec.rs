// Encoding and decoding routines.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.

use crate::error::Error;
use super::Result;

/// The crypt Base64 alphabet; maps a 6-bit value to its output character.
pub const CRYPT_HASH64: &[u8] = b"./0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

// Reverse of CRYPT_HASH64 for characters 0x20..0x80; 0x40 marks a character
// outside the alphabet.
const CRYPT_HASH64_ENC_MAP: &[u8] = b"\x40\x40\x40\x40\x40\x40\x40\x40\x40\x40\x40\x40\x40\x40\x00\x01\
				      \x02\x03\x04\x05\x06\x07\x08\x09\x0a\x0b\x40\x40\x40\x40\x40\x40\
				      \x40\x0c\x0d\x0e\x0f\x10\x11\x12\x13\x14\x15\x16\x17\x18\x19\x1a\
				      \x1b\x1c\x1d\x1e\x1f\x20\x21\x22\x23\x24\x25\x40\x40\x40\x40\x40\
				      \x40\x26\x27\x28\x29\x2a\x2b\x2c\x2d\x2e\x2f\x30\x31\x32\x33\x34\
				      \x35\x36\x37\x38\x39\x3a\x3b\x3c\x3d\x3e\x3f\x40\x40\x40\x40\x40";

/// Position of `c` in the crypt alphabet, if it belongs to it.
pub fn hash64_index(c: char) -> Option<u8> {
    let b = (c as u32).wrapping_sub(0x20);
    if b >= CRYPT_HASH64_ENC_MAP.len() as u32 {
	return None;
    }
    match CRYPT_HASH64_ENC_MAP[b as usize] {
	0x40 => None,
	dec => Some(dec),
    }
}

/// Encode bytes six bits at a time, most significant bit first.
///
/// The last group is padded with zero bits, and no padding characters are
/// emitted: eight bytes (64 bits, padded to 66) give eleven characters.
pub fn crypt_hash64_encode(bs: &[u8]) -> String {
    let ngroups = (bs.len() + 2) / 3;
    let mut out = String::with_capacity(ngroups * 4);
    for g in 0..ngroups {
	let mut g_idx = g * 3;
	let mut enc = 0u32;
	for _ in 0..3 {
	    let b = (if g_idx < bs.len() { bs[g_idx] } else { 0 }) as u32;
	    enc <<= 8;
	    enc |= b;
	    g_idx += 1;
	}
	for _ in 0..4 {
	    out.push(CRYPT_HASH64[((enc >> 18) & 0x3F) as usize] as char);
	    enc <<= 6;
	}
    }
    match bs.len() % 3 {
	1 => { out.pop(); out.pop(); },
	2 => { out.pop(); },
	_ => (),
    }
    out
}

/// Decode the first `len` characters of `val` as a little-endian
/// sequence of 6-bit digits.
pub fn decode_val(val: &str, len: usize) -> Result<u32> {
    let mut processed = 0;
    let mut s = 0u32;
    for c in val.chars().take(len) {
	let dec = hash64_index(c).ok_or(Error::EncodingError)?;
	s |= (dec as u32) << (6 * processed);
	processed += 1;
    }
    if processed < len {
	return Err(Error::InsufficientLength);
    }
    Ok(s)
}

/// Encode the low `6 * nhex` bits of `val`, least significant digit first.
pub fn encode_val(mut val: u32, nhex: usize) -> String {
    let nhex = nhex.min(5);
    let mut out = String::with_capacity(nhex);
    for _ in 0..nhex {
	out.push(CRYPT_HASH64[(val & 0x3F) as usize] as char);
	val >>= 6;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn index_of_alphabet() {
	for (i, &c) in CRYPT_HASH64.iter().enumerate() {
	    assert_eq!(hash64_index(c as char), Some(i as u8));
	}
	assert_eq!(hash64_index('!'), None);
	assert_eq!(hash64_index('\n'), None);
	assert_eq!(hash64_index('\u{7f}'), None);
	assert_eq!(hash64_index('é'), None);
    }

    #[test]
    fn encode_eight_bytes() {
	assert_eq!(crypt_hash64_encode(&[0; 8]), "...........");
	assert_eq!(crypt_hash64_encode(&[0xff; 8]), "zzzzzzzzzzw");
	assert_eq!(crypt_hash64_encode(&[0x04, 0x10, 0x41]), "////");
    }

    #[test]
    fn salt_values() {
	assert_eq!(decode_val("ab", 2), Ok(0x26 | (0x27 << 6)));
	assert_eq!(decode_val("..", 2), Ok(0));
	assert_eq!(decode_val("zz", 2), Ok(0xfff));
	assert_eq!(decode_val("a", 2), Err(Error::InsufficientLength));
	assert_eq!(decode_val("a!", 2), Err(Error::EncodingError));
	assert_eq!(encode_val(0x26 | (0x27 << 6), 2), "ab");
	assert_eq!(encode_val(0xfff, 2), "zz");
    }
}
