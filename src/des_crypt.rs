// DES machinery for the traditional Unix crypt.
//
// Copyright (c) 2016 Ivan Nejgebauer <inejge@gmail.com>
//
// Licensed under the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>. This file may not be copied,
// modified, or distributed except according to the terms of this
// license.

use byteorder::{ByteOrder, LittleEndian};
use crate::des_tables::{CON_SALT, SHIFTS2, SKB, SP_TRANS};
use crate::enc_dec::crypt_hash64_encode;

/// Number of DES key rounds.
const ITERATIONS: usize = 16;
/// Number of times the block is encrypted.
const CRYPT_ROUNDS: usize = 25;
/// Significant password length.
const KEY_LEN: usize = 8;

/// Exchange the bits of `b` selected by `m` with the bits of `a` selected
/// by `m << n`.
#[inline]
fn perm_op(a: u32, b: u32, n: u32, m: u32) -> (u32, u32) {
    let t = ((a >> n) ^ b) & m;
    (a ^ (t << n), b ^ t)
}

/// Exchange bits within a single word, `16 - n` positions apart.
#[inline]
fn hperm_op(a: u32, n: i32, m: u32) -> u32 {
    let s = (16 - n) as u32;
    let t = ((a << s) ^ a) & m;
    a ^ t ^ (t >> s)
}

/// Subkey schedule: two words per key round.
pub struct KeySchedule([u32; ITERATIONS * 2]);

impl KeySchedule {
    /// Expand an eight-byte key, parity bits in the low bit of each byte.
    pub fn new(key: &[u8; KEY_LEN]) -> KeySchedule {
	let mut c = LittleEndian::read_u32(&key[..4]);
	let mut d = LittleEndian::read_u32(&key[4..]);

	// PC1
	let (d1, c1) = perm_op(d, c, 4, 0x0f0f0f0f);
	c = hperm_op(c1, -2, 0xcccc0000);
	d = hperm_op(d1, -2, 0xcccc0000);
	let (d1, c1) = perm_op(d, c, 1, 0x55555555);
	let (c1, d1) = perm_op(c1, d1, 8, 0x00ff00ff);
	let (d1, c1) = perm_op(d1, c1, 1, 0x55555555);
	d = ((d1 & 0x000000ff) << 16) | (d1 & 0x0000ff00)
	    | ((d1 & 0x00ff0000) >> 16) | ((c1 & 0xf0000000) >> 4);
	c = c1 & 0x0fffffff;

	let mut ks = [0u32; ITERATIONS * 2];
	for (i, &double) in SHIFTS2.iter().enumerate() {
	    if double {
		c = (c >> 2) | (c << 26);
		d = (d >> 2) | (d << 26);
	    } else {
		c = (c >> 1) | (c << 27);
		d = (d >> 1) | (d << 27);
	    }
	    c &= 0x0fffffff;
	    d &= 0x0fffffff;

	    let s = SKB[0][(c & 0x3f) as usize]
		| SKB[1][(((c >> 6) & 0x03) | ((c >> 7) & 0x3c)) as usize]
		| SKB[2][(((c >> 13) & 0x0f) | ((c >> 14) & 0x30)) as usize]
		| SKB[3][(((c >> 20) & 0x01) | ((c >> 21) & 0x06) | ((c >> 22) & 0x38)) as usize];
	    let t = SKB[4][(d & 0x3f) as usize]
		| SKB[5][(((d >> 7) & 0x03) | ((d >> 8) & 0x3c)) as usize]
		| SKB[6][((d >> 15) & 0x3f) as usize]
		| SKB[7][(((d >> 21) & 0x0f) | ((d >> 22) & 0x30)) as usize];

	    ks[2 * i] = (t << 16) | (s & 0x0000ffff);
	    ks[2 * i + 1] = ((s >> 16) | (t & 0xffff0000)).rotate_left(4);
	}
	KeySchedule(ks)
    }
}

/// Salt-derived masks selecting which expansion bits get swapped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SaltMasks {
    e0: u32,
    e1: u32,
}

impl SaltMasks {
    /// Build the masks from two salt characters. Characters past the
    /// ASCII range contribute nothing.
    pub fn new(s0: char, s1: char) -> SaltMasks {
	SaltMasks {
	    e0: salt_bits(s0),
	    e1: salt_bits(s1) << 4,
	}
    }
}

fn salt_bits(c: char) -> u32 {
    CON_SALT.get(c as usize).copied().unwrap_or(0) as u32
}

/// One application of the round function, returning the updated `l`.
#[inline]
fn d_encrypt(l: u32, r: u32, ks: &[u32], salt: SaltMasks) -> u32 {
    let v = r ^ (r >> 16);
    let u = v & salt.e0;
    let v = v & salt.e1;
    let u = (u ^ (u << 16)) ^ r ^ ks[0];
    let t = (v ^ (v << 16)) ^ r ^ ks[1];
    let t = t.rotate_right(4);

    l ^ (SP_TRANS[1][(t & 0x3f) as usize]
	| SP_TRANS[3][((t >> 8) & 0x3f) as usize]
	| SP_TRANS[5][((t >> 16) & 0x3f) as usize]
	| SP_TRANS[7][((t >> 24) & 0x3f) as usize]
	| SP_TRANS[0][(u & 0x3f) as usize]
	| SP_TRANS[2][((u >> 8) & 0x3f) as usize]
	| SP_TRANS[4][((u >> 16) & 0x3f) as usize]
	| SP_TRANS[6][((u >> 24) & 0x3f) as usize])
}

/// Encrypt an all-zero block 25 times, returning the two output words.
pub fn des_cipher(ks: &KeySchedule, salt: SaltMasks) -> (u32, u32) {
    let (mut l, mut r) = (0u32, 0u32);
    for _ in 0..CRYPT_ROUNDS {
	for pair in ks.0.chunks(4) {
	    l = d_encrypt(l, r, &pair[..2], salt);
	    r = d_encrypt(r, l, &pair[2..], salt);
	}
	std::mem::swap(&mut l, &mut r);
    }

    // FP
    let (r, l) = (l.rotate_right(1), r.rotate_right(1));
    let (r, l) = perm_op(r, l, 1, 0x55555555);
    let (l, r) = perm_op(l, r, 8, 0x00ff00ff);
    let (r, l) = perm_op(r, l, 2, 0x33333333);
    let (l, r) = perm_op(l, r, 16, 0x0000ffff);
    let (r, l) = perm_op(r, l, 4, 0x0f0f0f0f);
    (l, r)
}

/// Spread the first eight password bytes over the key, leaving the low
/// (parity) bit of each byte clear.
pub fn pass_to_key(pass: &[u8]) -> [u8; KEY_LEN] {
    let mut key = [0u8; KEY_LEN];
    for (k, &p) in key.iter_mut().zip(pass.iter()) {
	*k = p << 1;
    }
    key
}

/// The traditional crypt(3) DES hash.
///
/// Never fails: an empty salt gives an empty string, a single salt
/// character is doubled, and extra salt characters are ignored.
pub fn unix_crypt(pass: &[u8], salt: &str) -> String {
    let mut sc = salt.chars();
    let s0 = match sc.next() {
	Some(c) => c,
	None => return String::new(),
    };
    let s1 = sc.next().unwrap_or(s0);

    let ks = KeySchedule::new(&pass_to_key(pass));
    let (l, r) = des_cipher(&ks, SaltMasks::new(s0, s1));
    let mut buf = [0u8; 8];
    LittleEndian::write_u32(&mut buf[..4], l);
    LittleEndian::write_u32(&mut buf[4..], r);

    let mut out = String::with_capacity(13);
    out.push(s0);
    out.push(s1);
    out.push_str(&crypt_hash64_encode(&buf));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perm_primitives() {
	assert_eq!(perm_op(0x12345678, 0x9abcdef0, 4, 0x0f0f0f0f), (0xa2c4e608, 0x91b3d5f7));
	assert_eq!(hperm_op(0x12345678, -2, 0xcccc0000), 0x5af04449);
	assert_eq!(perm_op(0xdeadbeef, 0x01234567, 3, 0), (0xdeadbeef, 0x01234567));
    }

    #[test]
    fn zero_key_schedule() {
	let ks = KeySchedule::new(&[0; 8]);
	assert!(ks.0.iter().all(|&k| k == 0));
    }

    #[test]
    fn password_key_schedule() {
	let ks = KeySchedule::new(&pass_to_key(b"password"));
	assert_eq!(&ks.0[..4], &[0x151d3f37, 0x1133a3f2, 0x040c2e35, 0x91b3f2b3]);
	assert_eq!(ks.0[31], 0x23a3f3d2);
    }

    #[test]
    fn parity_bit_ignored() {
	assert_eq!(pass_to_key(b"ab"), [0xc2, 0xc4, 0, 0, 0, 0, 0, 0]);
	assert_eq!(pass_to_key(b"\xe1\xe2"), pass_to_key(b"ab"));
	assert_eq!(pass_to_key(b"123456789"), pass_to_key(b"12345678"));
    }

    #[test]
    fn cipher_words() {
	let ks = KeySchedule::new(&pass_to_key(b"password"));
	assert_eq!(des_cipher(&ks, SaltMasks::new('a', 'b')), (0xf62c3b57, 0x25fa41d3));
    }

    #[test]
    fn salt_masks() {
	assert_eq!(SaltMasks::new('.', '.'), SaltMasks { e0: 0, e1: 0 });
	assert_eq!(SaltMasks::new('z', 'z'), SaltMasks { e0: 0x3f, e1: 0x3f0 });
	assert_eq!(SaltMasks::new('!', 'é'), SaltMasks::new('.', '.'));
    }

    #[test]
    fn avalanche() {
	let zero = SaltMasks::new('.', '.');
	let mut total = 0;
	let mut trials = 0;
	let bases: [&[u8]; 4] = [b"password", b"abcdefgh", &[0u8; 8], b"Secret!!"];
	for base in bases.iter() {
	    let (l, r) = des_cipher(&KeySchedule::new(&pass_to_key(base)), zero);
	    let reference = ((l as u64) << 32) | r as u64;
	    for i in 0..8 {
		// The top bit of each byte is shifted out of the key.
		for bit in 0..7 {
		    let mut flipped = base.to_vec();
		    flipped[i] ^= 1 << bit;
		    let (l, r) = des_cipher(&KeySchedule::new(&pass_to_key(&flipped)), zero);
		    let out = ((l as u64) << 32) | r as u64;
		    let diff = (reference ^ out).count_ones();
		    assert!(diff > 0);
		    total += diff;
		    trials += 1;
		}
	    }
	}
	let avg = total as f64 / trials as f64;
	assert!(avg > 24.0 && avg < 40.0, "average flipped bits: {}", avg);
    }

    #[test]
    fn output_shape() {
	let h = unix_crypt(b"password", "ab");
	assert_eq!(h, "abJnggxhB/yWI");
	assert_eq!(unix_crypt(b"password", ""), "");
	assert_eq!(unix_crypt(b"password", "a"), unix_crypt(b"password", "aa"));
	assert_eq!(unix_crypt(b"password", "abcd"), h);
    }
}
