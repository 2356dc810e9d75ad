//! Implementation of the [Trivium] stream cipher.
//!
//! Trivium is a hardware-oriented synchronous stream cipher with an 80-bit
//! key, an 80-bit initialization vector and a 288-bit internal state,
//! selected for the final eSTREAM hardware portfolio. This crate realizes it
//! in software with a word-parallel (SWAR) update that produces up to
//! `W - 1` keystream bits per step for a `W`-bit backing word, while staying
//! bit-identical to the one-bit-at-a-time reference update.
//!
//! Cipher functionality is accessed using traits from the re-exported
//! [`cipher`](https://docs.rs/cipher) crate.
//!
//! # Security Warning
//!
//! This crate does not ensure ciphertexts are authentic, which can lead to
//! serious vulnerabilities if used incorrectly! No security audits of this
//! crate have ever been performed, and it makes no claim beyond conformance
//! to the Trivium specification.
//!
//! USE AT YOUR OWN RISK!
//!
//! # Keystream bit order
//!
//! The first keystream bit produced occupies the least significant bit of
//! the first emitted byte. Some published Trivium test vectors assume keys
//! and IVs encoded big-endian with per-byte bit reversal relative to the
//! loading convention used here; consumers of such vectors must reverse each
//! byte before handing it to [`KeyIvInit::new`]. This is a property of the
//! vector format, not of the cipher.
//!
//! # Usage
//!
//! ```
//! use trivium::Trivium;
//! use trivium::cipher::{KeyIvInit, StreamCipher};
//!
//! let key = [0x42; 10];
//! let iv = [0x24; 10];
//!
//! let mut data = *b"hello world";
//! let mut cipher = Trivium::new(&key.into(), &iv.into());
//! cipher.apply_keystream(&mut data);
//!
//! // XOR is symmetric: a fresh cipher with the same key/IV decrypts
//! let mut cipher = Trivium::new(&key.into(), &iv.into());
//! cipher.apply_keystream(&mut data);
//! assert_eq!(&data, b"hello world");
//! ```
//!
//! [Trivium]: https://www.ecrypt.eu.org/stream/p3ciphers/trivium/trivium_p3.pdf

#![no_std]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/media/8f1a9894/logo.svg"
)]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub use cipher;

use core::fmt;

use cipher::{
    consts::U10, generic_array::GenericArray, BlockSizeUser, IvSizeUser, KeyIvInit, KeySizeUser,
    StreamCipherCore, StreamCipherCoreWrapper, StreamClosure,
};

#[cfg(feature = "zeroize")]
use cipher::zeroize::ZeroizeOnDrop;

mod backends;
mod word;

pub use word::Word;

/// Number of bytes in a Trivium key.
pub const KEY_SIZE: usize = 10;

/// Number of bytes in a Trivium initialization vector.
pub const IV_SIZE: usize = 10;

/// Number of bits in the internal state.
pub const STATE_BITS: usize = 288;

/// Number of update steps run before any keystream is released.
const WARMUP_STEPS: u32 = 4 * 288;

/// Trivium key.
pub type Key = GenericArray<u8, U10>;

/// Trivium initialization vector.
///
/// An IV is public but MUST be unique per encryption under a fixed key;
/// reusing one leaks the XOR of the two plaintexts.
pub type Iv = GenericArray<u8, U10>;

/// The Trivium stream cipher backed by 64-bit words (recommended).
pub type Trivium = StreamCipherCoreWrapper<TriviumCore<u64>>;

/// The Trivium stream cipher backed by 32-bit words.
///
/// Produces exactly the same keystream as [`Trivium`]; useful on targets
/// where 64-bit shifts are emulated.
pub type Trivium32 = StreamCipherCoreWrapper<TriviumCore<u32>>;

/// The Trivium keystream generator.
///
/// The 288-bit state is packed into `W` words with state bit 1 at the most
/// significant bit of word 0: bit `p` (1-based) lives in word
/// `(p - 1) / W::BITS` at offset `W::BITS - 1 - (p - 1) % W::BITS`. A step
/// of the logical register toward higher positions is therefore a right
/// shift within each word, with carry from the low bit of word `k` into the
/// high bit of word `k + 1`. Under this layout an n-bit tap read lands in a
/// word with the earliest-produced bit lowest, which is exactly the order
/// keystream bits are emitted in.
pub struct TriviumCore<W: Word> {
    state: W::Register,
}

impl<W: Word> KeySizeUser for TriviumCore<W> {
    type KeySize = U10;
}

impl<W: Word> IvSizeUser for TriviumCore<W> {
    type IvSize = U10;
}

impl<W: Word> BlockSizeUser for TriviumCore<W> {
    type BlockSize = W::BlockSize;
}

impl<W: Word> KeyIvInit for TriviumCore<W> {
    fn new(key: &Key, iv: &Iv) -> Self {
        let mut core = Self::load(key, iv);
        // Warm up for 4 * 288 steps, discarding the output. Batching through
        // the word-parallel step is observably identical to stepping bitwise.
        let batch = W::BITS / 2;
        for _ in 0..WARMUP_STEPS / batch {
            core.step(batch);
        }
        core
    }
}

impl<W: Word> StreamCipherCore for TriviumCore<W> {
    fn remaining_blocks(&self) -> Option<usize> {
        // The keystream period is far beyond anything addressable.
        None
    }

    fn process_with_backend(&mut self, f: impl StreamClosure<BlockSize = Self::BlockSize>) {
        f.call(&mut backends::soft::Backend(self));
    }
}

impl<W: Word> TriviumCore<W> {
    const WORD_BITS: usize = W::BITS as usize;

    /// Load the key into s1..s80 and the IV into s94..s173, with bit 0 of
    /// `key[0]` becoming s1 and bit 0 of `iv[0]` becoming s94. Everything
    /// else is zero except s286..s288, which are set to 1.
    fn load(key: &Key, iv: &Iv) -> Self {
        let mut core = Self {
            state: W::Register::default(),
        };
        for (i, &b) in key.iter().enumerate() {
            for j in 0..8 {
                if (b >> j) & 1 != 0 {
                    core.set(1 + 8 * i + j, W::ONE);
                }
            }
        }
        for (i, &b) in iv.iter().enumerate() {
            for j in 0..8 {
                if (b >> j) & 1 != 0 {
                    core.set(94 + 8 * i + j, W::ONE);
                }
            }
        }
        core.set(286, W::ONE);
        core.set(287, W::ONE);
        core.set(288, W::ONE);
        core
    }

    /// Offset of 0-based state bit `f` within its word.
    #[inline(always)]
    fn offset(f: usize) -> u32 {
        W::BITS - 1 - (f % Self::WORD_BITS) as u32
    }

    /// State bit at 1-based position `p`, in the word's low bit.
    #[inline(always)]
    fn bit(&self, p: usize) -> W {
        let f = p - 1;
        (self.state.as_ref()[f / Self::WORD_BITS] >> Self::offset(f)) & W::ONE
    }

    /// Overwrite the state bit at 1-based position `p` with the low bit of `v`.
    #[inline(always)]
    fn set(&mut self, p: usize, v: W) {
        let f = p - 1;
        let k = f / Self::WORD_BITS;
        let o = Self::offset(f);
        let w = self.state.as_mut();
        w[k] = (w[k] & !(W::ONE << o)) | ((v & W::ONE) << o);
    }

    /// The `n`-bit slice a tap at position `p` consumes over the next `n`
    /// steps: bit `i` of the result is s(p - i), the value the tap sees on
    /// simulated step `i`. The slice spans at most two adjacent words for
    /// `n < W::BITS`.
    #[inline(always)]
    fn slice(&self, p: usize, n: u32) -> W {
        let f = p - 1;
        let k = f / Self::WORD_BITS;
        let o = Self::offset(f);
        debug_assert!(k >= 1, "all tap positions live above the first word");
        let w = self.state.as_ref();
        // The double shift keeps the neighbor term defined when o == 0.
        ((w[k] >> o) | ((w[k - 1] << (W::BITS - 1 - o)) << 1)) & W::mask(n)
    }

    /// Shift the whole register by `n` positions toward higher indices.
    /// Freshly exposed positions come in as zero; bits past s288 fall into
    /// the unused tail of the last word and are never read.
    #[inline(always)]
    fn shift(&mut self, n: u32) {
        let w = self.state.as_mut();
        for k in (1..w.len()).rev() {
            w[k] = (w[k] >> n) | (w[k - 1] << (W::BITS - n));
        }
        w[0] = w[0] >> n;
    }

    /// Write the feedback lane `v` over positions `q..q + n - 1`: after an
    /// `n`-step shift the bit computed on simulated step `i` belongs at
    /// position `q + n - 1 - i`. Straddles at most one word boundary.
    #[inline(always)]
    fn inject(&mut self, q: usize, n: u32, v: W) {
        let f = q - 1 + (n as usize - 1);
        let k = f / Self::WORD_BITS;
        let o = Self::offset(f);
        let m = W::mask(n);
        let w = self.state.as_mut();
        w[k] = (w[k] & !(m << o)) | (v << o);
        if o + n > W::BITS {
            let s = W::BITS - o;
            w[k - 1] = (w[k - 1] & !(m >> s)) | (v >> s);
        }
    }

    /// Advance the state by `n` steps at once and return the `n` output bits
    /// with the earliest step in bit 0.
    ///
    /// Sound because the feedback functions read no position below 66 while
    /// new bits enter at 1, 94 and 178: within a batch of `n < 66` steps
    /// every tap read still refers to the pre-batch state, so the taps can
    /// be consumed as flat slices. `n` is further capped below `W::BITS` so
    /// no slice or lane needs a double-word carry.
    fn step(&mut self, n: u32) -> W {
        let t1 = self.slice(66, n) ^ self.slice(93, n);
        let t2 = self.slice(162, n) ^ self.slice(177, n);
        let t3 = self.slice(243, n) ^ self.slice(288, n);
        let z = t1 ^ t2 ^ t3;
        let t1 = t1 ^ (self.slice(91, n) & self.slice(92, n)) ^ self.slice(171, n);
        let t2 = t2 ^ (self.slice(175, n) & self.slice(176, n)) ^ self.slice(264, n);
        let t3 = t3 ^ (self.slice(286, n) & self.slice(287, n)) ^ self.slice(69, n);
        self.shift(n);
        self.inject(1, n, t3);
        self.inject(94, n, t1);
        self.inject(178, n, t2);
        z
    }

    /// Emit the next keystream bit.
    ///
    /// This is the bit-at-a-time reference update; [`Self::next_bits`] and
    /// the block frontend are observably equivalent to repeated calls of it.
    pub fn next_bit(&mut self) -> u8 {
        let t1 = self.bit(66) ^ self.bit(93);
        let t2 = self.bit(162) ^ self.bit(177);
        let t3 = self.bit(243) ^ self.bit(288);
        let z = t1 ^ t2 ^ t3;
        let t1 = t1 ^ (self.bit(91) & self.bit(92)) ^ self.bit(171);
        let t2 = t2 ^ (self.bit(175) & self.bit(176)) ^ self.bit(264);
        let t3 = t3 ^ (self.bit(286) & self.bit(287)) ^ self.bit(69);
        self.shift(1);
        self.set(1, t3);
        self.set(94, t1);
        self.set(178, t2);
        z.low_u8()
    }

    /// Emit the next 8 keystream bits as a byte, first bit in the LSB.
    pub fn next_byte(&mut self) -> u8 {
        self.next_bits(8).low_u8()
    }

    /// Emit the next `n` keystream bits packed into a word, first bit in
    /// bit 0, bits at `n` and above zero. Advances the state by exactly `n`
    /// steps.
    ///
    /// # Panics
    ///
    /// If `n` is outside `1..=W::BITS - 1`.
    pub fn next_bits(&mut self, n: u32) -> W {
        assert!(
            n >= 1 && n < W::BITS,
            "keystream batch must be between 1 and one below the word width"
        );
        self.step(n)
    }

    /// Fill `out` with the next `8 * out.len()` keystream bits; byte `i`
    /// holds bits `8i..8i + 7` with the earliest bit in the LSB.
    ///
    /// A full word's worth of bytes is produced as two half-word batches,
    /// sidestepping the carry a `W::BITS`-bit batch would need.
    ///
    /// # Panics
    ///
    /// If `out` is empty or longer than `W::BITS / 8` bytes.
    pub fn next_bytes(&mut self, out: &mut [u8]) {
        let n = out.len();
        assert!(
            n >= 1 && n <= Self::WORD_BITS / 8,
            "byte batch must be between 1 and the word width in bytes"
        );
        if 8 * n == Self::WORD_BITS {
            let (lo, hi) = out.split_at_mut(n / 2);
            let z = self.step(W::BITS / 2);
            Self::unpack(z, lo);
            let z = self.step(W::BITS / 2);
            Self::unpack(z, hi);
        } else {
            let z = self.step(8 * n as u32);
            Self::unpack(z, out);
        }
    }

    fn unpack(z: W, out: &mut [u8]) {
        for (i, b) in out.iter_mut().enumerate() {
            *b = (z >> (8 * i as u32)).low_u8();
        }
    }
}

impl<W: Word> Clone for TriviumCore<W> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

/// Renders the internal state as 288 binary digits, s1 leftmost.
impl<W: Word> fmt::Display for TriviumCore<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in 1..=STATE_BITS {
            f.write_str(if self.bit(p) == W::ONE { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(feature = "zeroize")]
impl<W: Word> Drop for TriviumCore<W> {
    fn drop(&mut self) {
        W::zeroize_register(&mut self.state);
    }
}

#[cfg(feature = "zeroize")]
impl<W: Word> ZeroizeOnDrop for TriviumCore<W> {}
