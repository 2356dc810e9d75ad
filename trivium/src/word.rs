//! Machine-word backing for the packed 288-bit register.
//!
//! The cipher state is 288 bits spread across an array of unsigned machine
//! words; every shift constant and tap offset is derived from the word width.
//! Both 32- and 64-bit backings are provided and produce identical
//! keystreams, so the choice is purely a performance/portability trade-off.

use core::ops::{BitAnd, BitOr, BitXor, Not, Shl, Shr};

use cipher::generic_array::ArrayLength;
use cipher::consts::{U4, U8};

#[cfg(feature = "zeroize")]
use cipher::zeroize::Zeroize;

mod sealed {
    pub trait Sealed {}

    impl Sealed for u32 {}
    impl Sealed for u64 {}
}

/// An unsigned machine word the 288-bit state can be packed into.
///
/// Sealed; implemented for `u32` (9-word register) and `u64` (5-word
/// register). Up to `BITS - 1` keystream bits are produced per update step,
/// so the width also bounds the batch size of the word-parallel path.
pub trait Word:
    sealed::Sealed
    + Copy
    + Default
    + PartialEq
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
{
    /// Width of the word in bits.
    const BITS: u32;

    /// The all-zeros word.
    const ZERO: Self;

    /// The word with only the lowest bit set.
    const ONE: Self;

    /// Backing array holding the 288 state bits.
    type Register: Clone + Default + AsRef<[Self]> + AsMut<[Self]>;

    /// Keystream block size of the `cipher` trait frontend, in bytes.
    type BlockSize: ArrayLength<u8> + 'static;

    /// Lowest 8 bits of the word.
    fn low_u8(self) -> u8;

    /// Mask covering the low `n` bits. `n` must be below [`Self::BITS`].
    #[inline(always)]
    fn mask(n: u32) -> Self {
        !(!Self::ZERO << n)
    }

    /// Wipe a register.
    #[cfg(feature = "zeroize")]
    fn zeroize_register(reg: &mut Self::Register);
}

impl Word for u32 {
    const BITS: u32 = 32;
    const ZERO: Self = 0;
    const ONE: Self = 1;

    type Register = [u32; 9];
    type BlockSize = U4;

    #[inline(always)]
    fn low_u8(self) -> u8 {
        self as u8
    }

    #[cfg(feature = "zeroize")]
    fn zeroize_register(reg: &mut Self::Register) {
        reg.zeroize();
    }
}

impl Word for u64 {
    const BITS: u32 = 64;
    const ZERO: Self = 0;
    const ONE: Self = 1;

    type Register = [u64; 5];
    type BlockSize = U8;

    #[inline(always)]
    fn low_u8(self) -> u8 {
        self as u8
    }

    #[cfg(feature = "zeroize")]
    fn zeroize_register(reg: &mut Self::Register) {
        reg.zeroize();
    }
}
