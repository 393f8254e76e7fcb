//! Fixed-width unsigned multi-precision integers.
//!
//! `Limbs<N>` is an `N`-word little-endian unsigned integer: `Limbs([w0, w1,
//! ..])` represents `sum(w_i * 2^(64*i))`. All operations here are the raw
//! big-integer primitives spec.md section 4.1 names: carry/borrow-propagating
//! add/sub, whole-array shifts, a double-wide multiply, and constant-time
//! copy/zero/swap. Nothing here is reduced modulo anything; that is the job
//! of the `field` module built on top.

use core::ops::{Index, IndexMut};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// Number of 64-bit limbs needed to hold a 751-bit field element (`ceil(751/64)`).
pub const NWORDS_FIELD: usize = 12;

/// Number of 64-bit limbs used for the two subgroup orders (2^372 and the
/// 3^239 value, both of which fit comfortably in 384 bits).
pub const NWORDS_ORDER: usize = 6;

/// An `N`-limb little-endian unsigned integer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Limbs<const N: usize>(pub [u64; N]);

impl<const N: usize> Limbs<N> {
    /// The all-zero value.
    pub const ZERO: Self = Self([0u64; N]);

    /// Build from an explicit limb array.
    pub const fn new(limbs: [u64; N]) -> Self {
        Self(limbs)
    }

    /// `true` iff every limb is zero. Constant-time.
    pub fn is_zero(&self) -> Choice {
        let mut acc = 0u64;
        for i in 0..N {
            acc |= self.0[i];
        }
        acc.ct_eq(&0)
    }

    /// `true` iff the least significant limb is even. Constant-time.
    pub fn is_even(&self) -> Choice {
        Choice::from(((self.0[0] & 1) == 0) as u8)
    }

    /// Constant-time conditional swap of `a` and `b` under `choice`.
    pub fn conditional_swap(a: &mut Self, b: &mut Self, choice: Choice) {
        for i in 0..N {
            u64::conditional_swap(&mut a.0[i], &mut b.0[i], choice);
        }
    }

    /// Writes the little-endian byte encoding of this value into `out`.
    /// `out.len()` must equal `N * 8`; the field/order layers above trim
    /// or zero-extend against their own narrower external widths.
    pub fn write_le_bytes(&self, out: &mut [u8]) {
        assert_eq!(out.len(), N * 8);
        for (limb, chunk) in self.0.iter().zip(out.chunks_mut(8)) {
            chunk.copy_from_slice(&limb.to_le_bytes());
        }
    }

    /// Inverse of [`Limbs::write_le_bytes`]: parses `N * 8` little-endian
    /// bytes into limbs.
    pub fn read_le_bytes(bytes: &[u8]) -> Self {
        assert_eq!(bytes.len(), N * 8);
        let mut limbs = [0u64; N];
        for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks(8)) {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            *limb = u64::from_le_bytes(word);
        }
        Self(limbs)
    }
}

impl<const N: usize> ConditionallySelectable for Limbs<N> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut out = [0u64; N];
        for i in 0..N {
            out[i] = u64::conditional_select(&a.0[i], &b.0[i], choice);
        }
        Self(out)
    }
}

impl<const N: usize> ConstantTimeEq for Limbs<N> {
    fn ct_eq(&self, other: &Self) -> Choice {
        let mut acc = Choice::from(1u8);
        for i in 0..N {
            acc &= self.0[i].ct_eq(&other.0[i]);
        }
        acc
    }
}

impl<const N: usize> Index<usize> for Limbs<N> {
    type Output = u64;
    fn index(&self, i: usize) -> &u64 {
        &self.0[i]
    }
}

impl<const N: usize> IndexMut<usize> for Limbs<N> {
    fn index_mut(&mut self, i: usize) -> &mut u64 {
        &mut self.0[i]
    }
}

/// `a + b`, returning the result and the final carry-out (0 or 1).
///
/// Mirrors `mp_add` in `fpx.c`: ripple-carry addition across all `N` limbs,
/// using `u64::carrying_add` limb-by-limb rather than widening into `u128`
/// and branching on the carry, matching the carry/borrow-propagation idiom
/// the teacher corpus uses for its own multi-limb arithmetic (e.g.
/// `p256`'s `scalar64.rs` `sub_inner_five`, `ed448-goldilocks`'s
/// `field/scalar.rs` `reduce`).
pub fn add<const N: usize>(a: &Limbs<N>, b: &Limbs<N>) -> (Limbs<N>, u64) {
    let mut out = [0u64; N];
    let mut carry = false;
    for i in 0..N {
        let (sum, c) = a.0[i].carrying_add(b.0[i], carry);
        out[i] = sum;
        carry = c;
    }
    (Limbs(out), carry as u64)
}

/// `a - b`, returning the result and the final borrow-out (0 or 1).
///
/// Mirrors `mp_sub` in `fpx.c`, via `u64::borrowing_sub` limb-by-limb
/// instead of branching on the sign of an `i128` difference.
pub fn sub<const N: usize>(a: &Limbs<N>, b: &Limbs<N>) -> (Limbs<N>, u64) {
    let mut out = [0u64; N];
    let mut borrow = false;
    for i in 0..N {
        let (diff, b_out) = a.0[i].borrowing_sub(b.0[i], borrow);
        out[i] = diff;
        borrow = b_out;
    }
    (Limbs(out), borrow as u64)
}

/// Shift the whole array left by one bit, returning the bit shifted out of
/// the top.
pub fn shift_left_one<const N: usize>(a: &mut Limbs<N>) -> u64 {
    let mut carry = 0u64;
    for i in 0..N {
        let next_carry = a.0[i] >> 63;
        a.0[i] = (a.0[i] << 1) | carry;
        carry = next_carry;
    }
    carry
}

/// Shift the whole array right by one bit, returning the bit shifted out of
/// the bottom.
pub fn shift_right_one<const N: usize>(a: &mut Limbs<N>) -> u64 {
    let mut carry = 0u64;
    for i in (0..N).rev() {
        let next_carry = a.0[i] & 1;
        a.0[i] = (a.0[i] >> 1) | (carry << 63);
        carry = next_carry;
    }
    carry
}

/// Schoolbook multiply of two `N`-limb integers into a `2N`-limb product.
///
/// Mirrors the Comba-style `multiply()` in `fpx.c`; we use the straightforward
/// triple loop with 128-bit accumulation since Rust has no native Comba
/// macro and the schoolbook form is exactly as constant-time.
pub fn multiply<const N: usize, const N2: usize>(a: &Limbs<N>, b: &Limbs<N>) -> Limbs<N2> {
    debug_assert_eq!(N2, 2 * N);
    let mut out = [0u64; N2];
    for i in 0..N {
        let mut carry: u128 = 0;
        for j in 0..N {
            let idx = i + j;
            let prod = (a.0[i] as u128) * (b.0[j] as u128) + out[idx] as u128 + carry;
            out[idx] = prod as u64;
            carry = prod >> 64;
        }
        out[i + N] = carry as u64;
    }
    Limbs(out)
}

/// `3*a`, computed as two ripple-carry adds (`a+a+a`) rather than a full
/// `multiply`. Used by the base-3 windowed Pohlig-Hellman solver to advance
/// `3^k` one digit at a time.
pub fn triple<const N: usize>(a: &Limbs<N>) -> Limbs<N> {
    let (t, _) = add(a, a);
    let (t, _) = add(&t, a);
    t
}

/// `acc*small_mul + small_add` for a single-word multiplier and addend.
/// `small_mul` must be small enough that each limb's product plus carry
/// stays within `u128` (true for the radix-3 digit folding this backs).
pub fn mul_then_add<const N: usize>(acc: &Limbs<N>, small_mul: u64, small_add: u64) -> Limbs<N> {
    let mut out = [0u64; N];
    let mut carry: u128 = small_add as u128;
    for i in 0..N {
        let prod = acc.0[i] as u128 * small_mul as u128 + carry;
        out[i] = prod as u64;
        carry = prod >> 64;
    }
    Limbs(out)
}

/// `3^n` as an `N`-limb integer, built by repeated [`triple`]-ing from `1`.
pub fn pow3_scalar<const N: usize>(n: u32) -> Limbs<N> {
    let mut out = Limbs::<N>::ZERO;
    out.0[0] = 1;
    for _ in 0..n {
        out = triple(&out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sub_roundtrip() {
        let a = Limbs::<12>::new([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
        let b = Limbs::<12>::new([9, 8, 7, 6, 5, 4, 3, 2, 1, 0, 0, 0]);
        let (sum, carry) = add(&a, &b);
        assert_eq!(carry, 0);
        let (back, borrow) = sub(&sum, &b);
        assert_eq!(borrow, 0);
        assert_eq!(back, a);
    }

    #[test]
    fn shifts_round_trip_on_even_values() {
        let mut a = Limbs::<12>::new([8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let bit_out = shift_right_one(&mut a);
        assert_eq!(bit_out, 0);
        assert_eq!(a.0[0], 4);
        let bit_in = shift_left_one(&mut a);
        assert_eq!(bit_in, 0);
        assert_eq!(a.0[0], 8);
    }

    #[test]
    fn le_bytes_roundtrip() {
        let a = Limbs::<12>::new([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
        let mut bytes = [0u8; 96];
        a.write_le_bytes(&mut bytes);
        assert_eq!(Limbs::<12>::read_le_bytes(&bytes), a);
    }

    #[test]
    fn multiply_matches_schoolbook_small_case() {
        let a = Limbs::<1>::new([6]);
        let b = Limbs::<1>::new([7]);
        let c: Limbs<2> = multiply(&a, &b);
        assert_eq!(c.0[0], 42);
        assert_eq!(c.0[1], 0);
    }
}
