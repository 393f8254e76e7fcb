//! Arithmetic modulo the two subgroup orders (`2^372` and `3^239`), used by
//! torsion-basis scalar sampling and by Pohlig-Hellman public-key
//! compression (spec.md section 4.9).
//!
//! Unlike `GF(p751)`, these two rings do not share one modulus, so the
//! functions here take the modulus (and, for the Montgomery forms, the
//! matching `-order^-1 mod 2^384` constant) as explicit parameters, mirroring
//! `Montgomery_multiply_mod_order` and friends in `fpx.c`, which do the same.

use crate::bigint::{self, Limbs, NWORDS_ORDER};
use subtle::{Choice, CtOption};

/// An element of `Z/order` for one of the two subgroup-order rings, stored
/// as 6 64-bit limbs. Whether a given value is in standard or Montgomery
/// representation is tracked by the caller, exactly as in the C source.
pub type OrderScalar = Limbs<NWORDS_ORDER>;

fn is_lt_vartime(x: &OrderScalar, y: &OrderScalar) -> bool {
    for i in (0..NWORDS_ORDER).rev() {
        if x.0[i] != y.0[i] {
            return x.0[i] < y.0[i];
        }
    }
    false
}

/// Little-endian byte encoding, 48 octets: the width spec.md section 6
/// gives both the `2^372` private key `A` and the `3^239`-bounded private
/// key `B` (`NWORDS_ORDER * 8 = 48` covers both without truncation).
pub fn to_bytes(x: &OrderScalar) -> [u8; 48] {
    let mut out = [0u8; 48];
    x.write_le_bytes(&mut out);
    out
}

/// Inverse of [`to_bytes`]. Does not check the value against either
/// subgroup order; see [`from_repr`] for a checked decode.
pub fn from_bytes(bytes: &[u8; 48]) -> OrderScalar {
    Limbs::read_le_bytes(bytes)
}

/// As [`from_bytes`], but rejects (returns `None`) any value not strictly
/// less than `bound` — the matching `order_a`/`order_b` from
/// `CurveParameters` for whichever ring `bytes` is meant to represent.
pub fn from_repr(bytes: &[u8; 48], bound: &OrderScalar) -> CtOption<OrderScalar> {
    let candidate = from_bytes(bytes);
    let (_, borrow) = bigint::sub(&candidate, bound);
    CtOption::new(candidate, Choice::from(borrow as u8))
}

/// Montgomery multiplication modulo `order`: `mc = ma*mb*r' mod order`,
/// where `r'` is `rprime = -order^-1 mod 2^384`. Mirrors
/// `Montgomery_multiply_mod_order`. Not constant-time in general since the
/// final correction step here follows the C source's carry/borrow-mask
/// trick, which *is* constant-time; the non-constant-time callers
/// (Pohlig-Hellman, basis sampling) are the ones above this layer.
pub fn montgomery_multiply_mod_order(
    ma: &OrderScalar,
    mb: &OrderScalar,
    order: &OrderScalar,
    rprime: &OrderScalar,
) -> OrderScalar {
    let p: Limbs<12> = bigint::multiply(ma, mb);
    // The C `multiply(P, Montgomery_rprime, Q, NWORDS_ORDER)` call only
    // reads the low NWORDS_ORDER limbs of `P` (it is given nwords =
    // NWORDS_ORDER, not 2*NWORDS_ORDER), so mirror that truncation here.
    let mut p_low = [0u64; NWORDS_ORDER];
    p_low.copy_from_slice(&p.0[..NWORDS_ORDER]);
    let p_low = Limbs::new(p_low);

    let q: Limbs<12> = bigint::multiply(&p_low, rprime);
    let mut q_low = [0u64; NWORDS_ORDER];
    q_low.copy_from_slice(&q.0[..NWORDS_ORDER]);
    let q_low = Limbs::new(q_low);

    let qr: Limbs<12> = bigint::multiply(&q_low, order);
    let (temp, cout) = bigint::add(&p, &qr);

    let mut mc = [0u64; NWORDS_ORDER];
    mc.copy_from_slice(&temp.0[NWORDS_ORDER..]);
    let mc = Limbs::new(mc);

    let (reduced, bout) = bigint::sub(&mc, order);
    let mask = cout.wrapping_sub(bout);
    let mut masked_order = [0u64; NWORDS_ORDER];
    for i in 0..NWORDS_ORDER {
        masked_order[i] = order.0[i] & mask;
    }
    let (out, _) = bigint::add(&reduced, &Limbs::new(masked_order));
    out
}

/// Non-constant-time Montgomery inversion modulo `order`, via sliding-window
/// exponentiation to `order - 2` with window size `k = 5`. Mirrors
/// `Montgomery_inversion_mod_order`.
pub fn montgomery_inversion_mod_order_vartime(
    ma: &OrderScalar,
    order: &OrderScalar,
    rprime: &OrderScalar,
) -> OrderScalar {
    const K_EXPON: u32 = 5;
    const NPOINTS: usize = 16;

    let mut modulus2 = *order;
    let two = {
        let mut t = [0u64; NWORDS_ORDER];
        t[0] = 2;
        Limbs::new(t)
    };
    let (m2, _) = bigint::sub(&modulus2, &two);
    modulus2 = m2;

    let mut table = [OrderScalar::ZERO; NPOINTS];
    table[0] = *ma;
    let input_a = montgomery_multiply_mod_order(ma, ma, order, rprime);
    for j in 0..NPOINTS - 1 {
        table[j + 1] = montgomery_multiply_mod_order(&table[j], &input_a, order, rprime);
    }

    let total_bits = 8 * 8 * NWORDS_ORDER as i32;
    let mut i = total_bits;
    loop {
        i -= 1;
        if bigint::shift_left_one(&mut modulus2) == 1 {
            break;
        }
    }
    // Fresh read of the (now-shifted) top bit, mirroring the C source's
    // explicit re-derivation rather than reusing the loop's break condition.
    let mut bit = modulus2.0[NWORDS_ORDER - 1] >> 63;

    let mut mc = *ma;
    loop {
        if i <= 0 {
            break;
        }
        if bit == 0 {
            mc = montgomery_multiply_mod_order(&mc, &mc, order, rprime);
            i -= 1;
            bigint::shift_left_one(&mut modulus2);
        } else {
            let mask2: u64 = !(u64::MAX >> K_EXPON);
            let mut temp = (modulus2.0[NWORDS_ORDER - 1] & mask2) >> (64 - K_EXPON);
            let mut count = K_EXPON;
            while temp & 1 == 0 {
                temp >>= 1;
                count -= 1;
            }
            for _ in 0..count {
                mc = montgomery_multiply_mod_order(&mc, &mc, order, rprime);
            }
            mc = montgomery_multiply_mod_order(&table[((temp - 1) >> 1) as usize], &mc, order, rprime);
            i -= count as i32;
            for _ in 0..count {
                bigint::shift_left_one(&mut modulus2);
            }
        }
        bit = modulus2.0[NWORDS_ORDER - 1] >> 63;
    }
    mc
}

/// Partial binary-GCD Montgomery inversion modulo `order`. Mirrors
/// `Montgomery_inversion_mod_order_bingcd_partial`, including the `cwords`
/// narrowing optimization.
fn bingcd_partial_mod_order_vartime(a: &OrderScalar, order: &OrderScalar) -> (OrderScalar, u32) {
    let mut u = *a;
    let mut v = *order;
    let mut x1 = OrderScalar::ZERO;
    x1.0[0] = 1;
    let mut x2 = OrderScalar::ZERO;
    let mut k: u32 = 0;

    while bool::from(!v.is_zero()) {
        if bool::from(v.is_even()) {
            bigint::shift_right_one(&mut v);
            bigint::shift_left_one(&mut x1);
        } else if bool::from(u.is_even()) {
            bigint::shift_right_one(&mut u);
            bigint::shift_left_one(&mut x2);
        } else if !is_lt_vartime(&v, &u) {
            let (d, _) = bigint::sub(&v, &u);
            v = d;
            bigint::shift_right_one(&mut v);
            let (sum, _) = bigint::add(&x1, &x2);
            x2 = sum;
            bigint::shift_left_one(&mut x1);
        } else {
            let (d, _) = bigint::sub(&u, &v);
            u = d;
            bigint::shift_right_one(&mut u);
            let (sum, _) = bigint::add(&x1, &x2);
            x1 = sum;
            bigint::shift_left_one(&mut x2);
        }
        k += 1;
    }

    if is_lt_vartime(order, &x1) {
        let (d, _) = bigint::sub(&x1, order);
        x1 = d;
    }
    (x1, k)
}

/// `2^mark mod 2^(64*NWORDS_ORDER)`. Mirrors `power2_setup`.
fn power2_setup_order(mark: i32) -> OrderScalar {
    let mut out = [0u64; NWORDS_ORDER];
    let mut m = mark;
    let mut i = 0usize;
    while m >= 0 && i < NWORDS_ORDER {
        if m < 64 {
            out[i] = 1u64 << m;
        }
        m -= 64;
        i += 1;
    }
    Limbs::new(out)
}

/// Full binary-GCD Montgomery inversion modulo `order`: `c = a^-1 * R mod
/// order`. Mirrors `Montgomery_inversion_mod_order_bingcd`.
pub fn montgomery_inversion_mod_order_bingcd_vartime(
    a: &OrderScalar,
    order: &OrderScalar,
    rprime: &OrderScalar,
    r_prime_sq: &OrderScalar,
) -> OrderScalar {
    let (mut x, mut k) = bingcd_partial_mod_order_vartime(a, order);
    if k < 384 {
        x = montgomery_multiply_mod_order(&x, r_prime_sq, order, rprime);
        k += 384;
    }
    x = montgomery_multiply_mod_order(&x, r_prime_sq, order, rprime);
    let t = power2_setup_order(2 * 384 - k as i32);
    montgomery_multiply_mod_order(&x, &t, order, rprime)
}

/// `mc = a * R mod order`. Mirrors `to_Montgomery_mod_order`.
pub fn to_montgomery_mod_order(
    a: &OrderScalar,
    order: &OrderScalar,
    rprime: &OrderScalar,
    r_prime_sq: &OrderScalar,
) -> OrderScalar {
    montgomery_multiply_mod_order(a, r_prime_sq, order, rprime)
}

/// `c = ma / R mod order`. Mirrors `from_Montgomery_mod_order`.
pub fn from_montgomery_mod_order(ma: &OrderScalar, order: &OrderScalar, rprime: &OrderScalar) -> OrderScalar {
    let mut one = OrderScalar::ZERO;
    one.0[0] = 1;
    montgomery_multiply_mod_order(ma, &one, order, rprime)
}

/// Inversion modulo `2^372` via Dumas' explicit quadratic modular inverse
/// (Algorithm 3, Dumas 2012). Hardwired to the 2^372 order per spec.md
/// section 4.9 / the `inv_mod_orderA` this mirrors; `a` must be odd.
pub fn inv_mod_order_a_vartime(a: &OrderScalar) -> OrderScalar {
    let mask: u64 = u64::MAX >> 12;
    let mut one = OrderScalar::ZERO;
    one.0[0] = 1;

    if a.0 == one.0 {
        return *a;
    }

    let mut order = OrderScalar::ZERO;
    order.0[NWORDS_ORDER - 1] = 1u64 << (64 - 12);

    let (am1, _) = bigint::sub(a, &one);
    let (c0, _) = bigint::sub(&order, &am1);
    let (mut c, _) = bigint::add(&c0, &one);

    let mut am1 = am1;
    let mut tmp1 = am1;
    let mut s = 0u32;
    while tmp1.0[0] & 1 == 0 {
        s += 1;
        bigint::shift_right_one(&mut tmp1);
    }

    let f = 372 / s;
    let mut i = 1u32;
    while i < f {
        let sq: Limbs<12> = bigint::multiply(&am1, &am1);
        let mut am1_next = [0u64; NWORDS_ORDER];
        am1_next.copy_from_slice(&sq.0[..NWORDS_ORDER]);
        am1_next[NWORDS_ORDER - 1] &= mask;
        am1 = Limbs::new(am1_next);

        let (mut t1, _) = bigint::add(&am1, &one);
        t1.0[NWORDS_ORDER - 1] &= mask;
        tmp1 = t1;

        let prod: Limbs<12> = bigint::multiply(&c, &tmp1);
        let mut c_next = [0u64; NWORDS_ORDER];
        c_next.copy_from_slice(&prod.0[..NWORDS_ORDER]);
        c_next[NWORDS_ORDER - 1] &= mask;
        c = Limbs::new(c_next);

        i <<= 1;
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{MONTGOMERY_RPRIME, MONTGOMERY_RPRIME_SQ, ORDER_B};

    #[test]
    fn montgomery_mod_order_roundtrip() {
        let mut a = OrderScalar::ZERO;
        a.0[0] = 12345;
        let am = to_montgomery_mod_order(&a, &ORDER_B, &MONTGOMERY_RPRIME, &MONTGOMERY_RPRIME_SQ);
        let back = from_montgomery_mod_order(&am, &ORDER_B, &MONTGOMERY_RPRIME);
        assert_eq!(back, a);
    }

    #[test]
    fn montgomery_inversion_variants_agree() {
        let mut a = OrderScalar::ZERO;
        a.0[0] = 98765;
        let am = to_montgomery_mod_order(&a, &ORDER_B, &MONTGOMERY_RPRIME, &MONTGOMERY_RPRIME_SQ);
        let inv1 = montgomery_inversion_mod_order_vartime(&am, &ORDER_B, &MONTGOMERY_RPRIME);
        let inv2 = montgomery_inversion_mod_order_bingcd_vartime(
            &am,
            &ORDER_B,
            &MONTGOMERY_RPRIME,
            &MONTGOMERY_RPRIME_SQ,
        );
        let one = montgomery_multiply_mod_order(&am, &inv1, &ORDER_B, &MONTGOMERY_RPRIME);
        let mut expect_one = OrderScalar::ZERO;
        expect_one.0[0] = 1;
        let expect_mont = to_montgomery_mod_order(
            &expect_one,
            &ORDER_B,
            &MONTGOMERY_RPRIME,
            &MONTGOMERY_RPRIME_SQ,
        );
        assert_eq!(one, expect_mont);
        assert_eq!(inv1, inv2);
    }

    #[test]
    fn inv_mod_order_a_self_inverse_at_one() {
        let mut one = OrderScalar::ZERO;
        one.0[0] = 1;
        assert_eq!(inv_mod_order_a_vartime(&one), one);
    }

    #[test]
    fn byte_encoding_roundtrips_and_rejects_out_of_range() {
        let mut a = OrderScalar::ZERO;
        a.0[0] = 424_242;
        let bytes = to_bytes(&a);
        assert_eq!(bytes.len(), 48);
        assert_eq!(from_bytes(&bytes), a);

        let in_range = from_repr(&bytes, &ORDER_B);
        assert!(bool::from(in_range.is_some()));
        assert_eq!(in_range.unwrap_or(OrderScalar::ZERO), a);

        let too_big = [0xffu8; 48];
        let rejected = from_repr(&too_big, &ORDER_B);
        assert!(!bool::from(rejected.is_some()));
    }
}
