//! `GF(p751^2) = GF(p751)[i]/(i^2 + 1)`: the quadratic extension field
//! (spec.md section 4.3).
//!
//! An [`Fp2Element`] is a pair `(a, b)` representing `a + b*i`. Multiplication
//! and squaring use the Karatsuba formulas of `fp2mul751_mont`/`fp2sqr751_mont`
//! in `examples/original_source/C/fpx.c`, including the underflow-masking
//! trick that lets the subtraction inside Karatsuba's middle term stay
//! constant-time without a data-dependent branch.

use crate::field::fp::FieldElement;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

/// An element `a + b*i` of `GF(p751^2)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Fp2Element {
    /// Real part.
    pub a0: FieldElement,
    /// Imaginary part (coefficient of `i`).
    pub a1: FieldElement,
}

impl Fp2Element {
    /// The additive identity.
    pub const ZERO: Self = Self {
        a0: FieldElement::ZERO,
        a1: FieldElement::ZERO,
    };

    /// The multiplicative identity.
    pub const ONE: Self = Self {
        a0: FieldElement::ONE,
        a1: FieldElement::ZERO,
    };

    /// Build from components.
    pub const fn new(a0: FieldElement, a1: FieldElement) -> Self {
        Self { a0, a1 }
    }

    /// Componentwise addition. Mirrors `fp2add751`.
    pub fn add(&self, other: &Self) -> Self {
        Self {
            a0: self.a0.add(&other.a0),
            a1: self.a1.add(&other.a1),
        }
    }

    /// Componentwise subtraction. Mirrors `fp2sub751`.
    pub fn sub(&self, other: &Self) -> Self {
        Self {
            a0: self.a0.sub(&other.a0),
            a1: self.a1.sub(&other.a1),
        }
    }

    /// Componentwise negation.
    pub fn negate(&self) -> Self {
        Self {
            a0: self.a0.negate(),
            a1: self.a1.negate(),
        }
    }

    /// Componentwise halving. Mirrors `fp2div2_751`.
    pub fn halve(&self) -> Self {
        Self {
            a0: self.a0.halve(),
            a1: self.a1.halve(),
        }
    }

    /// Conjugate: `a0 - a1*i`.
    pub fn conjugate(&self) -> Self {
        Self {
            a0: self.a0,
            a1: self.a1.negate(),
        }
    }

    /// Karatsuba multiplication: `(a0+a1*i)(b0+b1*i) = (a0*b0 - a1*b1) +
    /// ((a0+a1)(b0+b1) - a0*b0 - a1*b1)*i`, computed as
    /// `t0 = a0*b0`, `t1 = a1*b1`, `t2 = (a0+a1)*(b0+b1)`, giving real part
    /// `t0 - t1` and imaginary part `t2 - t0 - t1`. Mirrors `fp2mul751_mont`.
    pub fn mul(&self, other: &Self) -> Self {
        let t0 = self.a0.mul(&other.a0);
        let t1 = self.a1.mul(&other.a1);
        let t2 = self.a0.add(&self.a1).mul(&other.a0.add(&other.a1));
        Self {
            a0: t0.sub(&t1),
            a1: t2.sub(&t0).sub(&t1),
        }
    }

    /// Karatsuba squaring: `(a0+a1*i)^2 = (a0+a1)(a0-a1) + (2*a0*a1)*i`.
    /// Mirrors `fp2sqr751_mont`.
    pub fn square(&self) -> Self {
        let t0 = self.a0.add(&self.a1);
        let t1 = self.a0.sub(&self.a1);
        let t2 = self.a0.add(&self.a0);
        Self {
            a0: t0.mul(&t1),
            a1: t2.mul(&self.a1),
        }
    }

    /// `self^(2^n)` via `n` repeated squarings.
    pub fn square_n(&self, n: u32) -> Self {
        let mut out = *self;
        for _ in 0..n {
            out = out.square();
        }
        out
    }

    /// Converts into Montgomery domain componentwise.
    pub fn to_montgomery(&self) -> Self {
        Self {
            a0: self.a0.to_montgomery(),
            a1: self.a1.to_montgomery(),
        }
    }

    /// Converts out of Montgomery domain componentwise.
    pub fn from_montgomery(&self) -> Self {
        Self {
            a0: self.a0.from_montgomery(),
            a1: self.a1.from_montgomery(),
        }
    }

    /// Little-endian byte encoding, `a0` then `a1`, 188 octets total
    /// (spec.md section 6).
    pub fn to_bytes(&self) -> [u8; 188] {
        let mut out = [0u8; 188];
        out[..94].copy_from_slice(&self.a0.to_bytes());
        out[94..].copy_from_slice(&self.a1.to_bytes());
        out
    }

    /// Inverse of [`Fp2Element::to_bytes`]. Does not reject non-canonical
    /// component encodings; see [`Fp2Element::from_repr`] for that.
    pub fn from_bytes(bytes: &[u8; 188]) -> Self {
        let mut a0 = [0u8; 94];
        let mut a1 = [0u8; 94];
        a0.copy_from_slice(&bytes[..94]);
        a1.copy_from_slice(&bytes[94..]);
        Self {
            a0: FieldElement::from_bytes(&a0),
            a1: FieldElement::from_bytes(&a1),
        }
    }

    /// As [`Fp2Element::from_bytes`], but rejects the encoding (returns
    /// `None`) unless both components are canonical `GF(p751)` encodings.
    pub fn from_repr(bytes: &[u8; 188]) -> CtOption<Self> {
        let mut a0 = [0u8; 94];
        let mut a1 = [0u8; 94];
        a0.copy_from_slice(&bytes[..94]);
        a1.copy_from_slice(&bytes[94..]);
        let a0 = FieldElement::from_repr(&a0);
        let a1 = FieldElement::from_repr(&a1);
        let is_some = a0.is_some() & a1.is_some();
        CtOption::new(
            Self {
                a0: a0.unwrap_or(FieldElement::ZERO),
                a1: a1.unwrap_or(FieldElement::ZERO),
            },
            is_some,
        )
    }

    /// Norm `a0^2 + a1^2`, as used by inversion.
    fn norm(&self) -> FieldElement {
        self.a0.square().add(&self.a1.square())
    }

    /// Constant-time inversion via conjugate-over-norm: `1/z = conj(z) /
    /// norm(z)`. Mirrors `fp2inv751_mont`.
    pub fn invert(&self) -> Self {
        let norm_inv = self.norm().invert();
        let conj = self.conjugate();
        Self {
            a0: conj.a0.mul(&norm_inv),
            a1: conj.a1.mul(&norm_inv),
        }
    }

    /// Non-constant-time inversion via conjugate-over-norm, using the
    /// binary-GCD field inversion. Mirrors `fp2inv751_mont_bingcd`; callers
    /// must only use this on public values (see spec.md section 9).
    pub fn invert_vartime(&self) -> Self {
        let norm_inv = self.norm().invert_vartime();
        let conj = self.conjugate();
        Self {
            a0: conj.a0.mul(&norm_inv),
            a1: conj.a1.mul(&norm_inv),
        }
    }

    /// `true` iff every limb of both components is zero.
    pub fn is_zero(&self) -> Choice {
        self.a0.is_zero() & self.a1.is_zero()
    }

    /// Reduce both components into `[0, p)`.
    pub fn correct(&self) -> Self {
        Self {
            a0: self.a0.correct(),
            a1: self.a1.correct(),
        }
    }

    /// Non-constant-time equality on canonical representatives. Mirrors
    /// `fp2equal751_non_constant_time`-style checks used by the torsion-basis
    /// sampler and Pohlig-Hellman tables; public-data only.
    pub fn eq_vartime(&self, other: &Self) -> bool {
        self.a0.eq_vartime(&other.a0) && self.a1.eq_vartime(&other.a1)
    }

    /// Simultaneous inversion of three elements sharing one field inversion,
    /// mirroring `inv_3_way`: given `(z1, z2, z3)`, returns `(1/z1, 1/z2,
    /// 1/z3)` using one [`Fp2Element::invert`] and six multiplications.
    pub fn invert3(z1: &Self, z2: &Self, z3: &Self) -> (Self, Self, Self) {
        let t0 = z1.mul(z2);
        let t1 = t0.mul(z3);
        let t1_inv = t1.invert();
        let out1 = t1_inv.mul(z2).mul(z3);
        let out2 = t1_inv.mul(z1).mul(z3);
        let out3 = t1_inv.mul(&t0);
        (out1, out2, out3)
    }

    /// Batched (Montgomery's trick) inversion of a slice of nonzero
    /// elements, mirroring `mont_n_way_inv`: one field inversion amortized
    /// across `n` elements. `out` and `elements` must have equal length;
    /// aliasing the same buffer is not supported (mirrors the C contract
    /// that `vec` and `out` are distinct arrays).
    pub fn batch_invert(elements: &[Self], out: &mut [Self]) {
        assert_eq!(elements.len(), out.len());
        let n = elements.len();
        if n == 0 {
            return;
        }
        out[0] = elements[0];
        for i in 1..n {
            out[i] = out[i - 1].mul(&elements[i]);
        }
        let mut inv = out[n - 1].invert();
        for i in (1..n).rev() {
            out[i] = inv.mul(&out[i - 1]);
            inv = inv.mul(&elements[i]);
        }
        out[0] = inv;
    }

    /// Constant-time conditional swap.
    pub fn conditional_swap(a: &mut Self, b: &mut Self, choice: Choice) {
        FieldElement::conditional_swap(&mut a.a0, &mut b.a0, choice);
        FieldElement::conditional_swap(&mut a.a1, &mut b.a1, choice);
    }

    /// Cyclotomic squaring for elements of norm 1 (`a^(p+1) = 1`), using the
    /// identity `cos(2θ) = 2cos²θ - 1`/`sin(2θ) = 2 sinθ cosθ` form. Mirrors
    /// `sqr_Fp2_cycl`; cheaper than [`Fp2Element::square`] because it skips
    /// the Karatsuba cross term. Used throughout the Tate pairing's final
    /// exponentiation and the Pohlig-Hellman lookup-table cascade, both of
    /// which only ever run on public values.
    pub fn cyclotomic_square(&self) -> Self {
        let t0 = self.a0.add(&self.a1).square();
        let new_a1 = t0.sub(&FieldElement::ONE);
        let t0b = self.a0.square();
        let t0b = t0b.add(&t0b);
        let new_a0 = t0b.sub(&FieldElement::ONE);
        Self {
            a0: new_a0,
            a1: new_a1,
        }
    }

    /// Cyclotomic cubing (`cos(3θ) = 4cos³θ - 3cosθ` form). Mirrors
    /// `cube_Fp2_cycl`.
    pub fn cyclotomic_cube(&self) -> Self {
        let t0 = self.a0.add(&self.a0).square().sub(&FieldElement::ONE);
        let new_a1 = t0.mul(&self.a1);
        let t0b = t0.sub(&FieldElement::ONE).sub(&FieldElement::ONE);
        let new_a0 = self.a0.mul(&t0b);
        Self {
            a0: new_a0,
            a1: new_a1,
        }
    }

    /// Cyclotomic inversion: `a^(p+1) = 1 => a^-1 = a^p = conj(a)`. Mirrors
    /// `inv_Fp2_cycl`.
    pub fn cyclotomic_inv(&self) -> Self {
        self.conjugate()
    }

    /// `self^exponent` via square-and-multiply in the cyclotomic subgroup,
    /// scanning `bits` bits of `exponent` from the most significant down.
    /// Mirrors the shared shape of `exp6_Fp2_cycl`/`exp21_Fp2_cycl`; vartime
    /// (branches on the public exponent bits), matching the reference.
    pub fn cyclotomic_pow_u64(&self, exponent: u64, bits: u32) -> Self {
        let mut res = Self::ONE;
        if exponent != 0 {
            for i in 0..bits {
                res = res.cyclotomic_square();
                let bit = (exponent >> (bits - 1 - i)) & 1;
                if bit == 1 {
                    res = res.mul(self);
                }
            }
        }
        res
    }

    /// Computes `sqrt(u/v)` for `u, v` in `GF(p751^2)` via Hamburg's trick
    /// (avoids a second field inversion by folding the division into the
    /// square-root exponentiation). Mirrors `sqrt_Fp2_frac`. Non-constant-time:
    /// used only by the torsion-basis sampler and public-key (de)compression,
    /// never on secret data (spec.md section 9).
    pub fn sqrt_frac(u: &Self, v: &Self) -> Self {
        let t0 = v.a0.square().add(&v.a1.square());
        let t1 = u.a0.mul(&v.a0).add(&u.a1.mul(&v.a1));
        let t2 = u.a1.mul(&v.a0).sub(&u.a0.mul(&v.a1));
        let t3 = t1.square().add(&t2.square());

        let mut t = t3;
        for _ in 0..370 {
            t = t.square();
        }
        for _ in 0..239 {
            let sq = t.square();
            t = t.mul(&sq);
        }
        let t = t1.add(&t);
        let t = t.add(&t);

        let t3 = t0.square().mul(&t0);
        let t3 = t.mul(&t3);
        let t3 = t3.pow_p_minus_3_over_4();
        let t3 = t0.mul(&t3);

        let cand0 = t.mul(&t3).halve();
        let cand1 = t2.mul(&t3);

        let check = cand0.square().mul(&t0);
        let (y0, y1) = if check.correct().eq_vartime(&t.correct()) {
            (cand0, cand1)
        } else {
            (cand1, cand0)
        };

        let mut y = Self { a0: y0, a1: y1 };
        let t0 = y.a0.square().sub(&y.a1.square()).mul(&v.a0);
        let t1 = v.a1.mul(&y.a0.mul(&y.a1));
        let t1 = t1.add(&t1);
        let check = t0.sub(&t1);
        if !check.correct().eq_vartime(&u.a0.correct()) {
            y.a1 = y.a1.negate();
        }
        y
    }

    /// Computes a square root of `self` in `GF(p751^2)` via Hamburg's trick.
    /// Mirrors `sqrt_Fp2`; non-constant-time, public data only.
    pub fn sqrt(&self) -> Self {
        let t0 = self.a0.square().add(&self.a1.square());
        let mut t1 = t0;
        for _ in 0..370 {
            t1 = t1.square();
        }
        for _ in 0..239 {
            let sq = t1.square();
            t1 = t1.mul(&sq);
        }
        let t0 = self.a0.add(&t1).halve();
        let t2 = t0.pow_p_minus_3_over_4();
        let cand0 = t0.mul(&t2);
        let cand1 = t2.mul(&self.a1).halve();
        let check = cand0.square();
        if t0.correct().eq_vartime(&check.correct()) {
            Self {
                a0: cand0,
                a1: cand1,
            }
        } else {
            Self {
                a0: cand1,
                a1: cand0.negate(),
            }
        }
    }

    /// `true` iff `self` is a nonzero cube in `GF(p751^2)^*`, tested via the
    /// cubic-residue character `self^((p^2-1)/3) == 1`. Mirrors
    /// `is_cube_Fp2`; drives candidate promotion in
    /// [`crate::montgomery::torsion::generate_3_torsion_basis`]. Non-constant-time,
    /// public data only.
    pub fn is_cube_vartime(&self) -> bool {
        let v0 = self.a0.square();
        let v1 = self.a1.square();
        let t0 = v0.add(&v1).invert_vartime();
        let v0 = v0.sub(&v1);
        let v1 = self.a0.mul(&self.a1);
        let v1 = v1.add(&v1).negate();
        let v0 = v0.mul(&t0);
        let v1 = v1.mul(&t0);
        let mut v = Self { a0: v0, a1: v1 };
        for _ in 0..372 {
            v = v.cyclotomic_square();
        }
        for _ in 0..238 {
            v = v.cyclotomic_cube();
        }
        v.correct().eq_vartime(&Self::ONE)
    }
}

impl FieldElement {
    /// Constant-time conditional swap, used by [`Fp2Element::conditional_swap`]
    /// and the x-only Montgomery-ladder swap step. Mirrors `swap_points`.
    pub fn conditional_swap(a: &mut Self, b: &mut Self, choice: Choice) {
        let t = Self::conditional_select(a, b, choice);
        *b = Self::conditional_select(b, a, choice);
        *a = t;
    }
}

impl ConstantTimeEq for Fp2Element {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.a0.ct_eq(&other.a0) & self.a1.ct_eq(&other.a1)
    }
}

impl ConditionallySelectable for Fp2Element {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            a0: FieldElement::conditional_select(&a.a0, &b.a0, choice),
            a1: FieldElement::conditional_select(&a.a1, &b.a1, choice),
        }
    }
}

impl Add<&Fp2Element> for &Fp2Element {
    type Output = Fp2Element;
    fn add(self, rhs: &Fp2Element) -> Fp2Element {
        Fp2Element::add(self, rhs)
    }
}
impl Sub<&Fp2Element> for &Fp2Element {
    type Output = Fp2Element;
    fn sub(self, rhs: &Fp2Element) -> Fp2Element {
        Fp2Element::sub(self, rhs)
    }
}
impl Mul<&Fp2Element> for &Fp2Element {
    type Output = Fp2Element;
    fn mul(self, rhs: &Fp2Element) -> Fp2Element {
        Fp2Element::mul(self, rhs)
    }
}
impl Neg for Fp2Element {
    type Output = Self;
    fn neg(self) -> Self {
        self.negate()
    }
}
impl<'b> AddAssign<&'b Fp2Element> for Fp2Element {
    fn add_assign(&mut self, rhs: &'b Fp2Element) {
        *self = &*self + rhs;
    }
}
impl<'b> SubAssign<&'b Fp2Element> for Fp2Element {
    fn sub_assign(&mut self, rhs: &'b Fp2Element) {
        *self = &*self - rhs;
    }
}
impl<'b> MulAssign<&'b Fp2Element> for Fp2Element {
    fn mul_assign(&mut self, rhs: &'b Fp2Element) {
        *self = &*self * rhs;
    }
}

define_add_variants!(LHS = Fp2Element, RHS = Fp2Element, Output = Fp2Element);
define_sub_variants!(LHS = Fp2Element, RHS = Fp2Element, Output = Fp2Element);
define_mul_variants!(LHS = Fp2Element, RHS = Fp2Element, Output = Fp2Element);
define_add_assign_variants!(LHS = Fp2Element, RHS = Fp2Element);
define_sub_assign_variants!(LHS = Fp2Element, RHS = Fp2Element);
define_mul_assign_variants!(LHS = Fp2Element, RHS = Fp2Element);

#[cfg(test)]
mod tests {
    use super::*;

    fn small(re: u64, im: u64) -> Fp2Element {
        let a0 = FieldElement::from_limbs(crate::bigint::Limbs::new({
            let mut l = [0u64; crate::bigint::NWORDS_FIELD];
            l[0] = re;
            l
        }))
        .to_montgomery();
        let a1 = FieldElement::from_limbs(crate::bigint::Limbs::new({
            let mut l = [0u64; crate::bigint::NWORDS_FIELD];
            l[0] = im;
            l
        }))
        .to_montgomery();
        Fp2Element::new(a0, a1)
    }

    #[test]
    fn square_matches_mul_by_self() {
        let z = small(3, 5);
        assert!(z.square().eq_vartime(&z.mul(&z)));
    }

    #[test]
    fn byte_encoding_roundtrips() {
        let z = small(3, 5);
        let bytes = z.to_bytes();
        assert_eq!(bytes.len(), 188);
        let back = Fp2Element::from_bytes(&bytes);
        assert!(back.eq_vartime(&z));
        let repr = Fp2Element::from_repr(&bytes);
        assert!(bool::from(repr.is_some()));
        assert!(repr.unwrap_or(Fp2Element::ZERO).eq_vartime(&z));
    }

    #[test]
    fn invert_then_mul_is_one() {
        let z = small(3, 5);
        let inv = z.invert();
        assert!(z.mul(&inv).eq_vartime(&Fp2Element::ONE));
        let inv_vartime = z.invert_vartime();
        assert!(inv.eq_vartime(&inv_vartime));
    }

    #[test]
    fn invert3_matches_individual_inversions() {
        let z1 = small(3, 5);
        let z2 = small(7, 2);
        let z3 = small(11, 13);
        let (i1, i2, i3) = Fp2Element::invert3(&z1, &z2, &z3);
        assert!(i1.eq_vartime(&z1.invert()));
        assert!(i2.eq_vartime(&z2.invert()));
        assert!(i3.eq_vartime(&z3.invert()));
    }

    #[test]
    fn batch_invert_matches_individual_inversions() {
        let items = [small(3, 5), small(7, 2), small(11, 13)];
        let mut out = [Fp2Element::ZERO; 3];
        Fp2Element::batch_invert(&items, &mut out);
        for i in 0..3 {
            assert!(out[i].eq_vartime(&items[i].invert()));
        }
    }

    /// An element of norm 1, built as `z / conj(z)` for an arbitrary `z`.
    fn norm_one_element() -> Fp2Element {
        let z = small(3, 5);
        z.mul(&z.conjugate().invert())
    }

    #[test]
    fn cyclotomic_square_matches_plain_square_on_norm_one() {
        let a = norm_one_element();
        assert!(a.cyclotomic_square().eq_vartime(&a.square()));
    }

    #[test]
    fn cyclotomic_cube_matches_three_squarings_of_mul() {
        let a = norm_one_element();
        let cubed = a.mul(&a).mul(&a);
        assert!(a.cyclotomic_cube().eq_vartime(&cubed));
    }

    #[test]
    fn cyclotomic_inv_matches_conjugate() {
        let a = norm_one_element();
        assert!(a.cyclotomic_inv().eq_vartime(&a.conjugate()));
    }

    #[test]
    fn cyclotomic_pow_matches_repeated_multiplication() {
        let a = norm_one_element();
        let mut expect = Fp2Element::ONE;
        for _ in 0..11 {
            expect = expect.mul(&a);
        }
        assert!(a.cyclotomic_pow_u64(11, 5).eq_vartime(&expect));
    }

    #[test]
    fn sqrt_of_square_is_plus_or_minus_original() {
        let a = small(3, 5);
        let sq = a.square();
        let root = sq.sqrt();
        assert!(root.eq_vartime(&a) || root.eq_vartime(&a.negate()));
    }

    #[test]
    fn sqrt_frac_matches_sqrt_of_quotient() {
        let u = small(3, 5);
        let v = small(7, 2);
        let quotient = u.mul(&v.invert());
        let direct = quotient.sqrt();
        let frac = Fp2Element::sqrt_frac(&u, &v);
        assert!(frac.eq_vartime(&direct) || frac.eq_vartime(&direct.negate()));
    }
}
