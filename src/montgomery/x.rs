//! x-only projective arithmetic on Montgomery curves `E_{A/C}: C*y^2 = x^3 +
//! (A/C)*x^2 + x` (spec.md section 4.4), grounded in the `xDBL`/`xADD`/
//! `xDBLADD`/`xDBLe`/`xTPLe`/`ladder_3_pt`/`Mont_ladder` family of
//! `examples/original_source/C/ec_isogeny.c`.

use crate::field::Fp2Element;
use subtle::{Choice, ConditionallySelectable};

/// The x-coordinate of a point, projectively as `X/Z`. `Z == 0` is the
/// point at infinity.
#[derive(Copy, Clone, Debug, Default)]
pub struct ProjectivePoint {
    /// Numerator.
    pub x: Fp2Element,
    /// Denominator.
    pub z: Fp2Element,
}

impl ProjectivePoint {
    /// The identity (point at infinity): `X = 1, Z = 0`.
    pub const IDENTITY: Self = Self {
        x: Fp2Element::ONE,
        z: Fp2Element::ZERO,
    };

    /// Build an affine-looking projective point `(x, 1)`.
    pub const fn from_affine(x: Fp2Element) -> Self {
        Self { x, z: Fp2Element::ONE }
    }

    /// Constant-time conditional swap of two points.
    pub fn conditional_swap(a: &mut Self, b: &mut Self, choice: Choice) {
        Fp2Element::conditional_swap(&mut a.x, &mut b.x, choice);
        Fp2Element::conditional_swap(&mut a.z, &mut b.z, choice);
    }
}

impl ConditionallySelectable for ProjectivePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: Fp2Element::conditional_select(&a.x, &b.x, choice),
            z: Fp2Element::conditional_select(&a.z, &b.z, choice),
        }
    }
}

/// The projective curve constants `(A24+ , C24)` used for x-only doubling,
/// `A24+/C24 = (A+2C)/(4C)`, plus the `A24- = (A-2C)/(4C)` numerator used
/// for x-only tripling (spec.md section 4.4).
#[derive(Copy, Clone, Debug)]
pub struct CurveCoefficients {
    /// `A + 2C` (or a scalar multiple thereof, shared with `c24`'s scale).
    pub a24_plus: Fp2Element,
    /// `4C` (or a scalar multiple thereof, shared with `a24_plus`'s scale).
    pub c24: Fp2Element,
    /// `A - 2C`, used by x-only tripling.
    pub a24_minus: Fp2Element,
}

impl CurveCoefficients {
    /// `(A24+ , C24)` from affine `(A, C)`, i.e. `A24+ = A + 2C`, `C24 = 4C`.
    pub fn from_ac(a: &Fp2Element, c: &Fp2Element) -> Self {
        let two_c = c.add(c);
        let a24_plus = a.add(&two_c);
        let c24 = two_c.add(&two_c);
        let a24_minus = a.sub(&two_c);
        Self {
            a24_plus,
            c24,
            a24_minus,
        }
    }

    /// The single normalized constant `A24+/C24` that the ladder's
    /// `xDBLADD` step (spec.md section 4.4) takes in place of the
    /// `(A24+, C24)` pair. The division is one public-value inversion, done
    /// once per curve outside the scalar-dependent ladder loop, so it does
    /// not violate the constant-time discipline of spec.md section 5.
    pub fn a24_normalized_vartime(&self) -> Fp2Element {
        self.a24_plus.mul(&self.c24.invert_vartime())
    }
}

/// `2P`, via the standard Montgomery x-only doubling formula:
/// `t0=X-Z, t1=X+Z, t0=t0^2, t1=t1^2, Z2=C24*t0, X2=Z2*t1, t1=t1-t0,
/// t0=A24+*t1, Z2=Z2+t0, Z2=Z2*t1`. Mirrors `xDBL`.
pub fn x_dbl(p: &ProjectivePoint, curve: &CurveCoefficients) -> ProjectivePoint {
    let t0 = p.x.sub(&p.z);
    let t1 = p.x.add(&p.z);
    let t0 = t0.square();
    let t1 = t1.square();
    let z2 = curve.c24.mul(&t0);
    let x2 = z2.mul(&t1);
    let t1 = t1.sub(&t0);
    let t0 = curve.a24_plus.mul(&t1);
    let z2 = z2.add(&t0);
    let z2 = z2.mul(&t1);
    ProjectivePoint { x: x2, z: z2 }
}

/// `2^e * P` via `e` repeated [`x_dbl`] calls. Mirrors `xDBLe`.
pub fn x_dbl_e(p: &ProjectivePoint, curve: &CurveCoefficients, e: u32) -> ProjectivePoint {
    let mut out = *p;
    for _ in 0..e {
        out = x_dbl(&out, curve);
    }
    out
}

/// `3P`, via the standard Montgomery x-only tripling formula built from two
/// doublings' worth of cross terms. Mirrors `xTPL`, which itself is used by
/// [`x_tpl_e`] in the non-Edwards path.
pub fn x_tpl(p: &ProjectivePoint, curve: &CurveCoefficients) -> ProjectivePoint {
    let t0 = p.x.sub(&p.z);
    let t2 = t0.square();
    let t1 = p.x.add(&p.z);
    let t3 = t1.square();
    let t4 = t1.add(&t0);
    let t0 = t1.sub(&t0);
    let t1 = t4.square();
    let t1 = t1.sub(&t3);
    let t1 = t1.sub(&t2);
    let t5 = t3.mul(&curve.a24_plus);
    let t3 = t3.mul(&t5);
    let t6 = t2.mul(&curve.a24_minus);
    let t2 = t2.mul(&t6);
    let t3 = t2.sub(&t3);
    let t2 = t5.sub(&t6);
    let t1 = t2.mul(&t1);
    let t2 = t3.add(&t1);
    let t2 = t2.square();
    let x3 = t2.mul(&t4);
    let t1 = t3.sub(&t1);
    let t1 = t1.square();
    let z3 = t1.mul(&t0);
    ProjectivePoint { x: x3, z: z3 }
}

/// `3^e * P` via `e` repeated [`x_tpl`] calls. Mirrors `xTPLe`.
pub fn x_tpl_e(p: &ProjectivePoint, curve: &CurveCoefficients, e: u32) -> ProjectivePoint {
    let mut out = *p;
    for _ in 0..e {
        out = x_tpl(&out, curve);
    }
    out
}

/// `P + Q`, given the (possibly non-normalized, i.e. projective) x-difference
/// `x(P-Q)`. Mirrors `xADD`: `t0=XP+ZP, t1=XP-ZP, t2=XQ-ZQ, t3=XQ+ZQ,
/// t0=t0*t2, t1=t1*t3, t2=t0-t1, t3=t0+t1, t2=t2^2, t3=t3^2,
/// X_{P+Q}=Z_{P-Q}*t3, Z_{P+Q}=X_{P-Q}*t2`.
pub fn x_add(p: &ProjectivePoint, q: &ProjectivePoint, x_diff: &ProjectivePoint) -> ProjectivePoint {
    let t0 = p.x.add(&p.z);
    let t1 = p.x.sub(&p.z);
    let t2 = q.x.sub(&q.z);
    let t3 = q.x.add(&q.z);
    let t0 = t0.mul(&t2);
    let t1 = t1.mul(&t3);
    let t2 = t0.sub(&t1);
    let t3 = t0.add(&t1);
    let t2 = t2.square();
    let t3 = t3.square();
    let xq = x_diff.z.mul(&t3);
    let zq = x_diff.x.mul(&t2);
    ProjectivePoint { x: xq, z: zq }
}

/// Simultaneous `(2P, P+Q)`, given the *affine* (`Z=1`) x-difference
/// `x(P-Q)` and the single normalized doubling constant `A24+/C24`. Mirrors
/// `xDBLADD`'s fused formula (one multiplication cheaper than calling
/// [`x_dbl`] and [`x_add`] separately, since both share the `(XP±ZP)`
/// cross terms): `t0=XP+ZP, t1=XP-ZP, X2P'=t0^2, t2=XQ-ZQ, XQ'=XQ+ZQ,
/// t0=t0*t2, Z2P'=t1^2, t1=t1*XQ', t2=X2P'-Z2P', X2P=X2P'*Z2P',
/// XQ''=A24*t2, ZPQ=t0-t1, Z2P=(XQ''+Z2P')*t2, XPQ_sum=t0+t1,
/// X_{P+Q}=XPQ_sum^2, Z_{P+Q}=xPQ*ZPQ^2`. Used in the inner loop of both
/// the two-point and three-point ladders.
pub fn x_dbl_add(
    p: &ProjectivePoint,
    q: &ProjectivePoint,
    x_diff: &Fp2Element,
    a24: &Fp2Element,
) -> (ProjectivePoint, ProjectivePoint) {
    let sum_p = p.x.add(&p.z);
    let diff_p = p.x.sub(&p.z);
    let xp2 = sum_p.square();
    let diff_q = q.x.sub(&q.z);
    let sum_q = q.x.add(&q.z);
    let t0 = sum_p.mul(&diff_q);
    let zp2 = diff_p.square();
    let t1 = diff_p.mul(&sum_q);
    let t2 = xp2.sub(&zp2);
    let x2p = xp2.mul(&zp2);
    let a24_t2 = a24.mul(&t2);
    let sum_diff = t0.sub(&t1);
    let sum_sum = t0.add(&t1);
    let z2p = a24_t2.add(&zp2).mul(&t2);
    let xpq = sum_sum.square();
    let zpq = x_diff.mul(&sum_diff.square());

    (
        ProjectivePoint { x: x2p, z: z2p },
        ProjectivePoint { x: xpq, z: zpq },
    )
}

/// The constant-time Montgomery ladder over `GF(p751^2)`: given `x(P)` and a
/// scalar `m` (`scalar_bits` listed most-significant-bit first) returns
/// `x(m*P)`. Mirrors `Mont_ladder` as specialized to general `GF(p^2)` use
/// (the "variant over GF(p^2) for general use" of spec.md section 4.4):
/// `R0` starts at the identity, `R1` at `(x(P):1)`, and each iteration
/// conditionally swaps `(R0,R1)` under the current bit, advances with
/// [`x_dbl_add`], then swaps back so the swap is always undone before the
/// next bit is inspected.
pub fn ladder(x_p: &Fp2Element, scalar_bits: &[bool], curve: &CurveCoefficients) -> ProjectivePoint {
    ladder_both(x_p, scalar_bits, curve).0
}

/// As [`ladder`], but returns both running points `(R0, R1) = ([m]P, [m+1]P)`
/// instead of discarding `R1`. Mirrors `Mont_ladder`'s full output, which
/// public-key decompression's `mont_twodim_scalarmult` needs (it recovers a
/// y-coordinate from the difference between the two).
pub fn ladder_both(
    x_p: &Fp2Element,
    scalar_bits: &[bool],
    curve: &CurveCoefficients,
) -> (ProjectivePoint, ProjectivePoint) {
    let a24 = curve.a24_normalized_vartime();
    let mut r0 = ProjectivePoint::IDENTITY;
    let mut r1 = ProjectivePoint::from_affine(*x_p);

    for &bit in scalar_bits {
        let choice = Choice::from(bit as u8);
        ProjectivePoint::conditional_swap(&mut r0, &mut r1, choice);
        let (new_r0, new_r1) = x_dbl_add(&r0, &r1, x_p, &a24);
        r0 = new_r0;
        r1 = new_r1;
        ProjectivePoint::conditional_swap(&mut r0, &mut r1, choice);
    }
    (r0, r1)
}

/// Three-point ladder (De Feo/Jao/Plut): given `x(P)`, `x(Q)`, `x(P-Q)` and
/// scalar `m` (`scalar_bits` listed most-significant-bit first), returns
/// `x(P + m*Q)`. Mirrors `ladder_3_pt`, maintaining three running points `U
/// = [k]Q`, `V = U + [k]P` i.e. the partner of `U` in the pair being
/// advanced, and `W = P + [s]Q` for the bit prefix processed so far; each
/// iteration conditionally swaps `(W,U)` and `(U,V)` under the current bit's
/// mask, advances `W` by a plain [`x_add`] and `(U,V)` by one [`x_dbl_add`],
/// then swaps back, so a swap is always undone before the next bit.
pub fn ladder_3_pt(
    x_p: &Fp2Element,
    x_q: &Fp2Element,
    x_p_minus_q: &Fp2Element,
    scalar_bits: &[bool],
    curve: &CurveCoefficients,
) -> ProjectivePoint {
    let a24 = curve.a24_normalized_vartime();

    let mut u = ProjectivePoint::IDENTITY;
    let mut v = ProjectivePoint::from_affine(*x_q);
    let mut w = ProjectivePoint::from_affine(*x_p);

    for &bit in scalar_bits {
        let mask = Choice::from(bit as u8);
        ProjectivePoint::conditional_swap(&mut w, &mut u, mask);
        ProjectivePoint::conditional_swap(&mut u, &mut v, mask);

        let constant1 = Fp2Element::conditional_select(x_p, x_q, mask);
        let constant2 = Fp2Element::conditional_select(x_q, x_p_minus_q, mask);

        w = x_add(&w, &u, &ProjectivePoint::from_affine(constant1));
        let (doubled_u, sum_uv) = x_dbl_add(&u, &v, &constant2, &a24);
        u = doubled_u;
        v = sum_uv;

        ProjectivePoint::conditional_swap(&mut u, &mut v, mask);
        ProjectivePoint::conditional_swap(&mut w, &mut u, mask);
    }
    w
}

/// Constructs `x(distort(P))` on the quadratic twist reached via the
/// distortion map `(x, y) -> (-x, i*y)`, together with the `z`-side term
/// needed to difference-add against an undistorted point: `X = (x(P)^2 +
/// 1)*i`, `Z = 2*x(P)`. Mirrors `distort_and_diff`; included per
/// SPEC_FULL.md section B as a supplementary feature used by the 2-torsion
/// basis generator's independence check.
pub fn distort_and_diff(x_p: &Fp2Element) -> ProjectivePoint {
    let i = Fp2Element::new(crate::field::FieldElement::ZERO, crate::field::FieldElement::ONE);
    let x = i.mul(&x_p.square().add(&Fp2Element::ONE));
    let z = x_p.add(x_p);
    ProjectivePoint { x, z }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldElement;

    fn small(re: u64) -> Fp2Element {
        let mut l = [0u64; crate::bigint::NWORDS_FIELD];
        l[0] = re;
        let a0 = FieldElement::from_limbs(crate::bigint::Limbs::new(l)).to_montgomery();
        Fp2Element::new(a0, FieldElement::ZERO)
    }

    fn starting_curve() -> CurveCoefficients {
        CurveCoefficients::from_ac(&Fp2Element::ZERO, &Fp2Element::ONE)
    }

    #[test]
    fn double_of_identity_is_identity() {
        let curve = starting_curve();
        let doubled = x_dbl(&ProjectivePoint::IDENTITY, &curve);
        assert!(bool::from(doubled.z.is_zero()));
    }

    #[test]
    fn dbl_e_zero_is_identity_map() {
        let curve = starting_curve();
        let p = ProjectivePoint::from_affine(small(5));
        let same = x_dbl_e(&p, &curve, 0);
        assert!(same.x.eq_vartime(&p.x));
        assert!(same.z.eq_vartime(&p.z));
    }

    #[test]
    fn tpl_e_zero_is_identity_map() {
        let curve = starting_curve();
        let p = ProjectivePoint::from_affine(small(5));
        let same = x_tpl_e(&p, &curve, 0);
        assert!(same.x.eq_vartime(&p.x));
        assert!(same.z.eq_vartime(&p.z));
    }

    #[test]
    fn ladder_with_zero_scalar_yields_identity() {
        let curve = starting_curve();
        let p = small(7);
        let bits = [false; 8];
        let r = ladder(&p, &bits, &curve);
        assert!(bool::from(r.z.is_zero()));
    }

    /// Cross-multiplication check that two projective points represent the
    /// same x-coordinate, tolerating the scale difference between a
    /// normalized (`C24=1`) and an unnormalized curve constant pair.
    fn same_point(a: &ProjectivePoint, b: &ProjectivePoint) -> bool {
        a.x.mul(&b.z).eq_vartime(&b.x.mul(&a.z))
    }

    #[test]
    fn dbl_add_matches_separate_dbl_and_add() {
        let curve = starting_curve();
        let a24 = curve.a24_normalized_vartime();
        let p = ProjectivePoint::from_affine(small(7));
        let q = ProjectivePoint::from_affine(small(11));
        let diff = small(7).sub(&small(11));
        let (dbl_fused, add_fused) = x_dbl_add(&p, &q, &diff, &a24);
        let dbl_separate = x_dbl(&p, &curve);
        let add_separate = x_add(&p, &q, &ProjectivePoint::from_affine(diff));
        assert!(same_point(&dbl_fused, &dbl_separate));
        assert!(same_point(&add_fused, &add_separate));
    }

    #[test]
    fn ladder_3_pt_with_zero_scalar_yields_p() {
        let curve = starting_curve();
        let xp = small(7);
        let xq = small(11);
        let diff = small(7).sub(&small(11));
        let bits = [false; 8];
        let r = ladder_3_pt(&xp, &xq, &diff, &bits, &curve);
        // m = 0 => P + 0*Q = P, represented projectively as (xp : 1).
        assert!(same_point(&r, &ProjectivePoint::from_affine(xp)));
    }

    #[test]
    fn distort_and_diff_doubles_z_as_x_p() {
        let xp = small(7);
        let d = distort_and_diff(&xp);
        assert!(d.z.eq_vartime(&xp.add(&xp)));
    }
}
