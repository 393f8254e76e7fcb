//! The doubling-only and tripling-only Tate pairings (spec.md section 4.7),
//! transcribed from `dbl_and_line`/`absorb_line`/`square_and_absorb_line`/
//! `final_dbl_iteration`/`final_exponentiation_2_torsion`/
//! `Tate_pairings_2_torsion` and their tripling-only counterparts
//! (`tpl_and_parabola`/`absorb_parab`/`cube_and_absorb_parab`/`final_tpl`/
//! `final_tpl_iteration`/`final_exponentiation_3_torsion`/
//! `Tate_pairings_3_torsion`) in `examples/original_source/C/ec_isogeny.c`.
//!
//! Both Miller loops compute 5 simultaneous pairings — `e(R1,R2)`, `e(R1,P)`,
//! `e(R1,Q)`, `e(R2,P)`, `e(R2,Q)` — batching all 10 running
//! numerator/denominator values through one [`Fp2Element::batch_invert`]
//! call before the (otherwise inversion-free) final exponentiation, mirroring
//! `mont_n_way_inv`. Non-constant-time throughout: the Tate pairing only ever
//! runs on the public torsion basis and the public shared points (spec.md
//! section 9).

use crate::field::Fp2Element;
use crate::montgomery::torsion::AffinePoint;

/// The extended projective point `(X^2:XZ:YZ:Z^2)` Miller's algorithm walks
/// across both loops. Mirrors `point_ext_proj_t`.
#[derive(Copy, Clone, Debug)]
struct ExtendedPoint {
    x2: Fp2Element,
    xz: Fp2Element,
    yz: Fp2Element,
    z2: Fp2Element,
}

impl ExtendedPoint {
    fn from_affine(p: &AffinePoint) -> Self {
        Self {
            x2: p.x.square(),
            xz: p.x,
            yz: p.y,
            z2: Fp2Element::ONE,
        }
    }
}

/// The tangent-line coefficients a doubling step hands to [`absorb_line`].
struct DblLine {
    lx: Fp2Element,
    ly: Fp2Element,
    l0: Fp2Element,
    v0: Fp2Element,
}

/// Doubles `p` in place and returns the line coefficients through the
/// doubled point, evaluated against an as-yet-unspecified point. Mirrors
/// `dbl_and_line`.
fn dbl_and_line(p: &mut ExtendedPoint, a: &Fp2Element) -> DblLine {
    let x2 = p.x2;
    let xz = p.xz;
    let yz = p.yz;
    let z2 = p.z2;

    let xx2 = yz.add(&yz);
    let ly = xx2.square();
    let l0 = x2.sub(&z2);
    let v0 = l0.square();
    let l0 = xx2.mul(&l0);
    let lx = xz.mul(&l0);
    let xx2 = yz.mul(&ly);
    let lx = xx2.add(&lx);
    let new_yz = x2.add(&z2);
    let new_yz = a.mul(&new_yz);
    let xx2 = xz.add(&xz);
    let new_yz = xx2.add(&new_yz);
    let new_yz = xx2.add(&new_yz);
    let new_yz = xx2.mul(&new_yz);

    let xx2 = v0.square();
    let t0 = l0.square();
    let new_z2 = ly.square();
    let new_yz = v0.add(&new_yz);
    let new_yz = l0.mul(&new_yz);

    let ly = xz.mul(&ly);
    let l0 = x2.mul(&l0);
    let v0 = xz.mul(&v0);

    p.x2 = xx2;
    p.xz = t0;
    p.yz = new_yz;
    p.z2 = new_z2;

    DblLine { lx, ly, l0, v0 }
}

/// Evaluates a doubling step's line function at `pt` and multiplies it into
/// the running pairing value `n/d`. Mirrors `absorb_line`.
fn absorb_line(l: &DblLine, pt: &AffinePoint, n: &mut Fp2Element, d: &mut Fp2Element) {
    let line = l.lx.mul(&pt.x);
    let v = l.ly.mul(&pt.y);
    let line = v.sub(&line);
    let line = l.l0.add(&line);
    let v = l.ly.mul(&pt.x);
    let v = v.sub(&l.v0);
    *n = n.mul(&line);
    *d = d.mul(&v);
}

/// Squares the running pairing value and absorbs one doubling step's line
/// function. Mirrors `square_and_absorb_line`.
fn square_and_absorb_line(l: &DblLine, pt: &AffinePoint, n: &mut Fp2Element, d: &mut Fp2Element) {
    *n = n.square();
    *d = d.square();
    absorb_line(l, pt, n, d);
}

/// The exceptional last doubling step of the Miller loop (doubling a point
/// of order 2). Mirrors `final_dbl_iteration`.
fn final_dbl_iteration(p: &ExtendedPoint, x: &Fp2Element, n: &mut Fp2Element, d: &mut Fp2Element) {
    let point_x = p.xz;
    let point_z = p.z2;
    *n = n.square();
    *d = d.square();
    *d = d.mul(&point_z);
    let line = point_z.mul(x);
    let line = line.sub(&point_x);
    *n = n.mul(&line);
}

/// Raises `n/d` to the power `(p^2-1)/2^eA` via 239 cyclotomic cubings.
/// Mirrors `final_exponentiation_2_torsion`.
fn final_exponentiation_2_torsion(n: Fp2Element, d: Fp2Element, n_inv: Fp2Element, d_inv: Fp2Element) -> Fp2Element {
    let n = n.mul(&d_inv);
    let n = n.cyclotomic_inv(); // n^p
    let d = d.mul(&n_inv);
    let mut n = n.mul(&d);
    for _ in 0..239 {
        n = n.cyclotomic_cube();
    }
    n
}

/// The doubling-only 2-torsion Tate pairing of order `2^372`: computes the 5
/// simultaneous pairings `e(R1,R2), e(R1,P), e(R1,Q), e(R2,P), e(R2,Q)`.
/// Mirrors `Tate_pairings_2_torsion`.
pub fn tate_pairings_2_torsion(
    r1: &AffinePoint,
    r2: &AffinePoint,
    p: &AffinePoint,
    q: &AffinePoint,
    a: &Fp2Element,
) -> [Fp2Element; 5] {
    let mut p1 = ExtendedPoint::from_affine(r1);
    let mut p2 = ExtendedPoint::from_affine(r2);

    let mut n0 = Fp2Element::ONE;
    let mut d0 = Fp2Element::ONE;
    let mut n1 = Fp2Element::ONE;
    let mut d1 = Fp2Element::ONE;
    let mut n2 = Fp2Element::ONE;
    let mut d2 = Fp2Element::ONE;
    let mut n3 = Fp2Element::ONE;
    let mut d3 = Fp2Element::ONE;
    let mut n4 = Fp2Element::ONE;
    let mut d4 = Fp2Element::ONE;

    for _ in 0..371 {
        let l1 = dbl_and_line(&mut p1, a);
        let l2 = dbl_and_line(&mut p2, a);
        square_and_absorb_line(&l1, r2, &mut n0, &mut d0);
        square_and_absorb_line(&l1, p, &mut n1, &mut d1);
        square_and_absorb_line(&l1, q, &mut n2, &mut d2);
        square_and_absorb_line(&l2, p, &mut n3, &mut d3);
        square_and_absorb_line(&l2, q, &mut n4, &mut d4);
    }

    final_dbl_iteration(&p1, &r2.x, &mut n0, &mut d0);
    final_dbl_iteration(&p1, &p.x, &mut n1, &mut d1);
    final_dbl_iteration(&p1, &q.x, &mut n2, &mut d2);
    final_dbl_iteration(&p2, &p.x, &mut n3, &mut d3);
    final_dbl_iteration(&p2, &q.x, &mut n4, &mut d4);

    let nd = [n0, n1, n2, n3, n4, d0, d1, d2, d3, d4];
    let mut invs = [Fp2Element::ZERO; 10];
    Fp2Element::batch_invert(&nd, &mut invs);

    [
        final_exponentiation_2_torsion(nd[0], nd[5], invs[0], invs[5]),
        final_exponentiation_2_torsion(nd[1], nd[6], invs[1], invs[6]),
        final_exponentiation_2_torsion(nd[2], nd[7], invs[2], invs[7]),
        final_exponentiation_2_torsion(nd[3], nd[8], invs[3], invs[8]),
        final_exponentiation_2_torsion(nd[4], nd[9], invs[4], invs[9]),
    ]
}

/// The parabola coefficients a tripling step hands to [`absorb_parab`].
struct TplLine {
    ly: Fp2Element,
    lx2: Fp2Element,
    lx1: Fp2Element,
    lx0: Fp2Element,
    vx: Fp2Element,
    v0: Fp2Element,
}

/// Triples `p` in place and returns the parabola coefficients through the
/// tripled point. Mirrors `tpl_and_parabola`.
fn tpl_and_parabola(p: &mut ExtendedPoint, a: &Fp2Element) -> TplLine {
    let x2 = p.x2;
    let xz = p.xz;
    let yz = p.yz;
    let z2 = p.z2;

    let ly = yz.add(&yz);
    let tlx2 = ly.square();
    let ly = ly.mul(&tlx2);

    let axz = a.mul(&xz);
    let t0 = axz.add(&z2);
    let t0 = t0.add(&t0);
    let t1 = x2.add(&z2);
    let t2 = x2.add(&x2);
    let t3 = x2.sub(&z2);
    let t3 = t3.square();
    let t4 = t2.add(&t0);
    let tlx2 = t2.mul(&t4);
    let tlx2 = tlx2.sub(&t3);
    let tlx1 = t4.add(&t1);
    let t1 = t1.square();
    let tlx1 = axz.mul(&tlx1);
    let tlx1 = t1.add(&tlx1);
    let tlx1 = tlx1.add(&tlx1);
    let tlx1 = t3.add(&tlx1);
    let tlx0 = z2.mul(&t0);
    let tlx0 = t3.sub(&tlx0);
    let tlx0 = tlx0.add(&tlx0);
    let tlx0 = t1.sub(&tlx0);

    let lx2 = z2.mul(&tlx2);
    let lx1 = xz.mul(&tlx1);
    let lx1 = lx1.add(&lx1);
    let lx0 = x2.mul(&tlx0);

    let t3 = tlx2.square();
    let t2 = ly.mul(&t3);
    let t4 = tlx0.square();
    let t0 = t4.square();
    let t0 = x2.mul(&t0);
    let new_x2 = ly.mul(&t0);
    let new_xz = xz.mul(&t2);
    let new_xz = new_xz.mul(&t4);
    let new_z2 = z2.mul(&t2);
    let new_z2 = new_z2.mul(&t3);
    let t2 = tlx0.mul(&tlx1);
    let new_yz = t2.add(&t2);
    let new_yz = new_yz.add(&t3);
    let t2 = lx0.mul(&tlx2);
    let new_yz = t2.mul(&new_yz);
    let new_yz = t0.add(&new_yz);
    let new_yz = lx2.mul(&new_yz);
    let new_yz = new_yz.negate();

    let vx = new_z2;
    let v0 = new_xz.negate();

    p.x2 = new_x2;
    p.xz = new_xz;
    p.yz = new_yz;
    p.z2 = new_z2;

    TplLine { ly, lx2, lx1, lx0, vx, v0 }
}

/// Evaluates a tripling step's parabola at `pt` and multiplies it into the
/// running pairing value `n/d`. Mirrors `absorb_parab`.
fn absorb_parab(l: &TplLine, pt: &AffinePoint, n: &mut Fp2Element, d: &mut Fp2Element) {
    let ln = l.lx0.mul(&pt.x);
    let ld = l.v0.mul(&pt.x);
    let ld = l.vx.add(&ld);
    let ld = ld.mul(&ln);
    *d = d.mul(&ld);

    let ln = l.lx1.add(&ln);
    let ln = pt.x.mul(&ln);
    let ld = l.ly.mul(&pt.y);
    let ln = l.lx2.add(&ln);
    let ln = ld.add(&ln);
    let ln = ln.mul(&l.v0);
    *n = n.mul(&ln);
}

/// Cubes the running pairing value and absorbs one tripling step's parabola.
/// Mirrors `cube_and_absorb_parab`.
fn cube_and_absorb_parab(l: &TplLine, pt: &AffinePoint, n: &mut Fp2Element, d: &mut Fp2Element) {
    let ln = n.square();
    *n = n.mul(&ln);
    let ld = d.square();
    *d = d.mul(&ld);
    absorb_parab(l, pt, n, d);
}

/// The line coefficients the exceptional last tripling step hands to
/// [`final_tpl_iteration`].
struct FinalTplLine {
    lam: Fp2Element,
    mu: Fp2Element,
    d: Fp2Element,
}

/// The exceptional last tripling step of the Miller loop (tripling a point
/// of order 3); uses a line rather than a parabola. Mirrors `final_tpl`.
fn final_tpl(p: &mut ExtendedPoint, a: &Fp2Element) -> FinalTplLine {
    let x = p.xz;
    let y = p.yz;
    let z = p.z2;

    let new_x2 = x.square();
    let t_x2 = new_x2.add(&new_x2);
    let ax2 = a.mul(&new_x2);
    let new_xz = x.mul(&z);
    let y2 = y.square();
    let t_xz = new_xz.add(&new_xz);
    let t_axz = a.mul(&t_xz);
    let new_z2 = z.square();
    let new_yz = y.mul(&z);

    let lam = new_x2.add(&new_z2);
    let lam = lam.add(&t_x2);
    let lam = lam.add(&t_axz);
    let mu = t_xz.sub(&y2);
    let mu = mu.add(&ax2);
    let d = new_yz.add(&new_yz);

    p.x2 = new_x2;
    p.xz = new_xz;
    p.yz = new_yz;
    p.z2 = new_z2;

    FinalTplLine { lam, mu, d }
}

/// Cubes the running pairing value and absorbs the exceptional final
/// tripling step's line function, evaluated at `(x, y)`. Mirrors
/// `final_tpl_iteration`.
fn final_tpl_iteration(x: &Fp2Element, y: &Fp2Element, l: &FinalTplLine, n: &mut Fp2Element, d: &mut Fp2Element) {
    let ln = n.square();
    *n = n.mul(&ln);
    let ld = d.square();
    *d = d.mul(&ld);
    let ld = x.square();
    let ld = l.mu.mul(&ld);
    let t = l.lam.mul(x);
    let ln = t.add(&ld);
    let t = l.d.mul(y);
    let ln = t.add(&ln);
    *n = n.mul(&ln);
    *d = d.mul(&ld);
}

/// Raises `n/d` to the power `(p^2-1)/3^eB` via 372 cyclotomic squarings.
/// Mirrors `final_exponentiation_3_torsion`.
fn final_exponentiation_3_torsion(n: Fp2Element, d: Fp2Element, n_inv: Fp2Element, d_inv: Fp2Element) -> Fp2Element {
    let n = n.mul(&d_inv);
    let n = n.cyclotomic_inv();
    let d = d.mul(&n_inv);
    let mut n = n.mul(&d);
    for _ in 0..372 {
        n = n.cyclotomic_square();
    }
    n
}

/// The tripling-only 3-torsion Tate pairing of order `3^239`: computes the 5
/// simultaneous pairings `e(R1,R2), e(R1,P), e(R1,Q), e(R2,P), e(R2,Q)`.
/// Mirrors `Tate_pairings_3_torsion`; the main loop runs `238` times
/// (`for i = 239; i >= 2; i--` in the source), with the 239th tripling
/// handled by the exceptional [`final_tpl`]/[`final_tpl_iteration`] pair.
pub fn tate_pairings_3_torsion(
    r1: &AffinePoint,
    r2: &AffinePoint,
    p: &AffinePoint,
    q: &AffinePoint,
    a: &Fp2Element,
) -> [Fp2Element; 5] {
    let mut p1 = ExtendedPoint::from_affine(r1);
    let mut p2 = ExtendedPoint::from_affine(r2);

    let mut n0 = Fp2Element::ONE;
    let mut d0 = Fp2Element::ONE;
    let mut n1 = Fp2Element::ONE;
    let mut d1 = Fp2Element::ONE;
    let mut n2 = Fp2Element::ONE;
    let mut d2 = Fp2Element::ONE;
    let mut n3 = Fp2Element::ONE;
    let mut d3 = Fp2Element::ONE;
    let mut n4 = Fp2Element::ONE;
    let mut d4 = Fp2Element::ONE;

    for _ in 0..238 {
        let l1 = tpl_and_parabola(&mut p1, a);
        cube_and_absorb_parab(&l1, r2, &mut n0, &mut d0);
        cube_and_absorb_parab(&l1, p, &mut n1, &mut d1);
        cube_and_absorb_parab(&l1, q, &mut n2, &mut d2);
        let l2 = tpl_and_parabola(&mut p2, a);
        cube_and_absorb_parab(&l2, p, &mut n3, &mut d3);
        cube_and_absorb_parab(&l2, q, &mut n4, &mut d4);
    }

    let final1 = final_tpl(&mut p1, a);
    final_tpl_iteration(&r2.x, &r2.y, &final1, &mut n0, &mut d0);
    final_tpl_iteration(&p.x, &p.y, &final1, &mut n1, &mut d1);
    final_tpl_iteration(&q.x, &q.y, &final1, &mut n2, &mut d2);
    let final2 = final_tpl(&mut p2, a);
    final_tpl_iteration(&p.x, &p.y, &final2, &mut n3, &mut d3);
    final_tpl_iteration(&q.x, &q.y, &final2, &mut n4, &mut d4);

    let nd = [n0, n1, n2, n3, n4, d0, d1, d2, d3, d4];
    let mut invs = [Fp2Element::ZERO; 10];
    Fp2Element::batch_invert(&nd, &mut invs);

    [
        final_exponentiation_3_torsion(nd[0], nd[5], invs[0], invs[5]),
        final_exponentiation_3_torsion(nd[1], nd[6], invs[1], invs[6]),
        final_exponentiation_3_torsion(nd[2], nd[7], invs[2], invs[7]),
        final_exponentiation_3_torsion(nd[3], nd[8], invs[3], invs[8]),
        final_exponentiation_3_torsion(nd[4], nd[9], invs[4], invs[9]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldElement;
    use crate::montgomery::torsion::generate_2_torsion_basis;

    fn small(re: u64) -> Fp2Element {
        let mut l = [0u64; crate::bigint::NWORDS_FIELD];
        l[0] = re;
        Fp2Element::new(FieldElement::from_limbs(crate::bigint::Limbs::new(l)).to_montgomery(), FieldElement::ZERO)
    }

    /// Builds a genuine affine point `(x, y)` on `E_a: y^2 = x^3+a*x^2+x`
    /// for an arbitrary x-coordinate, the same relation [`recover_full_y`]
    /// in the torsion module solves; duplicated here rather than exposed
    /// since it is test-only scaffolding, not part of the pairing itself.
    fn curve_point(x: Fp2Element, a: &Fp2Element) -> AffinePoint {
        let inner = x.square().add(&a.mul(&x)).add(&Fp2Element::ONE);
        let rhs = x.mul(&inner);
        let y = Fp2Element::sqrt_frac(&rhs, &Fp2Element::ONE);
        AffinePoint { x, y }
    }

    #[test]
    fn tate_pairings_2_torsion_produces_well_formed_values() {
        let a = Fp2Element::ZERO;
        let (r1, r2) = generate_2_torsion_basis(&a);
        let p1 = r1.to_affine_vartime();
        let p2 = r2.to_affine_vartime();
        // Distinct evaluation points, not equal to either basis point, so no
        // self-pairing pole is hit.
        let p = curve_point(small(5), &a);
        let q = curve_point(small(13), &a);
        let out = tate_pairings_2_torsion(&p1, &p2, &p, &q, &a);
        // A non-degenerate pairing value is always a unit of GF(p751^2).
        for v in out {
            assert!(!bool::from(v.correct().is_zero()));
        }
    }

    /// Affine Montgomery doubling (`C=1`), duplicated from
    /// `montgomery::compress`'s `affine_double_raw` to keep this module's
    /// tests self-contained.
    fn affine_double(p: &AffinePoint, a: &Fp2Element) -> AffinePoint {
        let three = Fp2Element::ONE.add(&Fp2Element::ONE).add(&Fp2Element::ONE);
        let two_a = a.add(a);
        let num = three.mul(&p.x.square()).add(&two_a.mul(&p.x)).add(&Fp2Element::ONE);
        let den = p.y.add(&p.y);
        let lambda = num.mul(&den.invert_vartime());
        let x3 = lambda.square().sub(a).sub(&p.x).sub(&p.x);
        let y3 = lambda.mul(&p.x.sub(&x3)).sub(&p.y);
        AffinePoint { x: x3, y: y3 }
    }

    #[test]
    fn tate_pairings_2_torsion_is_bilinear_in_the_evaluation_point() {
        // e(R1, [2]P) = e(R1,P)^2: since P is only ever used as a fixed
        // evaluation point in `absorb_line`/`final_dbl_iteration` (never
        // walked through doubling itself), replacing it with [2]P leaves the
        // Miller loop over R1/R2 untouched and only squares this particular
        // pairing value, per the Tate pairing's bilinearity.
        let a = Fp2Element::ZERO;
        let (r1, r2) = generate_2_torsion_basis(&a);
        let p1 = r1.to_affine_vartime();
        let p2 = r2.to_affine_vartime();
        let p = curve_point(small(5), &a);
        let doubled_p = affine_double(&p, &a);

        let base = tate_pairings_2_torsion(&p1, &p2, &p, &p, &a);
        let doubled = tate_pairings_2_torsion(&p1, &p2, &doubled_p, &doubled_p, &a);

        let squared = base[1].mul(&base[1]);
        assert!(squared.correct().eq_vartime(&doubled[1].correct()));
    }

    #[test]
    fn final_exponentiation_2_torsion_fixes_identity_input() {
        let one = Fp2Element::ONE;
        let out = final_exponentiation_2_torsion(one, one, one, one);
        assert!(out.eq_vartime(&Fp2Element::ONE));
    }

    #[test]
    fn final_exponentiation_3_torsion_fixes_identity_input() {
        let one = Fp2Element::ONE;
        let out = final_exponentiation_3_torsion(one, one, one, one);
        assert!(out.eq_vartime(&Fp2Element::ONE));
    }

    #[test]
    fn dbl_and_line_preserves_structural_invariants() {
        let mut l = [0u64; crate::bigint::NWORDS_FIELD];
        l[0] = 5;
        let x = FieldElement::from_limbs(crate::bigint::Limbs::new(l)).to_montgomery();
        let r1 = AffinePoint {
            x: Fp2Element::new(x, FieldElement::ZERO),
            y: Fp2Element::ONE,
        };
        let mut p = ExtendedPoint::from_affine(&r1);
        let line = dbl_and_line(&mut p, &Fp2Element::ZERO);
        // x=5 is not 2-torsion on E_0, so doubling it is well-defined and
        // the resulting extended coordinates stay nonzero.
        assert!(!bool::from(line.lx.correct().is_zero()));
        assert!(!bool::from(p.x2.correct().is_zero()));
    }
}
