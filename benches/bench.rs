use criterion::{Criterion, criterion_group, criterion_main};
use sidh_p751_core::{CurveCoefficients, FieldElement, Fp2Element, P751_PARAMETERS, pairing, torsion, x};
use std::hint::black_box;

/// `n` copies of `FieldElement::ONE` summed, in Montgomery form. Built from
/// public API only (no direct limb construction), since this file links
/// against the crate as an ordinary dependency.
fn small_field(n: u64) -> FieldElement {
    let mut out = FieldElement::ZERO;
    for _ in 0..n {
        out = out.add(&FieldElement::ONE);
    }
    out
}

fn small(re: u64, im: u64) -> Fp2Element {
    Fp2Element::new(small_field(re), small_field(im))
}

fn fp2_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("GF(p751^2)");
    let a = small(3, 5);
    let b = small(7, 11);

    group.bench_function("mul", |bencher| bencher.iter(|| black_box(a).mul(&black_box(b))));
    group.bench_function("square", |bencher| bencher.iter(|| black_box(a).square()));
    group.bench_function("invert", |bencher| bencher.iter(|| black_box(a).invert()));
    group.bench_function("invert_vartime", |bencher| {
        bencher.iter(|| black_box(a).invert_vartime())
    });

    group.finish();
}

fn montgomery_curve(c: &mut Criterion) {
    let mut group = c.benchmark_group("Montgomery curve");
    let curve = CurveCoefficients::from_ac(&P751_PARAMETERS.starting_a, &Fp2Element::ONE);
    let p = x::ProjectivePoint::from_affine(small(5, 0));
    let q = x::ProjectivePoint::from_affine(small(11, 0));
    let diff = small(5, 0).sub(&small(11, 0));
    let a24 = curve.a24_normalized_vartime();

    group.bench_function("xDBL", |bencher| bencher.iter(|| x::x_dbl(black_box(&p), black_box(&curve))));
    group.bench_function("xDBLADD", |bencher| {
        bencher.iter(|| x::x_dbl_add(black_box(&p), black_box(&q), black_box(&diff), black_box(&a24)))
    });

    let scalar_bits = [true, false, true, true, false, false, true, false, true, true, false, true];
    group.bench_function("ladder (12-bit scalar)", |bencher| {
        bencher.iter(|| x::ladder(black_box(&small(5, 0)), black_box(&scalar_bits), black_box(&curve)))
    });

    group.finish();
}

fn tate_pairing(c: &mut Criterion) {
    let mut group = c.benchmark_group("Tate pairing");
    let a = P751_PARAMETERS.starting_a;
    let (r1, r2) = torsion::generate_2_torsion_basis(&a);
    let ps = r1.to_affine_vartime();
    let qs = r2.to_affine_vartime();

    group.bench_function("tate_pairings_2_torsion (5-way)", |bencher| {
        bencher.iter(|| pairing::tate_pairings_2_torsion(black_box(&qs), black_box(&ps), black_box(&ps), black_box(&qs), black_box(&a)))
    });

    group.finish();
}

criterion_group!(benches, fp2_arithmetic, montgomery_curve, tate_pairing);
criterion_main!(benches);
