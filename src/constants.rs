//! Process-wide read-only constants: the prime, its Montgomery constants,
//! and the bundle of curve parameters spec.md section 3 calls
//! `CurveParameters`.
//!
//! Values are transcribed verbatim (as big-endian-documented hex becomes
//! little-endian limb arrays) from the `p751`, `p751x2` and `Montgomery_R2`
//! tables in `examples/original_source/C/fpx.c`.

use crate::bigint::{Limbs, NWORDS_FIELD, NWORDS_ORDER};
use crate::field::fp::FieldElement;
use crate::field::fp2::Fp2Element;

/// p751 = 2^372 * 3^239 - 1, as 12 little-endian 64-bit limbs. The canonical
/// copy lives next to the Montgomery-reduction machinery in
/// `field::fp`; re-exported here so `CurveParameters` and its callers don't
/// need to reach into that module directly.
pub use crate::field::fp::P751;

/// 2 * p751.
pub use crate::field::fp::P751X2;

/// p751 + 1 = 2^372 * 3^239.
pub const P751P1: Limbs<NWORDS_FIELD> = Limbs::new([
    0,
    0,
    0,
    0,
    0,
    0xEEB0000000000000,
    0xE3EC968549F878A8,
    0xDA959B1A13F7CC76,
    0x084E9867D6EBE876,
    0x8562B5045CB25748,
    0x0E12909F97BADC66,
    0x00006FE5D541F71C,
]);

/// R^2 mod p751, where R = 2^768 mod p751 is the Montgomery radix.
pub use crate::field::fp::MONTGOMERY_R2;

/// Bit-length of the 2-power subgroup order (eA in the original source).
pub const OA_BITS: usize = 372;

/// Bit-length of the 3-power subgroup order (eB in the original source),
/// `floor(log2(3^239))`.
pub const OB_BITS: usize = 379;

/// Montgomery constants for arithmetic modulo the 3^239 order ring, used by
/// `compress_3_torsion` / `decompress_3_torsion`. Transcribed from the
/// `Montgomery_Rprime` / `Montgomery_rprime` tables in `ec_isogeny.c`:
/// `Montgomery_Rprime` = (2^384)^2 mod 3^239, `Montgomery_rprime` =
/// -(3^239)^-1 mod 2^384.
pub const MONTGOMERY_RPRIME: Limbs<NWORDS_ORDER> = Limbs::new([
    0x48062A91D3AB563D,
    0x6CE572751303C2F5,
    0x5D1319F3F160EC9D,
    0xE35554E8C2D5623A,
    0xCA29300232BC79A5,
    0x8AAD843D646D78C5,
]);

/// (2^384)^2 mod 3^239.
pub const MONTGOMERY_RPRIME_SQ: Limbs<NWORDS_ORDER> = Limbs::new([
    0x1A55482318541298,
    0x070A6370DFA12A03,
    0xCB1658E0E3823A40,
    0xB3B7384EB5DEF3F9,
    0xCBCA952F7006EA33,
    0x00569EF8EC94864C,
]);

/// 2^372 as a 6-limb little-endian integer.
pub const ORDER_A: Limbs<NWORDS_ORDER> = Limbs::new([0, 0, 0, 0, 0, 0x0000001000000000]);

/// 3^239, precomputed, as a 6-limb little-endian integer.
pub const ORDER_B: Limbs<NWORDS_ORDER> = Limbs::new([
    0x4066F541811E1E60,
    0x4F27CC5E7CD9B59F,
    0xE7CCBE4EA16A1108,
    0x9595A5F6CF4B93E6,
    0x025C8B0CB5866BE1,
    0x0000000000000003,
]);

/// Immutable bundle of curve parameters threaded through the whole core,
/// matching spec.md section 3's `CurveParameters` entity: the prime
/// representation constants, the two subgroup orders and their bit
/// lengths, and the starting curve constant.
#[derive(Copy, Clone, Debug)]
pub struct CurveParameters {
    /// p751.
    pub p: Limbs<NWORDS_FIELD>,
    /// 2 * p751.
    pub p_x2: Limbs<NWORDS_FIELD>,
    /// Montgomery "one": R mod p751.
    pub montgomery_one: FieldElement,
    /// Bit length of the 2^372 subgroup order.
    pub oa_bits: usize,
    /// Bit length of the 3^239 subgroup order.
    pub ob_bits: usize,
    /// The 2^372 subgroup order, little-endian limbs.
    pub order_a: Limbs<NWORDS_ORDER>,
    /// The 3^239 subgroup order, little-endian limbs.
    pub order_b: Limbs<NWORDS_ORDER>,
    /// Starting curve Montgomery constant A (0 for the published parameter set).
    pub starting_a: Fp2Element,
}

/// The published P751 parameter set: starting curve `A = 0`, `C = 1`.
pub const P751_PARAMETERS: CurveParameters = CurveParameters {
    p: P751,
    p_x2: P751X2,
    montgomery_one: FieldElement::ONE,
    oa_bits: OA_BITS,
    ob_bits: OB_BITS,
    order_a: ORDER_A,
    order_b: ORDER_B,
    starting_a: Fp2Element::ZERO,
};
