//! The protocol-role selector (spec.md section 7 / section 9 "Role
//! selector"). The original C source represents this as an integer with an
//! `InvalidParameter` error for any value other than `0`/`1`; here it is a
//! two-variant enum, so role misuse is rejected at compile time and no
//! runtime error path exists for it.

/// Which side of the isogeny walk a collaborator is acting as: Alice owns
/// the `2^372`-order torsion, Bob the `3^239`-order torsion.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Party {
    /// The `2^372`-torsion side.
    Alice,
    /// The `3^239`-torsion side.
    Bob,
}

impl Party {
    /// The bit-length of this party's private-key space (`oa_bits`/`ob_bits`
    /// of [`crate::constants::CurveParameters`]).
    pub fn secret_bits(self, params: &crate::constants::CurveParameters) -> usize {
        match self {
            Party::Alice => params.oa_bits,
            Party::Bob => params.ob_bits,
        }
    }
}
