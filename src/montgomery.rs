//! Montgomery-curve arithmetic over `GF(p751^2)` (spec.md section 4): x-only
//! point operations, 4- and 3-isogeny step engines, torsion-basis
//! construction, the Tate pairing, Pohlig-Hellman discrete log recovery, and
//! public-key compression/decompression.
//!
//! Grounded throughout in `examples/original_source/C/ec_isogeny.c`, the
//! reference this module tree was distilled from.

#![allow(non_snake_case)]

pub mod compress;
pub mod edwards;
pub mod isogeny;
pub mod pairing;
pub mod party;
pub mod ph;
pub mod torsion;
pub mod x;

pub use party::Party;
