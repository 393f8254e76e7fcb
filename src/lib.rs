#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![doc(
    html_logo_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg",
    html_favicon_url = "https://raw.githubusercontent.com/RustCrypto/meta/master/logo.svg"
)]
#![allow(non_snake_case)]
#![forbid(unsafe_code)]
#![warn(
    clippy::unwrap_used,
    clippy::mod_module_files,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused,
    unused_attributes,
    unused_imports,
    unused_mut,
    unused_must_use
)]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

// Internal macros. Must come first!
#[macro_use]
pub(crate) mod macros;

pub use subtle;

pub(crate) mod bigint;
pub(crate) mod constants;
pub(crate) mod field;
pub(crate) mod montgomery;

pub use bigint::{Limbs, NWORDS_FIELD, NWORDS_ORDER};
pub use constants::{
    CurveParameters, MONTGOMERY_RPRIME, MONTGOMERY_RPRIME_SQ, MONTGOMERY_R2, OA_BITS, OB_BITS, ORDER_A, ORDER_B,
    P751, P751P1, P751X2, P751_PARAMETERS,
};
pub use field::{
    order_scalar_from_bytes, order_scalar_from_repr, order_scalar_to_bytes, FieldElement, Fp2Element, OrderScalar,
};

pub use montgomery::Party;
pub use montgomery::compress::{
    CompressedPublicKey, PublicKey, compress_2_torsion, compress_3_torsion, decompress_2_torsion,
    decompress_3_torsion,
};
pub use montgomery::edwards::{self, BasefieldPoint};
pub use montgomery::isogeny::{self, FourIsogCoeffs};
pub use montgomery::pairing;
pub use montgomery::ph;
pub use montgomery::torsion::{self, AffinePoint, FullPoint};
pub use montgomery::x::{self, CurveCoefficients, ProjectivePoint};
