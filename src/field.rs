//! Field arithmetic: `GF(p751)`, its quadratic extension `GF(p751^2)`, and
//! the two subgroup-order rings used by Pohlig-Hellman compression.

pub(crate) mod fp;
pub(crate) mod fp2;
pub(crate) mod order;

pub use fp::FieldElement;
pub use fp2::Fp2Element;
pub use order::{
    from_bytes as order_scalar_from_bytes, from_repr as order_scalar_from_repr, to_bytes as order_scalar_to_bytes,
    OrderScalar,
};
