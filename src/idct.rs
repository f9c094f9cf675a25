//! Component D: dequantize a decoded 8x8 block of DCT coefficients and run
//! the inverse DCT, producing level-shifted (0..=255) sample values.
//!
//! Only the scalar path survives here. The teacher this crate grew out of
//! also carried an AVX2 path behind a `cfg(feature = "x86")` gate; this
//! crate never builds in unsafe SIMD, so that path (and the `unsafe_utils`
//! helpers it depended on) was dropped rather than generalized. See
//! `DESIGN.md` for the full note.

#![allow(clippy::excessive_precision, clippy::unreadable_literal, unused_parens)]

mod scalar;

pub use scalar::idct_block;
