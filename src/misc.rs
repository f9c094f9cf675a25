//! Small shared constants and byte-cursor helpers.
//!
//! Nothing here carries decoder state; everything is either a `const` table
//! or a tiny free function operating on a `Read` implementor.

use std::io::Read;

use crate::errors::DecodeErrors;

/// Maximum number of components this crate supports in a single frame.
///
/// JPEG allows more in theory, but four quantization/Huffman table slots
/// exist (0..=3) and the component count is stored in the invariant
/// `channels in {1, 3}`, so four is generous headroom while still catching
/// corrupt `tq`/`th`/`id` fields early.
pub const MAX_COMPONENTS: usize = 4;

/// Upper bound on `sum(h_sampling * v_sampling)` over every component in a
/// frame (ITU-T T.81 Annex A.2 bounds Hmax*Vmax and component count such
/// that this product never legitimately exceeds 10).
pub const MAX_SAMPLING_SUM: usize = 10;

/// JPEG's zig-zag scan order (Figure A.6), read left to right: position `i`
/// in zig-zag order belongs at `UN_ZIGZAG[i]` in row-major order.
#[rustfmt::skip]
pub const UN_ZIGZAG: [usize; 64] = [
    0,  1,  8,  16, 9,  2,  3,  10,
    17, 24, 32, 25, 18, 11, 4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13, 6,  7,  14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// The colour space a decode produces (or, for an input frame, implies).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ColorSpace
{
    /// Single channel, replicated into R=G=B on output.
    Grayscale,
    /// Three interleaved bytes per pixel.
    Rgb
}

impl ColorSpace
{
    /// Number of channels this colorspace's *output* raster carries. Always
    /// 3 - even grayscale frames are expanded to RGB on the raster, per the
    /// data model (`R=G=B=Y`), this is rather how many *source* components
    /// feed the conversion.
    pub const fn num_components(self) -> usize
    {
        match self
        {
            ColorSpace::Grayscale => 1,
            ColorSpace::Rgb => 3
        }
    }
}

/// SOF markers this crate is aware of, supported or not - kept distinct from
/// [`crate::marker::Marker`] since it only needs to distinguish "baseline"
/// from "recognised but unsupported".
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SOFMarkers
{
    BaselineDCT
}

impl SOFMarkers
{
    pub const fn is_baseline(self) -> bool
    {
        matches!(self, SOFMarkers::BaselineDCT)
    }
}

/// Read one byte, mapping EOF to a typed error.
pub fn read_byte<R: Read>(reader: &mut R) -> Result<u8, DecodeErrors>
{
    let mut buf = [0u8; 1];
    reader
        .read_exact(&mut buf)
        .map_err(|e| DecodeErrors::TruncatedInput(format!("could not read a byte: {}", e)))?;
    Ok(buf[0])
}

/// Read a big-endian `u16`, mapping EOF to a typed error.
pub fn read_u16_be<R: Read>(reader: &mut R) -> Result<u16, DecodeErrors>
{
    let mut buf = [0u8; 2];
    reader
        .read_exact(&mut buf)
        .map_err(|e| DecodeErrors::TruncatedInput(format!("could not read u16: {}", e)))?;
    Ok(u16::from_be_bytes(buf))
}
