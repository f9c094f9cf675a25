//! Per-component frame state, populated by SOF0 and consulted throughout
//! the entropy and MCU stages.

use crate::errors::DecodeErrors;
use crate::misc::MAX_COMPONENTS;

/// One frame component as declared in SOF0: `{id, h<<4|v, qt_index}`.
#[derive(Clone, Debug)]
pub struct Component
{
    /// Component identifier as it appears in the stream (commonly 1=Y,
    /// 2=Cb, 3=Cr, but the spec does not mandate those values).
    pub id: u8,
    /// Horizontal sampling factor, 1..=4.
    pub horizontal_sample: usize,
    /// Vertical sampling factor, 1..=4.
    pub vertical_sample: usize,
    /// Index into the decoder's quantization table array, 0..=3.
    pub quantization_table_number: u8,
    /// Dequantized, de-zigzagged table this component uses - copied out of
    /// the decoder's `qt_tables` once SOF0 has read every component, so the
    /// entropy/IDCT hot path never indexes through an `Option`.
    pub quantization_table: [i32; 64],
    /// DC Huffman table slot, set by SOS.
    pub dc_huff_table: usize,
    /// AC Huffman table slot, set by SOS.
    pub ac_huff_table: usize,
    /// Running DC predictor, reset to 0 after every restart marker.
    pub dc_pred: i32
}

impl Component
{
    /// Parse the 3-byte per-component record from SOF0: `{id, h<<4|v,
    /// qt_index}`.
    pub fn from_bytes(bytes: [u8; 3]) -> Result<Component, DecodeErrors>
    {
        let id = bytes[0];
        let h = (bytes[1] >> 4) & 0xF;
        let v = bytes[1] & 0xF;
        let qt_index = bytes[2];

        if h == 0 || h > 4 || v == 0 || v > 4
        {
            return Err(DecodeErrors::SofError(format!(
                "invalid sampling factor {}x{} for component {}, expected 1..=4",
                h, v, id
            )));
        }
        if usize::from(qt_index) >= MAX_COMPONENTS
        {
            return Err(DecodeErrors::SofError(format!(
                "invalid quantization table index {} for component {}, expected 0..=3",
                qt_index, id
            )));
        }

        Ok(Component {
            id,
            horizontal_sample: usize::from(h),
            vertical_sample: usize::from(v),
            quantization_table_number: qt_index,
            quantization_table: [0; 64],
            dc_huff_table: 0,
            ac_huff_table: 0,
            dc_pred: 0
        })
    }
}
