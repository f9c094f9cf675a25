//! Component E (part 2): the post-entropy half of MCU reconstruction -
//! dequantize, IDCT, up-sample and colour-convert one band of MCU rows,
//! writing straight into its slice of the output raster.
//!
//! This is the unit of work handed to the scoped thread pool in
//! [`crate::decoder`]: entropy decoding is strictly serial (DC prediction
//! and restart-marker resync both depend on stream order), but once a band
//! of coefficients is in hand, turning it into pixels is independent of
//! every other band, so bands run on a worker pool the way the teacher's
//! `mcu.rs`/`worker.rs` split does.

use crate::idct::idct_block;
use crate::misc::ColorSpace;
use crate::upsampler::{sample_nearest, ycbcr_to_rgb, ComponentPlane};

/// One component's slice of coefficients for a single MCU row band, plus
/// enough shape information to IDCT and up-sample it.
pub struct ComponentBand<'a>
{
    /// `v_samp * cols * 64` signed coefficients, natural (non-zig-zag)
    /// order within each block, block-row-major.
    pub coeffs: &'a [i16],
    /// Quantization table, natural order, owned by the component.
    pub quant_table: &'a [i32; 64],
    pub h_samp: usize,
    pub v_samp: usize,
    /// Blocks per row for this component = `mcu_x * h_samp`.
    pub cols: usize
}

/// Reconstruct one MCU row band into `out_row`, an RGB raster slice holding
/// exactly `rows * width * 3` bytes (`rows` is the number of *unclipped*
/// output rows this band contributes - usually `8*vmax`, less for the last
/// band of an image whose height isn't a multiple of `8*vmax`).
#[allow(clippy::too_many_arguments)]
pub fn process_mcu_row(
    bands: &[ComponentBand], hmax: usize, vmax: usize, colorspace: ColorSpace, width: usize,
    rows: usize, out_row: &mut [u8]
)
{
    let band_height = 8 * vmax;

    // Reconstruct every component's plane for this band first: IDCT each
    // block into its (block_row, block_col) position.
    let mut planes: Vec<Vec<u8>> = Vec::with_capacity(bands.len());
    let mut plane_widths = Vec::with_capacity(bands.len());

    for band in bands
    {
        let plane_width = band.cols * 8;
        let plane_height = band.v_samp * 8;
        let mut plane = vec![0u8; plane_width * plane_height];

        for block_row in 0..band.v_samp
        {
            for block_col in 0..band.cols
            {
                let block_idx = block_row * band.cols + block_col;
                let coeff_slice = &band.coeffs[block_idx * 64..block_idx * 64 + 64];
                let mut block = [0i16; 64];
                block.copy_from_slice(coeff_slice);

                let samples = idct_block(&block, band.quant_table);

                let origin_x = block_col * 8;
                let origin_y = block_row * 8;
                for y in 0..8
                {
                    let dst_start = (origin_y + y) * plane_width + origin_x;
                    plane[dst_start..dst_start + 8].copy_from_slice(&samples[y * 8..y * 8 + 8]);
                }
            }
        }

        planes.push(plane);
        plane_widths.push(plane_width);
    }

    let channels = 3;
    for y in 0..rows.min(band_height)
    {
        let row_start = y * width * channels;
        for x in 0..width
        {
            let mut comp_samples = [0u8; 4];
            for (i, band) in bands.iter().enumerate()
            {
                let plane = ComponentPlane {
                    samples: &planes[i],
                    width: plane_widths[i],
                    h_samp: band.h_samp,
                    v_samp: band.v_samp
                };
                comp_samples[i] = sample_nearest(&plane, x, y, hmax, vmax);
            }

            let rgb = match colorspace
            {
                ColorSpace::Grayscale => [comp_samples[0]; 3],
                ColorSpace::Rgb => ycbcr_to_rgb(comp_samples[0], comp_samples[1], comp_samples[2])
            };

            let px = row_start + x * channels;
            out_row[px..px + 3].copy_from_slice(&rgb);
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn grayscale_dc_only_band_is_flat_mid_gray()
    {
        // An all-zero block: the IDCT's DC-only fast path still has to add
        // the +128 level shift, landing on mid-gray rather than black.
        let coeffs = [0i16; 64];
        let quant = [8i32; 64];

        let band = ComponentBand {
            coeffs: &coeffs,
            quant_table: &quant,
            h_samp: 1,
            v_samp: 1,
            cols: 1
        };

        let mut out = vec![0u8; 8 * 8 * 3];
        process_mcu_row(&[band], 1, 1, ColorSpace::Grayscale, 8, 8, &mut out);

        assert!(out.iter().all(|&b| b == 128));
    }
}
