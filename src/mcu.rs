//! Component C/E (part 0): the serial entropy-decode driver that walks
//! entropy-coded MCUs off the bitstream, then hands reconstructed MCU-row
//! bands to the worker pool in [`crate::worker`] once every block in that
//! row has been decoded.
//!
//! Entropy decoding itself cannot be parallelised - DC prediction and
//! restart-marker resync both depend on strict stream order - but once a
//! row of MCUs has its coefficients in hand, turning that row into pixels
//! is independent of every other row, so this is where the scoped thread
//! pool the teacher's own `mcu.rs` used for post-entropy work gets reused.

use std::io::Cursor;

use scoped_threadpool::Pool;

use crate::bitstream::BitStream;
use crate::decoder::Decoder;
use crate::errors::DecodeErrors;
use crate::marker::Marker;
use crate::misc::ColorSpace;
use crate::worker::{process_mcu_row, ComponentBand};

/// Per-component shape and table selection, snapshotted out of
/// `decoder.components` once at the start of the scan so the hot entropy
/// loop doesn't hold a live borrow of `decoder` while also indexing its
/// Huffman table arrays.
struct ScanComponent
{
    h_samp: usize,
    v_samp: usize,
    dc_table: usize,
    ac_table: usize,
    quant: [i32; 64]
}

/// Run the entropy-coded scan that follows an SOS header, returning the
/// finished RGB raster and the marker that ended it (ordinarily EOI).
pub fn decode_scan(
    decoder: &mut Decoder, reader: &mut Cursor<Vec<u8>>
) -> Result<(Vec<u8>, Marker), DecodeErrors>
{
    let width = usize::from(decoder.width);
    let height = usize::from(decoder.height);
    // A caller asking for grayscale output gets it even out of a 3-component
    // frame - the reconstruction stage below only builds the luma band in
    // that case, so chroma never gets upsampled or colour-converted.
    let colorspace = if decoder.options.output_colorspace() == ColorSpace::Grayscale
    {
        ColorSpace::Grayscale
    }
    else
    {
        decoder.input_colorspace
    };
    let restart_interval = decoder.restart_interval;
    let strict = decoder.options.strict();

    let scan_components: Vec<ScanComponent> = decoder
        .components
        .iter()
        .map(|c| ScanComponent {
            h_samp: c.horizontal_sample,
            v_samp: c.vertical_sample,
            dc_table: c.dc_huff_table,
            ac_table: c.ac_huff_table,
            quant: c.quantization_table
        })
        .collect();

    let hmax = scan_components.iter().map(|c| c.h_samp).max().unwrap_or(1);
    let vmax = scan_components.iter().map(|c| c.v_samp).max().unwrap_or(1);

    let mcu_x = (width + 8 * hmax - 1) / (8 * hmax);
    let mcu_y = (height + 8 * vmax - 1) / (8 * vmax);

    let plane_cols: Vec<usize> = scan_components.iter().map(|c| mcu_x * c.h_samp).collect();
    let mut planes: Vec<Vec<i16>> = scan_components
        .iter()
        .enumerate()
        .map(|(i, c)| vec![0i16; plane_cols[i] * mcu_y * c.v_samp * 64])
        .collect();

    let mut dc_preds = vec![0i32; scan_components.len()];
    let mut stream = BitStream::new();
    let full_interval = if restart_interval == 0
    {
        u32::MAX
    }
    else
    {
        u32::from(restart_interval)
    };
    let mut mcus_until_restart = full_interval;
    let mut expected_restart_index: u8 = 0;

    for mcu_row in 0..mcu_y
    {
        for mcu_col in 0..mcu_x
        {
            for (ci, comp) in scan_components.iter().enumerate()
            {
                let dc_table = decoder.dc_huffman_tables[comp.dc_table]
                    .as_ref()
                    .ok_or_else(|| {
                        DecodeErrors::SosError(format!(
                            "scan component {} has no DC Huffman table assigned",
                            ci
                        ))
                    })?;
                let ac_table = decoder.ac_huffman_tables[comp.ac_table]
                    .as_ref()
                    .ok_or_else(|| {
                        DecodeErrors::SosError(format!(
                            "scan component {} has no AC Huffman table assigned",
                            ci
                        ))
                    })?;

                for v in 0..comp.v_samp
                {
                    for h in 0..comp.h_samp
                    {
                        let block_row = mcu_row * comp.v_samp + v;
                        let block_col = mcu_col * comp.h_samp + h;
                        let block_idx = block_row * plane_cols[ci] + block_col;

                        let mut block = [0i16; 64];
                        stream.decode_mcu_block(
                            reader,
                            dc_table,
                            ac_table,
                            &mut block,
                            &mut dc_preds[ci]
                        )?;
                        planes[ci][block_idx * 64..block_idx * 64 + 64]
                            .copy_from_slice(&block);
                    }
                }
            }

            let is_last_mcu = mcu_row == mcu_y - 1 && mcu_col == mcu_x - 1;
            mcus_until_restart -= 1;
            if mcus_until_restart == 0 && !is_last_mcu
            {
                stream.drain_to_marker(reader)?;
                match stream.take_marker()
                {
                    Some(Marker::RST(index)) =>
                    {
                        if strict && index != expected_restart_index
                        {
                            return Err(DecodeErrors::RestartResyncFailed(format!(
                                "expected restart index {}, found {}",
                                expected_restart_index, index
                            )));
                        }
                        expected_restart_index = (expected_restart_index + 1) % 8;
                    }
                    Some(other) =>
                    {
                        return Err(DecodeErrors::RestartResyncFailed(format!(
                            "expected a restart marker, found {:?}",
                            other
                        )));
                    }
                    None =>
                    {
                        return Err(DecodeErrors::RestartResyncFailed(
                            "restart interval elapsed but no marker followed".to_string()
                        ));
                    }
                }
                stream.reset();
                for pred in &mut dc_preds
                {
                    *pred = 0;
                }
                mcus_until_restart = full_interval;
            }
        }
    }

    stream.drain_to_marker(reader)?;
    let trailing = stream.take_marker().ok_or_else(|| {
        DecodeErrors::TruncatedInput("scan ended without a terminating marker".to_string())
    })?;

    let mut raster = vec![0u8; width * height * 3];
    let band_height = 8 * vmax;
    let mut pool = Pool::new(num_cpus::get() as u32);

    pool.scoped(|scope| {
        for (row, out_rows) in raster.chunks_mut(width * 3 * band_height).enumerate()
        {
            let rows = (height - row * band_height).min(band_height);
            let bands: Vec<ComponentBand> = scan_components
                .iter()
                .enumerate()
                .take(colorspace.num_components())
                .map(|(ci, comp)| {
                    let cols = plane_cols[ci];
                    let first_block_row = row * comp.v_samp;
                    let start = first_block_row * cols * 64;
                    let end = start + comp.v_samp * cols * 64;
                    ComponentBand {
                        coeffs: &planes[ci][start..end],
                        quant_table: &comp.quant,
                        h_samp: comp.h_samp,
                        v_samp: comp.v_samp,
                        cols
                    }
                })
                .collect();

            scope.execute(move || {
                process_mcu_row(&bands, hmax, vmax, colorspace, width, rows, out_rows);
            });
        }
    });

    Ok((raster, trailing))
}
