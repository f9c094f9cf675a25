//! Component F/G: the marker segment handlers the dispatcher in
//! [`crate::decoder`] calls out to. Each function consumes exactly the
//! bytes its segment declares (the 2-byte length plus that many bytes
//! minus two), so the caller never has to track position by hand.

use std::io::{Cursor, Read};

use crate::components::Component;
use crate::decoder::Decoder;
use crate::errors::DecodeErrors;
use crate::huffman::HuffmanTable;
use crate::misc::{read_u16_be, ColorSpace, MAX_COMPONENTS, MAX_SAMPLING_SUM, UN_ZIGZAG};

/// Read a segment's length word and return exactly its payload (the bytes
/// after the length field, `length - 2` of them).
fn read_segment(reader: &mut Cursor<Vec<u8>>) -> Result<Vec<u8>, DecodeErrors>
{
    let length = read_u16_be(reader)?;
    if length < 2
    {
        return Err(DecodeErrors::MalformedSegment(format!(
            "segment declares length {}, must be at least 2",
            length
        )));
    }
    let mut buf = vec![0u8; usize::from(length) - 2];
    reader
        .read_exact(&mut buf)
        .map_err(|e| DecodeErrors::TruncatedInput(format!("segment payload: {}", e)))?;
    Ok(buf)
}

/// Discard a segment this crate doesn't look inside: unknown markers and
/// the application segments it only recognises (APP12..14, any other
/// unmatched APPn).
pub fn skip_segment(reader: &mut Cursor<Vec<u8>>) -> Result<(), DecodeErrors>
{
    read_segment(reader)?;
    Ok(())
}

fn take<'a>(payload: &'a [u8], at: &mut usize, n: usize) -> Result<&'a [u8], DecodeErrors>
{
    if *at + n > payload.len()
    {
        return Err(DecodeErrors::MalformedSegment(
            "segment payload ended mid-field".to_string()
        ));
    }
    let slice = &payload[*at..*at + n];
    *at += n;
    Ok(slice)
}

/// SOF0: frame header. Baseline-only by construction - the dispatcher never
/// calls this for any other SOF variant.
pub fn parse_sof0(reader: &mut Cursor<Vec<u8>>, decoder: &mut Decoder) -> Result<(), DecodeErrors>
{
    let payload = read_segment(reader)?;
    let mut at = 0;

    let precision = take(&payload, &mut at, 1)?[0];
    if precision != 8
    {
        return Err(DecodeErrors::UnsupportedProfile(format!(
            "sample precision {} bits, only 8-bit baseline is supported",
            precision
        )));
    }

    let height = u16::from_be_bytes(take(&payload, &mut at, 2)?.try_into().unwrap());
    let width = u16::from_be_bytes(take(&payload, &mut at, 2)?.try_into().unwrap());

    if usize::from(width) > decoder.options.max_width()
        || usize::from(height) > decoder.options.max_height()
    {
        return Err(DecodeErrors::SofError(format!(
            "image is {}x{}, which exceeds the configured {}x{} limit",
            width,
            height,
            decoder.options.max_width(),
            decoder.options.max_height()
        )));
    }

    let num_components = take(&payload, &mut at, 1)?[0] as usize;
    if num_components != 1 && num_components != 3
    {
        return Err(DecodeErrors::UnsupportedProfile(format!(
            "frame declares {} components, only grayscale (1) and YCbCr (3) are supported",
            num_components
        )));
    }

    let mut components = Vec::with_capacity(num_components);
    for _ in 0..num_components
    {
        let raw = take(&payload, &mut at, 3)?;
        components.push(Component::from_bytes([raw[0], raw[1], raw[2]])?);
    }

    let sampling_sum: usize = components
        .iter()
        .map(|c| c.horizontal_sample * c.vertical_sample)
        .sum();
    if sampling_sum > MAX_SAMPLING_SUM
    {
        return Err(DecodeErrors::SofError(format!(
            "sum of h_sampling*v_sampling over all components is {}, expected at most {}",
            sampling_sum, MAX_SAMPLING_SUM
        )));
    }

    decoder.width = width;
    decoder.height = height;
    decoder.input_colorspace = if num_components == 1
    {
        ColorSpace::Grayscale
    }
    else
    {
        ColorSpace::Rgb
    };
    decoder.components = components;

    decoder.logger.info(&format!(
        "SOF0: {}x{}, {} component(s)",
        width, height, num_components
    ));

    Ok(())
}

/// DHT: one segment may define several tables back to back.
pub fn parse_dht(reader: &mut Cursor<Vec<u8>>, decoder: &mut Decoder) -> Result<(), DecodeErrors>
{
    let payload = read_segment(reader)?;
    let mut at = 0;

    while at < payload.len()
    {
        let class_and_id = take(&payload, &mut at, 1)?[0];
        let class = class_and_id >> 4;
        let id = usize::from(class_and_id & 0x0F);

        if id >= MAX_COMPONENTS
        {
            return Err(DecodeErrors::HuffmanDecode(format!(
                "Huffman table index {} out of range, expected 0..=3",
                id
            )));
        }

        let counts = take(&payload, &mut at, 16)?;
        let mut bits = [0u8; 17];
        bits[1..=16].copy_from_slice(counts);
        let total: usize = counts.iter().map(|&c| usize::from(c)).sum();

        let values = take(&payload, &mut at, total)?.to_vec();
        let is_dc = class == 0;
        let table = HuffmanTable::new(&bits, values, is_dc)?;

        if is_dc
        {
            decoder.dc_huffman_tables[id] = Some(table);
        }
        else
        {
            decoder.ac_huffman_tables[id] = Some(table);
        }
    }

    Ok(())
}

/// DQT: one segment may define several quantization tables back to back.
pub fn parse_dqt(reader: &mut Cursor<Vec<u8>>, decoder: &mut Decoder) -> Result<(), DecodeErrors>
{
    let payload = read_segment(reader)?;
    let mut at = 0;

    while at < payload.len()
    {
        let pq_tq = take(&payload, &mut at, 1)?[0];
        let precision = pq_tq >> 4;
        let id = usize::from(pq_tq & 0x0F);

        if id >= MAX_COMPONENTS
        {
            return Err(DecodeErrors::DqtError(format!(
                "quantization table index {} out of range, expected 0..=3",
                id
            )));
        }

        let mut natural = [0i32; 64];
        for &slot in UN_ZIGZAG.iter()
        {
            let value = if precision == 0
            {
                i32::from(take(&payload, &mut at, 1)?[0])
            }
            else
            {
                let raw = take(&payload, &mut at, 2)?;
                i32::from(u16::from_be_bytes([raw[0], raw[1]]))
            };
            natural[slot] = value;
        }

        decoder.quant_tables[id] = Some(natural);
    }

    Ok(())
}

/// DRI: redefine the restart interval, in MCUs between consecutive RSTm
/// markers (0 disables restarts).
pub fn parse_dri(reader: &mut Cursor<Vec<u8>>, decoder: &mut Decoder) -> Result<(), DecodeErrors>
{
    let payload = read_segment(reader)?;
    if payload.len() != 2
    {
        return Err(DecodeErrors::MalformedSegment(format!(
            "DRI payload is {} bytes, expected 2",
            payload.len()
        )));
    }
    decoder.restart_interval = u16::from_be_bytes([payload[0], payload[1]]);
    Ok(())
}

/// SOS: select which Huffman tables each scan component uses and copy its
/// quantization table into the component, since entropy decoding only ever
/// consults `Component`, never the decoder's table arrays directly.
pub fn parse_sos(reader: &mut Cursor<Vec<u8>>, decoder: &mut Decoder) -> Result<(), DecodeErrors>
{
    let payload = read_segment(reader)?;
    let mut at = 0;

    let ns = take(&payload, &mut at, 1)?[0] as usize;
    if ns == 0 || ns > decoder.components.len()
    {
        return Err(DecodeErrors::SosError(format!(
            "scan declares {} components, frame has {}",
            ns,
            decoder.components.len()
        )));
    }

    for _ in 0..ns
    {
        let selector = take(&payload, &mut at, 1)?[0];
        let table_ids = take(&payload, &mut at, 1)?[0];
        let dc_id = usize::from(table_ids >> 4);
        let ac_id = usize::from(table_ids & 0x0F);

        if dc_id >= MAX_COMPONENTS || ac_id >= MAX_COMPONENTS
        {
            return Err(DecodeErrors::SosError(format!(
                "scan component {} selects Huffman table indices {}/{}, expected 0..=3",
                selector, dc_id, ac_id
            )));
        }

        let component = decoder
            .components
            .iter_mut()
            .find(|c| c.id == selector)
            .ok_or_else(|| {
                DecodeErrors::SosError(format!(
                    "scan references component id {} not present in the frame",
                    selector
                ))
            })?;

        component.dc_huff_table = dc_id;
        component.ac_huff_table = ac_id;
    }

    let spectral_start = take(&payload, &mut at, 1)?[0];
    let spectral_end = take(&payload, &mut at, 1)?[0];
    let approx = take(&payload, &mut at, 1)?[0];

    if spectral_start != 0 || spectral_end != 63 || approx != 0
    {
        return Err(DecodeErrors::UnsupportedProfile(format!(
            "scan header Ss={} Se={} Ah/Al={:#x} is not a baseline single scan",
            spectral_start, spectral_end, approx
        )));
    }

    for component in &mut decoder.components
    {
        let id = usize::from(component.quantization_table_number);
        component.quantization_table = decoder.quant_tables[id].ok_or_else(|| {
            DecodeErrors::SosError(format!(
                "component {} references quantization table {} which was never defined",
                component.id, id
            ))
        })?;
    }

    Ok(())
}

/// COM: logged, never retained - the data model has no slot for comment
/// text, only the segment report knows one was here.
pub fn parse_com(reader: &mut Cursor<Vec<u8>>, decoder: &mut Decoder) -> Result<(), DecodeErrors>
{
    let payload = read_segment(reader)?;
    decoder
        .logger
        .verbose(&String::from_utf8_lossy(&payload).into_owned());
    Ok(())
}

/// APP0: JFIF, recognised for the segment report and then discarded -
/// density/thumbnail fields aren't part of this crate's data model.
pub fn parse_app0(reader: &mut Cursor<Vec<u8>>, decoder: &mut Decoder) -> Result<(), DecodeErrors>
{
    let payload = read_segment(reader)?;
    if payload.starts_with(b"JFIF\0")
    {
        decoder.logger.verbose("APP0: JFIF segment recognised");
    }
    else
    {
        decoder
            .logger
            .warn("APP0 segment without a JFIF identifier");
    }
    Ok(())
}

const EXIF_ID: &[u8] = b"Exif\0\0";
const XMP_ID: &[u8] = b"http://ns.adobe.com/xap/1.0/\0";
const XMP_EXTENSION_ID: &[u8] = b"http://ns.adobe.com/xmp/extension/\0";

/// APP1: EXIF, primary XMP packet, or an XMP extension chunk.
pub fn parse_app1(reader: &mut Cursor<Vec<u8>>, decoder: &mut Decoder) -> Result<(), DecodeErrors>
{
    let payload = read_segment(reader)?;

    if let Some(tiff_bytes) = payload.strip_prefix(EXIF_ID)
    {
        match crate::metadata::exif::parse_exif(tiff_bytes)
        {
            Ok(report) => decoder.sidecars.exif = Some(report),
            Err(e) => decoder
                .logger
                .warn(&format!("EXIF payload unparsable: {}", e))
        }
        return Ok(());
    }

    if let Some(text_bytes) = payload.strip_prefix(XMP_ID)
    {
        let packet = crate::metadata::xmp::parse_xmp_packet(text_bytes.to_vec());
        let text = String::from_utf8_lossy(text_bytes).into_owned();
        decoder.sidecars.xmp = Some(packet);
        decoder.xmp_text = Some(match decoder.xmp_text.take()
        {
            Some(existing) => existing + &text,
            None => text
        });
        return Ok(());
    }

    if let Some(rest) = payload.strip_prefix(XMP_EXTENSION_ID)
    {
        // GUID(32) + full packet length(4) + this chunk's offset(4), then
        // the chunk body itself; this crate only needs the body, reassembly
        // order follows the order the segments arrived in.
        if rest.len() < 40
        {
            return Err(DecodeErrors::MalformedSegment(
                "XMP extension segment shorter than its own header".to_string()
            ));
        }
        let body = &rest[40..];
        let text = String::from_utf8_lossy(body).into_owned();
        decoder.xmp_text = Some(match decoder.xmp_text.take()
        {
            Some(existing) => existing + &text,
            None => text
        });
        return Ok(());
    }

    decoder
        .logger
        .warn("APP1 segment with an unrecognised identifier");
    Ok(())
}

const ICC_ID: &[u8] = b"ICC_PROFILE\0";
const MPF_ID: &[u8] = b"MPF\0";

/// APP2: ICC profile chunk or an MPF index. FPXR (FlashPix) segments are
/// recognised by elimination and otherwise ignored - this crate never reads
/// FlashPix metadata.
pub fn parse_app2(reader: &mut Cursor<Vec<u8>>, decoder: &mut Decoder) -> Result<(), DecodeErrors>
{
    let payload = read_segment(reader)?;

    if let Some(rest) = payload.strip_prefix(ICC_ID)
    {
        if rest.len() < 2
        {
            return Err(DecodeErrors::MalformedSegment(
                "ICC_PROFILE segment missing sequence/count bytes".to_string()
            ));
        }
        let sequence_number = rest[0];
        let chunk_count = rest[1];
        decoder
            .icc_chunks
            .push((sequence_number, chunk_count, rest[2..].to_vec()));
        return Ok(());
    }

    if let Some(tiff_bytes) = payload.strip_prefix(MPF_ID)
    {
        match crate::metadata::mpf::parse_mpf(tiff_bytes)
        {
            Ok(report) => decoder.sidecars.mpf = Some(report),
            Err(e) => decoder
                .logger
                .warn(&format!("MPF payload unparsable: {}", e))
        }
        return Ok(());
    }

    decoder
        .logger
        .verbose("APP2 segment without an ICC or MPF identifier (FPXR or unrecognised)");
    Ok(())
}
