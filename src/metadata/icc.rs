//! Component I: ICC profile header parser (ICC.1:2010, "ICC_PROFILE\0"
//! APP2 segments).
//!
//! Validates the fixed 128-byte header and walks the tag table; tag
//! contents themselves are never materialised - this crate enumerates
//! `(signature, offset, size)` triples and stops there.

use crate::errors::DecodeErrors;

const HEADER_LEN: usize = 128;
const SIGNATURE_OFFSET: usize = 36;
const SIGNATURE: &[u8; 4] = b"acsp";

#[derive(Debug, Clone, Copy)]
pub struct IccTag
{
    pub signature: u32,
    pub offset: u32,
    pub size: u32
}

#[derive(Debug, Clone)]
pub struct IccReport
{
    pub profile_size: u32,
    pub device_class: u32,
    pub color_space: u32,
    pub connection_space: u32,
    pub rendering_intent: u32,
    pub tags: Vec<IccTag>
}

fn read_u32_be(data: &[u8], at: usize) -> u32
{
    u32::from_be_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

/// Parse an ICC profile payload (the bytes that follow `ICC_PROFILE\0`,
/// sequence number and chunk count, already reassembled if the profile
/// spanned multiple APP2 segments).
pub fn parse_icc(data: &[u8]) -> Result<IccReport, DecodeErrors>
{
    if data.len() < HEADER_LEN
    {
        return Err(DecodeErrors::SidecarUnrecognised(format!(
            "ICC profile shorter than the {}-byte header",
            HEADER_LEN
        )));
    }

    if &data[SIGNATURE_OFFSET..SIGNATURE_OFFSET + 4] != SIGNATURE
    {
        return Err(DecodeErrors::SidecarUnrecognised(
            "ICC profile missing 'acsp' signature at offset 36".to_string()
        ));
    }

    let profile_size = read_u32_be(data, 0);
    if profile_size as usize != data.len()
    {
        return Err(DecodeErrors::SidecarUnrecognised(format!(
            "ICC profile declares size {} but payload is {} bytes",
            profile_size,
            data.len()
        )));
    }

    let device_class = read_u32_be(data, 12);
    let color_space = read_u32_be(data, 16);
    let connection_space = read_u32_be(data, 20);
    let rendering_intent = read_u32_be(data, 64);

    let tag_count = read_u32_be(data, HEADER_LEN) as usize;
    let mut tags = Vec::with_capacity(tag_count);

    for i in 0..tag_count
    {
        let entry_offset = HEADER_LEN + 4 + i * 12;
        if entry_offset + 12 > data.len()
        {
            return Err(DecodeErrors::SidecarUnrecognised(
                "ICC tag table overruns the profile".to_string()
            ));
        }
        tags.push(IccTag {
            signature: read_u32_be(data, entry_offset),
            offset: read_u32_be(data, entry_offset + 4),
            size: read_u32_be(data, entry_offset + 8)
        });
    }

    Ok(IccReport {
        profile_size,
        device_class,
        color_space,
        connection_space,
        rendering_intent,
        tags
    })
}
