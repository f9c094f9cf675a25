//! The top-level `Decoder`: owns every piece of per-call state in the data
//! model and drives the marker dispatcher (component F) that the rest of
//! the crate hangs off of.

use std::io::{Cursor, Read};

use crate::components::Component;
use crate::errors::DecodeErrors;
use crate::huffman::HuffmanTable;
use crate::logger::Logger;
use crate::marker::Marker;
use crate::metadata::icc::parse_icc;
use crate::metadata::xmp::parse_ultra_hdr;
use crate::metadata::SidecarReport;
use crate::misc::{read_u16_be, ColorSpace, MAX_COMPONENTS};
use crate::options::DecoderOptions;
use crate::segments::SegmentRecord;
use crate::{headers, mcu};

/// Everything a successful [`Decoder::decode`] call hands back.
#[derive(Debug, Clone)]
pub struct DecodeResult
{
    /// Interleaved RGB8 raster, `width * height * 3` bytes.
    pub raster: Vec<u8>,
    pub width: u16,
    pub height: u16,
    pub colorspace: ColorSpace,
    /// Every marker segment walked, in stream order (component L).
    pub segments: Vec<SegmentRecord>,
    pub sidecars: SidecarReport,
    pub error_count: u32,
    pub warning_count: u32
}

/// One accumulated ICC chunk: `(sequence_number, chunk_count, data)`, APP2
/// payloads can split a profile across several segments.
pub(crate) type IccChunk = (u8, u8, Vec<u8>);

pub struct Decoder
{
    pub(crate) options: DecoderOptions,
    pub(crate) logger: Logger,
    pub(crate) segments: Vec<SegmentRecord>,

    pub(crate) quant_tables: [Option<[i32; 64]>; MAX_COMPONENTS],
    pub(crate) dc_huffman_tables: [Option<HuffmanTable>; MAX_COMPONENTS],
    pub(crate) ac_huffman_tables: [Option<HuffmanTable>; MAX_COMPONENTS],
    pub(crate) components: Vec<Component>,

    pub(crate) width: u16,
    pub(crate) height: u16,
    pub(crate) restart_interval: u16,
    pub(crate) input_colorspace: ColorSpace,

    pub(crate) sidecars: SidecarReport,
    pub(crate) icc_chunks: Vec<IccChunk>,
    pub(crate) xmp_text: Option<String>,

    seen_sof: bool
}

impl Default for Decoder
{
    fn default() -> Decoder
    {
        Decoder::new()
    }
}

impl Decoder
{
    pub fn new() -> Decoder
    {
        Decoder::new_with_options(DecoderOptions::default())
    }

    pub fn new_with_options(options: DecoderOptions) -> Decoder
    {
        Decoder {
            options,
            logger: Logger::new(),
            segments: Vec::new(),
            quant_tables: [None, None, None, None],
            dc_huffman_tables: [None, None, None, None],
            ac_huffman_tables: [None, None, None, None],
            components: Vec::new(),
            width: 0,
            height: 0,
            restart_interval: 0,
            input_colorspace: ColorSpace::Rgb,
            sidecars: SidecarReport::default(),
            icc_chunks: Vec::new(),
            xmp_text: None,
            seen_sof: false
        }
    }

    /// Decode a full JPEG byte stream into an RGB raster plus every side
    /// report this crate knows how to produce.
    pub fn decode(&mut self, data: Vec<u8>) -> Result<DecodeResult, DecodeErrors>
    {
        let mut reader = Cursor::new(data);

        let first = read_marker(&mut reader)?;
        if first != Marker::SOI
        {
            return Err(DecodeErrors::MalformedSegment(
                "stream does not start with SOI".to_string()
            ));
        }
        self.segments.push(SegmentRecord::new(0, Marker::SOI, 0));

        let mut raster = Vec::new();
        let mut pending_marker = None;

        loop
        {
            let marker = match pending_marker.take()
            {
                Some(m) => m,
                None =>
                {
                    let offset = reader.position() as usize;
                    let marker = read_marker(&mut reader)?;
                    let length = peek_length(&mut reader, marker)?;
                    self.segments
                        .push(SegmentRecord::new(offset, marker, length));
                    marker
                }
            };

            match marker
            {
                Marker::SOF(0) =>
                {
                    headers::parse_sof0(&mut reader, self)?;
                    self.seen_sof = true;
                }
                Marker::SOF(n) =>
                {
                    return Err(DecodeErrors::UnsupportedProfile(format!(
                        "SOF{} frames are not supported, only baseline (SOF0)",
                        n
                    )));
                }
                Marker::DHT => headers::parse_dht(&mut reader, self)?,
                Marker::DQT => headers::parse_dqt(&mut reader, self)?,
                Marker::DRI => headers::parse_dri(&mut reader, self)?,
                Marker::SOS =>
                {
                    if !self.seen_sof
                    {
                        return Err(DecodeErrors::SosError(
                            "SOS encountered before SOF0".to_string()
                        ));
                    }
                    headers::parse_sos(&mut reader, self)?;
                    let (pixels, trailing) = mcu::decode_scan(self, &mut reader)?;
                    raster = pixels;
                    pending_marker = Some(trailing);
                }
                Marker::COM => headers::parse_com(&mut reader, self)?,
                Marker::APP(0) => headers::parse_app0(&mut reader, self)?,
                Marker::APP(1) => headers::parse_app1(&mut reader, self)?,
                Marker::APP(2) => headers::parse_app2(&mut reader, self)?,
                Marker::APP(_) => headers::skip_segment(&mut reader)?,
                Marker::RST(_) =>
                {
                    self.logger
                        .warn("stray restart marker outside entropy-coded data");
                }
                Marker::Unknown(code) =>
                {
                    self.logger
                        .warn(&format!("skipping unknown marker 0x{:02X}", code));
                    headers::skip_segment(&mut reader)?;
                }
                Marker::EOI => break
            }
        }

        self.finalize_sidecars()?;

        Ok(DecodeResult {
            raster,
            width: self.width,
            height: self.height,
            colorspace: self.options.output_colorspace(),
            segments: self.segments.clone(),
            sidecars: self.sidecars.clone(),
            error_count: self.logger.error_count(),
            warning_count: self.logger.warning_count()
        })
    }

    fn finalize_sidecars(&mut self) -> Result<(), DecodeErrors>
    {
        if !self.icc_chunks.is_empty()
        {
            let mut chunks = self.icc_chunks.clone();
            chunks.sort_by_key(|(seq, _, _)| *seq);
            let combined: Vec<u8> = chunks.into_iter().flat_map(|(_, _, data)| data).collect();

            match parse_icc(&combined)
            {
                Ok(report) => self.sidecars.icc = Some(report),
                Err(e) => self.logger.warn(&format!("ICC profile unparsable: {}", e))
            }
        }

        if let Some(text) = self.xmp_text.clone()
        {
            match parse_ultra_hdr(&text)
            {
                Ok(Some(info)) => self.sidecars.ultra_hdr = Some(info),
                Ok(None) => {}
                Err(e) => self.logger.warn(&format!("UltraHDR XMP unparsable: {}", e))
            }
        }

        Ok(())
    }
}

pub(crate) fn read_marker(reader: &mut Cursor<Vec<u8>>) -> Result<Marker, DecodeErrors>
{
    let mut byte;
    loop
    {
        byte = read_byte_io(reader)?;
        if byte == 0xFF
        {
            break;
        }
    }
    // skip fill bytes (extra 0xFF before the real code byte)
    loop
    {
        byte = read_byte_io(reader)?;
        if byte != 0xFF
        {
            break;
        }
    }

    Marker::from_u8(byte)
        .ok_or_else(|| DecodeErrors::UnknownMarker(format!("0xFF{:02X}", byte)))
}

fn read_byte_io(reader: &mut Cursor<Vec<u8>>) -> Result<u8, DecodeErrors>
{
    let mut buf = [0u8; 1];
    reader
        .read_exact(&mut buf)
        .map_err(|_| DecodeErrors::TruncatedInput("stream ended mid-marker".to_string()))?;
    Ok(buf[0])
}

/// Peek the 2-byte length field for markers that carry one, without
/// consuming it (segment handlers re-read it themselves).
fn peek_length(reader: &mut Cursor<Vec<u8>>, marker: Marker) -> Result<u16, DecodeErrors>
{
    if !marker.has_length()
    {
        return Ok(0);
    }
    let pos = reader.position();
    let length = read_u16_be(reader)?;
    reader.set_position(pos);
    Ok(length)
}
