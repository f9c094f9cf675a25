//! Component N: a header-only dimension probe. Walks markers up to and
//! including SOF0 and stops, never touching the entropy-coded scan - useful
//! for a caller that wants an image's dimensions without paying for a full
//! decode.

use std::io::Cursor;

use crate::decoder::{read_marker, Decoder};
use crate::errors::DecodeErrors;
use crate::headers;
use crate::marker::Marker;
use crate::misc::ColorSpace;

/// The handful of frame header fields a caller can get without decoding any
/// pixels.
#[derive(Debug, Clone, Copy)]
pub struct ProbeResult
{
    pub width: u16,
    pub height: u16,
    pub colorspace: ColorSpace
}

/// Read just enough of a JPEG stream to report its dimensions and declared
/// colour space, stopping at the first SOF0. Any other SOF variant is
/// reported as [`DecodeErrors::UnsupportedProfile`], matching what a full
/// [`crate::decoder::Decoder::decode`] call would do with the same stream.
pub fn probe(data: Vec<u8>) -> Result<ProbeResult, DecodeErrors>
{
    let mut reader = Cursor::new(data);
    let mut decoder = Decoder::new();

    let first = read_marker(&mut reader)?;
    if first != Marker::SOI
    {
        return Err(DecodeErrors::MalformedSegment(
            "stream does not start with SOI".to_string()
        ));
    }

    loop
    {
        let marker = read_marker(&mut reader)?;
        match marker
        {
            Marker::SOF(0) =>
            {
                headers::parse_sof0(&mut reader, &mut decoder)?;
                return Ok(ProbeResult {
                    width: decoder.width,
                    height: decoder.height,
                    colorspace: decoder.input_colorspace
                });
            }
            Marker::SOF(n) =>
            {
                return Err(DecodeErrors::UnsupportedProfile(format!(
                    "SOF{} frames are not supported, only baseline (SOF0)",
                    n
                )));
            }
            Marker::SOS =>
            {
                return Err(DecodeErrors::MalformedSegment(
                    "encountered SOS before any SOF marker".to_string()
                ));
            }
            Marker::EOI =>
            {
                return Err(DecodeErrors::MalformedSegment(
                    "reached EOI before any SOF marker".to_string()
                ));
            }
            Marker::RST(_) => {}
            _ if marker.has_length() => headers::skip_segment(&mut reader)?,
            _ =>
            {
                return Err(DecodeErrors::UnknownMarker(format!(
                    "marker without a length field before SOF0: {:?}",
                    marker
                )));
            }
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn minimal_grayscale_header() -> Vec<u8>
    {
        let mut buf = vec![0xFF, 0xD8]; // SOI
        buf.extend_from_slice(&[0xFF, 0xC0]); // SOF0
        buf.extend_from_slice(&11u16.to_be_bytes()); // length
        buf.push(8); // precision
        buf.extend_from_slice(&8u16.to_be_bytes()); // height
        buf.extend_from_slice(&8u16.to_be_bytes()); // width
        buf.push(1); // components
        buf.extend_from_slice(&[1, 0x11, 0]); // id, h/v, qt index
        buf
    }

    #[test]
    fn probes_dimensions_without_decoding_pixels()
    {
        let result = probe(minimal_grayscale_header()).unwrap();
        assert_eq!(result.width, 8);
        assert_eq!(result.height, 8);
        assert_eq!(result.colorspace, ColorSpace::Grayscale);
    }

    #[test]
    fn rejects_stream_not_starting_with_soi()
    {
        assert!(probe(vec![0x00, 0x01, 0x02]).is_err());
    }
}
