//! The error taxonomy for this crate.
//!
//! Segment-level errors halt the decode; plenty of anomalies that the spec
//! merely wants *counted* are reported as warnings through [`crate::logger::Logger`]
//! instead of through this enum - `DecodeErrors` is reserved for things that
//! make it unsafe to keep decoding.

use std::fmt::{Display, Formatter};

/// Errors that can occur when decoding a JPEG stream.
#[derive(Debug, Clone)]
pub enum DecodeErrors
{
    /// The stream ended before a complete segment or entropy block could be
    /// read.
    TruncatedInput(String),
    /// A marker byte that this decoder does not recognise at all.
    UnknownMarker(String),
    /// A syntactically valid marker this crate deliberately does not support
    /// (progressive, lossless, arithmetic, 12/16-bit, CMYK).
    UnsupportedProfile(String),
    /// A segment whose length or field values do not make sense.
    MalformedSegment(String),
    /// Huffman table construction failed - bad lengths/symbols in a DHT.
    HuffmanDecode(String),
    /// An entropy-coded bit sequence did not correspond to any code in the
    /// table in force.
    HuffmanOutOfRange(String),
    /// A restart marker resync scan reached EOF, or (in strict mode) found
    /// the wrong index.
    RestartResyncFailed(String),
    /// An AC run pushed the zig-zag position past 63.
    EntropyOverflow(String),
    /// A quantization table definition (DQT) was invalid.
    DqtError(String),
    /// A frame header (SOF) was invalid.
    SofError(String),
    /// A scan header (SOS) was invalid.
    SosError(String),
    /// The embedded XMP gain-map packet violated the UltraHDR contract (a
    /// required field missing, or both scalar and RDF-sequence forms of the
    /// same field present).
    UltraHdrMalformed(String),
    /// A side-car payload (EXIF/ICC/MPF) was present but unparsable.
    SidecarUnrecognised(String),
    /// Catch-all for formatting/io mistakes surfaced as a generic message.
    Format(String)
}

impl Display for DecodeErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        use DecodeErrors::*;
        match self
        {
            TruncatedInput(m) => write!(f, "truncated input: {}", m),
            UnknownMarker(m) => write!(f, "unknown marker: {}", m),
            UnsupportedProfile(m) => write!(f, "unsupported profile: {}", m),
            MalformedSegment(m) => write!(f, "malformed segment: {}", m),
            HuffmanDecode(m) => write!(f, "huffman decode error: {}", m),
            HuffmanOutOfRange(m) => write!(f, "huffman code out of range: {}", m),
            RestartResyncFailed(m) => write!(f, "restart marker resync failed: {}", m),
            EntropyOverflow(m) => write!(f, "entropy overflow: {}", m),
            DqtError(m) => write!(f, "DQT error: {}", m),
            SofError(m) => write!(f, "SOF error: {}", m),
            SosError(m) => write!(f, "SOS error: {}", m),
            UltraHdrMalformed(m) => write!(f, "malformed UltraHDR XMP: {}", m),
            SidecarUnrecognised(m) => write!(f, "unrecognised side-car payload: {}", m),
            Format(m) => write!(f, "{}", m)
        }
    }
}

impl std::error::Error for DecodeErrors {}
