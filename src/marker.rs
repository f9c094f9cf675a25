//! JPEG marker codes and the typed `Marker` enum the rest of the crate
//! dispatches on.

/// A decoded JPEG marker, missing the leading `0xFF` byte.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Marker
{
    /// Start Of Image.
    SOI,
    /// End Of Image.
    EOI,
    /// Start of frame, carrying the precise variant (baseline, progressive,
    /// ...) so the dispatcher can reject anything but baseline by marker
    /// alone.
    SOF(u8),
    /// Define Huffman Table.
    DHT,
    /// Define Quantization Table.
    DQT,
    /// Define Restart Interval.
    DRI,
    /// Start Of Scan.
    SOS,
    /// Restart marker, carrying its modulo-8 index.
    RST(u8),
    /// Comment.
    COM,
    /// Application segment, carrying its index 0..=15.
    APP(u8),
    /// Anything this crate does not specifically name, kept for the segment
    /// report and the "unknown marker, skip by length" policy.
    Unknown(u8)
}

impl Marker
{
    /// Map the byte following `0xFF` to a `Marker`, matching JPEG Part 1
    /// Table B.1.
    pub fn from_u8(byte: u8) -> Option<Marker>
    {
        match byte
        {
            0xD8 => Some(Marker::SOI),
            0xD9 => Some(Marker::EOI),
            0xC0 => Some(Marker::SOF(0)),
            0xC1..=0xCF if byte != 0xC4 && byte != 0xC8 && byte != 0xCC =>
            {
                Some(Marker::SOF(byte - 0xC0))
            }
            0xC4 => Some(Marker::DHT),
            0xDB => Some(Marker::DQT),
            0xDD => Some(Marker::DRI),
            0xDA => Some(Marker::SOS),
            0xD0..=0xD7 => Some(Marker::RST(byte - 0xD0)),
            0xFE => Some(Marker::COM),
            0xE0..=0xEF => Some(Marker::APP(byte - 0xE0)),
            0x01 | 0xFF => None, // TEM / fill bytes, not real markers
            _ => Some(Marker::Unknown(byte))
        }
    }

    /// Whether this marker carries a big-endian length word after the
    /// marker code. SOI, EOI and RSTm do not.
    pub const fn has_length(self) -> bool
    {
        !matches!(self, Marker::SOI | Marker::EOI | Marker::RST(_))
    }

    /// A short, human readable classification used in the segment report
    /// and in log lines - never the full field dump, just "what kind of
    /// marker was this".
    pub fn classify(self) -> &'static str
    {
        match self
        {
            Marker::SOI => "start of image",
            Marker::EOI => "end of image",
            Marker::SOF(0) => "baseline DCT frame header",
            Marker::SOF(2) => "progressive DCT frame header (unsupported)",
            Marker::SOF(_) => "non-baseline frame header (unsupported)",
            Marker::DHT => "Huffman table definition",
            Marker::DQT => "quantization table definition",
            Marker::DRI => "restart interval definition",
            Marker::SOS => "start of scan",
            Marker::RST(_) => "restart marker",
            Marker::COM => "comment",
            Marker::APP(0) => "application segment 0 (JFIF)",
            Marker::APP(1) => "application segment 1 (EXIF/XMP)",
            Marker::APP(2) => "application segment 2 (ICC/MPF)",
            Marker::APP(12..=14) => "application segment (recognised, unparsed)",
            Marker::APP(_) => "application segment (unrecognised)",
            Marker::Unknown(_) => "unknown marker"
        }
    }
}
