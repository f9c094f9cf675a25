//! Embedded-metadata discovery: components H (TIFF/IFD substrate), I (ICC),
//! J (XMP/UltraHDR) and the MPF classifier that rides on top of H.
//!
//! Every parser here enumerates structure - tag numbers, formats, offsets,
//! gain-map fields - without resolving what the tags *mean*. Turning an
//! EXIF tag id into "FocalLength" or an ICC tag signature into a parsed
//! curve is explicitly out of scope.

pub mod exif;
pub mod icc;
pub mod mpf;
pub mod tiff;
pub mod xmp;

use exif::ExifReport;
use icc::IccReport;
use mpf::MpfReport;
use xmp::{UltraHdrInfo, XmpPacket};

/// Everything this crate discovered in `APPn` segments, gathered as the
/// marker dispatcher walks the stream and resolved once decoding finishes.
#[derive(Default, Debug, Clone)]
pub struct SidecarReport
{
    pub exif: Option<ExifReport>,
    pub icc: Option<IccReport>,
    pub mpf: Option<MpfReport>,
    pub xmp: Option<XmpPacket>,
    pub ultra_hdr: Option<UltraHdrInfo>
}
