//! EXIF (APP1, `Exif\0\0` header) classifier over the TIFF substrate.

use crate::errors::DecodeErrors;
use crate::metadata::tiff::{IfdEntry, TiffWalker};

/// EXIF's 0th IFD, enumerated but not resolved (tag-name lookup is a
/// caller concern).
#[derive(Debug, Clone, Default)]
pub struct ExifReport
{
    pub entries: Vec<IfdEntry>
}

/// Parse the TIFF structure that follows an APP1 segment's `Exif\0\0`
/// marker.
pub fn parse_exif(tiff_bytes: &[u8]) -> Result<ExifReport, DecodeErrors>
{
    let walker = TiffWalker::new(tiff_bytes)?;
    Ok(ExifReport {
        entries: walker.entries()?
    })
}
