//! MPF (Multi Picture Format, APP2 `MPF\0` header, CIPA DC-x007-2009)
//! classifier. MPF reuses the exact TIFF/IFD layout EXIF does, so this is
//! the other consumer of [`crate::metadata::tiff::TiffWalker`] promised in
//! component H - no subclassing, just a second caller of the same walker.
//!
//! Secondary-image extraction from the container this index describes is
//! left to the collaborator that splits a multi-picture JPEG; this crate
//! only surfaces the index itself.

use crate::errors::DecodeErrors;
use crate::metadata::tiff::{IfdEntry, TiffWalker};

#[derive(Debug, Clone, Default)]
pub struct MpfReport
{
    pub entries: Vec<IfdEntry>
}

/// Parse the TIFF structure that follows an APP2 segment's `MPF\0` marker.
pub fn parse_mpf(tiff_bytes: &[u8]) -> Result<MpfReport, DecodeErrors>
{
    let walker = TiffWalker::new(tiff_bytes)?;
    Ok(MpfReport {
        entries: walker.entries()?
    })
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn single_version_tag_entry_round_trips()
    {
        let mut buf = vec![b'I', b'I', 0x2A, 0x00, 8, 0, 0, 0];
        buf.extend_from_slice(&1u16.to_le_bytes());
        buf.extend_from_slice(&0xB000u16.to_le_bytes());
        buf.extend_from_slice(&4u16.to_le_bytes()); // u32 format
        buf.extend_from_slice(&4u32.to_le_bytes());
        buf.extend_from_slice(&0x0100_0000u32.to_le_bytes());

        let report = parse_mpf(&buf).unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].tag, 0xB000);
    }
}
