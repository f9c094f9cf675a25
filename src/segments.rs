//! Component L: the segment report.
//!
//! The marker dispatcher appends one [`SegmentRecord`] per marker it walks,
//! regardless of whether a handler exists for that marker - this is the
//! "structured report of every marker segment" promised in the crate's
//! purpose statement, in a form a caller can inspect without scraping log
//! lines.

use crate::marker::Marker;

/// One entry in the segment report.
#[derive(Clone, Debug)]
pub struct SegmentRecord
{
    /// Byte offset of the `0xFF` marker prefix within the input stream.
    pub offset: usize,
    /// The marker itself.
    pub marker: Marker,
    /// Declared payload length in bytes, 0 for length-less markers
    /// (SOI/EOI/RSTm).
    pub length: u16,
    /// Short classification string, see [`Marker::classify`].
    pub classification: &'static str
}

impl SegmentRecord
{
    pub fn new(offset: usize, marker: Marker, length: u16) -> SegmentRecord
    {
        SegmentRecord {
            offset,
            marker,
            length,
            classification: marker.classify()
        }
    }
}
