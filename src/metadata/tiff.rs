//! Component H: the TIFF/IFD substrate shared by EXIF and MPF.
//!
//! A single `TiffWalker` value owns the endianness and the buffer and hands
//! out raw `IfdEntry` records; it has no EXIF/MPF specific knowledge at all
//! (that lives in [`crate::metadata::exif`] and [`crate::metadata::mpf`]),
//! deliberately avoiding the base-class-with-subclasses shape the original
//! decoder this was grounded on used for the same job.

use crate::errors::DecodeErrors;

/// One raw entry from an Image File Directory, before any tag-name
/// resolution.
#[derive(Debug, Clone, Copy)]
pub struct IfdEntry
{
    pub tag: u16,
    /// 1..=12, see [`IfdEntry::format_name`].
    pub format: u16,
    pub count: u32,
    /// Inline value if it fits in 4 bytes, otherwise a byte offset from the
    /// start of the TIFF structure.
    pub value_or_offset: u32
}

impl IfdEntry
{
    pub const fn format_name(self) -> &'static str
    {
        match self.format
        {
            1 => "u8",
            2 => "ascii",
            3 => "u16",
            4 => "u32",
            5 => "urational",
            6 => "s8",
            7 => "undef",
            8 => "s16",
            9 => "s32",
            10 => "srational",
            11 => "f32",
            12 => "f64",
            _ => "unknown"
        }
    }
}

/// A walker over one TIFF structure (the kind embedded verbatim in EXIF and
/// MPF segments): `II*\0`/`MM\0*` header, a 4-byte offset to the first IFD,
/// then the IFD itself.
pub struct TiffWalker<'a>
{
    data: &'a [u8],
    little_endian: bool,
    first_ifd_offset: u32
}

impl<'a> TiffWalker<'a>
{
    pub fn new(data: &'a [u8]) -> Result<TiffWalker<'a>, DecodeErrors>
    {
        if data.len() < 8
        {
            return Err(DecodeErrors::SidecarUnrecognised(
                "TIFF structure shorter than the 8-byte header".to_string()
            ));
        }

        let little_endian = match &data[0..2]
        {
            b"II" => true,
            b"MM" => false,
            _ =>
            {
                return Err(DecodeErrors::SidecarUnrecognised(
                    "TIFF header missing II/MM byte-order mark".to_string()
                ))
            }
        };

        let walker = TiffWalker {
            data,
            little_endian,
            first_ifd_offset: 0
        };

        let magic = walker.read_u16(2);
        if magic != 0x002A
        {
            return Err(DecodeErrors::SidecarUnrecognised(format!(
                "TIFF magic number 0x{:04X}, expected 0x002A",
                magic
            )));
        }

        let first_ifd_offset = walker.read_u32(4);

        Ok(TiffWalker {
            first_ifd_offset,
            ..walker
        })
    }

    fn read_u16(&self, at: usize) -> u16
    {
        let bytes = [self.data[at], self.data[at + 1]];
        if self.little_endian
        {
            u16::from_le_bytes(bytes)
        }
        else
        {
            u16::from_be_bytes(bytes)
        }
    }

    fn read_u32(&self, at: usize) -> u32
    {
        let bytes = [
            self.data[at],
            self.data[at + 1],
            self.data[at + 2],
            self.data[at + 3]
        ];
        if self.little_endian
        {
            u32::from_le_bytes(bytes)
        }
        else
        {
            u32::from_be_bytes(bytes)
        }
    }

    /// Walk the first IFD, returning its raw entries in file order.
    pub fn entries(&self) -> Result<Vec<IfdEntry>, DecodeErrors>
    {
        let offset = self.first_ifd_offset as usize;
        if offset + 2 > self.data.len()
        {
            return Err(DecodeErrors::SidecarUnrecognised(
                "IFD offset points past end of TIFF structure".to_string()
            ));
        }

        let count = self.read_u16(offset) as usize;
        let mut entries = Vec::with_capacity(count);

        for i in 0..count
        {
            let entry_offset = offset + 2 + i * 12;
            if entry_offset + 12 > self.data.len()
            {
                return Err(DecodeErrors::SidecarUnrecognised(
                    "IFD entry count overruns the TIFF structure".to_string()
                ));
            }

            entries.push(IfdEntry {
                tag: self.read_u16(entry_offset),
                format: self.read_u16(entry_offset + 2),
                count: self.read_u32(entry_offset + 4),
                value_or_offset: self.read_u32(entry_offset + 8)
            });
        }

        Ok(entries)
    }
}
